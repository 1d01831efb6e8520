//! Statement emission.
//!
//! Commands appear in source-statement order within one function body.
//! If-chains burn a single-use done flag so exactly one branch body
//! runs; loops synthesize entry/step helper function pairs; execute
//! blocks replay their body once per variant.

use dplc_par::{
    AssignOp, AssignStmt, CallStmt, ElseBranch, Expr, ForInit, ForStmt, GlobalVar, IfStmt, Stmt,
    VarDeclStmt, VarKind, WhileStmt,
};
use dplc_util::Span;

use crate::cond::guard_prefix;
use crate::files::EmitBuf;
use crate::names::{
    escape_quoted, for_local_score, format_number, function_path, ifdone_flag, storage_ref,
};
use crate::{LocalVar, PackCtx, ResolvedVar, Scope};

/// Scoreboard operation spelling for an assignment operator.
fn assign_score_op(op: AssignOp) -> &'static str {
    match op.binop() {
        Some(binop) => binop.score_op(),
        None => "=",
    }
}

/// True when the expression has a string literal anywhere in it, which
/// is what makes a `+` chain a static concatenation rather than
/// arithmetic.
fn contains_str(expr: &Expr) -> bool {
    match expr {
        Expr::Str(..) => true,
        Expr::Binary { lhs, rhs, .. } => contains_str(lhs) || contains_str(rhs),
        _ => false,
    }
}

impl<'a> PackCtx<'a> {
    /// Emit a statement list into `buf`, scoping locals to this block.
    pub(crate) fn emit_stmts(&mut self, stmts: &[Stmt], scope: &Scope, buf: &mut EmitBuf) {
        let mut scope = scope.clone();
        for stmt in stmts {
            self.emit_stmt(stmt, &mut scope, buf);
        }
    }

    fn emit_stmt(&mut self, stmt: &Stmt, scope: &mut Scope, buf: &mut EmitBuf) {
        match stmt {
            Stmt::Say(expr, span) => self.emit_say(expr, *span, scope, buf),
            Stmt::Run(expr, span) => self.emit_run(expr, *span, scope, buf),
            Stmt::VarDecl(decl) => self.emit_local_decl(decl, scope, buf),
            Stmt::Assign(assign) => self.emit_assign(assign, scope, buf),
            Stmt::Call(call) => self.emit_call(call, buf),
            Stmt::If(if_stmt) => self.emit_if_chain(if_stmt, scope, buf),
            Stmt::Execute(exec) => {
                for variant in &exec.variants {
                    let mark = buf.len();
                    self.emit_stmts(&exec.body, scope, buf);
                    let lines = buf.drain_from(mark);

                    if variant.is_empty() {
                        for line in lines {
                            buf.push(line);
                        }
                    } else {
                        let mods: Vec<String> = variant
                            .iter()
                            .map(|m| match m {
                                dplc_par::ExecMod::As(sel) => format!("as {}", sel),
                                dplc_par::ExecMod::At(sel) => format!("at {}", sel),
                                dplc_par::ExecMod::Positioned(x, y, z) => {
                                    format!("positioned {} {} {}", x, y, z)
                                },
                            })
                            .collect();
                        let prefix = format!("execute {} run ", mods.join(" "));
                        for line in lines {
                            buf.push(format!("{}{}", prefix, line));
                        }
                    }
                }
            },
            Stmt::For(for_stmt) => self.emit_for(for_stmt, scope, buf),
            Stmt::While(while_stmt) => self.emit_while(while_stmt, scope, buf),
        }
    }

    // ------------------------------------------------------------------
    // Say / Run
    // ------------------------------------------------------------------

    fn emit_say(&mut self, expr: &Expr, span: Span, scope: &Scope, buf: &mut EmitBuf) {
        if let Expr::Str(value, _) = expr {
            if let Some(content) = value.strip_prefix('$') {
                let command = format!("say \"{}\"", content);
                self.emit_macro_call(&command, span, scope, buf);
                return;
            }
        }

        if contains_str(expr) {
            if let Some(text) = self.fold_static_string(expr) {
                buf.push(format!("say \"{}\"", escape_quoted(&text)));
            } else {
                self.handler.error(
                    "Say only supports static string concatenation",
                    span,
                );
            }
            return;
        }

        if let Expr::Var(name, _) = expr {
            if let Some(var) = self.resolve_var(scope, name) {
                if !var.ty.array && !var.ty.kind.is_numeric() {
                    let component = serde_json::json!({
                        "storage": storage_ref(&self.ns),
                        "nbt": var.storage,
                    });
                    buf.push(format!("tellraw @a {}", component));
                    return;
                }
            }
        }

        if let Some(tmp) = self.lower_expr(expr, scope, buf) {
            let component = serde_json::json!({
                "score": { "name": tmp, "objective": "vars" },
            });
            buf.push(format!("tellraw @a {}", component));
        }
    }

    fn emit_run(&mut self, expr: &Expr, span: Span, scope: &Scope, buf: &mut EmitBuf) {
        if let Expr::Str(value, _) = expr {
            if let Some(content) = value.strip_prefix('$') {
                let command = content.strip_prefix('/').unwrap_or(content);
                self.emit_macro_call(command, span, scope, buf);
                return;
            }
        }

        if contains_str(expr) {
            if let Some(text) = self.fold_static_string(expr) {
                let command = text.strip_prefix('/').unwrap_or(&text);
                buf.push(command.to_string());
            } else {
                self.handler.error(
                    "Run only supports static string concatenation",
                    span,
                );
            }
            return;
        }

        if let Expr::Var(name, _) = expr {
            if let Some(var) = self.resolve_var(scope, name) {
                if !var.ty.array && var.ty.kind == VarKind::Str {
                    buf.push(format!(
                        "data modify storage {} __cmd set from storage {} {}",
                        storage_ref(&self.ns),
                        storage_ref(&self.ns),
                        var.storage
                    ));
                    self.ensure_run_cmd();
                    buf.push(format!(
                        "function {}:__run_cmd with storage {}",
                        self.ns,
                        storage_ref(&self.ns)
                    ));
                    return;
                }
            }
        }

        self.handler.error("Run expects a string", span);
    }

    // ------------------------------------------------------------------
    // Declarations and assignment
    // ------------------------------------------------------------------

    /// Assign one global inside `__init`. Globals without an
    /// initializer get the zero value of their type; uninitialized
    /// entity references stay unbound.
    pub(crate) fn emit_global_init(
        &mut self,
        global: &GlobalVar,
        scope: &Scope,
        buf: &mut EmitBuf,
    ) {
        let var = ResolvedVar {
            ty: global.ty,
            score: crate::names::global_score(&self.ns, &global.name),
            storage: global.name.clone(),
        };

        let default;
        let value = match &global.init {
            Some(init) => init,
            None => {
                if global.ty.kind == VarKind::Ent && !global.ty.array {
                    return;
                }
                default = if global.ty.array {
                    Expr::Array(Vec::new(), global.span)
                } else if global.ty.kind == VarKind::Str {
                    Expr::Str(String::new(), global.span)
                } else {
                    Expr::Number(0.0, global.span)
                };
                &default
            },
        };

        self.emit_store(&var, AssignOp::Assign, value, scope, buf);
    }

    fn emit_local_decl(&mut self, decl: &VarDeclStmt, scope: &mut Scope, buf: &mut EmitBuf) {
        if scope.locals.contains_key(&decl.name) {
            self.handler.error(
                format!("duplicate local '{}'", decl.name),
                decl.span,
            );
            return;
        }

        let score = self.local_score_name(scope, &decl.name);
        let var = ResolvedVar {
            ty: decl.ty,
            score: score.clone(),
            storage: decl.name.clone(),
        };

        let default;
        let value = match &decl.init {
            Some(init) => init,
            None => {
                default = if decl.ty.array {
                    Expr::Array(Vec::new(), decl.span)
                } else if decl.ty.kind == VarKind::Str {
                    Expr::Str(String::new(), decl.span)
                } else {
                    Expr::Number(0.0, decl.span)
                };
                &default
            },
        };

        if decl.ty.kind == VarKind::Ent && !decl.ty.array && decl.init.is_none() {
            // declared but unbound
        } else {
            self.emit_store(&var, AssignOp::Assign, value, scope, buf);
        }

        // integer locals mirror into storage so macro strings can pick
        // them up by name
        if var.ty.kind.is_score_backed() && !var.ty.array {
            buf.push(format!(
                "execute store result storage {} {} int 1 run scoreboard players get {} vars",
                storage_ref(&self.ns),
                var.storage,
                var.score
            ));
        }

        scope.locals.insert(
            decl.name.clone(),
            LocalVar {
                ty: decl.ty,
                score,
            },
        );
    }

    pub(crate) fn emit_assign(
        &mut self,
        assign: &AssignStmt,
        scope: &mut Scope,
        buf: &mut EmitBuf,
    ) {
        let Some(var) = self.resolve_var(scope, &assign.name) else {
            self.handler.error(
                format!("unknown variable '{}'", assign.name),
                assign.span,
            );
            return;
        };
        self.emit_store(&var, assign.op, &assign.value, scope, buf);
    }

    /// Route a value into a variable's backing slot(s).
    fn emit_store(
        &mut self,
        var: &ResolvedVar,
        op: AssignOp,
        value: &Expr,
        scope: &Scope,
        buf: &mut EmitBuf,
    ) {
        if var.ty.array {
            if op != AssignOp::Assign {
                self.handler.error(
                    "arrays only support plain assignment",
                    value.span(),
                );
                return;
            }
            self.emit_array_assign(var, value, buf);
            return;
        }

        match var.ty.kind {
            VarKind::Int | VarKind::Bool => {
                if let Some(tmp) = self.lower_expr(value, scope, buf) {
                    buf.push(format!(
                        "scoreboard players operation {} vars {} {} vars",
                        var.score,
                        assign_score_op(op),
                        tmp
                    ));
                }
            },

            VarKind::Float | VarKind::Double => {
                self.emit_float_store(var, op, value, scope, buf);
            },

            VarKind::Str => {
                if op != AssignOp::Assign {
                    self.handler.error(
                        "strings only support plain assignment",
                        value.span(),
                    );
                    return;
                }
                if contains_str(value) || matches!(value, Expr::Str(..)) {
                    if let Some(text) = self.fold_static_string(value) {
                        buf.push(format!(
                            "data modify storage {} {} set value \"{}\"",
                            storage_ref(&self.ns),
                            var.storage,
                            escape_quoted(&text)
                        ));
                        return;
                    }
                }
                if let Expr::Var(name, span) = value {
                    match self.resolve_var(scope, name) {
                        Some(other) if other.ty.kind == VarKind::Str && !other.ty.array => {
                            buf.push(format!(
                                "data modify storage {} {} set from storage {} {}",
                                storage_ref(&self.ns),
                                var.storage,
                                storage_ref(&self.ns),
                                other.storage
                            ));
                            return;
                        },
                        _ => {
                            self.handler.error(
                                format!("'{}' is not a string variable", name),
                                *span,
                            );
                            return;
                        },
                    }
                }
                self.handler.error(
                    "string variables are assigned from string literals, static concatenations, or string variables",
                    value.span(),
                );
            },

            VarKind::Ent => {
                if op != AssignOp::Assign {
                    self.handler.error(
                        "entity references only support plain assignment",
                        value.span(),
                    );
                    return;
                }
                self.emit_ent_assign(var, value, buf);
            },
        }
    }

    /// Float and double slots live in storage; math happens on rounded
    /// scoreboard reads, so every non-literal path warns about the
    /// integer approximation.
    fn emit_float_store(
        &mut self,
        var: &ResolvedVar,
        op: AssignOp,
        value: &Expr,
        scope: &Scope,
        buf: &mut EmitBuf,
    ) {
        let storage_type = match var.ty.kind {
            VarKind::Float => "float",
            _ => "double",
        };
        let suffix = match var.ty.kind {
            VarKind::Float => "f",
            _ => "d",
        };

        if op == AssignOp::Assign {
            if let Expr::Number(n, _) = value {
                buf.push(format!(
                    "data modify storage {} {} set value {}{}",
                    storage_ref(&self.ns),
                    var.storage,
                    format_number(*n),
                    suffix
                ));
                return;
            }

            self.handler.warning(
                format!(
                    "assignment to {} '{}' is approximated through integer scores",
                    storage_type, var.storage
                ),
                value.span(),
            );
            if let Some(tmp) = self.lower_expr(value, scope, buf) {
                buf.push(format!(
                    "execute store result storage {} {} {} 1 run scoreboard players get {} vars",
                    storage_ref(&self.ns),
                    var.storage,
                    storage_type,
                    tmp
                ));
            }
            return;
        }

        self.handler.warning(
            format!(
                "compound assignment to {} '{}' is approximated through integer scores",
                storage_type, var.storage
            ),
            value.span(),
        );

        let current = buf.fresh_tmp();
        buf.push(format!(
            "execute store result score {} vars run data get storage {} {} 1",
            current,
            storage_ref(&self.ns),
            var.storage
        ));
        if let Some(tmp) = self.lower_expr(value, scope, buf) {
            buf.push(format!(
                "scoreboard players operation {} vars {} {} vars",
                current,
                assign_score_op(op),
                tmp
            ));
        }
        buf.push(format!(
            "execute store result storage {} {} {} 1 run scoreboard players get {} vars",
            storage_ref(&self.ns),
            var.storage,
            storage_type,
            current
        ));
    }

    /// Arrays re-initialize wholesale: remove, reset to an empty list,
    /// then write each element literal by index.
    fn emit_array_assign(&mut self, var: &ResolvedVar, value: &Expr, buf: &mut EmitBuf) {
        let Expr::Array(elements, span) = value else {
            self.handler.error(
                "arrays are only assigned from array literals",
                value.span(),
            );
            return;
        };
        let _ = span;

        buf.push(format!(
            "data remove storage {} {}",
            storage_ref(&self.ns),
            var.storage
        ));
        buf.push(format!(
            "data modify storage {} {} set value []",
            storage_ref(&self.ns),
            var.storage
        ));

        for (index, element) in elements.iter().enumerate() {
            match snbt_literal(element, var.ty.kind) {
                Some(literal) => buf.push(format!(
                    "data modify storage {} {}[{}] set value {}",
                    storage_ref(&self.ns),
                    var.storage,
                    index,
                    literal
                )),
                None => self.handler.error(
                    format!(
                        "array element {} is not a {:?} literal",
                        index, var.ty.kind
                    ),
                    element.span(),
                ),
            }
        }
    }

    // ------------------------------------------------------------------
    // Calls
    // ------------------------------------------------------------------

    fn emit_call(&mut self, call: &CallStmt, buf: &mut EmitBuf) {
        let fn_name = call.name.to_lowercase();
        let ns = match &call.pack {
            Some(prefix) => self
                .script
                .iter()
                .find(|p| p.namespace_raw == *prefix || p.namespace == prefix.to_lowercase())
                .map(|p| p.namespace.clone())
                .unwrap_or_else(|| prefix.to_lowercase()),
            None => self.ns.clone(),
        };

        if let Some(pack) = self.script.iter().find(|p| p.namespace == ns) {
            if !pack.functions.iter().any(|f| f.name == fn_name) {
                self.handler.warning(
                    format!("call to unknown function '{}:{}'", ns, fn_name),
                    call.span,
                );
            }
        }

        buf.push(format!("function {}:{}", ns, fn_name));
    }

    // ------------------------------------------------------------------
    // If-chains
    // ------------------------------------------------------------------

    /// Flatten the chain into ordered branches gated on a single-use
    /// done flag: each branch runs only while the flag is 0 and sets it
    /// to 1 afterwards, which yields first-match semantics across
    /// arbitrary `||` expansions.
    fn emit_if_chain(&mut self, if_stmt: &IfStmt, scope: &Scope, buf: &mut EmitBuf) {
        let flag = ifdone_flag(&self.ns, self.if_counter);
        self.if_counter += 1;

        buf.push(format!("scoreboard players set {} vars 0", flag));

        let mut branch = Some(if_stmt);
        while let Some(current) = branch {
            let variants = self.cond_variants(current.cond.as_ref(), current.negated, scope, buf);

            for variant in &variants {
                let mut fragments =
                    vec![format!("if score {} vars matches 0", flag)];
                fragments.extend(variant.iter().cloned());
                let prefix = guard_prefix(&fragments);

                let mark = buf.len();
                self.emit_stmts(&current.body, scope, buf);
                let body_lines = buf.drain_from(mark);
                for line in body_lines {
                    buf.push(format!("{}{}", prefix, line));
                }
                buf.push(format!(
                    "{}scoreboard players set {} vars 1",
                    prefix, flag
                ));
            }

            match current.else_branch.as_deref() {
                Some(ElseBranch::If(next)) => branch = Some(next),
                Some(ElseBranch::Else(body)) => {
                    let prefix = guard_prefix(&[format!(
                        "if score {} vars matches 0",
                        flag
                    )]);
                    let mark = buf.len();
                    self.emit_stmts(body, scope, buf);
                    let body_lines = buf.drain_from(mark);
                    for line in body_lines {
                        buf.push(format!("{}{}", prefix, line));
                    }
                    branch = None;
                },
                None => branch = None,
            }
        }
    }

    // ------------------------------------------------------------------
    // Loops
    // ------------------------------------------------------------------

    /// A for-loop lowers to an entry/step helper pair: the entry guards
    /// a call into the step on the condition; the step runs the body,
    /// the increment, then re-invokes the entry. The caller pays a
    /// single `function` command.
    fn emit_for(&mut self, for_stmt: &ForStmt, scope: &Scope, buf: &mut EmitBuf) {
        let index = self.for_counter;
        self.for_counter += 1;
        let entry_name = format!("__for_{}", index);
        let step_name = format!("__for_{}__step", index);

        let mut loop_scope = scope.clone();

        match &for_stmt.init {
            Some(ForInit::Decl(decl)) => {
                if decl.ty.array || !decl.ty.kind.is_score_backed() {
                    self.handler.error(
                        "for-loop locals must be int or bool",
                        decl.span,
                    );
                } else {
                    let score = for_local_score(&scope.fn_name, index, &decl.name);
                    let default = Expr::Number(0.0, decl.span);
                    let init_expr = decl.init.as_ref().unwrap_or(&default);
                    if let Some(tmp) = self.lower_expr(init_expr, scope, buf) {
                        buf.push(format!(
                            "scoreboard players operation {} vars = {} vars",
                            score, tmp
                        ));
                    }
                    // storage mirror for macro-argument passing
                    buf.push(format!(
                        "execute store result storage {} {} int 1 run scoreboard players get {} vars",
                        storage_ref(&self.ns),
                        decl.name,
                        score
                    ));
                    loop_scope.locals.insert(
                        decl.name.clone(),
                        LocalVar {
                            ty: decl.ty,
                            score,
                        },
                    );
                }
            },
            Some(ForInit::Assign(assign)) => {
                self.emit_assign(assign, &mut loop_scope, buf)
            },
            None => {},
        }

        buf.push(format!("function {}:{}", self.ns, entry_name));

        let mut entry_buf = EmitBuf::new();
        let variants =
            self.cond_variants(for_stmt.cond.as_ref(), false, &loop_scope, &mut entry_buf);
        for variant in &variants {
            entry_buf.push(format!(
                "{}function {}:{}",
                guard_prefix(variant),
                self.ns,
                step_name
            ));
        }
        self.files
            .upsert(function_path(&self.ns, &entry_name), entry_buf.render());

        let mut step_buf = EmitBuf::new();
        self.emit_stmts(&for_stmt.body, &loop_scope, &mut step_buf);
        if let Some(step) = &for_stmt.step {
            let mut step_scope = loop_scope.clone();
            self.emit_assign(step, &mut step_scope, &mut step_buf);
        }
        step_buf.push(format!("function {}:{}", self.ns, entry_name));
        self.files
            .upsert(function_path(&self.ns, &step_name), step_buf.render());
    }

    fn emit_while(&mut self, while_stmt: &WhileStmt, scope: &Scope, buf: &mut EmitBuf) {
        let index = self.while_counter;
        self.while_counter += 1;
        let entry_name = format!("__while_{}", index);
        let step_name = format!("__while_{}__step", index);

        buf.push(format!("function {}:{}", self.ns, entry_name));

        let mut entry_buf = EmitBuf::new();
        let variants =
            self.cond_variants(while_stmt.cond.as_ref(), false, scope, &mut entry_buf);
        for variant in &variants {
            entry_buf.push(format!(
                "{}function {}:{}",
                guard_prefix(variant),
                self.ns,
                step_name
            ));
        }
        self.files
            .upsert(function_path(&self.ns, &entry_name), entry_buf.render());

        let mut step_buf = EmitBuf::new();
        self.emit_stmts(&while_stmt.body, scope, &mut step_buf);
        step_buf.push(format!("function {}:{}", self.ns, entry_name));
        self.files
            .upsert(function_path(&self.ns, &step_name), step_buf.render());
    }
}

/// SNBT literal for one array element, checked against the element
/// kind.
fn snbt_literal(expr: &Expr, kind: VarKind) -> Option<String> {
    match (kind, expr) {
        (VarKind::Int, Expr::Number(n, _)) => Some(format!("{}", *n as i64)),
        (VarKind::Float, Expr::Number(n, _)) => Some(format!("{}f", format_number(*n))),
        (VarKind::Double, Expr::Number(n, _)) => Some(format!("{}d", format_number(*n))),
        (VarKind::Bool, Expr::Number(n, _)) if *n == 0.0 || *n == 1.0 => {
            Some(format!("{}b", *n as i64))
        },
        (VarKind::Str, Expr::Str(s, _)) => Some(format!("\"{}\"", escape_quoted(s))),
        (VarKind::Ent, Expr::Str(s, _)) => Some(format!("\"{}\"", escape_quoted(s))),
        _ => None,
    }
}
