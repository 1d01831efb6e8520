//! Macro-string lowering, the dynamic command runner, and entity
//! binders.
//!
//! A macro string carries `{name}` placeholders. Lowering rewrites each
//! placeholder to the `$(name)` macro form, syncs every referenced
//! score-backed variable into storage, synthesizes a one-line
//! `__macro_<N>` wrapper function, and invokes it with the pack's
//! variable storage as the macro source.

use dplc_par::Expr;
use dplc_util::Span;

use crate::expr::{entity_selector, normalize_selector};
use crate::files::EmitBuf;
use crate::names::{escape_quoted, function_path, storage_ref};
use crate::{PackCtx, ResolvedVar, Scope};

/// Rewrite `{name}` placeholders to `$(name)` and collect the
/// referenced names in first-use order.
pub(crate) fn rewrite_placeholders(template: &str) -> (String, Vec<String>) {
    let mut rewritten = String::with_capacity(template.len());
    let mut names: Vec<String> = Vec::new();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '{' {
            rewritten.push(c);
            continue;
        }

        let mut name = String::new();
        let mut closed = false;
        for inner in chars.by_ref() {
            if inner == '}' {
                closed = true;
                break;
            }
            name.push(inner);
        }

        if closed && !name.is_empty() {
            rewritten.push_str("$(");
            rewritten.push_str(&name);
            rewritten.push(')');
            if !names.contains(&name) {
                names.push(name);
            }
        } else {
            // unclosed or empty braces pass through untouched
            rewritten.push('{');
            rewritten.push_str(&name);
            if closed {
                rewritten.push('}');
            }
        }
    }

    (rewritten, names)
}

impl<'a> PackCtx<'a> {
    /// Lower one macro command: sync referenced scores to storage,
    /// synthesize the wrapper, and emit the macro dispatch at the call
    /// site.
    pub(crate) fn emit_macro_call(
        &mut self,
        command: &str,
        span: Span,
        scope: &Scope,
        buf: &mut EmitBuf,
    ) {
        let (rewritten, names) = rewrite_placeholders(command);

        for name in &names {
            match self.resolve_var(scope, name) {
                Some(var) if !var.ty.array && var.ty.kind.is_score_backed() => {
                    buf.push(format!(
                        "execute store result storage {} {} int 1 run scoreboard players get {} vars",
                        storage_ref(&self.ns),
                        var.storage,
                        var.score
                    ));
                },
                Some(_) => {
                    // storage-backed kinds are already readable by name
                },
                None => {
                    self.handler.warning(
                        format!("unknown variable '{}' in macro string", name),
                        span,
                    );
                },
            }
        }

        let index = self.macro_counter;
        self.macro_counter += 1;
        let wrapper = format!("__macro_{}", index);

        self.files.upsert(
            function_path(&self.ns, &wrapper),
            format!("${}\n", rewritten),
        );
        buf.push(format!(
            "function {}:{} with storage {}",
            self.ns,
            wrapper,
            storage_ref(&self.ns)
        ));
    }

    /// Make sure the dynamic command runner exists. Its single macro
    /// line expands whatever command was copied under `__cmd`.
    pub(crate) fn ensure_run_cmd(&mut self) {
        let path = function_path(&self.ns, "__run_cmd");
        if !self.files.contains(&path) {
            self.files.upsert(path, "$$(__cmd)\n".to_string());
        }
    }

    /// Assign an entity reference: store the normalized selector, then
    /// run the per-variable binder macro as the selected entity so the
    /// bound UUID lands in storage.
    pub(crate) fn emit_ent_assign(
        &mut self,
        var: &ResolvedVar,
        value: &Expr,
        buf: &mut EmitBuf,
    ) {
        let selector = match value {
            Expr::Call { .. } => entity_selector(value),
            Expr::Str(s, _) if !s.starts_with('$') => Some(normalize_selector(s)),
            _ => None,
        };
        let Some(selector) = selector else {
            self.handler.error(
                "Ent variables are assigned from Ent.Get(…) or a selector string",
                value.span(),
            );
            return;
        };

        buf.push(format!(
            "data modify storage {} {} set value \"{}\"",
            storage_ref(&self.ns),
            var.storage,
            escape_quoted(&selector)
        ));

        let binder = format!("__ent_bind_{}", var.storage);
        let path = function_path(&self.ns, &binder);
        if !self.files.contains(&path) {
            self.files.upsert(
                path,
                format!(
                    "$data merge storage {} {{{}:{{uuid:\"$(UUID)\"}}}}\n",
                    storage_ref(&self.ns),
                    var.storage
                ),
            );
        }

        buf.push(format!(
            "execute as {} run function {}:{} with entity @s",
            selector, self.ns, binder
        ));
    }
}
