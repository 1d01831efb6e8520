//! Statement parsing: say/run, declarations, assignments, calls,
//! if/unless chains, execute blocks, and loops.

use dplc_lex::TokenKind;
use dplc_util::Span;

use crate::ast::*;
use crate::Parser;

/// Declarations that may only appear at pack level.
fn is_pack_only_decl(name: &str) -> bool {
    matches!(name, "func" | "Item" | "recipe" | "adv" | "BlockTag" | "ItemTag")
}

impl<'a> Parser<'a> {
    /// Parse a braced statement body.
    pub(crate) fn parse_block(&mut self) -> Option<Vec<Stmt>> {
        self.expect(TokenKind::LBrace)?;

        let mut stmts = Vec::new();
        while !self.is_at_end() && self.kind() != TokenKind::RBrace {
            if self.kind() == TokenKind::Ident && is_pack_only_decl(self.value()) {
                self.error(format!(
                    "'{}' declarations are not allowed inside function bodies",
                    self.value()
                ));
                self.skip_balanced_block();
                continue;
            }

            match self.parse_stmt() {
                Some(stmt) => stmts.push(stmt),
                None => self.recover_in_block(),
            }
        }
        self.expect(TokenKind::RBrace)?;

        Some(stmts)
    }

    /// Parse a single statement.
    pub(crate) fn parse_stmt(&mut self) -> Option<Stmt> {
        let span = self.current_span();

        if self.kind() != TokenKind::Ident {
            self.error(format!(
                "expected statement, found {}",
                self.describe_current()
            ));
            return None;
        }

        if self.value().eq_ignore_ascii_case("say") && self.peek_kind(1) == TokenKind::LParen {
            return self.parse_say_or_run(span, true);
        }
        if self.value().eq_ignore_ascii_case("run") && self.peek_kind(1) == TokenKind::LParen {
            return self.parse_say_or_run(span, false);
        }

        match self.value() {
            "if" => return self.parse_if_stmt(false).map(Stmt::If),
            "unless" => return self.parse_if_stmt(true).map(Stmt::If),
            "execute" => return self.parse_execute_stmt(),
            "for" => return self.parse_for_stmt(),
            "while" => return self.parse_while_stmt(),
            _ => {},
        }

        let base = self.value().strip_suffix("[]").unwrap_or(self.value());
        if VarKind::from_name(base).is_some() {
            return self.parse_local_decl(span);
        }

        self.parse_assign_or_call(span)
    }

    /// Parse `Say(expr)` / `Run(expr)`.
    fn parse_say_or_run(&mut self, span: Span, is_say: bool) -> Option<Stmt> {
        self.advance();
        self.expect(TokenKind::LParen)?;
        let arg = match self.parse_expr() {
            Some(expr) => expr,
            None => {
                self.skip_to_close_paren();
                self.expect(TokenKind::RParen);
                return None;
            },
        };
        self.expect(TokenKind::RParen)?;
        self.match_kind(TokenKind::Semicolon);

        Some(if is_say {
            Stmt::Say(arg, span)
        } else {
            Stmt::Run(arg, span)
        })
    }

    /// Parse a typed local declaration.
    fn parse_local_decl(&mut self, span: Span) -> Option<Stmt> {
        let ty = self.parse_type()?;
        let name = self.expect_ident()?;

        let init = if self.match_kind(TokenKind::Eq) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.match_kind(TokenKind::Semicolon);

        Some(Stmt::VarDecl(VarDeclStmt {
            name,
            ty,
            init,
            span,
        }))
    }

    /// Parse an assignment or a (possibly pack-qualified) call starting
    /// at an identifier.
    fn parse_assign_or_call(&mut self, span: Span) -> Option<Stmt> {
        let name = self.value().to_string();
        self.advance();

        if self.kind() == TokenKind::LParen {
            self.advance();
            if self.kind() != TokenKind::RParen {
                self.error("user functions take no arguments");
                self.skip_to_close_paren();
            }
            self.expect(TokenKind::RParen)?;
            self.match_kind(TokenKind::Semicolon);

            // A dotted callee is a pack-qualified call.
            let (pack, fn_name) = match name.rsplit_once('.') {
                Some((pack, fn_name)) => (Some(pack.to_string()), fn_name.to_string()),
                None => (None, name),
            };
            return Some(Stmt::Call(CallStmt {
                pack,
                name: fn_name,
                span,
            }));
        }

        let assign = self.parse_assign_after_name(name, span)?;
        self.match_kind(TokenKind::Semicolon);
        Some(Stmt::Assign(assign))
    }

    /// Parse the assignment tail after the target name has been
    /// consumed: `=`, compound ops, `++`, `--`.
    fn parse_assign_after_name(&mut self, name: String, span: Span) -> Option<AssignStmt> {
        let op = match self.kind() {
            TokenKind::Eq => AssignOp::Assign,
            TokenKind::PlusEq => AssignOp::Add,
            TokenKind::MinusEq => AssignOp::Sub,
            TokenKind::StarEq => AssignOp::Mul,
            TokenKind::SlashEq => AssignOp::Div,
            TokenKind::PercentEq => AssignOp::Mod,
            TokenKind::PlusPlus => {
                self.advance();
                return Some(AssignStmt {
                    name,
                    op: AssignOp::Add,
                    value: Expr::Number(1.0, span),
                    span,
                });
            },
            TokenKind::MinusMinus => {
                self.advance();
                return Some(AssignStmt {
                    name,
                    op: AssignOp::Sub,
                    value: Expr::Number(1.0, span),
                    span,
                });
            },
            _ => {
                self.error(format!(
                    "expected assignment or call after '{}', found {}",
                    name,
                    self.describe_current()
                ));
                return None;
            },
        };
        self.advance();

        let value = self.parse_expr()?;
        Some(AssignStmt {
            name,
            op,
            value,
            span,
        })
    }

    /// Parse `if(cond) { … }` / `unless(cond) { … }` with optional
    /// chained else.
    fn parse_if_stmt(&mut self, negated: bool) -> Option<IfStmt> {
        let span = self.current_span();
        self.advance(); // 'if' / 'unless'

        self.expect(TokenKind::LParen)?;
        let cond = self.parse_cond();
        if cond.is_none() {
            // Null condition: recover to the closing paren; downstream
            // treats it as always true.
            self.skip_to_close_paren();
        }
        self.expect(TokenKind::RParen)?;

        let body = self.parse_block()?;

        let else_branch = if self.match_kw("else") {
            if self.is_kw("if") {
                Some(Box::new(ElseBranch::If(self.parse_if_stmt(false)?)))
            } else if self.is_kw("unless") {
                Some(Box::new(ElseBranch::If(self.parse_if_stmt(true)?)))
            } else {
                Some(Box::new(ElseBranch::Else(self.parse_block()?)))
            }
        } else {
            None
        };

        Some(IfStmt {
            negated,
            cond,
            body,
            else_branch,
            span,
        })
    }

    /// Parse `execute(<modifiers>) { … }`.
    ///
    /// Modifiers are comma-separated; `or` closes the current variant
    /// and begins a new one. An empty argument list normalizes to a
    /// single empty variant.
    fn parse_execute_stmt(&mut self) -> Option<Stmt> {
        let span = self.current_span();
        self.advance(); // 'execute'

        self.expect(TokenKind::LParen)?;

        let mut variants = Vec::new();
        let mut current = Vec::new();

        while !self.is_at_end() && self.kind() != TokenKind::RParen {
            if self.match_kind(TokenKind::Comma) {
                continue;
            }
            if self.is_kw("or") {
                self.advance();
                variants.push(std::mem::take(&mut current));
                continue;
            }
            if self.match_kw("as") {
                if let Some(selector) = self.expect_id_like() {
                    current.push(ExecMod::As(selector));
                }
                continue;
            }
            if self.match_kw("at") {
                if let Some(selector) = self.expect_id_like() {
                    current.push(ExecMod::At(selector));
                }
                continue;
            }
            if self.match_kw("positioned") {
                let x = self.parse_coord();
                let y = self.parse_coord();
                let z = self.parse_coord();
                current.push(ExecMod::Positioned(x, y, z));
                continue;
            }

            self.error(format!(
                "unknown execute modifier {}",
                self.describe_current()
            ));
            self.advance();
        }
        variants.push(current);

        self.expect(TokenKind::RParen)?;
        let body = self.parse_block()?;

        Some(Stmt::Execute(ExecuteStmt {
            variants,
            body,
            span,
        }))
    }

    /// Parse one coordinate of a `positioned` modifier: a number or a
    /// relative/local form (`~`, `~3`, `^1`), which lexes as an
    /// identifier.
    fn parse_coord(&mut self) -> String {
        match self.kind() {
            TokenKind::Number | TokenKind::Ident => {
                let value = self.value().to_string();
                self.advance();
                value
            },
            _ => {
                self.error(format!(
                    "expected coordinate, found {}",
                    self.describe_current()
                ));
                "~".to_string()
            },
        }
    }

    /// Parse `for(init | cond | step) { … }`.
    fn parse_for_stmt(&mut self) -> Option<Stmt> {
        let span = self.current_span();
        self.advance(); // 'for'

        self.expect(TokenKind::LParen)?;

        let init = if self.kind() == TokenKind::Pipe {
            None
        } else {
            self.parse_for_init()
        };
        self.expect(TokenKind::Pipe)?;

        let cond = if self.kind() == TokenKind::Pipe {
            None
        } else {
            let cond = self.parse_cond();
            if cond.is_none() {
                self.skip_to_pipe_or_close();
            }
            cond
        };
        self.expect(TokenKind::Pipe)?;

        let step = if self.kind() == TokenKind::RParen {
            None
        } else {
            let step_span = self.current_span();
            match self.expect_ident() {
                Some(name) => self.parse_assign_after_name(name, step_span),
                None => None,
            }
        };
        self.expect(TokenKind::RParen)?;

        let body = self.parse_block()?;

        Some(Stmt::For(Box::new(ForStmt {
            init,
            cond,
            step,
            body,
            span,
        })))
    }

    /// Parse the for-loop initializer: a typed local declaration or an
    /// assignment.
    fn parse_for_init(&mut self) -> Option<ForInit> {
        let span = self.current_span();

        if self.kind() != TokenKind::Ident {
            self.error(format!(
                "expected for-loop initializer, found {}",
                self.describe_current()
            ));
            return None;
        }

        let base = self.value().strip_suffix("[]").unwrap_or(self.value());
        if VarKind::from_name(base).is_some() {
            let ty = self.parse_type()?;
            let name = self.expect_ident()?;
            let init = if self.match_kind(TokenKind::Eq) {
                Some(self.parse_expr()?)
            } else {
                None
            };
            return Some(ForInit::Decl(VarDeclStmt {
                name,
                ty,
                init,
                span,
            }));
        }

        let name = self.expect_ident()?;
        self.parse_assign_after_name(name, span).map(ForInit::Assign)
    }

    /// Parse `while(cond) { … }`.
    fn parse_while_stmt(&mut self) -> Option<Stmt> {
        let span = self.current_span();
        self.advance(); // 'while'

        self.expect(TokenKind::LParen)?;
        let cond = self.parse_cond();
        if cond.is_none() {
            self.skip_to_close_paren();
        }
        self.expect(TokenKind::RParen)?;

        let body = self.parse_block()?;

        Some(Stmt::While(WhileStmt { cond, body, span }))
    }

    /// Skip to (not past) the closing paren of the current group.
    pub(crate) fn skip_to_close_paren(&mut self) {
        let mut depth = 0usize;
        while !self.is_at_end() {
            match self.kind() {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                },
                TokenKind::LBrace => return,
                _ => {},
            }
            self.advance();
        }
    }

    /// Skip to (not past) the next `|` at this depth or the closing
    /// paren, whichever comes first. Used by for-header recovery.
    fn skip_to_pipe_or_close(&mut self) {
        let mut depth = 0usize;
        while !self.is_at_end() {
            match self.kind() {
                TokenKind::Pipe if depth == 0 => return,
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                },
                TokenKind::LBrace => return,
                _ => {},
            }
            self.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dplc_util::Handler;

    fn parse_body(body: &str) -> Vec<Stmt> {
        let source = format!("pack \"p\" namespace n {{ func F() {{ {} }} }}", body);
        let handler = Handler::new();
        let tokens = dplc_lex::lex(&source, &handler);
        let script = crate::parse(tokens, &handler).expect("no AST");
        assert!(
            !handler.has_errors(),
            "parse errors: {:?}",
            handler.diagnostics()
        );
        script[0].functions[0].body.clone()
    }

    #[test]
    fn test_say_statement() {
        let body = parse_body("Say(\"Hi\")");
        assert!(matches!(&body[0], Stmt::Say(Expr::Str(s, _), _) if s == "Hi"));
    }

    #[test]
    fn test_compound_assignment() {
        let body = parse_body("x += 3;");
        let Stmt::Assign(assign) = &body[0] else {
            panic!("expected assignment");
        };
        assert_eq!(assign.name, "x");
        assert_eq!(assign.op, AssignOp::Add);
    }

    #[test]
    fn test_increment_parses_as_plus_one() {
        let body = parse_body("x++;");
        let Stmt::Assign(assign) = &body[0] else {
            panic!("expected assignment");
        };
        assert_eq!(assign.op, AssignOp::Add);
        assert!(matches!(assign.value, Expr::Number(n, _) if n == 1.0));
    }

    #[test]
    fn test_call_and_qualified_call() {
        let body = parse_body("Helper() Other.Start()");
        let Stmt::Call(plain) = &body[0] else {
            panic!("expected call");
        };
        assert_eq!(plain.pack, None);
        assert_eq!(plain.name, "Helper");

        let Stmt::Call(qualified) = &body[1] else {
            panic!("expected call");
        };
        assert_eq!(qualified.pack.as_deref(), Some("Other"));
        assert_eq!(qualified.name, "Start");
    }

    #[test]
    fn test_if_else_chain() {
        let body = parse_body(
            "if(a == 1) { Say(\"one\") } else if(a == 2) { Say(\"two\") } else { Say(\"other\") }",
        );
        let Stmt::If(if_stmt) = &body[0] else {
            panic!("expected if");
        };
        assert!(!if_stmt.negated);
        let ElseBranch::If(second) = if_stmt.else_branch.as_deref().unwrap() else {
            panic!("expected else-if");
        };
        assert!(matches!(
            second.else_branch.as_deref(),
            Some(ElseBranch::Else(_))
        ));
    }

    #[test]
    fn test_unless_sets_negated() {
        let body = parse_body("unless(a == 1) { Say(\"x\") }");
        let Stmt::If(if_stmt) = &body[0] else {
            panic!("expected if");
        };
        assert!(if_stmt.negated);
    }

    #[test]
    fn test_execute_variants() {
        let body = parse_body(
            "execute(as @e[type=cow], at @s or as @a, positioned 0 64 0) { Say(\"x\") }",
        );
        let Stmt::Execute(exec) = &body[0] else {
            panic!("expected execute");
        };
        assert_eq!(exec.variants.len(), 2);
        assert_eq!(
            exec.variants[0],
            vec![
                ExecMod::As("@e[type=cow]".to_string()),
                ExecMod::At("@s".to_string())
            ]
        );
        assert_eq!(
            exec.variants[1],
            vec![
                ExecMod::As("@a".to_string()),
                ExecMod::Positioned("0".to_string(), "64".to_string(), "0".to_string())
            ]
        );
    }

    #[test]
    fn test_empty_execute_normalizes_to_one_variant() {
        let body = parse_body("execute() { Say(\"x\") }");
        let Stmt::Execute(exec) = &body[0] else {
            panic!("expected execute");
        };
        assert_eq!(exec.variants.len(), 1);
        assert!(exec.variants[0].is_empty());
    }

    #[test]
    fn test_for_loop_header() {
        let body = parse_body("for(int i = 0 | i < 3 | i++) { Say(i) }");
        let Stmt::For(for_stmt) = &body[0] else {
            panic!("expected for");
        };
        assert!(matches!(for_stmt.init, Some(ForInit::Decl(_))));
        assert!(for_stmt.cond.is_some());
        assert_eq!(for_stmt.step.as_ref().unwrap().op, AssignOp::Add);
    }

    #[test]
    fn test_while_loop() {
        let body = parse_body("while(x > 0) { x -= 1; }");
        let Stmt::While(while_stmt) = &body[0] else {
            panic!("expected while");
        };
        assert!(while_stmt.cond.is_some());
        assert_eq!(while_stmt.body.len(), 1);
    }

    #[test]
    fn test_nested_declaration_in_body_is_dropped() {
        let source =
            "pack \"p\" namespace n { func F() { recipe bad { result x; } Say(\"ok\") } }";
        let handler = Handler::new();
        let tokens = dplc_lex::lex(source, &handler);
        let script = crate::parse(tokens, &handler).expect("no AST");
        assert!(handler.has_errors());
        let body = &script[0].functions[0].body;
        assert_eq!(body.len(), 1);
        assert!(matches!(body[0], Stmt::Say(..)));
    }

    #[test]
    fn test_missing_comparison_yields_null_condition() {
        let source = "pack \"p\" namespace n { func F() { if(x) { Say(\"a\") } } }";
        let handler = Handler::new();
        let tokens = dplc_lex::lex(source, &handler);
        let script = crate::parse(tokens, &handler).expect("no AST");
        assert!(handler.has_errors());
        let Stmt::If(if_stmt) = &script[0].functions[0].body[0] else {
            panic!("expected if");
        };
        assert!(if_stmt.cond.is_none());
        assert_eq!(if_stmt.body.len(), 1);
    }
}
