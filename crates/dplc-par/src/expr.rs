//! Expression and condition parsing.
//!
//! Expressions: additive over multiplicative over unary over primary,
//! with postfix dotted calls. Conditions: `||` over `&&` over
//! comparisons, with bare string literals becoming raw guards.

use dplc_lex::TokenKind;

use crate::ast::*;
use crate::Parser;

impl<'a> Parser<'a> {
    /// Parse an expression.
    pub(crate) fn parse_expr(&mut self) -> Option<Expr> {
        self.parse_additive()
    }

    fn parse_additive(&mut self) -> Option<Expr> {
        let mut lhs = self.parse_multiplicative()?;

        loop {
            let op = match self.kind() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_multiplicative()?;
            let span = lhs.span().to(rhs.span());
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                span,
            };
        }

        Some(lhs)
    }

    fn parse_multiplicative(&mut self) -> Option<Expr> {
        let mut lhs = self.parse_unary()?;

        loop {
            let op = match self.kind() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::Percent => BinOp::Mod,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_unary()?;
            let span = lhs.span().to(rhs.span());
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                span,
            };
        }

        Some(lhs)
    }

    /// A leading minus lowers to `0 - e`.
    fn parse_unary(&mut self) -> Option<Expr> {
        if self.kind() == TokenKind::Minus {
            let span = self.current_span();
            self.advance();
            let operand = self.parse_unary()?;
            let span = span.to(operand.span());
            return Some(Expr::Binary {
                op: BinOp::Sub,
                lhs: Box::new(Expr::Number(0.0, span)),
                rhs: Box::new(operand),
                span,
            });
        }
        self.parse_postfix()
    }

    /// Parse a primary followed by postfix dotted calls and members.
    ///
    /// A postfix call (`e.GetData(f)`) becomes a call with the object as
    /// the first argument; bare dotted access becomes a member.
    fn parse_postfix(&mut self) -> Option<Expr> {
        let mut expr = self.parse_primary()?;

        while self.kind() == TokenKind::Dot {
            self.advance();
            let name = self.expect_ident()?;

            if self.match_kind(TokenKind::LParen) {
                let mut args = vec![expr];
                args.extend(self.parse_call_args()?);
                let span = args[0].span().to(self.current_span());
                expr = Expr::Call {
                    target: None,
                    name,
                    args,
                    span,
                };
            } else {
                let span = expr.span().to(self.current_span());
                expr = Expr::Member {
                    object: Box::new(expr),
                    name,
                    span,
                };
            }
        }

        Some(expr)
    }

    fn parse_primary(&mut self) -> Option<Expr> {
        let span = self.current_span();

        match self.kind() {
            TokenKind::Number => {
                let value = self.value().parse::<f64>().unwrap_or(0.0);
                self.advance();
                Some(Expr::Number(value, span))
            },
            TokenKind::Str | TokenKind::MacroStr => {
                let value = self.value().to_string();
                self.advance();
                Some(Expr::Str(value, span))
            },
            TokenKind::Ident => self.parse_ident_expr(),
            TokenKind::LBracket => {
                self.advance();
                let mut elements = Vec::new();
                while !self.is_at_end() && self.kind() != TokenKind::RBracket {
                    elements.push(self.parse_expr()?);
                    if !self.match_kind(TokenKind::Comma) {
                        break;
                    }
                }
                self.expect(TokenKind::RBracket)?;
                Some(Expr::Array(elements, span))
            },
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Some(inner)
            },
            _ => {
                self.error(format!(
                    "expected expression, found {}",
                    self.describe_current()
                ));
                None
            },
        }
    }

    /// Parse an identifier-headed primary: bool literal, call (with a
    /// dotted receiver split off the identifier text), member, or plain
    /// variable reference.
    fn parse_ident_expr(&mut self) -> Option<Expr> {
        let span = self.current_span();
        let name = self.value().to_string();
        self.advance();

        match name.as_str() {
            "true" => return Some(Expr::Number(1.0, span)),
            "false" => return Some(Expr::Number(0.0, span)),
            _ => {},
        }

        if self.match_kind(TokenKind::LParen) {
            let args = self.parse_call_args()?;
            let (target, call_name) = match name.rsplit_once('.') {
                Some((target, call_name)) => {
                    (Some(target.to_string()), call_name.to_string())
                },
                None => (None, name),
            };
            return Some(Expr::Call {
                target,
                name: call_name,
                args,
                span,
            });
        }

        if let Some((object, member)) = name.rsplit_once('.') {
            return Some(Expr::Member {
                object: Box::new(Expr::Var(object.to_string(), span)),
                name: member.to_string(),
                span,
            });
        }

        Some(Expr::Var(name, span))
    }

    /// Parse comma-separated call arguments, consuming the closing
    /// paren.
    fn parse_call_args(&mut self) -> Option<Vec<Expr>> {
        let mut args = Vec::new();

        while !self.is_at_end() && self.kind() != TokenKind::RParen {
            args.push(self.parse_expr()?);
            if !self.match_kind(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;

        Some(args)
    }

    // ------------------------------------------------------------------
    // Conditions
    // ------------------------------------------------------------------

    /// Parse a condition. Returns `None` for a null condition (an error
    /// has been reported); callers treat that as always true.
    pub(crate) fn parse_cond(&mut self) -> Option<Cond> {
        self.parse_cond_or()
    }

    fn parse_cond_or(&mut self) -> Option<Cond> {
        let mut lhs = self.parse_cond_and()?;

        while self.match_kind(TokenKind::OrOr) {
            let rhs = self.parse_cond_and()?;
            lhs = Cond::Bool {
                op: BoolOp::Or,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }

        Some(lhs)
    }

    fn parse_cond_and(&mut self) -> Option<Cond> {
        let mut lhs = self.parse_cond_cmp()?;

        while self.match_kind(TokenKind::AndAnd) {
            let rhs = self.parse_cond_cmp()?;
            lhs = Cond::Bool {
                op: BoolOp::And,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }

        Some(lhs)
    }

    /// Parse a comparison, or a bare string literal as a raw guard.
    fn parse_cond_cmp(&mut self) -> Option<Cond> {
        let span = self.current_span();

        if matches!(self.kind(), TokenKind::Str | TokenKind::MacroStr) {
            let raw = self.value().to_string();
            self.advance();
            return Some(Cond::Raw(raw, span));
        }

        let lhs = self.parse_expr()?;

        let op = match self.kind() {
            TokenKind::EqEq => CmpOp::Eq,
            TokenKind::NotEq => CmpOp::Ne,
            TokenKind::Lt => CmpOp::Lt,
            TokenKind::LtEq => CmpOp::Le,
            TokenKind::Gt => CmpOp::Gt,
            TokenKind::GtEq => CmpOp::Ge,
            _ => {
                self.error(format!(
                    "expected comparison operator, found {}",
                    self.describe_current()
                ));
                return None;
            },
        };
        self.advance();

        let rhs = self.parse_expr()?;
        let span = span.to(rhs.span());

        Some(Cond::Compare {
            op,
            lhs,
            rhs,
            span,
        })
    }
}
