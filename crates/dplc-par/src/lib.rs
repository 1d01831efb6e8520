//! dplc-par - Parser for DPL.
//!
//! Recursive descent over the token stream from `dplc-lex`, producing a
//! typed [`Script`]. Expressions use precedence climbing (additive over
//! multiplicative over unary over primary); conditions layer `||` over
//! `&&` over comparisons.
//!
//! Errors are site-local where possible: after recording a diagnostic
//! the parser skips to the next semicolon or matching closing brace and
//! keeps going. Only a stream with no well-formed pack at all is
//! catastrophic and yields no AST.
//!
//! # Examples
//!
//! ```
//! use dplc_par::parse;
//! use dplc_util::Handler;
//!
//! let handler = Handler::new();
//! let tokens = dplc_lex::lex("pack \"p\" namespace n { }", &handler);
//! let script = parse(tokens, &handler).unwrap();
//!
//! assert_eq!(script.len(), 1);
//! assert_eq!(script[0].namespace, "n");
//! ```

pub mod ast;
mod expr;
mod items;
mod stmt;

pub use ast::*;

use dplc_lex::{Token, TokenKind};
use dplc_util::{Handler, Span};

/// Parse a token stream into a script.
///
/// Returns `None` only for catastrophic failures (no pack could be
/// recognized at all); local errors are reported through `handler` and
/// recovery continues.
pub fn parse(tokens: Vec<Token>, handler: &Handler) -> Option<Script> {
    let had_input = tokens.len() > 1;
    let mut parser = Parser::new(tokens, handler);
    let script = parser.parse_script();

    if script.is_empty() && had_input {
        return None;
    }
    Some(script)
}

/// Recursive descent parser.
pub struct Parser<'a> {
    /// Token stream from the lexer, terminated by Eof.
    tokens: Vec<Token>,

    /// Current position in the token stream.
    position: usize,

    /// Diagnostic sink.
    handler: &'a Handler,
}

impl<'a> Parser<'a> {
    /// Create a new parser over `tokens`.
    pub fn new(tokens: Vec<Token>, handler: &'a Handler) -> Self {
        let tokens = if tokens.is_empty() {
            vec![Token::new(TokenKind::Eof, "", Span::DUMMY)]
        } else {
            tokens
        };
        Self {
            tokens,
            position: 0,
            handler,
        }
    }

    /// Parse the whole program: a sequence of packs.
    pub fn parse_script(&mut self) -> Script {
        let mut script = Vec::new();

        while !self.is_at_end() {
            if self.is_kw("pack") {
                if let Some(pack) = self.parse_pack() {
                    script.push(pack);
                }
            } else {
                self.error(format!(
                    "expected 'pack' at top level, found {}",
                    self.describe_current()
                ));
                self.recover_to_top_level();
            }
        }

        script
    }

    // ------------------------------------------------------------------
    // Token helpers
    // ------------------------------------------------------------------

    pub(crate) fn current(&self) -> &Token {
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    pub(crate) fn kind(&self) -> TokenKind {
        self.current().kind
    }

    pub(crate) fn value(&self) -> &str {
        &self.current().value
    }

    pub(crate) fn current_span(&self) -> Span {
        self.current().span
    }

    pub(crate) fn peek_kind(&self, offset: usize) -> TokenKind {
        let pos = (self.position + offset).min(self.tokens.len() - 1);
        self.tokens[pos].kind
    }

    pub(crate) fn advance(&mut self) {
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.kind() == TokenKind::Eof
    }

    /// Consume and return the current token if it has the given kind.
    pub(crate) fn expect(&mut self, expected: TokenKind) -> Option<Token> {
        if self.kind() == expected {
            let token = self.current().clone();
            self.advance();
            Some(token)
        } else {
            self.error(format!(
                "expected {}, found {}",
                expected,
                self.describe_current()
            ));
            None
        }
    }

    /// Consume the current token if it has the given kind.
    pub(crate) fn match_kind(&mut self, expected: TokenKind) -> bool {
        if self.kind() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    /// True when the current token is an identifier with exactly this
    /// text.
    pub(crate) fn is_kw(&self, keyword: &str) -> bool {
        self.kind() == TokenKind::Ident && self.value() == keyword
    }

    /// Consume an identifier with exactly this text.
    pub(crate) fn match_kw(&mut self, keyword: &str) -> bool {
        if self.is_kw(keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume any identifier and return its text.
    pub(crate) fn expect_ident(&mut self) -> Option<String> {
        if self.kind() == TokenKind::Ident {
            let value = self.value().to_string();
            self.advance();
            Some(value)
        } else {
            self.error(format!(
                "expected identifier, found {}",
                self.describe_current()
            ));
            None
        }
    }

    /// Consume a string or identifier token; both are accepted where a
    /// resource id is expected.
    pub(crate) fn expect_id_like(&mut self) -> Option<String> {
        match self.kind() {
            TokenKind::Ident | TokenKind::Str => {
                let value = self.value().to_string();
                self.advance();
                Some(value)
            },
            _ => {
                self.error(format!(
                    "expected identifier or string, found {}",
                    self.describe_current()
                ));
                None
            },
        }
    }

    pub(crate) fn describe_current(&self) -> String {
        match self.kind() {
            TokenKind::Ident => format!("'{}'", self.value()),
            TokenKind::Number => format!("number '{}'", self.value()),
            TokenKind::Str | TokenKind::MacroStr => "string literal".to_string(),
            kind => format!("{}", kind),
        }
    }

    // ------------------------------------------------------------------
    // Diagnostics and recovery
    // ------------------------------------------------------------------

    pub(crate) fn error(&self, message: impl Into<String>) {
        self.handler.error(message, self.current_span());
    }

    pub(crate) fn warning(&self, message: impl Into<String>) {
        self.handler.warning(message, self.current_span());
    }

    /// Skip to the next statement boundary inside a braced body: past
    /// the next semicolon at this depth, or to (not past) the matching
    /// closing brace.
    pub(crate) fn recover_in_block(&mut self) {
        let mut depth = 0usize;

        while !self.is_at_end() {
            match self.kind() {
                TokenKind::Semicolon if depth == 0 => {
                    self.advance();
                    return;
                },
                TokenKind::LBrace => {
                    depth += 1;
                    self.advance();
                },
                TokenKind::RBrace => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                    self.advance();
                },
                _ => self.advance(),
            }
        }
    }

    /// Skip forward until the next top-level `pack` keyword.
    pub(crate) fn recover_to_top_level(&mut self) {
        let mut depth = 0usize;

        while !self.is_at_end() {
            match self.kind() {
                TokenKind::LBrace => {
                    depth += 1;
                    self.advance();
                },
                TokenKind::RBrace => {
                    depth = depth.saturating_sub(1);
                    self.advance();
                },
                TokenKind::Ident if depth == 0 && self.value() == "pack" => return,
                _ => self.advance(),
            }
        }
    }

    /// Consume a balanced `{ … }` without interpreting it. Used to drop
    /// declarations that are disallowed in the current position.
    pub(crate) fn skip_balanced_block(&mut self) {
        while !self.is_at_end() && self.kind() != TokenKind::LBrace {
            if self.kind() == TokenKind::Semicolon {
                self.advance();
                return;
            }
            self.advance();
        }
        if !self.match_kind(TokenKind::LBrace) {
            return;
        }

        let mut depth = 1usize;
        while !self.is_at_end() && depth > 0 {
            match self.kind() {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => depth -= 1,
                _ => {},
            }
            self.advance();
        }
    }
}
