//! Lexer for the DPL source language.
//!
//! Single left-to-right pass over the source. The dispatch lives here;
//! the per-concern lexing methods are split across the sibling modules
//! (`identifier`, `number`, `string`, `operator`).

mod identifier;
mod number;
mod operator;
mod string;

pub(crate) use identifier::is_ident_start;

use dplc_util::{Handler, Span};

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};

/// Lexer for DPL source code.
///
/// Transforms source text into a stream of tokens, reporting lexical
/// errors through the shared [`Handler`]. Any reported error is fatal to
/// the compilation; the driver checks the handler after lexing.
pub struct Lexer<'a> {
    /// Character cursor for source traversal.
    pub(crate) cursor: Cursor<'a>,

    /// Sink for lexical errors.
    handler: &'a Handler,

    /// Starting byte offset of the current token.
    token_start: usize,

    /// Line where the current token starts (1-based).
    token_start_line: u32,

    /// Column where the current token starts (1-based).
    token_start_column: u32,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer over `source`.
    pub fn new(source: &'a str, handler: &'a Handler) -> Self {
        Self {
            cursor: Cursor::new(source),
            handler,
            token_start: 0,
            token_start_line: 1,
            token_start_column: 1,
        }
    }

    /// Returns the next token from the source.
    ///
    /// Skips whitespace and line comments, then dispatches on the current
    /// character. Returns the terminal Eof token at end of input.
    pub fn next_token(&mut self) -> Token {
        loop {
            self.skip_whitespace_and_comments();

            self.token_start = self.cursor.position();
            self.token_start_line = self.cursor.line();
            self.token_start_column = self.cursor.column();

            if self.cursor.is_at_end() {
                return self.make(TokenKind::Eof, "");
            }

            match self.cursor.current_char() {
                '{' => {
                    self.cursor.advance();
                    return self.make(TokenKind::LBrace, "{");
                },
                '}' => {
                    self.cursor.advance();
                    return self.make(TokenKind::RBrace, "}");
                },
                '(' => {
                    self.cursor.advance();
                    return self.make(TokenKind::LParen, "(");
                },
                ')' => {
                    self.cursor.advance();
                    return self.make(TokenKind::RParen, ")");
                },
                '[' => {
                    self.cursor.advance();
                    return self.make(TokenKind::LBracket, "[");
                },
                ']' => {
                    self.cursor.advance();
                    return self.make(TokenKind::RBracket, "]");
                },
                ';' => {
                    self.cursor.advance();
                    return self.make(TokenKind::Semicolon, ";");
                },
                ',' => {
                    self.cursor.advance();
                    return self.make(TokenKind::Comma, ",");
                },
                ':' => {
                    self.cursor.advance();
                    return self.make(TokenKind::Colon, ":");
                },
                '.' => {
                    self.cursor.advance();
                    return self.make(TokenKind::Dot, ".");
                },
                '"' => return self.lex_string(false),
                '$' => {
                    if self.cursor.peek_char(1) == '"' {
                        self.cursor.advance();
                        return self.lex_string(true);
                    }
                    self.report_error("unexpected character '$'".to_string());
                    self.cursor.advance();
                },
                '+' => return self.lex_plus(),
                '-' => return self.lex_minus(),
                '*' => return self.lex_star(),
                '/' => return self.lex_slash(),
                '%' => return self.lex_percent(),
                '=' => return self.lex_equals(),
                '!' => return self.lex_bang(),
                '<' => return self.lex_less(),
                '>' => return self.lex_greater(),
                '&' => return self.lex_ampersand(),
                '|' => return self.lex_pipe(),
                c if is_ident_start(c) => return self.lex_identifier(),
                c if c.is_ascii_digit() => return self.lex_number(false),
                c => {
                    self.report_error(format!("unexpected character '{}'", c));
                    self.cursor.advance();
                },
            }
        }
    }

    /// Builds a token spanning from the recorded token start to the
    /// current cursor position.
    pub(crate) fn make(&self, kind: TokenKind, value: impl Into<String>) -> Token {
        let span = Span::new(
            self.token_start,
            self.cursor.position(),
            self.token_start_line,
            self.token_start_column,
        );
        Token::new(kind, value, span)
    }

    /// Reports a lexical error at the current token position.
    pub(crate) fn report_error(&self, message: String) {
        let span = Span::new(
            self.token_start,
            self.cursor.position(),
            self.token_start_line,
            self.token_start_column,
        );
        self.handler.error(message, span);
    }

    /// Skips whitespace and `//` line comments.
    ///
    /// A line comment consumes through the next LF; the LF itself is
    /// consumed as whitespace on the next pass.
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            let c = self.cursor.current_char();
            if c != '\0' && c.is_whitespace() {
                self.cursor.advance();
                continue;
            }
            if c == '/' && self.cursor.peek_char(1) == '/' {
                while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
                    self.cursor.advance();
                }
                continue;
            }
            break;
        }
    }
}
