//! Operator and punctuation lexing.
//!
//! Multi-character operators are disambiguated by lookahead before the
//! single-character fallbacks.

use crate::token::{Token, TokenKind};
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Handles: `+`, `+=`, `++`
    pub(crate) fn lex_plus(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make(TokenKind::PlusEq, "+=")
        } else if self.cursor.match_char('+') {
            self.make(TokenKind::PlusPlus, "++")
        } else {
            self.make(TokenKind::Plus, "+")
        }
    }

    /// Handles: `-`, `-=`, `--`, and negative number literals.
    ///
    /// A minus directly followed by a digit begins a number; otherwise it
    /// is the operator.
    pub(crate) fn lex_minus(&mut self) -> Token {
        if self.cursor.peek_char(1).is_ascii_digit() {
            self.cursor.advance();
            return self.lex_number(true);
        }
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make(TokenKind::MinusEq, "-=")
        } else if self.cursor.match_char('-') {
            self.make(TokenKind::MinusMinus, "--")
        } else {
            self.make(TokenKind::Minus, "-")
        }
    }

    /// Handles: `*`, `*=`
    pub(crate) fn lex_star(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make(TokenKind::StarEq, "*=")
        } else {
            self.make(TokenKind::Star, "*")
        }
    }

    /// Handles: `/`, `/=`
    ///
    /// Line comments never reach here; they are consumed with the
    /// whitespace before dispatch.
    pub(crate) fn lex_slash(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make(TokenKind::SlashEq, "/=")
        } else {
            self.make(TokenKind::Slash, "/")
        }
    }

    /// Handles: `%`, `%=`
    pub(crate) fn lex_percent(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make(TokenKind::PercentEq, "%=")
        } else {
            self.make(TokenKind::Percent, "%")
        }
    }

    /// Handles: `=`, `==`
    pub(crate) fn lex_equals(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make(TokenKind::EqEq, "==")
        } else {
            self.make(TokenKind::Eq, "=")
        }
    }

    /// Handles: `!=`
    ///
    /// A bare `!` has no meaning in DPL and is a lexical error.
    pub(crate) fn lex_bang(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make(TokenKind::NotEq, "!=")
        } else {
            self.report_error("unexpected character '!'".to_string());
            self.next_token()
        }
    }

    /// Handles: `<`, `<=`
    pub(crate) fn lex_less(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make(TokenKind::LtEq, "<=")
        } else {
            self.make(TokenKind::Lt, "<")
        }
    }

    /// Handles: `>`, `>=`
    pub(crate) fn lex_greater(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make(TokenKind::GtEq, ">=")
        } else {
            self.make(TokenKind::Gt, ">")
        }
    }

    /// Handles: `&&`
    ///
    /// A bare `&` has no meaning in DPL and is a lexical error.
    pub(crate) fn lex_ampersand(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('&') {
            self.make(TokenKind::AndAnd, "&&")
        } else {
            self.report_error("unexpected character '&'".to_string());
            self.next_token()
        }
    }

    /// Handles: `|`, `||`
    pub(crate) fn lex_pipe(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('|') {
            self.make(TokenKind::OrOr, "||")
        } else {
            self.make(TokenKind::Pipe, "|")
        }
    }
}
