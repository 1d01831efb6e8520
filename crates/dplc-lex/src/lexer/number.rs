//! Number literal lexing.

use crate::token::{Token, TokenKind};
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes a decimal number literal.
    ///
    /// One or more digits with at most one dot; the dot is only taken
    /// when a digit follows it. When `negative` is set the minus sign
    /// has already been consumed by the operator dispatch.
    pub(crate) fn lex_number(&mut self, negative: bool) -> Token {
        let mut value = String::new();
        if negative {
            value.push('-');
        }

        while self.cursor.current_char().is_ascii_digit() {
            value.push(self.cursor.current_char());
            self.cursor.advance();
        }

        if self.cursor.current_char() == '.' && self.cursor.peek_char(1).is_ascii_digit() {
            value.push('.');
            self.cursor.advance();
            while self.cursor.current_char().is_ascii_digit() {
                value.push(self.cursor.current_char());
                self.cursor.advance();
            }
        }

        self.make(TokenKind::Number, value)
    }
}

#[cfg(test)]
mod tests {
    use crate::token::TokenKind;
    use dplc_util::Handler;

    fn values(source: &str) -> Vec<(TokenKind, String)> {
        let handler = Handler::new();
        crate::lex(source, &handler)
            .into_iter()
            .map(|t| (t.kind, t.value))
            .collect()
    }

    #[test]
    fn test_integer() {
        let tokens = values("42");
        assert_eq!(tokens[0], (TokenKind::Number, "42".to_string()));
    }

    #[test]
    fn test_fractional() {
        let tokens = values("3.25");
        assert_eq!(tokens[0], (TokenKind::Number, "3.25".to_string()));
    }

    #[test]
    fn test_negative_number() {
        let tokens = values("-7");
        assert_eq!(tokens[0], (TokenKind::Number, "-7".to_string()));
    }

    #[test]
    fn test_minus_before_identifier_is_operator() {
        let tokens = values("-x");
        assert_eq!(tokens[0].0, TokenKind::Minus);
        assert_eq!(tokens[1].0, TokenKind::Ident);
    }

    #[test]
    fn test_trailing_dot_not_consumed() {
        let tokens = values("1.x");
        assert_eq!(tokens[0], (TokenKind::Number, "1".to_string()));
        assert_eq!(tokens[1].0, TokenKind::Dot);
    }

    #[test]
    fn test_second_dot_stops_literal() {
        let tokens = values("1.2.3");
        assert_eq!(tokens[0], (TokenKind::Number, "1.2".to_string()));
        assert_eq!(tokens[1].0, TokenKind::Dot);
        assert_eq!(tokens[2], (TokenKind::Number, "3".to_string()));
    }
}
