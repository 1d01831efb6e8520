//! Identifier lexing.
//!
//! The identifier alphabet is deliberately wide so that entity selectors
//! (`@e[type=cow,limit=1]`) and namespaced resource ids
//! (`minecraft:item_name`) survive as single tokens.

use crate::token::{Token, TokenKind};
use crate::Lexer;

/// Characters that may begin an identifier.
pub(crate) fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || matches!(c, '_' | '@' | '~' | '^')
}

/// Characters that always continue an identifier.
pub(crate) fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl<'a> Lexer<'a> {
    /// Lexes an identifier.
    ///
    /// `:` and `.` continue the identifier only when the character after
    /// them is itself identifier text, so `minecraft:stick` and
    /// `Math.Min` stay whole while `components: [` still yields a Colon
    /// token. A `[` directly attached to identifier text opens
    /// balanced-bracket consumption through the matching `]`, which is
    /// how selector arguments (with `=` and `,` inside) pass through.
    pub(crate) fn lex_identifier(&mut self) -> Token {
        let mut value = String::new();

        value.push(self.cursor.current_char());
        self.cursor.advance();

        loop {
            let c = self.cursor.current_char();

            if is_ident_continue(c) {
                value.push(c);
                self.cursor.advance();
                continue;
            }

            if (c == ':' || c == '.') && is_ident_continue(self.cursor.peek_char(1)) {
                value.push(c);
                self.cursor.advance();
                continue;
            }

            if c == '[' {
                if !self.consume_bracket_run(&mut value) {
                    break;
                }
                continue;
            }

            break;
        }

        self.make(TokenKind::Ident, value)
    }

    /// Consumes a balanced `[` … `]` run into `value`.
    ///
    /// Returns false when the run is unterminated (newline or end of
    /// input before balance), which is a fatal lexical error.
    fn consume_bracket_run(&mut self, value: &mut String) -> bool {
        let mut depth = 0usize;

        loop {
            let c = self.cursor.current_char();

            if self.cursor.is_at_end() || c == '\n' {
                self.report_error("unterminated selector brackets".to_string());
                return false;
            }

            match c {
                '[' => depth += 1,
                ']' => depth -= 1,
                _ => {},
            }

            value.push(c);
            self.cursor.advance();

            if depth == 0 {
                return true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dplc_util::Handler;

    fn first(source: &str) -> Token {
        let handler = Handler::new();
        crate::lex(source, &handler).remove(0)
    }

    #[test]
    fn test_plain_identifier() {
        let token = first("counter");
        assert_eq!(token.kind, TokenKind::Ident);
        assert_eq!(token.value, "counter");
    }

    #[test]
    fn test_namespaced_identifier() {
        let token = first("minecraft:item_name");
        assert_eq!(token.value, "minecraft:item_name");
    }

    #[test]
    fn test_dotted_identifier() {
        let token = first("Math.Min");
        assert_eq!(token.value, "Math.Min");
    }

    #[test]
    fn test_colon_before_space_terminates() {
        let handler = Handler::new();
        let tokens = crate::lex("components: [", &handler);
        assert_eq!(tokens[0].value, "components");
        assert_eq!(tokens[1].kind, TokenKind::Colon);
        assert_eq!(tokens[2].kind, TokenKind::LBracket);
    }

    #[test]
    fn test_selector_with_arguments() {
        let token = first("@e[type=cow,limit=1]");
        assert_eq!(token.kind, TokenKind::Ident);
        assert_eq!(token.value, "@e[type=cow,limit=1]");
    }

    #[test]
    fn test_nested_selector_brackets() {
        let token = first("@e[nbt=[1,2]]");
        assert_eq!(token.value, "@e[nbt=[1,2]]");
    }

    #[test]
    fn test_tilde_coordinate() {
        let token = first("~10");
        assert_eq!(token.kind, TokenKind::Ident);
        assert_eq!(token.value, "~10");
    }

    #[test]
    fn test_unterminated_selector_is_error() {
        let handler = Handler::new();
        let _ = crate::lex("@e[type=cow", &handler);
        assert!(handler.has_errors());
    }
}
