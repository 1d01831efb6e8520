//! String literal lexing.
//!
//! Two flavors share one scanner: plain strings and macro strings
//! (`$"…"`). Macro strings keep the leading `$` in the stored value so
//! later stages can detect macro semantics without re-lexing.

use crate::token::{Token, TokenKind};
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes a string literal body starting at the opening quote.
    ///
    /// Supported escapes are `\"`, `\\`, `\n`, and `\t`; any other
    /// backslash pair passes through uninterpreted. A newline or end of
    /// input before the closing quote is a fatal lexical error.
    pub(crate) fn lex_string(&mut self, macro_marked: bool) -> Token {
        self.cursor.advance();

        let mut content = String::new();
        if macro_marked {
            content.push('$');
        }

        loop {
            if self.cursor.is_at_end() {
                self.report_error("unterminated string literal".to_string());
                break;
            }

            let c = self.cursor.current_char();

            if c == '"' {
                self.cursor.advance();
                break;
            }

            if c == '\n' {
                self.report_error("unterminated string literal".to_string());
                break;
            }

            if c == '\\' {
                self.cursor.advance();
                let escaped = self.cursor.current_char();
                match escaped {
                    '"' => content.push('"'),
                    '\\' => content.push('\\'),
                    'n' => content.push('\n'),
                    't' => content.push('\t'),
                    _ => {
                        content.push('\\');
                        content.push(escaped);
                    },
                }
                self.cursor.advance();
                continue;
            }

            content.push(c);
            self.cursor.advance();
        }

        if macro_marked {
            self.make(TokenKind::MacroStr, content)
        } else {
            self.make(TokenKind::Str, content)
        }
    }
}
