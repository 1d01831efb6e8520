//! dplc-lex - Lexical analyzer for DPL.
//!
//! Turns DPL source text into a flat token stream. One left-to-right
//! pass with two-token lookahead for multi-character operators; line and
//! column tracking for diagnostics. The identifier alphabet is widened
//! so entity selectors and namespaced resource ids lex as single tokens.
//!
//! # Examples
//!
//! ```
//! use dplc_lex::{lex, TokenKind};
//! use dplc_util::Handler;
//!
//! let handler = Handler::new();
//! let tokens = lex("pack \"demo\" namespace demo { }", &handler);
//!
//! assert!(!handler.has_errors());
//! assert_eq!(tokens[0].kind, TokenKind::Ident);
//! assert_eq!(tokens[0].value, "pack");
//! assert!(tokens.last().unwrap().is_eof());
//! ```

pub mod cursor;
mod lexer;
mod token;

#[cfg(test)]
mod edge_cases;

pub use lexer::Lexer;
pub use token::{Token, TokenKind};

use dplc_util::Handler;

/// Lexes `source` into a token stream.
///
/// Always appends a terminal Eof token. Lexical errors are reported to
/// `handler` and are fatal to the compilation; the caller must check
/// `handler.has_errors()` before parsing.
pub fn lex(source: &str, handler: &Handler) -> Vec<Token> {
    let mut lexer = Lexer::new(source, handler);
    let mut tokens = Vec::new();

    loop {
        let token = lexer.next_token();
        let done = token.is_eof();
        tokens.push(token);
        if done {
            break;
        }
    }

    tokens
}
