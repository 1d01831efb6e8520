//! Edge-case tests for the lexer as a whole.

use crate::{lex, TokenKind};
use dplc_util::Handler;

use proptest::prelude::*;

fn values(source: &str) -> Vec<(TokenKind, String)> {
    let handler = Handler::new();
    lex(source, &handler)
        .into_iter()
        .map(|t| (t.kind, t.value))
        .collect()
}

#[test]
fn test_full_statement() {
    let tokens = values("global int x = 5;");
    let kinds: Vec<TokenKind> = tokens.iter().map(|(k, _)| *k).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Ident,
            TokenKind::Ident,
            TokenKind::Ident,
            TokenKind::Eq,
            TokenKind::Number,
            TokenKind::Semicolon,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_for_header_pipes() {
    let tokens = values("for(int i = 0 | i < 3 | i++)");
    let pipe_count = tokens
        .iter()
        .filter(|(k, _)| *k == TokenKind::Pipe)
        .count();
    assert_eq!(pipe_count, 2);
    assert!(tokens.iter().any(|(k, _)| *k == TokenKind::PlusPlus));
}

#[test]
fn test_selector_then_call() {
    let tokens = values("Ent.Get(\"type=cow\").GetData(\"Health\")");
    assert_eq!(tokens[0], (TokenKind::Ident, "Ent.Get".to_string()));
    assert_eq!(tokens[1].0, TokenKind::LParen);
    // the postfix call starts with a free-standing dot
    assert_eq!(tokens[4].0, TokenKind::Dot);
    assert_eq!(tokens[5], (TokenKind::Ident, "GetData".to_string()));
}

#[test]
fn test_macro_string_next_to_plain() {
    let tokens = values("Run($\"/tp {x}\") Say(\"hi\")");
    assert!(tokens
        .iter()
        .any(|(k, v)| *k == TokenKind::MacroStr && v == "$/tp {x}"));
    assert!(tokens
        .iter()
        .any(|(k, v)| *k == TokenKind::Str && v == "hi"));
}

#[test]
fn test_crlf_and_blank_lines() {
    let handler = Handler::new();
    let tokens = lex("a\r\n\r\nb", &handler);
    assert_eq!(tokens[1].span.line, 3);
}

#[test]
fn test_comment_at_eof_without_newline() {
    let tokens = values("x // trailing");
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].0, TokenKind::Ident);
}

#[test]
fn test_execute_header() {
    let tokens = values("execute(as @e[type=zombie], at @s or as @a)");
    assert!(tokens
        .iter()
        .any(|(k, v)| *k == TokenKind::Ident && v == "@e[type=zombie]"));
    assert!(tokens.iter().any(|(k, v)| *k == TokenKind::Ident && v == "or"));
}

proptest! {
    /// Lexing is total: any input produces a token stream ending in Eof,
    /// and never panics.
    #[test]
    fn prop_lexing_is_total(source in "\\PC*") {
        let handler = Handler::new();
        let tokens = lex(&source, &handler);
        prop_assert!(tokens.last().unwrap().is_eof());
    }

    /// Lexing the same input twice yields identical streams.
    #[test]
    fn prop_lexing_is_deterministic(source in "\\PC*") {
        let h1 = Handler::new();
        let h2 = Handler::new();
        let t1 = lex(&source, &h1);
        let t2 = lex(&source, &h2);
        prop_assert_eq!(t1, t2);
        prop_assert_eq!(h1.diagnostics(), h2.diagnostics());
    }

    /// Integer literals round-trip through their value text.
    #[test]
    fn prop_integer_literals_roundtrip(n in 0i64..1_000_000) {
        let handler = Handler::new();
        let source = n.to_string();
        let tokens = lex(&source, &handler);
        prop_assert_eq!(tokens[0].kind, TokenKind::Number);
        prop_assert_eq!(&tokens[0].value, &source);
    }
}
