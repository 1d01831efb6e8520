//! Token definitions for the DPL lexer.

use std::fmt;

use dplc_util::Span;

/// The kind of a lexed token.
///
/// Keywords are not distinguished here; the parser matches identifier
/// values, because most DPL keywords (`pack`, `func`, type names) are
/// also legal identifier text in other positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier, including selector-style and namespaced forms
    /// (`@e[type=cow]`, `minecraft:stick`, `Math.Min`).
    Ident,
    /// Decimal number literal, optionally negative, optionally fractional.
    Number,
    /// Plain string literal; the value holds the unescaped content.
    Str,
    /// Macro string literal (`$"…"`); the value keeps the leading `$`
    /// so downstream stages can detect macro semantics.
    MacroStr,

    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,

    Colon,
    Semicolon,
    Comma,
    Dot,
    Pipe,

    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,

    PlusPlus,
    MinusMinus,

    Eq,
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    AndAnd,
    OrOr,

    /// End of the token stream; always the final token.
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::Ident => "identifier",
            TokenKind::Number => "number",
            TokenKind::Str => "string",
            TokenKind::MacroStr => "macro string",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::Colon => "':'",
            TokenKind::Semicolon => "';'",
            TokenKind::Comma => "','",
            TokenKind::Dot => "'.'",
            TokenKind::Pipe => "'|'",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Percent => "'%'",
            TokenKind::PlusEq => "'+='",
            TokenKind::MinusEq => "'-='",
            TokenKind::StarEq => "'*='",
            TokenKind::SlashEq => "'/='",
            TokenKind::PercentEq => "'%='",
            TokenKind::PlusPlus => "'++'",
            TokenKind::MinusMinus => "'--'",
            TokenKind::Eq => "'='",
            TokenKind::EqEq => "'=='",
            TokenKind::NotEq => "'!='",
            TokenKind::Lt => "'<'",
            TokenKind::LtEq => "'<='",
            TokenKind::Gt => "'>'",
            TokenKind::GtEq => "'>='",
            TokenKind::AndAnd => "'&&'",
            TokenKind::OrOr => "'||'",
            TokenKind::Eof => "end of input",
        };
        write!(f, "{}", text)
    }
}

/// A single lexed token: kind, value text, and source position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Lexeme text. For strings this is the unescaped content; for macro
    /// strings the content prefixed with `$`.
    pub value: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            value: value.into(),
            span,
        }
    }

    /// True for the terminal end-of-stream token.
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}
