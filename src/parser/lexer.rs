//! Lexer for the emitted SVG markup using logos

use logos::Logos;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
pub enum Token {
    // Tag delimiters (longer patterns win)
    #[token("</")]
    OpenEnd,
    #[token("<")]
    Open,
    #[token("/>")]
    SelfClose,
    #[token(">")]
    Close,
    #[token("=")]
    Equals,

    // Tag and attribute names, including namespaced and hyphenated ones
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_:.\-]*", |lex| lex.slice().to_string())]
    Name(String),

    #[regex(r#""[^"]*""#, |lex| {
        let s = lex.slice();
        s[1..s.len()-1].to_string()
    })]
    #[regex(r"'[^']*'", |lex| {
        let s = lex.slice();
        s[1..s.len()-1].to_string()
    })]
    Quoted(String),

    // XML declarations and comments (skip)
    #[regex(r"<\?[^?]*\?>", logos::skip)]
    Declaration,

    #[regex(r"<!--([^-]|-[^-])*-->", logos::skip)]
    Comment,
}

/// Lex input string into tokens with spans
pub fn lex(input: &str) -> impl Iterator<Item = (Token, Span)> + '_ {
    Token::lexer(input)
        .spanned()
        .filter_map(|(tok, span)| tok.ok().map(|t| (t, span)))
}
