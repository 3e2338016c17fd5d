//! Markup grammar using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::error::MarkupError;
use crate::parser::ast::Element;
use crate::parser::lexer::Token;

/// Parse markup into a single root element
pub fn parse(input: &str) -> Result<Element, Vec<MarkupError>> {
    let len = input.len();

    // Create a logos lexer and convert to token stream
    let token_iter = crate::parser::lexer::lex(input).map(|(tok, span)| (tok, span.into()));

    // Turn the token iterator into a stream that chumsky can use
    let token_stream = Stream::from_iter(token_iter)
        // Split (Token, SimpleSpan) into token and span parts
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    document_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| errs.into_iter().map(|e| e.into()).collect())
}

/// Helper to extract span range from chumsky's MapExtra
fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> std::ops::Range<usize> {
    e.start()..e.end()
}

fn document_parser<'a, I>() -> impl Parser<'a, I, Element, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let name = select! {
        Token::Name(s) => s,
    };

    let value = select! {
        Token::Quoted(s) => s,
    };

    // name="value"
    let attribute = name.clone().then_ignore(just(Token::Equals)).then(value);

    // <name attr="..." ...
    let open_tag = just(Token::Open)
        .ignore_then(name.clone())
        .then(attribute.repeated().collect::<Vec<_>>());

    let element = recursive(|element| {
        // <name ... />
        let empty = open_tag
            .clone()
            .then_ignore(just(Token::SelfClose))
            .map_with(|(name, attributes), e| Element {
                name,
                attributes,
                children: vec![],
                span: span_range(&e.span()),
            });

        // <name ...> children </name>
        let full = open_tag
            .clone()
            .then_ignore(just(Token::Close))
            .then(element.repeated().collect::<Vec<_>>())
            .then_ignore(just(Token::OpenEnd))
            .then(name.clone())
            .then_ignore(just(Token::Close))
            .try_map(|(((name, attributes), children), closing), span: SimpleSpan| {
                if name == closing {
                    Ok(Element {
                        name,
                        attributes,
                        children,
                        span: span.into_range(),
                    })
                } else {
                    Err(Rich::custom(
                        span,
                        format!("closing tag </{}> does not match <{}>", closing, name),
                    ))
                }
            });

        choice((empty, full))
    });

    element.then_ignore(end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_element() {
        let root = parse(r#"<circle cx="1" cy="2" r="3"/>"#).unwrap();
        assert_eq!(root.name, "circle");
        assert_eq!(root.attr("cy"), Some("2"));
        assert!(root.children.is_empty());
    }

    #[test]
    fn test_parse_nested() {
        let root = parse(
            r#"<?xml version="1.0" encoding="UTF-8"?>
            <svg width="10">
              <g class="a"><circle r="1"/><circle r="2"/></g>
              <rect x="0"/>
            </svg>"#,
        )
        .unwrap();
        assert_eq!(root.name, "svg");
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].children.len(), 2);
        assert_eq!(root.count(), 5);
        assert_eq!(root.children_named("rect").count(), 1);
    }

    #[test]
    fn test_mismatched_closing_tag() {
        let errors = parse("<svg><g></svg></g>").unwrap_err();
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_unterminated_element() {
        let errors = parse(r#"<svg width="10""#).unwrap_err();
        assert!(matches!(errors[0], MarkupError::Syntax { .. }));
    }

    #[test]
    fn test_trailing_content_rejected() {
        assert!(parse("<svg/><svg/>").is_err());
    }
}
