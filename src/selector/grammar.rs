//! Selector path parser using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use super::lexer::{lex, Token};
use super::{Segment, SelectorPath};
use crate::error::ParseError;

/// Parse a selector path such as `plot[alpha].series["one"]`
pub fn parse(input: &str) -> Result<SelectorPath, Vec<ParseError>> {
    let len = input.len();
    let tokens = lex(input)?;

    let token_iter = tokens.into_iter().map(|(tok, span)| (tok, span.into()));

    // Turn the token iterator into a stream that chumsky can use
    let token_stream = Stream::from_iter(token_iter)
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    path_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| errs.into_iter().map(|e| e.into()).collect())
}

fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> std::ops::Range<usize> {
    e.start()..e.end()
}

fn path_parser<'a, I>() -> impl Parser<'a, I, SelectorPath, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let name = select! {
        Token::Ident(s) => s,
    };

    // Tags may be bare words or quoted strings
    let tag = select! {
        Token::Ident(s) => s,
        Token::Word(s) => s,
        Token::String(s) => s,
    };

    let selector = tag.delimited_by(just(Token::BracketOpen), just(Token::BracketClose));

    let segment = name
        .then(selector.or_not())
        .map_with(|(name, selector), e| Segment {
            name,
            selector,
            span: span_range(&e.span()),
        });

    segment
        .separated_by(just(Token::Dot))
        .at_least(1)
        .collect::<Vec<_>>()
        .then_ignore(end())
        .map(|segments| SelectorPath { segments })
}
