//! Lexer for selector paths using logos

use logos::{Lexer, Logos};

use crate::error::{ParseError, Span};

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
pub enum Token {
    #[token(".")]
    Dot,
    #[token("[")]
    BracketOpen,
    #[token("]")]
    BracketClose,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_\-]*", |lex| lex.slice().to_string())]
    Ident(String),

    /// Bare word starting with a digit, only valid as a tag
    #[regex(r"[0-9][a-zA-Z0-9_\-]*", |lex| lex.slice().to_string())]
    Word(String),

    #[regex(r#""([^"\\]|\\.)*""#, unquote)]
    String(String),
}

/// Strip the quotes of a string literal and resolve its backslash escapes
fn unquote(lex: &mut Lexer<Token>) -> String {
    let s = lex.slice();
    let mut out = String::with_capacity(s.len());
    let mut chars = s[1..s.len() - 1].chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.extend(chars.next()),
            c => out.push(c),
        }
    }
    out
}

/// Lex input string into tokens with spans
///
/// Unlike a lenient lexer, characters that form no token are reported rather
/// than skipped, since a dropped character would silently select a different
/// template.
pub fn lex(input: &str) -> Result<Vec<(Token, Span)>, Vec<ParseError>> {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();
    for (tok, span) in Token::lexer(input).spanned() {
        match tok {
            Ok(t) => tokens.push((t, span)),
            Err(()) => {
                let found = &input[span.clone()];
                errors.push(ParseError::syntax(
                    span,
                    format!("Unexpected character '{}'", found),
                ));
            }
        }
    }
    if errors.is_empty() {
        Ok(tokens)
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        lex(input)
            .expect("Should lex")
            .into_iter()
            .map(|(t, _)| t)
            .collect()
    }

    #[test]
    fn test_simple_path() {
        assert_eq!(
            tokens("plot.series"),
            vec![
                Token::Ident("plot".to_string()),
                Token::Dot,
                Token::Ident("series".to_string()),
            ]
        );
    }

    #[test]
    fn test_selectors() {
        assert_eq!(
            tokens(r#"plot[alpha].series["one two"]"#),
            vec![
                Token::Ident("plot".to_string()),
                Token::BracketOpen,
                Token::Ident("alpha".to_string()),
                Token::BracketClose,
                Token::Dot,
                Token::Ident("series".to_string()),
                Token::BracketOpen,
                Token::String("one two".to_string()),
                Token::BracketClose,
            ]
        );
    }

    #[test]
    fn test_whitespace_skipped() {
        assert_eq!(
            tokens(" plot . legend "),
            vec![
                Token::Ident("plot".to_string()),
                Token::Dot,
                Token::Ident("legend".to_string()),
            ]
        );
    }

    #[test]
    fn test_hyphenated_tags() {
        assert_eq!(
            tokens("series[lower-right]"),
            vec![
                Token::Ident("series".to_string()),
                Token::BracketOpen,
                Token::Ident("lower-right".to_string()),
                Token::BracketClose,
            ]
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            tokens(r#"series["a\"b"]["c\\d"]"#)
                .into_iter()
                .filter(|t| matches!(t, Token::String(_)))
                .collect::<Vec<_>>(),
            vec![
                Token::String("a\"b".to_string()),
                Token::String("c\\d".to_string()),
            ]
        );
    }

    #[test]
    fn test_digit_leading_words() {
        assert_eq!(
            tokens("series[2020]"),
            vec![
                Token::Ident("series".to_string()),
                Token::BracketOpen,
                Token::Word("2020".to_string()),
                Token::BracketClose,
            ]
        );
    }

    #[test]
    fn test_invalid_character() {
        let errors = lex("plot/series").expect_err("Should fail");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].span(), &(4..5));
    }
}
