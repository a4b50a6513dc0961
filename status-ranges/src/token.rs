use crate::error::{RangeError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token {
    /// `[` or `(`.
    Open { strict: bool },
    /// `]` or `)`.
    Close { strict: bool },
    Integer(i64),
}

impl Token {
    fn bound(ch: char) -> Option<Token> {
        match ch {
            '[' => Some(Token::Open { strict: false }),
            '(' => Some(Token::Open { strict: true }),
            ']' => Some(Token::Close { strict: false }),
            ')' => Some(Token::Close { strict: true }),
            _ => None,
        }
    }
}

/// Splits a range definition into tokens.
///
/// Brackets are tokens on their own even when they touch a number, so `[400 500]` and
/// `[ 400 500 ]` tokenize the same way. Iteration stops after the first error.
pub(crate) struct Tokens<'a> {
    input: &'a str,
    offset: usize,
}

impl<'a> Tokens<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Tokens { input, offset: 0 }
    }

    fn fail(&mut self, err: RangeError) -> Option<Result<Token>> {
        self.offset = self.input.len();
        Some(Err(err))
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.input[self.offset..];
        let start = self.offset + (rest.len() - rest.trim_start().len());
        self.offset = start;

        let first = self.input[start..].chars().next()?;

        if let Some(token) = Token::bound(first) {
            self.offset = start + first.len_utf8();
            return Some(Ok(token));
        }

        let mut end = self.input.len();
        for (i, ch) in self.input[start..].char_indices() {
            if ch.is_whitespace() || Token::bound(ch).is_some() {
                end = start + i;
                break;
            }
            if !ch.is_ascii_digit() {
                return self.fail(RangeError::UnknownSymbol {
                    symbol: ch,
                    offset: start + i,
                });
            }
        }

        self.offset = end;
        let literal = &self.input[start..end];
        match literal.parse::<i64>() {
            Ok(value) => Some(Ok(Token::Integer(value))),
            Err(source) => self.fail(RangeError::InvalidInteger {
                literal: literal.to_string(),
                source,
            }),
        }
    }
}
