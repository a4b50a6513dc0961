use std::num::ParseIntError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RangeError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    /// A character that is neither whitespace, a digit nor a bracket.
    #[error("unknown symbol `{symbol}` at offset {offset}")]
    UnknownSymbol { symbol: char, offset: usize },
    /// A run of digits that does not fit into an `i64`.
    #[error("invalid integer `{literal}`: {source}")]
    InvalidInteger {
        literal: String,
        source: ParseIntError,
    },
    /// An opening bracket that is not followed by two integers.
    #[error("expected an integer bound")]
    MissingBound,
    /// Two bounds that are not followed by a closing bracket.
    #[error("unclosed range")]
    Unclosed,
    /// A closing bracket without a matching opening one.
    #[error("unexpected range end `{0}`")]
    UnexpectedEnd(char),
    #[error("range `{0}` is empty")]
    Empty(String),
}
