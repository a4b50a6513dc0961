use std::convert::TryFrom;
use std::fmt;

use http::header::{HeaderMap, HeaderName};
use http::StatusCode;
use status_ranges::{Range, RangeError};
use structured_headers::{Dictionary, StructuredHeader};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("invalid policy header: {0}")]
    Header(#[from] structured_headers::Error),
    #[error("policy has no `{0}` key")]
    MissingKey(&'static str),
    #[error("invalid `{key}` value: {source}")]
    InvalidValue {
        key: &'static str,
        source: structured_headers::Error,
    },
    #[error("invalid `codes` range: {0}")]
    Codes(#[from] RangeError),
}

/// Which responses may be retried, and how often.
///
/// Read from a structured dictionary header such as `codes="[500 599] 429", attempts=3`. Both
/// keys are required.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    codes: Range,
    attempts: i64,
}

impl RetryPolicy {
    pub fn new(codes: Range, attempts: i64) -> Self {
        RetryPolicy { codes, attempts }
    }

    pub fn from_dictionary(dictionary: &Dictionary) -> Result<Self, PolicyError> {
        let codes = dictionary
            .get("codes")
            .ok_or(PolicyError::MissingKey("codes"))?
            .item()
            .and_then(|item| item.as_str())
            .map_err(|source| PolicyError::InvalidValue {
                key: "codes",
                source,
            })?;
        let codes = Range::parse(codes)?;

        let attempts = dictionary
            .get("attempts")
            .ok_or(PolicyError::MissingKey("attempts"))?
            .item()
            .and_then(|item| item.as_integer())
            .map_err(|source| PolicyError::InvalidValue {
                key: "attempts",
                source,
            })?;

        Ok(RetryPolicy { codes, attempts })
    }

    /// Parses every occurrence of `name` in `headers` as one policy dictionary.
    pub fn from_headers(headers: &HeaderMap, name: &HeaderName) -> Result<Self, PolicyError> {
        let dictionary = StructuredHeader::new(headers).dictionary(name)?;
        Self::from_dictionary(&dictionary)
    }

    /// Whether a response with `status` is covered by the policy.
    pub fn applicable(&self, status: StatusCode) -> bool {
        self.codes.includes(i64::from(status.as_u16()))
    }

    /// Whether the request may be replayed after attempt number `attempt` (zero based).
    pub fn can_retry(&self, attempt: u64) -> bool {
        i64::try_from(attempt).map_or(false, |attempt| attempt < self.attempts)
    }

    pub fn codes(&self) -> &Range {
        &self.codes
    }

    pub fn attempts(&self) -> i64 {
        self.attempts
    }
}

impl fmt::Display for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "codes: {}, attempts: {}", self.codes, self.attempts)
    }
}
