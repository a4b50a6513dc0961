//! A compact language for integer ranges, used to describe which HTTP status codes should be
//! retried.
//!
//! A definition is a whitespace separated sequence of bounded ranges and standalone values:
//!
//! - `[a b]` covers `a..=b`, `(a b)` excludes both ends, and the brackets can be mixed, e.g.
//!   `(505 600]`;
//! - a bare integer such as `429` covers exactly that value.
//!
//! Touching or overlapping bounded ranges are merged when the definition is parsed, and
//! standalone values already covered by a bounded range are dropped:
//!
//! ```
//! use status_ranges::Range;
//!
//! let codes: Range = "[500 504] 429 [502 599] 503".parse().unwrap();
//! assert_eq!(codes.to_string(), "[500 599] 429");
//! assert!(codes.includes(429));
//! assert!(!codes.includes(404));
//! ```
mod error;
mod range;
mod set;
mod token;

pub use error::{RangeError, Result};
pub use range::{Bound, BoundedRange, Range};
pub use set::Set;
