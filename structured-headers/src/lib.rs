//! A parser for structured HTTP header values.
//!
//! Header values are parsed into typed [`Item`]s, [`List`]s of items and inner lists, and
//! [`Dictionary`]s:
//!
//! ```
//! use structured_headers::{parse_dictionary, BareItem};
//!
//! let dictionary = parse_dictionary("codes=\"[500 599]\", attempts=3, verbose").unwrap();
//!
//! let codes = dictionary["codes"].item().unwrap();
//! assert_eq!(codes.as_str().unwrap(), "[500 599]");
//! assert!(codes.as_integer().is_err());
//!
//! // Bare keys are booleans.
//! assert_eq!(dictionary["verbose"].item().unwrap().bare_item(), &BareItem::Boolean(true));
//! ```
//!
//! Use [`StructuredHeader`] to read values straight from a [`http::HeaderMap`].
mod error;
mod header;
mod parse;
mod scanner;
mod value;

pub use error::{Error, Result};
pub use header::StructuredHeader;
pub use parse::{parse_dictionary, parse_item, parse_list};
pub use value::{BareItem, Dictionary, InnerList, Item, List, ListItem, Parameters};
