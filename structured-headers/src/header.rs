use http::header::{AsHeaderName, HeaderMap, HeaderValue};

use crate::error::{Context, Error, Result};
use crate::parse::{parse_dictionary, parse_item, parse_list};
use crate::value::{Dictionary, Item, List};

/// Typed access to the structured headers of a request or response.
///
/// ```
/// use http::HeaderMap;
/// use structured_headers::StructuredHeader;
///
/// let mut headers = HeaderMap::new();
/// headers.append("retry-policy", "codes=\"[500 599]\"".parse().unwrap());
/// headers.append("retry-policy", "attempts=3".parse().unwrap());
///
/// let policy = StructuredHeader::new(&headers).dictionary("retry-policy").unwrap();
/// assert_eq!(policy["attempts"].item().unwrap().as_integer().unwrap(), 3);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct StructuredHeader<'a> {
    headers: &'a HeaderMap,
}

impl<'a> StructuredHeader<'a> {
    pub fn new(headers: &'a HeaderMap) -> Self {
        StructuredHeader { headers }
    }

    /// Parses the first occurrence of `key` as an item. A missing header is parsed as an empty
    /// value and fails.
    pub fn item<K: AsHeaderName>(&self, key: K) -> Result<Item> {
        let value = match self.headers.get(key) {
            Some(value) => to_str(value)?,
            None => "",
        };

        parse_item(value)
    }

    /// Parses every occurrence of `key` as a list and concatenates them in header order.
    pub fn list<K: AsHeaderName>(&self, key: K) -> Result<List> {
        let mut list = List::new();

        for value in self.headers.get_all(key) {
            list.extend(parse_list(to_str(value)?).context("header")?);
        }

        Ok(list)
    }

    /// Parses every occurrence of `key` as a dictionary and merges them. Later occurrences
    /// overwrite keys of earlier ones.
    pub fn dictionary<K: AsHeaderName>(&self, key: K) -> Result<Dictionary> {
        let mut dictionary = Dictionary::new();

        for value in self.headers.get_all(key) {
            dictionary.extend(parse_dictionary(to_str(value)?).context("header")?);
        }

        Ok(dictionary)
    }
}

fn to_str(value: &HeaderValue) -> Result<&str> {
    value.to_str().map_err(|_| Error::InvalidHeaderValue)
}
