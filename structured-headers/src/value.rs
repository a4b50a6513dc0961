use std::collections::HashMap;

use crate::error::{Error, Result};

/// Parameters attached to an [`Item`] or an [`InnerList`]. Parameter values cannot carry
/// parameters of their own.
pub type Parameters = HashMap<String, BareItem>;

/// Top-level members of a list header, in header order.
pub type List = Vec<ListItem>;

/// Members of a dictionary header. Repeated keys keep the last value.
pub type Dictionary = HashMap<String, ListItem>;

/// A single typed value.
#[derive(Debug, Clone, PartialEq)]
pub enum BareItem {
    Integer(i64),
    Decimal(f64),
    String(String),
    Token(String),
    /// Base64 encoding of the text between the colons of a `:...:` literal.
    Binary(Vec<u8>),
    Boolean(bool),
}

impl BareItem {
    pub fn as_integer(&self) -> Result<i64> {
        match self {
            BareItem::Integer(integer) => Ok(*integer),
            _ => Err(mismatch("an integer")),
        }
    }

    /// Integers are widened, so any number can be read as a decimal.
    pub fn as_decimal(&self) -> Result<f64> {
        match self {
            BareItem::Integer(integer) => Ok(*integer as f64),
            BareItem::Decimal(decimal) => Ok(*decimal),
            _ => Err(mismatch("a number")),
        }
    }

    pub fn as_str(&self) -> Result<&str> {
        match self {
            BareItem::String(string) => Ok(string),
            _ => Err(mismatch("a string")),
        }
    }

    pub fn as_token(&self) -> Result<&str> {
        match self {
            BareItem::Token(token) => Ok(token),
            _ => Err(mismatch("a token")),
        }
    }

    pub fn as_binary(&self) -> Result<&[u8]> {
        match self {
            BareItem::Binary(binary) => Ok(binary),
            _ => Err(mismatch("a binary")),
        }
    }

    pub fn as_bool(&self) -> Result<bool> {
        match self {
            BareItem::Boolean(boolean) => Ok(*boolean),
            _ => Err(mismatch("a boolean")),
        }
    }
}

fn mismatch(expected: &'static str) -> Error {
    Error::TypeMismatch { expected }
}

/// A [`BareItem`] with its parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    bare_item: BareItem,
    parameters: Parameters,
}

impl Item {
    pub fn new(bare_item: BareItem, parameters: Parameters) -> Self {
        Item {
            bare_item,
            parameters,
        }
    }

    pub fn bare_item(&self) -> &BareItem {
        &self.bare_item
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn as_integer(&self) -> Result<i64> {
        self.bare_item.as_integer()
    }

    pub fn as_decimal(&self) -> Result<f64> {
        self.bare_item.as_decimal()
    }

    pub fn as_str(&self) -> Result<&str> {
        self.bare_item.as_str()
    }

    pub fn as_token(&self) -> Result<&str> {
        self.bare_item.as_token()
    }

    pub fn as_binary(&self) -> Result<&[u8]> {
        self.bare_item.as_binary()
    }

    pub fn as_bool(&self) -> Result<bool> {
        self.bare_item.as_bool()
    }
}

impl From<BareItem> for Item {
    fn from(bare_item: BareItem) -> Self {
        Item::new(bare_item, Parameters::new())
    }
}

/// A parenthesised group of items, e.g. `(?1 2);p`. The parameters belong to the group.
#[derive(Debug, Clone, PartialEq)]
pub struct InnerList {
    items: Vec<Item>,
    parameters: Parameters,
}

impl InnerList {
    pub fn new(items: Vec<Item>, parameters: Parameters) -> Self {
        InnerList { items, parameters }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }
}

/// A member of a list or a dictionary.
#[derive(Debug, Clone, PartialEq)]
pub enum ListItem {
    Item(Item),
    InnerList(InnerList),
}

impl ListItem {
    pub fn item(&self) -> Result<&Item> {
        match self {
            ListItem::Item(item) => Ok(item),
            ListItem::InnerList(_) => Err(mismatch("an item")),
        }
    }

    pub fn inner_list(&self) -> Result<&InnerList> {
        match self {
            ListItem::InnerList(list) => Ok(list),
            ListItem::Item(_) => Err(mismatch("an inner list")),
        }
    }
}

impl From<Item> for ListItem {
    fn from(item: Item) -> Self {
        ListItem::Item(item)
    }
}

impl From<InnerList> for ListItem {
    fn from(list: InnerList) -> Self {
        ListItem::InnerList(list)
    }
}
