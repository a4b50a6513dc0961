use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::{Context, Error, Result};
use crate::scanner::Scanner;
use crate::value::{BareItem, Dictionary, InnerList, Item, List, ListItem, Parameters};

const MAX_INTEGER_DIGITS: usize = 15;
const MAX_DECIMAL_INTEGER_DIGITS: usize = 12;
const MAX_DECIMAL_FRACTION_DIGITS: usize = 3;

/// Parses a single item, e.g. `10; parameter=10`.
///
/// Parsing stops after the item's parameters; anything left in the input is ignored.
pub fn parse_item(input: &str) -> Result<Item> {
    scan_item(&mut Scanner::new(input))
}

/// Parses a comma separated list of items and inner lists, e.g. `10; a, 11, (1 2); b`.
pub fn parse_list(input: &str) -> Result<List> {
    scan_list(&mut Scanner::new(input)).context("list")
}

/// Parses a comma separated dictionary, e.g. `codes="[500 599]", attempts=3`.
pub fn parse_dictionary(input: &str) -> Result<Dictionary> {
    scan_dictionary(&mut Scanner::new(input)).context("dictionary")
}

fn scan_item(s: &mut Scanner<'_>) -> Result<Item> {
    let bare_item = scan_bare_item(s).context("item")?;
    let parameters = scan_parameters(s).context("item")?;

    Ok(Item::new(bare_item, parameters))
}

fn scan_bare_item(s: &mut Scanner<'_>) -> Result<BareItem> {
    s.skip_whitespace();

    match s.current() {
        None => Err(Error::UnexpectedEof),
        Some(ch) if ch.is_ascii_digit() || ch == '-' => scan_number(s).context("number"),
        Some('"') => scan_string(s).map(BareItem::String).context("string"),
        Some(ch) if ch.is_ascii_alphabetic() || ch == '*' => Ok(BareItem::Token(scan_token(s))),
        Some(':') => scan_binary(s).map(BareItem::Binary).context("binary"),
        Some('?') => scan_boolean(s).map(BareItem::Boolean).context("boolean"),
        Some(_) => Err(Error::NotAnItem),
    }
}

/// A second `.` ends the number and is left for the caller, so `10.10.0` reads as `10.1`.
fn scan_number(s: &mut Scanner<'_>) -> Result<BareItem> {
    let mut literal = String::new();
    let mut decimal = false;

    if let Some(ch) = s.current() {
        literal.push(ch);
    }

    while let Some(ch) = s.advance() {
        if ch == '.' {
            if decimal {
                break;
            }
            decimal = true;
        } else if !ch.is_ascii_digit() {
            break;
        }
        literal.push(ch);
    }

    let digits = literal.strip_prefix('-').unwrap_or(&literal);

    if !decimal {
        if digits.is_empty() {
            return Err(Error::InvalidNumber(literal));
        }
        if digits.len() > MAX_INTEGER_DIGITS {
            return Err(Error::NumberTooLong(literal));
        }
        return literal
            .parse()
            .map(BareItem::Integer)
            .map_err(|_| Error::InvalidNumber(literal.clone()));
    }

    let (integer, fraction) = digits.split_at(digits.find('.').unwrap_or(digits.len()));
    let fraction = fraction.trim_start_matches('.');
    if integer.is_empty() || fraction.is_empty() {
        return Err(Error::InvalidNumber(literal));
    }
    if integer.len() > MAX_DECIMAL_INTEGER_DIGITS || fraction.len() > MAX_DECIMAL_FRACTION_DIGITS {
        return Err(Error::NumberTooLong(literal));
    }

    literal
        .parse()
        .map(BareItem::Decimal)
        .map_err(|_| Error::InvalidNumber(literal.clone()))
}

fn scan_string(s: &mut Scanner<'_>) -> Result<String> {
    let mut string = String::new();

    loop {
        match s.advance() {
            None => return Err(Error::UnterminatedString),
            Some('"') => break,
            Some('\\') => match s.advance() {
                Some(ch) if ch == '"' || ch == '\\' => string.push(ch),
                Some(ch) => return Err(Error::WrongEscape(ch)),
                None => return Err(Error::UnterminatedString),
            },
            Some(ch) if ch.is_control() => return Err(Error::NonPrintable(ch)),
            Some(ch) => string.push(ch),
        }
    }

    s.advance();
    Ok(string)
}

fn scan_token(s: &mut Scanner<'_>) -> String {
    let mut token = String::new();

    if let Some(ch) = s.current() {
        token.push(ch);
    }

    while let Some(ch) = s.advance() {
        if !is_token_char(ch) {
            break;
        }
        token.push(ch);
    }

    token
}

fn is_token_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric()
        || matches!(
            ch,
            '!' | '#'
                | '$'
                | '%'
                | '&'
                | '\''
                | '*'
                | '+'
                | '-'
                | '.'
                | '^'
                | '_'
                | '`'
                | '|'
                | '~'
                | ':'
                | '/'
        )
}

/// Reads `:...:` and returns the base64 encoding of the text between the colons. The text is
/// re-encoded, not decoded.
fn scan_binary(s: &mut Scanner<'_>) -> Result<Vec<u8>> {
    let mut text = String::new();

    loop {
        match s.advance() {
            Some(':') => break,
            Some(ch) if is_base64_char(ch) => text.push(ch),
            _ => return Err(Error::UnterminatedBinary),
        }
    }

    s.advance();
    Ok(STANDARD.encode(text.as_bytes()).into_bytes())
}

fn is_base64_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '+' || ch == '/' || ch == '='
}

fn scan_boolean(s: &mut Scanner<'_>) -> Result<bool> {
    let boolean = match s.advance() {
        Some('0') => false,
        Some('1') => true,
        other => return Err(Error::NotABoolean(other)),
    };

    s.advance();
    Ok(boolean)
}

fn scan_parameters(s: &mut Scanner<'_>) -> Result<Parameters> {
    let mut parameters = Parameters::new();

    while s.current() == Some(';') {
        s.advance();
        s.skip_whitespace();
        if s.is_eof() {
            break;
        }

        let key = scan_key(s).context("parameters")?;
        let value = if s.current() == Some('=') {
            s.advance();
            match scan_bare_item(s) {
                Err(Error::NotAnItem) => return Err(Error::InvalidParameter(key)),
                value => value.context("parameters")?,
            }
        } else {
            BareItem::Boolean(true)
        };

        parameters.insert(key, value);
    }

    Ok(parameters)
}

fn scan_key(s: &mut Scanner<'_>) -> Result<String> {
    let mut key = String::new();

    match s.current() {
        Some(ch) if ch.is_ascii_alphabetic() || ch == '*' => key.push(ch),
        other => return Err(Error::InvalidKey(other)),
    }

    while let Some(ch) = s.advance() {
        if !is_key_char(ch) {
            break;
        }
        key.push(ch);
    }

    Ok(key)
}

fn is_key_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.' | '*')
}

fn scan_list_item(s: &mut Scanner<'_>) -> Result<ListItem> {
    match scan_item(s) {
        Ok(item) => Ok(ListItem::Item(item)),
        Err(err) if err.is_not_an_item() => match scan_inner_list(s) {
            Ok(list) => Ok(ListItem::InnerList(list)),
            Err(err) if err.is_not_an_inner_list() => Err(Error::NeitherItemNorInnerList),
            Err(err) => Err(err),
        },
        Err(err) => Err(err),
    }
}

fn scan_inner_list(s: &mut Scanner<'_>) -> Result<InnerList> {
    if s.current() != Some('(') {
        return Err(Error::NotAnInnerList);
    }
    s.advance();

    let mut items = Vec::new();
    loop {
        s.skip_whitespace();
        match s.current() {
            None => return Err(Error::UnterminatedInnerList),
            Some(')') => break,
            Some(_) => {}
        }

        items.push(scan_item(s).context("inner list")?);

        match s.current() {
            Some(')') => break,
            Some(ch) if ch.is_whitespace() => continue,
            Some(ch) => return Err(Error::InnerListDelimiter(ch)),
            None => return Err(Error::UnterminatedInnerList),
        }
    }

    s.advance();
    let parameters = scan_parameters(s).context("inner list")?;

    Ok(InnerList::new(items, parameters))
}

fn scan_list(s: &mut Scanner<'_>) -> Result<List> {
    let mut list = List::new();

    loop {
        s.skip_whitespace();
        if s.is_eof() {
            break;
        }

        list.push(scan_list_item(s)?);

        s.skip_whitespace();
        match s.current() {
            None => break,
            Some(',') => {
                s.advance();
            }
            Some(ch) => return Err(Error::ListDelimiter(ch)),
        }
    }

    Ok(list)
}

fn scan_dictionary(s: &mut Scanner<'_>) -> Result<Dictionary> {
    let mut dictionary = Dictionary::new();

    loop {
        s.skip_whitespace();
        if s.is_eof() {
            break;
        }

        let (key, member) = scan_dictionary_member(s)?;
        dictionary.insert(key, member);

        s.skip_whitespace();
        match s.current() {
            None => break,
            Some(',') => {
                s.advance();
            }
            Some(ch) => return Err(Error::DictionaryDelimiter(ch)),
        }
    }

    Ok(dictionary)
}

/// `key=value`, or a bare `key` (optionally with parameters) standing for `?1`.
fn scan_dictionary_member(s: &mut Scanner<'_>) -> Result<(String, ListItem)> {
    let key = scan_key(s).context("dictionary member")?;

    match s.current() {
        Some('=') => {
            s.advance();
            let member = scan_list_item(s).context("dictionary member")?;
            Ok((key, member))
        }
        Some(ch) if ch != ',' && ch != ';' && !ch.is_whitespace() => {
            Err(Error::DictionaryValue(ch))
        }
        _ => {
            let parameters = scan_parameters(s).context("dictionary member")?;
            let item = Item::new(BareItem::Boolean(true), parameters);
            Ok((key, ListItem::Item(item)))
        }
    }
}
