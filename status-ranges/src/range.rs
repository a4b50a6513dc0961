use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{RangeError, Result};
use crate::set::Set;
use crate::token::{Token, Tokens};

/// One end of a [`BoundedRange`].
///
/// A strict bound excludes its own value, an inclusive one covers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bound {
    value: i64,
    strict: bool,
}

impl Bound {
    pub fn inclusive(value: i64) -> Self {
        Bound {
            value,
            strict: false,
        }
    }

    pub fn strict(value: i64) -> Self {
        Bound {
            value,
            strict: true,
        }
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Orders lower bounds: at the same value an inclusive bound starts earlier.
    fn cmp_as_lower(&self, other: &Bound) -> Ordering {
        self.value
            .cmp(&other.value)
            .then(self.strict.cmp(&other.strict))
    }

    /// Orders upper bounds: at the same value an inclusive bound ends later.
    fn cmp_as_upper(&self, other: &Bound) -> Ordering {
        self.value
            .cmp(&other.value)
            .then(other.strict.cmp(&self.strict))
    }
}

/// A contiguous span of integers, e.g. `[500 599]` or `(505 600]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundedRange {
    from: Bound,
    to: Bound,
}

impl BoundedRange {
    /// Fails if the range cannot cover anything: `from > to`, or `from == to` with both ends
    /// strict.
    pub fn new(from: Bound, to: Bound) -> Result<Self> {
        let range = BoundedRange { from, to };
        if from.value > to.value || (from.strict && to.strict && from.value == to.value) {
            return Err(RangeError::Empty(range.to_string()));
        }
        Ok(range)
    }

    pub fn from(&self) -> Bound {
        self.from
    }

    pub fn to(&self) -> Bound {
        self.to
    }

    pub fn includes(&self, num: i64) -> bool {
        let above = self.from.value < num || (!self.from.strict && self.from.value == num);
        let below = self.to.value > num || (!self.to.strict && self.to.value == num);
        above && below
    }

    fn overlaps(&self, other: &BoundedRange) -> bool {
        self.to.value > other.from.value && self.from.value < other.to.value
    }

    /// `self` ends exactly where `other` starts and covers the shared point itself.
    fn adjoins(&self, other: &BoundedRange) -> bool {
        self.to.value == other.from.value && !self.to.strict
    }

    fn touches(&self, other: &BoundedRange) -> bool {
        self.overlaps(other) || self.adjoins(other) || other.adjoins(self)
    }

    fn merge(&self, other: &BoundedRange) -> BoundedRange {
        let from = match self.from.cmp_as_lower(&other.from) {
            Ordering::Greater => other.from,
            _ => self.from,
        };
        let to = match self.to.cmp_as_upper(&other.to) {
            Ordering::Less => other.to,
            _ => self.to,
        };
        BoundedRange { from, to }
    }
}

impl fmt::Display for BoundedRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = if self.from.strict { '(' } else { '[' };
        let close = if self.to.strict { ')' } else { ']' };
        write!(f, "{}{} {}{}", open, self.from.value, self.to.value, close)
    }
}

/// A set of integers described as merged bounded ranges plus standalone values.
///
/// ```
/// use status_ranges::Range;
///
/// let range: Range = "[400 500 ] 505 [111 450] (505 600] 505 400 200".parse().unwrap();
/// assert_eq!(range.to_string(), "[111 500] (505 600] 505");
/// assert!(range.includes(505));
/// assert!(range.includes(600));
/// assert!(!range.includes(601));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Range {
    bounded: Vec<BoundedRange>,
    values: Set<i64>,
}

impl Range {
    pub fn parse(input: &str) -> Result<Self> {
        let mut tokens = Tokens::new(input);
        let mut bounded = Vec::new();
        let mut values = Set::new();

        while let Some(token) = tokens.next() {
            match token? {
                Token::Open { strict } => bounded.push(scan_bounded(&mut tokens, strict)?),
                Token::Integer(value) => {
                    values.add(value);
                }
                Token::Close { strict } => {
                    return Err(RangeError::UnexpectedEnd(if strict { ')' } else { ']' }))
                }
            }
        }

        Ok(Range::from_parts(bounded, values))
    }

    /// Builds a range, merging touching bounded ranges and absorbing covered values.
    pub fn from_parts<I>(bounded: Vec<BoundedRange>, values: I) -> Self
    where
        I: IntoIterator<Item = i64>,
    {
        let bounded = merge_ranges(bounded);
        let mut values: Set<i64> = values.into_iter().collect();
        values.retain(|value| !bounded.iter().any(|range| range.includes(*value)));

        Range { bounded, values }
    }

    pub fn includes(&self, num: i64) -> bool {
        self.values.includes(&num) || self.bounded.iter().any(|range| range.includes(num))
    }

    /// Merged bounded ranges, ordered by their lower bound.
    pub fn bounded(&self) -> &[BoundedRange] {
        &self.bounded
    }

    /// Standalone values not covered by any bounded range.
    pub fn values(&self) -> &Set<i64> {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.bounded.is_empty() && self.values.is_empty()
    }
}

impl FromStr for Range {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self> {
        Range::parse(s)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for range in &self.bounded {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{}", range)?;
            first = false;
        }
        for value in &self.values {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{}", value)?;
            first = false;
        }
        Ok(())
    }
}

fn scan_bounded(tokens: &mut Tokens<'_>, strict: bool) -> Result<BoundedRange> {
    let from = scan_int(tokens)?;
    let to = scan_int(tokens)?;

    match tokens.next().transpose()? {
        Some(Token::Close { strict: to_strict }) => BoundedRange::new(
            Bound {
                value: from,
                strict,
            },
            Bound {
                value: to,
                strict: to_strict,
            },
        ),
        _ => Err(RangeError::Unclosed),
    }
}

fn scan_int(tokens: &mut Tokens<'_>) -> Result<i64> {
    match tokens.next().transpose()? {
        Some(Token::Integer(value)) => Ok(value),
        _ => Err(RangeError::MissingBound),
    }
}

/// Sorts by lower bound and folds every range into its predecessor when they touch.
///
/// After sorting, a range that does not touch the last merged range cannot touch any earlier
/// one either, so a single sweep reaches the same result as merging pairs until nothing changes.
fn merge_ranges(mut ranges: Vec<BoundedRange>) -> Vec<BoundedRange> {
    ranges.sort_by(|a, b| a.from.cmp_as_lower(&b.from));

    let mut merged: Vec<BoundedRange> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if last.touches(&range) => *last = last.merge(&range),
            _ => merged.push(range),
        }
    }
    merged
}
