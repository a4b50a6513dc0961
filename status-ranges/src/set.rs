use std::collections::btree_set::{self, BTreeSet};
use std::iter::FromIterator;

/// A collection of unique values.
///
/// Enumeration is always in ascending order, so anything rendered from a `Set` is stable for a
/// given input regardless of insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Set<T: Ord> {
    values: BTreeSet<T>,
}

impl<T: Ord> Set<T> {
    pub fn new() -> Self {
        Set {
            values: BTreeSet::new(),
        }
    }

    /// Inserts `value`, returning `false` if it was already present.
    pub fn add(&mut self, value: T) -> bool {
        self.values.insert(value)
    }

    /// Removes `value`, returning `false` if it was not present.
    pub fn remove(&mut self, value: &T) -> bool {
        self.values.remove(value)
    }

    pub fn includes(&self, value: &T) -> bool {
        self.values.contains(value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> btree_set::Iter<'_, T> {
        self.values.iter()
    }

    /// Keeps only the values for which `keep` returns `true`.
    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.values.retain(keep)
    }
}

impl<T: Ord> Default for Set<T> {
    fn default() -> Self {
        Set::new()
    }
}

impl<T: Ord> FromIterator<T> for Set<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Set {
            values: iter.into_iter().collect(),
        }
    }
}

impl<T: Ord> Extend<T> for Set<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.values.extend(iter)
    }
}

impl<T: Ord> IntoIterator for Set<T> {
    type Item = T;
    type IntoIter = btree_set::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a, T: Ord> IntoIterator for &'a Set<T> {
    type Item = &'a T;
    type IntoIter = btree_set::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
