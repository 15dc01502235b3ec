//! Advance-then-read cursor over a table's occupied slots.

use crate::raw_table::Iter;
use crate::value::Value;

/// Cursor positioned before the first slot until the first [`advance`].
///
/// After `advance` returns `true`, [`key`] and [`value`] expose the entry
/// just reached. Once it returns `false` the cursor is exhausted for good;
/// there is no rewind, take a new cursor instead. The cursor borrows the
/// table, so the table cannot change underneath it.
///
/// [`advance`]: Cursor::advance
/// [`key`]: Cursor::key
/// [`value`]: Cursor::value
pub struct Cursor<'a, V = Value> {
    iter: Iter<'a, V>,
    current: Option<(&'a str, &'a V)>,
}

impl<'a, V> Cursor<'a, V> {
    pub(crate) fn new(iter: Iter<'a, V>) -> Self {
        Self {
            iter,
            current: None,
        }
    }

    /// Move to the next occupied slot. Returns `false` when none remain.
    pub fn advance(&mut self) -> bool {
        self.current = self.iter.next();
        self.current.is_some()
    }

    pub fn key(&self) -> Option<&'a str> {
        self.current.map(|(k, _)| k)
    }

    pub fn value(&self) -> Option<&'a V> {
        self.current.map(|(_, v)| v)
    }

    pub fn current(&self) -> Option<(&'a str, &'a V)> {
        self.current
    }

    /// Occupied slots not yet reached.
    pub fn remaining(&self) -> usize {
        self.iter.len()
    }
}
