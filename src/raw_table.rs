//! RawTable: structural layer. String keys, opaque values, linear probing
//! over a power-of-two slot array.

use crate::config::{TableConfig, DEFAULT_INITIAL_CAPACITY};
use crate::cursor::Cursor;
use crate::error::{Result, TableError};
use crate::fnv::FnvBuildHasher;
use crate::value::copy_key;
use core::fmt;
use core::hash::{BuildHasher, Hasher};
use core::iter::FusedIterator;
use core::mem;

#[derive(Debug)]
pub(crate) struct Slot<V> {
    key: Box<str>,
    value: V,
    hash: u64, // cached so growth never rehashes key bytes
}

/// Open-addressing table keyed by strings.
///
/// Occupied slots are never cleared individually. `len < capacity / 2` holds
/// after every operation, so a probe always reaches an empty slot.
pub struct RawTable<V, S = FnvBuildHasher> {
    hasher: S,
    slots: Vec<Option<Slot<V>>>,
    len: usize,
    max_capacity: usize,
}

impl<V> RawTable<V> {
    /// Empty table with the default 1024 slots and FNV-1a hashing.
    pub fn new() -> Self {
        Self::with_hasher(FnvBuildHasher)
    }

    /// Like [`new`](Self::new), but reports a refused slot array instead of aborting.
    pub fn try_new() -> Result<Self> {
        Self::with_config(TableConfig::default())
    }

    pub fn with_config(config: TableConfig) -> Result<Self> {
        Self::with_config_and_hasher(config, FnvBuildHasher)
    }
}

impl<V> Default for RawTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, S> RawTable<V, S>
where
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        let capacity = DEFAULT_INITIAL_CAPACITY.next_power_of_two();
        Self {
            hasher,
            slots: core::iter::repeat_with(|| None).take(capacity).collect(),
            len: 0,
            max_capacity: usize::MAX,
        }
    }

    pub fn with_config_and_hasher(config: TableConfig, hasher: S) -> Result<Self> {
        let capacity = config.slot_count()?;
        Ok(Self {
            hasher,
            slots: try_alloc_slots(capacity)?,
            len: 0,
            max_capacity: config.max_capacity,
        })
    }

    fn make_hash(&self, key: &str) -> u64 {
        // Raw bytes through a single `write`: no length prefix or terminator.
        let mut h = self.hasher.build_hasher();
        h.write(key.as_bytes());
        h.finish()
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current slot count; always a power of two.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn max_capacity(&self) -> usize {
        self.max_capacity
    }

    /// Index of the slot holding `key`, or of the empty slot that ends its probe.
    fn probe(slots: &[Option<Slot<V>>], hash: u64, key: &str) -> usize {
        let mask = slots.len() - 1;
        let mut i = (hash as usize) & mask;
        loop {
            match &slots[i] {
                None => return i,
                Some(s) if s.hash == hash && *s.key == *key => return i,
                Some(_) => i = (i + 1) & mask,
            }
        }
    }

    /// First empty slot on the probe path of `hash`.
    fn vacant_index(slots: &[Option<Slot<V>>], hash: u64) -> usize {
        let mask = slots.len() - 1;
        let mut i = (hash as usize) & mask;
        while slots[i].is_some() {
            i = (i + 1) & mask;
        }
        i
    }

    fn find_slot(&self, key: &str) -> Option<&Slot<V>> {
        let hash = self.make_hash(key);
        self.slots[Self::probe(&self.slots, hash, key)].as_ref()
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.find_slot(key).map(|s| &s.value)
    }

    pub fn get_key_value(&self, key: &str) -> Option<(&str, &V)> {
        self.find_slot(key).map(|s| (&*s.key, &s.value))
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let hash = self.make_hash(key);
        let i = Self::probe(&self.slots, hash, key);
        self.slots[i].as_mut().map(|s| &mut s.value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.find_slot(key).is_some()
    }

    fn needs_grow(&self) -> bool {
        self.len + 1 >= self.capacity() / 2
    }

    /// Double the slot array and move every entry into it.
    ///
    /// The new array is reserved before anything moves; on error the table
    /// keeps its old array, capacity and contents.
    pub fn grow(&mut self) -> Result<()> {
        let old_capacity = self.capacity();
        let new_capacity = match old_capacity.checked_mul(2) {
            Some(c) if c <= self.max_capacity => c,
            _ => {
                tracing::warn!(
                    capacity = old_capacity,
                    limit = self.max_capacity,
                    "table growth refused at capacity limit"
                );
                return Err(TableError::CapacityOverflow {
                    capacity: old_capacity,
                    limit: self.max_capacity,
                });
            }
        };
        let mut slots = try_alloc_slots(new_capacity).map_err(|e| {
            tracing::warn!(
                capacity = old_capacity,
                requested = new_capacity,
                "table growth failed: {}",
                e
            );
            e
        })?;

        // Ownership of keys and values moves; nothing is re-copied.
        for slot in mem::take(&mut self.slots).into_iter().flatten() {
            let i = Self::vacant_index(&slots, slot.hash);
            slots[i] = Some(slot);
        }
        self.slots = slots;
        tracing::debug!(
            from = old_capacity,
            to = new_capacity,
            len = self.len,
            "table grew"
        );
        Ok(())
    }

    /// Locate `key` for an insert-or-update.
    ///
    /// An existing key never triggers growth. For an absent key the table
    /// grows first when one more entry would bring the load factor to one
    /// half, and the vacant slot is taken from the grown array.
    pub fn entry<'k>(&mut self, key: &'k str) -> Result<Entry<'_, 'k, V>> {
        let hash = self.make_hash(key);
        let mut index = Self::probe(&self.slots, hash, key);
        if self.slots[index].is_none() && self.needs_grow() {
            self.grow()?;
            index = Self::vacant_index(&self.slots, hash);
        }
        let slot = &mut self.slots[index];
        Ok(match slot {
            Some(occupied) => Entry::Occupied(OccupiedEntry { slot: occupied }),
            None => Entry::Vacant(VacantEntry {
                slot,
                len: &mut self.len,
                key,
                hash,
            }),
        })
    }

    /// Insert or replace; returns the previous value for an existing key.
    pub fn insert(&mut self, key: &str, value: V) -> Result<Option<V>> {
        match self.entry(key)? {
            Entry::Occupied(mut o) => Ok(Some(mem::replace(o.get_mut(), value))),
            Entry::Vacant(v) => {
                v.insert(value)?;
                Ok(None)
            }
        }
    }

    /// Entries in physical slot order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.len,
        }
    }

    /// Explicit advance-then-read cursor over the same order as [`iter`](Self::iter).
    pub fn cursor(&self) -> Cursor<'_, V> {
        Cursor::new(self.iter())
    }

    #[cfg(test)]
    pub(crate) fn slot_of(&self, key: &str) -> Option<usize> {
        let hash = self.make_hash(key);
        let i = Self::probe(&self.slots, hash, key);
        self.slots[i].as_ref().map(|_| i)
    }
}

fn try_alloc_slots<V>(capacity: usize) -> Result<Vec<Option<Slot<V>>>> {
    let mut slots = Vec::new();
    slots
        .try_reserve_exact(capacity)
        .map_err(|_| TableError::AllocationFailure {
            requested: capacity,
        })?;
    slots.resize_with(capacity, || None);
    Ok(slots)
}

impl<V: fmt::Debug, S> fmt::Debug for RawTable<V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self
            .slots
            .iter()
            .flatten()
            .map(|s| (&s.key, &s.value));
        f.debug_map().entries(entries).finish()
    }
}

/// Result of [`RawTable::entry`].
pub enum Entry<'a, 'k, V> {
    Occupied(OccupiedEntry<'a, V>),
    Vacant(VacantEntry<'a, 'k, V>),
}

pub struct OccupiedEntry<'a, V> {
    slot: &'a mut Slot<V>,
}

impl<'a, V> OccupiedEntry<'a, V> {
    pub fn key(&self) -> &str {
        &self.slot.key
    }

    pub fn get(&self) -> &V {
        &self.slot.value
    }

    pub fn get_mut(&mut self) -> &mut V {
        &mut self.slot.value
    }

    pub fn into_mut(self) -> &'a mut V {
        &mut self.slot.value
    }
}

pub struct VacantEntry<'a, 'k, V> {
    slot: &'a mut Option<Slot<V>>,
    len: &'a mut usize,
    key: &'k str,
    hash: u64,
}

impl<'a, 'k, V> VacantEntry<'a, 'k, V> {
    pub fn key(&self) -> &'k str {
        self.key
    }

    /// Copy the key into owned storage and fill the slot.
    pub fn insert(self, value: V) -> Result<&'a mut V> {
        let key = copy_key(self.key)?;
        *self.len += 1;
        let slot = self.slot.insert(Slot {
            key,
            value,
            hash: self.hash,
        });
        Ok(&mut slot.value)
    }
}

/// Iterator over occupied slots in physical order.
pub struct Iter<'a, V> {
    slots: core::slice::Iter<'a, Option<Slot<V>>>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.slots.find_map(Option::as_ref)?;
        self.remaining -= 1;
        Some((&*slot.key, &slot.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}
impl<V> FusedIterator for Iter<'_, V> {}

/// Owning iterator; yields keys as `String`.
pub struct IntoIter<V> {
    slots: std::vec::IntoIter<Option<Slot<V>>>,
    remaining: usize,
}

impl<V> Iterator for IntoIter<V> {
    type Item = (String, V);

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.slots.find_map(|s| s)?;
        self.remaining -= 1;
        Some((slot.key.into_string(), slot.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for IntoIter<V> {}
impl<V> FusedIterator for IntoIter<V> {}

impl<V, S> IntoIterator for RawTable<V, S> {
    type Item = (String, V);
    type IntoIter = IntoIter<V>;

    fn into_iter(self) -> IntoIter<V> {
        IntoIter {
            remaining: self.len,
            slots: self.slots.into_iter(),
        }
    }
}

impl<'a, V, S: BuildHasher> IntoIterator for &'a RawTable<V, S> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Iter<'a, V> {
        self.iter()
    }
}
