//! Table: counters and byte payloads on top of `RawTable`.

use crate::config::TableConfig;
use crate::cursor::Cursor;
use crate::error::{Result, TableError};
use crate::fnv::FnvBuildHasher;
use crate::raw_table::{Entry, IntoIter, Iter, RawTable};
use crate::value::{MergeError, Payload, Value};
use core::fmt;
use core::hash::BuildHasher;

/// String-keyed table of counters and byte buffers.
///
/// Counters accumulate: writing `Payload::Counter(n)` to an existing counter
/// adds `n`. Byte values are replaced wholesale. A key keeps the kind it was
/// first written with; writing the other kind is a [`TableError::KindMismatch`].
pub struct Table<S = FnvBuildHasher> {
    raw: RawTable<Value, S>,
}

impl Table {
    /// Empty table with 1024 slots.
    pub fn new() -> Self {
        Self {
            raw: RawTable::new(),
        }
    }

    /// Like [`new`](Self::new), but reports a refused slot array instead of aborting.
    pub fn try_new() -> Result<Self> {
        Ok(Self {
            raw: RawTable::try_new()?,
        })
    }

    pub fn with_config(config: TableConfig) -> Result<Self> {
        Ok(Self {
            raw: RawTable::with_config(config)?,
        })
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Table<S>
where
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            raw: RawTable::with_hasher(hasher),
        }
    }

    pub fn with_config_and_hasher(config: TableConfig, hasher: S) -> Result<Self> {
        Ok(Self {
            raw: RawTable::with_config_and_hasher(config, hasher)?,
        })
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.raw.get(key)
    }

    /// The counter stored under `key`, if it holds one.
    pub fn get_counter(&self, key: &str) -> Option<i32> {
        self.raw.get(key).and_then(Value::as_counter)
    }

    /// The bytes stored under `key`, if it holds a byte value.
    pub fn get_bytes(&self, key: &str) -> Option<&[u8]> {
        self.raw.get(key).and_then(Value::as_bytes)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.raw.contains_key(key)
    }

    /// Insert `key`, or merge `payload` into its current value.
    ///
    /// A new key may grow the table first; an existing key never does. On
    /// any error (growth refused, allocation failure, kind mismatch) the
    /// stored entries are unchanged, though a growth that succeeded before
    /// a failed key or value copy keeps its larger capacity.
    pub fn upsert(&mut self, key: &str, payload: Payload<'_>) -> Result<()> {
        match self.raw.entry(key)? {
            Entry::Occupied(mut o) => match o.get_mut().merge(payload) {
                Ok(()) => Ok(()),
                Err(MergeError::Alloc(e)) => Err(e),
                Err(MergeError::Kind(stored)) => {
                    tracing::trace!(
                        key,
                        %stored,
                        incoming = %payload.kind(),
                        "rejected write of mismatched kind"
                    );
                    Err(TableError::KindMismatch {
                        key: key.to_string(),
                        stored,
                        incoming: payload.kind(),
                    })
                }
            },
            Entry::Vacant(v) => {
                v.insert(Value::from_payload(payload)?)?;
                Ok(())
            }
        }
    }

    /// Add `delta` to the counter under `key`, starting it at `delta`.
    pub fn add(&mut self, key: &str, delta: i32) -> Result<()> {
        self.upsert(key, Payload::Counter(delta))
    }

    /// Store `value` (up to its first NUL) under `key`.
    pub fn put_str(&mut self, key: &str, value: &str) -> Result<()> {
        self.upsert(key, Payload::Terminated(value.as_bytes()))
    }

    /// Store at most `len` bytes of `bytes` under `key`.
    pub fn put_bounded(&mut self, key: &str, bytes: &[u8], len: usize) -> Result<()> {
        self.upsert(key, Payload::Bounded { bytes, len })
    }

    pub fn iter(&self) -> Iter<'_, Value> {
        self.raw.iter()
    }

    pub fn cursor(&self) -> Cursor<'_> {
        self.raw.cursor()
    }
}

impl<S> fmt::Debug for Table<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.raw, f)
    }
}

impl<S> IntoIterator for Table<S> {
    type Item = (String, Value);
    type IntoIter = IntoIter<Value>;

    fn into_iter(self) -> IntoIter<Value> {
        self.raw.into_iter()
    }
}

impl<'a, S: BuildHasher> IntoIterator for &'a Table<S> {
    type Item = (&'a str, &'a Value);
    type IntoIter = Iter<'a, Value>;

    fn into_iter(self) -> Iter<'a, Value> {
        self.raw.iter()
    }
}
