//! Stored values and the write payloads that produce them.
//!
//! Every slot carries its own `Value` discriminant, so a key written as a
//! counter can never be read back as bytes (or the other way round). Writes
//! describe their kind and copy mode through `Payload`.

use crate::error::{Result, TableError};
use core::fmt;

/// Which of the two value shapes a slot or payload holds.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ValueKind {
    Counter,
    Bytes,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValueKind::Counter => "counter",
            ValueKind::Bytes => "bytes",
        })
    }
}

/// A value owned by the table.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Value {
    /// Accumulating 32-bit counter.
    Counter(i32),
    /// Exactly sized byte buffer; no terminator is stored.
    Bytes(Vec<u8>),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Counter(_) => ValueKind::Counter,
            Value::Bytes(_) => ValueKind::Bytes,
        }
    }

    pub fn as_counter(&self) -> Option<i32> {
        match *self {
            Value::Counter(n) => Some(n),
            Value::Bytes(_) => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            Value::Counter(_) => None,
        }
    }

    /// Build the value a fresh slot stores for `payload`.
    pub(crate) fn from_payload(payload: Payload<'_>) -> Result<Self> {
        match payload {
            Payload::Counter(n) => Ok(Value::Counter(n)),
            _ => copy_bytes(payload.source()).map(Value::Bytes),
        }
    }

    /// Apply `payload` to an existing value: counters add, byte buffers are
    /// replaced. On a kind mismatch the stored kind is returned and `self` is
    /// left untouched.
    pub(crate) fn merge(&mut self, payload: Payload<'_>) -> Result<(), MergeError> {
        match (self, payload) {
            (Value::Counter(n), Payload::Counter(delta)) => {
                *n = n.wrapping_add(delta);
                Ok(())
            }
            (Value::Bytes(buf), p @ (Payload::Bounded { .. } | Payload::Terminated(_))) => {
                // Copy first so a failed allocation keeps the old buffer.
                *buf = copy_bytes(p.source()).map_err(MergeError::Alloc)?;
                Ok(())
            }
            (stored, _) => Err(MergeError::Kind(stored.kind())),
        }
    }
}

/// Why `Value::merge` refused a payload.
#[derive(Debug)]
pub(crate) enum MergeError {
    Kind(ValueKind),
    Alloc(TableError),
}

/// A write request: the value to store plus how to copy it.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Payload<'a> {
    /// Add to (or start) a counter.
    Counter(i32),
    /// Length-bounded bytes: copy at most `len` bytes of `bytes`. Embedded
    /// NULs are kept; `len == 0` stores an empty buffer.
    Bounded { bytes: &'a [u8], len: usize },
    /// NUL-terminated bytes: copy up to the first NUL, or all of `bytes`
    /// when there is none.
    Terminated(&'a [u8]),
}

impl<'a> Payload<'a> {
    pub fn kind(&self) -> ValueKind {
        match self {
            Payload::Counter(_) => ValueKind::Counter,
            Payload::Bounded { .. } | Payload::Terminated(_) => ValueKind::Bytes,
        }
    }

    /// The exact bytes a write of this payload stores. Empty for counters.
    pub fn source(&self) -> &'a [u8] {
        match *self {
            Payload::Counter(_) => &[],
            Payload::Bounded { bytes, len } => &bytes[..len.min(bytes.len())],
            Payload::Terminated(bytes) => {
                let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
                &bytes[..end]
            }
        }
    }
}

impl From<i32> for Payload<'_> {
    fn from(n: i32) -> Self {
        Payload::Counter(n)
    }
}

impl<'a> From<&'a str> for Payload<'a> {
    fn from(s: &'a str) -> Self {
        Payload::Terminated(s.as_bytes())
    }
}

/// Copy `src` into an exactly sized buffer, reporting allocator refusal.
pub(crate) fn copy_bytes(src: &[u8]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(src.len())
        .map_err(|_| TableError::AllocationFailure {
            requested: src.len(),
        })?;
    buf.extend_from_slice(src);
    Ok(buf)
}

/// Copy a key into owned storage, reporting allocator refusal.
pub(crate) fn copy_key(key: &str) -> Result<Box<str>> {
    let mut s = String::new();
    s.try_reserve_exact(key.len())
        .map_err(|_| TableError::AllocationFailure {
            requested: key.len(),
        })?;
    s.push_str(key);
    Ok(s.into_boxed_str())
}
