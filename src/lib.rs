//! probe-table: a string-keyed open-addressing hash table holding either
//! accumulating counters or byte buffers.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small, predictable table whose slot placement is reproducible
//!   (fixed FNV-1a hash, power-of-two mask, linear probing) and whose write
//!   paths can neither leak nor double free.
//! - Layers:
//!   - RawTable<V, S>: structural layer. Owns the slot array, hashes keys,
//!     probes, grows, iterates in slot order. Values are opaque.
//!   - Table<S>: semantic layer over `RawTable<Value, S>`. Implements the
//!     upsert rules: counters add, byte buffers are replaced, kinds never
//!     change once a key exists.
//!
//! Constraints
//! - Single-threaded: no internal locking. `Table` is `Send + Sync` as plain
//!   owned data, so it can sit behind a caller's `Mutex`.
//! - Load factor stays below one half: inserting a new key grows the table
//!   first when one more entry would bring `len` to `capacity / 2`. Updates
//!   of existing keys never grow. Hence
//!   `capacity > 2 * len` and every probe ends at an empty slot.
//! - No deletion. Occupied slots stay occupied until the table is dropped.
//! - Capacity is a power of two (the default request of 1000 becomes 1024).
//!
//! Hasher and growth invariants
//! - Each slot stores its key's `u64` hash; growth places entries by the
//!   stored hash and moves keys and values instead of copying them.
//! - Growth reserves the doubled array before touching the old one. If the
//!   reservation fails, or the configured `max_capacity` would be passed,
//!   the table keeps its previous state and the write reports the error.
//! - Keys are fed to the hasher as raw bytes in one `write` call, so the
//!   default hasher yields plain FNV-1a of the key.
//!
//! Value model
//! - Each slot carries a `Value` enum, so the kind travels with the entry
//!   rather than with every call. A mismatched write is rejected with
//!   `TableError::KindMismatch`.
//! - Byte payloads come in two copy modes: `Payload::Bounded` copies at most
//!   `len` bytes; `Payload::Terminated` copies up to the first NUL. Both
//!   store exactly the copied bytes.
//!
//! Notes and non-goals
//! - No removal, no concurrent access, no seeded/DoS-resistant hashing.
//! - Iteration order is physical slot order and changes when the table grows.
//! - Counters wrap on overflow.

pub mod config;
mod cursor;
pub mod error;
pub mod fnv;
pub mod raw_table;
mod raw_table_proptest;
mod table;
pub mod value;

// Public surface
pub use config::{TableConfig, TableConfigBuilder};
pub use cursor::Cursor;
pub use error::{Result, TableError};
pub use fnv::{fnv1a, FnvBuildHasher, FnvHasher};
pub use raw_table::RawTable;
pub use table::Table;
pub use value::{Payload, Value, ValueKind};
