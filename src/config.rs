//! Table configuration with defaults and a builder.

use crate::error::{Result, TableError};

/// Initial slot count requested by default. Rounded up to 1024 at creation.
pub const DEFAULT_INITIAL_CAPACITY: usize = 1000;

/// Smallest slot count a table is created with. From 4 slots up, a single
/// doubling always restores `len < capacity / 2`.
pub const MIN_CAPACITY: usize = 4;

/// Sizing parameters for a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableConfig {
    /// Requested slot count at creation. Rounded up to the next power of two
    /// (minimum [`MIN_CAPACITY`]) because indexing masks the hash with
    /// `capacity - 1`.
    pub initial_capacity: usize,

    /// Upper bound on the slot count. Growth that would pass it fails with
    /// [`TableError::CapacityOverflow`] and leaves the table as it was.
    pub max_capacity: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            max_capacity: usize::MAX,
        }
    }
}

impl TableConfig {
    /// Create a new config builder
    pub fn builder() -> TableConfigBuilder {
        TableConfigBuilder::default()
    }

    /// Slot count the table starts with.
    pub fn slot_count(&self) -> Result<usize> {
        let requested = self.initial_capacity.max(MIN_CAPACITY);
        match requested.checked_next_power_of_two() {
            Some(n) if n <= self.max_capacity => Ok(n),
            _ => Err(TableError::CapacityOverflow {
                capacity: requested,
                limit: self.max_capacity,
            }),
        }
    }
}

/// Builder for TableConfig
#[derive(Debug, Default)]
pub struct TableConfigBuilder {
    config: TableConfig,
}

impl TableConfigBuilder {
    /// Set the requested initial slot count
    pub fn initial_capacity(mut self, slots: usize) -> Self {
        self.config.initial_capacity = slots;
        self
    }

    /// Set the maximum slot count growth may reach
    pub fn max_capacity(mut self, slots: usize) -> Self {
        self.config.max_capacity = slots;
        self
    }

    pub fn build(self) -> TableConfig {
        self.config
    }
}
