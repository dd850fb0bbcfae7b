//! # Table Configuration
//!
//! Construction parameters shared by the table family. Each variant reads the fields it needs
//! and ignores the rest, so a single [`TableConfig`] can build any of them:
//!
//! ```rust
//! use hash_tables::hashing::{RobinHoodTable, TableConfig};
//!
//! let config = TableConfig::new().with_min_capacity(64).with_salt(99);
//! let mut table: RobinHoodTable<&str> = RobinHoodTable::with_config(&config);
//! table.set(1, "one").unwrap();
//! assert_eq!(table.capacity(), 64);
//! ```

use super::indexer::DEFAULT_SALT;

/// Default initial (and minimum) capacity.
pub const DEFAULT_CAPACITY: usize = 32;

/// Fraction of the backing array reserved as the coalesced-chaining cellar.
pub const DEFAULT_CELLAR_RATIO: f64 = 0.14;

/// Tombstone share of capacity that forces a double-hashing rebuild.
pub const DEFAULT_TOMBSTONE_RATIO: f64 = 0.2;

/// Evictions a cuckoo insertion may perform before the table is reseeded.
pub const DEFAULT_MAX_KICKS: usize = 16;

/// Reseed attempts a cuckoo insertion makes before asking the table to grow.
pub const DEFAULT_MAX_RESEEDS: usize = 32;

/// Width of the hopscotch neighborhood.
pub const DEFAULT_NEIGHBORHOOD: usize = 32;

/// Upper bound on the hopscotch neighborhood width.
pub const MAX_NEIGHBORHOOD: usize = 64;

/// Construction parameters for every table variant.
#[derive(Debug, Clone, PartialEq)]
pub struct TableConfig {
    /// Initial capacity and the floor below which the table never shrinks.
    pub min_capacity: usize,
    /// Table-instance identifier mixed into every hash.
    pub salt: u64,
    pub cellar_ratio: f64,
    pub tombstone_ratio: f64,
    pub max_kicks: usize,
    pub max_reseeds: usize,
    pub neighborhood: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            min_capacity: DEFAULT_CAPACITY,
            salt: DEFAULT_SALT,
            cellar_ratio: DEFAULT_CELLAR_RATIO,
            tombstone_ratio: DEFAULT_TOMBSTONE_RATIO,
            max_kicks: DEFAULT_MAX_KICKS,
            max_reseeds: DEFAULT_MAX_RESEEDS,
            neighborhood: DEFAULT_NEIGHBORHOOD,
        }
    }
}

impl TableConfig {
    /// Creates a configuration with every default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial/minimum capacity. Values below one are raised to one.
    pub fn with_min_capacity(mut self, capacity: usize) -> Self {
        self.min_capacity = capacity.max(1);
        self
    }

    /// Sets the salt fed to the hash indexer.
    pub fn with_salt(mut self, salt: u64) -> Self {
        self.salt = salt;
        self
    }

    /// Sets the cellar share for coalesced chaining.
    pub fn with_cellar_ratio(mut self, ratio: f64) -> Self {
        assert!(ratio > 0.0 && ratio < 1.0, "Cellar ratio must be in (0,1)");
        self.cellar_ratio = ratio;
        self
    }

    /// Sets the tombstone share that triggers a double-hashing rebuild.
    pub fn with_tombstone_ratio(mut self, ratio: f64) -> Self {
        assert!(
            (0.0..1.0).contains(&ratio),
            "Tombstone threshold must be in [0,1)"
        );
        self.tombstone_ratio = ratio;
        self
    }

    /// Sets the cuckoo eviction bound.
    pub fn with_max_kicks(mut self, kicks: usize) -> Self {
        assert!(kicks > 0, "Kick limit must be > 0");
        self.max_kicks = kicks;
        self
    }

    /// Sets how many times a cuckoo insertion may reseed before growing.
    pub fn with_max_reseeds(mut self, reseeds: usize) -> Self {
        self.max_reseeds = reseeds;
        self
    }

    /// Sets the hopscotch neighborhood width.
    pub fn with_neighborhood(mut self, width: usize) -> Self {
        assert!(
            (1..=MAX_NEIGHBORHOOD).contains(&width),
            "Neighborhood must be in [1, {}]",
            MAX_NEIGHBORHOOD
        );
        self.neighborhood = width;
        self
    }

    /// Minimum capacity rounded up to a power of two, for the variants that require one.
    pub(crate) fn power_of_two_capacity(&self) -> usize {
        self.min_capacity.max(2).next_power_of_two()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = TableConfig::new();
        assert_eq!(config.min_capacity, 32);
        assert_eq!(config.max_kicks, 16);
        assert_eq!(config.neighborhood, 32);
        assert!((config.cellar_ratio - 0.14).abs() < f64::EPSILON);
        assert!((config.tombstone_ratio - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn power_of_two_rounding() {
        assert_eq!(TableConfig::new().with_min_capacity(20).power_of_two_capacity(), 32);
        assert_eq!(TableConfig::new().with_min_capacity(0).power_of_two_capacity(), 2);
        assert_eq!(TableConfig::new().with_min_capacity(64).power_of_two_capacity(), 64);
    }

    #[test]
    #[should_panic(expected = "Neighborhood must be in")]
    fn rejects_oversized_neighborhood() {
        let _ = TableConfig::new().with_neighborhood(MAX_NEIGHBORHOOD + 1);
    }
}
