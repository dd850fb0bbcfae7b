//! # Hash Indexer
//!
//! Maps an integer key to a slot index in `[0, length)`. The key is first mixed with a
//! per-table **salt** (the table-instance identifier) into a 64-bit seed, and the seed is then
//! threaded through five fixed multiply-modulo stages, each multiplier an odd prime.
//!
//! The result is deterministic for a fixed `(key, length, salt)` triple. Because `length` is an
//! input, every resize changes where a key lands, which is why every rebuild re-inserts entries
//! through the placement strategy instead of copying slots.
//!
//! Different variants use different multiplier sets so that, for example, the primary and
//! secondary hash of double hashing are not trivially correlated. Cuckoo hashing uses two
//! indexers with independent salts, each addressing one half of the table.
//!
//! ```rust
//! use hash_tables::hashing::indexer::{HashIndexer, PRIMARY_MULTIPLIERS};
//!
//! let indexer = HashIndexer::new(7, PRIMARY_MULTIPLIERS);
//! let index = indexer.index(42, 32);
//! assert!(index < 32);
//! assert_eq!(index, indexer.index(42, 32));
//! ```

/// Salt used when a table is built without an explicit one.
pub const DEFAULT_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Multipliers for the home index of chaining and open-addressing variants.
pub const PRIMARY_MULTIPLIERS: [u64; 5] = [885_919, 252_869, 133_201, 667_531, 491_357];

/// Multipliers for the probe step of double hashing.
pub const SECONDARY_MULTIPLIERS: [u64; 5] = [862_559, 564_257, 253_537, 826_549, 535_099];

/// Multipliers for the custom-hashing table.
pub const CUSTOM_MULTIPLIERS: [u64; 5] = [117_269, 946_579, 180_773, 165_541, 118_583];

/// Multipliers for the second half-table of cuckoo hashing.
pub const CUCKOO_MULTIPLIERS: [u64; 5] = [927_491, 897_191, 755_329, 586_589, 544_001];

/// A deterministic key-to-index map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashIndexer {
    salt: u64,
    multipliers: [u64; 5],
}

impl Default for HashIndexer {
    fn default() -> Self {
        Self::new(DEFAULT_SALT, PRIMARY_MULTIPLIERS)
    }
}

impl HashIndexer {
    /// Creates an indexer from a salt and a set of five multipliers.
    pub const fn new(salt: u64, multipliers: [u64; 5]) -> Self {
        Self { salt, multipliers }
    }

    /// Returns the table-instance salt.
    pub fn salt(&self) -> u64 {
        self.salt
    }

    /// Returns the same multiplier schedule under a different salt.
    pub fn with_salt(self, salt: u64) -> Self {
        Self { salt, ..self }
    }

    /// Computes the slot index of `key` for a table of `length` slots.
    ///
    /// `length` must be non-zero.
    pub fn index(&self, key: i64, length: usize) -> usize {
        debug_assert!(length > 0, "index requested for an empty table");
        let length = length as u128;
        let mut hash = self.seed(key) as u128 % length;
        for &multiplier in &self.multipliers {
            hash = hash * multiplier as u128 % length;
        }
        hash as usize
    }

    /// Combines the key's intrinsic hash with the salt.
    ///
    /// The finalizer is splitmix64, so high key bits reach the low bits the modulo stages keep.
    fn seed(&self, key: i64) -> u64 {
        let mut z = (key as u64) ^ self.salt;
        z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_is_in_range() {
        let indexer = HashIndexer::default();
        for length in [1usize, 2, 7, 28, 32, 1024] {
            for key in -500..500 {
                assert!(indexer.index(key, length) < length);
            }
        }
    }

    #[test]
    fn index_is_deterministic() {
        let a = HashIndexer::new(11, PRIMARY_MULTIPLIERS);
        let b = HashIndexer::new(11, PRIMARY_MULTIPLIERS);
        for key in 0..100 {
            assert_eq!(a.index(key, 64), b.index(key, 64));
        }
    }

    #[test]
    fn salt_changes_placement() {
        let a = HashIndexer::new(1, PRIMARY_MULTIPLIERS);
        let b = a.with_salt(2);
        assert_eq!(b.salt(), 2);
        let differing = (0..64).filter(|&k| a.index(k, 64) != b.index(k, 64)).count();
        assert!(differing > 32);
    }

    #[test]
    fn sequential_keys_spread_out() {
        let indexer = HashIndexer::default();
        let mut buckets = [0usize; 32];
        for key in 0..3200 {
            buckets[indexer.index(key, 32)] += 1;
        }
        // every bucket should get a reasonable share of 100 expected hits
        assert!(buckets.iter().all(|&hits| hits > 40 && hits < 200));
    }
}
