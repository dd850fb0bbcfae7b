//! Integer-keyed hash tables with interchangeable collision strategies.
//!
//! Every variant is a [`HashTable`] over a [`Placement`] strategy and shares the same indexer,
//! resize policy and enumeration.
//!
//! ```
//! use hash_tables::hashing::{CuckooTable, TableConfig};
//!
//! let mut table = CuckooTable::seeded(32, 7);
//! table.set(42, "answer").unwrap();
//! assert_eq!(table.get(42), Ok(&"answer"));
//!
//! let config = TableConfig::new().with_min_capacity(128);
//! let table: CuckooTable<u8> = CuckooTable::with_config(&config);
//! assert_eq!(table.capacity(), 128);
//! ```

pub mod coalesced;
pub mod config;
pub mod cuckoo;
pub mod custom;
pub mod direct;
pub mod double;
pub mod hopscotch;
pub mod indexer;
pub mod iter;
pub mod robin_hood;
pub mod separate;
pub mod slot;
pub mod table;

pub use coalesced::{Coalesced, CoalescedTable};
pub use config::TableConfig;
pub use cuckoo::{Cuckoo, CuckooTable};
pub use custom::{CustomHashTable, CustomHashing};
pub use direct::{DirectAccess, DirectAccessTable};
pub use double::{DoubleHashing, DoubleHashingTable};
pub use hopscotch::{Hopscotch, HopscotchTable};
pub use indexer::HashIndexer;
pub use iter::{Iter, Keys, Values};
pub use robin_hood::{RobinHood, RobinHoodTable};
pub use separate::{SeparateChaining, SeparateChainingTable};
pub use table::{HashTable, Insertion, Placement, Rebuild};
