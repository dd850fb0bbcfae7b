// Behavior every collision-resolving table must share.
//
// Each variant gets the same battery through `contract_suite!`:
//  - overwrite keeps the count and replaces the value,
//  - 28 sequential inserts are all present, then removing them empties the table,
//  - absent keys report KeyNotFound,
//  - a resize-heavy batch keeps exactly the live keys,
//  - enumeration is restartable and covers every entry once.
use std::collections::BTreeSet;

use hash_tables::hashing::{
    CoalescedTable, CuckooTable, CustomHashTable, DirectAccessTable, DoubleHashingTable,
    HopscotchTable, RobinHoodTable, SeparateChainingTable,
};
use hash_tables::Error;

macro_rules! contract_suite {
    ($name:ident, $make:expr) => {
        mod $name {
            use super::*;

            #[test]
            fn duplicate_set_overwrites() {
                let mut table = $make;
                assert_eq!(table.set(1, "Jira".to_string()), Ok(None));
                assert_eq!(table.set(1, "Jason".to_string()), Ok(Some("Jira".to_string())));
                assert_eq!(table.len(), 1);
                assert_eq!(table.get(1).map(String::as_str), Ok("Jason"));
            }

            #[test]
            fn set_then_remove_in_order() {
                let mut table = $make;
                for key in 0..28 {
                    table.set(key, key.to_string()).unwrap();
                }
                assert_eq!(table.len(), 28);
                for key in 0..28 {
                    assert!(table.contains(key), "key {} missing", key);
                    assert_eq!(table.get(key), Ok(&key.to_string()));
                }

                for key in 0..28 {
                    assert_eq!(table.remove(key), Ok(key.to_string()));
                }
                assert_eq!(table.len(), 0);
                assert!(table.is_empty());
                for key in 0..28 {
                    assert!(!table.contains(key));
                }
            }

            #[test]
            fn absent_keys_are_reported() {
                let mut table = $make;
                table.set(3, "three".to_string()).unwrap();
                assert_eq!(table.get(4), Err(Error::KeyNotFound(4)));
                assert_eq!(table.remove(4), Err(Error::KeyNotFound(4)));
                assert_eq!(table.remove(3), Ok("three".to_string()));
                assert_eq!(table.remove(3), Err(Error::KeyNotFound(3)));
                assert_eq!(table.len(), 0);
            }

            #[test]
            fn get_mut_edits_in_place() {
                let mut table = $make;
                table.set(9, "nine".to_string()).unwrap();
                table.get_mut(9).unwrap().push('!');
                assert_eq!(table.get(9).map(String::as_str), Ok("nine!"));
                assert_eq!(table.get_mut(10).err(), Some(Error::KeyNotFound(10)));
            }

            #[test]
            fn enumeration_is_complete_and_restartable() {
                let mut table = $make;
                table
                    .set_all((0..20).map(|k| (k, format!("v{}", k))))
                    .unwrap();

                let mut iter = table.iter();
                let first: Vec<i64> = iter.by_ref().map(|(k, _)| k).collect();
                assert_eq!(iter.next(), None);
                iter.reset();
                let second: Vec<i64> = iter.map(|(k, _)| k).collect();
                assert_eq!(first, second);

                let keys: BTreeSet<i64> = first.into_iter().collect();
                assert_eq!(keys, (0..20).collect());
                assert_eq!(table.values().count(), 20);
                for (key, value) in &table {
                    assert_eq!(value, &format!("v{}", key));
                }
            }

            #[test]
            fn clear_empties_the_table() {
                let mut table = $make;
                table.set_all((0..25).map(|k| (k, k.to_string()))).unwrap();
                table.clear();
                assert!(table.is_empty());
                assert_eq!(table.iter().count(), 0);
                assert!(!table.contains(5));
                table.set(5, "again".to_string()).unwrap();
                assert_eq!(table.len(), 1);
            }
        }
    };
}

macro_rules! resize_suite {
    ($name:ident, $make:expr) => {
        mod $name {
            use super::*;

            #[test]
            fn resize_keeps_live_keys() {
                let mut table = $make;
                let start = table.capacity();
                for key in 0..1000 {
                    table.set(key * 3 - 1500, key).unwrap();
                }
                assert!(table.capacity() > start);
                assert_eq!(table.len(), 1000);

                for key in (0..1000).filter(|k| k % 4 != 0) {
                    assert_eq!(table.remove(key * 3 - 1500), Ok(key));
                }
                assert_eq!(table.len(), 250);
                let live: BTreeSet<i64> = table.keys().collect();
                let expected: BTreeSet<i64> =
                    (0..1000).filter(|k| k % 4 == 0).map(|k| k * 3 - 1500).collect();
                assert_eq!(live, expected);

                for key in 0..1000 {
                    table.remove(key * 3 - 1500).ok();
                }
                assert!(table.is_empty());
                assert_eq!(table.capacity(), table.min_capacity());
            }

            #[test]
            fn load_factor_stays_at_or_below_half() {
                let mut table = $make;
                for key in 0..500 {
                    table.set(key, key).unwrap();
                    assert!(table.load_factor() <= 0.5, "load {}", table.load_factor());
                }
            }
        }
    };
}

contract_suite!(direct_access, DirectAccessTable::<String>::new(0, 31).unwrap());
contract_suite!(separate_chaining, SeparateChainingTable::<String>::new());
contract_suite!(coalesced, CoalescedTable::<String>::new());
contract_suite!(double_hashing, DoubleHashingTable::<String>::new());
contract_suite!(cuckoo, CuckooTable::<String>::seeded(32, 0xC0FFEE));
contract_suite!(hopscotch, HopscotchTable::<String>::new());
contract_suite!(robin_hood, RobinHoodTable::<String>::new());

resize_suite!(coalesced_resize, CoalescedTable::<i64>::new());
resize_suite!(double_hashing_resize, DoubleHashingTable::<i64>::new());
resize_suite!(cuckoo_resize, CuckooTable::<i64>::seeded(32, 99));
resize_suite!(hopscotch_resize, HopscotchTable::<i64>::new());
resize_suite!(robin_hood_resize, RobinHoodTable::<i64>::new());

#[test]
fn direct_access_rejects_out_of_range_keys() {
    let mut table: DirectAccessTable<&str> = DirectAccessTable::new(-5, 5).unwrap();
    assert_eq!(
        table.set(6, "x"),
        Err(Error::OutOfRange {
            key: 6,
            lower: -5,
            upper: 5
        })
    );
    assert!(!table.contains(-6));
    assert!(table.is_empty());
    assert_eq!(
        DirectAccessTable::<u8>::new(3, 2).err(),
        Some(Error::InvalidBounds { lower: 3, upper: 2 })
    );
}

#[test]
fn custom_hashing_keeps_the_last_writer() {
    let mut table: CustomHashTable<i64> = CustomHashTable::new();
    for key in 0..28 {
        table.set(key, key).unwrap();
    }
    // collisions overwrite, so some keys may be gone, but never more than were inserted
    assert!(table.len() <= 28);
    assert_eq!(table.capacity(), 32);
    let live: Vec<i64> = table.keys().collect();
    assert_eq!(live.len(), table.len());
    for key in live {
        assert_eq!(table.get(key), Ok(&key));
    }

    table.set(1, 10).unwrap();
    table.set(1, 11).unwrap();
    assert_eq!(table.get(1), Ok(&11));
}

#[test]
fn separate_chaining_never_resizes() {
    let mut table: SeparateChainingTable<i64> = SeparateChainingTable::new();
    for key in 0..1000 {
        table.set(key, key).unwrap();
    }
    assert_eq!(table.capacity(), 32);
    assert_eq!(table.len(), 1000);
    assert!(table.load_factor() > 1.0);
}
