use std::collections::BTreeMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::ops::Bound::{Excluded, Unbounded};

use avl_collections::{AvlMap, Error, Reverse};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 10_000;

/// Generates keys in a range narrow enough to cause collisions.
fn key_strategy() -> impl Strategy<Value = i64> {
    -20_000i64..20_000i64
}

fn value_strategy() -> impl Strategy<Value = i64> {
    any::<i64>()
}

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum MapOp {
    Insert(i64, i64),
    Remove(i64),
    Get(i64),
    ContainsKey(i64),
    LowerBound(i64),
    UpperBound(i64),
    FirstKeyValue,
    LastKeyValue,
    EraseFirst,
}

fn map_op_strategy() -> impl Strategy<Value = MapOp> {
    prop_oneof![
        5 => (key_strategy(), value_strategy()).prop_map(|(k, v)| MapOp::Insert(k, v)),
        3 => key_strategy().prop_map(MapOp::Remove),
        2 => key_strategy().prop_map(MapOp::Get),
        1 => key_strategy().prop_map(MapOp::ContainsKey),
        1 => key_strategy().prop_map(MapOp::LowerBound),
        1 => key_strategy().prop_map(MapOp::UpperBound),
        1 => Just(MapOp::FirstKeyValue),
        1 => Just(MapOp::LastKeyValue),
        1 => Just(MapOp::EraseFirst),
    ]
}

// ─── Core CRUD operations ────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays a random sequence of operations on both AvlMap and BTreeMap and
    /// asserts identical results at every step. Insert keeps an existing value,
    /// so it is compared against `entry().or_insert()`.
    #[test]
    fn map_ops_match_btreemap(ops in proptest::collection::vec(map_op_strategy(), TEST_SIZE)) {
        let mut avl_map: AvlMap<i64, i64> = AvlMap::new();
        let mut bt_map: BTreeMap<i64, i64> = BTreeMap::new();

        for op in &ops {
            match *op {
                MapOp::Insert(k, v) => {
                    let expected_new = !bt_map.contains_key(&k);
                    bt_map.entry(k).or_insert(v);
                    let (pos, inserted) = avl_map.insert(k, v);
                    prop_assert_eq!(inserted, expected_new);
                    prop_assert_eq!(avl_map.key_value_at(pos), Some((&k, &bt_map[&k])));
                }
                MapOp::Remove(k) => {
                    prop_assert_eq!(avl_map.remove(&k), bt_map.remove(&k));
                }
                MapOp::Get(k) => {
                    prop_assert_eq!(avl_map.get(&k), bt_map.get(&k));
                }
                MapOp::ContainsKey(k) => {
                    prop_assert_eq!(avl_map.contains_key(&k), bt_map.contains_key(&k));
                    prop_assert_eq!(avl_map.count(&k), usize::from(bt_map.contains_key(&k)));
                }
                MapOp::LowerBound(k) => {
                    let pos = avl_map.lower_bound(&k);
                    prop_assert_eq!(avl_map.key_value_at(pos), bt_map.range(k..).next());
                }
                MapOp::UpperBound(k) => {
                    let pos = avl_map.upper_bound(&k);
                    prop_assert_eq!(avl_map.key_value_at(pos), bt_map.range((Excluded(k), Unbounded)).next());
                }
                MapOp::FirstKeyValue => {
                    prop_assert_eq!(avl_map.first_key_value(), bt_map.first_key_value());
                }
                MapOp::LastKeyValue => {
                    prop_assert_eq!(avl_map.last_key_value(), bt_map.last_key_value());
                }
                MapOp::EraseFirst => {
                    if avl_map.is_empty() {
                        prop_assert!(bt_map.is_empty());
                    } else {
                        prop_assert_eq!(Some(avl_map.erase_at(avl_map.begin())), bt_map.pop_first());
                    }
                }
            }
            prop_assert_eq!(avl_map.len(), bt_map.len());
        }

        prop_assert!(avl_map.iter().eq(bt_map.iter()));
        prop_assert!(avl_map.iter().rev().eq(bt_map.iter().rev()));
    }

    /// The height of the tree stays within the AVL bound after random inserts
    /// and removes.
    #[test]
    fn height_stays_logarithmic(
        inserts in proptest::collection::vec(key_strategy(), 1..2_000),
        removes in proptest::collection::vec(key_strategy(), 0..1_000),
    ) {
        let mut map: AvlMap<i64, ()> = AvlMap::new();
        for k in inserts {
            map.insert(k, ());
        }
        for k in removes {
            map.remove(&k);
        }
        let n = map.len() as f64;
        prop_assert!(map.height() as f64 <= 1.4405 * (n + 2.0).log2());
    }

    /// Owning, shared and mutable iteration all visit the same sorted sequence.
    #[test]
    fn iterators_match_btreemap(
        entries in proptest::collection::vec((key_strategy(), value_strategy()), 0..500),
    ) {
        let mut avl_map: AvlMap<i64, i64> = AvlMap::new();
        let mut bt_map: BTreeMap<i64, i64> = BTreeMap::new();
        for &(k, v) in &entries {
            avl_map.insert(k, v);
            bt_map.entry(k).or_insert(v);
        }

        prop_assert_eq!(avl_map.iter().len(), bt_map.len());
        prop_assert!(avl_map.keys().eq(bt_map.keys()));
        prop_assert!(avl_map.values().rev().eq(bt_map.values().rev()));

        for v in avl_map.values_mut() {
            *v = v.wrapping_add(1);
        }
        for v in bt_map.values_mut() {
            *v = v.wrapping_add(1);
        }
        for (_, v) in avl_map.iter_mut().rev() {
            *v = v.wrapping_mul(3);
        }
        for v in bt_map.values_mut() {
            *v = v.wrapping_mul(3);
        }

        let owned: Vec<_> = avl_map.into_iter().collect();
        let expected: Vec<_> = bt_map.into_iter().collect();
        prop_assert_eq!(owned, expected);
    }

    /// A mixed walk from both ends of an iterator never yields an entry twice.
    #[test]
    fn double_ended_iteration_meets_in_the_middle(
        keys in proptest::collection::btree_set(key_strategy(), 0..200),
        pattern in proptest::collection::vec(any::<bool>(), 0..200),
    ) {
        let map: AvlMap<i64, ()> = keys.iter().map(|&k| (k, ())).collect();
        let mut iter = map.keys();
        let mut front = Vec::new();
        let mut back = Vec::new();
        for from_front in pattern {
            let item = if from_front { iter.next() } else { iter.next_back() };
            match item {
                Some(&k) if from_front => front.push(k),
                Some(&k) => back.push(k),
                None => break,
            }
        }
        front.extend(iter.copied());
        back.reverse();
        front.extend(back);
        prop_assert!(front.iter().eq(keys.iter()));
    }

    /// Erasing a range of positions removes exactly the keys BTreeMap's range
    /// would visit.
    #[test]
    fn erase_range_matches_btreemap(
        keys in proptest::collection::btree_set(key_strategy(), 0..300),
        lo in key_strategy(),
        span in 0i64..5_000,
    ) {
        let hi = lo + span;
        let mut avl_map: AvlMap<i64, i64> = keys.iter().map(|&k| (k, -k)).collect();
        let mut bt_map: BTreeMap<i64, i64> = keys.iter().map(|&k| (k, -k)).collect();

        let removed = avl_map.erase_range(avl_map.lower_bound(&lo), avl_map.lower_bound(&hi));
        let doomed: Vec<_> = bt_map.range(lo..hi).map(|(&k, _)| k).collect();
        for k in &doomed {
            bt_map.remove(k);
        }

        prop_assert_eq!(removed, doomed.len());
        prop_assert!(avl_map.iter().eq(bt_map.iter()));
    }

    /// Clones compare, order and hash like their source, and stay independent.
    #[test]
    fn clone_is_deep_and_equal(
        entries in proptest::collection::vec((key_strategy(), value_strategy()), 0..300),
        extra in key_strategy(),
    ) {
        let original: AvlMap<i64, i64> = entries.iter().copied().collect();
        let mut copy = original.clone();

        prop_assert_eq!(&copy, &original);
        prop_assert_eq!(copy.height(), original.height());
        prop_assert_eq!(hash_of(&copy), hash_of(&original));
        prop_assert_eq!(copy.cmp(&original), std::cmp::Ordering::Equal);

        let was_present = copy.contains_key(&extra);
        if was_present {
            copy.remove(&extra);
            prop_assert!(copy < original || copy > original);
        } else {
            copy.insert(extra, 0);
        }
        prop_assert_ne!(&copy, &original);
        prop_assert_eq!(original.contains_key(&extra), was_present);
    }
}

// ─── Concrete scenarios ──────────────────────────────────────────────────────

#[test]
fn sorted_iteration_and_bounds() {
    let mut map = AvlMap::new();
    for k in [5, 3, 8, 1, 4, 7, 9] {
        map.insert(k, k * 100);
    }

    assert_eq!(map.keys().copied().collect::<Vec<_>>(), [1, 3, 4, 5, 7, 8, 9]);
    assert_eq!(map.height(), 3);

    assert_eq!(map.key_value_at(map.lower_bound(&6)), Some((&7, &700)));
    assert_eq!(map.key_value_at(map.upper_bound(&7)), Some((&8, &800)));
    assert_eq!(map.key_value_at(map.lower_bound(&7)), Some((&7, &700)));
    assert!(map.lower_bound(&10).is_end());
    assert!(map.find(&6).is_end());

    let (first, last) = map.equal_range(&4);
    assert_eq!(map.key_value_at(first), Some((&4, &400)));
    assert_eq!(map.key_value_at(last), Some((&5, &500)));

    let (first, last) = map.equal_range(&6);
    assert_eq!(first, last);
}

#[test]
fn erase_keeps_order_and_balance() {
    let mut map: AvlMap<_, _> = [5, 3, 8, 1, 4, 7, 9].into_iter().map(|k| (k, ())).collect();
    assert_eq!(map.erase_key(&5), 1);
    assert_eq!(map.erase_key(&5), 0);
    map.remove(&3);
    map.remove(&8);
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), [1, 4, 7, 9]);
    assert!(map.height() <= 3);
}

#[test]
fn ascending_inserts_build_a_perfect_tree() {
    let map: AvlMap<_, _> = (1..=7).map(|k| (k, ())).collect();
    assert_eq!(map.height(), 3);
}

#[test]
fn duplicate_insert_keeps_first_value() {
    let mut map = AvlMap::new();
    let (pos, inserted) = map.insert("k", 1);
    assert!(inserted);
    let (again, inserted) = map.insert("k", 2);
    assert!(!inserted);
    assert_eq!(pos, again);
    assert_eq!(map["k"], 1);
    assert_eq!(map.len(), 1);
}

#[test]
fn checked_access() {
    let mut map = AvlMap::from([(1, 10), (2, 20)]);
    assert_eq!(map.at(&1), Ok(&10));
    assert_eq!(map.at(&3), Err(Error::KeyNotFound));
    *map.at_mut(&2).unwrap() += 1;
    assert_eq!(map[&2], 21);
    assert_eq!(map.at_mut(&4), Err(Error::KeyNotFound));
}

#[test]
#[should_panic(expected = "no entry found for key")]
fn index_missing_key_panics() {
    let map = AvlMap::from([(1, 10)]);
    let _value = map[&2];
}

#[test]
fn get_or_insert() {
    let mut counts: AvlMap<&str, usize> = AvlMap::new();
    for word in ["a", "b", "a", "c", "a"] {
        *counts.get_or_insert_default(word) += 1;
    }
    assert_eq!(counts.iter().collect::<Vec<_>>(), [(&"a", &3), (&"b", &1), (&"c", &1)]);

    let v = counts.get_or_insert_with("d", || 9);
    assert_eq!(*v, 9);
}

#[test]
fn hinted_inserts_in_order() {
    let mut map = AvlMap::new();
    let mut hint = map.end();
    for k in 0..100 {
        hint = map.insert_hint(hint, k, k).0;
    }
    // A useless hint still lands in the right place.
    let (pos, inserted) = map.insert_hint(map.begin(), 1_000, 0);
    assert!(inserted);
    assert_eq!(map.key_value_at(pos), Some((&1_000, &0)));
    let (pos, inserted) = map.insert_hint(map.end(), 50, -1);
    assert!(!inserted);
    assert_eq!(map.key_value_at(pos), Some((&50, &50)));

    assert!(map.keys().copied().eq((0..100).chain([1_000])));
    assert!(map.height() <= 8);
}

#[test]
fn reverse_comparator_orders_descending() {
    let map = AvlMap::from_iter_with((0..5).map(|k| (k, ())), Reverse);
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), [4, 3, 2, 1, 0]);
    assert_eq!(map.key_value_at(map.lower_bound(&2)), Some((&2, &())));
    assert_eq!(map.key_value_at(map.upper_bound(&2)), Some((&1, &())));
}

#[test]
fn closure_comparator() {
    let mut map = AvlMap::with_comparator(|a: &i32, b: &i32| (a % 10).cmp(&(b % 10)));
    map.insert(13, 'a');
    map.insert(21, 'b');
    assert!(!map.insert(3, 'c').1);
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), [21, 13]);
}

#[test]
fn string_keys_lookup_by_str() {
    let mut map: AvlMap<String, usize> = AvlMap::new();
    for word in ["pear", "apple", "fig"] {
        map.insert(word.to_owned(), word.len());
    }
    assert_eq!(map.get("fig"), Some(&3));
    assert_eq!(map.remove("apple"), Some(5));
    assert!(!map.contains_key("apple"));
}

#[test]
fn positions_survive_unrelated_changes() {
    let mut map: AvlMap<_, _> = (0..64).map(|k| (k, k)).collect();
    let kept = map.find(&40);
    for k in (0..64).filter(|k| k % 3 == 0 && *k != 40) {
        map.remove(&k);
    }
    for k in 100..200 {
        map.insert(k, k);
    }
    assert_eq!(map.key_value_at(kept), Some((&40, &40)));
    *map.value_at_mut(kept).unwrap() = -40;
    assert_eq!(map[&40], -40);
}

#[test]
fn cursor_walks_the_ring() {
    let map: AvlMap<_, _> = (1..=3).map(|k| (k, k)).collect();
    let mut cursor = map.cursor_back();
    assert_eq!(cursor.key(), Some(&3));
    cursor.move_next();
    assert!(cursor.is_end());
    cursor.move_next();
    assert_eq!(cursor.key(), Some(&1));
    cursor.move_prev();
    cursor.move_prev();
    assert_eq!(cursor.key(), Some(&3));
}

#[test]
fn clear_and_reuse() {
    let mut map: AvlMap<_, _> = (0..100).map(|k| (k, k.to_string())).collect();
    map.clear();
    assert!(map.is_empty());
    assert_eq!(map.height(), 0);
    assert!(map.begin().is_end());
    map.insert(1, "one".to_owned());
    assert_eq!(map.len(), 1);
}

#[test]
fn swap_exchanges_contents() {
    let mut a = AvlMap::from([(1, 'a')]);
    let mut b = AvlMap::from([(2, 'b'), (3, 'c')]);
    a.swap(&mut b);
    assert_eq!(a.len(), 2);
    assert_eq!(b.get(&1), Some(&'a'));
}

#[test]
fn comparisons_are_lexicographic() {
    let a = AvlMap::from([(1, 1), (2, 2)]);
    let b = AvlMap::from([(1, 1), (3, 0)]);
    let c = AvlMap::from([(1, 1)]);
    assert!(a < b);
    assert!(c < a);
    assert_eq!(format!("{a:?}"), "{1: 1, 2: 2}");
}

#[test]
fn extend_with_references() {
    let source = [(1, 'x'), (2, 'y')];
    let mut map: AvlMap<i32, char> = AvlMap::new();
    map.extend(source.iter().map(|(k, v)| (k, v)));
    map.extend([(3, 'z')]);
    assert_eq!(map.len(), 3);
}

#[test]
fn large_random_workload_stays_consistent() {
    let mut map = AvlMap::new();
    let mut reference = BTreeMap::new();
    let mut x: u64 = 0x2545_f491_4f6c_dd1d;
    for _ in 0..50_000 {
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        let key = (x % 4_096) as u32;
        if x & 0x100 == 0 {
            assert_eq!(map.remove(&key), reference.remove(&key));
        } else {
            reference.entry(key).or_insert(x);
            map.insert(key, x);
        }
    }
    assert!(map.iter().eq(reference.iter()));
}

/// A value whose clone panics for one chosen payload.
#[derive(Debug, PartialEq)]
struct Brittle(i64);

impl Clone for Brittle {
    fn clone(&self) -> Self {
        assert!(self.0 != 13, "cannot clone 13");
        Brittle(self.0)
    }
}

#[test]
fn failed_assignment_keeps_previous_entries() {
    let source: AvlMap<i64, Brittle> = (0..32).map(|k| (k, Brittle(k))).collect();
    let mut target: AvlMap<i64, Brittle> = [100, 50, 150, 25].into_iter().map(|k| (k, Brittle(-k))).collect();
    let height = target.height();

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| target.clone_from(&source)));
    assert!(result.is_err());
    assert_eq!(target.len(), 4);
    assert_eq!(target.height(), height);
    assert_eq!(
        target.iter().map(|(k, v)| (*k, v.0)).collect::<Vec<_>>(),
        [(25, -25), (50, -50), (100, -100), (150, -150)]
    );

    target.insert(7, Brittle(7));
    assert_eq!(target.keys().copied().collect::<Vec<_>>(), [7, 25, 50, 100, 150]);
}
