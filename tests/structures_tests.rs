use ordkit::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

fn keys_of<K: Copy, V>(entries: Vec<(&K, &V)>) -> Vec<K> {
    entries.into_iter().map(|(k, _)| *k).collect()
}

// "Aa" and "BB" share a rolling hash, so they compete for one home slot.
const COLLIDING: [&str; 2] = ["Aa", "BB"];

#[test]
fn test_hash_table_put_get_update_remove() {
    let mut table = HashTable::new();
    assert!(table.is_empty());
    assert_eq!(table.put("one", 1), None);
    assert_eq!(table.put("two", 2), None);
    assert_eq!(table.put("one", 11), Some(1));
    assert_eq!(table.len(), 2);
    assert_eq!(table.get(&"one"), Some(&11));

    if let Some(v) = table.get_mut(&"two") {
        *v += 20;
    }
    assert_eq!(table.get(&"two"), Some(&22));

    assert!(table.remove(&"one"));
    assert!(!table.remove(&"one"));
    assert!(!table.has(&"one"));
    assert_eq!(table.get(&"one"), None);
    assert_eq!(table.len(), 1);
    assert!(table.entries().all(|e| !e.tombstone));
}

#[test]
fn test_hash_table_collisions_and_tombstones() {
    assert_eq!(
        ordkit::structures::hash_table::hash_key(COLLIDING[0]),
        ordkit::structures::hash_table::hash_key(COLLIDING[1])
    );

    let mut table = HashTable::new();
    table.put(COLLIDING[0], 1);
    table.put(COLLIDING[1], 2);
    assert_eq!(table.get(&COLLIDING[1]), Some(&2));

    // Removing the first link keeps the chain intact for the second.
    assert!(table.remove(&COLLIDING[0]));
    assert_eq!(table.get(&COLLIDING[1]), Some(&2));

    let capacity = table.capacity();
    table.put(COLLIDING[0], 3);
    assert_eq!(table.capacity(), capacity);
    assert_eq!(table.len(), 2);
    assert_eq!(table.get(&COLLIDING[0]), Some(&3));
    assert_eq!(table.get(&COLLIDING[1]), Some(&2));
}

#[test]
fn test_hash_table_load_factor_stays_below_three_quarters() {
    let mut table = HashTable::new();
    assert_eq!(table.capacity(), 16);
    for i in 0..1000u32 {
        table.put(i, i * 2);
        assert!(table.load_factor() < 0.75, "after {} puts", i + 1);
    }
    assert_eq!(table.len(), 1000);
    assert!((0..1000u32).all(|i| table.get(&i) == Some(&(i * 2))));
    assert!(table.metrics().swaps > 0);

    table.clear();
    assert!(table.is_empty());
    assert_eq!(table.get(&5), None);
}

#[test]
fn test_hash_table_grows_on_twelfth_entry() {
    let mut table = HashTable::new();
    for i in 0..11u32 {
        table.put(i, ());
    }
    assert_eq!(table.capacity(), 16);
    table.put(11, ());
    assert_eq!(table.capacity(), 32);
}

#[test]
fn test_hash_table_updates_never_grow() {
    let mut table = HashTable::new();
    for i in 0..11u32 {
        table.put(i, i);
    }
    for i in 0..11u32 {
        assert_eq!(table.put(i, i + 100), Some(i));
        assert_eq!(table.capacity(), 16);
    }
    assert_eq!(table.len(), 11);
    assert_eq!(table.get(&3), Some(&103));
}

#[test]
fn test_hash_table_churn_matches_std() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut table = HashTable::with_capacity(4);
    let mut model = std::collections::HashMap::new();
    for _ in 0..5000 {
        let key: u16 = rng.random_range(0..300);
        if rng.random_bool(0.4) {
            assert_eq!(table.remove(&key), model.remove(&key).is_some());
        } else {
            let value: u32 = rng.random();
            assert_eq!(table.put(key, value), model.insert(key, value));
        }
        assert_eq!(table.len(), model.len());
    }
    for (k, v) in &model {
        assert_eq!(table.get(k), Some(v));
    }
    assert_eq!(table.iter().count(), model.len());
}

#[test]
fn test_hash_map_wrapper() {
    let mut map = HashMap::new();
    map.set("a".to_string(), 1);
    map.set("b".to_string(), 2);
    assert!(map.has(&"a".to_string()));
    assert!(map.delete(&"a".to_string()));
    assert_eq!(map.len(), 1);

    let entries: Vec<(&String, &i32)> = map.entries().collect();
    assert_eq!(entries, vec![(&"b".to_string(), &2)]);
    assert_eq!(map.keys().count(), 1);
    assert_eq!(map.values().copied().collect::<Vec<_>>(), vec![2]);
    assert!(map.metrics().comparisons > 0);
}

#[test]
fn test_hash_set_algebra() {
    let a: HashSet<i32> = [1, 2, 3, 4].into_iter().collect();
    let b: HashSet<i32> = [3, 4, 5].into_iter().collect();

    let sorted = |s: &HashSet<i32>| {
        let mut v: Vec<i32> = s.values().copied().collect();
        v.sort();
        v
    };
    assert_eq!(sorted(&a.union(&b)), vec![1, 2, 3, 4, 5]);
    assert_eq!(sorted(&a.intersection(&b)), vec![3, 4]);
    assert_eq!(sorted(&a.difference(&b)), vec![1, 2]);

    let small: HashSet<i32> = [3, 4].into_iter().collect();
    assert!(small.is_subset(&a));
    assert!(small.is_subset(&b));
    assert!(!a.is_subset(&b));

    let mut set = HashSet::new();
    assert!(set.add("x"));
    assert!(!set.add("x"));
    assert!(set.delete(&"x"));
    assert!(set.is_empty());
}

fn sample_bst() -> BinarySearchTree<i32, &'static str> {
    let mut tree = BinarySearchTree::new();
    for (k, v) in [(50, "a"), (30, "b"), (70, "c"), (20, "d"), (40, "e"), (60, "f"), (80, "g")] {
        tree.insert(k, v);
    }
    tree
}

#[test]
fn test_bst_traversals() {
    let tree = sample_bst();
    assert_eq!(keys_of(tree.in_order()), vec![20, 30, 40, 50, 60, 70, 80]);
    assert_eq!(keys_of(tree.pre_order()), vec![50, 30, 20, 40, 70, 60, 80]);
    assert_eq!(keys_of(tree.post_order()), vec![20, 40, 30, 60, 80, 70, 50]);
    assert_eq!(tree.min(), Some((&20, &"d")));
    assert_eq!(tree.max(), Some((&80, &"g")));
    assert_eq!(tree.height(), 3);
}

#[test]
fn test_bst_delete_cases() {
    // Leaf.
    let mut tree = sample_bst();
    assert_eq!(tree.delete(&20), Some("d"));
    assert_eq!(keys_of(tree.in_order()), vec![30, 40, 50, 60, 70, 80]);
    assert!(tree.assert_valid().is_ok());

    // One child.
    assert_eq!(tree.delete(&30), Some("b"));
    assert_eq!(keys_of(tree.pre_order()), vec![50, 40, 70, 60, 80]);
    assert!(tree.assert_valid().is_ok());

    // Two children: the successor's entry moves up.
    assert_eq!(tree.delete(&70), Some("c"));
    assert_eq!(keys_of(tree.pre_order()), vec![50, 40, 80, 60]);
    assert_eq!(tree.get(&80), Some(&"g"));
    assert!(tree.assert_valid().is_ok());

    // Root.
    assert_eq!(tree.delete(&50), Some("a"));
    assert_eq!(keys_of(tree.in_order()), vec![40, 60, 80]);
    assert!(tree.assert_valid().is_ok());

    assert_eq!(tree.delete(&999), None);
    assert_eq!(tree.len(), 3);
}

#[test]
fn test_bst_insert_existing_key_updates() {
    let mut tree = sample_bst();
    assert_eq!(tree.insert(40, "z"), Some("e"));
    assert_eq!(tree.len(), 7);
    assert_eq!(tree.get(&40), Some(&"z"));
    assert!(tree.metrics().comparisons > 0);
    tree.reset_metrics();
    assert_eq!(tree.metrics().comparisons, 0);
}

#[test]
fn test_bst_degenerates_on_sorted_input() {
    let mut tree = BinarySearchTree::new();
    for k in 0..100 {
        tree.insert(k, ());
    }
    assert_eq!(tree.height(), 100);
    tree.clear();
    assert!(tree.is_empty());
    assert_eq!(tree.min(), None);
}

#[test]
fn test_avl_rotations() {
    let mut tree = AvlTree::new();
    for k in [10, 20, 30] {
        tree.insert(k, ());
    }
    assert_eq!(tree.metrics().swaps, 1);
    assert_eq!(keys_of(tree.pre_order()), vec![20, 10, 30]);

    for k in [40, 50, 25] {
        tree.insert(k, ());
    }
    // 50 triggers a single rotation, 25 a right-left double rotation.
    assert_eq!(tree.metrics().swaps, 4);
    assert_eq!(keys_of(tree.pre_order()), vec![30, 20, 10, 25, 40, 50]);
    assert_eq!(tree.height(), 3);
    assert!(tree.assert_valid().is_ok());
}

#[test]
fn test_avl_stays_balanced_on_sorted_input() {
    let mut tree = AvlTree::new();
    for k in 0..1023 {
        tree.insert(k, k);
    }
    assert_eq!(tree.height(), 10);
    assert!(tree.assert_valid().is_ok());
    assert_eq!(tree.min(), Some((&0, &0)));
    assert_eq!(tree.max(), Some((&1022, &1022)));
}

#[test]
fn test_avl_delete_rebalances() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut keys: Vec<i32> = (0..2000).collect();
    keys.shuffle(&mut rng);

    let mut tree = AvlTree::new();
    for &k in &keys {
        tree.insert(k, k * 3);
    }
    keys.shuffle(&mut rng);
    for (n, &k) in keys.iter().enumerate().take(1500) {
        assert_eq!(tree.delete(&k), Some(k * 3));
        if n % 100 == 0 {
            assert!(tree.assert_valid().is_ok(), "after deleting {k}");
        }
    }
    assert_eq!(tree.len(), 500);
    assert!(tree.assert_valid().is_ok());
    for &k in &keys[1500..] {
        assert!(tree.contains(&k));
    }
    for &k in &keys[..1500] {
        assert_eq!(tree.get(&k), None);
    }
    assert_eq!(tree.delete(&-1), None);
}

#[test]
fn test_avl_custom_comparator() {
    let mut tree = AvlTree::with_comparator(Comparator::<i32>::natural().reversed());
    for k in [3, 1, 4, 1, 5, 9, 2, 6] {
        tree.insert(k, ());
    }
    assert_eq!(keys_of(tree.in_order()), vec![9, 6, 5, 4, 3, 2, 1]);
    assert!(tree.assert_valid().is_ok());
}

#[test]
fn test_btree_search() {
    let mut tree = BTree::new();
    for k in [10, 20, 30, 40, 50] {
        tree.insert(k, k.to_string());
    }
    for k in [10, 20, 30, 40, 50] {
        assert_eq!(tree.search(&k), Some(&k.to_string()));
    }
    assert_eq!(tree.search(&60), None);
    assert_eq!(tree.height(), 1);

    // The sixth key overflows the root.
    tree.insert(60, "60".to_string());
    assert_eq!(tree.height(), 2);
    assert_eq!(tree.metrics().swaps, 1);
    assert!(tree.assert_valid().is_ok());
}

#[test]
fn test_btree_node_bounds_hold() {
    let mut rng = StdRng::seed_from_u64(3);
    for t in [2, 3, 5] {
        let mut tree = BTree::with_min_degree(t).unwrap();
        for _ in 0..3000 {
            let k: u32 = rng.random_range(0..5000);
            tree.insert(k, k);
        }
        assert!(tree.assert_valid().is_ok(), "min degree {t}");
        let keys = tree.keys();
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(keys.len(), tree.len());
    }
}

#[test]
fn test_btree_duplicate_key_updates_value() {
    let mut tree = BTree::new();
    assert_eq!(tree.insert("k", 1), None);
    assert_eq!(tree.insert("k", 2), Some(1));
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.get(&"k"), Some(&2));

    if let Some(v) = tree.get_mut(&"k") {
        *v = 7;
    }
    assert!(tree.contains(&"k"));
    assert_eq!(tree.search(&"k"), Some(&7));

    tree.clear();
    assert!(tree.is_empty());
    assert_eq!(tree.height(), 1);
}

#[test]
fn test_btree_rejects_degenerate_degree() {
    assert!(matches!(BTree::<i32, ()>::with_min_degree(1), Err(Error::InvalidInput(_))));
    assert!(BTree::<i32, ()>::with_comparator(Comparator::natural(), 0).is_err());
    assert_eq!(BTree::<i32, ()>::new().min_degree(), 3);
}
