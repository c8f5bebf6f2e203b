use ordkit::algo::SORT_ALGORITHMS;
use ordkit::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;

#[test]
fn test_sort_100k_every_algorithm() {
    let count = 100_000;
    let mut rng = StdRng::seed_from_u64(2024);
    let input: Vec<i64> = (0..count).map(|_| rng.random_range(-1_000_000..1_000_000)).collect();
    let comparator = Comparator::<i64>::numeric();

    let engine = SortEngine::new();
    for name in SORT_ALGORITHMS {
        let mut data = input.clone();
        let start = Instant::now();
        let out = engine.sort(&mut data, name, &SortOptions::default()).unwrap();
        println!(
            "{name}: {count} elements in {:?} ({} comparisons, {} moves)",
            start.elapsed(),
            out.metrics.comparisons,
            out.metrics.swaps
        );
        assert_eq!(out.result.len(), count);
        assert!(ordkit::core::is_sorted(&out.result, &comparator), "{name}");
    }
}

#[test]
fn test_auto_sort_picks_timsort_for_large_input() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut data: Vec<u32> = (0..20_000).map(|_| rng.random()).collect();
    let out = SortEngine::new()
        .auto_sort(&mut data, &SortOptions::default().in_place(true))
        .unwrap();
    assert!(out.metrics.comparisons > 0);
    drop(out);
    assert!(data.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_structures_at_scale() {
    let mut rng = StdRng::seed_from_u64(77);
    let keys: Vec<u32> = (0..50_000).map(|_| rng.random_range(0..1_000_000)).collect();

    let mut avl = AvlTree::new();
    let mut btree = BTree::new();
    let mut map = HashMap::new();
    for &k in &keys {
        avl.insert(k, k);
        btree.insert(k, k);
        map.set(k, k);
    }
    assert_eq!(avl.len(), btree.len());
    assert_eq!(avl.len(), map.len());
    assert!(avl.assert_valid().is_ok());
    assert!(btree.assert_valid().is_ok());
    // 1.44 * log2(50_000) bounds an AVL tree of this size.
    assert!(avl.height() <= 23);
    for &k in keys.iter().step_by(97) {
        assert_eq!(avl.get(&k), Some(&k));
        assert_eq!(btree.search(&k), Some(&k));
        assert_eq!(map.get(&k), Some(&k));
    }
}

#[test]
#[ignore]
fn test_sort_1m() {
    // Slow in debug builds; run with --release --ignored.
    let count = 1_000_000;
    println!("Generating {} random elements...", count);

    let mut rng = StdRng::seed_from_u64(1_000_000);
    let input: Vec<f64> = (0..count).map(|_| rng.random_range(-1e6..1e6)).collect();

    for name in ["timsort", "introsort", "radixsort"] {
        let mut data = input.clone();
        let start = Instant::now();
        let out = SortEngine::new()
            .sort(&mut data, name, &SortOptions::default().in_place(true))
            .unwrap();
        println!("{name}: sorted 1M elements in {:?}", start.elapsed());
        assert_eq!(out.result.len(), count);
        drop(out);

        // Radix rounds to six decimal places, so only check the order.
        for i in 0..count - 1 {
            assert!(data[i] <= data[i + 1] + 1e-6, "{name} failed at index {i}");
        }
    }
}
