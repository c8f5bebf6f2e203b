use std::borrow::Cow;

use ordkit::algo::SORT_ALGORITHMS;
use ordkit::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const NAMES: [&str; 13] = [
    "quicksort",
    "quicksort-3way",
    "mergesort",
    "mergesort-bottom-up",
    "mergesort-in-place",
    "heapsort",
    "timsort",
    "introsort",
    "introsort-adaptive",
    "radixsort",
    "radixsort-msd",
    "radixsort-strings",
    "radixsort-floats",
];

fn shuffled(len: i64, seed: u64) -> Vec<i64> {
    let mut v: Vec<i64> = (0..len).collect();
    v.shuffle(&mut StdRng::seed_from_u64(seed));
    v
}

#[test]
fn test_every_registered_name_builds_its_sorter() {
    let engine = SortEngine::new();
    for name in NAMES {
        let sorter = engine.sorter::<f64>(name).unwrap();
        assert_eq!(sorter.name(), name);
    }
}

#[test]
fn test_unknown_names_are_rejected() {
    let engine = SortEngine::new();
    let mut data = vec![3, 1, 2];
    let err = engine.sort(&mut data, "bogosort", &SortOptions::default()).unwrap_err();
    assert_eq!(err, Error::UnknownAlgorithm("bogosort".to_string()));
    assert!(engine.sorter::<i32>("QuickSort").is_err());
    assert!(engine.sorter::<i32>("").is_err());
}

#[test]
fn test_aliases_agree() {
    let input = shuffled(500, 1);
    let engine = SortEngine::new();
    let reference = engine
        .sort(&mut input.clone(), "quicksort", &SortOptions::default())
        .unwrap()
        .into_vec();
    for name in ["quicksort-3way", "mergesort-bottom-up", "mergesort-in-place", "introsort-adaptive", "radixsort-msd"] {
        let out = engine
            .sort(&mut input.clone(), name, &SortOptions::default())
            .unwrap()
            .into_vec();
        assert_eq!(out, reference, "{name}");
    }
}

#[test]
fn test_auto_sort_handles_every_size_band() {
    let engine = SortEngine::new();
    for len in [2, 50, 51, 3000, 10_001] {
        let mut data = shuffled(len, len as u64);
        let out = engine.auto_sort(&mut data, &SortOptions::default()).unwrap();
        assert!(out.result.windows(2).all(|w| w[0] < w[1]), "len {len}");
        assert!(out.metrics.comparisons > 0);
    }
}

#[test]
fn test_auto_sort_trivial_inputs() {
    let engine = SortEngine::new();

    let mut one = vec![42];
    let out = engine.auto_sort(&mut one, &SortOptions::default()).unwrap();
    assert!(matches!(out.result, Cow::Owned(_)));
    assert_eq!(out.metrics, Metrics::default());

    let out = engine
        .auto_sort(&mut one, &SortOptions::default().in_place(true))
        .unwrap();
    assert!(matches!(out.result, Cow::Borrowed(_)));

    let mut empty: Vec<i32> = Vec::new();
    let out = engine.auto_sort(&mut empty, &SortOptions::default()).unwrap();
    assert!(out.result.is_empty());
    assert_eq!(out.metrics.comparisons, 0);
}

#[test]
fn test_configure_reaches_the_sorters() {
    let mut engine = SortEngine::new();
    engine
        .configure(&ConfigPatch::default().radix_base(70_000))
        .unwrap();
    assert_eq!(engine.config().radix_base, 70_000);

    // The engine validates the lower bound; the radix sorter owns the upper one.
    let err = engine
        .sort(&mut vec![3, 1, 2], "radixsort", &SortOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));

    engine.configure(&ConfigPatch::default().radix_base(16)).unwrap();
    let out = engine
        .sort(&mut vec![300, 17, 4096, 0], "radixsort", &SortOptions::default())
        .unwrap()
        .into_vec();
    assert_eq!(out, vec![0, 17, 300, 4096]);

    engine
        .configure(&ConfigPatch::default().max_depth(0).insertion_sort_threshold(4).min_run(8))
        .unwrap();
    let input = shuffled(2000, 9);
    for name in ["quicksort", "introsort", "timsort"] {
        let out = engine
            .sort(&mut input.clone(), name, &SortOptions::default())
            .unwrap()
            .into_vec();
        assert!(out.windows(2).all(|w| w[0] < w[1]), "{name}");
    }
}

#[test]
fn test_invalid_patches_leave_configuration_alone() {
    let mut engine = SortEngine::new();
    let before = *engine.config();
    for patch in [
        ConfigPatch::default().insertion_sort_threshold(0),
        ConfigPatch::default().min_run(1),
        ConfigPatch::default().radix_base(1).max_depth(4),
    ] {
        assert!(matches!(engine.configure(&patch), Err(Error::InvalidInput(_))));
        assert_eq!(*engine.config(), before);
    }

    let bad = SortConfig {
        min_run: 0,
        ..SortConfig::default()
    };
    assert!(SortEngine::with_config(bad).is_err());
}

#[test]
fn test_engines_do_not_share_configuration() {
    let mut a = SortEngine::new();
    let b = SortEngine::new();
    a.configure(&ConfigPatch::default().max_depth(3)).unwrap();
    assert_eq!(a.config().max_depth, 3);
    assert_eq!(b.config().max_depth, SortConfig::default().max_depth);
}

#[test]
fn test_benchmark_runs_every_sorter_on_a_copy() {
    let input = shuffled(1000, 4);
    let results = SortEngine::new().benchmark(&input, &SortOptions::default().in_place(true));
    assert_eq!(results.len(), SORT_ALGORITHMS.len());
    for (name, outcome) in &results {
        let sorted = outcome.as_ref().unwrap();
        assert!(sorted.result.windows(2).all(|w| w[0] < w[1]), "{name}");
    }
    assert_eq!(input, shuffled(1000, 4));

    let (name, fastest) = SortEngine::new()
        .get_fastest(&input, &SortOptions::default())
        .unwrap();
    assert!(SORT_ALGORITHMS.contains(&name));
    assert_eq!(fastest.result.len(), 1000);
}

#[test]
fn test_benchmark_survives_a_panicking_comparator() {
    let input = shuffled(200, 6);
    let touchy = Comparator::<i64>::new(|a, b| {
        if *a == 13 || *b == 13 {
            panic!("cannot compare 13");
        }
        (a - b) as f64
    });
    let options = SortOptions::with_comparator(touchy);

    let results = SortEngine::new().benchmark(&input, &options);
    for (name, outcome) in &results {
        if *name == "radixsort" {
            // Digit extraction never calls the comparator.
            assert!(outcome.is_ok());
        } else {
            match outcome {
                Err(Error::ComparatorFault(msg)) => assert!(msg.contains("cannot compare 13"), "{name}: {msg}"),
                other => panic!("{name}: expected a comparator fault, got {other:?}"),
            }
        }
    }

    let (name, _) = SortEngine::new().get_fastest(&input, &options).unwrap();
    assert_eq!(name, "radixsort");
}

#[test]
fn test_search_strategy_follows_input_shape() {
    let engine = SearchEngine::new();

    let sorted: Vec<i64> = (0..200).map(|i| i * 2).collect();
    let report = engine.search(&sorted, &84, &SearchOptions::default()).unwrap();
    assert_eq!(report.strategy, SearchStrategy::Binary);
    assert_eq!(report.result.index, Some(42));

    let short = shuffled(50, 2);
    let report = engine.search(&short, &short[17], &SearchOptions::default()).unwrap();
    assert_eq!(report.strategy, SearchStrategy::Linear);
    assert_eq!(report.result.index, Some(17));
    assert_eq!(report.result.metrics.comparisons, 18);

    let long = shuffled(51, 3);
    let report = engine.search(&long, &long[40], &SearchOptions::default()).unwrap();
    assert_eq!(report.strategy, SearchStrategy::HashIndex);
    assert_eq!(report.result.index, Some(40));
    assert!(report.result.metrics.comparisons > 0);

    let report = engine.search(&long, &-1, &SearchOptions::default()).unwrap();
    assert_eq!(report.strategy, SearchStrategy::HashIndex);
    assert_eq!(report.result.index, None);
}

#[test]
fn test_hash_index_reports_first_occurrence() {
    let mut rng = StdRng::seed_from_u64(12);
    let data: Vec<u8> = (0..500).map(|_| rng.random_range(0..20)).collect();
    let target = data[250];
    let first = data.iter().position(|&x| x == target);

    let report = SearchEngine::new()
        .search(&data, &target, &SearchOptions::default())
        .unwrap();
    assert_eq!(report.strategy, SearchStrategy::HashIndex);
    assert_eq!(report.result.index, first);
    assert_eq!(report.result.element, Some(target));
}

#[test]
fn test_search_respects_descending_order() {
    let desc: Vec<i32> = (0..100).rev().collect();
    let options = SearchOptions::default().descending(true);
    let report = SearchEngine::new().search(&desc, &10, &options).unwrap();
    assert_eq!(report.strategy, SearchStrategy::Binary);
    assert_eq!(report.result.index, Some(89));
    assert_eq!(SearchStrategy::HashIndex.to_string(), "hash-index");
}

#[test]
fn test_search_with_named_algorithm() {
    let engine = SearchEngine::new();
    let data = [2, 4, 6, 8, 10, 12];
    for name in ["jump", "fibonacci", "binary-last", "linear"] {
        let found = engine
            .search_with(&data, &10, name, &SearchOptions::default())
            .unwrap();
        assert_eq!(found.index, Some(4), "{name}");
    }
    assert!(matches!(
        engine.search_with(&data, &10, "quantum", &SearchOptions::default()),
        Err(Error::UnknownAlgorithm(_))
    ));
}

#[test]
fn test_search_benchmark_skips_sorted_only_algorithms_on_unsorted_input() {
    let engine = SearchEngine::new();

    let unsorted = [5, 3, 9, 1];
    let results = engine.benchmark(&unsorted, &9, &SearchOptions::default());
    assert_eq!(results.keys().copied().collect::<Vec<_>>(), vec!["linear"]);

    let sorted = [1, 3, 5, 9];
    let results = engine.benchmark(&sorted, &9, &SearchOptions::default());
    assert_eq!(results.len(), SearchAlgorithm::ALL.len());
    for (name, outcome) in &results {
        assert_eq!(outcome.as_ref().unwrap().index, Some(3), "{name}");
    }

    let (name, best) = engine.get_fastest(&sorted, &9, &SearchOptions::default()).unwrap();
    assert!(results.contains_key(name));
    assert_eq!(best.element, Some(9));
}
