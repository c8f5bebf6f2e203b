//! # Ordkit
//!
//! `ordkit` is a library of classical sorting algorithms, search algorithms and lookup
//! structures, every one of them instrumented with the same [`Metrics`] so their costs can be
//! compared call by call.
//!
//! ## Key Features
//!
//! - **Six sorters** behind one [`Sorter`](sort::Sorter) trait: quicksort (median-of-three,
//!   optional three-way partition), merge sort (top-down, bottom-up, rotation-based in place),
//!   heap sort (with a reusable [`PriorityQueue`](sort::PriorityQueue)), TimSort (natural runs
//!   and galloping merges), introsort, and radix sort (LSD, MSD, strings, fixed-precision floats).
//! - **Searches** for unsorted data (linear, find-all, find-closest) and sorted data (binary and
//!   its first/last variants, interpolation, exponential, jump, fibonacci, ternary).
//! - **Lookup structures**: an open-addressing [`HashTable`](structures::HashTable) with map and
//!   set wrappers, an unbalanced BST, an AVL tree and a B-tree.
//! - **Dispatch facades**: [`SortEngine`] and [`SearchEngine`] select algorithms by name, pick
//!   one automatically from the input, or benchmark them all.
//!
//! ## Usage
//!
//! ### Comparators and options
//!
//! Every algorithm orders elements through a [`Comparator`] returning a negative, zero or
//! positive `f64`. Numeric element types get subtraction by default; any other type supplies
//! its own.
//!
//! ```rust
//! use ordkit::prelude::*;
//!
//! let mut data = vec![5, 2, 9, 1];
//! let out = QuickSort::default()
//!     .sort(&mut data, &SortOptions::default().descending(true))
//!     .unwrap();
//! assert_eq!(out.result.as_ref(), &[9, 5, 2, 1]);
//!
//! let mut words = vec!["pear", "fig", "apple"];
//! let by_len = SortOptions::with_comparator(Comparator::<&str>::new(|a, b| {
//!     a.len() as f64 - b.len() as f64
//! }));
//! let out = MergeSort::default().sort(&mut words, &by_len).unwrap();
//! assert_eq!(out.result.as_ref(), &["fig", "pear", "apple"]);
//! ```
//!
//! ### In-place sorting
//!
//! With `in_place` set the result borrows the caller's slice, which now holds the sorted data.
//!
//! ```rust
//! use ordkit::prelude::*;
//!
//! let mut data = vec![-170, 45, -75, 90, -802, 24, -2, 66];
//! let out = RadixSort::lsd()
//!     .sort(&mut data, &SortOptions::default().in_place(true))
//!     .unwrap();
//! assert!(out.metrics.comparisons == 0);
//! drop(out);
//! assert_eq!(data, vec![-802, -170, -75, -2, 24, 45, 66, 90]);
//! ```
//!
//! ### Facades
//!
//! ```rust
//! use ordkit::prelude::*;
//!
//! let mut engine = SortEngine::new();
//! engine.configure(&ConfigPatch::default().insertion_sort_threshold(16)).unwrap();
//!
//! let mut data: Vec<u32> = (0..200).rev().collect();
//! let out = engine.auto_sort(&mut data, &SortOptions::default()).unwrap();
//! assert!(out.result.windows(2).all(|w| w[0] <= w[1]));
//!
//! assert!(matches!(
//!     engine.sort(&mut data, "bogosort", &SortOptions::default()),
//!     Err(Error::UnknownAlgorithm(_))
//! ));
//! ```
//!
//! ## Logging
//!
//! The crate logs through the [`log`] facade: facade decisions at `debug`, benchmark failures
//! at `warn` and per-call metrics at `trace`. It never installs a logger.

pub mod algo;
pub mod config;
pub mod core;
pub mod error;
pub mod search;
pub mod sort;
pub mod structures;

pub use algo::{SearchEngine, SearchReport, SearchStrategy, SortEngine};
pub use config::{ConfigPatch, SortConfig};
pub use core::{
    Comparator, Element, Metrics, Numeric, RadixKey, SearchOptions, SortOptions, SortResult,
};
pub use error::{Error, Result};

pub mod prelude {
    pub use crate::algo::{SearchEngine, SearchReport, SearchStrategy, SortEngine};
    pub use crate::config::{ConfigPatch, SortConfig};
    pub use crate::core::{
        Comparator, Element, Metrics, Numeric, RadixKey, SearchOptions, SortOptions, SortResult,
    };
    pub use crate::error::Error;
    pub use crate::search::SearchAlgorithm;
    pub use crate::sort::{
        HeapSort, IntroSort, MergeSort, PriorityQueue, QuickSort, RadixSort, Sorter, TimSort,
    };
    pub use crate::structures::{AvlTree, BTree, BinarySearchTree, HashMap, HashSet, HashTable};
}
