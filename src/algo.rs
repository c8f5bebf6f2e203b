//! Dispatch facades: pick a sorter or searcher by name, auto-select one from
//! the input's shape, or benchmark all of them on the same input.
//!
//! The main entry points are [`SortEngine`] and [`SearchEngine`].

use std::any::Any;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::config::{ConfigPatch, SortConfig};
use crate::core::{Element, Metrics, SearchOptions, SortOptions, SortResult, is_sorted, measure_execution};
use crate::error::{Error, Result};
use crate::search::{SearchAlgorithm, SearchResult, binary_search, linear_search};
use crate::sort::{
    HeapSort, IntroSort, MergeSort, QuickSort, RadixSort, RadixVariant, Sorter, TimSort,
};
use crate::structures::HashMap;

/// The six sorters a benchmark sweep runs.
pub const SORT_ALGORITHMS: [&str; 6] = ["quicksort", "mergesort", "heapsort", "timsort", "introsort", "radixsort"];

/// Inputs up to this length are quicksorted by [`SortEngine::auto_sort`].
const AUTO_QUICKSORT_MAX_LEN: usize = 50;
/// Inputs above this length are timsorted by [`SortEngine::auto_sort`].
const AUTO_TIMSORT_MIN_LEN: usize = 10_000;
/// Unsorted inputs up to this length are scanned linearly by [`SearchEngine::search`].
const LINEAR_SEARCH_MAX_LEN: usize = 50;

/// Sort facade over an explicit [`SortConfig`].
///
/// # Examples
///
/// ```
/// use ordkit::{SortEngine, SortOptions};
///
/// let engine = SortEngine::new();
/// let mut data = vec![64, 34, 25, 12, 22, 11, 90];
/// let sorted = engine.sort(&mut data, "quicksort", &SortOptions::default()).unwrap();
///
/// assert_eq!(sorted.result.as_ref(), &[11, 12, 22, 25, 34, 64, 90]);
/// assert_eq!(data, vec![64, 34, 25, 12, 22, 11, 90]); // not in place
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SortEngine {
    config: SortConfig,
}

impl SortEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SortConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SortConfig {
        &self.config
    }

    /// Merges `patch` into the current configuration. Subsequent calls on
    /// this engine use the merged values; on error nothing changes.
    pub fn configure(&mut self, patch: &ConfigPatch) -> Result<()> {
        self.config.configure(patch)
    }

    /// Builds the sorter registered under `name`, parameterized by the
    /// current configuration.
    pub fn sorter<T: Element + 'static>(&self, name: &str) -> Result<Box<dyn Sorter<T>>> {
        let c = &self.config;
        let radix = |variant| RadixSort {
            variant,
            ..RadixSort::from_config(c)
        };
        let sorter: Box<dyn Sorter<T>> = match name {
            "quicksort" => Box::new(QuickSort::from_config(c)),
            "quicksort-3way" => Box::new(QuickSort::from_config(c).with_three_way(true)),
            "mergesort" => Box::new(MergeSort::default()),
            "mergesort-bottom-up" => Box::new(MergeSort::bottom_up()),
            "mergesort-in-place" => Box::new(MergeSort::in_place()),
            "heapsort" => Box::new(HeapSort),
            "timsort" => Box::new(TimSort::from_config(c)),
            "introsort" => Box::new(IntroSort::from_config(c)),
            "introsort-adaptive" => Box::new(IntroSort::from_config(c).with_adaptive(true)),
            "radixsort" => Box::new(radix(RadixVariant::Auto)),
            "radixsort-msd" => Box::new(radix(RadixVariant::Msd)),
            "radixsort-strings" => Box::new(radix(RadixVariant::Strings)),
            "radixsort-floats" => Box::new(radix(RadixVariant::Floats)),
            other => return Err(Error::UnknownAlgorithm(other.to_string())),
        };
        Ok(sorter)
    }

    /// Sorts with the named algorithm. Unknown names fail with
    /// [`Error::UnknownAlgorithm`].
    pub fn sort<'a, T: Element + 'static>(
        &self,
        data: &'a mut [T],
        name: &str,
        options: &SortOptions<T>,
    ) -> Result<SortResult<'a, T>> {
        self.sorter(name)?.sort(data, options)
    }

    /// The algorithm [`SortEngine::auto_sort`] picks for `len` elements.
    pub fn auto_select(len: usize) -> &'static str {
        if len <= AUTO_QUICKSORT_MAX_LEN {
            "quicksort"
        } else if len > AUTO_TIMSORT_MIN_LEN {
            "timsort"
        } else {
            "introsort"
        }
    }

    /// Picks a sorter by input size: quicksort for short inputs, timsort for
    /// very long ones, introsort in between.
    pub fn auto_sort<'a, T: Element + 'static>(
        &self,
        data: &'a mut [T],
        options: &SortOptions<T>,
    ) -> Result<SortResult<'a, T>> {
        if data.len() <= 1 {
            let result = if options.in_place {
                Cow::Borrowed(&*data)
            } else {
                Cow::Owned(data.to_vec())
            };
            return Ok(SortResult {
                result,
                metrics: Metrics::default(),
            });
        }
        let name = Self::auto_select(data.len());
        log::debug!("auto_sort: {} elements, using {name}", data.len());
        self.sort(data, name, options)
    }

    /// Runs every sorter in [`SORT_ALGORITHMS`] on its own copy of `data`.
    ///
    /// `in_place` is ignored. A sorter that fails or panics is logged and
    /// recorded as an error; the sweep continues with the rest.
    pub fn benchmark<T: Element + 'static>(
        &self,
        data: &[T],
        options: &SortOptions<T>,
    ) -> BTreeMap<&'static str, Result<SortResult<'static, T>>> {
        let options = options.clone().in_place(false);
        let mut results = BTreeMap::new();
        for name in SORT_ALGORITHMS {
            let outcome = self.sorter::<T>(name).and_then(|sorter| {
                let mut input = data.to_vec();
                catch_unwind(AssertUnwindSafe(|| {
                    sorter.sort(&mut input, &options).map(SortResult::into_owned)
                }))
                .unwrap_or_else(|payload| Err(Error::ComparatorFault(panic_message(payload))))
            });
            if let Err(e) = &outcome {
                log::warn!("benchmark: {name} failed: {e}");
            }
            results.insert(name, outcome);
        }
        results
    }

    /// The successful benchmark entry with the smallest elapsed time.
    pub fn get_fastest<T: Element + 'static>(
        &self,
        data: &[T],
        options: &SortOptions<T>,
    ) -> Option<(&'static str, SortResult<'static, T>)> {
        fastest(self.benchmark(data, options), |r| &r.metrics)
    }
}

/// How [`SearchEngine::search`] answered a query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchStrategy {
    /// The input was sorted; binary search.
    Binary,
    /// Short unsorted input; linear scan.
    Linear,
    /// Long unsorted input; a throwaway hash index built and probed once.
    HashIndex,
}

impl fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SearchStrategy::Binary => "binary",
            SearchStrategy::Linear => "linear",
            SearchStrategy::HashIndex => "hash-index",
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SearchReport<T> {
    pub strategy: SearchStrategy,
    pub result: SearchResult<T>,
}

/// Search facade.
///
/// ```
/// use ordkit::{SearchEngine, SearchOptions, SearchStrategy};
///
/// let engine = SearchEngine::new();
/// let report = engine.search(&[1, 3, 5, 7], &5, &SearchOptions::default()).unwrap();
/// assert_eq!(report.strategy, SearchStrategy::Binary);
/// assert_eq!(report.result.index, Some(2));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchEngine;

impl SearchEngine {
    pub fn new() -> Self {
        Self
    }

    /// Runs the search algorithm registered under `name` (see
    /// [`SearchAlgorithm::name`]).
    pub fn search_with<T: Element + 'static>(
        &self,
        data: &[T],
        target: &T,
        name: &str,
        options: &SearchOptions<T>,
    ) -> Result<SearchResult<T>> {
        name.parse::<SearchAlgorithm>()?.search(data, target, options)
    }

    /// Binary search when `data` is sorted under the effective comparator,
    /// a linear scan for short unsorted input, and otherwise a hash index.
    ///
    /// The hash index matches elements by `==` rather than by the
    /// comparator, and reports the first occurrence.
    pub fn search<T: Element + 'static>(
        &self,
        data: &[T],
        target: &T,
        options: &SearchOptions<T>,
    ) -> Result<SearchReport<T>> {
        let (strategy, result) = if is_sorted(data, &options.effective_comparator()) {
            (SearchStrategy::Binary, binary_search(data, target, options)?)
        } else if data.len() <= LINEAR_SEARCH_MAX_LEN {
            (SearchStrategy::Linear, linear_search(data, target, options)?)
        } else {
            (SearchStrategy::HashIndex, hash_index_search(data, target))
        };
        log::debug!("search: {} elements, used {strategy}", data.len());
        Ok(SearchReport { strategy, result })
    }

    /// Runs linear search, plus every sorted-only algorithm when `data` is
    /// sorted. Failures and panics are logged and recorded per algorithm.
    pub fn benchmark<T: Element + 'static>(
        &self,
        data: &[T],
        target: &T,
        options: &SearchOptions<T>,
    ) -> BTreeMap<&'static str, Result<SearchResult<T>>> {
        let sorted = is_sorted(data, &options.effective_comparator());
        let mut results = BTreeMap::new();
        for algorithm in SearchAlgorithm::ALL {
            if algorithm.requires_sorted() && !sorted {
                continue;
            }
            let outcome = catch_unwind(AssertUnwindSafe(|| algorithm.search(data, target, options)))
                .unwrap_or_else(|payload| Err(Error::ComparatorFault(panic_message(payload))));
            if let Err(e) = &outcome {
                log::warn!("benchmark: {algorithm} failed: {e}");
            }
            results.insert(algorithm.name(), outcome);
        }
        results
    }

    pub fn get_fastest<T: Element + 'static>(
        &self,
        data: &[T],
        target: &T,
        options: &SearchOptions<T>,
    ) -> Option<(&'static str, SearchResult<T>)> {
        fastest(self.benchmark(data, target, options), |r| &r.metrics)
    }
}

/// Indexes the first occurrence of every element, then probes for `target`.
/// Reported comparisons are the index's slot probes.
fn hash_index_search<T: Element>(data: &[T], target: &T) -> SearchResult<T> {
    let ((position, probes), elapsed) = measure_execution(|| {
        let mut index = HashMap::new();
        for (i, x) in data.iter().enumerate() {
            if !index.has(x) {
                index.set(x.clone(), i);
            }
        }
        (index.get(target).copied(), index.metrics().comparisons)
    });
    SearchResult {
        index: position,
        element: position.map(|i| data[i].clone()),
        metrics: Metrics {
            comparisons: probes,
            elapsed,
            ..Metrics::default()
        },
    }
}

fn fastest<R>(
    results: BTreeMap<&'static str, Result<R>>,
    metrics: impl Fn(&R) -> &Metrics,
) -> Option<(&'static str, R)> {
    results
        .into_iter()
        .filter_map(|(name, outcome)| outcome.ok().map(|r| (name, r)))
        .min_by_key(|(_, r)| metrics(r).elapsed)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    match payload.downcast::<String>() {
        Ok(msg) => format!("panicked: {msg}"),
        Err(payload) => match payload.downcast::<&'static str>() {
            Ok(msg) => format!("panicked: {msg}"),
            Err(_) => "panicked".to_string(),
        },
    }
}
