//! Instrumented searches over slices.
//!
//! [`scan`] holds the searches that work on any order (linear, find-all,
//! find-closest); [`sorted`] holds the ones that require the slice to be
//! ordered under the effective comparator.

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use crate::core::{Metrics, SearchOptions, Tracker};
use crate::error::{Error, Result};

pub mod scan;
pub mod sorted;

pub use scan::{FindAllResult, find_all, find_closest, linear_search};
pub use sorted::{
    binary_search, binary_search_first, binary_search_last, exponential_search, fibonacci_search,
    interpolation_search, jump_search, ternary_search,
};

/// Outcome of a single-target search. `index` and `element` are `None` when
/// the target is absent.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult<T> {
    pub index: Option<usize>,
    pub element: Option<T>,
    pub metrics: Metrics,
}

impl<T> SearchResult<T> {
    pub fn found(&self) -> bool {
        self.index.is_some()
    }
}

/// Every single-target search the crate implements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SearchAlgorithm {
    Linear,
    Binary,
    BinaryFirst,
    BinaryLast,
    Interpolation,
    Exponential,
    Jump,
    Fibonacci,
    Ternary,
}

impl SearchAlgorithm {
    pub const ALL: [SearchAlgorithm; 9] = [
        SearchAlgorithm::Linear,
        SearchAlgorithm::Binary,
        SearchAlgorithm::BinaryFirst,
        SearchAlgorithm::BinaryLast,
        SearchAlgorithm::Interpolation,
        SearchAlgorithm::Exponential,
        SearchAlgorithm::Jump,
        SearchAlgorithm::Fibonacci,
        SearchAlgorithm::Ternary,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SearchAlgorithm::Linear => "linear",
            SearchAlgorithm::Binary => "binary",
            SearchAlgorithm::BinaryFirst => "binary-first",
            SearchAlgorithm::BinaryLast => "binary-last",
            SearchAlgorithm::Interpolation => "interpolation",
            SearchAlgorithm::Exponential => "exponential",
            SearchAlgorithm::Jump => "jump",
            SearchAlgorithm::Fibonacci => "fibonacci",
            SearchAlgorithm::Ternary => "ternary",
        }
    }

    /// Whether the algorithm is only correct on sorted input.
    pub fn requires_sorted(&self) -> bool {
        !matches!(self, SearchAlgorithm::Linear)
    }

    pub fn search<T: Clone + 'static>(
        &self,
        data: &[T],
        target: &T,
        options: &SearchOptions<T>,
    ) -> Result<SearchResult<T>> {
        match self {
            SearchAlgorithm::Linear => linear_search(data, target, options),
            SearchAlgorithm::Binary => binary_search(data, target, options),
            SearchAlgorithm::BinaryFirst => binary_search_first(data, target, options),
            SearchAlgorithm::BinaryLast => binary_search_last(data, target, options),
            SearchAlgorithm::Interpolation => interpolation_search(data, target, options),
            SearchAlgorithm::Exponential => exponential_search(data, target, options),
            SearchAlgorithm::Jump => jump_search(data, target, options),
            SearchAlgorithm::Fibonacci => fibonacci_search(data, target, options),
            SearchAlgorithm::Ternary => ternary_search(data, target, options),
        }
    }
}

impl fmt::Display for SearchAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SearchAlgorithm {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        SearchAlgorithm::ALL
            .into_iter()
            .find(|a| a.name() == name)
            .ok_or_else(|| Error::UnknownAlgorithm(name.to_string()))
    }
}

/// Shared driver: builds the effective comparator, times `body` and turns
/// the index it returns into a [`SearchResult`].
pub(crate) fn run_search<T, F>(data: &[T], options: &SearchOptions<T>, body: F) -> Result<SearchResult<T>>
where
    T: Clone + 'static,
    F: FnOnce(&mut Tracker<'_, T>) -> Option<usize>,
{
    let comparator = options.effective_comparator();
    let mut tracker = Tracker::new(&comparator);
    let start = Instant::now();
    let index = if data.is_empty() { None } else { body(&mut tracker) };
    let metrics = tracker.finish(start.elapsed())?;
    Ok(SearchResult {
        index,
        element: index.map(|i| data[i].clone()),
        metrics,
    })
}
