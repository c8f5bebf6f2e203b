//! Instrumented comparison and distribution sorts.
//!
//! Every sorter implements [`Sorter`]: it takes the caller's slice and a
//! [`SortOptions`], picks its working buffer (the slice itself when
//! `in_place` is set, a fresh copy otherwise) and returns the sorted buffer
//! together with the [`Metrics`](crate::core::Metrics) it collected.

use std::borrow::Cow;
use std::time::Instant;

use crate::core::{SortOptions, SortResult, Tracker};
use crate::error::Result;

pub mod heap;
pub(crate) mod insertion;
pub mod intro;
pub mod merge;
pub mod quick;
pub mod radix;
pub mod tim;

pub use heap::{HeapSort, PriorityQueue};
pub use intro::IntroSort;
pub use merge::{MergeSort, MergeStrategy};
pub use quick::QuickSort;
pub use radix::{RadixOptions, RadixSort, RadixVariant};
pub use tim::TimSort;

/// A sorting algorithm with the uniform call contract.
pub trait Sorter<T: Clone> {
    /// Name the dispatch facade knows this sorter by.
    fn name(&self) -> &'static str;

    /// Sorts `data` (or a copy of it) under `options`.
    ///
    /// Empty and single-element inputs return immediately with zeroed counters.
    fn sort<'a>(&self, data: &'a mut [T], options: &SortOptions<T>) -> Result<SortResult<'a, T>>;
}

/// Shared driver for comparison sorts: buffer selection, trivial inputs,
/// timing and fault reporting.
pub(crate) fn run_sort<'a, T, F>(
    data: &'a mut [T],
    options: &SortOptions<T>,
    body: F,
) -> Result<SortResult<'a, T>>
where
    T: Clone + 'static,
    F: FnOnce(&mut [T], &mut Tracker<'_, T>) -> Result<()>,
{
    let comparator = options.effective_comparator();
    let mut tracker = Tracker::new(&comparator);

    let start = Instant::now();
    let result: Cow<'a, [T]> = if options.in_place {
        if data.len() > 1 {
            body(data, &mut tracker)?;
        }
        Cow::Borrowed(data)
    } else {
        let mut buffer = data.to_vec();
        if buffer.len() > 1 {
            body(&mut buffer, &mut tracker)?;
        }
        Cow::Owned(buffer)
    };
    let elapsed = start.elapsed();
    let metrics = tracker.finish(elapsed)?;
    log::trace!(
        "sorted {} elements: {} comparisons, {} moves in {:?}",
        result.len(),
        metrics.comparisons,
        metrics.swaps,
        metrics.elapsed
    );
    Ok(SortResult { result, metrics })
}
