//! Searches that make no assumption about order.

use std::cmp::Ordering;
use std::time::Instant;

use crate::core::{Metrics, SearchOptions, Tracker};
use crate::error::Result;
use crate::search::{SearchResult, run_search};

/// Every index whose element compares equal to the target.
#[derive(Clone, Debug, PartialEq)]
pub struct FindAllResult {
    pub indices: Vec<usize>,
    pub metrics: Metrics,
}

/// Left-to-right scan, one comparison per probed element.
pub fn linear_search<T: Clone + 'static>(
    data: &[T],
    target: &T,
    options: &SearchOptions<T>,
) -> Result<SearchResult<T>> {
    run_search(data, options, |t| {
        data.iter().position(|x| t.compare(x, target) == Ordering::Equal)
    })
}

/// Full scan collecting all matches; the slice need not be sorted.
pub fn find_all<T: 'static>(data: &[T], target: &T, options: &SearchOptions<T>) -> Result<FindAllResult> {
    let comparator = options.effective_comparator();
    let mut t = Tracker::new(&comparator);
    let start = Instant::now();
    let indices = data
        .iter()
        .enumerate()
        .filter(|(_, x)| t.compare(x, target) == Ordering::Equal)
        .map(|(i, _)| i)
        .collect();
    let metrics = t.finish(start.elapsed())?;
    Ok(FindAllResult { indices, metrics })
}

/// The element whose comparator distance `|cmp(x, target)|` is smallest.
/// Ties keep the first element seen. Only meaningful for comparators whose
/// magnitude is a real distance (numeric subtraction).
///
/// ```
/// use ordkit::SearchOptions;
/// use ordkit::search::find_closest;
///
/// let found = find_closest(&[1, 3, 5, 7, 9], &4, &SearchOptions::default()).unwrap();
/// assert_eq!(found.index, Some(1));
/// assert_eq!(found.element, Some(3));
/// ```
pub fn find_closest<T: Clone + 'static>(
    data: &[T],
    target: &T,
    options: &SearchOptions<T>,
) -> Result<SearchResult<T>> {
    run_search(data, options, |t| {
        let mut best: Option<(usize, f64)> = None;
        for (i, x) in data.iter().enumerate() {
            let d = t.distance(x, target).abs();
            if best.is_none_or(|(_, b)| d < b) {
                best = Some((i, d));
            }
        }
        best.map(|(i, _)| i)
    })
}
