//! Searches that require the slice to be sorted under the effective
//! comparator. Results on unsorted input are unspecified but never panic.

use std::cmp::Ordering;

use crate::core::{SearchOptions, Tracker};
use crate::error::Result;
use crate::search::{SearchResult, run_search};

/// Classic bisection; stops at the first match it probes.
pub fn binary_search<T: Clone + 'static>(
    data: &[T],
    target: &T,
    options: &SearchOptions<T>,
) -> Result<SearchResult<T>> {
    run_search(data, options, |t| bisect(data, target, 0, data.len(), t))
}

/// Lowest index holding the target.
pub fn binary_search_first<T: Clone + 'static>(
    data: &[T],
    target: &T,
    options: &SearchOptions<T>,
) -> Result<SearchResult<T>> {
    run_search(data, options, |t| bisect_boundary(data, target, Boundary::First, t))
}

/// Highest index holding the target.
pub fn binary_search_last<T: Clone + 'static>(
    data: &[T],
    target: &T,
    options: &SearchOptions<T>,
) -> Result<SearchResult<T>> {
    run_search(data, options, |t| bisect_boundary(data, target, Boundary::Last, t))
}

/// Probes where the target would sit if values were spread linearly between
/// the range's endpoints. The comparator's magnitude is used as a distance,
/// which holds for numeric subtraction but not for -1/0/1 comparators.
pub fn interpolation_search<T: Clone + 'static>(
    data: &[T],
    target: &T,
    options: &SearchOptions<T>,
) -> Result<SearchResult<T>> {
    run_search(data, options, |t| {
        let (mut lo, mut hi) = (0, data.len() - 1);
        while lo <= hi {
            if t.less(target, &data[lo]) || t.less(&data[hi], target) {
                return None;
            }
            let span = t.distance(&data[hi], &data[lo]);
            if span <= 0.0 {
                return (t.compare(&data[lo], target) == Ordering::Equal).then_some(lo);
            }
            let offset = t.distance(target, &data[lo]) / span * (hi - lo) as f64;
            let pos = lo.saturating_add(offset.max(0.0) as usize).min(hi);
            match t.compare(&data[pos], target) {
                Ordering::Equal => return Some(pos),
                Ordering::Less => lo = pos + 1,
                Ordering::Greater => {
                    if pos == 0 {
                        return None;
                    }
                    hi = pos - 1;
                }
            }
        }
        None
    })
}

/// Doubles a probe index until it passes the target, then bisects the
/// window `[bound / 2, bound]`.
pub fn exponential_search<T: Clone + 'static>(
    data: &[T],
    target: &T,
    options: &SearchOptions<T>,
) -> Result<SearchResult<T>> {
    run_search(data, options, |t| {
        if t.compare(&data[0], target) == Ordering::Equal {
            return Some(0);
        }
        let mut bound = 1;
        while bound < data.len() && t.less(&data[bound], target) {
            bound *= 2;
        }
        bisect(data, target, bound / 2, (bound + 1).min(data.len()), t)
    })
}

/// Jumps ahead `floor(sqrt(n))` elements at a time, then scans the block
/// the target must be in.
pub fn jump_search<T: Clone + 'static>(
    data: &[T],
    target: &T,
    options: &SearchOptions<T>,
) -> Result<SearchResult<T>> {
    run_search(data, options, |t| {
        let n = data.len();
        let step = n.isqrt().max(1);
        let mut prev = 0;
        let mut next = step;
        while t.less(&data[next.min(n) - 1], target) {
            prev = next;
            next += step;
            if prev >= n {
                return None;
            }
        }
        for i in prev..next.min(n) {
            match t.compare(&data[i], target) {
                Ordering::Equal => return Some(i),
                Ordering::Greater => return None,
                Ordering::Less => {}
            }
        }
        None
    })
}

/// Splits the range at Fibonacci offsets, using only addition and
/// subtraction to move the probe.
pub fn fibonacci_search<T: Clone + 'static>(
    data: &[T],
    target: &T,
    options: &SearchOptions<T>,
) -> Result<SearchResult<T>> {
    run_search(data, options, |t| {
        let n = data.len();
        // Smallest Fibonacci number >= n, with its two predecessors.
        let (mut f2, mut f1) = (0usize, 1usize);
        let mut f = f2 + f1;
        while f < n {
            f2 = f1;
            f1 = f;
            f = f2 + f1;
        }

        // Elements before `offset + 1` are known to be smaller than the target.
        let mut offset: isize = -1;
        while f > 1 {
            let i = ((offset + f2 as isize) as usize).min(n - 1);
            match t.compare(&data[i], target) {
                Ordering::Less => {
                    f = f1;
                    f1 = f2;
                    f2 = f - f1;
                    offset = i as isize;
                }
                Ordering::Greater => {
                    f = f2;
                    f1 -= f2;
                    f2 = f - f1;
                }
                Ordering::Equal => return Some(i),
            }
        }
        let last = (offset + 1) as usize;
        (f1 == 1 && last < n && t.compare(&data[last], target) == Ordering::Equal).then_some(last)
    })
}

/// Probes the two points a third of the way in from each end and keeps the
/// third that can still hold the target.
pub fn ternary_search<T: Clone + 'static>(
    data: &[T],
    target: &T,
    options: &SearchOptions<T>,
) -> Result<SearchResult<T>> {
    run_search(data, options, |t| {
        let (mut lo, mut hi) = (0, data.len());
        while lo < hi {
            let third = (hi - lo) / 3;
            let m1 = lo + third;
            let m2 = hi - 1 - third;
            match t.compare(&data[m1], target) {
                Ordering::Equal => return Some(m1),
                Ordering::Greater => {
                    hi = m1;
                    continue;
                }
                Ordering::Less => {}
            }
            match t.compare(&data[m2], target) {
                Ordering::Equal => return Some(m2),
                Ordering::Less => lo = m2 + 1,
                Ordering::Greater => {
                    lo = m1 + 1;
                    hi = m2;
                }
            }
        }
        None
    })
}

/// Bisects the half-open range `lo..hi`.
fn bisect<T>(data: &[T], target: &T, mut lo: usize, mut hi: usize, t: &mut Tracker<'_, T>) -> Option<usize> {
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        match t.compare(&data[mid], target) {
            Ordering::Equal => return Some(mid),
            Ordering::Less => lo = mid + 1,
            Ordering::Greater => hi = mid,
        }
    }
    None
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Boundary {
    First,
    Last,
}

/// Keeps bisecting after a match, toward the requested end of the run of
/// equal elements.
fn bisect_boundary<T>(data: &[T], target: &T, boundary: Boundary, t: &mut Tracker<'_, T>) -> Option<usize> {
    let (mut lo, mut hi) = (0, data.len());
    let mut found = None;
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        match t.compare(&data[mid], target) {
            Ordering::Equal => {
                found = Some(mid);
                match boundary {
                    Boundary::First => hi = mid,
                    Boundary::Last => lo = mid + 1,
                }
            }
            Ordering::Less => lo = mid + 1,
            Ordering::Greater => hi = mid,
        }
    }
    found
}
