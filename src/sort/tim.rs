//! TimSort: natural runs, a balanced merge stack and galloping merges.

use std::cmp::Ordering;

use crate::config::{DEFAULT_MIN_RUN, SortConfig};
use crate::core::{SortOptions, SortResult, Tracker};
use crate::error::Result;
use crate::sort::insertion::{insertion_sort, insertion_sort_from};
use crate::sort::{Sorter, run_sort};

/// Consecutive wins by one side before a merge switches to galloping.
const MIN_GALLOP: usize = 7;

/// A sorted slice `start..end` waiting on the merge stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Run {
    start: usize,
    end: usize,
}

impl Run {
    fn len(&self) -> usize {
        self.end - self.start
    }
}

/// Stable, adaptive merge sort.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimSort {
    /// Inputs shorter than this are insertion sorted outright.
    pub min_merge: usize,
}

impl Default for TimSort {
    fn default() -> Self {
        Self {
            min_merge: DEFAULT_MIN_RUN,
        }
    }
}

impl TimSort {
    pub fn from_config(config: &SortConfig) -> Self {
        Self {
            min_merge: config.min_run,
        }
    }
}

impl<T: Clone + 'static> Sorter<T> for TimSort {
    fn name(&self) -> &'static str {
        "timsort"
    }

    fn sort<'a>(&self, data: &'a mut [T], options: &SortOptions<T>) -> Result<SortResult<'a, T>> {
        let min_merge = self.min_merge.max(2);
        run_sort(data, options, |v, t| {
            tim_sort(v, min_merge, t);
            Ok(())
        })
    }
}

/// Shifts `n` right until it drops below `min_merge`, OR-ing in every bit
/// shifted out. For `n >= min_merge` the result lies in
/// `[min_merge / 2, min_merge]`.
pub(crate) fn min_run_length(mut n: usize, min_merge: usize) -> usize {
    let mut dropped = 0;
    while n >= min_merge {
        dropped |= n & 1;
        n >>= 1;
    }
    n + dropped
}

fn tim_sort<T: Clone>(v: &mut [T], min_merge: usize, t: &mut Tracker<'_, T>) {
    let len = v.len();
    if len < min_merge {
        insertion_sort(v, t);
        return;
    }

    let min_run = min_run_length(len, min_merge);
    let mut stack: Vec<Run> = Vec::new();
    let mut buf: Vec<T> = Vec::with_capacity(len / 2 + 1);
    t.allocated::<T>(buf.capacity());

    let mut start = 0;
    while start < len {
        let mut end = start + count_run(&mut v[start..], t);
        let forced = (start + min_run).min(len);
        if end < forced {
            insertion_sort_from(&mut v[start..forced], end - start, t);
            end = forced;
        }
        stack.push(Run { start, end });
        collapse(v, &mut stack, &mut buf, t);
        start = end;
    }

    while stack.len() > 1 {
        let n = stack.len() - 2;
        merge_at(v, &mut stack, n, &mut buf, t);
    }
}

/// Length of the run starting at `v[0]`. A strictly descending run is
/// reversed in place; ascending runs may contain equal neighbours.
fn count_run<T>(v: &mut [T], t: &mut Tracker<'_, T>) -> usize {
    if v.len() < 2 {
        return v.len();
    }
    let mut end = 2;
    if t.less(&v[1], &v[0]) {
        while end < v.len() && t.less(&v[end], &v[end - 1]) {
            end += 1;
        }
        v[..end].reverse();
        t.moved(end / 2);
    } else {
        while end < v.len() && !t.less(&v[end], &v[end - 1]) {
            end += 1;
        }
    }
    end
}

/// Restores the stack invariants: for the top runs A, B, C (C on top),
/// `A > B + C` and `B > C`. Checking one level deeper as well keeps the
/// invariant valid for the whole stack.
fn collapse<T: Clone>(v: &mut [T], stack: &mut Vec<Run>, buf: &mut Vec<T>, t: &mut Tracker<'_, T>) {
    while stack.len() > 1 {
        let mut n = stack.len() - 2;
        let breaks_upper = n > 0 && stack[n - 1].len() <= stack[n].len() + stack[n + 1].len();
        let breaks_deeper = n > 1 && stack[n - 2].len() <= stack[n - 1].len() + stack[n].len();
        if breaks_upper || breaks_deeper {
            if stack[n - 1].len() < stack[n + 1].len() {
                n -= 1;
            }
        } else if stack[n].len() > stack[n + 1].len() {
            break;
        }
        merge_at(v, stack, n, buf, t);
    }
}

/// Merges `stack[n]` with `stack[n + 1]`.
fn merge_at<T: Clone>(
    v: &mut [T],
    stack: &mut Vec<Run>,
    n: usize,
    buf: &mut Vec<T>,
    t: &mut Tracker<'_, T>,
) {
    let left = stack[n];
    let right = stack[n + 1];
    stack[n] = Run {
        start: left.start,
        end: right.end,
    };
    stack.remove(n + 1);
    let slice = &mut v[left.start..right.end];
    if t.compare(&slice[left.len() - 1], &slice[left.len()]) != Ordering::Greater {
        return;
    }
    gallop_merge(slice, left.len(), buf, t);
}

/// Merges `v[..mid]` and `v[mid..]`. After [`MIN_GALLOP`] consecutive picks
/// from one side, locates the next cut points with exponential-then-binary
/// search and moves whole blocks at once.
fn gallop_merge<T: Clone>(v: &mut [T], mid: usize, buf: &mut Vec<T>, t: &mut Tracker<'_, T>) {
    buf.clear();
    buf.extend_from_slice(&v[..mid]);
    let (mut i, mut j, mut k) = (0, mid, 0);
    let (mut left_wins, mut right_wins) = (0, 0);

    while i < buf.len() && j < v.len() {
        if left_wins >= MIN_GALLOP || right_wins >= MIN_GALLOP {
            // Right elements strictly below buf[i] precede it.
            let take = gallop(&buf[i], &v[j..], true, t);
            for _ in 0..take {
                v[k] = v[j].clone();
                k += 1;
                j += 1;
            }
            t.moved(take);
            if j == v.len() {
                break;
            }
            // Left elements not above v[j] precede it.
            let take = gallop(&v[j], &buf[i..], false, t);
            for _ in 0..take {
                v[k] = buf[i].clone();
                k += 1;
                i += 1;
            }
            t.moved(take);
            left_wins = 0;
            right_wins = 0;
            continue;
        }

        if t.less(&v[j], &buf[i]) {
            v[k] = v[j].clone();
            j += 1;
            right_wins += 1;
            left_wins = 0;
        } else {
            v[k] = buf[i].clone();
            i += 1;
            left_wins += 1;
            right_wins = 0;
        }
        k += 1;
        t.moved(1);
    }

    while i < buf.len() {
        v[k] = buf[i].clone();
        i += 1;
        k += 1;
        t.moved(1);
    }
}

/// Number of leading elements of `run` that go before `key`: those strictly
/// less than it when `strict`, otherwise those not greater.
pub(crate) fn gallop<T>(key: &T, run: &[T], strict: bool, t: &mut Tracker<'_, T>) -> usize {
    if run.is_empty() || !precedes(&run[0], key, strict, t) {
        return 0;
    }
    // Exponential phase: run[last] precedes, run[probe] is the next candidate.
    let mut last = 0;
    let mut probe = 1;
    while probe < run.len() && precedes(&run[probe], key, strict, t) {
        last = probe;
        probe = probe * 2 + 1;
    }
    // Binary phase over (last, min(probe, len)).
    let (mut lo, mut hi) = (last + 1, probe.min(run.len()));
    while lo < hi {
        let m = lo + (hi - lo) / 2;
        if precedes(&run[m], key, strict, t) {
            lo = m + 1;
        } else {
            hi = m;
        }
    }
    lo
}

#[inline]
fn precedes<T>(x: &T, key: &T, strict: bool, t: &mut Tracker<'_, T>) -> bool {
    match t.compare(x, key) {
        Ordering::Less => true,
        Ordering::Equal => !strict,
        Ordering::Greater => false,
    }
}
