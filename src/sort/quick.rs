//! Quicksort with median-of-three pivots.
//!
//! Partitions are processed from an explicit stack (smaller side first) so
//! adversarial inputs cost time, never call-stack depth.

use std::cmp::Ordering;

use crate::config::{DEFAULT_INSERTION_SORT_THRESHOLD, SortConfig};
use crate::core::{SortOptions, SortResult, Tracker};
use crate::error::Result;
use crate::sort::insertion::insertion_sort;
use crate::sort::{Sorter, run_sort};

/// Median-of-three quicksort with an insertion-sort floor.
///
/// The default partition is Lomuto-style; [`QuickSort::three_way`] groups
/// keys equal to the pivot in the same pass (Dutch national flag), which
/// keeps duplicate-heavy inputs from degrading. Not stable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuickSort {
    pub insertion_threshold: usize,
    pub three_way: bool,
}

impl Default for QuickSort {
    fn default() -> Self {
        Self {
            insertion_threshold: DEFAULT_INSERTION_SORT_THRESHOLD,
            three_way: false,
        }
    }
}

impl QuickSort {
    pub fn three_way() -> Self {
        Self {
            three_way: true,
            ..Self::default()
        }
    }

    pub fn from_config(config: &SortConfig) -> Self {
        Self {
            insertion_threshold: config.insertion_sort_threshold,
            ..Self::default()
        }
    }

    pub fn with_three_way(mut self, three_way: bool) -> Self {
        self.three_way = three_way;
        self
    }
}

impl<T: Clone + 'static> Sorter<T> for QuickSort {
    fn name(&self) -> &'static str {
        if self.three_way {
            "quicksort-3way"
        } else {
            "quicksort"
        }
    }

    fn sort<'a>(&self, data: &'a mut [T], options: &SortOptions<T>) -> Result<SortResult<'a, T>> {
        let threshold = self.insertion_threshold.max(1);
        let three_way = self.three_way;
        run_sort(data, options, |v, t| {
            if three_way {
                quick_sort_3way(v, threshold, t);
            } else {
                quick_sort(v, threshold, t);
            }
            Ok(())
        })
    }
}

fn quick_sort<T>(v: &mut [T], threshold: usize, t: &mut Tracker<'_, T>) {
    let mut stack = vec![(0, v.len())];
    while let Some((lo, hi)) = stack.pop() {
        if hi - lo <= threshold {
            insertion_sort(&mut v[lo..hi], t);
            continue;
        }
        let p = lo + partition(&mut v[lo..hi], t);
        push_ranges(&mut stack, (lo, p), (p + 1, hi));
    }
}

fn quick_sort_3way<T: Clone>(v: &mut [T], threshold: usize, t: &mut Tracker<'_, T>) {
    let mut stack = vec![(0, v.len())];
    while let Some((lo, hi)) = stack.pop() {
        if hi - lo <= threshold {
            insertion_sort(&mut v[lo..hi], t);
            continue;
        }
        let (lt, gt) = partition_3way(&mut v[lo..hi], t);
        push_ranges(&mut stack, (lo, lo + lt), (lo + gt, hi));
    }
}

/// Pushes the larger range first so the smaller one is handled next.
fn push_ranges(stack: &mut Vec<(usize, usize)>, a: (usize, usize), b: (usize, usize)) {
    let (small, large) = if a.1 - a.0 <= b.1 - b.0 { (a, b) } else { (b, a) };
    if large.1 - large.0 > 1 {
        stack.push(large);
    }
    if small.1 - small.0 > 1 {
        stack.push(small);
    }
}

/// Orders `v[0]`, `v[mid]`, `v[last]` and moves the median to `v[last]`.
pub(crate) fn median_of_three<T>(v: &mut [T], t: &mut Tracker<'_, T>) {
    let last = v.len() - 1;
    let mid = last / 2;
    if t.less(&v[mid], &v[0]) {
        t.swap(v, 0, mid);
    }
    if t.less(&v[last], &v[0]) {
        t.swap(v, 0, last);
    }
    if t.less(&v[last], &v[mid]) {
        t.swap(v, mid, last);
    }
    t.swap(v, mid, last);
}

/// Lomuto partition around a median-of-three pivot. Returns the pivot's
/// final index; everything before it compares `<=` the pivot.
pub(crate) fn partition<T>(v: &mut [T], t: &mut Tracker<'_, T>) -> usize {
    median_of_three(v, t);
    let pivot = v.len() - 1;
    let mut store = 0;
    for j in 0..pivot {
        if t.compare(&v[j], &v[pivot]) != Ordering::Greater {
            if store != j {
                t.swap(v, store, j);
            }
            store += 1;
        }
    }
    if store != pivot {
        t.swap(v, store, pivot);
    }
    store
}

/// Dutch-flag partition. Returns `(lt, gt)` such that `v[..lt] < pivot`,
/// `v[lt..gt] == pivot` and `v[gt..] > pivot`.
fn partition_3way<T: Clone>(v: &mut [T], t: &mut Tracker<'_, T>) -> (usize, usize) {
    median_of_three(v, t);
    let pivot = v[v.len() - 1].clone();
    let (mut lt, mut i, mut gt) = (0, 0, v.len());
    while i < gt {
        match t.compare(&v[i], &pivot) {
            Ordering::Less => {
                if lt != i {
                    t.swap(v, lt, i);
                }
                lt += 1;
                i += 1;
            }
            Ordering::Greater => {
                gt -= 1;
                t.swap(v, i, gt);
            }
            Ordering::Equal => i += 1,
        }
    }
    (lt, gt)
}
