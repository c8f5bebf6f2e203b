//! Merge sort: top-down, bottom-up and rotation-based in-place merging.

use std::cmp::Ordering;

use crate::core::{SortOptions, SortResult, Tracker};
use crate::error::Result;
use crate::sort::insertion::insertion_sort;
use crate::sort::{Sorter, run_sort};

/// Ranges at or below this length are insertion sorted.
const MERGE_INSERTION_THRESHOLD: usize = 7;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MergeStrategy {
    /// Recursive midpoint splits with an auxiliary buffer.
    #[default]
    TopDown,
    /// Iterative merging of doubling block widths.
    BottomUp,
    /// Merges by rotating elements; O(1) extra space, more moves.
    InPlace,
}

/// Stable merge sort.
///
/// All strategies skip the merge of two adjacent runs when the left run's
/// last element already sorts at or before the right run's first, so
/// presorted input costs one comparison per merge and zero moves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergeSort {
    pub strategy: MergeStrategy,
}

impl MergeSort {
    pub fn bottom_up() -> Self {
        Self {
            strategy: MergeStrategy::BottomUp,
        }
    }

    pub fn in_place() -> Self {
        Self {
            strategy: MergeStrategy::InPlace,
        }
    }
}

impl<T: Clone + 'static> Sorter<T> for MergeSort {
    fn name(&self) -> &'static str {
        match self.strategy {
            MergeStrategy::TopDown => "mergesort",
            MergeStrategy::BottomUp => "mergesort-bottom-up",
            MergeStrategy::InPlace => "mergesort-in-place",
        }
    }

    fn sort<'a>(&self, data: &'a mut [T], options: &SortOptions<T>) -> Result<SortResult<'a, T>> {
        let strategy = self.strategy;
        run_sort(data, options, |v, t| {
            match strategy {
                MergeStrategy::TopDown => {
                    let mut buf = Vec::with_capacity(v.len() / 2 + 1);
                    t.allocated::<T>(buf.capacity());
                    top_down(v, &mut buf, t);
                }
                MergeStrategy::BottomUp => bottom_up(v, t),
                MergeStrategy::InPlace => in_place(v, t),
            }
            Ok(())
        })
    }
}

fn top_down<T: Clone>(v: &mut [T], buf: &mut Vec<T>, t: &mut Tracker<'_, T>) {
    if v.len() <= MERGE_INSERTION_THRESHOLD {
        insertion_sort(v, t);
        return;
    }
    let mid = v.len() / 2;
    top_down(&mut v[..mid], buf, t);
    top_down(&mut v[mid..], buf, t);
    if !already_ordered(v, mid, t) {
        merge_with_buffer(v, mid, buf, t);
    }
}

fn bottom_up<T: Clone>(v: &mut [T], t: &mut Tracker<'_, T>) {
    let len = v.len();
    let mut buf = Vec::with_capacity(len / 2 + 1);
    t.allocated::<T>(buf.capacity());
    let mut width = 1;
    while width < len {
        let mut lo = 0;
        while lo + width < len {
            let hi = (lo + 2 * width).min(len);
            let run = &mut v[lo..hi];
            if !already_ordered(run, width, t) {
                merge_with_buffer(run, width, &mut buf, t);
            }
            lo = hi;
        }
        width *= 2;
    }
}

fn in_place<T>(v: &mut [T], t: &mut Tracker<'_, T>) {
    if v.len() <= MERGE_INSERTION_THRESHOLD {
        insertion_sort(v, t);
        return;
    }
    let mid = v.len() / 2;
    in_place(&mut v[..mid], t);
    in_place(&mut v[mid..], t);
    if !already_ordered(v, mid, t) {
        merge_by_rotation(v, mid, t);
    }
}

/// `v[..mid]` and `v[mid..]` are sorted; true when their concatenation is too.
#[inline]
fn already_ordered<T>(v: &[T], mid: usize, t: &mut Tracker<'_, T>) -> bool {
    t.compare(&v[mid - 1], &v[mid]) != Ordering::Greater
}

/// Merges the sorted halves `v[..mid]` and `v[mid..]`, copying only the left
/// half out. Ties take the left element.
pub(crate) fn merge_with_buffer<T: Clone>(
    v: &mut [T],
    mid: usize,
    buf: &mut Vec<T>,
    t: &mut Tracker<'_, T>,
) {
    buf.clear();
    buf.extend_from_slice(&v[..mid]);
    let (mut i, mut j, mut k) = (0, mid, 0);
    while i < buf.len() && j < v.len() {
        if t.less(&v[j], &buf[i]) {
            v[k] = v[j].clone();
            j += 1;
        } else {
            v[k] = buf[i].clone();
            i += 1;
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

fn merge_by_rotation<T>(v: &mut [T], mid: usize, t: &mut Tracker<'_, T>) {
    let (mut i, mut j) = (0, mid);
    while i < j && j < v.len() {
        if t.less(&v[j], &v[i]) {
            v[i..=j].rotate_right(1);
            t.moved(j - i + 1);
            j += 1;
        }
        i += 1;
    }
}
