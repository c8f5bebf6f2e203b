//! Insertion sort used as the small-range floor by the other sorters.

use crate::core::Tracker;

/// Sorts `v` by adjacent swaps. Stable.
#[inline]
pub(crate) fn insertion_sort<T>(v: &mut [T], t: &mut Tracker<'_, T>) {
    insertion_sort_from(v, 1, t);
}

/// Sorts `v` assuming `v[..sorted]` is already ordered.
pub(crate) fn insertion_sort_from<T>(v: &mut [T], sorted: usize, t: &mut Tracker<'_, T>) {
    for i in sorted.max(1)..v.len() {
        let mut j = i;
        while j > 0 && t.less(&v[j], &v[j - 1]) {
            t.swap(v, j, j - 1);
            j -= 1;
        }
    }
}
