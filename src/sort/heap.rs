//! Binary max-heap sort and a reusable priority queue on the same heap.

use std::cmp::Ordering;

use crate::core::{Comparator, Numeric, SortOptions, SortResult, Tracker};
use crate::error::Result;
use crate::sort::{Sorter, run_sort};

/// In-place heap sort. O(n log n) in every case, not stable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeapSort;

impl<T: Clone + 'static> Sorter<T> for HeapSort {
    fn name(&self) -> &'static str {
        "heapsort"
    }

    fn sort<'a>(&self, data: &'a mut [T], options: &SortOptions<T>) -> Result<SortResult<'a, T>> {
        run_sort(data, options, |v, t| {
            heap_sort(v, t);
            Ok(())
        })
    }
}

/// Builds a max-heap bottom-up, then repeatedly moves the root behind the
/// shrinking heap. Child indices are the zero-based `2i + 1` / `2i + 2`
/// relative to `v`, so sub-slices can be sorted directly.
pub(crate) fn heap_sort<T>(v: &mut [T], t: &mut Tracker<'_, T>) {
    let len = v.len();
    for i in (0..len / 2).rev() {
        sift_down(v, i, len, t);
    }
    for end in (1..len).rev() {
        t.swap(v, 0, end);
        sift_down(v, 0, end, t);
    }
}

fn sift_down<T>(v: &mut [T], mut root: usize, len: usize, t: &mut Tracker<'_, T>) {
    loop {
        let left = 2 * root + 1;
        let right = left + 1;
        let mut largest = root;
        if left < len && t.less(&v[largest], &v[left]) {
            largest = left;
        }
        if right < len && t.less(&v[largest], &v[right]) {
            largest = right;
        }
        if largest == root {
            return;
        }
        t.swap(v, root, largest);
        root = largest;
    }
}

/// Max-priority queue over a binary heap.
///
/// The element comparing greatest under the comparator is dequeued first;
/// pass [`Comparator::reversed`] for min-first behavior.
///
/// ```
/// use ordkit::sort::PriorityQueue;
///
/// let mut queue = PriorityQueue::<i32>::new();
/// queue.enqueue(3);
/// queue.enqueue(9);
/// queue.enqueue(1);
/// assert_eq!(queue.dequeue(), Some(9));
/// assert_eq!(queue.peek(), Some(&3));
/// ```
#[derive(Clone, Debug)]
pub struct PriorityQueue<T> {
    heap: Vec<T>,
    comparator: Comparator<T>,
}

impl<T: Numeric + 'static> PriorityQueue<T> {
    pub fn new() -> Self {
        Self::with_comparator(Comparator::numeric())
    }
}

impl<T: Numeric + 'static> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PriorityQueue<T> {
    pub fn with_comparator(comparator: Comparator<T>) -> Self {
        Self {
            heap: Vec::new(),
            comparator,
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn peek(&self) -> Option<&T> {
        self.heap.first()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }

    /// Appends `item` and bubbles it up.
    pub fn enqueue(&mut self, item: T) {
        self.heap.push(item);
        let mut i = self.heap.len() - 1;
        while i > 0 {
            let parent = (i - 1) / 2;
            if !self.higher(i, parent) {
                break;
            }
            self.heap.swap(i, parent);
            i = parent;
        }
    }

    /// Removes the top item: the last slot moves to the root and bubbles down.
    pub fn dequeue(&mut self) -> Option<T> {
        let last = self.heap.len().checked_sub(1)?;
        self.heap.swap(0, last);
        let top = self.heap.pop();
        let len = self.heap.len();
        let mut i = 0;
        loop {
            let left = 2 * i + 1;
            let right = left + 1;
            let mut best = i;
            if left < len && self.higher(left, best) {
                best = left;
            }
            if right < len && self.higher(right, best) {
                best = right;
            }
            if best == i {
                break;
            }
            self.heap.swap(i, best);
            i = best;
        }
        top
    }

    /// Drains the queue, highest priority first.
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.heap.len());
        while let Some(item) = self.dequeue() {
            out.push(item);
        }
        out
    }

    fn higher(&self, a: usize, b: usize) -> bool {
        self.comparator
            .compare(&self.heap[a], &self.heap[b])
            .partial_cmp(&0.0)
            == Some(Ordering::Greater)
    }
}
