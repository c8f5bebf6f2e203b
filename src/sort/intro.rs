//! Introsort: quicksort bounded by a depth limit with a heap sort fallback.

use crate::config::{DEFAULT_MAX_DEPTH, SortConfig};
use crate::core::{SortOptions, SortResult, Tracker};
use crate::error::Result;
use crate::sort::heap::heap_sort;
use crate::sort::insertion::insertion_sort;
use crate::sort::quick::partition;
use crate::sort::{Sorter, run_sort};

/// Ranges at or below this length are insertion sorted.
const INTRO_INSERTION_THRESHOLD: usize = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntroSort {
    /// Cap applied to the computed depth limit.
    pub max_depth: usize,
    /// Derive the limit from `log2(n) + log2(log2(n))` instead of `2 * log2(n)`.
    pub adaptive: bool,
}

impl Default for IntroSort {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            adaptive: false,
        }
    }
}

impl IntroSort {
    pub fn adaptive() -> Self {
        Self {
            adaptive: true,
            ..Self::default()
        }
    }

    pub fn from_config(config: &SortConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            ..Self::default()
        }
    }

    pub fn with_adaptive(mut self, adaptive: bool) -> Self {
        self.adaptive = adaptive;
        self
    }

    /// Partitioning depth allowed before a range switches to heap sort.
    pub fn depth_limit(&self, len: usize) -> usize {
        if len < 2 {
            return 0;
        }
        let log2 = len.ilog2() as usize;
        let limit = if self.adaptive {
            let lg = (len as f64).log2();
            (lg + lg.log2().max(0.0)).floor() as usize
        } else {
            2 * log2
        };
        limit.min(self.max_depth)
    }
}

impl<T: Clone + 'static> Sorter<T> for IntroSort {
    fn name(&self) -> &'static str {
        if self.adaptive {
            "introsort-adaptive"
        } else {
            "introsort"
        }
    }

    fn sort<'a>(&self, data: &'a mut [T], options: &SortOptions<T>) -> Result<SortResult<'a, T>> {
        let depth = self.depth_limit(data.len());
        run_sort(data, options, |v, t| {
            intro_sort(v, depth, t);
            Ok(())
        })
    }
}

fn intro_sort<T>(mut v: &mut [T], mut depth: usize, t: &mut Tracker<'_, T>) {
    while v.len() > INTRO_INSERTION_THRESHOLD {
        if depth == 0 {
            heap_sort(v, t);
            return;
        }
        depth -= 1;

        let p = partition(v, t);
        let (left, rest) = v.split_at_mut(p);
        let right = &mut rest[1..];
        if left.len() < right.len() {
            intro_sort(left, depth, t);
            v = right;
        } else {
            intro_sort(right, depth, t);
            v = left;
        }
    }
    insertion_sort(v, t);
}
