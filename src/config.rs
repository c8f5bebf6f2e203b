//! Tunable algorithm parameters.
//!
//! Configuration is a plain value owned by whoever runs the algorithms
//! (usually a [`SortEngine`](crate::algo::SortEngine)). There is no
//! process-wide state: two engines with different settings never observe
//! each other.

use crate::error::{Error, Result};

/// Partitions at or below this size are insertion sorted by quicksort.
pub const DEFAULT_INSERTION_SORT_THRESHOLD: usize = 10;
/// Upper bound on the introsort depth limit.
pub const DEFAULT_MAX_DEPTH: usize = 32;
/// TimSort's minimum merge length; shorter inputs are insertion sorted.
pub const DEFAULT_MIN_RUN: usize = 32;
pub const DEFAULT_RADIX_BASE: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortConfig {
    pub insertion_sort_threshold: usize,
    pub max_depth: usize,
    pub min_run: usize,
    pub radix_base: u32,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            insertion_sort_threshold: DEFAULT_INSERTION_SORT_THRESHOLD,
            max_depth: DEFAULT_MAX_DEPTH,
            min_run: DEFAULT_MIN_RUN,
            radix_base: DEFAULT_RADIX_BASE,
        }
    }
}

/// A partial update; `None` fields keep their current value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConfigPatch {
    pub insertion_sort_threshold: Option<usize>,
    pub max_depth: Option<usize>,
    pub min_run: Option<usize>,
    pub radix_base: Option<u32>,
}

impl ConfigPatch {
    pub fn insertion_sort_threshold(mut self, value: usize) -> Self {
        self.insertion_sort_threshold = Some(value);
        self
    }

    pub fn max_depth(mut self, value: usize) -> Self {
        self.max_depth = Some(value);
        self
    }

    pub fn min_run(mut self, value: usize) -> Self {
        self.min_run = Some(value);
        self
    }

    pub fn radix_base(mut self, value: u32) -> Self {
        self.radix_base = Some(value);
        self
    }
}

impl SortConfig {
    /// Returns a copy of `self` with `patch` applied, after validation.
    pub fn merged(&self, patch: &ConfigPatch) -> Result<Self> {
        let merged = Self {
            insertion_sort_threshold: patch
                .insertion_sort_threshold
                .unwrap_or(self.insertion_sort_threshold),
            max_depth: patch.max_depth.unwrap_or(self.max_depth),
            min_run: patch.min_run.unwrap_or(self.min_run),
            radix_base: patch.radix_base.unwrap_or(self.radix_base),
        };
        merged.validate()?;
        Ok(merged)
    }

    /// Applies `patch` in place. On error the configuration is left untouched.
    pub fn configure(&mut self, patch: &ConfigPatch) -> Result<()> {
        *self = self.merged(patch)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.insertion_sort_threshold == 0 {
            return Err(Error::InvalidInput(
                "insertion_sort_threshold must be at least 1".into(),
            ));
        }
        if self.min_run < 2 {
            return Err(Error::InvalidInput(format!(
                "min_run must be at least 2, got {}",
                self.min_run
            )));
        }
        if self.radix_base < 2 {
            return Err(Error::InvalidInput(format!(
                "radix_base must be at least 2, got {}",
                self.radix_base
            )));
        }
        Ok(())
    }
}
