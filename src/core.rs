//! Core traits and types shared by every algorithm.
//!
//! This module defines:
//! - [`Comparator`]: the three-way comparison contract (negative / zero / positive).
//! - [`SortOptions`] and [`SearchOptions`]: per-call option records.
//! - [`Metrics`]: comparison, movement, timing and memory counters.
//! - [`Element`]: the bound the dispatch facades place on element types.
//! - Tracker: internal counting wrapper every algorithm compares and moves through.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{Error, Result};

/// A total order over `T` expressed as a signed number.
///
/// The sign carries the ordering. The magnitude is only meaningful for
/// numeric comparators: interpolation search and find-closest read it as a
/// distance, which is undefined for comparators that only return -1/0/1.
///
/// # Examples
///
/// ```
/// use ordkit::Comparator;
///
/// let by_len = Comparator::from_ordering(|a: &String, b: &String| a.len().cmp(&b.len()));
/// assert!(by_len.compare(&"ab".to_string(), &"abc".to_string()) < 0.0);
///
/// let numeric = Comparator::<i32>::numeric();
/// assert_eq!(numeric.compare(&7, &3), 4.0);
/// ```
pub struct Comparator<T> {
    inner: Arc<dyn Fn(&T, &T) -> f64 + Send + Sync>,
}

impl<T> Clone for Comparator<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for Comparator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Comparator(..)")
    }
}

impl<T: 'static> Comparator<T> {
    pub fn new<F>(compare: F) -> Self
    where
        F: Fn(&T, &T) -> f64 + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(compare),
        }
    }

    /// Wraps an [`Ordering`]-returning closure; results map to -1, 0 and 1.
    pub fn from_ordering<F>(compare: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        Self::new(move |a, b| match compare(a, b) {
            Ordering::Less => -1.0,
            Ordering::Equal => 0.0,
            Ordering::Greater => 1.0,
        })
    }

    /// The same order with every result negated.
    pub fn reversed(&self) -> Self {
        let inner = Arc::clone(&self.inner);
        Self::new(move |a, b| -inner(a, b))
    }
}

impl<T: Ord + 'static> Comparator<T> {
    pub fn natural() -> Self {
        Self::from_ordering(|a: &T, b: &T| a.cmp(b))
    }
}

impl<T: Numeric + 'static> Comparator<T> {
    /// Numeric subtraction, `a - b`.
    ///
    /// The sign comes from comparing the native values, so integers too close
    /// to tell apart as `f64` still order correctly; the magnitude is the
    /// `f64` difference, never below `f64::MIN_POSITIVE` for distinct values.
    pub fn numeric() -> Self {
        Self::new(|a: &T, b: &T| {
            let diff = a.to_f64() - b.to_f64();
            match a.partial_cmp(b) {
                Some(Ordering::Less) => diff.min(-f64::MIN_POSITIVE),
                Some(Ordering::Greater) => diff.max(f64::MIN_POSITIVE),
                Some(Ordering::Equal) => 0.0,
                None => f64::NAN,
            }
        })
    }
}

impl<T> Comparator<T> {
    #[inline]
    pub fn compare(&self, a: &T, b: &T) -> f64 {
        (self.inner)(a, b)
    }
}

/// Element types the default (subtracting) comparator is defined for.
pub trait Numeric: Copy + PartialOrd {
    fn to_f64(self) -> f64;
}

macro_rules! impl_numeric {
    ($($t:ty),*) => {
        $(impl Numeric for $t {
            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }
        })*
    };
}

impl_numeric!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

/// Shape of an element as seen by the radix sorters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RadixKey<'a> {
    Int(i128),
    Float(f64),
    Str(&'a [u8]),
    Unsupported,
}

impl RadixKey<'_> {
    pub fn kind(&self) -> &'static str {
        match self {
            RadixKey::Int(_) => "integer",
            RadixKey::Float(_) => "float",
            RadixKey::Str(_) => "string",
            RadixKey::Unsupported => "unsupported",
        }
    }
}

/// Bound required by the dispatch facades.
///
/// `Display` feeds the hash index of the search facade; [`Element::radix_key`]
/// tells the radix sorters whether (and how) an element can be bucketed by digit.
/// Types without a digit representation keep the default, which makes radix
/// sort reject them with [`Error::UnsupportedElementType`].
///
/// ```
/// use std::fmt;
/// use ordkit::Element;
///
/// #[derive(Clone, PartialEq)]
/// struct Ticket(u32);
///
/// impl fmt::Display for Ticket {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         write!(f, "T{}", self.0)
///     }
/// }
///
/// impl Element for Ticket {}
/// ```
pub trait Element: Clone + PartialEq + fmt::Display {
    fn radix_key(&self) -> RadixKey<'_> {
        RadixKey::Unsupported
    }
}

macro_rules! impl_int_element {
    ($($t:ty),*) => {
        $(impl Element for $t {
            fn radix_key(&self) -> RadixKey<'_> {
                RadixKey::Int(*self as i128)
            }
        })*
    };
}

impl_int_element!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, usize);

impl Element for f32 {
    fn radix_key(&self) -> RadixKey<'_> {
        RadixKey::Float(*self as f64)
    }
}

impl Element for f64 {
    fn radix_key(&self) -> RadixKey<'_> {
        RadixKey::Float(*self)
    }
}

impl Element for String {
    fn radix_key(&self) -> RadixKey<'_> {
        RadixKey::Str(self.as_bytes())
    }
}

impl Element for &str {
    fn radix_key(&self) -> RadixKey<'_> {
        RadixKey::Str(self.as_bytes())
    }
}

impl Element for char {}
impl Element for bool {}

/// Options accepted by every sorter.
///
/// `SortOptions::default()` uses numeric subtraction and is therefore only
/// available for [`Numeric`] element types; other types supply a comparator
/// through [`SortOptions::with_comparator`].
#[derive(Clone, Debug)]
pub struct SortOptions<T> {
    pub comparator: Comparator<T>,
    pub descending: bool,
    pub in_place: bool,
}

impl<T: Numeric + 'static> Default for SortOptions<T> {
    fn default() -> Self {
        Self::with_comparator(Comparator::numeric())
    }
}

impl<T> SortOptions<T> {
    pub fn with_comparator(comparator: Comparator<T>) -> Self {
        Self {
            comparator,
            descending: false,
            in_place: false,
        }
    }

    pub fn descending(mut self, descending: bool) -> Self {
        self.descending = descending;
        self
    }

    pub fn in_place(mut self, in_place: bool) -> Self {
        self.in_place = in_place;
        self
    }
}

impl<T: 'static> SortOptions<T> {
    /// The comparator algorithms actually use: negated when `descending` is set.
    pub fn effective_comparator(&self) -> Comparator<T> {
        effective_comparator(&self.comparator, self.descending)
    }
}

/// Options accepted by every search algorithm.
#[derive(Clone, Debug)]
pub struct SearchOptions<T> {
    pub comparator: Comparator<T>,
    /// The sequence is ordered descending under `comparator`.
    pub descending: bool,
}

impl<T: Numeric + 'static> Default for SearchOptions<T> {
    fn default() -> Self {
        Self::with_comparator(Comparator::numeric())
    }
}

impl<T> SearchOptions<T> {
    pub fn with_comparator(comparator: Comparator<T>) -> Self {
        Self {
            comparator,
            descending: false,
        }
    }

    pub fn descending(mut self, descending: bool) -> Self {
        self.descending = descending;
        self
    }
}

impl<T: 'static> SearchOptions<T> {
    pub fn effective_comparator(&self) -> Comparator<T> {
        effective_comparator(&self.comparator, self.descending)
    }
}

impl<T> From<&SortOptions<T>> for SearchOptions<T> {
    fn from(options: &SortOptions<T>) -> Self {
        Self {
            comparator: options.comparator.clone(),
            descending: options.descending,
        }
    }
}

/// Builds the comparator an algorithm runs with. Descending order negates the
/// comparator's result; sorters never reverse their output after the fact.
pub fn effective_comparator<T: 'static>(comparator: &Comparator<T>, descending: bool) -> Comparator<T> {
    if descending {
        comparator.reversed()
    } else {
        comparator.clone()
    }
}

/// Counters collected by one algorithm invocation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Metrics {
    pub comparisons: u64,
    /// Element movements: swaps, shifts and buffer write-backs each count once.
    pub swaps: u64,
    pub elapsed: Duration,
    /// Bytes of auxiliary buffers the call allocated; `None` when it allocated nothing.
    pub memory_delta: Option<i64>,
}

impl Metrics {
    pub fn reset(&mut self) {
        *self = Metrics::default();
    }
}

/// Outcome of a sort call.
///
/// `result` borrows the caller's slice when the call ran in place, so it is
/// reference-identical to the input; otherwise it owns a sorted copy.
#[derive(Clone, Debug)]
pub struct SortResult<'a, T: Clone> {
    pub result: Cow<'a, [T]>,
    pub metrics: Metrics,
}

impl<T: Clone> SortResult<'_, T> {
    pub fn into_vec(self) -> Vec<T> {
        self.result.into_owned()
    }

    /// Detaches the result from the input borrow.
    pub fn into_owned(self) -> SortResult<'static, T>
    where
        T: 'static,
    {
        SortResult {
            result: Cow::Owned(self.result.into_owned()),
            metrics: self.metrics,
        }
    }
}

/// Swaps two elements and records the movement.
#[inline]
pub fn swap<T>(data: &mut [T], i: usize, j: usize, metrics: &mut Metrics) {
    data.swap(i, j);
    metrics.swaps += 1;
}

/// Rejects NaN and infinite values.
pub fn validate_finite(values: impl IntoIterator<Item = f64>) -> Result<()> {
    match values.into_iter().position(|v| !v.is_finite()) {
        Some(at) => Err(Error::InvalidInput(format!(
            "non-finite value at index {at}"
        ))),
        None => Ok(()),
    }
}

/// Runs `body` between two monotonic clock reads.
pub fn measure_execution<R>(body: impl FnOnce() -> R) -> (R, Duration) {
    let start = Instant::now();
    let out = body();
    (out, start.elapsed())
}

/// Whether `data` is non-decreasing under `comparator`. Not instrumented.
pub fn is_sorted<T>(data: &[T], comparator: &Comparator<T>) -> bool {
    data.windows(2).all(|w| comparator.compare(&w[0], &w[1]) <= 0.0)
}

/// Counting wrapper around a comparator and a [`Metrics`] record.
///
/// Every comparison and element movement of an algorithm goes through here,
/// which keeps the counters comparable across algorithms.
pub(crate) struct Tracker<'c, T> {
    comparator: &'c Comparator<T>,
    pub(crate) metrics: Metrics,
    fault: Option<String>,
}

impl<'c, T> Tracker<'c, T> {
    pub(crate) fn new(comparator: &'c Comparator<T>) -> Self {
        Self {
            comparator,
            metrics: Metrics::default(),
            fault: None,
        }
    }

    /// Raw comparator output, counted as one comparison.
    #[inline]
    pub(crate) fn distance(&mut self, a: &T, b: &T) -> f64 {
        self.metrics.comparisons += 1;
        let d = self.comparator.compare(a, b);
        if d.is_nan() && self.fault.is_none() {
            self.fault = Some(format!(
                "comparator returned NaN on comparison #{}",
                self.metrics.comparisons
            ));
        }
        d
    }

    /// NaN results are treated as equal here and reported by [`Tracker::finish`].
    #[inline]
    pub(crate) fn compare(&mut self, a: &T, b: &T) -> Ordering {
        let d = self.distance(a, b);
        if d < 0.0 {
            Ordering::Less
        } else if d > 0.0 {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }

    #[inline]
    pub(crate) fn less(&mut self, a: &T, b: &T) -> bool {
        self.compare(a, b) == Ordering::Less
    }

    #[inline]
    pub(crate) fn swap(&mut self, data: &mut [T], i: usize, j: usize) {
        swap(data, i, j, &mut self.metrics);
    }

    #[inline]
    pub(crate) fn moved(&mut self, count: usize) {
        self.metrics.swaps += count as u64;
    }

    pub(crate) fn allocated<E>(&mut self, elements: usize) {
        let bytes = (elements * std::mem::size_of::<E>()) as i64;
        *self.metrics.memory_delta.get_or_insert(0) += bytes;
    }

    pub(crate) fn finish(self, elapsed: Duration) -> Result<Metrics> {
        if let Some(fault) = self.fault {
            return Err(Error::ComparatorFault(fault));
        }
        let mut metrics = self.metrics;
        metrics.elapsed = elapsed;
        Ok(metrics)
    }
}
