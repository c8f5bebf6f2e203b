//! Radix sorts: LSD and MSD over integers, byte-wise strings, and floats
//! through fixed-precision scaling.
//!
//! Digits are extracted from each element's [`RadixKey`]; the sort itself
//! works on a permutation of indices which is applied to the elements at the
//! end, so the original values (not rescaled approximations) come back.
//! Every variant is stable. Each placement of an index during a counting pass
//! and each final swap counts as a movement. Only the float variant compares,
//! and only values whose scaled keys collide.

use cuneiform::cuneiform;

use crate::config::{DEFAULT_RADIX_BASE, SortConfig};
use crate::core::{Element, RadixKey, SortOptions, SortResult, Tracker, validate_finite};
use crate::error::{Error, Result};
use crate::sort::{Sorter, run_sort};

/// Number of buckets for the byte-wise string pass.
const RADIX_BUCKETS: usize = 256;
/// Largest accepted integer base.
const MAX_BASE: u32 = 1 << 16;
/// Decimal places kept by the float variant unless overridden.
pub const DEFAULT_PRECISION: u32 = 6;

// Cache-aligned counts for the string pass.
#[cuneiform]
struct RadixCounts {
    data: [usize; RADIX_BUCKETS],
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RadixVariant {
    /// Chosen from the first element: integers use LSD, floats the float
    /// path, strings the string path.
    #[default]
    Auto,
    Lsd,
    Msd,
    Strings,
    Floats,
}

/// Extension options of the radix sorters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RadixOptions {
    /// Integer digit base, `2..=65536`.
    pub base: u32,
    /// Number of leading bytes the string variant sorts by. Defaults to the
    /// longest key; bytes past it do not affect the order.
    pub max_length: Option<usize>,
    /// Decimal places the float variant keeps before rounding.
    pub precision: u32,
}

impl Default for RadixOptions {
    fn default() -> Self {
        Self {
            base: DEFAULT_RADIX_BASE,
            max_length: None,
            precision: DEFAULT_PRECISION,
        }
    }
}

/// Radix sorter over integer, float and string keys.
///
/// Order comes from each element's [`RadixKey`], never from
/// [`SortOptions::comparator`]: a custom comparator passed here is ignored.
/// Only [`SortOptions::descending`] and [`SortOptions::in_place`] apply.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RadixSort {
    pub variant: RadixVariant,
    pub options: RadixOptions,
}

impl RadixSort {
    pub fn lsd() -> Self {
        Self::with_variant(RadixVariant::Lsd)
    }

    pub fn msd() -> Self {
        Self::with_variant(RadixVariant::Msd)
    }

    pub fn strings() -> Self {
        Self::with_variant(RadixVariant::Strings)
    }

    pub fn floats() -> Self {
        Self::with_variant(RadixVariant::Floats)
    }

    pub fn with_variant(variant: RadixVariant) -> Self {
        Self {
            variant,
            options: RadixOptions::default(),
        }
    }

    pub fn from_config(config: &SortConfig) -> Self {
        Self {
            variant: RadixVariant::Auto,
            options: RadixOptions {
                base: config.radix_base,
                ..RadixOptions::default()
            },
        }
    }

    pub fn with_options(mut self, options: RadixOptions) -> Self {
        self.options = options;
        self
    }

    pub fn base(mut self, base: u32) -> Self {
        self.options.base = base;
        self
    }

    pub fn max_length(mut self, max_length: usize) -> Self {
        self.options.max_length = Some(max_length);
        self
    }

    pub fn precision(mut self, precision: u32) -> Self {
        self.options.precision = precision;
        self
    }
}

impl<T: Element + 'static> Sorter<T> for RadixSort {
    fn name(&self) -> &'static str {
        match self.variant {
            RadixVariant::Msd => "radixsort-msd",
            RadixVariant::Strings => "radixsort-strings",
            RadixVariant::Floats => "radixsort-floats",
            RadixVariant::Auto | RadixVariant::Lsd => "radixsort",
        }
    }

    fn sort<'a>(&self, data: &'a mut [T], options: &SortOptions<T>) -> Result<SortResult<'a, T>> {
        let radix = self.options;
        if !(2..=MAX_BASE).contains(&radix.base) {
            return Err(Error::InvalidInput(format!(
                "radix base must be within 2..={MAX_BASE}, got {}",
                radix.base
            )));
        }
        let variant = self.variant;
        let descending = options.descending;
        run_sort(data, options, |v, t| {
            let order = match resolve_variant(variant, v) {
                RadixVariant::Msd => {
                    let keys = integer_keys(v, descending)?;
                    msd_order(&keys, radix.base, t)
                }
                RadixVariant::Strings => {
                    let keys = string_keys(v)?;
                    string_order(&keys, radix.max_length, descending, t)
                }
                RadixVariant::Floats => {
                    let (keys, values) = scaled_float_keys(v, radix.precision, descending)?;
                    let mut order = lsd_order(&keys, radix.base, t);
                    settle_float_ties(&mut order, &keys, &values, descending, t);
                    order
                }
                RadixVariant::Auto | RadixVariant::Lsd => {
                    let keys = integer_keys(v, descending)?;
                    lsd_order(&keys, radix.base, t)
                }
            };
            apply_permutation(v, order, t);
            Ok(())
        })
    }
}

fn resolve_variant<T: Element>(variant: RadixVariant, v: &[T]) -> RadixVariant {
    if variant != RadixVariant::Auto {
        return variant;
    }
    match v.first().map(|e| e.radix_key()) {
        Some(RadixKey::Float(_)) => RadixVariant::Floats,
        Some(RadixKey::Str(_)) => RadixVariant::Strings,
        _ => RadixVariant::Lsd,
    }
}

fn unsupported(expected: &str, found: &RadixKey<'_>, index: usize) -> Error {
    Error::UnsupportedElementType {
        algorithm: "radixsort",
        detail: format!("expected {expected} elements, found {} at index {index}", found.kind()),
    }
}

/// Non-negative keys. Negative inputs are shifted by `-min`; descending
/// order flips every key against the maximum.
fn integer_keys<T: Element>(v: &[T], descending: bool) -> Result<Vec<u128>> {
    let mut raw = Vec::with_capacity(v.len());
    for (i, e) in v.iter().enumerate() {
        match e.radix_key() {
            RadixKey::Int(k) => raw.push(k),
            other => return Err(unsupported("integer", &other, i)),
        }
    }
    Ok(offset_keys(&raw, descending))
}

fn offset_keys(raw: &[i128], descending: bool) -> Vec<u128> {
    let min = raw.iter().copied().min().unwrap_or(0);
    let shift = if min < 0 { min } else { 0 };
    let keys: Vec<u128> = raw.iter().map(|&k| k.wrapping_sub(shift) as u128).collect();
    if !descending {
        return keys;
    }
    let max = keys.iter().copied().max().unwrap_or(0);
    keys.into_iter().map(|k| max - k).collect()
}

/// Scales by `10^precision` and rounds; integers are accepted as-is.
/// Returns the keys alongside the unscaled values.
fn scaled_float_keys<T: Element>(
    v: &[T],
    precision: u32,
    descending: bool,
) -> Result<(Vec<u128>, Vec<f64>)> {
    let mut values = Vec::with_capacity(v.len());
    for (i, e) in v.iter().enumerate() {
        match e.radix_key() {
            RadixKey::Float(x) => values.push(x),
            RadixKey::Int(k) => values.push(k as f64),
            other => return Err(unsupported("numeric", &other, i)),
        }
    }
    validate_finite(values.iter().copied())?;

    let scale = 10f64.powi(precision as i32);
    let limit = i128::MAX as f64 / 2.0;
    let mut raw = Vec::with_capacity(values.len());
    for (i, &x) in values.iter().enumerate() {
        let scaled = (x * scale).round();
        if !scaled.is_finite() || scaled.abs() >= limit {
            return Err(Error::InvalidInput(format!(
                "value at index {i} overflows at precision {precision}"
            )));
        }
        raw.push(scaled as i128);
    }
    Ok((offset_keys(&raw, descending), values))
}

/// Insertion sorts each run of equal keys in `order` by the exact values, so
/// values that round together still come out ordered. Runs of one element
/// cost nothing.
fn settle_float_ties<T>(
    order: &mut [usize],
    keys: &[u128],
    values: &[f64],
    descending: bool,
    t: &mut Tracker<'_, T>,
) {
    let mut start = 0;
    while start < order.len() {
        let key = keys[order[start]];
        let mut end = start + 1;
        while end < order.len() && keys[order[end]] == key {
            end += 1;
        }
        for i in start + 1..end {
            let mut j = i;
            while j > start {
                t.metrics.comparisons += 1;
                let (prev, curr) = (values[order[j - 1]], values[order[j]]);
                let misplaced = if descending { prev < curr } else { prev > curr };
                if !misplaced {
                    break;
                }
                order.swap(j - 1, j);
                j -= 1;
            }
        }
        start = end;
    }
}

fn string_keys<T: Element>(v: &[T]) -> Result<Vec<&[u8]>> {
    v.iter()
        .enumerate()
        .map(|(i, e)| match e.radix_key() {
            RadixKey::Str(bytes) => Ok(bytes),
            other => Err(unsupported("string", &other, i)),
        })
        .collect()
}

/// `floor(log_base(max)) + 1`, computed without floating point.
fn digit_count(max: u128, base: u128) -> u32 {
    let mut digits = 1;
    let mut rest = max / base;
    while rest > 0 {
        digits += 1;
        rest /= base;
    }
    digits
}

#[inline]
fn digit(key: u128, divisor: u128, base: u128) -> usize {
    ((key / divisor) % base) as usize
}

/// Stable counting sort of `order` by one digit, into `out`.
fn counting_pass<F>(order: &[usize], out: &mut [usize], buckets: usize, digit_of: F)
where
    F: Fn(usize) -> usize,
{
    let mut counts = vec![0usize; buckets];
    for &i in order {
        counts[digit_of(i)] += 1;
    }
    let mut sum = 0;
    for c in counts.iter_mut() {
        let n = *c;
        *c = sum;
        sum += n;
    }
    for &i in order {
        let d = digit_of(i);
        out[counts[d]] = i;
        counts[d] += 1;
    }
}

/// Least significant digit first.
fn lsd_order<T>(keys: &[u128], base: u32, t: &mut Tracker<'_, T>) -> Vec<usize> {
    let n = keys.len();
    let base = base as u128;
    let digits = digit_count(keys.iter().copied().max().unwrap_or(0), base);

    let mut order: Vec<usize> = (0..n).collect();
    let mut scratch = vec![0usize; n];
    t.allocated::<usize>(2 * n);

    let mut divisor: u128 = 1;
    for pass in 0..digits {
        counting_pass(&order, &mut scratch, base as usize, |i| {
            digit(keys[i], divisor, base)
        });
        std::mem::swap(&mut order, &mut scratch);
        t.moved(n);
        if pass + 1 < digits {
            divisor *= base;
        }
    }
    order
}

/// Most significant digit first: bucket, then recurse into each bucket.
fn msd_order<T>(keys: &[u128], base: u32, t: &mut Tracker<'_, T>) -> Vec<usize> {
    let base = base as u128;
    let digits = digit_count(keys.iter().copied().max().unwrap_or(0), base);
    let divisor = base.pow(digits - 1);
    let mut order: Vec<usize> = (0..keys.len()).collect();
    t.allocated::<usize>(2 * keys.len());
    msd_bucket(&mut order, keys, divisor, base, t);
    order
}

fn msd_bucket<T>(order: &mut [usize], keys: &[u128], divisor: u128, base: u128, t: &mut Tracker<'_, T>) {
    if order.len() < 2 {
        return;
    }
    let source = order.to_vec();
    counting_pass(&source, order, base as usize, |i| digit(keys[i], divisor, base));
    t.moved(order.len());
    if divisor == 1 {
        return;
    }

    let mut start = 0;
    while start < order.len() {
        let d = digit(keys[order[start]], divisor, base);
        let mut end = start + 1;
        while end < order.len() && digit(keys[order[end]], divisor, base) == d {
            end += 1;
        }
        msd_bucket(&mut order[start..end], keys, divisor / base, base, t);
        start = end;
    }
}

/// Byte positions from the last to the first; shorter keys read as padded
/// with zero bytes.
fn string_order<T>(
    keys: &[&[u8]],
    max_length: Option<usize>,
    descending: bool,
    t: &mut Tracker<'_, T>,
) -> Vec<usize> {
    let n = keys.len();
    let width = max_length.unwrap_or_else(|| keys.iter().map(|k| k.len()).max().unwrap_or(0));
    let symbol = |i: usize, pos: usize| {
        let b = keys[i].get(pos).copied().unwrap_or(0);
        if descending { 255 - b } else { b }
    };

    let mut order: Vec<usize> = (0..n).collect();
    let mut scratch = vec![0usize; n];
    t.allocated::<usize>(2 * n);

    for pos in (0..width).rev() {
        let mut counts = RadixCounts {
            data: [0; RADIX_BUCKETS],
        };
        let counts = &mut counts.data;
        order.iter().for_each(|&i| counts[symbol(i, pos) as usize] += 1);

        let mut sum = 0;
        counts.iter_mut().for_each(|c| {
            let n = *c;
            *c = sum;
            sum += n;
        });

        order.iter().for_each(|&i| {
            let b = symbol(i, pos) as usize;
            scratch[counts[b]] = i;
            counts[b] += 1;
        });
        std::mem::swap(&mut order, &mut scratch);
        t.moved(n);
    }
    order
}

/// Reorders `data` so that position `i` receives the element previously at
/// `indices[i]`, following permutation cycles with swaps.
fn apply_permutation<T>(data: &mut [T], mut indices: Vec<usize>, t: &mut Tracker<'_, T>) {
    for i in 0..data.len() {
        let mut current = i;
        while indices[current] != i {
            let next = indices[current];
            t.swap(data, current, next);
            indices[current] = current;
            current = next;
        }
        indices[current] = current;
    }
}
