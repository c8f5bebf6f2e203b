//! Open-addressing hash table with linear probing and tombstone deletion.
//!
//! Slots:
//!   home(k)     = hash(k) mod capacity
//!   probe(k, i) = (home(k) + i) mod capacity
//!   resize      : when (len + 1) / capacity would reach 0.75, capacity doubles
//!                 and every live entry is rehashed; tombstones are dropped.
//!
//! `hash(k)` folds the key's `Display` text with a multiply-and-add rolling
//! hash kept to 32 bits.

use std::cell::Cell;
use std::fmt::{self, Display, Write};

use crate::core::Metrics;

const INITIAL_CAPACITY: usize = 16;
/// Load factor numerator/denominator: 3/4.
const LOAD_NUM: usize = 3;
const LOAD_DEN: usize = 4;

/// One occupied slot. A tombstone keeps its place in probe chains but no
/// longer counts as an entry.
#[derive(Clone, Debug)]
pub struct HashEntry<K, V> {
    pub key: K,
    pub value: V,
    pub tombstone: bool,
}

/// `fmt::Write` sink folding characters into a 32-bit hash without
/// allocating the string.
struct RollingHash(u32);

impl Write for RollingHash {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            self.0 = self.0.wrapping_mul(31).wrapping_add(c as u32);
        }
        Ok(())
    }
}

/// Rolling hash of the key's string representation.
pub fn hash_key<K: Display + ?Sized>(key: &K) -> u32 {
    let mut h = RollingHash(0);
    // Writing into RollingHash cannot fail.
    let _ = write!(h, "{key}");
    h.0
}

#[derive(Clone, Debug)]
pub struct HashTable<K, V> {
    slots: Vec<Option<HashEntry<K, V>>>,
    len: usize,
    probes: Cell<u64>,
    resizes: u64,
}

impl<K: Display + PartialEq, V> Default for HashTable<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

enum Probe {
    Found(usize),
    Vacant(usize),
}

impl<K: Display + PartialEq, V> HashTable<K, V> {
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    /// The capacity is rounded up to at least one slot.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::new();
        slots.resize_with(capacity.max(1), || None);
        Self {
            slots,
            len: 0,
            probes: Cell::new(0),
            resizes: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.slots.len() as f64
    }

    /// Inserts or updates `key`. Returns the previous value on update.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        match self.probe(&key) {
            Probe::Found(i) => self.slots[i]
                .as_mut()
                .map(|entry| std::mem::replace(&mut entry.value, value)),
            Probe::Vacant(mut i) => {
                if (self.len + 1) * LOAD_DEN >= self.slots.len() * LOAD_NUM {
                    self.resize(self.slots.len() * 2);
                    if let Probe::Vacant(slot) = self.probe(&key) {
                        i = slot;
                    }
                }
                self.slots[i] = Some(HashEntry {
                    key,
                    value,
                    tombstone: false,
                });
                self.len += 1;
                None
            }
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        match self.probe(key) {
            Probe::Found(i) => self.slots[i].as_ref().map(|e| &e.value),
            Probe::Vacant(_) => None,
        }
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        match self.probe(key) {
            Probe::Found(i) => self.slots[i].as_mut().map(|e| &mut e.value),
            Probe::Vacant(_) => None,
        }
    }

    pub fn has(&self, key: &K) -> bool {
        matches!(self.probe(key), Probe::Found(_))
    }

    /// Marks the entry as a tombstone. Returns whether the key was present.
    pub fn remove(&mut self, key: &K) -> bool {
        match self.probe(key) {
            Probe::Found(i) => {
                if let Some(entry) = self.slots[i].as_mut() {
                    entry.tombstone = true;
                }
                self.len -= 1;
                true
            }
            Probe::Vacant(_) => false,
        }
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
        self.len = 0;
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.slots
            .iter()
            .flatten()
            .filter(|e| !e.tombstone)
            .map(|e| (&e.key, &e.value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, v)| v)
    }

    /// Live entries, including their tombstone flag (always `false`).
    pub fn entries(&self) -> impl Iterator<Item = &HashEntry<K, V>> {
        self.slots.iter().flatten().filter(|e| !e.tombstone)
    }

    /// Probe counters: `comparisons` counts slots inspected, `swaps` counts
    /// entries moved by resizes.
    pub fn metrics(&self) -> Metrics {
        Metrics {
            comparisons: self.probes.get(),
            swaps: self.resizes,
            ..Metrics::default()
        }
    }

    pub fn reset_metrics(&mut self) {
        self.probes.set(0);
        self.resizes = 0;
    }

    /// Walks the probe chain of `key`. Live non-matching slots and tombstones
    /// are skipped; the walk ends at the first empty slot. A vacant result
    /// points at the first tombstone passed, or at that empty slot.
    fn probe(&self, key: &K) -> Probe {
        let cap = self.slots.len();
        let home = hash_key(key) as usize % cap;
        let mut reusable = None;
        for step in 0..cap {
            let i = (home + step) % cap;
            self.probes.set(self.probes.get() + 1);
            match &self.slots[i] {
                None => return Probe::Vacant(reusable.unwrap_or(i)),
                Some(entry) if entry.tombstone => {
                    reusable.get_or_insert(i);
                }
                Some(entry) if entry.key == *key => return Probe::Found(i),
                Some(_) => {}
            }
        }
        // Every slot is live or a tombstone; the load factor guarantees at
        // least one tombstone here.
        Probe::Vacant(reusable.unwrap_or(home))
    }

    fn resize(&mut self, capacity: usize) {
        let mut fresh = Vec::new();
        fresh.resize_with(capacity, || None);
        let old = std::mem::replace(&mut self.slots, fresh);
        for entry in old.into_iter().flatten().filter(|e| !e.tombstone) {
            let cap = self.slots.len();
            let mut i = hash_key(&entry.key) as usize % cap;
            while self.slots[i].is_some() {
                i = (i + 1) % cap;
            }
            self.slots[i] = Some(entry);
            self.resizes += 1;
        }
    }
}

/// Key/value map over [`HashTable`].
#[derive(Clone, Debug)]
pub struct HashMap<K, V> {
    table: HashTable<K, V>,
}

impl<K: Display + PartialEq, V> Default for HashMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Display + PartialEq, V> HashMap<K, V> {
    pub fn new() -> Self {
        Self {
            table: HashTable::new(),
        }
    }

    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        self.table.put(key, value)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.table.get(key)
    }

    pub fn has(&self, key: &K) -> bool {
        self.table.has(key)
    }

    pub fn delete(&mut self, key: &K) -> bool {
        self.table.remove(key)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn clear(&mut self) {
        self.table.clear()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.table.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.table.values()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&K, &V)> {
        self.table.iter()
    }

    pub fn metrics(&self) -> Metrics {
        self.table.metrics()
    }
}

/// Set over [`HashTable`] with set algebra.
#[derive(Clone, Debug)]
pub struct HashSet<T> {
    table: HashTable<T, ()>,
}

impl<T: Display + PartialEq> Default for HashSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Display + PartialEq> FromIterator<T> for HashSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        iter.into_iter().for_each(|v| {
            set.add(v);
        });
        set
    }
}

impl<T: Display + PartialEq> HashSet<T> {
    pub fn new() -> Self {
        Self {
            table: HashTable::new(),
        }
    }

    /// Returns `true` when the value was not yet present.
    pub fn add(&mut self, value: T) -> bool {
        self.table.put(value, ()).is_none()
    }

    pub fn has(&self, value: &T) -> bool {
        self.table.has(value)
    }

    pub fn delete(&mut self, value: &T) -> bool {
        self.table.remove(value)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn clear(&mut self) {
        self.table.clear()
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.table.keys()
    }

    pub fn is_subset(&self, other: &HashSet<T>) -> bool {
        self.values().all(|v| other.has(v))
    }
}

impl<T: Display + PartialEq + Clone> HashSet<T> {
    pub fn union(&self, other: &HashSet<T>) -> HashSet<T> {
        self.values().chain(other.values()).cloned().collect()
    }

    pub fn intersection(&self, other: &HashSet<T>) -> HashSet<T> {
        self.values().filter(|v| other.has(v)).cloned().collect()
    }

    pub fn difference(&self, other: &HashSet<T>) -> HashSet<T> {
        self.values().filter(|v| !other.has(v)).cloned().collect()
    }
}
