//! HashTable - An open-addressing indexed set.
//!
//! [`HashTable`] assigns every distinct key a dense index that stays fixed
//! for as long as the key is in the table. Owners keep per-key data in
//! parallel [`IndexVec`]s addressed by that index.
//!
//! # Layout
//!
//! - The slot array has `size + 1` entries where `size` is always `2^m - 1`,
//!   so wrapping a probe is a single mask. The minimum size is 127.
//! - Each slot is `EMPTY`, `DELETED` (tombstone) or a dense index.
//! - Probing is linear with step 1. Insertion reuses the first tombstone
//!   met on the probe path.
//! - Erased dense indices go onto a free stack and are handed out again in
//!   LIFO order before the dense array grows.
//!
//! # Resizing
//!
//! After an insertion, once `live + tombstones` reaches
//! `size * max_load_percent / 100` the slot array is rebuilt. If tombstones
//! make up at least half the live entries the size stays the same and the
//! rebuild only purges tombstones; otherwise the size doubles. Dense indices
//! never change.
//!
//! # Example
//!
//! ```
//! use sterm_util::HashTable;
//!
//! let mut table: HashTable<String> = HashTable::new();
//! let (idx, is_new) = table.put("f".to_string());
//! assert!(is_new);
//! assert_eq!(table.index("f"), Some(idx));
//! assert_eq!(table.get(idx), "f");
//!
//! assert!(table.erase("f"));
//! assert_eq!(table.index("f"), None);
//! ```

use std::hash::{BuildHasher, BuildHasherDefault, Hash};

use indexmap::Equivalent;
use rustc_hash::FxHasher;
use static_assertions::const_assert;

use crate::error::{ConfigError, ConfigResult};
use crate::index_vec::{Idx, IndexVec};

/// Smallest slot-array size (`2^7 - 1`)
pub const MIN_TABLE_SIZE: usize = 127;

/// Largest slot-array size; dense indices must stay below the markers
pub const MAX_TABLE_SIZE: usize = (1 << 30) - 1;

const_assert!((MIN_TABLE_SIZE + 1).is_power_of_two());
const_assert!((MAX_TABLE_SIZE + 1).is_power_of_two());

const EMPTY: u32 = u32::MAX;
const DELETED: u32 = u32::MAX - 1;

/// Load percent bounds accepted by [`HashTableConfig::validate`]
const MIN_LOAD_PERCENT: u8 = 10;
const MAX_LOAD_PERCENT: u8 = 95;

/// Tuning parameters for a [`HashTable`]
///
/// # Examples
///
/// ```
/// use sterm_util::HashTableConfig;
///
/// let config = HashTableConfig {
///     initial_size: 1000,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// assert_eq!(config.rounded_size(), 1023);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashTableConfig {
    /// Requested slot count; rounded up to the next `2^m - 1` (at least 127)
    pub initial_size: usize,

    /// Occupancy (live entries plus tombstones) that triggers a resize,
    /// as a percentage of the table size
    pub max_load_percent: u8,
}

impl Default for HashTableConfig {
    fn default() -> Self {
        Self {
            initial_size: MIN_TABLE_SIZE,
            max_load_percent: 75,
        }
    }
}

impl HashTableConfig {
    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.initial_size > MAX_TABLE_SIZE {
            return Err(ConfigError::InvalidInitialSize(format!(
                "{} exceeds the maximum of {}",
                self.initial_size, MAX_TABLE_SIZE
            )));
        }

        if !(MIN_LOAD_PERCENT..=MAX_LOAD_PERCENT).contains(&self.max_load_percent) {
            return Err(ConfigError::InvalidLoadPercent {
                percent: self.max_load_percent,
                min: MIN_LOAD_PERCENT,
                max: MAX_LOAD_PERCENT,
            });
        }

        Ok(())
    }

    /// The slot-array size this configuration produces
    pub fn rounded_size(&self) -> usize {
        let wanted = self.initial_size.clamp(MIN_TABLE_SIZE, MAX_TABLE_SIZE);
        (wanted + 1).next_power_of_two() - 1
    }
}

/// Occupancy snapshot of a [`HashTable`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TableStats {
    /// Number of live keys
    pub live: usize,
    /// Number of `DELETED` slots awaiting a purge
    pub tombstones: usize,
    /// Slot-array size (`2^m - 1`)
    pub size: usize,
    /// Length of the dense array, including recycled holes
    pub dense_len: usize,
    /// Dense indices waiting to be reused
    pub free: usize,
    /// Number of slot-array rebuilds so far
    pub resizes: usize,
}

impl TableStats {
    /// Fraction of slots that are occupied or tombstoned
    pub fn load_factor(&self) -> f64 {
        if self.size == 0 {
            0.0
        } else {
            (self.live + self.tombstones) as f64 / self.size as f64
        }
    }
}

/// Outcome of a probe sequence
enum Probe<I> {
    /// The key lives at `slot` with dense index `index`
    Found { slot: usize, index: I },
    /// The key is absent; `slot` is where it would go, `None` if the probe
    /// wrapped without finding a free slot
    Vacant { slot: Option<usize> },
}

/// Open-addressing indexed set with tombstones and stable dense indices
///
/// # Type Parameters
///
/// - `K`: the key type
/// - `I`: the dense index type (defaults to `usize`)
#[derive(Clone)]
pub struct HashTable<K, I = usize> {
    slots: Vec<u32>,
    mask: usize,
    keys: IndexVec<I, Option<K>>,
    free_positions: Vec<I>,
    live: usize,
    tombstones: usize,
    resizes: usize,
    max_load_percent: u8,
    hasher: BuildHasherDefault<FxHasher>,
}

impl<K, I> HashTable<K, I>
where
    K: Hash + Eq,
    I: Idx,
{
    /// Create a table with the default configuration
    pub fn new() -> Self {
        Self::build(HashTableConfig::default())
    }

    /// Create a table with a validated configuration
    pub fn with_config(config: HashTableConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: HashTableConfig) -> Self {
        let size = config.rounded_size();
        Self {
            slots: vec![EMPTY; size + 1],
            mask: size,
            keys: IndexVec::new(),
            free_positions: Vec::new(),
            live: 0,
            tombstones: 0,
            resizes: 0,
            max_load_percent: config.max_load_percent,
            hasher: BuildHasherDefault::default(),
        }
    }

    /// Insert `key`, returning its dense index and whether it was new
    ///
    /// # Panics
    ///
    /// Panics if every slot is occupied, which a validated load factor
    /// rules out.
    pub fn put(&mut self, key: K) -> (I, bool) {
        match self.probe(&key) {
            Probe::Found { index, .. } => (index, false),
            Probe::Vacant { slot } => (self.insert_at(slot, key), true),
        }
    }

    /// Insert the key equivalent to `probe_key`, building the owned key only
    /// when it is absent
    ///
    /// `make` must return a key that is equivalent to `probe_key` and hashes
    /// identically.
    pub fn put_with<Q, F>(&mut self, probe_key: &Q, make: F) -> (I, bool)
    where
        Q: ?Sized + Hash + Equivalent<K>,
        F: FnOnce() -> K,
    {
        match self.probe(probe_key) {
            Probe::Found { index, .. } => (index, false),
            Probe::Vacant { slot } => (self.insert_at(slot, make()), true),
        }
    }

    /// Dense index of `key`, if present
    pub fn index<Q>(&self, key: &Q) -> Option<I>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        match self.probe(key) {
            Probe::Found { index, .. } => Some(index),
            Probe::Vacant { .. } => None,
        }
    }

    /// Returns true if `key` is present
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.index(key).is_some()
    }

    /// Remove `key`, returning whether it was present
    pub fn erase<Q>(&mut self, key: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        match self.probe(key) {
            Probe::Found { slot, index } => {
                self.release(slot, index);
                true
            }
            Probe::Vacant { .. } => false,
        }
    }

    /// Remove the key stored at dense `index`, returning it
    ///
    /// Returns `None` if `index` is out of range or already erased.
    pub fn remove_index(&mut self, index: I) -> Option<K> {
        let hash = self.hash_of(self.keys.get(index)?.as_ref()?);
        let target = Self::raw(index);

        let start = hash & self.mask;
        let mut slot = start;
        loop {
            match self.slots[slot] {
                EMPTY => break,
                raw if raw == target => return self.release(slot, index),
                _ => {}
            }
            slot = (slot + 1) & self.mask;
            if slot == start {
                break;
            }
        }

        panic!(
            "hash table dense index {} is live but unreachable from its slot",
            index.index()
        );
    }

    /// Key stored at dense `index`
    ///
    /// # Panics
    ///
    /// Panics if `index` was never handed out or has been erased.
    pub fn get(&self, index: I) -> &K {
        self.try_get(index)
            .unwrap_or_else(|| panic!("hash table index {} is not live", index.index()))
    }

    /// Key stored at dense `index`, or `None` if it is not live
    pub fn try_get(&self, index: I) -> Option<&K> {
        self.keys.get(index).and_then(Option::as_ref)
    }

    /// Iterate over live (index, key) pairs in dense order
    pub fn iter(&self) -> impl Iterator<Item = (I, &K)> {
        self.keys
            .iter_enumerated()
            .filter_map(|(index, key)| key.as_ref().map(|k| (index, k)))
    }

    /// Reset to an empty table, keeping the current size
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = EMPTY);
        self.keys.clear();
        self.free_positions.clear();
        self.live = 0;
        self.tombstones = 0;
    }

    /// Number of live keys
    pub fn len(&self) -> usize {
        self.live
    }

    /// Returns true if no key is live
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Slot-array size, always of the form `2^m - 1`
    pub fn size(&self) -> usize {
        self.mask
    }

    /// Occupancy snapshot
    pub fn stats(&self) -> TableStats {
        TableStats {
            live: self.live,
            tombstones: self.tombstones,
            size: self.mask,
            dense_len: self.keys.len(),
            free: self.free_positions.len(),
            resizes: self.resizes,
        }
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn hash_of<Q: ?Sized + Hash>(&self, key: &Q) -> usize {
        self.hasher.hash_one(key) as usize
    }

    fn raw(index: I) -> u32 {
        let raw = index.index();
        assert!(
            raw < DELETED as usize,
            "dense index {} collides with slot markers",
            raw
        );
        raw as u32
    }

    fn probe<Q>(&self, key: &Q) -> Probe<I>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        let start = self.hash_of(key) & self.mask;
        let mut slot = start;
        let mut first_deleted = None;

        loop {
            match self.slots[slot] {
                EMPTY => {
                    return Probe::Vacant {
                        slot: Some(first_deleted.unwrap_or(slot)),
                    }
                }
                DELETED => {
                    first_deleted.get_or_insert(slot);
                }
                raw => {
                    let index = I::from_usize(raw as usize);
                    if let Some(Some(stored)) = self.keys.get(index) {
                        if key.equivalent(stored) {
                            return Probe::Found { slot, index };
                        }
                    }
                }
            }

            slot = (slot + 1) & self.mask;
            if slot == start {
                return Probe::Vacant {
                    slot: first_deleted,
                };
            }
        }
    }

    fn insert_at(&mut self, slot: Option<usize>, key: K) -> I {
        let slot = slot.unwrap_or_else(|| {
            panic!(
                "hash table saturated: {} live entries in {} slots",
                self.live,
                self.mask + 1
            )
        });

        if self.slots[slot] == DELETED {
            self.tombstones -= 1;
        }

        let index = match self.free_positions.pop() {
            Some(index) => {
                self.keys[index] = Some(key);
                index
            }
            None => self.keys.push(Some(key)),
        };

        self.slots[slot] = Self::raw(index);
        self.live += 1;

        if self.over_threshold() {
            self.resize();
        }

        index
    }

    fn release(&mut self, slot: usize, index: I) -> Option<K> {
        self.slots[slot] = DELETED;
        self.live -= 1;
        self.tombstones += 1;
        self.free_positions.push(index);
        self.keys[index].take()
    }

    fn over_threshold(&self) -> bool {
        self.live + self.tombstones >= self.mask * self.max_load_percent as usize / 100
    }

    fn resize(&mut self) {
        let purge_only = self.tombstones * 2 >= self.live;
        if !purge_only {
            assert!(self.mask < MAX_TABLE_SIZE, "hash table cannot grow past {}", MAX_TABLE_SIZE);
            self.mask = (self.mask << 1) | 1;
        }

        log::debug!(
            "hash table rebuild: size={} live={} tombstones={} purge_only={}",
            self.mask,
            self.live,
            self.tombstones,
            purge_only
        );

        self.rehash();
        self.resizes += 1;

        if self.over_threshold() {
            self.mask = (self.mask << 1) | 1;
            self.rehash();
        }
    }

    fn rehash(&mut self) {
        let mask = self.mask;
        let mut slots = vec![EMPTY; mask + 1];

        for (index, key) in self.keys.iter_enumerated() {
            let Some(key) = key else { continue };
            let mut slot = self.hash_of(key) & mask;
            while slots[slot] != EMPTY {
                slot = (slot + 1) & mask;
            }
            slots[slot] = Self::raw(index);
        }

        self.slots = slots;
        self.tombstones = 0;
    }
}

impl<K, I> Default for HashTable<K, I>
where
    K: Hash + Eq,
    I: Idx,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, I> std::fmt::Debug for HashTable<K, I>
where
    K: std::fmt::Debug,
    I: Idx + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(
                self.keys
                    .iter_enumerated()
                    .filter_map(|(i, k)| k.as_ref().map(|k| (i, k))),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests;
