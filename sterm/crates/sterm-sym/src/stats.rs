//! Interning statistics.

/// Statistics about a symbol table for profiling
///
/// # Fields
///
/// * `count` - Number of live symbols
/// * `table_size` - Slot-array size of the underlying hash table
/// * `hits` - Number of times an already-interned symbol was requested
/// * `misses` - Number of times a new entry was allocated
/// * `frees` - Number of entries reclaimed on a zero reference count
///
/// # Examples
///
/// ```
/// use sterm_sym::SymbolStats;
///
/// let stats = SymbolStats {
///     count: 10,
///     table_size: 127,
///     hits: 90,
///     misses: 10,
///     frees: 0,
/// };
/// assert_eq!(stats.hit_rate(), 0.9);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SymbolStats {
    /// Number of live symbols
    pub count: usize,
    /// Slot-array size of the underlying hash table
    pub table_size: usize,
    /// Number of interning hits (entry already present)
    pub hits: usize,
    /// Number of interning misses (new entry allocated)
    pub misses: usize,
    /// Number of entries freed
    pub frees: usize,
}

impl SymbolStats {
    /// Calculate the load factor (count / table_size)
    ///
    /// Returns 0.0 if the table size is 0.
    pub fn load_factor(&self) -> f64 {
        if self.table_size == 0 {
            0.0
        } else {
            self.count as f64 / self.table_size as f64
        }
    }

    /// Calculate the hit rate (hits / (hits + misses))
    ///
    /// Returns 0.0 if no lookups have been performed.
    pub fn hit_rate(&self) -> f64 {
        let total = self.total_operations();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Get total number of interning operations
    pub fn total_operations(&self) -> usize {
        self.hits + self.misses
    }
}
