//! sterm-util - Core Utilities and Foundation Types
//!
//! ============================================================================
//! MODULE OVERVIEW
//! ============================================================================
//!
//! This crate provides the storage primitives every other layer of the
//! shared-term backbone is built on:
//!
//! 1. TYPED DENSE ARRAYS
//!    [`IndexVec`] and the [`Idx`] trait keep different integer handle
//!    spaces apart at compile time. Symbol handles, hash-table dense slots
//!    and similar indices never mix.
//!
//! 2. OPEN-ADDRESSING HASH TABLE
//!    [`HashTable`] maps keys to stable dense indices. It is the indexed-set
//!    abstraction the symbol table interns through.
//
// ============================================================================
// INDEXED SETS
// ============================================================================
//
// An indexed set is a hash set whose members additionally own a small,
// stable integer. The integer doubles as an index into any number of
// parallel arrays (reference counts, headers, cached data) kept by the
// owner of the set:
//
// ```
// Slot array (open addressing, size 2^m):
// ┌──────┬──────┬──────┬──────┬──────┬──────┬──────┬──────┐
// │ EMPTY│  2   │ DEL  │  0   │ EMPTY│  1   │ EMPTY│ EMPTY│
// └──────┴──────┴──────┴──────┴──────┴──────┴──────┴──────┘
//            │             │             │
//            ▼             ▼             ▼
// Dense array:  [0] "f/2"   [1] "a/0"   [2] "g/1"   [3] <erased>
// Free stack:   [3]
// ```
//
// Dense indices survive resizes; only the slot array is rebuilt. Erased
// dense indices are recycled LIFO before the dense array grows.

pub mod error;
pub mod hash_table;
pub mod index_vec;

pub use error::{ConfigError, ConfigResult};
pub use hash_table::{HashTable, HashTableConfig, TableStats};
pub use index_vec::{Idx, IndexVec};

// Re-export commonly used types
pub use indexmap::Equivalent;
pub use rustc_hash::FxHasher;
