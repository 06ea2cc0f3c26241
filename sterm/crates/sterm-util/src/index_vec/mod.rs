//! IndexVec - A dense array addressed by a typed handle.
//!
//! Symbol handles, hash-table dense slots and reference-count arrays all
//! live in parallel `Vec`s addressed by the same small integer. [`IndexVec`]
//! pins each of those arrays to one handle type so a symbol index can never
//! be used to address an unrelated array.
//!
//! # Example
//!
//! ```
//! use sterm_util::define_idx;
//! use sterm_util::index_vec::IndexVec;
//!
//! define_idx!(NodeId);
//!
//! let mut refcounts: IndexVec<NodeId, u32> = IndexVec::new();
//! let id = refcounts.push(1);
//! refcounts[id] += 1;
//! assert_eq!(refcounts[id], 2);
//! ```

use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// Trait for types that can be used as indices
///
/// # Requirements
///
/// - `from_usize(i).index() == i` for every `i` the type can represent
/// - `from_usize` panics when `i` does not fit
pub trait Idx: Copy + Eq + PartialEq {
    /// Convert from usize to index type
    ///
    /// # Panics
    ///
    /// Implementations panic if `idx` is too large to fit.
    fn from_usize(idx: usize) -> Self;

    /// Convert index to usize for array indexing
    fn index(self) -> usize;
}

impl Idx for usize {
    #[inline]
    fn from_usize(idx: usize) -> Self {
        idx
    }

    #[inline]
    fn index(self) -> usize {
        self
    }
}

impl Idx for u32 {
    #[inline]
    fn from_usize(idx: usize) -> Self {
        assert!(idx <= u32::MAX as usize, "Index {} exceeds u32::MAX", idx);
        idx as u32
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// A vector indexed by a specific type
///
/// `IndexVec` has the same layout as `Vec<T>`; the index type `I` only
/// exists at compile time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexVec<I, T> {
    raw: Vec<T>,
    _marker: PhantomData<fn(&I)>,
}

impl<I, T> IndexVec<I, T> {
    /// Create an empty IndexVec
    #[inline]
    pub fn new() -> Self {
        Self {
            raw: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Create an IndexVec with the specified capacity
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            raw: Vec::with_capacity(capacity),
            _marker: PhantomData,
        }
    }

    /// Returns the number of elements in the vector
    #[inline]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns true if the vector contains no elements
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Clear all elements from the vector, keeping the allocated capacity
    #[inline]
    pub fn clear(&mut self) {
        self.raw.clear()
    }

    /// Get a slice view of the underlying data
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.raw
    }
}

impl<I: Idx, T> IndexVec<I, T> {
    /// The index the next `push` will return
    #[inline]
    pub fn next_index(&self) -> I {
        I::from_usize(self.raw.len())
    }

    /// Push an element and return its typed index
    #[inline]
    pub fn push(&mut self, value: T) -> I {
        let index = self.raw.len();
        self.raw.push(value);
        I::from_usize(index)
    }

    /// Get a reference to the element at the given index
    ///
    /// Returns `None` if the index is out of bounds.
    #[inline]
    pub fn get(&self, index: I) -> Option<&T> {
        self.raw.get(index.index())
    }

    /// Get a mutable reference to the element at the given index
    ///
    /// Returns `None` if the index is out of bounds.
    #[inline]
    pub fn get_mut(&mut self, index: I) -> Option<&mut T> {
        self.raw.get_mut(index.index())
    }

    /// Iterate over (index, value) pairs
    #[inline]
    pub fn iter_enumerated(&self) -> impl Iterator<Item = (I, &T)> {
        self.raw
            .iter()
            .enumerate()
            .map(|(i, v)| (I::from_usize(i), v))
    }

    /// Grow the vector so that `index` is in bounds, filling with `f`
    #[inline]
    pub fn ensure_contains<F>(&mut self, index: I, f: F)
    where
        F: FnMut() -> T,
    {
        let min_len = index.index() + 1;
        if self.raw.len() < min_len {
            self.raw.resize_with(min_len, f);
        }
    }
}

impl<I: Idx, T> Index<I> for IndexVec<I, T> {
    type Output = T;

    #[inline]
    fn index(&self, index: I) -> &T {
        &self.raw[index.index()]
    }
}

impl<I: Idx, T> IndexMut<I> for IndexVec<I, T> {
    #[inline]
    fn index_mut(&mut self, index: I) -> &mut T {
        &mut self.raw[index.index()]
    }
}

impl<I, T> Default for IndexVec<I, T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// Macro to define index types easily
///
/// Generates a `u32` newtype implementing [`Idx`], along with the derives
/// needed to use it as a map key or print it in diagnostics.
///
/// # Examples
///
/// ```
/// use sterm_util::define_idx;
/// use sterm_util::index_vec::IndexVec;
///
/// define_idx!(SlotId);
///
/// let mut vec: IndexVec<SlotId, i32> = IndexVec::new();
/// let idx = vec.push(42);
/// assert_eq!(vec[idx], 42);
/// ```
#[macro_export]
macro_rules! define_idx {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub u32);

        impl $crate::index_vec::Idx for $name {
            fn from_usize(idx: usize) -> Self {
                assert!(idx <= u32::MAX as usize, "Index {} exceeds u32::MAX", idx);
                $name(idx as u32)
            }

            fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}
