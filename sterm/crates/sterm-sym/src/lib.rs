//! sterm-sym - Function symbol interning with reference-counted reclamation.
//!
//! Every function symbol of the term backbone is a `(name, arity, quoted)`
//! triple. The [`SymbolTable`] interns each distinct triple exactly once and
//! hands out [`AFun`] handles to it.
//!
//! # Ownership model
//!
//! An [`AFun`] owns one reference to its table entry:
//!
//! - cloning a handle increments the entry's reference count
//! - dropping a handle decrements it
//! - the entry is freed synchronously when the count reaches zero, and its
//!   slot becomes available to the next `intern`
//!
//! ```text
//! Free ──intern──▶ Allocated(1) ──clone──▶ Allocated(k) ──drop──▶ ... ──drop──▶ Free
//! ```
//!
//! Because the count is tied to the handle's lifetime, double frees and
//! reads through freed handles cannot be expressed in safe code.
//!
//! # Thread Safety
//!
//! The table is single-threaded: [`SymbolTable`] and [`AFun`] share their
//! store through `Rc<RefCell<_>>` and are therefore neither `Send` nor `Sync`.
//!
//! # Examples
//!
//! ```
//! use sterm_sym::SymbolTable;
//!
//! let symbols = SymbolTable::new();
//! let f = symbols.intern("f", 2, false);
//! let g = symbols.intern("f", 2, false);
//!
//! assert_eq!(f, g);
//! assert_eq!(f.reference_count(), 2);
//! assert_eq!(&*f.name(), "f");
//! assert_eq!(f.arity(), 2);
//! ```

mod afun;
mod interner;
mod stats;

pub use afun::AFun;
pub use interner::{SymHeader, SymIdx, SymbolTable, MAX_ARITY};
pub use stats::SymbolStats;
