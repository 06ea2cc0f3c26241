//! The [`AFun`] handle type.

use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::interner::{SymHeader, SymIdx, SymKey, SymbolStore, SymbolTable};

/// Reference-counted handle to an interned function symbol
///
/// A handle is either *defined*, owning one reference to a table entry, or
/// the *undefined* sentinel, which owns nothing. Cloning a defined handle
/// takes another reference; dropping it gives one back, and the last drop
/// frees the entry.
///
/// Two handles are equal when they refer to the same entry of the same table.
pub struct AFun {
    handle: Option<Handle>,
}

struct Handle {
    store: Rc<RefCell<SymbolStore>>,
    index: SymIdx,
}

impl AFun {
    /// The undefined sentinel handle
    #[inline]
    pub const fn undefined() -> Self {
        AFun { handle: None }
    }

    /// Wrap an index whose reference has already been taken
    pub(crate) fn adopt(store: Rc<RefCell<SymbolStore>>, index: SymIdx) -> Self {
        AFun {
            handle: Some(Handle { store, index }),
        }
    }

    /// Returns true for the undefined sentinel
    #[inline]
    pub fn is_undefined(&self) -> bool {
        self.handle.is_none()
    }

    /// Dense index of the entry, `None` for the sentinel
    #[inline]
    pub fn index(&self) -> Option<SymIdx> {
        self.handle.as_ref().map(|h| h.index)
    }

    /// The symbol's name
    ///
    /// # Panics
    ///
    /// Panics on the undefined sentinel.
    pub fn name(&self) -> Rc<str> {
        self.with_key(|key| Rc::clone(&key.name))
    }

    /// Number of arguments
    ///
    /// # Panics
    ///
    /// Panics on the undefined sentinel.
    pub fn arity(&self) -> u32 {
        self.header().arity()
    }

    /// Whether the symbol is written in quotes
    ///
    /// # Panics
    ///
    /// Panics on the undefined sentinel.
    pub fn is_quoted(&self) -> bool {
        self.header().is_quoted()
    }

    /// The packed header word
    ///
    /// # Panics
    ///
    /// Panics on the undefined sentinel.
    pub fn header(&self) -> SymHeader {
        self.with_key(|key| key.header)
    }

    /// Current reference count of the entry; 0 for the sentinel
    pub fn reference_count(&self) -> u32 {
        match &self.handle {
            Some(h) => h.store.borrow().refcount(h.index),
            None => 0,
        }
    }

    /// The table this handle belongs to, `None` for the sentinel
    pub fn table(&self) -> Option<SymbolTable> {
        self.handle
            .as_ref()
            .map(|h| SymbolTable::from_store(Rc::clone(&h.store)))
    }

    /// Returns true if this handle was issued by `table`
    pub fn belongs_to(&self, table: &SymbolTable) -> bool {
        self.handle
            .as_ref()
            .map_or(false, |h| table.ptr_eq(&h.store))
    }

    fn with_key<R>(&self, f: impl FnOnce(&SymKey) -> R) -> R {
        let handle = self
            .handle
            .as_ref()
            .unwrap_or_else(|| panic!("use of the undefined function symbol"));
        let store = handle.store.borrow();
        f(store.key(handle.index))
    }
}

impl Clone for AFun {
    fn clone(&self) -> Self {
        match &self.handle {
            Some(h) => {
                h.store.borrow_mut().retain(h.index);
                AFun::adopt(Rc::clone(&h.store), h.index)
            }
            None => AFun::undefined(),
        }
    }
}

impl Drop for AFun {
    fn drop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };

        match handle.store.try_borrow_mut() {
            Ok(mut store) => store.release(handle.index),
            // Only reachable while unwinding out of a store borrow.
            Err(_) => log::warn!("symbol {} leaked: table busy during drop", handle.index.0),
        };
    }
}

impl Default for AFun {
    fn default() -> Self {
        AFun::undefined()
    }
}

impl PartialEq for AFun {
    fn eq(&self, other: &Self) -> bool {
        match (&self.handle, &other.handle) {
            (Some(a), Some(b)) => a.index == b.index && Rc::ptr_eq(&a.store, &b.store),
            (None, None) => true,
            _ => false,
        }
    }
}

impl Eq for AFun {}

impl Hash for AFun {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match &self.handle {
            Some(h) => {
                Rc::as_ptr(&h.store).hash(state);
                h.index.hash(state);
            }
            None => 0u8.hash(state),
        }
    }
}

impl fmt::Debug for AFun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_undefined() {
            return write!(f, "AFun(<undefined>)");
        }
        let (name, header) = self.with_key(|key| (Rc::clone(&key.name), key.header));
        if header.is_quoted() {
            write!(f, "AFun({:?}/{})", &*name, header.arity())
        } else {
            write!(f, "AFun({}/{})", name, header.arity())
        }
    }
}

impl fmt::Display for AFun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_undefined() {
            return write!(f, "<undefined>");
        }
        let (name, header) = self.with_key(|key| (Rc::clone(&key.name), key.header));
        write!(f, "{}/{}", name, header.arity())
    }
}
