//! Symbol store and the shared [`SymbolTable`] handle.

use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use sterm_util::{define_idx, ConfigResult, Equivalent, HashTable, HashTableConfig, IndexVec};

use crate::afun::AFun;
use crate::stats::SymbolStats;

define_idx!(
    /// Dense index of an interned function symbol
    SymIdx
);

/// Largest arity that fits the packed header word
pub const MAX_ARITY: u32 = u32::MAX >> 1;

/// Packed `arity << 1 | quoted` header word
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymHeader(u32);

impl SymHeader {
    /// Pack an arity and quoted flag
    ///
    /// # Panics
    ///
    /// Panics if `arity` exceeds [`MAX_ARITY`].
    pub fn new(arity: u32, quoted: bool) -> Self {
        assert!(arity <= MAX_ARITY, "arity {} exceeds {}", arity, MAX_ARITY);
        SymHeader((arity << 1) | quoted as u32)
    }

    /// Number of arguments
    #[inline]
    pub fn arity(self) -> u32 {
        self.0 >> 1
    }

    /// Whether the symbol is written in quotes
    #[inline]
    pub fn is_quoted(self) -> bool {
        self.0 & 1 == 1
    }

    /// The raw header word
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for SymHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymHeader")
            .field("arity", &self.arity())
            .field("quoted", &self.is_quoted())
            .finish()
    }
}

/// Owned key stored in the hash table
///
/// Field order matters: [`SymLookup`] must hash identically.
#[derive(PartialEq, Eq, Hash)]
pub(crate) struct SymKey {
    pub(crate) header: SymHeader,
    pub(crate) name: Rc<str>,
}

/// Borrowed probe key; avoids allocating a name on interning hits
#[derive(Hash)]
struct SymLookup<'a> {
    header: SymHeader,
    name: &'a str,
}

impl Equivalent<SymKey> for SymLookup<'_> {
    fn equivalent(&self, key: &SymKey) -> bool {
        self.header == key.header && self.name == &*key.name
    }
}

// ============================================================================
// SYMBOL STORE
// ============================================================================

/// Backing storage shared by a [`SymbolTable`] and all its handles
///
/// The hash table's dense array owns the keys; `refcounts` is parallel to it.
pub(crate) struct SymbolStore {
    table: HashTable<SymKey, SymIdx>,
    refcounts: IndexVec<SymIdx, u32>,
    hits: usize,
    misses: usize,
    frees: usize,
}

impl SymbolStore {
    fn new(table: HashTable<SymKey, SymIdx>) -> Self {
        Self {
            table,
            refcounts: IndexVec::new(),
            hits: 0,
            misses: 0,
            frees: 0,
        }
    }

    /// Find or create the entry and take one reference to it
    fn intern(&mut self, name: &str, header: SymHeader) -> SymIdx {
        let lookup = SymLookup { header, name };
        let (index, is_new) = self.table.put_with(&lookup, || SymKey {
            header,
            name: Rc::from(name),
        });

        self.refcounts.ensure_contains(index, || 0);
        if is_new {
            debug_assert_eq!(self.refcounts[index], 0, "fresh symbol slot still referenced");
            self.refcounts[index] = 1;
            self.misses += 1;
            log::trace!("interned symbol {}/{} at {}", name, header.arity(), index.0);
        } else {
            self.refcounts[index] += 1;
            self.hits += 1;
        }

        index
    }

    /// Take a reference to an existing entry without creating one
    fn lookup(&mut self, name: &str, header: SymHeader) -> Option<SymIdx> {
        let index = self.table.index(&SymLookup { header, name })?;
        self.retain(index);
        self.hits += 1;
        Some(index)
    }

    pub(crate) fn retain(&mut self, index: SymIdx) {
        let count = &mut self.refcounts[index];
        assert!(*count > 0, "retain of freed symbol {}", index.0);
        *count += 1;
    }

    pub(crate) fn release(&mut self, index: SymIdx) {
        let count = &mut self.refcounts[index];
        assert!(*count > 0, "release of freed symbol {}", index.0);
        *count -= 1;

        if *count == 0 {
            let key = self.table.remove_index(index);
            self.frees += 1;
            if let Some(key) = key {
                log::trace!("freed symbol {}/{} at {}", key.name, key.header.arity(), index.0);
            }
        }
    }

    pub(crate) fn is_live(&self, index: SymIdx) -> bool {
        self.refcounts.get(index).map_or(false, |&count| count > 0)
    }

    pub(crate) fn refcount(&self, index: SymIdx) -> u32 {
        self.refcounts.get(index).copied().unwrap_or(0)
    }

    pub(crate) fn key(&self, index: SymIdx) -> &SymKey {
        assert!(self.is_live(index), "use of freed symbol {}", index.0);
        self.table.get(index)
    }

    fn stats(&self) -> SymbolStats {
        SymbolStats {
            count: self.table.len(),
            table_size: self.table.size(),
            hits: self.hits,
            misses: self.misses,
            frees: self.frees,
        }
    }
}

// ============================================================================
// SYMBOL TABLE
// ============================================================================

/// Interning table for function symbols
///
/// Cloning a `SymbolTable` yields another handle onto the same store. The
/// store lives until the last table handle and the last [`AFun`] are gone.
///
/// # Examples
///
/// ```
/// use sterm_sym::SymbolTable;
///
/// let symbols = SymbolTable::new();
/// let f = symbols.intern("f", 2, false);
/// let index = f.index().unwrap();
///
/// drop(f);
/// assert!(!symbols.is_valid(index));
///
/// // The freed slot is handed out again.
/// let f = symbols.intern("f", 2, false);
/// assert_eq!(f.index(), Some(index));
/// ```
#[derive(Clone)]
pub struct SymbolTable {
    store: Rc<RefCell<SymbolStore>>,
}

impl SymbolTable {
    /// Create a table with the default hash-table configuration
    pub fn new() -> Self {
        Self::from_table(HashTable::new())
    }

    /// Create a table with a validated hash-table configuration
    pub fn with_config(config: HashTableConfig) -> ConfigResult<Self> {
        Ok(Self::from_table(HashTable::with_config(config)?))
    }

    fn from_table(table: HashTable<SymKey, SymIdx>) -> Self {
        Self {
            store: Rc::new(RefCell::new(SymbolStore::new(table))),
        }
    }

    pub(crate) fn from_store(store: Rc<RefCell<SymbolStore>>) -> Self {
        Self { store }
    }

    /// Intern `(name, arity, quoted)`, returning a handle that owns one
    /// reference to the entry
    ///
    /// # Panics
    ///
    /// Panics if `arity` exceeds [`MAX_ARITY`].
    pub fn intern(&self, name: &str, arity: u32, quoted: bool) -> AFun {
        let header = SymHeader::new(arity, quoted);
        let index = self.store.borrow_mut().intern(name, header);
        AFun::adopt(Rc::clone(&self.store), index)
    }

    /// Handle to an already-interned symbol, without creating it
    pub fn lookup(&self, name: &str, arity: u32, quoted: bool) -> Option<AFun> {
        let header = SymHeader::new(arity, quoted);
        let index = self.store.borrow_mut().lookup(name, header)?;
        Some(AFun::adopt(Rc::clone(&self.store), index))
    }

    /// Returns true if `index` names a live entry of this table
    pub fn is_valid(&self, index: SymIdx) -> bool {
        self.store.borrow().is_live(index)
    }

    /// Number of live symbols
    pub fn len(&self) -> usize {
        self.store.borrow().table.len()
    }

    /// Returns true if no symbol is live
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Interning statistics
    pub fn stats(&self) -> SymbolStats {
        self.store.borrow().stats()
    }

    /// Names, arities and quoted flags of all live symbols, in index order
    pub fn snapshot(&self) -> Vec<(SymIdx, String, u32, bool)> {
        let store = self.store.borrow();
        store
            .table
            .iter()
            .map(|(index, key)| {
                (
                    index,
                    key.name.to_string(),
                    key.header.arity(),
                    key.header.is_quoted(),
                )
            })
            .collect()
    }

    pub(crate) fn ptr_eq(&self, other: &Rc<RefCell<SymbolStore>>) -> bool {
        Rc::ptr_eq(&self.store, other)
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for SymbolTable {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.store, &other.store)
    }
}

impl Eq for SymbolTable {}

impl Hash for SymbolTable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Rc::as_ptr(&self.store).hash(state);
    }
}

impl fmt::Debug for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.stats();
        f.debug_struct("SymbolTable")
            .field("count", &stats.count)
            .field("table_size", &stats.table_size)
            .finish()
    }
}
