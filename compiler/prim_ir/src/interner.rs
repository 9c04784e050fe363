//! String interner for identifiers and text literals.
//!
//! Interned strings are leaked into `'static` storage; the interner lives
//! for the whole compilation, so the leak is bounded by the source text.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::Name;

struct InternTable {
    /// Map from string content to index in `strings`.
    map: FxHashMap<&'static str, u32>,
    strings: Vec<&'static str>,
}

/// Interner mapping strings to compact [`Name`] ids.
///
/// Guarded by a `RwLock` so a shared reference can intern; the front end is
/// single-threaded but the lexer, parser and both passes all hold `&self`.
pub struct StringInterner {
    table: RwLock<InternTable>,
}

impl StringInterner {
    /// Create a new interner with the empty string pre-interned at index 0.
    pub fn new() -> Self {
        let mut table = InternTable {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(64),
        };
        table.map.insert("", 0);
        table.strings.push("");
        StringInterner {
            table: RwLock::new(table),
        }
    }

    /// Intern a string, returning its `Name`.
    ///
    /// Interning the same content twice returns the same id.
    pub fn intern(&self, text: &str) -> Name {
        {
            let table = self.table.read();
            if let Some(&idx) = table.map.get(text) {
                return Name::from_raw(idx);
            }
        }
        let mut table = self.table.write();
        // Re-check under the write lock; another caller may have raced us.
        if let Some(&idx) = table.map.get(text) {
            return Name::from_raw(idx);
        }
        let owned: &'static str = Box::leak(Box::from(text));
        let idx = u32::try_from(table.strings.len()).unwrap_or(u32::MAX);
        table.strings.push(owned);
        table.map.insert(owned, idx);
        Name::from_raw(idx)
    }

    /// Resolve a `Name` back to its text.
    ///
    /// Returns the empty string for a name this interner never produced.
    pub fn lookup(&self, name: Name) -> &'static str {
        let table = self.table.read();
        table.strings.get(name.index()).copied().unwrap_or("")
    }

    /// Number of interned strings (including the pre-interned empty string).
    pub fn len(&self) -> usize {
        self.table.read().strings.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}
