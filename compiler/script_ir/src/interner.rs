//! String interner backing [`Name`] handles.
//!
//! Interned strings are leaked into `'static` storage so lookups can hand
//! out `&'static str` without holding the lock. The interner is shared
//! immutably between the lexer, parser and compiler; interior mutability
//! goes through a `parking_lot::RwLock`.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::Name;

struct Inner {
    map: FxHashMap<&'static str, u32>,
    strings: Vec<&'static str>,
}

/// Interner mapping strings to compact [`Name`] handles.
///
/// Index 0 is always the empty string, matching [`Name::EMPTY`].
pub struct StringInterner {
    inner: RwLock<Inner>,
}

impl StringInterner {
    pub fn new() -> Self {
        let mut map = FxHashMap::default();
        map.insert("", 0);
        StringInterner {
            inner: RwLock::new(Inner {
                map,
                strings: vec![""],
            }),
        }
    }

    /// Intern a string, returning its handle.
    pub fn intern(&self, text: &str) -> Name {
        if let Some(&idx) = self.inner.read().map.get(text) {
            return Name::from_raw(idx);
        }

        let mut inner = self.inner.write();
        // Re-check: another caller may have interned between the locks.
        if let Some(&idx) = inner.map.get(text) {
            return Name::from_raw(idx);
        }

        let leaked: &'static str = Box::leak(text.to_owned().into_boxed_str());
        let idx = u32::try_from(inner.strings.len()).expect("interner overflow");
        inner.strings.push(leaked);
        inner.map.insert(leaked, idx);
        Name::from_raw(idx)
    }

    /// Look up the text of a previously interned name.
    pub fn resolve(&self, name: Name) -> &'static str {
        self.inner.read().strings[name.raw() as usize]
    }

    /// Number of interned strings (including the pre-interned empty string).
    pub fn len(&self) -> usize {
        self.inner.read().strings.len()
    }

    pub fn is_empty(&self) -> bool {
        false // index 0 is always present
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        StringInterner::new()
    }
}

#[cfg(test)]
mod tests;
