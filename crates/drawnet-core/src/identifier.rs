//! Diagram cell identifiers and arena indices.
//!
//! Cell identifiers come straight from the diagram document (`<mxCell id="...">`)
//! and are compared and hashed constantly during reference resolution, so they are
//! stored interned: a [`CellId`] is a small `Copy` symbol into a global interner.
//!
//! [`ElementIndex`] is the position of a classified element inside the diagram
//! arena. Resolved references are expressed as indices, never as shared pointers.

use std::{
    fmt,
    sync::{Mutex, MutexGuard, OnceLock},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for cell identifiers.
///
/// # Thread Safety
///
/// Access goes through a `Mutex`, so independent conversions may run on
/// different threads.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Identifier of a diagram cell, unique within one document.
///
/// # Examples
///
/// ```
/// use drawnet_core::identifier::CellId;
///
/// let a = CellId::new("router-1");
/// let b = CellId::new("router-1");
/// assert_eq!(a, b);
/// assert_eq!(a, "router-1");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellId(DefaultSymbol);

impl CellId {
    /// Interns `name` and returns its identifier.
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }

    /// Returns the identifier text.
    pub fn as_string(&self) -> String {
        interner()
            .resolve(self.0)
            .map(str::to_owned)
            .unwrap_or_default()
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

impl From<&str> for CellId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for CellId {
    fn eq(&self, other: &str) -> bool {
        interner().resolve(self.0) == Some(other)
    }
}

impl PartialEq<&str> for CellId {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

/// Position of a classified element in the diagram arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementIndex(usize);

impl ElementIndex {
    /// Wraps a raw arena position.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw arena position.
    pub fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for ElementIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_new_interns() {
        let id1 = CellId::new("cell-a");
        let id2 = CellId::new("cell-a");
        let id3 = CellId::new("cell-b");

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
        assert_eq!(id1, "cell-a");
    }

    #[test]
    fn test_display() {
        let id = CellId::new("Xy7-12");
        assert_eq!(id.to_string(), "Xy7-12");
    }

    #[test]
    fn test_from_str_slice() {
        let id: CellId = "edge-3".into();
        assert_eq!(id, CellId::new("edge-3"));
    }

    #[test]
    fn test_hash_lookup() {
        let mut map = HashMap::new();
        map.insert(CellId::new("k1"), 1);
        map.insert(CellId::new("k2"), 2);

        assert_eq!(map.get(&CellId::new("k1")), Some(&1));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_element_index_roundtrip() {
        let idx = ElementIndex::new(7);
        assert_eq!(idx.get(), 7);
        assert_eq!(idx.to_string(), "#7");
        assert!(ElementIndex::new(1) < ElementIndex::new(2));
    }
}
