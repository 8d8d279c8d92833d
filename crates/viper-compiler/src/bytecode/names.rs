//! Name pool: identifiers referenced by name-indexed opcodes.

use rustc_hash::FxHashMap;

/// Per-unit pool of identifiers, indexed in first-use order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamePool {
    names: Vec<String>,
    index: FxHashMap<String, u32>,
}

impl NamePool {
    /// Create a new empty name pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or get an existing name, returns its index.
    pub fn intern(&mut self, name: &str) -> u32 {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }

        let idx = self.names.len() as u32;
        self.names.push(name.to_string());
        self.index.insert(name.to_string(), idx);
        idx
    }

    /// Index of a name, if it has been interned.
    pub fn index_of(&self, name: &str) -> Option<u32> {
        self.index.get(name).copied()
    }

    /// Get a name by index.
    pub fn get(&self, index: u32) -> Option<&str> {
        self.names.get(index as usize).map(String::as_str)
    }

    /// Drop names at index `len` and above.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.names.len() {
            return;
        }
        for name in self.names.drain(len..) {
            self.index.remove(&name);
        }
    }

    /// All names in index order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
