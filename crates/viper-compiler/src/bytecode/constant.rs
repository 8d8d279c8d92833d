//! Constant pool for compiled units.
//!
//! Each unit owns its pool. Equal literal values share one slot; code
//! objects are compared by identity and never merged.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::unit::CodeUnit;

/// Values stored in the constant pool.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    /// `None`
    None,
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// 64-bit float.
    Float(f64),
    /// String.
    Str(String),
    /// Tuple of constants (keyword-name tuples for `CALL_KW`).
    Tuple(Vec<Constant>),
    /// Compiled body of a nested function.
    Code(Arc<CodeUnit>),
}

impl Constant {
    /// Build a tuple of string constants.
    pub fn str_tuple<'a>(items: impl IntoIterator<Item = &'a str>) -> Self {
        let items = items.into_iter().map(|s| Constant::Str(s.to_string()));
        Constant::Tuple(items.collect())
    }

    /// The nested code unit, if this is a code constant.
    pub fn as_code(&self) -> Option<&Arc<CodeUnit>> {
        match self {
            Constant::Code(code) => Some(code),
            _ => None,
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::None => write!(f, "None"),
            Constant::Bool(true) => write!(f, "True"),
            Constant::Bool(false) => write!(f, "False"),
            Constant::Int(v) => write!(f, "{}", v),
            Constant::Float(v) => write!(f, "{:?}", v),
            Constant::Str(s) => write!(f, "{:?}", s),
            Constant::Tuple(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                if items.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
            Constant::Code(code) => write!(f, "<code {}>", code.name()),
        }
    }
}

/// Per-unit constant pool with deduplication.
#[derive(Debug, Clone, Default)]
pub struct ConstantPool {
    /// The actual constants.
    constants: Vec<Constant>,
    /// Deduplication index: maps constant to its index.
    index: FxHashMap<ConstantKey, u32>,
}

/// Key for constant deduplication (hashable version of Constant).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ConstantKey {
    None,
    Bool(bool),
    Int(i64),
    // Bit pattern, so -0.0 and 0.0 stay distinct
    Float(u64),
    Str(String),
    Tuple(Vec<ConstantKey>),
    // Arc address; the pool keeps the allocation alive
    Code(usize),
}

impl ConstantPool {
    /// Create a new empty constant pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or get existing constant, returns index.
    ///
    /// `True` and `1` are different constants, as are `1` and `1.0`.
    pub fn intern(&mut self, constant: Constant) -> u32 {
        let key = Self::to_key(&constant);

        if let Some(&idx) = self.index.get(&key) {
            return idx;
        }

        let idx = self.constants.len() as u32;
        self.constants.push(constant);
        self.index.insert(key, idx);
        idx
    }

    /// Get constant by index.
    pub fn get(&self, index: u32) -> Option<&Constant> {
        self.constants.get(index as usize)
    }

    /// Get all constants in index order.
    pub fn constants(&self) -> &[Constant] {
        &self.constants
    }

    /// Iterate constants in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, Constant> {
        self.constants.iter()
    }

    /// Number of constants.
    pub fn len(&self) -> usize {
        self.constants.len()
    }

    /// Check if the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
    }

    /// Drop constants at index `len` and above.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.constants.len() {
            return;
        }
        for constant in self.constants.drain(len..) {
            self.index.remove(&Self::to_key(&constant));
        }
    }

    fn to_key(constant: &Constant) -> ConstantKey {
        match constant {
            Constant::None => ConstantKey::None,
            Constant::Bool(v) => ConstantKey::Bool(*v),
            Constant::Int(v) => ConstantKey::Int(*v),
            Constant::Float(v) => ConstantKey::Float(v.to_bits()),
            Constant::Str(s) => ConstantKey::Str(s.clone()),
            Constant::Tuple(items) => ConstantKey::Tuple(items.iter().map(Self::to_key).collect()),
            Constant::Code(code) => ConstantKey::Code(Arc::as_ptr(code) as usize),
        }
    }
}

// The index holds code-object addresses, so equality looks at values only.
impl PartialEq for ConstantPool {
    fn eq(&self, other: &Self) -> bool {
        self.constants == other.constants
    }
}
