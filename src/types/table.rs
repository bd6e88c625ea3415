//! In-memory type table.
//!
//! [`TypeTable`] is the reference [`TypeIndex`] implementation: a flat map
//! from type spelling to [`DataType`], seeded with the common C scalar types
//! and loadable from a JSON dump of type descriptions.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;

use crate::error::{Error, Result};
use crate::types::{DataType, TypeIndex};

/// Scalar types present in every table (LP64 sizes).
static BUILTIN_SCALARS: Lazy<Vec<DataType>> = Lazy::new(|| {
    vec![
        DataType::new_scalar("char", 1, true),
        DataType::new_scalar("unsigned char", 1, false),
        DataType::new_scalar("short", 2, true),
        DataType::new_scalar("unsigned short", 2, false),
        DataType::new_scalar("int", 4, true),
        DataType::new_scalar("unsigned int", 4, false),
        DataType::new_scalar("long", 8, true),
        DataType::new_scalar("unsigned long", 8, false),
        DataType::new_scalar("long long", 8, true),
        DataType::new_scalar("unsigned long long", 8, false),
    ]
});

/// A flat, name-keyed collection of target types.
#[derive(Debug, Default)]
pub struct TypeTable {
    types: HashMap<String, DataType>,
}

impl TypeTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            types: HashMap::new(),
        }
    }

    /// Create a table pre-populated with the builtin C scalar types.
    pub fn with_builtins() -> Self {
        let mut table = Self::new();
        for ty in BUILTIN_SCALARS.iter() {
            table.insert(ty.clone());
        }
        table
    }

    /// Insert a type, replacing any previous entry with the same spelling.
    pub fn insert(&mut self, ty: DataType) {
        self.types.insert(ty.name.clone(), ty);
    }

    /// Number of types in the table.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Parse a table from a JSON array of type descriptions.
    ///
    /// Builtin scalars are seeded first, so a dump only needs the types the
    /// target program defines.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let types: Vec<DataType> =
            serde_json::from_str(json).map_err(|e| Error::TypeTable(e.to_string()))?;
        let mut table = Self::with_builtins();
        for ty in types {
            table.insert(ty);
        }
        Ok(table)
    }

    /// Load a table from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Serialize the table to a JSON array (sorted by spelling, so dumps are
    /// stable across runs).
    pub fn to_json_string(&self) -> Result<String> {
        let mut types: Vec<&DataType> = self.types.values().collect();
        types.sort_by(|a, b| a.name.cmp(&b.name));
        serde_json::to_string_pretty(&types).map_err(|e| Error::TypeTable(e.to_string()))
    }
}

impl TypeIndex for TypeTable {
    fn lookup_type(&self, name: &str) -> Option<&DataType> {
        self.types.get(name)
    }
}
