//! Type model for target memory.
//!
//! Types are looked up by their C spelling ("struct task_struct", "pid_t",
//! "unsigned long"). A [`DataType`] carries the layout facts traversal needs:
//! kind, size, and kind-specific data such as struct fields with byte offsets.
//! The [`TypeIndex`] trait is the boundary to whatever supplies this
//! information (debug info reader, JSON dump, hand-built table).

pub mod path;
pub mod resolve;
pub mod table;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Typedef chains longer than this are treated as cyclic.
const MAX_TYPEDEF_DEPTH: usize = 32;

/// The different kinds of types in the target's type system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    /// Integer, character, and floating-point types.
    Scalar,
    /// Pointer to another type.
    Pointer,
    /// Fixed-size array of elements of a base type.
    Array,
    /// C-style struct with named fields at byte offsets.
    Struct,
    /// C-style union (all fields at offset 0).
    Union,
    /// Enumeration type.
    Enum,
    /// Type alias.
    Typedef,
}

/// A named member of a struct or union.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Member name.
    pub name: String,
    /// Spelling of the member's declared type.
    pub type_name: String,
    /// Offset from the start of the aggregate in bytes.
    pub offset: u64,
}

impl Field {
    pub fn new(name: &str, type_name: &str, offset: u64) -> Self {
        Self {
            name: name.to_string(),
            type_name: type_name.to_string(),
            offset,
        }
    }
}

/// Kind-specific layout data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeInfo {
    Scalar {
        /// Whether the scalar is interpreted as signed.
        signed: bool,
    },
    Pointer {
        /// Spelling of the pointed-to type.
        target: String,
    },
    Array {
        /// Spelling of the element type.
        element: String,
        /// Number of elements.
        count: u64,
    },
    Struct {
        /// Ordered member list.
        fields: Vec<Field>,
    },
    Union {
        /// Member list, all at offset 0.
        fields: Vec<Field>,
    },
    Enum {
        /// Spelling of the underlying integer type.
        underlying: String,
    },
    Typedef {
        /// Spelling of the aliased type.
        target: String,
    },
}

/// A type in the target's type system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataType {
    /// The spelling used to look this type up ("struct foo", "pid_t", ...).
    pub name: String,
    /// The kind of type this represents.
    pub kind: TypeKind,
    /// Size in bytes.
    pub size: u64,
    /// Kind-specific layout data.
    pub info: TypeInfo,
}

impl DataType {
    /// Create a new scalar type.
    pub fn new_scalar(name: &str, size: u64, signed: bool) -> Self {
        Self {
            name: name.to_string(),
            kind: TypeKind::Scalar,
            size,
            info: TypeInfo::Scalar { signed },
        }
    }

    /// Create a new pointer type.
    pub fn new_pointer(name: &str, size: u64, target: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: TypeKind::Pointer,
            size,
            info: TypeInfo::Pointer {
                target: target.to_string(),
            },
        }
    }

    /// Create a new array type. `element_size` is the stride of one element.
    pub fn new_array(name: &str, element: &str, element_size: u64, count: u64) -> Self {
        Self {
            name: name.to_string(),
            kind: TypeKind::Array,
            size: element_size * count,
            info: TypeInfo::Array {
                element: element.to_string(),
                count,
            },
        }
    }

    /// Create a new struct type.
    pub fn new_struct(name: &str, size: u64, fields: Vec<Field>) -> Self {
        Self {
            name: name.to_string(),
            kind: TypeKind::Struct,
            size,
            info: TypeInfo::Struct { fields },
        }
    }

    /// Create a new union type.
    pub fn new_union(name: &str, size: u64, fields: Vec<Field>) -> Self {
        Self {
            name: name.to_string(),
            kind: TypeKind::Union,
            size,
            info: TypeInfo::Union { fields },
        }
    }

    /// Create a new enum type.
    pub fn new_enum(name: &str, size: u64, underlying: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: TypeKind::Enum,
            size,
            info: TypeInfo::Enum {
                underlying: underlying.to_string(),
            },
        }
    }

    /// Create a new typedef.
    pub fn new_typedef(name: &str, size: u64, target: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: TypeKind::Typedef,
            size,
            info: TypeInfo::Typedef {
                target: target.to_string(),
            },
        }
    }

    /// Check if this type is a struct.
    pub fn is_struct(&self) -> bool {
        matches!(self.kind, TypeKind::Struct)
    }

    /// Check if this type is a struct or union.
    pub fn is_composite(&self) -> bool {
        matches!(self.kind, TypeKind::Struct | TypeKind::Union)
    }

    /// Check if this type is a typedef.
    pub fn is_typedef(&self) -> bool {
        matches!(self.kind, TypeKind::Typedef)
    }

    /// Whether a scalar read of this type should sign-extend.
    pub fn is_signed(&self) -> bool {
        matches!(self.info, TypeInfo::Scalar { signed: true })
    }

    /// Get the members if this is a struct or union.
    pub fn fields(&self) -> Option<&[Field]> {
        match &self.info {
            TypeInfo::Struct { fields } | TypeInfo::Union { fields } => Some(fields),
            _ => None,
        }
    }

    /// Look up a member by name if this is a struct or union.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields()?.iter().find(|f| f.name == name)
    }
}

/// The type-information provider boundary.
///
/// Implementations supply type layout facts by spelling. The reference
/// implementation is [`table::TypeTable`]; a debug-info-backed provider
/// plugs in the same way.
pub trait TypeIndex {
    /// Look up a type by its spelling. `None` means the name is unknown.
    fn lookup_type(&self, name: &str) -> Option<&DataType>;
}

/// Look up `name`, failing with [`Error::UnknownType`] when absent.
pub fn require_type<'a>(index: &'a dyn TypeIndex, name: &str) -> Result<&'a DataType> {
    index.lookup_type(name).ok_or_else(|| Error::UnknownType {
        name: name.to_string(),
        detail: "not present in the type index".to_string(),
    })
}

/// Dereference typedef chains until a non-typedef type is reached.
///
/// Fails with [`Error::UnknownType`] on a dangling target and treats chains
/// deeper than [`MAX_TYPEDEF_DEPTH`] as cyclic.
pub fn canonical<'a>(index: &'a dyn TypeIndex, ty: &'a DataType) -> Result<&'a DataType> {
    let mut current = ty;
    for _ in 0..MAX_TYPEDEF_DEPTH {
        match &current.info {
            TypeInfo::Typedef { target } => {
                current = require_type(index, target)?;
            }
            _ => return Ok(current),
        }
    }
    Err(Error::UnknownType {
        name: ty.name.clone(),
        detail: "typedef chain too deep (cycle?)".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::table::TypeTable;
    use super::*;

    #[test]
    fn struct_field_lookup() {
        let ty = DataType::new_struct(
            "struct point",
            8,
            vec![Field::new("x", "int", 0), Field::new("y", "int", 4)],
        );
        assert!(ty.is_struct());
        assert_eq!(ty.field("y").unwrap().offset, 4);
        assert!(ty.field("z").is_none());
    }

    #[test]
    fn canonical_follows_typedef_chains() {
        let mut table = TypeTable::new();
        table.insert(DataType::new_struct("struct task", 16, vec![]));
        table.insert(DataType::new_typedef("task_t", 16, "struct task"));
        table.insert(DataType::new_typedef("task_alias_t", 16, "task_t"));

        let alias = table.lookup_type("task_alias_t").unwrap();
        let base = canonical(&table, alias).unwrap();
        assert_eq!(base.name, "struct task");
    }

    #[test]
    fn canonical_rejects_cycles() {
        let mut table = TypeTable::new();
        table.insert(DataType::new_typedef("a_t", 4, "b_t"));
        table.insert(DataType::new_typedef("b_t", 4, "a_t"));

        let a = table.lookup_type("a_t").unwrap();
        assert!(matches!(
            canonical(&table, a),
            Err(Error::UnknownType { .. })
        ));
    }

    #[test]
    fn canonical_reports_dangling_target() {
        let mut table = TypeTable::new();
        table.insert(DataType::new_typedef("orphan_t", 4, "struct missing"));
        let ty = table.lookup_type("orphan_t").unwrap();
        let err = canonical(&table, ty).unwrap_err();
        assert!(matches!(err, Error::UnknownType { name, .. } if name == "struct missing"));
    }
}
