//! Field paths and layout resolution.
//!
//! A field path locates a possibly-nested member inside an aggregate:
//! `"link"`, `"params.node"`, `"pid_links[3]"`. Each member segment is looked
//! up on the type produced by the previous segment (typedefs dereferenced
//! transparently), and byte offsets accumulate additively, so the result is a
//! single offset from the start of the record plus the located member's
//! declared type.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::types::{canonical, require_type, DataType, TypeIndex, TypeInfo};

/// One selector in a field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Struct or union member access by name.
    Member(String),
    /// Array element access by index.
    Index(u64),
}

/// A parsed field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    raw: String,
    segments: Vec<Segment>,
}

impl FieldPath {
    /// Parse a path from its dotted/indexed string form.
    pub fn parse(path: &str) -> Result<Self> {
        let syntax = |reason: &str| Error::PathSyntax {
            path: path.to_string(),
            reason: reason.to_string(),
        };

        if path.is_empty() {
            return Err(syntax("empty path"));
        }

        let mut segments = Vec::new();
        for part in path.split('.') {
            // Each dotted part is an identifier with optional [n] suffixes.
            let (ident, mut rest) = match part.find('[') {
                Some(pos) => part.split_at(pos),
                None => (part, ""),
            };
            if ident.is_empty() {
                return Err(syntax("expected a member name"));
            }
            if !ident
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
            {
                return Err(syntax(&format!("invalid member name '{ident}'")));
            }
            segments.push(Segment::Member(ident.to_string()));

            while !rest.is_empty() {
                let close = rest.find(']').ok_or_else(|| syntax("unterminated index"))?;
                let digits = &rest[1..close];
                let index: u64 = digits
                    .parse()
                    .map_err(|_| syntax(&format!("invalid index '{digits}'")))?;
                segments.push(Segment::Index(index));
                rest = &rest[close + 1..];
                if !rest.is_empty() && !rest.starts_with('[') {
                    return Err(syntax("trailing characters after index"));
                }
            }
        }

        Ok(Self {
            raw: path.to_string(),
            segments,
        })
    }

    /// The selectors in order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

impl FromStr for FieldPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// The result of locating a field: its byte offset from the start of the
/// record and its declared type spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    pub offset: u64,
    pub type_name: String,
}

/// Resolve `path` against `type_name`, accumulating byte offsets.
///
/// Member segments apply to structs and unions (after typedef
/// dereferencing); index segments apply to arrays with a stride of the
/// element type's size. The returned type spelling is the located member's
/// declared one, typedefs preserved.
pub fn locate_field(index: &dyn TypeIndex, type_name: &str, path: &FieldPath) -> Result<Located> {
    let mut declared = type_name.to_string();
    let mut current: &DataType = canonical(index, require_type(index, type_name)?)?;
    let mut offset: u64 = 0;

    for segment in path.segments() {
        match segment {
            Segment::Member(name) => {
                let field = current
                    .field(name)
                    .ok_or_else(|| Error::NoSuchField {
                        type_name: current.name.clone(),
                        field: name.clone(),
                    })?;
                offset += field.offset;
                declared = field.type_name.clone();
                current = canonical(index, require_type(index, &field.type_name)?)?;
            }
            Segment::Index(i) => {
                let (element, count) = match &current.info {
                    TypeInfo::Array { element, count } => (element, *count),
                    _ => {
                        return Err(Error::InvalidIndex {
                            type_name: current.name.clone(),
                            index: *i,
                            reason: "not an array type".to_string(),
                        })
                    }
                };
                if *i >= count {
                    return Err(Error::InvalidIndex {
                        type_name: current.name.clone(),
                        index: *i,
                        reason: format!("array has {count} elements"),
                    });
                }
                let element_ty = require_type(index, element)?;
                offset += i * element_ty.size;
                declared = element.clone();
                current = canonical(index, element_ty)?;
            }
        }
    }

    Ok(Located {
        offset,
        type_name: declared,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::table::TypeTable;
    use crate::types::{DataType, Field};

    fn sample_table() -> TypeTable {
        let mut table = TypeTable::with_builtins();
        table.insert(DataType::new_struct(
            "struct list_head",
            16,
            vec![
                Field::new("next", "struct list_head *", 0),
                Field::new("prev", "struct list_head *", 8),
            ],
        ));
        table.insert(DataType::new_pointer(
            "struct list_head *",
            8,
            "struct list_head",
        ));
        table.insert(DataType::new_array(
            "struct list_head [4]",
            "struct list_head",
            16,
            4,
        ));
        table.insert(DataType::new_struct(
            "struct params",
            24,
            vec![
                Field::new("flags", "unsigned long", 0),
                Field::new("node", "struct list_head", 8),
            ],
        ));
        table.insert(DataType::new_struct(
            "struct task",
            104,
            vec![
                Field::new("pid", "int", 0),
                Field::new("params", "struct params", 8),
                Field::new("links", "struct list_head [4]", 32),
                Field::new("state", "unsigned long", 96),
            ],
        ));
        table.insert(DataType::new_typedef("task_t", 104, "struct task"));
        table
    }

    fn parse(p: &str) -> FieldPath {
        FieldPath::parse(p).unwrap()
    }

    #[test]
    fn parses_dotted_and_indexed_paths() {
        let path = parse("params.node");
        assert_eq!(
            path.segments(),
            &[
                Segment::Member("params".to_string()),
                Segment::Member("node".to_string()),
            ]
        );

        let path = parse("links[3]");
        assert_eq!(
            path.segments(),
            &[Segment::Member("links".to_string()), Segment::Index(3)]
        );
    }

    #[test]
    fn rejects_malformed_paths() {
        for bad in ["", "a..b", "a[", "a[x]", "a[1]b", ".a", "a[-1]"] {
            assert!(
                matches!(FieldPath::parse(bad), Err(Error::PathSyntax { .. })),
                "expected syntax error for {bad:?}"
            );
        }
    }

    #[test]
    fn locates_flat_member() {
        let table = sample_table();
        let loc = locate_field(&table, "struct task", &parse("state")).unwrap();
        assert_eq!(loc.offset, 96);
        assert_eq!(loc.type_name, "unsigned long");
    }

    #[test]
    fn locates_nested_member_additively() {
        let table = sample_table();
        let loc = locate_field(&table, "struct task", &parse("params.node")).unwrap();
        assert_eq!(loc.offset, 8 + 8);
        assert_eq!(loc.type_name, "struct list_head");
    }

    #[test]
    fn locates_array_element_by_stride() {
        let table = sample_table();
        let loc = locate_field(&table, "struct task", &parse("links[3]")).unwrap();
        assert_eq!(loc.offset, 32 + 3 * 16);
        assert_eq!(loc.type_name, "struct list_head");
    }

    #[test]
    fn locates_through_typedef_record_type() {
        let table = sample_table();
        let loc = locate_field(&table, "task_t", &parse("pid")).unwrap();
        assert_eq!(loc.offset, 0);
        assert_eq!(loc.type_name, "int");
    }

    #[test]
    fn missing_member_is_no_such_field() {
        let table = sample_table();
        let err = locate_field(&table, "struct task", &parse("comm")).unwrap_err();
        assert!(matches!(
            err,
            Error::NoSuchField { type_name, field }
                if type_name == "struct task" && field == "comm"
        ));
    }

    #[test]
    fn out_of_range_index_is_invalid() {
        let table = sample_table();
        let err = locate_field(&table, "struct task", &parse("links[5]")).unwrap_err();
        assert!(matches!(err, Error::InvalidIndex { index: 5, .. }));
    }

    #[test]
    fn indexing_a_non_array_is_invalid() {
        let table = sample_table();
        let err = locate_field(&table, "struct task", &parse("pid[0]")).unwrap_err();
        assert!(matches!(err, Error::InvalidIndex { .. }));
    }
}
