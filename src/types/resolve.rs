//! Type-name resolution.
//!
//! Users write record types as shorthands: `task_struct` for
//! `struct task_struct`, or a typedef name like `kmutex_t`. Resolution
//! normalizes such a spelling once, up front, so traversal only ever deals
//! with names that denote a concrete struct layout.

use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{canonical, TypeIndex, TypeKind};

/// Resolve a user-supplied type name to a spelling that denotes a struct.
///
/// Accepts three forms:
/// - a canonical struct spelling (`"struct foo"`), returned unchanged;
/// - a bare struct name (`"foo"` where only `"struct foo"` exists), returned
///   with the `struct` prefix added;
/// - a typedef whose canonical type is a struct, returned unchanged so the
///   user-facing shorthand is preserved.
///
/// Anything else fails: [`Error::NotAnAggregate`] when the name denotes a
/// non-struct type, [`Error::UnknownType`] when it denotes nothing at all.
pub fn resolve_aggregate_name(index: &dyn TypeIndex, name: &str) -> Result<String> {
    let ty = match index.lookup_type(name) {
        Some(ty) => ty,
        None => {
            let prefixed = format!("struct {name}");
            return match index.lookup_type(&prefixed) {
                Some(_) => {
                    debug!(name, resolved = %prefixed, "resolved bare struct name");
                    Ok(prefixed)
                }
                None => Err(Error::UnknownType {
                    name: name.to_string(),
                    detail: format!("neither '{name}' nor '{prefixed}' is known"),
                }),
            };
        }
    };

    match ty.kind {
        TypeKind::Struct => Ok(name.to_string()),
        TypeKind::Typedef => {
            if canonical(index, ty)?.kind == TypeKind::Struct {
                debug!(name, "resolved typedef to struct");
                Ok(name.to_string())
            } else {
                Err(Error::NotAnAggregate {
                    name: name.to_string(),
                })
            }
        }
        _ => Err(Error::NotAnAggregate {
            name: name.to_string(),
        }),
    }
}
