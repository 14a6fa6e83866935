use std::fmt::Display;

use crate::error::{Field, MergeError};

/// Combines two observations of one field.
///
/// Absent fields yield to present ones; two present values must agree under
/// value equality or the merge fails with [`MergeError::Conflict`], which
/// names the field, both values and the owning entity. Pure: no side
/// effects on either input.
pub fn reconcile<T>(
    field: Field,
    entity: &str,
    a: Option<T>,
    b: Option<T>,
) -> Result<Option<T>, MergeError>
where
    T: PartialEq + Display,
{
    match (a, b) {
        (None, None) => Ok(None),
        (Some(v), None) | (None, Some(v)) => Ok(Some(v)),
        (Some(x), Some(y)) => {
            if x == y {
                Ok(Some(x))
            } else {
                Err(MergeError::Conflict {
                    field,
                    entity: entity.to_string(),
                    left: x.to_string(),
                    right: y.to_string(),
                })
            }
        }
    }
}
