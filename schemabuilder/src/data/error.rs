use thiserror::Error;

use crate::data::{field::FieldKind, id::FieldId};

/// Errors reported by [`FieldTree`](crate::data::tree::FieldTree) operations.
///
/// Every operation validates before it mutates, so receiving one of these
/// means the tree was left untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    #[error("no field with id {0}")]
    NotFound(FieldId),

    #[error("field {0} is not a nested field")]
    NotNested(FieldId),

    #[error("field {id} is not a direct child of {expected}")]
    ParentMismatch { id: FieldId, expected: FieldId },

    #[error("field {id} is of kind {expected}, got a {actual} value")]
    TypeMismatch {
        id: FieldId,
        expected: FieldKind,
        actual: &'static str,
    },

    #[error("field {id} of kind {kind} does not accept input {input:?}")]
    InvalidInput {
        id: FieldId,
        kind: FieldKind,
        input: String,
    },
}
