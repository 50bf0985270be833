//! Field tree data structures and editor state.
//!
//! - [`field`] - A single field: key name, kind, value, enabled flag
//! - [`tree`] - The field tree store and its add/update/delete operations
//! - [`output`] - Projection of the tree onto a plain JSON object
//! - [`id`] - Field identifiers and their sources
//! - [`app_data`] - Editor state shared with the TUI

/// Editor state container and change notification.
pub mod app_data;

/// Error type for tree operations.
pub mod error;

/// Field nodes, kinds and values.
pub mod field;

/// Field identifiers.
pub mod id;

/// Output object construction and rendering.
pub mod output;

/// The field tree store.
pub mod tree;

pub use app_data::{AppData, Edit, OutputCallback};
pub use error::TreeError;
pub use field::{Field, FieldKind, FieldValue};
pub use id::{FieldId, IdSource, RandomIds, SequentialIds};
pub use output::{OutputFormat, build_output, duplicate_keys, render};
pub use tree::{FieldTree, FieldUpdate};
