//! # schemabuilder
//!
//! A Cursive-based TUI for building nested key/value schemas.
//!
//! Users add fields, name them, pick a kind (`string`, `number`, `float`,
//! `boolean`, `objectId` or `nested`), fill in values and toggle fields on
//! and off. Every accepted edit rebuilds a plain JSON object from the
//! enabled fields and hands it to a change callback; an explicit submit
//! hands it to a submit callback.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use schemabuilder::{EditorConfig, Value, data::{AppData, RandomIds}};
//!
//! let app = AppData::new(EditorConfig::default(), Box::new(RandomIds))
//!     .with_on_submit(Arc::new(|output: &Value| println!("{output:#}")));
//!
//! let app = schemabuilder::run(app).unwrap();
//! println!("last submitted: {:?}", app.submitted);
//! ```
//!
//! ## Modules
//!
//! - [`data`] - Field tree store, output construction and editor state
//! - [`config`] - Editor settings
//! - [`run`] - TUI application runner
//! - [`ui`] - Views and event handlers

#[macro_use]
extern crate log;

/// Editor settings loaded from TOML or JSON.
pub mod config;

/// Field tree data structures and editor state.
///
/// This module holds everything that can be used without a terminal: the
/// tree store, the output projection and the editor state the TUI drives.
pub mod data;

/// TUI application runner.
pub mod run;

/// Views and event handlers for the field tree editor.
pub mod ui;

pub use config::EditorConfig;
pub use run::*;
pub use serde_json::Value;
pub use cursive;
