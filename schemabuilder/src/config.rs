//! Editor settings.
//!
//! Settings are read from a TOML or JSON file, picked by extension:
//!
//! ```toml
//! title = "Order schema"
//! key_prefix = "key"
//! seed_field = true
//! pretty = true
//! confirm_submit = false
//! ```

use std::{fs, path::Path};

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};

/// Settings for one editor session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Title shown above the editor.
    pub title: String,
    /// Prefix of default key names; new fields are `{prefix}{n}`.
    pub key_prefix: String,
    /// Start with one empty root field.
    pub seed_field: bool,
    /// Pretty-print the live preview.
    pub pretty: bool,
    /// Show an acknowledgement dialog after submitting.
    pub confirm_submit: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            title: "Json Schema Builder".to_string(),
            key_prefix: "field".to_string(),
            seed_field: true,
            pretty: true,
            confirm_submit: true,
        }
    }
}

impl EditorConfig {
    /// Load settings from `path`.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read, cannot be parsed, or has an
    /// extension other than `toml` or `json`.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
        Self::parse(&content, ext).with_context(|| format!("Invalid settings in {}", path.display()))
    }

    /// Parse settings text in the format named by `ext`.
    pub fn parse(content: &str, ext: &str) -> anyhow::Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = match ext {
            "toml" => toml::from_str(content)?,
            "json" => serde_json::from_str(content)?,
            _ => bail!("Unsupported settings file extension: {ext:?}"),
        };
        Ok(config)
    }
}
