//! # Configuration
//!
//! Client configuration is loaded with [`confique`], layering environment
//! variables over an optional TOML file over compiled defaults.
//!
//! ## Resolution Order
//!
//! 1. **Environment variables**: `LEGEND_FORMAT`, `LEGEND_PRESET`
//! 2. **Config file**: passed explicitly (the CLI's `--config`)
//! 3. **Compiled defaults**: via `#[config(default = ...)]`
//!
//! ## Available Settings
//!
//! | Key | Env | Default | Description |
//! |-----|-----|---------|-------------|
//! | `format` | `LEGEND_FORMAT` | `text` | Output format, `text` or `json` |
//! | `preset` | `LEGEND_PRESET` | none | Built-in declaration used when no path is given |

use crate::error::Result;
use confique::Config;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Output format, parsed from a plain string, case-insensitively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl TryFrom<String> for OutputFormat {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{other}', expected text or json")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => f.write_str("text"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

/// Configuration for legend clients, stored in `legend.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LegendConfig {
    /// Output format: "text" or "json".
    #[config(default = "text", env = "LEGEND_FORMAT")]
    pub format: OutputFormat,

    /// Built-in declaration to use when none is given on the command line.
    #[config(env = "LEGEND_PRESET")]
    pub preset: Option<String>,
}

impl Default for LegendConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            preset: None,
        }
    }
}

impl LegendConfig {
    /// Load from the environment and, when given, a TOML file. The file does
    /// not have to exist.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = Self::builder().env();
        if let Some(path) = file {
            builder = builder.file(path);
        }
        Ok(builder.load()?)
    }
}
