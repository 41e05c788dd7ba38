//! # Category Declarations
//!
//! A [`Declaration`] is the static description of one category family: which
//! layer it filters, its categories and predicates, which keys are locked on,
//! and which parent/children cascades exist. It is what `register` consumes.
//!
//! Declarations are usually written in TOML:
//!
//! ```toml
//! layer = "nettobreite"
//! locked = ["no-width"]
//!
//! [bands]
//! attr = "width_effective"
//! steps = [
//!   { key = "narrow", from = 1 },
//!   { key = "wide", from = 5 },
//! ]
//!
//! [[categories]]
//! key = "no-width"
//! predicate = { op = "missing", attr = "width_effective" }
//! ```
//!
//! Band steps come first in the legend order, followed by `categories` in the
//! order written.
//!
//! ## Presets
//!
//! Declarations used by the viewer ship embedded in the library and are
//! available through [`Declaration::preset`]:
//!
//! | Name | Layer | Notes |
//! |------|-------|-------|
//! | `nettobreite` | `nettobreite` | Ten width bands plus `no-width` |
//! | `nettobreite-flags` | `nettobreite` | Adds the missing-data flags, driven by `no-width` |

use crate::categories::Cascade;
use crate::error::{LegendError, Result};
use crate::expr::{Bands, Predicate};
use serde::{Deserialize, Serialize};
use std::path::Path;

const PRESETS: &[(&str, &str)] = &[
    ("nettobreite", include_str!("presets/nettobreite.toml")),
    (
        "nettobreite-flags",
        include_str!("presets/nettobreite_flags.toml"),
    ),
];

/// A category with an explicit predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDecl {
    pub key: String,
    pub predicate: Predicate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Declaration {
    /// Layer the combined filter is written to.
    pub layer: String,

    /// Keys that cannot be toggled and always count as enabled.
    #[serde(default)]
    pub locked: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bands: Option<Bands>,

    #[serde(default)]
    pub categories: Vec<CategoryDecl>,

    #[serde(default)]
    pub cascades: Vec<Cascade>,
}

impl Declaration {
    pub fn new(layer: impl Into<String>) -> Self {
        Self {
            layer: layer.into(),
            locked: Vec::new(),
            bands: None,
            categories: Vec::new(),
            cascades: Vec::new(),
        }
    }

    pub fn with_bands(mut self, bands: Bands) -> Self {
        self.bands = Some(bands);
        self
    }

    pub fn with_category(mut self, key: impl Into<String>, predicate: Predicate) -> Self {
        self.categories.push(CategoryDecl {
            key: key.into(),
            predicate,
        });
        self
    }

    pub fn lock(mut self, key: impl Into<String>) -> Self {
        self.locked.push(key.into());
        self
    }

    pub fn cascade(mut self, cascade: Cascade) -> Self {
        self.cascades.push(cascade);
        self
    }

    pub fn from_toml(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// A declaration embedded in the library.
    pub fn preset(name: &str) -> Result<Self> {
        let (_, source) = PRESETS
            .iter()
            .find(|(preset, _)| *preset == name)
            .ok_or_else(|| LegendError::UnknownPreset(name.to_string()))?;
        Self::from_toml(source)
    }

    pub fn preset_names() -> impl Iterator<Item = &'static str> {
        PRESETS.iter().map(|(name, _)| *name)
    }

    /// Categories in legend order: expanded bands, then explicit categories.
    pub fn entries(&self) -> Result<Vec<(String, Predicate)>> {
        let mut entries = match &self.bands {
            Some(bands) => bands.expand()?,
            None => Vec::new(),
        };
        entries.extend(
            self.categories
                .iter()
                .map(|c| (c.key.clone(), c.predicate.clone())),
        );
        Ok(entries)
    }
}
