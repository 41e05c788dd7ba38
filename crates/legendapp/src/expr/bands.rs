//! Banded numeric category families.
//!
//! A band list is the compact way to declare categories over one continuous
//! attribute: each step names where its band starts, and the band runs up to
//! (excluding) the next step's start. The last band is open-ended. Expanding
//! steps this way makes overlaps and gaps impossible by construction; the only
//! thing left to check is that the starts strictly increase.

use super::Predicate;
use crate::error::{LegendError, Result};
use serde::{Deserialize, Serialize};

/// One step of a band list: the category key and the band's inclusive start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub key: String,
    pub from: f64,
}

impl Band {
    pub fn new(key: impl Into<String>, from: f64) -> Self {
        Self {
            key: key.into(),
            from,
        }
    }
}

/// Ordered band steps over one numeric attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bands {
    pub attr: String,
    pub steps: Vec<Band>,
}

impl Bands {
    pub fn new(attr: impl Into<String>, steps: Vec<Band>) -> Self {
        Self {
            attr: attr.into(),
            steps,
        }
    }

    /// Expand into `(key, range predicate)` pairs, in step order.
    ///
    /// Step boundaries are copied verbatim into the predicates.
    pub fn expand(&self) -> Result<Vec<(String, Predicate)>> {
        let invalid = |reason: String| LegendError::InvalidBands {
            attr: self.attr.clone(),
            reason,
        };

        if self.attr.trim().is_empty() {
            return Err(invalid("attribute name must not be empty".to_string()));
        }
        if self.steps.is_empty() {
            return Err(invalid("at least one step is required".to_string()));
        }
        if let Some(step) = self.steps.iter().find(|s| !s.from.is_finite()) {
            return Err(invalid(format!("step '{}' has a non-finite start", step.key)));
        }
        if let Some(pair) = self.steps.windows(2).find(|w| w[0].from >= w[1].from) {
            return Err(invalid(format!(
                "step '{}' (from {}) must start above '{}' (from {})",
                pair[1].key, pair[1].from, pair[0].key, pair[0].from
            )));
        }

        Ok(self
            .steps
            .iter()
            .enumerate()
            .map(|(i, step)| {
                let upper = self.steps.get(i + 1).map(|next| next.from);
                (
                    step.key.clone(),
                    Predicate::range(self.attr.clone(), step.from, upper),
                )
            })
            .collect())
    }
}
