//! # Command Layer
//!
//! This module contains the **core logic** of the legend. Each command lives in
//! its own submodule as plain functions over a [`CategoryFilter`] and the two
//! rendering collaborators ([`LayerSurface`], [`LegendView`]).
//!
//! ## Role and Responsibilities
//!
//! Commands are where the real work happens:
//! - Decide which writes the renderer receives, and in which order
//! - Mutate category flags (the only place that does)
//! - Return a structured [`CmdResult`] describing what happened
//! - Stay completely UI-agnostic
//!
//! ## What Commands Do NOT Do
//!
//! - **Any I/O**: no stdout, stderr or terminal concerns
//! - **Argument parsing**: that's the CLI layer's job
//! - **Raising on runtime races**: an unknown key or a layer that is not on the
//!   map yet is logged at `debug` and reported as a message, never as an error
//!
//! Configuration problems are the exception: [`register`] and the group checks
//! in the API fail fast with a [`crate::error::LegendError`].
//!
//! ## Single Writer
//!
//! The filter of a bound layer is only ever written by [`recompute`]. Every
//! other command that changes what should be rendered ends by calling it
//! exactly once.
//!
//! ## Testing Strategy
//!
//! **This is where most of the tests live.** Command tests run against
//! [`crate::surface::memory::MemorySurface`] and inspect its call log, so they
//! can assert on exact write sequences (one recompute per toggle, filter before
//! visibility, nothing at all for a no-op).
//!
//! ## Command Modules
//!
//! - [`register`]: Build a controller from a declaration
//! - [`recompute`]: Push the combined filter and visibility to the renderer
//! - [`toggle`]: Flip one category, cascading to its children
//! - [`master`]: The layer's master switch
//! - [`groups`]: Plain layer toggle groups
//! - [`zoom_lock`]: Minimum zoom driven by visible layers
//!
//! [`CategoryFilter`]: crate::categories::CategoryFilter
//! [`LayerSurface`]: crate::surface::LayerSurface
//! [`LegendView`]: crate::surface::LegendView

use serde::Serialize;
use serde_json::Value;

pub mod groups;
pub mod master;
pub mod recompute;
pub mod register;
pub mod toggle;
pub mod zoom_lock;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

/// What a recompute did to the layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "filter", rename_all = "snake_case")]
pub enum Recompute {
    /// Master switch is off; nothing was written.
    Suspended,
    /// The layer is not on the map yet; nothing was written.
    MissingLayer,
    /// No category enabled; the layer was hidden.
    Hidden,
    /// Every category enabled; the filter was cleared.
    Unfiltered,
    /// Filter written with the lowered expression.
    Filtered(Value),
}

#[derive(Debug, Default, Serialize)]
pub struct CmdResult {
    /// Categories whose flag changed, with their new value.
    pub changed: Vec<(String, bool)>,
    /// Set when the command ended with a recompute.
    pub recompute: Option<Recompute>,
    /// Minimum zoom set by the zoom lock, when it ran.
    pub zoom_lock: Option<f64>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_recompute(mut self, recompute: Recompute) -> Self {
        self.recompute = Some(recompute);
        self
    }
}
