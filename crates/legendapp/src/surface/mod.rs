//! # Rendering Collaborators
//!
//! The library never talks to a renderer or a DOM directly. It drives two
//! traits instead:
//!
//! - [`LayerSurface`]: the map. Layer lookup, filter and visibility writes, and
//!   the zoom setters used by the zoom lock.
//! - [`LegendView`]: the legend UI. One call per category whose `disabled`
//!   class must change.
//!
//! ## Implementations
//!
//! - [`memory::MemorySurface`] / [`memory::MemoryView`]: in-memory, recording
//!   every call. They back the unit tests and the CLI's replay commands.
//! - A browser binding implements the same traits over the real renderer.
//!
//! Writes are infallible from the library's point of view: a missing layer is
//! checked with [`LayerSurface::has_layer`] before writing, and anything else is
//! the collaborator's business.

use crate::model::Visibility;
use serde_json::Value;

pub mod memory;

/// The map renderer, as seen by the legend.
pub trait LayerSurface {
    /// Whether `layer` has been added to the map yet.
    fn has_layer(&self, layer: &str) -> bool;

    /// Replace the layer filter. `None` removes it.
    fn set_filter(&mut self, layer: &str, filter: Option<Value>);

    /// Set the layer's `visibility` layout property.
    fn set_visibility(&mut self, layer: &str, visibility: Visibility);

    /// Current `visibility` of the layer, `None` if the layer does not exist.
    fn visibility(&self, layer: &str) -> Option<Visibility>;

    fn zoom(&self) -> f64;

    fn set_zoom(&mut self, zoom: f64);

    fn set_min_zoom(&mut self, zoom: f64);
}

/// The legend UI: one clickable element per category.
pub trait LegendView {
    /// Add (`true`) or remove (`false`) the `disabled` class on the element for
    /// `key` in the legend of `layer`.
    fn set_category_disabled(&mut self, layer: &str, key: &str, disabled: bool);
}
