//! Layer toggle groups.
//!
//! A group is one checkbox driving the visibility of several layers, with no
//! categories involved. Some groups (isochrones, for instance) also need their
//! per-feature filters reset when hidden; those write a filter that matches
//! nothing, so stale hover selections do not reappear on the next show.

use crate::commands::{CmdMessage, CmdResult};
use crate::model::Visibility;
use crate::surface::LayerSurface;
use serde_json::{json, Value};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerGroup {
    pub name: String,
    pub layers: Vec<String>,
    /// Write a match-nothing filter on every layer when the group is hidden.
    pub clear_filter_on_hide: bool,
    /// Hide the group's layers as soon as the group is added.
    pub initially_hidden: bool,
}

impl LayerGroup {
    pub fn new(name: impl Into<String>, layers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            layers,
            clear_filter_on_hide: false,
            initially_hidden: false,
        }
    }

    pub fn clearing_filter_on_hide(mut self) -> Self {
        self.clear_filter_on_hide = true;
        self
    }

    pub fn hidden_initially(mut self) -> Self {
        self.initially_hidden = true;
        self
    }
}

/// Filter that no feature passes.
pub fn match_nothing() -> Value {
    json!(["==", "id", ""])
}

/// Show or hide every layer of `group` that is on the map.
pub fn set_visible<S: LayerSurface>(
    group: &LayerGroup,
    surface: &mut S,
    visible: bool,
) -> CmdResult {
    let mut result = CmdResult::default();
    let visibility = Visibility::from(visible);
    let mut touched = 0;

    for layer in &group.layers {
        if !surface.has_layer(layer) {
            debug!(group = %group.name, layer = %layer, "layer not on the map yet, skipped");
            continue;
        }
        if !visible && group.clear_filter_on_hide {
            surface.set_filter(layer, Some(match_nothing()));
        }
        surface.set_visibility(layer, visibility);
        touched += 1;
    }

    debug!(group = %group.name, %visibility, touched, "group visibility set");
    result.add_message(CmdMessage::info(format!(
        "Group '{}': {} of {} layers set to {}",
        group.name,
        touched,
        group.layers.len(),
        visibility
    )));
    result
}
