//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single
//! entry point for every legend operation, whatever UI drives it.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Owns** the rendering collaborators and one [`CategoryFilter`] per bound
//!   layer
//! - **Dispatches** to the appropriate command function
//! - **Checks configuration** that spans controllers (one controller per layer,
//!   groups never overlapping bound layers)
//! - **Returns structured types** ([`CmdResult`])
//!
//! ## Single Writer
//!
//! `LegendApi` is the only holder of `&mut S`. Bound layers only have their
//! filter written through [`commands::recompute`], and a layer cannot be both
//! bound to a controller and part of a toggle group. Nothing else in the crate
//! can reach a bound layer's filter, so there is exactly one writer without
//! any runtime locking.
//!
//! ## Runtime No-ops
//!
//! Operations addressed to a layer with no controller, or to a group that was
//! never added, do nothing and log at `debug`. UI events routinely race page
//! setup, so these are not errors.
//!
//! ## Generic Over Collaborators
//!
//! `LegendApi<S: LayerSurface, V: LegendView>`:
//! - Browser: a binding over the real map and legend DOM
//! - Testing and CLI: [`MemorySurface`] and [`MemoryView`]
//!
//! ## Testing Strategy
//!
//! API tests cover behaviour that spans commands: the coverage and idempotence
//! properties over every subset of categories, cross-controller configuration
//! errors, and groups feeding the zoom lock. Per-command behaviour is tested in
//! the command modules.
//!
//! [`MemorySurface`]: crate::surface::memory::MemorySurface
//! [`MemoryView`]: crate::surface::memory::MemoryView

use crate::categories::CategoryFilter;
use crate::commands::groups::LayerGroup;
use crate::commands::zoom_lock::ZoomLock;
use crate::commands::{self, CmdMessage, CmdResult};
use crate::declaration::Declaration;
use crate::error::{LegendError, Result};
use crate::surface::{LayerSurface, LegendView};
use std::collections::BTreeMap;
use tracing::debug;

/// The main API facade for legend operations.
pub struct LegendApi<S: LayerSurface, V: LegendView> {
    surface: S,
    view: V,
    filters: BTreeMap<String, CategoryFilter>,
    groups: BTreeMap<String, LayerGroup>,
    zoom_lock: Option<ZoomLock>,
}

impl<S: LayerSurface, V: LegendView> LegendApi<S, V> {
    pub fn new(surface: S, view: V) -> Self {
        Self {
            surface,
            view,
            filters: BTreeMap::new(),
            groups: BTreeMap::new(),
            zoom_lock: None,
        }
    }

    /// Bind a category filter controller to the declaration's layer.
    pub fn register(&mut self, declaration: &Declaration) -> Result<CmdResult> {
        let layer = &declaration.layer;
        if self.filters.contains_key(layer) {
            return Err(LegendError::LayerAlreadyBound(layer.clone()));
        }
        if let Some(group) = self.groups.values().find(|g| g.layers.contains(layer)) {
            return Err(LegendError::InvalidGroup {
                name: group.name.clone(),
                reason: format!("layer '{layer}' cannot also be bound to a category filter"),
            });
        }

        let (filter, result) =
            commands::register::run(declaration, &mut self.surface, &mut self.view)?;
        self.filters.insert(filter.layer().to_string(), filter);
        Ok(result)
    }

    pub fn toggle(&mut self, layer: &str, key: &str) -> CmdResult {
        match self.filters.get_mut(layer) {
            Some(filter) => {
                commands::toggle::run(filter, &mut self.surface, &mut self.view, key)
            }
            None => unbound(layer),
        }
    }

    pub fn recompute(&mut self, layer: &str) -> CmdResult {
        match self.filters.get(layer) {
            Some(filter) => commands::recompute::run(filter, &mut self.surface),
            None => unbound(layer),
        }
    }

    pub fn set_master_enabled(&mut self, layer: &str, enabled: bool) -> CmdResult {
        match self.filters.get_mut(layer) {
            Some(filter) => commands::master::run(filter, &mut self.surface, enabled),
            None => unbound(layer),
        }
    }

    /// Declare a layer toggle group. Hides its layers straight away when the
    /// group is `initially_hidden`.
    pub fn add_group(&mut self, group: LayerGroup) -> Result<CmdResult> {
        let invalid = |reason: String| LegendError::InvalidGroup {
            name: group.name.clone(),
            reason,
        };

        if group.name.trim().is_empty() {
            return Err(invalid("group name must not be empty".to_string()));
        }
        if self.groups.contains_key(&group.name) {
            return Err(invalid("group declared twice".to_string()));
        }
        if group.layers.is_empty() {
            return Err(invalid("no layers listed".to_string()));
        }
        if let Some(layer) = group.layers.iter().find(|l| self.filters.contains_key(*l)) {
            return Err(invalid(format!(
                "layer '{layer}' is bound to a category filter"
            )));
        }

        let result = if group.initially_hidden {
            commands::groups::set_visible(&group, &mut self.surface, false)
        } else {
            CmdResult::default()
        };
        self.groups.insert(group.name.clone(), group);
        Ok(result)
    }

    /// Show or hide a group, then re-apply the zoom lock if one is set.
    pub fn set_group_visible(&mut self, name: &str, visible: bool) -> CmdResult {
        let Some(group) = self.groups.get(name) else {
            debug!(group = name, "unknown layer group, ignored");
            let mut result = CmdResult::default();
            result.add_message(CmdMessage::warning(format!("Unknown layer group '{name}'")));
            return result;
        };

        let mut result = commands::groups::set_visible(group, &mut self.surface, visible);
        if let Some(lock) = &self.zoom_lock {
            let locked = commands::zoom_lock::apply(lock, &mut self.surface);
            result.zoom_lock = locked.zoom_lock;
            result.messages.extend(locked.messages);
        }
        result
    }

    pub fn set_zoom_lock(&mut self, lock: ZoomLock) {
        self.zoom_lock = Some(lock);
    }

    pub fn apply_zoom_lock(&mut self) -> CmdResult {
        match &self.zoom_lock {
            Some(lock) => commands::zoom_lock::apply(lock, &mut self.surface),
            None => CmdResult::default(),
        }
    }

    /// Controller state for a bound layer.
    pub fn filter(&self, layer: &str) -> Option<&CategoryFilter> {
        self.filters.get(layer)
    }

    pub fn filters(&self) -> impl Iterator<Item = &CategoryFilter> {
        self.filters.values()
    }

    pub fn group(&self, name: &str) -> Option<&LayerGroup> {
        self.groups.get(name)
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Direct renderer access, e.g. to add a layer mid-test.
    #[cfg(any(test, feature = "test_utils"))]
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}

fn unbound(layer: &str) -> CmdResult {
    debug!(layer, "no category filter bound to layer, ignored");
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::warning(format!(
        "No category filter on layer '{layer}'"
    )));
    result
}
