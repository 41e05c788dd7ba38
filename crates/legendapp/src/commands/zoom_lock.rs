//! Minimum zoom driven by visible layers.
//!
//! Some layers are too dense to render below a certain zoom. While such a
//! layer is visible the map's minimum zoom is raised to the strictest rule; when
//! none is visible it falls back to the base minimum zoom.

use crate::commands::{CmdMessage, CmdResult};
use crate::model::Visibility;
use crate::surface::LayerSurface;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct ZoomRule {
    pub layer: String,
    pub min_zoom: f64,
}

impl ZoomRule {
    pub fn new(layer: impl Into<String>, min_zoom: f64) -> Self {
        Self {
            layer: layer.into(),
            min_zoom,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZoomLock {
    pub base_min_zoom: f64,
    pub rules: Vec<ZoomRule>,
}

impl ZoomLock {
    pub fn new(base_min_zoom: f64) -> Self {
        Self {
            base_min_zoom,
            rules: Vec::new(),
        }
    }

    pub fn rule(mut self, layer: impl Into<String>, min_zoom: f64) -> Self {
        self.rules.push(ZoomRule::new(layer, min_zoom));
        self
    }

    /// Highest `min_zoom` among rules whose layer is visible, or the base.
    pub fn strictest<S: LayerSurface>(&self, surface: &S) -> f64 {
        self.rules
            .iter()
            .filter(|rule| surface.visibility(&rule.layer) == Some(Visibility::Visible))
            .map(|rule| rule.min_zoom)
            .fold(None, |acc: Option<f64>, z| Some(acc.map_or(z, |a| a.max(z))))
            .unwrap_or(self.base_min_zoom)
    }
}

/// Set the map's minimum zoom, zooming in when the view is below it.
pub fn apply<S: LayerSurface>(lock: &ZoomLock, surface: &mut S) -> CmdResult {
    let min_zoom = lock.strictest(surface);
    surface.set_min_zoom(min_zoom);

    let mut result = CmdResult {
        zoom_lock: Some(min_zoom),
        ..Default::default()
    };
    if surface.zoom() < min_zoom {
        debug!(from = surface.zoom(), to = min_zoom, "zooming in to the lock");
        surface.set_zoom(min_zoom);
        result.add_message(CmdMessage::info(format!("Zoomed in to {min_zoom}")));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::memory::{MemorySurface, SurfaceCall};

    fn lock() -> ZoomLock {
        ZoomLock::new(9.0)
            .rule("mapillary-images-layer", 14.0)
            .rule("agrar", 10.0)
    }

    #[test]
    fn base_when_no_rule_layer_is_visible() {
        let surface = MemorySurface::new()
            .with_hidden_layer("mapillary-images-layer")
            .with_hidden_layer("agrar");
        assert_eq!(lock().strictest(&surface), 9.0);

        // Layers missing from the map count as not visible.
        assert_eq!(lock().strictest(&MemorySurface::new()), 9.0);
    }

    #[test]
    fn strictest_visible_rule_wins() {
        let surface = MemorySurface::new()
            .with_layer("mapillary-images-layer")
            .with_layer("agrar");
        assert_eq!(lock().strictest(&surface), 14.0);

        let surface = MemorySurface::new()
            .with_hidden_layer("mapillary-images-layer")
            .with_layer("agrar");
        assert_eq!(lock().strictest(&surface), 10.0);
    }

    #[test]
    fn zooms_in_only_when_below() {
        let mut surface = MemorySurface::new()
            .with_layer("mapillary-images-layer")
            .with_zoom(12.0);
        let result = apply(&lock(), &mut surface);

        assert_eq!(result.zoom_lock, Some(14.0));
        assert_eq!(
            surface.calls(),
            &[SurfaceCall::SetMinZoom(14.0), SurfaceCall::SetZoom(14.0)]
        );

        let mut surface = MemorySurface::new()
            .with_layer("mapillary-images-layer")
            .with_zoom(15.5);
        apply(&lock(), &mut surface);
        assert_eq!(surface.calls(), &[SurfaceCall::SetMinZoom(14.0)]);
        assert_eq!(surface.zoom(), 15.5);
    }

    #[test]
    fn lowering_the_lock_never_zooms_out() {
        let mut surface = MemorySurface::new().with_zoom(14.0);
        apply(&lock(), &mut surface);

        assert_eq!(surface.min_zoom(), 9.0);
        assert_eq!(surface.zoom(), 14.0);
    }
}
