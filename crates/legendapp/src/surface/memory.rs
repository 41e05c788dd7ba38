use super::{LayerSurface, LegendView};
use crate::model::Visibility;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

const DEFAULT_ZOOM: f64 = 12.0;

/// A single write received by [`MemorySurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    SetFilter {
        layer: String,
        filter: Option<Value>,
    },
    SetVisibility {
        layer: String,
        visibility: Visibility,
    },
    SetZoom(f64),
    SetMinZoom(f64),
}

/// What the renderer currently holds for one layer.
#[derive(Debug, Clone, Default, PartialEq)]
struct LayerState {
    visibility: Visibility,
    filter: Option<Value>,
}

/// In-memory renderer that keeps layer state and a log of every write.
///
/// Writes addressed to a layer that was never added are logged but change
/// nothing, the same way a renderer would refuse them.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    layers: BTreeMap<String, LayerState>,
    zoom: f64,
    min_zoom: f64,
    calls: Vec<SurfaceCall>,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySurface {
    pub fn new() -> Self {
        Self {
            layers: BTreeMap::new(),
            zoom: DEFAULT_ZOOM,
            min_zoom: 0.0,
            calls: Vec::new(),
        }
    }

    /// Add a visible, unfiltered layer.
    pub fn with_layer(mut self, layer: impl Into<String>) -> Self {
        self.add_layer(layer);
        self
    }

    /// Add a layer whose layout starts at `visibility: none`.
    pub fn with_hidden_layer(mut self, layer: impl Into<String>) -> Self {
        self.layers.insert(
            layer.into(),
            LayerState {
                visibility: Visibility::Hidden,
                filter: None,
            },
        );
        self
    }

    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn add_layer(&mut self, layer: impl Into<String>) {
        self.layers.entry(layer.into()).or_default();
    }

    pub fn filter(&self, layer: &str) -> Option<&Value> {
        self.layers.get(layer).and_then(|state| state.filter.as_ref())
    }

    pub fn min_zoom(&self) -> f64 {
        self.min_zoom
    }

    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    /// Drain the call log, e.g. to ignore setup writes in a test.
    pub fn take_calls(&mut self) -> Vec<SurfaceCall> {
        std::mem::take(&mut self.calls)
    }
}

impl LayerSurface for MemorySurface {
    fn has_layer(&self, layer: &str) -> bool {
        self.layers.contains_key(layer)
    }

    fn set_filter(&mut self, layer: &str, filter: Option<Value>) {
        self.calls.push(SurfaceCall::SetFilter {
            layer: layer.to_string(),
            filter: filter.clone(),
        });
        if let Some(state) = self.layers.get_mut(layer) {
            state.filter = filter;
        }
    }

    fn set_visibility(&mut self, layer: &str, visibility: Visibility) {
        self.calls.push(SurfaceCall::SetVisibility {
            layer: layer.to_string(),
            visibility,
        });
        if let Some(state) = self.layers.get_mut(layer) {
            state.visibility = visibility;
        }
    }

    fn visibility(&self, layer: &str) -> Option<Visibility> {
        self.layers.get(layer).map(|state| state.visibility)
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn set_zoom(&mut self, zoom: f64) {
        self.calls.push(SurfaceCall::SetZoom(zoom));
        self.zoom = zoom;
    }

    fn set_min_zoom(&mut self, zoom: f64) {
        self.calls.push(SurfaceCall::SetMinZoom(zoom));
        self.min_zoom = zoom;
    }
}

/// In-memory legend UI tracking which elements carry the `disabled` class.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryView {
    disabled: BTreeSet<(String, String)>,
    updates: usize,
}

impl MemoryView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_disabled(&self, layer: &str, key: &str) -> bool {
        self.disabled
            .contains(&(layer.to_string(), key.to_string()))
    }

    /// Number of class updates received so far.
    pub fn updates(&self) -> usize {
        self.updates
    }
}

impl LegendView for MemoryView {
    fn set_category_disabled(&mut self, layer: &str, key: &str, disabled: bool) {
        self.updates += 1;
        let entry = (layer.to_string(), key.to_string());
        if disabled {
            self.disabled.insert(entry);
        } else {
            self.disabled.remove(&entry);
        }
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::api::LegendApi;
    use crate::categories::Cascade;
    use crate::declaration::Declaration;
    use crate::expr::{Band, Bands};
    use crate::model::FeatureAttrs;

    pub const LAYER: &str = "lanes";
    pub const ATTR: &str = "width";

    /// `A: [0, 2)`, `B: [2, 5)`, `C: [5, ∞)` on [`ATTR`], bound to [`LAYER`].
    pub fn abc_declaration() -> Declaration {
        Declaration::new(LAYER).with_bands(Bands::new(
            ATTR,
            vec![Band::new("A", 0.0), Band::new("B", 2.0), Band::new("C", 5.0)],
        ))
    }

    /// A feature with [`ATTR`] set to `value`.
    pub fn feature(value: f64) -> FeatureAttrs {
        FeatureAttrs::new().with(ATTR, value)
    }

    pub struct LegendFixture {
        pub api: LegendApi<MemorySurface, MemoryView>,
    }

    impl Default for LegendFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl LegendFixture {
        /// A renderer that already has [`LAYER`], nothing registered yet.
        pub fn new() -> Self {
            Self {
                api: LegendApi::new(MemorySurface::new().with_layer(LAYER), MemoryView::new()),
            }
        }

        pub fn with_declaration(mut self, declaration: Declaration) -> Self {
            self.api.register(&declaration).unwrap();
            self
        }

        pub fn with_abc(self) -> Self {
            self.with_declaration(abc_declaration())
        }

        /// `abc` plus a `fallback` category for features without [`ATTR`],
        /// locked on.
        pub fn with_locked_fallback(self) -> Self {
            self.with_declaration(
                abc_declaration()
                    .with_category("fallback", crate::expr::Predicate::missing(ATTR))
                    .lock("fallback"),
            )
        }

        /// `abc` where toggling `A` drives `B` and `C`.
        pub fn with_cascade(self) -> Self {
            self.with_declaration(abc_declaration().cascade(Cascade::new(
                "A",
                vec!["B".to_string(), "C".to_string()],
            )))
        }

        /// Forget the writes made during setup.
        pub fn settled(mut self) -> Self {
            self.api.surface_mut().take_calls();
            self
        }
    }
}
