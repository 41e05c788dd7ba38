use crate::categories::{CategoryFilter, Composition};
use crate::commands::{CmdResult, Recompute};
use crate::model::Visibility;
use crate::surface::LayerSurface;
use tracing::{debug, trace};

pub fn run<S: LayerSurface>(filter: &CategoryFilter, surface: &mut S) -> CmdResult {
    CmdResult::default().with_recompute(apply(filter, surface))
}

/// Write the combined filter and visibility for the current flags.
///
/// The filter is always written before visibility so a layer never becomes
/// visible with a stale filter. When nothing is enabled only the visibility is
/// written; the previous filter is irrelevant while the layer is hidden.
pub(crate) fn apply<S: LayerSurface>(filter: &CategoryFilter, surface: &mut S) -> Recompute {
    let layer = filter.layer();

    if !filter.is_master_enabled() {
        trace!(layer, "master switch off, recompute skipped");
        return Recompute::Suspended;
    }
    if !surface.has_layer(layer) {
        debug!(layer, "layer not on the map yet, recompute skipped");
        return Recompute::MissingLayer;
    }

    match filter.composition() {
        Composition::Hidden => {
            trace!(layer, "no category enabled, hiding layer");
            surface.set_visibility(layer, Visibility::Hidden);
            Recompute::Hidden
        }
        Composition::Unfiltered => {
            trace!(layer, "all categories enabled, clearing filter");
            surface.set_filter(layer, None);
            surface.set_visibility(layer, Visibility::Visible);
            Recompute::Unfiltered
        }
        Composition::Filtered(predicate) => {
            let expression = predicate.to_expression();
            trace!(layer, %expression, "writing filter");
            surface.set_filter(layer, Some(expression.clone()));
            surface.set_visibility(layer, Visibility::Visible);
            Recompute::Filtered(expression)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::memory::fixtures::{feature, LegendFixture, ATTR, LAYER};
    use crate::surface::memory::{MemorySurface, SurfaceCall};
    use serde_json::json;

    #[test]
    fn writes_filter_before_visibility() {
        let mut fx = LegendFixture::new().with_abc().settled();
        fx.api.toggle(LAYER, "A");

        let calls = fx.api.surface().calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(calls[0], SurfaceCall::SetFilter { .. }));
        assert_eq!(
            calls[1],
            SurfaceCall::SetVisibility {
                layer: LAYER.to_string(),
                visibility: Visibility::Visible
            }
        );
    }

    #[test]
    fn all_enabled_clears_filter() {
        let mut fx = LegendFixture::new().with_abc().settled();

        let result = fx.api.recompute(LAYER);

        assert_eq!(result.recompute, Some(Recompute::Unfiltered));
        assert_eq!(fx.api.surface().filter(LAYER), None);
        assert_eq!(
            fx.api.surface().calls()[0],
            SurfaceCall::SetFilter {
                layer: LAYER.to_string(),
                filter: None
            }
        );
    }

    #[test]
    fn partial_selection_writes_or_expression() {
        let mut fx = LegendFixture::new().with_abc();
        fx.api.toggle(LAYER, "A");

        assert_eq!(
            fx.api.surface().filter(LAYER),
            Some(&json!([
                "any",
                [
                    "all",
                    ["==", ["typeof", ["get", ATTR]], "number"],
                    [">=", ["get", ATTR], 2.0],
                    ["<", ["get", ATTR], 5.0]
                ],
                ["all", ["==", ["typeof", ["get", ATTR]], "number"], [">=", ["get", ATTR], 5.0]]
            ]))
        );
    }

    #[test]
    fn single_enabled_category_is_not_wrapped() {
        let mut fx = LegendFixture::new().with_abc();
        fx.api.toggle(LAYER, "A");
        fx.api.toggle(LAYER, "C");

        assert_eq!(
            fx.api.surface().filter(LAYER),
            Some(&json!([
                "all",
                ["==", ["typeof", ["get", ATTR]], "number"],
                [">=", ["get", ATTR], 2.0],
                ["<", ["get", ATTR], 5.0]
            ]))
        );
    }

    #[test]
    fn empty_selection_hides_without_touching_filter() {
        let mut fx = LegendFixture::new().with_abc();
        fx.api.toggle(LAYER, "A");
        fx.api.toggle(LAYER, "B");
        let filter_before = fx.api.surface().filter(LAYER).cloned();
        fx.api.surface_mut().take_calls();

        fx.api.toggle(LAYER, "C");

        assert_eq!(
            fx.api.surface().calls(),
            &[SurfaceCall::SetVisibility {
                layer: LAYER.to_string(),
                visibility: Visibility::Hidden
            }]
        );
        assert_eq!(fx.api.surface().filter(LAYER).cloned(), filter_before);
    }

    #[test]
    fn recompute_twice_repeats_the_same_writes() {
        let mut fx = LegendFixture::new().with_abc();
        fx.api.toggle(LAYER, "B");
        fx.api.surface_mut().take_calls();

        fx.api.recompute(LAYER);
        let first = fx.api.surface_mut().take_calls();
        fx.api.recompute(LAYER);
        let second = fx.api.surface_mut().take_calls();

        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn missing_layer_is_a_silent_no_op() {
        let mut fx = LegendFixture {
            api: crate::api::LegendApi::new(MemorySurface::new(), Default::default()),
        }
        .with_abc()
        .settled();

        let result = fx.api.toggle(LAYER, "A");

        assert_eq!(result.recompute, Some(Recompute::MissingLayer));
        assert!(fx.api.surface().calls().is_empty());
        assert!(!fx.api.filter(LAYER).unwrap().get("A").unwrap().is_enabled());
    }

    #[test]
    fn layer_added_later_picks_up_current_state() {
        let mut fx = LegendFixture {
            api: crate::api::LegendApi::new(MemorySurface::new(), Default::default()),
        }
        .with_abc();
        fx.api.toggle(LAYER, "A");
        fx.api.surface_mut().add_layer(LAYER);

        fx.api.recompute(LAYER);

        let state = fx.api.filter(LAYER).unwrap();
        assert!(!state.renders(&feature(1.0)));
        assert!(fx.api.surface().filter(LAYER).is_some());
    }
}
