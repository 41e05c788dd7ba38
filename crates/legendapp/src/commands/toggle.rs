use crate::categories::CategoryFilter;
use crate::commands::{recompute, CmdMessage, CmdResult};
use crate::surface::{LayerSurface, LegendView};
use tracing::debug;

/// Flip one category.
///
/// Unknown and locked keys are ignored. A cascade parent forces each of its
/// children to its own new value. Either way the renderer sees exactly one
/// recompute.
pub fn run<S: LayerSurface, V: LegendView>(
    filter: &mut CategoryFilter,
    surface: &mut S,
    view: &mut V,
    key: &str,
) -> CmdResult {
    let mut result = CmdResult::default();
    let layer = filter.layer().to_string();

    let enabled = match filter.get(key) {
        None => {
            debug!(layer = %layer, key, "toggle ignored: unknown category");
            result.add_message(CmdMessage::warning(format!(
                "Unknown category '{key}' on layer '{layer}'"
            )));
            return result;
        }
        Some(category) if category.is_locked() => {
            debug!(layer = %layer, key, "toggle ignored: category is locked");
            result.add_message(CmdMessage::info(format!(
                "Category '{key}' is always shown"
            )));
            return result;
        }
        Some(category) => !category.is_enabled(),
    };

    filter.set_enabled(key, enabled);
    view.set_category_disabled(&layer, key, !enabled);
    result.changed.push((key.to_string(), enabled));

    let children = filter.cascade_children(key).map(<[String]>::to_vec);
    for child in children.unwrap_or_default() {
        if filter.set_enabled(&child, enabled) {
            result.changed.push((child.clone(), enabled));
        }
        view.set_category_disabled(&layer, &child, !enabled);
    }

    debug!(layer = %layer, key, enabled, changed = result.changed.len(), "toggled");
    result.recompute = Some(recompute::apply(filter, surface));
    result
}

#[cfg(test)]
mod tests {
    use crate::commands::Recompute;
    use crate::model::FeatureAttrs;
    use crate::surface::memory::fixtures::{feature, LegendFixture, ATTR, LAYER};
    use crate::surface::memory::SurfaceCall;
    use crate::surface::LayerSurface;

    fn enabled(fx: &LegendFixture, key: &str) -> bool {
        fx.api.filter(LAYER).unwrap().get(key).unwrap().is_enabled()
    }

    fn filter_calls(fx: &LegendFixture) -> usize {
        fx.api
            .surface()
            .calls()
            .iter()
            .filter(|c| matches!(c, SurfaceCall::SetFilter { .. }))
            .count()
    }

    #[test]
    fn toggle_flips_flag_and_ui_class() {
        let mut fx = LegendFixture::new().with_abc();

        let result = fx.api.toggle(LAYER, "B");
        assert_eq!(result.changed, vec![("B".to_string(), false)]);
        assert!(!enabled(&fx, "B"));
        assert!(fx.api.view().is_disabled(LAYER, "B"));

        fx.api.toggle(LAYER, "B");
        assert!(enabled(&fx, "B"));
        assert!(!fx.api.view().is_disabled(LAYER, "B"));
    }

    #[test]
    fn unknown_key_changes_nothing() {
        let mut fx = LegendFixture::new().with_abc().settled();
        let before = fx.api.filter(LAYER).unwrap().clone();
        let updates = fx.api.view().updates();

        let result = fx.api.toggle(LAYER, "Z");

        assert!(result.changed.is_empty());
        assert_eq!(result.recompute, None);
        assert_eq!(fx.api.filter(LAYER), Some(&before));
        assert!(fx.api.surface().calls().is_empty());
        assert_eq!(fx.api.view().updates(), updates);
    }

    #[test]
    fn locked_key_is_untouchable() {
        let mut fx = LegendFixture::new().with_locked_fallback();
        fx.api.toggle(LAYER, "A");
        let before = fx.api.filter(LAYER).unwrap().clone();
        let filter_before = fx.api.surface().filter(LAYER).cloned();
        let updates = fx.api.view().updates();
        fx.api.surface_mut().take_calls();

        let result = fx.api.toggle(LAYER, "fallback");

        assert!(result.changed.is_empty());
        assert_eq!(fx.api.filter(LAYER), Some(&before));
        assert_eq!(fx.api.surface().filter(LAYER).cloned(), filter_before);
        assert!(fx.api.surface().calls().is_empty());
        assert_eq!(fx.api.view().updates(), updates);
        assert!(!fx.api.view().is_disabled(LAYER, "fallback"));
    }

    #[test]
    fn locked_key_stays_in_the_filter() {
        let mut fx = LegendFixture::new().with_locked_fallback();
        for key in ["A", "B", "C"] {
            fx.api.toggle(LAYER, key);
        }

        let state = fx.api.filter(LAYER).unwrap();
        assert_eq!(state.enabled_keys().collect::<Vec<_>>(), vec!["fallback"]);
        assert!(state.renders(&FeatureAttrs::new()));
        assert!(!state.renders(&feature(3.0)));
        assert_eq!(
            fx.api.surface().visibility(LAYER),
            Some(crate::model::Visibility::Visible)
        );
    }

    #[test]
    fn parent_drives_children_with_one_recompute() {
        let mut fx = LegendFixture::new().with_cascade().settled();

        let result = fx.api.toggle(LAYER, "A");

        assert_eq!(
            result.changed,
            vec![
                ("A".to_string(), false),
                ("B".to_string(), false),
                ("C".to_string(), false)
            ]
        );
        assert!(["A", "B", "C"].iter().all(|k| !enabled(&fx, k)));
        assert!(["B", "C"].iter().all(|k| fx.api.view().is_disabled(LAYER, k)));
        assert_eq!(result.recompute, Some(Recompute::Hidden));
        assert_eq!(fx.api.surface().calls().len(), 1);

        fx.api.surface_mut().take_calls();
        fx.api.toggle(LAYER, "A");
        assert!(["A", "B", "C"].iter().all(|k| enabled(&fx, k)));
        assert_eq!(filter_calls(&fx), 1);
    }

    #[test]
    fn parent_forces_children_to_its_new_value() {
        let mut fx = LegendFixture::new().with_cascade();
        fx.api.toggle(LAYER, "B");

        // A goes off, B is already off, C follows.
        let result = fx.api.toggle(LAYER, "A");
        assert_eq!(
            result.changed,
            vec![("A".to_string(), false), ("C".to_string(), false)]
        );

        // A back on brings B back too.
        fx.api.toggle(LAYER, "A");
        assert!(enabled(&fx, "B"));
        assert!(!fx.api.view().is_disabled(LAYER, "B"));
    }

    #[test]
    fn child_toggle_leaves_parent_alone() {
        let mut fx = LegendFixture::new().with_cascade();

        let result = fx.api.toggle(LAYER, "C");

        assert_eq!(result.changed, vec![("C".to_string(), false)]);
        assert!(enabled(&fx, "A"));
        assert!(enabled(&fx, "B"));
    }

    #[test]
    fn abc_scenario() {
        let mut fx = LegendFixture::new().with_abc();
        let three = feature(3.0);

        assert!(fx.api.filter(LAYER).unwrap().renders(&three));

        fx.api.toggle(LAYER, "A");
        assert!(fx.api.filter(LAYER).unwrap().renders(&three));

        fx.api.toggle(LAYER, "B");
        assert!(!fx.api.filter(LAYER).unwrap().renders(&three));

        fx.api.toggle(LAYER, "C");
        assert_eq!(
            fx.api.surface().visibility(LAYER),
            Some(crate::model::Visibility::Hidden)
        );
    }

    #[test]
    fn feature_without_width_is_rejected_by_any_band_filter() {
        let mut fx = LegendFixture::new().with_abc();
        fx.api.toggle(LAYER, "A");

        let no_width = FeatureAttrs::new().with("other", 1);
        assert!(!fx.api.filter(LAYER).unwrap().renders(&no_width));
        assert!(!fx
            .api
            .filter(LAYER)
            .unwrap()
            .renders(&FeatureAttrs::new().with(ATTR, serde_json::Value::Null)));
    }
}
