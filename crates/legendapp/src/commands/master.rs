use crate::categories::CategoryFilter;
use crate::commands::{recompute, CmdResult, Recompute};
use crate::model::Visibility;
use crate::surface::LayerSurface;
use tracing::debug;

/// The layer's master checkbox.
///
/// Switching off hides the layer and suspends recomputes; category flags are
/// kept as they are. Switching on recomputes straight away, so the layer comes
/// back with the filter matching the current flags.
pub fn run<S: LayerSurface>(
    filter: &mut CategoryFilter,
    surface: &mut S,
    enabled: bool,
) -> CmdResult {
    filter.set_master(enabled);
    if enabled {
        return recompute::run(filter, surface);
    }

    let layer = filter.layer();
    if surface.has_layer(layer) {
        surface.set_visibility(layer, Visibility::Hidden);
    } else {
        debug!(layer, "layer not on the map yet, nothing to hide");
    }
    CmdResult::default().with_recompute(Recompute::Suspended)
}
