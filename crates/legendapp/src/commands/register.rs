use crate::categories::CategoryFilter;
use crate::commands::{recompute, CmdMessage, CmdResult};
use crate::declaration::Declaration;
use crate::error::Result;
use crate::surface::{LayerSurface, LegendView};
use tracing::info;

/// Build the controller state for `declaration` and bring the renderer and the
/// legend UI in line with it: every category enabled, no `disabled` class, one
/// recompute.
pub fn run<S: LayerSurface, V: LegendView>(
    declaration: &Declaration,
    surface: &mut S,
    view: &mut V,
) -> Result<(CategoryFilter, CmdResult)> {
    let filter = CategoryFilter::build(
        declaration.layer.clone(),
        declaration.entries()?,
        &declaration.locked,
        declaration.cascades.clone(),
    )?;

    for category in filter.categories() {
        view.set_category_disabled(filter.layer(), category.key(), false);
    }

    info!(
        layer = filter.layer(),
        categories = filter.categories().len(),
        cascades = filter.cascades().len(),
        "registered category filter"
    );

    let mut result = recompute::run(&filter, surface);
    result.add_message(CmdMessage::success(format!(
        "Registered {} categories on layer '{}'",
        filter.categories().len(),
        filter.layer()
    )));

    Ok((filter, result))
}
