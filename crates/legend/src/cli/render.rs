//! Output for each command, as colored text or pretty JSON.
//!
//! Renderers build strings rather than printing, so they can be tested with
//! canned state. Messages from the library go to stderr via
//! [`print_messages`], keeping stdout clean for `--format json`.

use colored::Colorize;
use legendapp::categories::{Category, CategoryFilter};
use legendapp::commands::{CmdMessage, MessageLevel};
use legendapp::config::OutputFormat;
use legendapp::model::{FeatureAttrs, Visibility};
use serde::Serialize;
use serde_json::{json, Value};

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => eprintln!("{}", message.content.dimmed()),
            MessageLevel::Success => eprintln!("{}", message.content.green()),
            MessageLevel::Warning => eprintln!("{}", message.content.yellow()),
        }
    }
}

#[derive(Serialize)]
struct CategoryRow<'a> {
    key: &'a str,
    enabled: bool,
    locked: bool,
    expression: Value,
}

impl<'a> From<&'a Category> for CategoryRow<'a> {
    fn from(category: &'a Category) -> Self {
        Self {
            key: category.key(),
            enabled: category.is_enabled(),
            locked: category.is_locked(),
            expression: category.predicate().to_expression(),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub(super) fn check(
    source: &str,
    filter: &CategoryFilter,
    format: OutputFormat,
) -> anyhow::Result<String> {
    let locked: Vec<&str> = filter
        .categories()
        .iter()
        .filter(|c| c.is_locked())
        .map(Category::key)
        .collect();

    match format {
        OutputFormat::Json => to_json(&json!({
            "source": source,
            "layer": filter.layer(),
            "categories": filter.categories().len(),
            "locked": locked,
            "cascades": filter.cascades(),
        })),
        OutputFormat::Text => {
            let mut out = format!(
                "{} {}: {} categories on layer '{}'\n",
                "✓".green(),
                source,
                filter.categories().len(),
                filter.layer().bold()
            );
            if !locked.is_empty() {
                out.push_str(&format!("  locked: {}\n", locked.join(", ")));
            }
            for cascade in filter.cascades() {
                out.push_str(&format!(
                    "  cascade: {} -> {}\n",
                    cascade.parent,
                    cascade.children.join(", ")
                ));
            }
            Ok(out)
        }
    }
}

pub(super) fn show(filter: &CategoryFilter, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => {
            let rows: Vec<CategoryRow> =
                filter.categories().iter().map(CategoryRow::from).collect();
            to_json(&json!({
                "layer": filter.layer(),
                "master_enabled": filter.is_master_enabled(),
                "categories": rows,
            }))
        }
        OutputFormat::Text => {
            let master = if filter.is_master_enabled() {
                "on".green()
            } else {
                "off".red()
            };
            let mut out = format!("{} (master {})\n", filter.layer().bold(), master);
            let width = filter
                .categories()
                .iter()
                .map(|c| c.key().chars().count())
                .max()
                .unwrap_or(0);

            for category in filter.categories() {
                let mark = if category.is_enabled() { "[x]" } else { "[ ]" };
                let key = format!("{:width$}", category.key());
                let key = if category.is_enabled() {
                    key.normal()
                } else {
                    key.dimmed()
                };
                let lock = if category.is_locked() { " (locked)" } else { "" };
                out.push_str(&format!(
                    "  {mark} {key}  {}{}\n",
                    category.predicate().to_expression().to_string().dimmed(),
                    lock.yellow()
                ));
            }
            Ok(out)
        }
    }
}

pub(super) fn filter(
    layer: &str,
    visibility: Option<Visibility>,
    expression: Option<&Value>,
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => to_json(&json!({
            "layer": layer,
            "visibility": visibility,
            "filter": expression,
        })),
        OutputFormat::Text => {
            let visibility = match visibility {
                Some(Visibility::Visible) => "visible".green(),
                Some(Visibility::Hidden) => "none".red(),
                None => "missing".yellow(),
            };
            let expression = match expression {
                Some(expr) => serde_json::to_string_pretty(expr)?,
                None => "(none)".dimmed().to_string(),
            };
            Ok(format!(
                "layer:      {}\nvisibility: {}\nfilter:     {}\n",
                layer.bold(),
                visibility,
                expression
            ))
        }
    }
}

pub(super) fn eval(
    filter: &CategoryFilter,
    attrs: &FeatureAttrs,
    format: OutputFormat,
) -> anyhow::Result<String> {
    let matching: Vec<&str> = filter.matching_keys(attrs).collect();
    let renders = filter.renders(attrs);

    match format {
        OutputFormat::Json => to_json(&json!({
            "feature": attrs,
            "matching": matching,
            "renders": renders,
        })),
        OutputFormat::Text => {
            let matching = if matching.is_empty() {
                "(none)".dimmed().to_string()
            } else {
                matching.join(", ")
            };
            let renders = if renders { "yes".green() } else { "no".red() };
            Ok(format!("matches: {matching}\nrenders: {renders}\n"))
        }
    }
}

pub(super) fn presets(names: &[&str], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => to_json(&names),
        OutputFormat::Text => Ok(names.iter().map(|n| format!("{n}\n")).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use legendapp::declaration::Declaration;

    fn nettobreite() -> CategoryFilter {
        let decl = Declaration::preset("nettobreite").unwrap();
        CategoryFilter::build(decl.layer.clone(), decl.entries().unwrap(), &decl.locked, vec![])
            .unwrap()
    }

    #[test]
    fn show_json_lists_every_category() {
        let out = show(&nettobreite(), OutputFormat::Json).unwrap();
        let parsed: Value = serde_json::from_str(&out).unwrap();

        assert_eq!(parsed["layer"], "nettobreite");
        assert_eq!(parsed["master_enabled"], true);
        assert_eq!(parsed["categories"].as_array().unwrap().len(), 11);
        assert_eq!(parsed["categories"][10]["key"], "no-width");
    }

    #[test]
    fn show_text_marks_enabled_categories() {
        let out = show(&nettobreite(), OutputFormat::Text).unwrap();
        assert!(out.contains("[x]"));
        assert!(out.contains("very-wide-8plus"));
    }

    #[test]
    fn filter_json_reports_missing_filter_as_null() {
        let out =
            filter("nettobreite", Some(Visibility::Visible), None, OutputFormat::Json).unwrap();
        let parsed: Value = serde_json::from_str(&out).unwrap();

        assert_eq!(parsed["visibility"], "visible");
        assert_eq!(parsed["filter"], Value::Null);
    }

    #[test]
    fn eval_json_reports_matches() {
        let attrs = FeatureAttrs::new().with("width_effective", 4.2);
        let out = eval(&nettobreite(), &attrs, OutputFormat::Json).unwrap();
        let parsed: Value = serde_json::from_str(&out).unwrap();

        assert_eq!(parsed["matching"], json!(["narrow-4-45"]));
        assert_eq!(parsed["renders"], true);
    }

    #[test]
    fn presets_text_is_one_per_line() {
        assert_eq!(presets(&["a", "b"], OutputFormat::Text).unwrap(), "a\nb\n");
    }
}
