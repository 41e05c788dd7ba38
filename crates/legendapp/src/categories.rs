//! # Category State
//!
//! [`CategoryFilter`] is the state of one category filter controller: the
//! ordered categories bound to a single layer, their `enabled` flags, and the
//! master switch. It holds no reference to the renderer. Commands in
//! [`crate::commands`] read it to decide what to write and mutate it through
//! the crate-private setters, so the only way to change a flag is through
//! `toggle`, the cascade, or the master switch.
//!
//! ## Invariants checked at construction
//!
//! - keys are non-empty and unique; predicates validate;
//! - locked keys exist;
//! - every cascade member exists, no cascade contains its own parent, no child
//!   belongs to two cascades, cascades do not nest, and locked keys take no
//!   part in a cascade.

use crate::error::{LegendError, Result};
use crate::expr::Predicate;
use crate::model::FeatureAttrs;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One legend entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    key: String,
    predicate: Predicate,
    enabled: bool,
    locked: bool,
}

impl Category {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Locked categories cannot be toggled and are always enabled.
    pub fn is_locked(&self) -> bool {
        self.locked
    }
}

/// A parent category whose toggle drives a fixed set of children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cascade {
    pub parent: String,
    pub children: Vec<String>,
}

impl Cascade {
    pub fn new(parent: impl Into<String>, children: Vec<String>) -> Self {
        Self {
            parent: parent.into(),
            children,
        }
    }
}

/// What the combined filter looks like for the current flags.
#[derive(Debug, Clone, PartialEq)]
pub enum Composition {
    /// Nothing enabled: hide the layer.
    Hidden,
    /// Everything enabled: no filter at all.
    Unfiltered,
    /// OR of the enabled predicates.
    Filtered(Predicate),
}

/// Controller state for one layer.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryFilter {
    layer: String,
    categories: Vec<Category>,
    cascades: Vec<Cascade>,
    master_enabled: bool,
}

impl CategoryFilter {
    /// Build the state with every category enabled and the master switch on.
    pub fn build(
        layer: impl Into<String>,
        entries: Vec<(String, Predicate)>,
        locked: &[String],
        cascades: Vec<Cascade>,
    ) -> Result<Self> {
        let layer = layer.into();
        if layer.trim().is_empty() {
            return Err(LegendError::EmptyLayer);
        }
        if entries.is_empty() {
            return Err(LegendError::EmptyDeclaration(layer));
        }

        let mut seen = HashSet::new();
        let mut categories = Vec::with_capacity(entries.len());
        for (key, predicate) in entries {
            if key.trim().is_empty() {
                return Err(LegendError::EmptyKey);
            }
            if !seen.insert(key.clone()) {
                return Err(LegendError::DuplicateKey(key));
            }
            predicate
                .validate()
                .map_err(|reason| LegendError::InvalidPredicate {
                    key: key.clone(),
                    reason,
                })?;
            categories.push(Category {
                key,
                predicate,
                enabled: true,
                locked: false,
            });
        }

        for key in locked {
            let category = categories
                .iter_mut()
                .find(|c| &c.key == key)
                .ok_or_else(|| LegendError::UnknownCategory {
                    key: key.clone(),
                    context: "locked",
                })?;
            category.locked = true;
        }

        check_cascades(&categories, &cascades)?;

        Ok(Self {
            layer,
            categories,
            cascades,
            master_enabled: true,
        })
    }

    pub fn layer(&self) -> &str {
        &self.layer
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn cascades(&self) -> &[Cascade] {
        &self.cascades
    }

    pub fn get(&self, key: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.key == key)
    }

    pub fn is_master_enabled(&self) -> bool {
        self.master_enabled
    }

    pub fn enabled_keys(&self) -> impl Iterator<Item = &str> {
        self.categories
            .iter()
            .filter(|c| c.enabled)
            .map(|c| c.key.as_str())
    }

    /// Children driven by `key`, if it is a cascade parent.
    pub fn cascade_children(&self, key: &str) -> Option<&[String]> {
        self.cascades
            .iter()
            .find(|c| c.parent == key)
            .map(|c| c.children.as_slice())
    }

    /// The combined filter for the current flags, ignoring the master switch.
    pub fn composition(&self) -> Composition {
        let enabled: Vec<&Category> = self.categories.iter().filter(|c| c.enabled).collect();
        if enabled.is_empty() {
            Composition::Hidden
        } else if enabled.len() == self.categories.len() {
            Composition::Unfiltered
        } else {
            Composition::Filtered(Predicate::any_of(
                enabled.into_iter().map(|c| c.predicate.clone()).collect(),
            ))
        }
    }

    /// Whether the layer would render `attrs` right now, master switch included.
    pub fn renders(&self, attrs: &FeatureAttrs) -> bool {
        if !self.master_enabled {
            return false;
        }
        match self.composition() {
            Composition::Hidden => false,
            Composition::Unfiltered => true,
            Composition::Filtered(predicate) => predicate.matches(attrs),
        }
    }

    /// Keys whose predicate accepts `attrs`, regardless of their flag.
    pub fn matching_keys<'a>(&'a self, attrs: &'a FeatureAttrs) -> impl Iterator<Item = &'a str> {
        self.categories
            .iter()
            .filter(move |c| c.predicate.matches(attrs))
            .map(|c| c.key.as_str())
    }

    /// Returns `true` when the flag actually changed. Locked and unknown keys
    /// are left alone.
    pub(crate) fn set_enabled(&mut self, key: &str, enabled: bool) -> bool {
        match self.categories.iter_mut().find(|c| c.key == key) {
            Some(category) if !category.locked && category.enabled != enabled => {
                category.enabled = enabled;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn set_master(&mut self, enabled: bool) {
        self.master_enabled = enabled;
    }
}

fn check_cascades(categories: &[Category], cascades: &[Cascade]) -> Result<()> {
    let find = |key: &str| categories.iter().find(|c| c.key == key);
    let parents: HashSet<&str> = cascades.iter().map(|c| c.parent.as_str()).collect();
    let mut claimed: HashSet<&str> = HashSet::new();
    let mut seen_parents: HashSet<&str> = HashSet::new();

    for cascade in cascades {
        let invalid = |reason: String| LegendError::InvalidCascade {
            parent: cascade.parent.clone(),
            reason,
        };

        let parent = find(&cascade.parent).ok_or_else(|| LegendError::UnknownCategory {
            key: cascade.parent.clone(),
            context: "cascade parent",
        })?;
        if parent.locked {
            return Err(invalid("a locked category cannot drive a cascade".to_string()));
        }
        if !seen_parents.insert(cascade.parent.as_str()) {
            return Err(invalid("parent declared twice".to_string()));
        }
        if cascade.children.is_empty() {
            return Err(invalid("no children listed".to_string()));
        }

        for child in &cascade.children {
            let category = find(child).ok_or_else(|| LegendError::UnknownCategory {
                key: child.clone(),
                context: "cascade children",
            })?;
            if child == &cascade.parent {
                return Err(invalid("a category cannot be its own child".to_string()));
            }
            if category.locked {
                return Err(invalid(format!("child '{child}' is locked")));
            }
            if parents.contains(child.as_str()) {
                return Err(invalid(format!(
                    "child '{child}' drives its own cascade; cascades do not nest"
                )));
            }
            if !claimed.insert(child.as_str()) {
                return Err(invalid(format!(
                    "child '{child}' already belongs to another cascade"
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{Band, Bands};

    fn abc_entries() -> Vec<(String, Predicate)> {
        Bands::new(
            "w",
            vec![Band::new("A", 0.0), Band::new("B", 2.0), Band::new("C", 5.0)],
        )
        .expand()
        .unwrap()
    }

    fn abc() -> CategoryFilter {
        CategoryFilter::build("lanes", abc_entries(), &[], vec![]).unwrap()
    }

    fn keys(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn starts_fully_enabled_and_unfiltered() {
        let filter = abc();

        assert!(filter.is_master_enabled());
        assert!(filter.categories().iter().all(Category::is_enabled));
        assert_eq!(filter.composition(), Composition::Unfiltered);
    }

    #[test]
    fn partial_selection_composes_an_or() {
        let mut filter = abc();
        filter.set_enabled("A", false);

        let Composition::Filtered(predicate) = filter.composition() else {
            panic!("expected a filter");
        };
        assert_eq!(
            predicate,
            Predicate::any(vec![
                Predicate::range("w", 2.0, Some(5.0)),
                Predicate::range("w", 5.0, None),
            ])
        );
    }

    #[test]
    fn empty_selection_hides() {
        let mut filter = abc();
        for key in ["A", "B", "C"] {
            filter.set_enabled(key, false);
        }
        assert_eq!(filter.composition(), Composition::Hidden);
        assert!(!filter.renders(&FeatureAttrs::new().with("w", 3.0)));
    }

    #[test]
    fn renders_respects_master_switch() {
        let mut filter = abc();
        let feature = FeatureAttrs::new().with("w", 3.0);
        assert!(filter.renders(&feature));

        filter.set_master(false);
        assert!(!filter.renders(&feature));
    }

    #[test]
    fn matching_keys_ignore_flags() {
        let mut filter = abc();
        filter.set_enabled("B", false);
        let feature = FeatureAttrs::new().with("w", 3.0);

        assert_eq!(filter.matching_keys(&feature).collect::<Vec<_>>(), vec!["B"]);
    }

    #[test]
    fn set_enabled_skips_locked_and_unknown() {
        let mut filter =
            CategoryFilter::build("lanes", abc_entries(), &keys(&["C"]), vec![]).unwrap();

        assert!(!filter.set_enabled("C", false));
        assert!(filter.get("C").unwrap().is_enabled());
        assert!(!filter.set_enabled("nope", false));
        assert!(filter.set_enabled("A", false));
        assert!(!filter.set_enabled("A", false));
    }

    #[test]
    fn rejects_duplicate_and_empty_keys() {
        let mut entries = abc_entries();
        entries.push(("A".to_string(), Predicate::has("w")));
        assert!(matches!(
            CategoryFilter::build("lanes", entries, &[], vec![]),
            Err(LegendError::DuplicateKey(k)) if k == "A"
        ));

        let entries = vec![(" ".to_string(), Predicate::has("w"))];
        assert!(matches!(
            CategoryFilter::build("lanes", entries, &[], vec![]),
            Err(LegendError::EmptyKey)
        ));
    }

    #[test]
    fn rejects_malformed_predicate_at_build_time() {
        let entries = vec![("bad".to_string(), Predicate::range("w", 3.0, Some(1.0)))];
        assert!(matches!(
            CategoryFilter::build("lanes", entries, &[], vec![]),
            Err(LegendError::InvalidPredicate { key, .. }) if key == "bad"
        ));
    }

    #[test]
    fn rejects_empty_layer_and_empty_declaration() {
        assert!(matches!(
            CategoryFilter::build("", abc_entries(), &[], vec![]),
            Err(LegendError::EmptyLayer)
        ));
        assert!(matches!(
            CategoryFilter::build("lanes", vec![], &[], vec![]),
            Err(LegendError::EmptyDeclaration(_))
        ));
    }

    #[test]
    fn rejects_unknown_locked_key() {
        assert!(matches!(
            CategoryFilter::build("lanes", abc_entries(), &keys(&["Z"]), vec![]),
            Err(LegendError::UnknownCategory { context: "locked", .. })
        ));
    }

    #[test]
    fn rejects_bad_cascades() {
        let build = |locked: &[&str], cascades: Vec<Cascade>| {
            CategoryFilter::build("lanes", abc_entries(), &keys(locked), cascades)
        };

        assert!(matches!(
            build(&[], vec![Cascade::new("Z", keys(&["A"]))]),
            Err(LegendError::UnknownCategory { .. })
        ));
        assert!(matches!(
            build(&[], vec![Cascade::new("A", keys(&["Z"]))]),
            Err(LegendError::UnknownCategory { .. })
        ));
        assert!(matches!(
            build(&[], vec![Cascade::new("A", keys(&["A"]))]),
            Err(LegendError::InvalidCascade { .. })
        ));
        assert!(matches!(
            build(&[], vec![Cascade::new("A", vec![])]),
            Err(LegendError::InvalidCascade { .. })
        ));
        assert!(matches!(
            build(&["B"], vec![Cascade::new("A", keys(&["B"]))]),
            Err(LegendError::InvalidCascade { .. })
        ));
        assert!(matches!(
            build(&["A"], vec![Cascade::new("A", keys(&["B"]))]),
            Err(LegendError::InvalidCascade { .. })
        ));
        assert!(matches!(
            build(
                &[],
                vec![
                    Cascade::new("A", keys(&["B"])),
                    Cascade::new("B", keys(&["C"]))
                ]
            ),
            Err(LegendError::InvalidCascade { .. })
        ));
        assert!(matches!(
            build(
                &[],
                vec![
                    Cascade::new("A", keys(&["C"])),
                    Cascade::new("B", keys(&["C"]))
                ]
            ),
            Err(LegendError::InvalidCascade { .. })
        ));
    }

    #[test]
    fn cascade_children_lookup() {
        let filter = CategoryFilter::build(
            "lanes",
            abc_entries(),
            &[],
            vec![Cascade::new("A", keys(&["B", "C"]))],
        )
        .unwrap();

        assert_eq!(
            filter.cascade_children("A"),
            Some(&["B".to_string(), "C".to_string()][..])
        );
        assert_eq!(filter.cascade_children("B"), None);
    }
}
