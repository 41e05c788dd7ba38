//! Category predicates.
//!
//! A [`Predicate`] is a small boolean expression over feature attributes. It can
//! be evaluated locally ([`Predicate::matches`]) and lowered to the JSON filter
//! expression the renderer understands ([`Predicate::to_expression`]). Both
//! views must agree: whatever `matches` accepts is what the lowered expression
//! renders.
//!
//! The renderer fails a whole filter when a numeric comparison meets a
//! non-number, so comparisons and ranges are lowered behind a `typeof` guard
//! that turns those features into a plain `false`.

use crate::model::FeatureAttrs;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Numeric comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
}

impl Comparison {
    pub fn symbol(self) -> &'static str {
        match self {
            Comparison::Lt => "<",
            Comparison::Le => "<=",
            Comparison::Gt => ">",
            Comparison::Ge => ">=",
        }
    }

    fn holds(self, lhs: f64, rhs: f64) -> bool {
        match self {
            Comparison::Lt => lhs < rhs,
            Comparison::Le => lhs <= rhs,
            Comparison::Gt => lhs > rhs,
            Comparison::Ge => lhs >= rhs,
        }
    }
}

/// Boolean expression over a feature's attributes.
///
/// Predicates are total: an absent (or null) attribute never raises, it simply
/// fails `has`, `equals`, comparisons and ranges, and satisfies `missing`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Predicate {
    /// Every sub-predicate holds.
    All { of: Vec<Predicate> },
    /// At least one sub-predicate holds.
    Any { of: Vec<Predicate> },
    /// Negation.
    Not { of: Box<Predicate> },
    /// Attribute is present and not null.
    Has { attr: String },
    /// Attribute is absent or null.
    Missing { attr: String },
    /// Attribute equals a value. Numbers compare by value (`3 == 3.0`).
    #[serde(rename = "equals")]
    Eq { attr: String, value: Value },
    /// Numeric comparison against a constant.
    Compare {
        attr: String,
        cmp: Comparison,
        value: f64,
    },
    /// Half-open numeric interval `[min, max)`, or `[min, ∞)` without `max`.
    Range {
        attr: String,
        min: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
}

impl Predicate {
    pub fn all(of: Vec<Predicate>) -> Self {
        Predicate::All { of }
    }

    pub fn any(of: Vec<Predicate>) -> Self {
        Predicate::Any { of }
    }

    pub fn not(of: Predicate) -> Self {
        Predicate::Not { of: Box::new(of) }
    }

    pub fn has(attr: impl Into<String>) -> Self {
        Predicate::Has { attr: attr.into() }
    }

    pub fn missing(attr: impl Into<String>) -> Self {
        Predicate::Missing { attr: attr.into() }
    }

    pub fn equals(attr: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Eq {
            attr: attr.into(),
            value: value.into(),
        }
    }

    pub fn compare(attr: impl Into<String>, cmp: Comparison, value: f64) -> Self {
        Predicate::Compare {
            attr: attr.into(),
            cmp,
            value,
        }
    }

    pub fn range(attr: impl Into<String>, min: f64, max: Option<f64>) -> Self {
        Predicate::Range {
            attr: attr.into(),
            min,
            max,
        }
    }

    /// Logical OR of `preds`, collapsing the single-operand case.
    pub fn any_of(mut preds: Vec<Predicate>) -> Self {
        if preds.len() == 1 {
            preds.remove(0)
        } else {
            Predicate::any(preds)
        }
    }

    /// Evaluate against a feature.
    pub fn matches(&self, attrs: &FeatureAttrs) -> bool {
        match self {
            Predicate::All { of } => of.iter().all(|p| p.matches(attrs)),
            Predicate::Any { of } => of.iter().any(|p| p.matches(attrs)),
            Predicate::Not { of } => !of.matches(attrs),
            Predicate::Has { attr } => is_present(attrs, attr),
            Predicate::Missing { attr } => !is_present(attrs, attr),
            Predicate::Eq { attr, value } => attrs
                .get(attr)
                .is_some_and(|actual| values_equal(actual, value)),
            Predicate::Compare { attr, cmp, value } => attrs
                .number(attr)
                .is_some_and(|actual| cmp.holds(actual, *value)),
            Predicate::Range { attr, min, max } => attrs
                .number(attr)
                .is_some_and(|actual| actual >= *min && max.map_or(true, |max| actual < max)),
        }
    }

    /// Reject predicates the renderer would misinterpret or that can never be
    /// meaningful. Called once at registration.
    pub fn validate(&self) -> std::result::Result<(), String> {
        match self {
            Predicate::All { of } | Predicate::Any { of } => {
                if of.is_empty() {
                    return Err("'all'/'any' needs at least one operand".to_string());
                }
                of.iter().try_for_each(Predicate::validate)
            }
            Predicate::Not { of } => of.validate(),
            Predicate::Has { attr } | Predicate::Missing { attr } => check_attr(attr),
            Predicate::Eq { attr, value } => {
                check_attr(attr)?;
                if value.is_null() {
                    return Err(format!("use 'missing' instead of comparing '{attr}' to null"));
                }
                Ok(())
            }
            Predicate::Compare { attr, value, .. } => {
                check_attr(attr)?;
                if !value.is_finite() {
                    return Err(format!("comparison value on '{attr}' must be finite"));
                }
                Ok(())
            }
            Predicate::Range { attr, min, max } => {
                check_attr(attr)?;
                if !min.is_finite() {
                    return Err(format!("range start on '{attr}' must be finite"));
                }
                match max {
                    Some(max) if !max.is_finite() => Err(format!(
                        "range end on '{attr}' must be finite (omit it for an open range)"
                    )),
                    Some(max) if max <= min => {
                        Err(format!("range [{min}, {max}) on '{attr}' is empty"))
                    }
                    _ => Ok(()),
                }
            }
        }
    }

    /// Lower to a renderer filter expression.
    pub fn to_expression(&self) -> Value {
        match self {
            Predicate::All { of } => prefixed("all", of),
            Predicate::Any { of } => prefixed("any", of),
            Predicate::Not { of } => json!(["!", of.to_expression()]),
            Predicate::Has { attr } => json!(["all", has_expr(attr), ["!=", get_expr(attr), null]]),
            Predicate::Missing { attr } => json!([
                "any",
                ["==", get_expr(attr), null],
                ["!", has_expr(attr)]
            ]),
            Predicate::Eq { attr, value } => json!(["==", get_expr(attr), value]),
            Predicate::Compare { attr, cmp, value } => json!([
                "all",
                number_guard(attr),
                [cmp.symbol(), get_expr(attr), value]
            ]),
            Predicate::Range { attr, min, max } => {
                let mut parts = vec![
                    json!("all"),
                    number_guard(attr),
                    json!([">=", get_expr(attr), min]),
                ];
                if let Some(max) = max {
                    parts.push(json!(["<", get_expr(attr), max]));
                }
                Value::Array(parts)
            }
        }
    }
}

fn is_present(attrs: &FeatureAttrs, attr: &str) -> bool {
    attrs.get(attr).is_some_and(|v| !v.is_null())
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        _ => a == b,
    }
}

fn check_attr(attr: &str) -> std::result::Result<(), String> {
    if attr.trim().is_empty() {
        Err("attribute name must not be empty".to_string())
    } else {
        Ok(())
    }
}

fn get_expr(attr: &str) -> Value {
    json!(["get", attr])
}

fn has_expr(attr: &str) -> Value {
    json!(["has", attr])
}

fn number_guard(attr: &str) -> Value {
    json!(["==", ["typeof", get_expr(attr)], "number"])
}

fn prefixed(op: &str, of: &[Predicate]) -> Value {
    let mut parts = Vec::with_capacity(of.len() + 1);
    parts.push(json!(op));
    parts.extend(of.iter().map(Predicate::to_expression));
    Value::Array(parts)
}
