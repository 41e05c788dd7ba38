//! # Filter Expressions
//!
//! Category predicates and the banded-range shorthand used to declare numeric
//! category families.
//!
//! | Op | Meaning |
//! |----|---------|
//! | `all` / `any` / `not` | Boolean combinators |
//! | `has` / `missing` | Attribute presence (`null` counts as missing) |
//! | `equals` | Value equality, numbers by value |
//! | `compare` | `<`, `<=`, `>`, `>=` against a constant |
//! | `range` | Half-open `[min, max)`, or `[min, ∞)` |
//!
//! Every predicate both evaluates locally and lowers to the renderer's JSON
//! filter expression, so tests can check what a filter accepts without a
//! renderer.

mod bands;
mod predicate;

pub use bands::{Band, Bands};
pub use predicate::{Comparison, Predicate};
