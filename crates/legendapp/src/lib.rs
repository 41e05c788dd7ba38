//! # Legend Architecture
//!
//! Legendapp is a **UI-agnostic legend filtering library** for a vector tile
//! map viewer. Clicking legend entries turns categories of features on and off;
//! this crate turns those clicks into one combined filter expression and one
//! visibility flag per map layer. It is not tied to a browser: the map and the
//! legend DOM are collaborators behind traits.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Client (browser binding, or the `legend` CLI)              │
//! │  - Wires UI events to API calls                             │
//! │  - The ONLY place that knows about stdout/DOM/exit codes    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands, one controller per layer      │
//! │  - Owns the collaborators: the single writer of filters     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Toggle, cascade, recompute, master switch, groups, zoom  │
//! │  - Operates on CategoryFilter, returns CmdResult            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Surface Layer (surface/)                                   │
//! │  - LayerSurface (map) and LegendView (legend UI) traits     │
//! │  - MemorySurface / MemoryView for tests and the CLI         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Declarations
//!
//! A category family is described once, in TOML or with the builder on
//! [`declaration::Declaration`]: the layer, the categories and their
//! predicates, locked keys, and cascades. Everything that can be wrong with a
//! declaration is rejected when it is registered; after that, UI events can
//! only ever be no-ops or state changes, never errors.
//!
//! ## The Recompute
//!
//! Whatever changes, the layer ends up in one of three states:
//!
//! - no category enabled: layer hidden;
//! - every category enabled: layer visible, no filter;
//! - otherwise: layer visible, filter = OR of the enabled predicates.
//!
//! ## Testing Strategy
//!
//! 1. **Commands** (`commands/*.rs`): exact renderer write sequences against
//!    [`surface::memory::MemorySurface`]. Most tests live here.
//! 2. **API** (`api.rs`): properties spanning commands, checked over every
//!    subset of categories.
//! 3. **CLI** (`legend` crate): end-to-end runs over the built-in presets.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Logic for each operation
//! - [`categories`]: Controller state (`CategoryFilter`) and its invariants
//! - [`declaration`]: Declaration format and built-in presets
//! - [`expr`]: Predicates and band ranges, evaluation and lowering
//! - [`surface`]: Renderer and legend UI abstractions
//! - [`model`]: Core data types (`Visibility`, `FeatureAttrs`)
//! - [`config`]: Client configuration
//! - [`error`]: Error types

pub mod api;
pub mod categories;
pub mod commands;
pub mod config;
pub mod declaration;
pub mod error;
pub mod expr;
pub mod model;
pub mod surface;
