//! # CLI Behavior
//!
//! This is **one possible UI client** for legendapp, not the application
//! itself. Where the browser binding turns clicks into API calls, the CLI turns
//! flags into the same calls against an in-memory map.
//!
//! For the overall architecture, see the `legendapp` crate documentation.
//!
//! ## Replay
//!
//! `show`, `filter` and `eval` register the declaration, apply every
//! `--toggle KEY` in the order given (as if the legend entry had been clicked),
//! and finally switch the master checkbox off when `--master-off` is set.
//! Unknown or locked keys behave as in the browser: nothing happens, and a
//! note is printed to stderr.
//!
//! ## Declarations
//!
//! Commands take a TOML file, or `--preset NAME` for a built-in declaration.
//! With neither, the preset from configuration (`LEGEND_PRESET`) is used.
//!
//! ## Module Structure
//!
//! - `commands`: Context setup, replay and dispatch
//! - `render`: Text and JSON output
//! - `setup`: Argument parsing via clap, help text

mod commands;
mod render;
pub mod setup;

pub use commands::run;
