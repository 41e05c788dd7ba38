//! # Legend CLI
//!
//! The binary is intentionally thin: the CLI lives in `src/cli/`, and this file
//! only invokes `cli::run()` and handles process termination.
//!
//! ## Workspace Structure
//!
//! - `crates/legendapp/`: UI-agnostic library (declarations, controllers,
//!   commands, API facade)
//! - `crates/legend/`: this CLI, depending on `legendapp`
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/legend/src/cli/)                         │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Replay + dispatch (commands.rs)                          │
//! │  - Text / JSON rendering (render.rs)                        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (crates/legendapp/src/api.rs)                    │
//! │  - One controller per layer, owns the collaborators         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Testing Approach
//!
//! - Argument parsing and rendering: unit tests in `cli/setup.rs` and
//!   `cli/render.rs`.
//! - End to end: `tests/cli_e2e.rs` runs the binary over the built-in presets
//!   and temporary declaration files.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
