//! # CLI Layer
//!
//! This module is **one possible client** of legendapp. It replays legend
//! clicks against an in-memory map so a declaration can be checked and its
//! filters inspected without a browser.
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Initializes logging
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: clap, in `setup.rs`
//! 2. **Context Setup**: configuration, logging, the declaration
//! 3. **Replay**: register, apply `--toggle` in order, then `--master-off`
//! 4. **Output Formatting**: `render.rs`
//! 5. **Error Handling**: errors bubble up as `anyhow` with context, `main`
//!    prints them and exits 1

use super::render;
use super::setup::{Cli, Commands, ReplayArgs, SourceArgs};
use anyhow::{bail, Context, Result};
use clap::Parser;
use legendapp::api::LegendApi;
use legendapp::config::{LegendConfig, OutputFormat};
use legendapp::declaration::Declaration;
use legendapp::model::FeatureAttrs;
use legendapp::surface::memory::{MemorySurface, MemoryView};
use legendapp::surface::LayerSurface;
use tracing::debug;
use tracing_subscriber::EnvFilter;

type Session = LegendApi<MemorySurface, MemoryView>;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config =
        LegendConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let format = cli.format.map(OutputFormat::from).unwrap_or(config.format);
    debug!(%format, "configuration loaded");

    let output = match &cli.command {
        Commands::Presets => {
            let names: Vec<&str> = Declaration::preset_names().collect();
            render::presets(&names, format)?
        }
        Commands::Check { source } => {
            let (label, declaration) = load_declaration(source, &config)?;
            let session = replay(&declaration, &ReplayArgs::default())?;
            render::check(&label, bound(&session, &declaration)?, format)?
        }
        Commands::Show { source, replay: args } => {
            let (_, declaration) = load_declaration(source, &config)?;
            let session = replay(&declaration, args)?;
            render::show(bound(&session, &declaration)?, format)?
        }
        Commands::Filter { source, replay: args } => {
            let (_, declaration) = load_declaration(source, &config)?;
            let session = replay(&declaration, args)?;
            let layer = declaration.layer.as_str();
            render::filter(
                layer,
                session.surface().visibility(layer),
                session.surface().filter(layer),
                format,
            )?
        }
        Commands::Eval {
            source,
            replay: args,
            attrs,
        } => {
            let (_, declaration) = load_declaration(source, &config)?;
            let session = replay(&declaration, args)?;
            let feature: FeatureAttrs = attrs.iter().cloned().collect();
            render::eval(bound(&session, &declaration)?, &feature, format)?
        }
    };

    print!("{output}");
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Resolve the declaration: a path, then `--preset`, then the configured preset.
fn load_declaration(source: &SourceArgs, config: &LegendConfig) -> Result<(String, Declaration)> {
    if let Some(path) = &source.declaration {
        let declaration = Declaration::load(path)
            .with_context(|| format!("Failed to read declaration {}", path.display()))?;
        return Ok((path.display().to_string(), declaration));
    }

    let Some(name) = source.preset.as_ref().or(config.preset.as_ref()) else {
        bail!("No declaration given: pass a file, --preset NAME, or set LEGEND_PRESET");
    };
    let declaration =
        Declaration::preset(name).with_context(|| format!("Failed to load preset '{name}'"))?;
    Ok((format!("preset '{name}'"), declaration))
}

/// Register against a fresh in-memory map holding the declaration's layer,
/// then replay the requested clicks.
fn replay(declaration: &Declaration, args: &ReplayArgs) -> Result<Session> {
    let surface = MemorySurface::new().with_layer(declaration.layer.as_str());
    let mut session = LegendApi::new(surface, MemoryView::new());

    let registered = session
        .register(declaration)
        .context("Invalid declaration")?;
    debug!(messages = registered.messages.len(), "declaration registered");

    for key in &args.toggles {
        let result = session.toggle(&declaration.layer, key);
        render::print_messages(&result.messages);
    }
    if args.master_off {
        session.set_master_enabled(&declaration.layer, false);
    }
    Ok(session)
}

fn bound<'a>(
    session: &'a Session,
    declaration: &Declaration,
) -> Result<&'a legendapp::categories::CategoryFilter> {
    session
        .filter(&declaration.layer)
        .with_context(|| format!("No category filter on layer '{}'", declaration.layer))
}
