use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use legendapp::config::OutputFormat;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "legend",
    bin_name = "legend",
    version,
    disable_help_subcommand = true,
    after_help = "Declarations are TOML files; use `legend presets` to list the built-in ones."
)]
#[command(about = "Inspect and replay map legend category filters", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (TOML)
    #[arg(long, global = true, value_name = "FILE", help_heading = "Options")]
    pub config: Option<PathBuf>,

    /// Output format [default: from config, else text]
    #[arg(long, global = true, value_enum, help_heading = "Options")]
    pub format: Option<FormatArg>,

    /// Verbose logging (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count, help_heading = "Options")]
    pub verbose: u8,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a declaration
    #[command(display_order = 1)]
    Check {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// List categories and their state after replaying toggles
    #[command(display_order = 2)]
    Show {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        replay: ReplayArgs,
    },

    /// Print the filter and visibility the map would receive
    #[command(display_order = 3)]
    Filter {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        replay: ReplayArgs,
    },

    /// Check which categories accept a synthetic feature
    #[command(display_order = 4)]
    Eval {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        replay: ReplayArgs,

        /// Feature attribute; VALUE is read as JSON when it parses, else as a string
        #[arg(long = "attr", value_name = "NAME=VALUE", required = true, value_parser = parse_attr)]
        attrs: Vec<(String, serde_json::Value)>,
    },

    /// List built-in declarations
    #[command(display_order = 5)]
    Presets,
}

#[derive(Args, Debug, Default)]
pub struct SourceArgs {
    /// Declaration file (TOML)
    #[arg(value_name = "DECLARATION")]
    pub declaration: Option<PathBuf>,

    /// Use a built-in declaration instead of a file
    #[arg(long, value_name = "NAME", conflicts_with = "declaration")]
    pub preset: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct ReplayArgs {
    /// Toggle a category, in order (repeatable)
    #[arg(short = 't', long = "toggle", value_name = "KEY")]
    pub toggles: Vec<String>,

    /// Switch the layer's master checkbox off after the toggles
    #[arg(long)]
    pub master_off: bool,
}

fn parse_attr(raw: &str) -> Result<(String, serde_json::Value), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing attribute name in '{raw}'"));
    }
    let value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
    Ok((name.to_string(), value))
}
