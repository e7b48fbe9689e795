//! CLI command definitions using clap

use crate::output::OutputFormat;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use verdant::MAX_ITEMS;

/// Verdant: layout, coordinate and environment fixtures for E2E suites
#[derive(Parser, Debug)]
#[command(name = "verdant")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (errors only in the log)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate non-overlapping WTG positions around a base point
    Layout(LayoutArgs),

    /// Parse a coordinate as read back from an input field
    Parse(ParseArgs),

    /// Show the resolved target environment
    Env(EnvArgs),

    /// Look up bidding-zone fixtures
    Zone(ZoneArgs),

    /// Random base point inside a region
    Region(RegionArgs),

    /// Show the effective synchronizer configuration
    Config(ConfigArgs),
}

/// Arguments for the layout command
#[derive(Parser, Debug)]
pub struct LayoutArgs {
    /// Base latitude (first row of the layout)
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// Base longitude (first row of the layout)
    #[arg(long, allow_negative_numbers = true)]
    pub lon: f64,

    /// Number of WTGs to place
    #[arg(short = 'n', long, default_value_t = MAX_ITEMS)]
    pub count: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the parse command
#[derive(Parser, Debug)]
pub struct ParseArgs {
    /// Raw field text, e.g. "Lat: 45.844°"
    #[arg(allow_hyphen_values = true)]
    pub text: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the env command
#[derive(Parser, Debug)]
pub struct EnvArgs {
    /// Environment name; falls back to ENV_VARS, then preprod
    #[arg(long)]
    pub env: Option<String>,

    /// Explicit base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the zone command
#[derive(Parser, Debug)]
pub struct ZoneArgs {
    /// Scenario name, e.g. "1 Bidding Zone (France)"; lists all zones if omitted
    pub name: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the region command
#[derive(Parser, Debug)]
pub struct RegionArgs {
    /// Region name (europe, asia, america)
    pub name: String,

    /// Seed for a reproducible point; derived from the clock if omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// JSON file with overrides; missing fields keep their defaults
    #[arg(long)]
    pub file: Option<PathBuf>,
}

/// Color argument
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
