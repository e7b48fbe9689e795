//! Verdant CLI Library
//!
//! Command-line access to the Verdant fixtures: turbine layouts, coordinate
//! parsing, environment resolution, bidding zones and region points.

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod config;
mod error;
pub mod logging;
mod output;

pub use commands::{
    Cli, ColorArg, Commands, ConfigArgs, EnvArgs, LayoutArgs, ParseArgs, RegionArgs, ZoneArgs,
};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{OutputFormat, Renderer};
