//! Verdant CLI: fixture helpers for renewable-project E2E suites
//!
//! ## Usage
//!
//! ```bash
//! verdant layout --lat 45.844 --lon -0.808 -n 5   # WTG positions
//! verdant parse "Lat: 45.844°"                     # field text -> number
//! verdant env --env qa                             # base URL for qa
//! verdant zone "1 Bidding Zone (France)"           # bidding-zone fixture
//! verdant region europe --seed 42                  # reproducible base point
//! ```

use clap::Parser;
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};
use verdant::{
    bidding_zone, layout, parse_coordinate, random_coordinates, EnvironmentConfig, Region, Seed,
    SyncConfig, BIDDING_ZONES, MAX_ITEMS,
};
use verdant_cli::{
    logging, Cli, CliConfig, CliError, CliResult, ColorChoice, Commands, ConfigArgs, EnvArgs,
    LayoutArgs, ParseArgs, RegionArgs, Renderer, Verbosity, ZoneArgs,
};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = build_config(&cli);
    logging::init(&config);

    let output = match cli.command {
        Commands::Layout(args) => run_layout(&config, &args)?,
        Commands::Parse(args) => run_parse(&config, &args)?,
        Commands::Env(args) => run_env(&config, args)?,
        Commands::Zone(args) => run_zone(&config, &args)?,
        Commands::Region(args) => run_region(&config, &args)?,
        Commands::Config(args) => run_config(&args)?,
    };
    print!("{output}");
    if !output.ends_with('\n') {
        println!();
    }
    Ok(())
}

fn build_config(cli: &Cli) -> CliConfig {
    let color: ColorChoice = cli.color.clone().into();
    CliConfig::new()
        .with_verbosity(Verbosity::from_flags(cli.quiet, cli.verbose))
        .with_color(color)
        .with_json_logs(cli.log_json)
}

fn run_layout(config: &CliConfig, args: &LayoutArgs) -> CliResult<String> {
    if args.count == 0 || args.count > MAX_ITEMS {
        return Err(CliError::invalid_argument(format!(
            "count must be between 1 and {MAX_ITEMS}, got {}",
            args.count
        )));
    }
    let coords = layout(args.count, args.lat, args.lon)?;
    tracing::info!(count = coords.len(), "generated layout");
    Renderer::new(args.format, config.color.should_color()).layout(&coords)
}

fn run_parse(config: &CliConfig, args: &ParseArgs) -> CliResult<String> {
    let value = parse_coordinate(&args.text)?;
    Renderer::new(args.format, config.color.should_color()).parsed(&args.text, value)
}

fn run_env(config: &CliConfig, args: EnvArgs) -> CliResult<String> {
    let mut env = match args.env {
        Some(name) => EnvironmentConfig::new(name.parse()?),
        None => EnvironmentConfig::from_env()?,
    };
    if let Some(url) = args.base_url {
        env = env.with_base_url(url);
    }
    Renderer::new(args.format, config.color.should_color()).environment(&env)
}

fn run_zone(config: &CliConfig, args: &ZoneArgs) -> CliResult<String> {
    let renderer = Renderer::new(args.format, config.color.should_color());
    match &args.name {
        Some(name) => renderer.zones(&[bidding_zone(name)?]),
        None => renderer.zones(&BIDDING_ZONES),
    }
}

fn run_region(config: &CliConfig, args: &RegionArgs) -> CliResult<String> {
    let region: Region = args.name.parse()?;
    let seed = Seed::from_u64(args.seed.unwrap_or_else(clock_seed));
    let point = random_coordinates(region, seed);
    tracing::info!(%region, seed = seed.value(), %point, "generated region point");
    Renderer::new(args.format, config.color.should_color()).region_point(region, seed, &point)
}

fn run_config(args: &ConfigArgs) -> CliResult<String> {
    let sync = match &args.file {
        Some(path) => SyncConfig::load(path)?,
        None => SyncConfig::default(),
    };
    Renderer::sync_config(&sync)
}

/// Seed from wall-clock nanoseconds; printed with the point so runs can be replayed
fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(1, |elapsed| elapsed.as_nanos() as u64)
}
