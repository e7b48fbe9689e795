//! Output formatting for command results

use crate::error::CliResult;
use clap::ValueEnum;
use console::style;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use verdant::{
    BiddingZone, EnvironmentConfig, Lane, Region, Seed, SyncConfig, WtgCoordinate,
};

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON output
    Json,
}

/// One row of a generated layout
#[derive(Debug, Clone, Serialize)]
struct LayoutRow {
    wtg: usize,
    lane: Lane,
    latitude: String,
    longitude: String,
}

/// Renders command results to strings
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    format: OutputFormat,
    use_color: bool,
}

impl Renderer {
    /// Create a renderer
    #[must_use]
    pub const fn new(format: OutputFormat, use_color: bool) -> Self {
        Self { format, use_color }
    }

    fn label(&self, text: &str) -> String {
        style(text).bold().force_styling(self.use_color).to_string()
    }

    fn value(&self, text: &str) -> String {
        style(text).cyan().force_styling(self.use_color).to_string()
    }

    /// Render a layout; coordinates are in index order
    pub fn layout(&self, coords: &[WtgCoordinate]) -> CliResult<String> {
        let rows: Vec<LayoutRow> = coords
            .iter()
            .enumerate()
            .map(|(i, c)| LayoutRow {
                wtg: i + 1,
                lane: Lane::for_index(i),
                latitude: c.latitude_text(),
                longitude: c.longitude_text(),
            })
            .collect();

        if self.format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(&rows)?);
        }

        let mut out = String::new();
        for row in &rows {
            let lane = format!("{:?}", row.lane);
            let _ = writeln!(
                out,
                "{} {:>2}  {:<5}  Lat {}  Lon {}",
                self.label("WTG"),
                row.wtg,
                lane,
                self.value(&row.latitude),
                self.value(&row.longitude),
            );
        }
        Ok(out)
    }

    /// Render a parsed coordinate
    pub fn parsed(&self, input: &str, value: f64) -> CliResult<String> {
        if self.format == OutputFormat::Json {
            let json = serde_json::json!({ "input": input, "value": value });
            return Ok(serde_json::to_string_pretty(&json)?);
        }
        Ok(format!("{value}\n"))
    }

    /// Render a resolved environment
    pub fn environment(&self, config: &EnvironmentConfig) -> CliResult<String> {
        let env = config.environment;
        if self.format == OutputFormat::Json {
            let json = serde_json::json!({
                "environment": env,
                "name": env.display_name(),
                "base_url": config.base_url(),
            });
            return Ok(serde_json::to_string_pretty(&json)?);
        }
        Ok(format!(
            "{} {} ({})\n{} {}\n",
            self.label("Environment:"),
            self.value(env.prefix()),
            env.display_name(),
            self.label("Base URL:"),
            self.value(&config.base_url()),
        ))
    }

    /// Render bidding-zone fixtures
    pub fn zones(&self, zones: &[BiddingZone]) -> CliResult<String> {
        if self.format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(zones)?);
        }
        let mut out = String::new();
        for zone in zones {
            let _ = writeln!(
                out,
                "{}  Lat {}  Lon {}  ({})",
                self.label(zone.name),
                self.value(&zone.coordinate.latitude_text()),
                self.value(&zone.coordinate.longitude_text()),
                zone.region,
            );
        }
        Ok(out)
    }

    /// Render a random region point with the seed that produced it
    pub fn region_point(&self, region: Region, seed: Seed, point: &WtgCoordinate) -> CliResult<String> {
        if self.format == OutputFormat::Json {
            let json = serde_json::json!({
                "region": region,
                "seed": seed.value(),
                "latitude": point.latitude_text(),
                "longitude": point.longitude_text(),
            });
            return Ok(serde_json::to_string_pretty(&json)?);
        }
        Ok(format!(
            "{}  Lat {}  Lon {}  (seed {})\n",
            self.label(region.name()),
            self.value(&point.latitude_text()),
            self.value(&point.longitude_text()),
            seed.value(),
        ))
    }

    /// Render the synchronizer configuration (always JSON)
    pub fn sync_config(config: &SyncConfig) -> CliResult<String> {
        Ok(serde_json::to_string_pretty(config)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use verdant::{bidding_zone, layout, Environment};

    fn text() -> Renderer {
        Renderer::new(OutputFormat::Text, false)
    }

    fn json() -> Renderer {
        Renderer::new(OutputFormat::Json, false)
    }

    mod layout_tests {
        use super::*;

        #[test]
        fn test_text_rows() {
            let coords = layout(2, 45.844, -0.808).unwrap();
            let out = text().layout(&coords).unwrap();
            let lines: Vec<&str> = out.lines().collect();
            assert_eq!(lines.len(), 2);
            assert_eq!(lines[0], "WTG  1  Base   Lat 45.84400  Lon -0.80800");
            assert_eq!(lines[1], "WTG  2  North  Lat 45.85400  Lon -0.80800");
        }

        #[test]
        fn test_json_rows() {
            let coords = layout(12, 45.844, -0.808).unwrap();
            let out = json().layout(&coords).unwrap();
            let rows: serde_json::Value = serde_json::from_str(&out).unwrap();
            assert_eq!(rows[11]["wtg"], 12);
            assert_eq!(rows[11]["lane"], "East");
            assert_eq!(rows[11]["longitude"], "-0.79800");
        }

        #[test]
        fn test_no_escape_codes_without_color() {
            let coords = layout(1, 1.0, 2.0).unwrap();
            assert!(!text().layout(&coords).unwrap().contains('\u{1b}'));
        }
    }

    mod other_tests {
        use super::*;

        #[test]
        fn test_parsed() {
            assert_eq!(text().parsed("Lat: 45.844°", 45.844).unwrap(), "45.844\n");
            let out = json().parsed("x", 1.5).unwrap();
            assert!(out.contains("\"value\": 1.5"));
        }

        #[test]
        fn test_environment() {
            let config = EnvironmentConfig::new(Environment::Qa);
            let out = text().environment(&config).unwrap();
            assert!(out.contains("qa (Quality Assurance)"));
            assert!(out.contains("https://qa.mainpage.com"));

            let out = json().environment(&config).unwrap();
            let value: serde_json::Value = serde_json::from_str(&out).unwrap();
            assert_eq!(value["environment"], "qa");
        }

        #[test]
        fn test_zones() {
            let zone = bidding_zone("2 Bidding Zones (Andorra)").unwrap();
            let out = text().zones(&[zone]).unwrap();
            assert!(out.contains("Lat 42.50718  Lon 1.53382  (europe)"));
        }

        #[test]
        fn test_region_point_mentions_seed() {
            let point = WtgCoordinate::new(45.0, 5.0);
            let out = text()
                .region_point(Region::Europe, Seed::from_u64(9), &point)
                .unwrap();
            assert!(out.contains("(seed 9)"));
        }

        #[test]
        fn test_sync_config() {
            let out = Renderer::sync_config(&SyncConfig::default()).unwrap();
            assert!(out.contains("\"max_attempts\": 3"));
        }
    }
}
