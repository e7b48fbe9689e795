//! Layout Coordinate Generation
//!
//! Places up to [`MAX_ITEMS`] turbines (WTGs) around a base point so that
//! layout fixtures never stack two items on the same coordinate.
//!
//! Items are spread along four lanes using plain addition, 0.01° (about
//! 1.1 km) per step:
//!
//! ```text
//!                 North  (1..=5)
//!                   │
//!   West (16..=19) ─●─ East (11..=15)      ● = index 0, the base point
//!                   │
//!                 South  (6..=10)
//! ```

use crate::result::{VerdantError, VerdantResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use tracing::debug;

/// Maximum number of items supported for auto-positioning
pub const MAX_ITEMS: usize = 20;

/// Offset per lane step in degrees
pub const OFFSET_DEGREES: f64 = 0.01;

/// Latitude clamp, one degree inside the Web-Mercator limit
pub const LATITUDE_LIMIT: f64 = 84.0;

/// Longitude clamp, one degree inside the antimeridian
pub const LONGITUDE_LIMIT: f64 = 179.0;

/// Items per lane
const LANE_WIDTH: usize = 5;

/// A generated turbine position, rounded to 5 decimal places
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WtgCoordinate {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl WtgCoordinate {
    /// Create a coordinate, rounding both axes to 5 decimals
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: round5(latitude),
            longitude: round5(longitude),
        }
    }

    /// Latitude as it is typed into a form field
    #[must_use]
    pub fn latitude_text(&self) -> String {
        format!("{:.5}", self.latitude)
    }

    /// Longitude as it is typed into a form field
    #[must_use]
    pub fn longitude_text(&self) -> String {
        format!("{:.5}", self.longitude)
    }
}

impl fmt::Display for WtgCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lat {:.5}, Lon {:.5}", self.latitude, self.longitude)
    }
}

/// Direction an index is pushed away from the base point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lane {
    /// Index 0, no offset
    Base,
    /// Indices 1-5, positive latitude
    North,
    /// Indices 6-10, negative latitude
    South,
    /// Indices 11-15, positive longitude
    East,
    /// Indices 16-19, negative longitude
    West,
}

impl Lane {
    /// Lane for a validated index (`index < MAX_ITEMS`)
    #[must_use]
    pub const fn for_index(index: usize) -> Self {
        match index {
            0 => Self::Base,
            1..=5 => Self::North,
            6..=10 => Self::South,
            11..=15 => Self::East,
            _ => Self::West,
        }
    }

    /// `(lat, lon)` offset in degrees for `index` within this lane
    #[must_use]
    pub fn offset(self, index: usize) -> (f64, f64) {
        let step = |first: usize| (index + 1 - first) as f64 * OFFSET_DEGREES;
        match self {
            Self::Base => (0.0, 0.0),
            Self::North => (step(1), 0.0),
            Self::South => (-step(1 + LANE_WIDTH), 0.0),
            Self::East => (0.0, step(1 + 2 * LANE_WIDTH)),
            Self::West => (0.0, -step(1 + 3 * LANE_WIDTH)),
        }
    }
}

/// Round to 5 decimal places
fn round5(value: f64) -> f64 {
    (value * 1e5).round() / 1e5
}

/// Position of item `index` around the base point.
///
/// The result is clamped to ±[`LATITUDE_LIMIT`] / ±[`LONGITUDE_LIMIT`] and
/// rounded to 5 decimals. Index 0 is the base point itself, clamped like any other index.
///
/// # Errors
///
/// - [`VerdantError::IndexOutOfRange`] unless `0 <= index < MAX_ITEMS`
/// - [`VerdantError::InvalidBaseCoordinate`] if either base value is not finite
pub fn offset_for(index: i64, base_latitude: f64, base_longitude: f64) -> VerdantResult<WtgCoordinate> {
    let slot = usize::try_from(index)
        .ok()
        .filter(|&i| i < MAX_ITEMS)
        .ok_or(VerdantError::IndexOutOfRange {
            index,
            max: MAX_ITEMS,
        })?;

    if !base_latitude.is_finite() || !base_longitude.is_finite() {
        return Err(VerdantError::InvalidBaseCoordinate {
            latitude: base_latitude,
            longitude: base_longitude,
        });
    }

    let lane = Lane::for_index(slot);
    let (lat_offset, lon_offset) = lane.offset(slot);
    let latitude = (base_latitude + lat_offset).clamp(-LATITUDE_LIMIT, LATITUDE_LIMIT);
    let longitude = (base_longitude + lon_offset).clamp(-LONGITUDE_LIMIT, LONGITUDE_LIMIT);
    let coordinate = WtgCoordinate::new(latitude, longitude);

    debug!(
        wtg = slot + 1,
        ?lane,
        lat_offset = %format!("{lat_offset:+.3}"),
        lon_offset = %format!("{lon_offset:+.3}"),
        "WTG {}: {coordinate}",
        slot + 1
    );
    Ok(coordinate)
}

/// Positions for the first `count` items around the base point
pub fn layout(count: usize, base_latitude: f64, base_longitude: f64) -> VerdantResult<Vec<WtgCoordinate>> {
    validate(base_latitude, base_longitude)?;
    (0..count)
        .map(|i| offset_for(i as i64, base_latitude, base_longitude))
        .collect()
}

fn non_numeric() -> Option<&'static Regex> {
    static NON_NUMERIC: OnceLock<Option<Regex>> = OnceLock::new();
    NON_NUMERIC
        .get_or_init(|| Regex::new(r"[^0-9.\-]").ok())
        .as_ref()
}

/// Longest prefix of the form `-?digits[.digits]` with at least one digit
fn numeric_prefix(cleaned: &str) -> Option<&str> {
    let bytes = cleaned.as_bytes();
    let mut end = usize::from(bytes.first() == Some(&b'-'));
    let mut digits = 0;

    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
        digits += 1;
    }
    if bytes.get(end) == Some(&b'.') {
        end += 1;
        while bytes.get(end).is_some_and(u8::is_ascii_digit) {
            end += 1;
            digits += 1;
        }
    }

    (digits > 0).then(|| &cleaned[..end])
}

/// Parse a coordinate read back from an input field.
///
/// Everything except ASCII digits, `.` and `-` is dropped, then the longest
/// leading number is taken, so `"Lat: 45.844°"` parses as `45.844` and
/// `"45.8-1"` as `45.8`.
///
/// # Errors
///
/// [`VerdantError::InvalidCoordinateFormat`] if no number remains.
pub fn parse_coordinate(text: &str) -> VerdantResult<f64> {
    let invalid = || VerdantError::InvalidCoordinateFormat {
        input: text.to_string(),
    };
    let cleaned = non_numeric().ok_or_else(invalid)?.replace_all(text.trim(), "");
    numeric_prefix(&cleaned)
        .and_then(|number| number.parse::<f64>().ok())
        .filter(|value| !value.is_nan())
        .ok_or_else(invalid)
}

/// Check that base coordinates are numbers.
///
/// Range is not checked; base points come from existing projects.
///
/// # Errors
///
/// [`VerdantError::InvalidBaseCoordinate`] if either value is NaN.
pub fn validate(base_latitude: f64, base_longitude: f64) -> VerdantResult<()> {
    if base_latitude.is_nan() || base_longitude.is_nan() {
        return Err(VerdantError::InvalidBaseCoordinate {
            latitude: base_latitude,
            longitude: base_longitude,
        });
    }
    debug!(latitude = base_latitude, longitude = base_longitude, "base coordinates");
    Ok(())
}
