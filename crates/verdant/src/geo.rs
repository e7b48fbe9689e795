//! Location fixtures for project setup.
//!
//! Random base points inside a region, and fixed points for bidding-zone
//! scenarios. Randomness is seeded so a failing run can be replayed.

#![allow(clippy::unreadable_literal)]

use crate::coords::WtgCoordinate;
use crate::result::{VerdantError, VerdantResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Deterministic seed for reproducible fixtures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Seed(u64);

impl Seed {
    /// Create a seed from a u64 value
    #[must_use]
    pub const fn from_u64(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw seed value
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

/// Draws discarded before sampling
const WARM_UP_ROUNDS: usize = 4;

/// Simple xorshift64 PRNG
#[derive(Debug, Clone)]
struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    const fn new(seed: Seed) -> Self {
        // xorshift is stuck at zero
        let state = if seed.0 == 0 { 1 } else { seed.0 };
        Self { state }
    }

    fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform in `[0, 1)` from the top 53 bits
    fn next_f64(&mut self) -> f64 {
        (self.next() >> 11) as f64 / (1u64 << 53) as f64
    }

    #[allow(clippy::suboptimal_flops)]
    fn next_range(&mut self, (min, max): (f64, f64)) -> f64 {
        min + self.next_f64() * (max - min)
    }
}

/// Regions projects can be created in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    /// Europe
    Europe,
    /// Asia
    Asia,
    /// North and South America
    America,
}

impl Region {
    /// All regions
    pub const ALL: [Self; 3] = [Self::Europe, Self::Asia, Self::America];

    /// Lowercase name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Europe => "europe",
            Self::Asia => "asia",
            Self::America => "america",
        }
    }

    /// Latitude bounds `(min, max)`
    #[must_use]
    pub const fn latitude_bounds(self) -> (f64, f64) {
        match self {
            Self::Europe => (44.0, 50.1),
            Self::Asia => (5.0, 77.0),
            Self::America => (-56.0, 71.0),
        }
    }

    /// Longitude bounds `(min, max)`
    #[must_use]
    pub const fn longitude_bounds(self) -> (f64, f64) {
        match self {
            Self::Europe => (0.0, 15.2),
            Self::Asia => (60.0, 180.0),
            Self::America => (-170.0, -30.0),
        }
    }

    /// Check that a coordinate lies within the region bounds
    #[must_use]
    pub fn contains(self, coordinate: &WtgCoordinate) -> bool {
        let (lat_min, lat_max) = self.latitude_bounds();
        let (lon_min, lon_max) = self.longitude_bounds();
        (lat_min..=lat_max).contains(&coordinate.latitude)
            && (lon_min..=lon_max).contains(&coordinate.longitude)
    }

    fn available() -> String {
        Self::ALL.map(Self::name).join(", ")
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Region {
    type Err = VerdantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|r| r.name() == wanted)
            .ok_or_else(|| VerdantError::UnknownRegion {
                name: s.trim().to_string(),
                available: Self::available(),
            })
    }
}

/// Random point inside `region`, rounded to 5 decimals.
///
/// The same seed always yields the same point.
#[must_use]
pub fn random_coordinates(region: Region, seed: Seed) -> WtgCoordinate {
    let mut rng = Xorshift64::new(seed);
    // Small seeds produce small first outputs
    for _ in 0..WARM_UP_ROUNDS {
        rng.next();
    }
    let latitude = rng.next_range(region.latitude_bounds());
    let longitude = rng.next_range(region.longitude_bounds());
    WtgCoordinate::new(latitude, longitude)
}

/// A fixed location used for bidding-zone scenarios
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BiddingZone {
    /// Scenario name as it appears in feature files
    pub name: &'static str,
    /// Location inside the zone
    pub coordinate: WtgCoordinate,
    /// Region the location belongs to
    pub region: Region,
}

/// Known bidding-zone fixtures
pub const BIDDING_ZONES: [BiddingZone; 3] = [
    BiddingZone {
        name: "1 Bidding Zone (France)",
        coordinate: WtgCoordinate {
            latitude: 45.844,
            longitude: -0.808,
        },
        region: Region::Europe,
    },
    BiddingZone {
        name: "No Bidding Zone (Austria)",
        coordinate: WtgCoordinate {
            latitude: 47.91341,
            longitude: 14.89598,
        },
        region: Region::Europe,
    },
    BiddingZone {
        name: "2 Bidding Zones (Andorra)",
        coordinate: WtgCoordinate {
            latitude: 42.50718,
            longitude: 1.53382,
        },
        region: Region::Europe,
    },
];

/// Look up a bidding-zone fixture by its exact scenario name
pub fn bidding_zone(name: &str) -> VerdantResult<BiddingZone> {
    BIDDING_ZONES
        .iter()
        .find(|zone| zone.name == name)
        .copied()
        .ok_or_else(|| VerdantError::UnknownBiddingZone {
            name: name.to_string(),
            available: BIDDING_ZONES.map(|zone| zone.name).join(", "),
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod region_tests {
        use super::*;

        #[test]
        fn test_parse() {
            assert_eq!("europe".parse::<Region>().unwrap(), Region::Europe);
            assert_eq!(" Asia ".parse::<Region>().unwrap(), Region::Asia);
        }

        #[test]
        fn test_parse_unknown_lists_available() {
            let err = "africa".parse::<Region>().unwrap_err();
            assert_eq!(
                err.to_string(),
                "Unsupported region: africa. Available regions: europe, asia, america"
            );
        }

        #[test]
        fn test_bounds() {
            assert_eq!(Region::Europe.latitude_bounds(), (44.0, 50.1));
            assert_eq!(Region::America.longitude_bounds(), (-170.0, -30.0));
        }
    }

    mod random_tests {
        use super::*;

        #[test]
        fn test_zero_seed_is_usable() {
            let mut rng = Xorshift64::new(Seed::from_u64(0));
            assert_ne!(rng.next(), 0);
        }

        #[test]
        fn test_same_seed_same_point() {
            let seed = Seed::from_u64(42);
            assert_eq!(
                random_coordinates(Region::Asia, seed),
                random_coordinates(Region::Asia, seed)
            );
        }

        #[test]
        fn test_different_seeds_differ() {
            assert_ne!(
                random_coordinates(Region::Europe, Seed::from_u64(1)),
                random_coordinates(Region::Europe, Seed::from_u64(2))
            );
        }
    }

    mod bidding_zone_tests {
        use super::*;

        #[test]
        fn test_lookup() {
            let zone = bidding_zone("No Bidding Zone (Austria)").unwrap();
            assert_eq!(zone.coordinate.latitude, 47.91341);
            assert_eq!(zone.coordinate.longitude, 14.89598);
            assert_eq!(zone.region, Region::Europe);
        }

        #[test]
        fn test_unknown_lists_available() {
            let err = bidding_zone("3 Bidding Zones").unwrap_err();
            let msg = err.to_string();
            assert!(msg.contains("Unknown bidding zone: 3 Bidding Zones"));
            assert!(msg.contains("1 Bidding Zone (France)"));
            assert!(msg.contains("2 Bidding Zones (Andorra)"));
        }

        #[test]
        fn test_region_box_is_not_exhaustive() {
            let austria = bidding_zone("No Bidding Zone (Austria)").unwrap();
            assert!(austria.region.contains(&austria.coordinate));
            // West of the Greenwich meridian, outside the random-point box.
            let france = bidding_zone("1 Bidding Zone (France)").unwrap();
            assert!(!france.region.contains(&france.coordinate));
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_random_point_within_region(seed in any::<u64>(), index in 0usize..3) {
                let region = Region::ALL[index];
                let point = random_coordinates(region, Seed::from_u64(seed));
                prop_assert!(region.contains(&point));
            }
        }
    }
}
