//! Verdant: UI Synchronization for Renewable-Project E2E Suites
//!
//! Verdant makes browser steps against an eventually-consistent UI
//! deterministic, and generates non-overlapping turbine layouts for project
//! fixtures.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    VERDANT Architecture                          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌─────────────────┐    ┌───────────────┐    │
//! │   │ Step defs  │    │ Interaction     │    │ ElementHandle │    │
//! │   │ / page     │───►│ Synchronizer    │───►│ (browser or   │    │
//! │   │ objects    │    │ (wait, commit)  │    │  MockElement) │    │
//! │   └─────┬──────┘    └─────────────────┘    └───────────────┘    │
//! │         │           ┌─────────────────┐                         │
//! │         └──────────►│ coords / geo    │  layout fixtures        │
//! │                     └─────────────────┘                         │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use verdant::prelude::*;
//!
//! # async fn save(save: &dyn ElementHandle, alert: &dyn ElementHandle,
//! #               dialog: &dyn ElementHandle, cancel: &dyn ElementHandle) -> VerdantResult<()> {
//! let sync = InteractionSynchronizer::default();
//! let outcome = sync
//!     .commit_with_recovery(save, alert, Interstitial::new(dialog, cancel))
//!     .await?;
//! assert!(outcome.succeeded);
//!
//! let third = offset_for(2, 45.844, -0.808)?;
//! assert_eq!(third.latitude_text(), "45.86400");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

/// Timeout tiers and synchronizer configuration
pub mod config;

/// Turbine layout coordinates
pub mod coords;

/// Element capability consumed by the synchronizer
#[allow(clippy::missing_errors_doc)]
pub mod element;

/// Target environment selection
pub mod environment;

/// Region and bidding-zone location fixtures
pub mod geo;

/// Scriptable elements for tests
#[allow(clippy::missing_errors_doc, clippy::must_use_candidate)]
pub mod mock;

mod result;

/// Readiness waits and commit-with-recovery
#[allow(clippy::missing_errors_doc)]
pub mod sync;

/// Option-list checks and sensitive-input detection
pub mod verify;

pub use config::{SyncConfig, Timeouts};
pub use coords::{
    layout, offset_for, parse_coordinate, validate, Lane, WtgCoordinate, LATITUDE_LIMIT,
    LONGITUDE_LIMIT, MAX_ITEMS, OFFSET_DEGREES,
};
pub use element::{DialogChoice, ElementHandle, ElementState, Interstitial, Readiness};
pub use environment::{Environment, EnvironmentConfig, ENVIRONMENT_VAR};
pub use geo::{bidding_zone, random_coordinates, BiddingZone, Region, Seed, BIDDING_ZONES};
pub use mock::MockElement;
pub use result::{VerdantError, VerdantResult};
pub use sync::{CommitState, InteractionSynchronizer, RetryOutcome, WaitResult, WAIT_GRACE};
pub use verify::{
    display_value, is_sensitive, verify_values, InputAttributes, MatchMode, MASKED,
    SENSITIVE_PATTERNS,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::config::*;
    pub use super::coords::*;
    pub use super::element::*;
    pub use super::environment::*;
    pub use super::geo::*;
    pub use super::result::*;
    pub use super::sync::*;
    pub use super::verify::*;
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::prelude::*;
    use super::MockElement;

    #[tokio::test(start_paused = true)]
    async fn test_prelude_covers_a_save_step() {
        let save = MockElement::new("button#save");
        let alert = MockElement::hidden("div.alert-success");
        let dialog = MockElement::hidden("dialog");
        let cancel = MockElement::new("button.cancel");
        save.on_click({
            let alert = alert.clone();
            move |_| alert.set_visible(true)
        });

        let outcome = InteractionSynchronizer::default()
            .commit_with_recovery(&save, &alert, Interstitial::new(&dialog, &cancel))
            .await
            .unwrap();
        assert_eq!(outcome.attempts_used, 1);
    }

    #[test]
    fn test_layout_from_bidding_zone() {
        let zone = bidding_zone("1 Bidding Zone (France)").unwrap();
        let coords = layout(3, zone.coordinate.latitude, zone.coordinate.longitude).unwrap();
        assert_eq!(coords[0], zone.coordinate);
        assert_eq!(coords[2].latitude_text(), "45.86400");
    }
}
