//! Timeout tiers and synchronizer configuration.
//!
//! All durations are stored in milliseconds so a config can be loaded from
//! JSON and tuned per suite without recompiling.

use crate::result::VerdantResult;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Named timeout tiers shared by every page interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts;

impl Timeouts {
    /// Quick probes, e.g. "is a popup there right now?"
    pub const SHORT: Duration = Duration::from_millis(1_000);
    /// Default wait for an ordinary UI reaction
    pub const DEFAULT: Duration = Duration::from_millis(5_000);
    /// Input values settling, elements disappearing
    pub const MEDIUM: Duration = Duration::from_millis(10_000);
    /// Controls becoming clickable after a page load
    pub const LONG: Duration = Duration::from_millis(60_000);
    /// Slow server-side calculations
    pub const EXTRA_LONG: Duration = Duration::from_millis(120_000);
    /// Exceptional cases only
    pub const EXTENDED: Duration = Duration::from_millis(300_000);
}

/// Default polling interval between readiness probes (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Default pause after dismissing an interstitial dialog (500ms)
pub const DEFAULT_RECOVERY_BACKOFF_MS: u64 = 500;

/// Default number of commit attempts
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;

/// Configuration for [`InteractionSynchronizer`](crate::InteractionSynchronizer)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Overall budget for an element to become interactable
    pub interactable_timeout_ms: u64,
    /// Budget for a commit trigger or dialog control to become interactable
    pub trigger_timeout_ms: u64,
    /// Bound on a single visibility / enabled query
    pub probe_timeout_ms: u64,
    /// Pause between readiness polls
    pub poll_interval_ms: u64,
    /// How long to wait for the confirmation signal after a commit
    pub confirmation_timeout_ms: u64,
    /// How long an interstitial dialog has to show up after a commit
    pub interstitial_window_ms: u64,
    /// How long a dismissed dialog has to disappear
    pub dismiss_timeout_ms: u64,
    /// Pause after a recovery before the next attempt
    pub recovery_backoff_ms: u64,
    /// Maximum number of commit actions
    pub max_attempts: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            interactable_timeout_ms: Timeouts::LONG.as_millis() as u64,
            trigger_timeout_ms: Timeouts::DEFAULT.as_millis() as u64,
            probe_timeout_ms: Timeouts::DEFAULT.as_millis() as u64,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            confirmation_timeout_ms: Timeouts::DEFAULT.as_millis() as u64,
            interstitial_window_ms: Timeouts::SHORT.as_millis() as u64,
            dismiss_timeout_ms: Timeouts::SHORT.as_millis() as u64,
            recovery_backoff_ms: DEFAULT_RECOVERY_BACKOFF_MS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl SyncConfig {
    /// Create a config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> VerdantResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON config file
    pub fn load(path: impl AsRef<Path>) -> VerdantResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Set the interactable timeout
    #[must_use]
    pub const fn with_interactable_timeout(mut self, ms: u64) -> Self {
        self.interactable_timeout_ms = ms;
        self
    }

    /// Set the trigger timeout
    #[must_use]
    pub const fn with_trigger_timeout(mut self, ms: u64) -> Self {
        self.trigger_timeout_ms = ms;
        self
    }

    /// Set the per-query probe timeout
    #[must_use]
    pub const fn with_probe_timeout(mut self, ms: u64) -> Self {
        self.probe_timeout_ms = ms;
        self
    }

    /// Set the poll interval
    #[must_use]
    pub const fn with_poll_interval(mut self, ms: u64) -> Self {
        self.poll_interval_ms = ms;
        self
    }

    /// Set the confirmation timeout
    #[must_use]
    pub const fn with_confirmation_timeout(mut self, ms: u64) -> Self {
        self.confirmation_timeout_ms = ms;
        self
    }

    /// Set the interstitial detection window
    #[must_use]
    pub const fn with_interstitial_window(mut self, ms: u64) -> Self {
        self.interstitial_window_ms = ms;
        self
    }

    /// Set the dismiss timeout
    #[must_use]
    pub const fn with_dismiss_timeout(mut self, ms: u64) -> Self {
        self.dismiss_timeout_ms = ms;
        self
    }

    /// Set the recovery backoff
    #[must_use]
    pub const fn with_recovery_backoff(mut self, ms: u64) -> Self {
        self.recovery_backoff_ms = ms;
        self
    }

    /// Set the maximum number of commit attempts
    #[must_use]
    pub const fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Interactable timeout as Duration
    #[must_use]
    pub const fn interactable_timeout(&self) -> Duration {
        Duration::from_millis(self.interactable_timeout_ms)
    }

    /// Trigger timeout as Duration
    #[must_use]
    pub const fn trigger_timeout(&self) -> Duration {
        Duration::from_millis(self.trigger_timeout_ms)
    }

    /// Probe timeout as Duration
    #[must_use]
    pub const fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    /// Poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Confirmation timeout as Duration
    #[must_use]
    pub const fn confirmation_timeout(&self) -> Duration {
        Duration::from_millis(self.confirmation_timeout_ms)
    }

    /// Interstitial window as Duration
    #[must_use]
    pub const fn interstitial_window(&self) -> Duration {
        Duration::from_millis(self.interstitial_window_ms)
    }

    /// Dismiss timeout as Duration
    #[must_use]
    pub const fn dismiss_timeout(&self) -> Duration {
        Duration::from_millis(self.dismiss_timeout_ms)
    }

    /// Recovery backoff as Duration
    #[must_use]
    pub const fn recovery_backoff(&self) -> Duration {
        Duration::from_millis(self.recovery_backoff_ms)
    }
}
