//! Result and error types for Verdant.

use thiserror::Error;

/// Result type for Verdant operations
pub type VerdantResult<T> = Result<T, VerdantError>;

/// Errors that can occur in Verdant
#[derive(Debug, Error)]
pub enum VerdantError {
    /// A collaborator wait elapsed before the expected state was reached
    #[error("Timed out after {ms}ms waiting for {what}")]
    Timeout {
        /// What was being waited for
        what: String,
        /// Timeout in milliseconds
        ms: u64,
    },

    /// Element was detached while it was being queried
    #[error("Element detached: {element}")]
    Detached {
        /// Element identity
        element: String,
    },

    /// Any other failure reported by the browser-side collaborator
    #[error("Driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// Element never appeared within the initial visibility wait
    #[error("Element not found or not visible within {timeout_ms}ms. Locator: {element}")]
    NotFound {
        /// Element identity
        element: String,
        /// Timeout in milliseconds
        timeout_ms: u64,
    },

    /// Element appeared but never became visible and enabled
    #[error(
        "Element is not clickable within {timeout_ms}ms. Visible: {visible}, Enabled: {enabled}. Locator: {element}"
    )]
    NotInteractable {
        /// Element identity
        element: String,
        /// Timeout in milliseconds
        timeout_ms: u64,
        /// Last observed visibility
        visible: bool,
        /// Last observed enabled state
        enabled: bool,
    },

    /// Commit-with-recovery ran out of attempts without a confirmation
    #[error("Commit failed after {attempts} attempt(s) ({recoveries} interstitial(s) handled): {source}")]
    RetryExhausted {
        /// Attempts used
        attempts: usize,
        /// Interstitial dialogs dismissed along the way
        recoveries: usize,
        /// Error from the final attempt
        #[source]
        source: Box<VerdantError>,
    },

    /// Observed option values do not match the expected ones
    #[error("{message}")]
    ValueMismatch {
        /// Match mode that failed
        mode: crate::verify::MatchMode,
        /// Mismatch description
        message: String,
    },

    /// Element was in the wrong enabled state
    #[error("Element {element} expected {expected} but was {actual}")]
    UnexpectedState {
        /// Element identity
        element: String,
        /// Expected state ("enabled" or "disabled")
        expected: &'static str,
        /// Observed state
        actual: &'static str,
    },

    /// Layout index outside the supported range
    #[error("Index {index} out of range: maximum {max} items supported for auto-positioning")]
    IndexOutOfRange {
        /// Requested index
        index: i64,
        /// Number of supported items
        max: usize,
    },

    /// Base coordinate is not a finite number
    #[error("Invalid coordinates: Lat {latitude}, Lon {longitude}")]
    InvalidBaseCoordinate {
        /// Base latitude
        latitude: f64,
        /// Base longitude
        longitude: f64,
    },

    /// Coordinate text could not be parsed
    #[error("Invalid coordinate value: {input:?}")]
    InvalidCoordinateFormat {
        /// Raw input text
        input: String,
    },

    /// Unknown fixture region
    #[error("Unsupported region: {name}. Available regions: {available}")]
    UnknownRegion {
        /// Requested region
        name: String,
        /// Comma-separated list of known regions
        available: String,
    },

    /// Unknown bidding zone fixture
    #[error("Unknown bidding zone: {name}. Available zones: {available}")]
    UnknownBiddingZone {
        /// Requested zone
        name: String,
        /// Comma-separated list of known zones
        available: String,
    },

    /// Unknown target environment
    #[error("Invalid environment: {name}. Valid options: {valid}")]
    InvalidEnvironment {
        /// Requested environment
        name: String,
        /// Comma-separated list of valid environments
        valid: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VerdantError {
    /// Create a driver error
    #[must_use]
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }

    /// Create a timeout error
    #[must_use]
    pub fn timeout(what: impl Into<String>, ms: u64) -> Self {
        Self::Timeout {
            what: what.into(),
            ms,
        }
    }

    /// Check if this is a collaborator timeout
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Check if this error comes from invalid coordinate input
    #[must_use]
    pub const fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::IndexOutOfRange { .. }
                | Self::InvalidBaseCoordinate { .. }
                | Self::InvalidCoordinateFormat { .. }
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_not_interactable_reports_last_state() {
        let err = VerdantError::NotInteractable {
            element: "button#save".into(),
            timeout_ms: 60_000,
            visible: true,
            enabled: false,
        };
        let msg = err.to_string();
        assert!(msg.contains("Visible: true"));
        assert!(msg.contains("Enabled: false"));
        assert!(msg.contains("button#save"));
    }

    #[test]
    fn test_retry_exhausted_keeps_source() {
        let err = VerdantError::RetryExhausted {
            attempts: 3,
            recoveries: 1,
            source: Box::new(VerdantError::timeout("success alert", 5000)),
        };
        assert!(err.to_string().contains("3 attempt(s)"));
        assert!(err.to_string().contains("1 interstitial(s)"));
        let source = err.source().unwrap();
        assert!(source.to_string().contains("success alert"));
    }

    #[test]
    fn test_predicates() {
        assert!(VerdantError::timeout("x", 1).is_timeout());
        assert!(!VerdantError::driver("boom").is_timeout());
        assert!(VerdantError::IndexOutOfRange { index: 20, max: 20 }.is_invalid_input());
        assert!(VerdantError::InvalidCoordinateFormat { input: "abc".into() }.is_invalid_input());
        assert!(!VerdantError::driver("boom").is_invalid_input());
    }

    #[test]
    fn test_unexpected_state_message() {
        let err = VerdantError::UnexpectedState {
            element: "button#results".into(),
            expected: "enabled",
            actual: "disabled",
        };
        assert_eq!(
            err.to_string(),
            "Element button#results expected enabled but was disabled"
        );
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: VerdantError = io_err.into();
        assert!(err.to_string().contains("I/O"));
    }
}
