//! Option-list checks and sensitive-input detection.
//!
//! [`verify_values`] compares the options a dropdown rendered with the list a
//! step expects. [`is_sensitive`] decides whether an input's value may be
//! written to the log.

use crate::result::{VerdantError, VerdantResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Logged in place of a sensitive input value
pub const MASKED: &str = "[MASKED]";

/// Substrings of name, id, placeholder or aria-label that mark an input as
/// sensitive (matched against the lowercased attributes)
pub const SENSITIVE_PATTERNS: [&str; 9] = [
    "password",
    "passwd",
    "passphrase",
    "secret",
    "token",
    "apikey",
    "api-key",
    "api_key",
    "credential",
];

/// How observed values are compared with the expected ones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchMode {
    /// Same values, same order, same count
    #[default]
    ExactOrder,
    /// Every expected value is present, in any order
    ContainsAll,
    /// Expected values are a subset of the observed ones
    Subset,
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::ExactOrder => "exact order",
            Self::ContainsAll => "contains all",
            Self::Subset => "subset",
        };
        write!(f, "{name}")
    }
}

/// Compare rendered option texts with the expected values.
///
/// Observed values are trimmed and blank ones dropped before comparing.
/// With `case_sensitive == false` both sides are lowercased.
///
/// # Errors
///
/// [`VerdantError::ValueMismatch`] describing the first difference found.
pub fn verify_values<E, A>(
    expected: &[E],
    actual: &[A],
    mode: MatchMode,
    case_sensitive: bool,
) -> VerdantResult<()>
where
    E: AsRef<str>,
    A: AsRef<str>,
{
    let normalize = |value: &str| {
        if case_sensitive {
            value.to_string()
        } else {
            value.to_lowercase()
        }
    };
    let actual: Vec<String> = actual
        .iter()
        .map(|value| value.as_ref().trim())
        .filter(|value| !value.is_empty())
        .map(normalize)
        .collect();
    let expected: Vec<String> = expected.iter().map(|v| normalize(v.as_ref())).collect();
    debug!(?actual, ?expected, %mode, "verifying values");

    let suffix = if case_sensitive { "" } else { " (case-insensitive)" };
    let mismatch = |message: String| VerdantError::ValueMismatch { mode, message };
    let missing = || -> Vec<&str> {
        expected
            .iter()
            .filter(|value| !actual.contains(value))
            .map(String::as_str)
            .collect()
    };

    match mode {
        MatchMode::ExactOrder => {
            if actual.len() != expected.len() {
                return Err(mismatch(format!(
                    "Values count mismatch: Found {} options, Expected {} options",
                    actual.len(),
                    expected.len()
                )));
            }
            if let Some((i, (found, wanted))) = actual
                .iter()
                .zip(&expected)
                .enumerate()
                .find(|(_, (found, wanted))| found != wanted)
            {
                return Err(mismatch(format!(
                    "Option mismatch at position {}: Found \"{found}\", Expected \"{wanted}\"{suffix}",
                    i + 1
                )));
            }
        }
        MatchMode::ContainsAll => {
            let missing = missing();
            if !missing.is_empty() {
                return Err(mismatch(format!(
                    "Missing expected values: [{}]{suffix}",
                    missing.join(", ")
                )));
            }
        }
        MatchMode::Subset => {
            let missing = missing();
            if !missing.is_empty() {
                return Err(mismatch(format!(
                    "Expected values not found: [{}]. Available options: [{}]{suffix}",
                    missing.join(", "),
                    actual.join(", ")
                )));
            }
        }
    }

    info!(%mode, count = expected.len(), "values verification passed");
    Ok(())
}

/// Attributes that decide whether an input holds sensitive data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputAttributes {
    /// `type` attribute
    pub input_type: Option<String>,
    /// `name` attribute
    pub name: Option<String>,
    /// `id` attribute
    pub id: Option<String>,
    /// `placeholder` attribute
    pub placeholder: Option<String>,
    /// `aria-label` attribute
    pub aria_label: Option<String>,
}

impl InputAttributes {
    /// Attribute names read from an element, in field order
    pub const NAMES: [&'static str; 5] = ["type", "name", "id", "placeholder", "aria-label"];
}

/// True for password inputs and inputs whose name, id, placeholder or
/// aria-label mentions a [`SENSITIVE_PATTERNS`] entry
#[must_use]
pub fn is_sensitive(attrs: &InputAttributes) -> bool {
    if attrs.input_type.as_deref() == Some("password") {
        return true;
    }
    let combined = [&attrs.name, &attrs.id, &attrs.placeholder, &attrs.aria_label]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    SENSITIVE_PATTERNS
        .iter()
        .any(|pattern| combined.contains(pattern))
}

/// `text`, or [`MASKED`] when `sensitive`
#[must_use]
pub fn display_value(text: &str, sensitive: bool) -> &str {
    if sensitive {
        MASKED
    } else {
        text
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    const TURBINES: [&str; 3] = ["Vestas V150", "Enercon E-138", "Nordex N163"];

    fn message(err: VerdantError) -> String {
        match err {
            VerdantError::ValueMismatch { message, .. } => message,
            other => panic!("expected ValueMismatch, got {other:?}"),
        }
    }

    mod exact_order_tests {
        use super::*;

        #[test]
        fn test_same_values_pass_ignoring_case_and_padding() {
            let actual = [" vestas v150 ", "ENERCON E-138", "", "Nordex N163"];
            verify_values(&TURBINES, &actual, MatchMode::ExactOrder, false).unwrap();
        }

        #[test]
        fn test_count_mismatch() {
            let err = verify_values(&TURBINES, &TURBINES[..2], MatchMode::ExactOrder, false)
                .unwrap_err();
            assert_eq!(
                message(err),
                "Values count mismatch: Found 2 options, Expected 3 options"
            );
        }

        #[test]
        fn test_order_mismatch_names_position() {
            let actual = ["Vestas V150", "Nordex N163", "Enercon E-138"];
            let err = verify_values(&TURBINES, &actual, MatchMode::ExactOrder, false).unwrap_err();
            assert_eq!(
                message(err),
                "Option mismatch at position 2: Found \"nordex n163\", Expected \"enercon e-138\" (case-insensitive)"
            );
        }

        #[test]
        fn test_case_sensitive() {
            let actual = ["vestas v150", "Enercon E-138", "Nordex N163"];
            let err = verify_values(&TURBINES, &actual, MatchMode::ExactOrder, true).unwrap_err();
            let msg = message(err);
            assert!(msg.starts_with("Option mismatch at position 1"));
            assert!(!msg.contains("case-insensitive"));
        }
    }

    mod contains_tests {
        use super::*;

        #[test]
        fn test_contains_all_any_order() {
            let actual = ["Nordex N163", "Vestas V150", "Enercon E-138", "GE 2.8"];
            verify_values(&TURBINES, &actual, MatchMode::ContainsAll, false).unwrap();
        }

        #[test]
        fn test_contains_all_lists_missing() {
            let err = verify_values(&TURBINES, &["Vestas V150"], MatchMode::ContainsAll, false)
                .unwrap_err();
            assert_eq!(
                message(err),
                "Missing expected values: [enercon e-138, nordex n163] (case-insensitive)"
            );
        }

        #[test]
        fn test_subset_lists_available() {
            let err = verify_values(
                &["Vestas V150", "Siemens SG 6.6"],
                &TURBINES,
                MatchMode::Subset,
                true,
            )
            .unwrap_err();
            assert_eq!(
                message(err),
                "Expected values not found: [Siemens SG 6.6]. Available options: [Vestas V150, Enercon E-138, Nordex N163]"
            );
        }

        #[test]
        fn test_mode_is_reported() {
            let err = verify_values(&["x"], &TURBINES, MatchMode::Subset, false).unwrap_err();
            assert!(matches!(
                err,
                VerdantError::ValueMismatch {
                    mode: MatchMode::Subset,
                    ..
                }
            ));
        }

        #[test]
        fn test_display() {
            assert_eq!(MatchMode::ContainsAll.to_string(), "contains all");
            assert_eq!(MatchMode::default(), MatchMode::ExactOrder);
        }
    }

    mod sensitive_tests {
        use super::*;

        #[test]
        fn test_password_type() {
            let attrs = InputAttributes {
                input_type: Some("password".into()),
                ..InputAttributes::default()
            };
            assert!(is_sensitive(&attrs));
        }

        #[test]
        fn test_patterns_in_any_attribute() {
            let attrs = InputAttributes {
                aria_label: Some("Client Secret".into()),
                ..InputAttributes::default()
            };
            assert!(is_sensitive(&attrs));
            let attrs = InputAttributes {
                id: Some("api-key-field".into()),
                ..InputAttributes::default()
            };
            assert!(is_sensitive(&attrs));
        }

        #[test]
        fn test_plain_inputs() {
            let attrs = InputAttributes {
                input_type: Some("text".into()),
                name: Some("projectName".into()),
                placeholder: Some("Enter project name".into()),
                ..InputAttributes::default()
            };
            assert!(!is_sensitive(&attrs));
            assert!(!is_sensitive(&InputAttributes::default()));
        }

        #[test]
        fn test_display_value() {
            assert_eq!(display_value("hunter2", true), MASKED);
            assert_eq!(display_value("Windpark Nord", false), "Windpark Nord");
        }
    }
}
