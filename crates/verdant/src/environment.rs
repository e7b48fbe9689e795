//! Target environment selection.
//!
//! The environment is resolved once and passed explicitly to whatever drives
//! the browser. Nothing here is process-global or mutable after creation.

use crate::result::{VerdantError, VerdantResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Environment variable naming the target environment
pub const ENVIRONMENT_VAR: &str = "ENV_VARS";

/// Deployed environments of the application under test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development
    Dev,
    /// Quality assurance
    Qa,
    /// Pre-production (default target)
    #[default]
    Preprod,
    /// Production
    Prod,
    /// Test
    Test,
}

impl Environment {
    /// All environments in display order
    pub const ALL: [Self; 5] = [Self::Dev, Self::Qa, Self::Preprod, Self::Prod, Self::Test];

    /// Host prefix used in the base URL
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Qa => "qa",
            Self::Preprod => "preprod",
            Self::Prod => "prod",
            Self::Test => "test",
        }
    }

    /// Human-readable name
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Dev => "Development",
            Self::Qa => "Quality Assurance",
            Self::Preprod => "Pre-production",
            Self::Prod => "Production",
            Self::Test => "Test",
        }
    }

    /// Comma-separated list of valid names, for error messages
    #[must_use]
    pub fn valid_names() -> String {
        Self::ALL
            .iter()
            .map(|e| e.prefix())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefix())
    }
}

impl FromStr for Environment {
    type Err = VerdantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|e| e.prefix() == wanted)
            .ok_or_else(|| VerdantError::InvalidEnvironment {
                name: s.trim().to_string(),
                valid: Self::valid_names(),
            })
    }
}

/// Resolved environment configuration handed to the browser collaborator
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Selected environment
    pub environment: Environment,
    /// Explicit base URL, bypassing the prefix scheme
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url_override: Option<String>,
}

impl EnvironmentConfig {
    /// Create a config for an environment
    #[must_use]
    pub const fn new(environment: Environment) -> Self {
        Self {
            environment,
            base_url_override: None,
        }
    }

    /// Resolve from the `ENV_VARS` process variable (preprod when unset)
    pub fn from_env() -> VerdantResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve using an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> VerdantResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup(ENVIRONMENT_VAR) {
            Some(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => Environment::default(),
        };
        tracing::info!(
            environment = %environment,
            name = environment.display_name(),
            "resolved test environment"
        );
        Ok(Self::new(environment))
    }

    /// Override the base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url_override = Some(url.into());
        self
    }

    /// Base URL of the application under test
    #[must_use]
    pub fn base_url(&self) -> String {
        self.base_url_override
            .clone()
            .unwrap_or_else(|| format!("https://{}.mainpage.com", self.environment.prefix()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod environment_tests {
        use super::*;

        #[test]
        fn test_parse_is_case_insensitive_and_trimmed() {
            assert_eq!(" QA ".parse::<Environment>().unwrap(), Environment::Qa);
            assert_eq!("PreProd".parse::<Environment>().unwrap(), Environment::Preprod);
        }

        #[test]
        fn test_parse_unknown() {
            let err = "staging".parse::<Environment>().unwrap_err();
            let msg = err.to_string();
            assert!(msg.contains("staging"));
            assert!(msg.contains("dev, qa, preprod, prod, test"));
        }

        #[test]
        fn test_display_names() {
            assert_eq!(Environment::Qa.display_name(), "Quality Assurance");
            assert_eq!(Environment::Preprod.display_name(), "Pre-production");
        }

        #[test]
        fn test_default_is_preprod() {
            assert_eq!(Environment::default(), Environment::Preprod);
        }
    }

    mod environment_config_tests {
        use super::*;

        #[test]
        fn test_base_url_from_prefix() {
            let config = EnvironmentConfig::new(Environment::Dev);
            assert_eq!(config.base_url(), "https://dev.mainpage.com");
        }

        #[test]
        fn test_base_url_override() {
            let config =
                EnvironmentConfig::new(Environment::Qa).with_base_url("http://localhost:3000");
            assert_eq!(config.base_url(), "http://localhost:3000");
        }

        #[test]
        fn test_lookup_unset_defaults_to_preprod() {
            let config = EnvironmentConfig::from_lookup(|_| None).unwrap();
            assert_eq!(config.environment, Environment::Preprod);
        }

        #[test]
        fn test_lookup_blank_defaults_to_preprod() {
            let config = EnvironmentConfig::from_lookup(|_| Some("   ".into())).unwrap();
            assert_eq!(config.environment, Environment::Preprod);
        }

        #[test]
        fn test_lookup_reads_env_vars_key() {
            let config = EnvironmentConfig::from_lookup(|key| {
                (key == ENVIRONMENT_VAR).then(|| "prod".to_string())
            })
            .unwrap();
            assert_eq!(config.environment, Environment::Prod);
            assert_eq!(config.base_url(), "https://prod.mainpage.com");
        }

        #[test]
        fn test_lookup_invalid() {
            let err = EnvironmentConfig::from_lookup(|_| Some("nope".into())).unwrap_err();
            assert!(matches!(err, VerdantError::InvalidEnvironment { .. }));
        }

        #[test]
        fn test_serde_roundtrip_lowercase() {
            let json = serde_json::to_string(&EnvironmentConfig::new(Environment::Qa)).unwrap();
            assert_eq!(json, r#"{"environment":"qa"}"#);
        }
    }
}
