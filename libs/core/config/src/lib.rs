pub mod server;
pub mod tracing;

use std::env;
use thiserror::Error;

/// Configuration error type
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable '{0}' is required but not set")]
    MissingEnvVar(String),

    #[error("Failed to parse environment variable '{key}': {details}")]
    ParseError { key: String, details: String },
}

/// Deployment environment. Drives log format and mail transport selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Development, // Local Mailpit/MailHog
    Production,  // Real provider
}

impl Environment {
    pub fn from_env() -> Self {
        let app_env = env_or_default("APP_ENV", "development");

        if app_env.eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

/// Static name/version of the running binary, reported by health endpoints.
#[derive(Clone, Copy, Debug)]
pub struct AppInfo {
    pub name: &'static str,
    pub version: &'static str,
}

/// Build an [`AppInfo`] from the calling crate's Cargo metadata.
#[macro_export]
macro_rules! app_info {
    () => {
        $crate::AppInfo {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
        }
    };
}

/// Trait for configuration that can be loaded from environment variables
pub trait FromEnv: Sized {
    fn from_env() -> Result<Self, ConfigError>;
}

/// Helper to load and parse environment variable with a default value
pub fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Helper to load and parse environment variable or return error
pub fn env_required(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Read an environment variable, treating unset and non-unicode values as absent.
pub fn env_optional(key: &str) -> Option<String> {
    env::var(key).ok()
}

/// Read a comma separated list. Unset yields `None`; blank entries are dropped.
pub fn env_list(key: &str) -> Option<Vec<String>> {
    env_optional(key).map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    })
}

/// Parse a boolean-ish flag (`true`/`1`, case-insensitive). Unset yields `default`.
pub fn env_flag(key: &str, default: bool) -> bool {
    env_optional(key)
        .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_defaults_to_development() {
        temp_env::with_var_unset("APP_ENV", || {
            let env = Environment::from_env();
            assert_eq!(env, Environment::Development);
            assert!(env.is_development());
            assert!(!env.is_production());
        });
    }

    #[test]
    fn test_environment_production_case_insensitive() {
        for value in ["production", "PRODUCTION", "Production"] {
            temp_env::with_var("APP_ENV", Some(value), || {
                assert_eq!(Environment::from_env(), Environment::Production);
            });
        }
    }

    #[test]
    fn test_environment_unknown_defaults_to_development() {
        temp_env::with_var("APP_ENV", Some("staging"), || {
            assert_eq!(Environment::from_env(), Environment::Development);
        });
    }

    #[test]
    fn test_env_required_missing() {
        temp_env::with_var_unset("NOTIFIER_MISSING_REQUIRED", || {
            let err = env_required("NOTIFIER_MISSING_REQUIRED").unwrap_err();
            assert!(err.to_string().contains("NOTIFIER_MISSING_REQUIRED"));
            assert!(err.to_string().contains("required"));
        });
    }

    #[test]
    fn test_env_or_default_without_value() {
        temp_env::with_var_unset("NOTIFIER_MISSING_VAR", || {
            assert_eq!(env_or_default("NOTIFIER_MISSING_VAR", "fallback"), "fallback");
        });
    }

    #[test]
    fn test_env_list_splits_and_trims() {
        temp_env::with_var("NOTIFIER_LIST", Some(" email, sms ,,feed "), || {
            assert_eq!(
                env_list("NOTIFIER_LIST"),
                Some(vec!["email".to_string(), "sms".to_string(), "feed".to_string()])
            );
        });
    }

    #[test]
    fn test_env_list_unset_is_none() {
        temp_env::with_var_unset("NOTIFIER_LIST_UNSET", || {
            assert_eq!(env_list("NOTIFIER_LIST_UNSET"), None);
        });
    }

    #[test]
    fn test_env_list_empty_is_empty_vec() {
        temp_env::with_var("NOTIFIER_LIST_EMPTY", Some(""), || {
            assert_eq!(env_list("NOTIFIER_LIST_EMPTY"), Some(Vec::new()));
        });
    }

    #[test]
    fn test_env_flag() {
        temp_env::with_var("NOTIFIER_FLAG", Some("TRUE"), || {
            assert!(env_flag("NOTIFIER_FLAG", false));
        });
        temp_env::with_var("NOTIFIER_FLAG", Some("1"), || {
            assert!(env_flag("NOTIFIER_FLAG", false));
        });
        temp_env::with_var("NOTIFIER_FLAG", Some("no"), || {
            assert!(!env_flag("NOTIFIER_FLAG", true));
        });
        temp_env::with_var_unset("NOTIFIER_FLAG", || {
            assert!(env_flag("NOTIFIER_FLAG", true));
        });
    }

    #[test]
    fn test_app_info_macro_uses_crate_metadata() {
        let info = app_info!();
        assert_eq!(info.name, "core_config");
        assert!(!info.version.is_empty());
    }
}
