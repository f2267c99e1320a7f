//! # Runtime Configuration Module
//!
//! Environment-driven settings read once at startup.
//!
//! ## Environment Variables
//!
//! ### `SWITCHYARD_ROUTES`
//!
//! Path of a route table file (see [`crate::config`]). When unset the
//! application runs with the default routes only.
//!
//! ### `SWITCHYARD_DEFAULT_ACTION`
//!
//! Action used when dispatch parameters carry none. Default: `index`.
//!
//! ### `SWITCHYARD_HOT_RELOAD`
//!
//! `true` to watch the route table file and swap the router when it changes.
//! Default: `false`. Meant for development.
//!
//! ## Usage
//!
//! ```rust
//! use switchyard::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! println!("Default action: {}", config.default_action);
//! ```

use std::env;
use std::path::PathBuf;

use crate::app::DEFAULT_ACTION;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Route table file, if any.
    pub routes_path: Option<PathBuf>,
    /// Action used when none is given (default: `index`).
    pub default_action: String,
    /// Watch `routes_path` for changes.
    pub hot_reload: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            routes_path: None,
            default_action: DEFAULT_ACTION.to_string(),
            hot_reload: false,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary lookup (tests, embedding).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            routes_path: lookup("SWITCHYARD_ROUTES")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            default_action: lookup("SWITCHYARD_DEFAULT_ACTION")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.default_action),
            hot_reload: lookup("SWITCHYARD_HOT_RELOAD")
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.hot_reload),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_unset() {
        let config = RuntimeConfig::from_lookup(|_| None);
        assert_eq!(config, RuntimeConfig::default());
    }

    #[test]
    fn test_reads_all_keys() {
        let vars: HashMap<&str, &str> = [
            ("SWITCHYARD_ROUTES", "config/routes.yaml"),
            ("SWITCHYARD_DEFAULT_ACTION", "list"),
            ("SWITCHYARD_HOT_RELOAD", "yes"),
        ]
        .into_iter()
        .collect();
        let config = RuntimeConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.routes_path, Some(PathBuf::from("config/routes.yaml")));
        assert_eq!(config.default_action, "list");
        assert!(config.hot_reload);
    }

    #[test]
    fn test_unparseable_bool_falls_back() {
        let config = RuntimeConfig::from_lookup(|k| {
            (k == "SWITCHYARD_HOT_RELOAD").then(|| "maybe".to_string())
        });
        assert!(!config.hot_reload);
    }
}
