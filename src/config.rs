use std::env;
use std::time::Duration;

use crate::error::{env_var_error, Error};

/// Value shipped in sample `.env` files; treated the same as a missing key.
pub const PLACEHOLDER_API_KEY: &str = "your_api_key_here";

pub const DEFAULT_GOOGLE_MAPS_API_BASE: &str = "maps.googleapis.com";
pub const DEFAULT_NOMINATIM_API_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_OSRM_API_URL: &str = "https://router.project-osrm.org";
pub const DEFAULT_USER_AGENT: &str = "AgriLogix-App";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Settings for the outbound mapping providers.
///
/// Built once at startup and handed to [`crate::resolver::RouteResolver`];
/// nothing below reads the process environment on its own.
#[derive(Clone, Debug)]
pub struct Config {
    pub google_maps_api_key: Option<String>,
    pub google_maps_api_base: String,
    pub nominatim_api_url: String,
    pub osrm_api_url: String,
    pub user_agent: String,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            google_maps_api_key: None,
            google_maps_api_base: DEFAULT_GOOGLE_MAPS_API_BASE.into(),
            nominatim_api_url: DEFAULT_NOMINATIM_API_URL.into(),
            osrm_api_url: DEFAULT_OSRM_API_URL.into(),
            user_agent: DEFAULT_USER_AGENT.into(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let request_timeout = match lookup("ROUTING_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    env_var_error(format!("ROUTING_TIMEOUT_SECS is not a number: {}", raw))
                })?;
                if secs == 0 {
                    return Err(env_var_error("ROUTING_TIMEOUT_SECS must be greater than zero"));
                }
                Duration::from_secs(secs)
            }
            None => defaults.request_timeout,
        };

        Ok(Self {
            google_maps_api_key: lookup("GOOGLE_MAPS_API_KEY"),
            google_maps_api_base: lookup("GOOGLE_MAPS_API_BASE")
                .unwrap_or(defaults.google_maps_api_base),
            nominatim_api_url: lookup("NOMINATIM_API_URL").unwrap_or(defaults.nominatim_api_url),
            osrm_api_url: lookup("OSRM_API_URL").unwrap_or(defaults.osrm_api_url),
            user_agent: lookup("ROUTING_USER_AGENT").unwrap_or(defaults.user_agent),
            request_timeout,
        })
    }

    /// The Google credential, unless it is missing, blank or the placeholder.
    pub fn google_maps_api_key(&self) -> Option<&str> {
        self.google_maps_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && *key != PLACEHOLDER_API_KEY)
    }
}

#[test]
fn defaults_when_environment_is_empty() {
    let config = Config::from_lookup(|_| None).unwrap();

    assert_eq!(config.google_maps_api_key(), None);
    assert_eq!(config.google_maps_api_base, "maps.googleapis.com");
    assert_eq!(config.nominatim_api_url, "https://nominatim.openstreetmap.org");
    assert_eq!(config.osrm_api_url, "https://router.project-osrm.org");
    assert_eq!(config.user_agent, "AgriLogix-App");
    assert_eq!(config.request_timeout, Duration::from_secs(10));
}

#[test]
fn placeholder_key_disables_google() {
    let config = Config {
        google_maps_api_key: Some(PLACEHOLDER_API_KEY.into()),
        ..Config::default()
    };
    assert_eq!(config.google_maps_api_key(), None);

    let config = Config {
        google_maps_api_key: Some("  ".into()),
        ..Config::default()
    };
    assert_eq!(config.google_maps_api_key(), None);

    let config = Config {
        google_maps_api_key: Some("abc123".into()),
        ..Config::default()
    };
    assert_eq!(config.google_maps_api_key(), Some("abc123"));
}

#[test]
fn timeout_must_be_numeric() {
    let config = Config::from_lookup(|name| match name {
        "ROUTING_TIMEOUT_SECS" => Some("5".into()),
        _ => None,
    })
    .unwrap();
    assert_eq!(config.request_timeout, Duration::from_secs(5));

    let err = Config::from_lookup(|name| match name {
        "ROUTING_TIMEOUT_SECS" => Some("soon".into()),
        _ => None,
    })
    .unwrap_err();
    assert_eq!(err.code, crate::error::ENV_VAR_ERROR);

    let err = Config::from_lookup(|name| match name {
        "ROUTING_TIMEOUT_SECS" => Some("0".into()),
        _ => None,
    })
    .unwrap_err();
    assert_eq!(err.code, crate::error::ENV_VAR_ERROR);
}
