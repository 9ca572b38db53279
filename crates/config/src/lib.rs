//! Configuration for the Tracelens dashboard.
//!
//! Everything has a default so the dashboard starts without any file on
//! disk; a TOML file only needs to name the values it overrides.

mod error;
mod loader;

use std::{path::Path, time::Duration};

use serde::Deserialize;

pub use error::Error;

pub(crate) type Result<T> = std::result::Result<T, error::Error>;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub poll: PollConfig,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> crate::Result<Config> {
        loader::load(path)
    }
}

/// Connection settings for the remote trace store.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(
        default = "default_request_timeout",
        deserialize_with = "duration_str::deserialize_duration"
    )]
    pub request_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout: default_request_timeout(),
        }
    }
}

/// Cadence of the background refresh loop.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PollConfig {
    #[serde(
        default = "default_poll_interval",
        deserialize_with = "duration_str::deserialize_duration"
    )]
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: default_poll_interval(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(5)
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use crate::Config;

    #[test]
    fn all_values() {
        let config = indoc! {r#"
            [api]
            base_url = "http://tracer.internal:8000"
            request_timeout = "10s"

            [poll]
            interval = "2s"
        "#};

        let config: Config = toml::from_str(config).unwrap();

        insta::assert_debug_snapshot!(&config, @r#"
        Config {
            api: ApiConfig {
                base_url: "http://tracer.internal:8000",
                request_timeout: 10s,
            },
            poll: PollConfig {
                interval: 2s,
            },
        }
        "#);
    }

    #[test]
    fn defaults() {
        let config: Config = toml::from_str("").unwrap();

        insta::assert_debug_snapshot!(&config, @r#"
        Config {
            api: ApiConfig {
                base_url: "http://127.0.0.1:8000",
                request_timeout: 30s,
            },
            poll: PollConfig {
                interval: 5s,
            },
        }
        "#);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let config = indoc! {r#"
            [api]
            base_url = "http://127.0.0.1:8000"
            basic_auth = "nope"
        "#};

        let result: Result<Config, _> = toml::from_str(config);
        assert!(result.is_err());
    }
}
