// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
use serde::Deserialize;
use thiserror::Error;

use crate::store::PostgrestConfig;

/// Configuration loaded from environment variables.
///
/// All configuration is externalized to support 12-factor app deployment.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host (default: 0.0.0.0)
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port (default: 8080)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level (default: info)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format: "json" or "pretty" (default: json)
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Hosted database project URL. Unset means the in-memory store.
    #[serde(default)]
    pub supabase_url: Option<String>,

    /// Anonymous API key for the hosted database
    #[serde(default)]
    pub supabase_anon_key: Option<String>,

    /// Store request timeout in seconds (default: 10)
    #[serde(default = "default_store_timeout")]
    pub store_timeout_secs: u64,

    /// YAML seed for the in-memory store
    #[serde(default)]
    pub seed_file: Option<String>,

    /// Store health check interval in seconds (default: 15)
    #[serde(default = "default_health_check_interval")]
    pub health_check_interval_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_store_timeout() -> u64 {
    10
}

fn default_health_check_interval() -> u64 {
    15
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("SUPABASE_URL is set but SUPABASE_ANON_KEY is missing")]
    MissingAnonKey,
}

/// Which store backend to run on.
#[derive(Debug, Clone)]
pub enum StoreSettings {
    Postgrest(PostgrestConfig),
    Memory { seed_file: Option<String> },
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables are uppercase with underscore separators.
    /// Example: `SUPABASE_URL`, `LOG_LEVEL`, etc.
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    pub fn store_settings(&self) -> Result<StoreSettings, ConfigError> {
        let url = self
            .supabase_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty());

        match url {
            Some(url) => {
                let api_key = self
                    .supabase_anon_key
                    .clone()
                    .filter(|k| !k.trim().is_empty())
                    .ok_or(ConfigError::MissingAnonKey)?;
                Ok(StoreSettings::Postgrest(PostgrestConfig {
                    base_url: url.to_string(),
                    api_key,
                    timeout_seconds: self.store_timeout_secs,
                }))
            }
            None => Ok(StoreSettings::Memory {
                seed_file: self.seed_file.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        envy::from_iter(
            vars.iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        )
        .expect("Failed to load config")
    }

    #[test]
    fn test_default_config() {
        let config = config_from(&[]);

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_format, "json");
        assert_eq!(config.store_timeout_secs, 10);
        assert_eq!(config.health_check_interval_secs, 15);
        assert!(config.supabase_url.is_none());
    }

    #[test]
    fn test_memory_store_by_default() {
        let config = config_from(&[("SEED_FILE", "seed.yaml")]);

        match config.store_settings().unwrap() {
            StoreSettings::Memory { seed_file } => {
                assert_eq!(seed_file.as_deref(), Some("seed.yaml"))
            }
            other => panic!("expected memory store, got {:?}", other),
        }
    }

    #[test]
    fn test_postgrest_store_settings() {
        let config = config_from(&[
            ("SUPABASE_URL", "https://project.example.co"),
            ("SUPABASE_ANON_KEY", "anon"),
            ("STORE_TIMEOUT_SECS", "3"),
        ]);

        match config.store_settings().unwrap() {
            StoreSettings::Postgrest(pg) => {
                assert_eq!(pg.base_url, "https://project.example.co");
                assert_eq!(pg.api_key, "anon");
                assert_eq!(pg.timeout_seconds, 3);
            }
            other => panic!("expected postgrest store, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_anon_key() {
        let config = config_from(&[("SUPABASE_URL", "https://project.example.co")]);
        assert_eq!(
            config.store_settings().unwrap_err(),
            ConfigError::MissingAnonKey
        );
    }
}
