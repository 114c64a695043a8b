//! Configuration management for Task Drafter.
//!
//! Configuration can be set via environment variables:
//! - `OPEN_ROUTER_API_KEY` - Upstream credential. Required for the `openrouter` generator.
//! - `DRAFT_GENERATOR` - Optional. `stub`, `openrouter` or `endpoint`. Defaults to
//!   `openrouter` when an API key is present, `stub` otherwise.
//! - `DRAFT_MODEL` - Optional. Model identifier. Defaults to `deepseek/deepseek-r1:free`.
//! - `OPENROUTER_BASE_URL` - Optional. Defaults to `https://openrouter.ai/api`.
//! - `DRAFT_ENDPOINT_URL` - Base URL of a draft endpoint. Required for the `endpoint` generator.
//! - `STUB_DELAY_MS` - Optional. Artificial stub latency. Defaults to `0`.
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `3000`.
//!
//! Task persistence is configured separately through [`StoreConfig`], which is
//! only read by the review flow. The HTTP server is stateless and ignores it:
//! - `TASK_STORE` - Optional. `memory` or `file`. Defaults to `file`.
//! - `TASK_DATA_DIR` - Optional. Directory for the task list. Defaults to current directory.
//! - `TASK_STORE_ENTRY` - Optional. Name of the stored entry. Defaults to `tasks`.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::draft::{GeneratorKind, DEFAULT_MODEL};
use crate::llm::DEFAULT_OPENROUTER_BASE_URL;
use crate::task_store::{StoreType, DEFAULT_ENTRY};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Where confirmed tasks are kept.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub store_type: StoreType,
    pub data_dir: PathBuf,
    /// Name of the single stored entry
    pub entry: String,
}

impl StoreConfig {
    /// Load store settings from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Load store settings through an arbitrary variable lookup.
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store_type = match var("TASK_STORE") {
            Some(value) => StoreType::parse(&value).ok_or_else(|| {
                ConfigError::InvalidValue("TASK_STORE".to_string(), value.clone())
            })?,
            None => StoreType::default(),
        };

        let data_dir = var("TASK_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

        Ok(Self {
            store_type,
            data_dir,
            entry: var("TASK_STORE_ENTRY").unwrap_or_else(|| DEFAULT_ENTRY.to_string()),
        })
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            store_type: StoreType::default(),
            data_dir: PathBuf::from("."),
            entry: DEFAULT_ENTRY.to_string(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Draft generator strategy
    pub generator: GeneratorKind,

    /// OpenRouter API key
    pub api_key: Option<String>,

    /// Model identifier (OpenRouter format)
    pub model: String,

    /// OpenRouter API base URL
    pub openrouter_base_url: String,

    /// Base URL of a remote draft endpoint
    pub endpoint_url: Option<String>,

    /// Simulated latency for the stub generator
    pub stub_delay: Duration,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if the selected generator lacks its
    /// credential or URL, `ConfigError::InvalidValue` for unparseable values.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = var("OPEN_ROUTER_API_KEY").filter(|k| !k.is_empty());

        let generator = match var("DRAFT_GENERATOR") {
            Some(value) => GeneratorKind::parse(&value).ok_or_else(|| {
                ConfigError::InvalidValue("DRAFT_GENERATOR".to_string(), value.clone())
            })?,
            None if api_key.is_some() => GeneratorKind::OpenRouter,
            None => GeneratorKind::Stub,
        };

        if generator == GeneratorKind::OpenRouter && api_key.is_none() {
            return Err(ConfigError::MissingEnvVar("OPEN_ROUTER_API_KEY".to_string()));
        }

        let endpoint_url = var("DRAFT_ENDPOINT_URL");
        if generator == GeneratorKind::Endpoint && endpoint_url.is_none() {
            return Err(ConfigError::MissingEnvVar("DRAFT_ENDPOINT_URL".to_string()));
        }

        let model = var("DRAFT_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let openrouter_base_url =
            var("OPENROUTER_BASE_URL").unwrap_or_else(|| DEFAULT_OPENROUTER_BASE_URL.to_string());

        let stub_delay_ms: u64 = var("STUB_DELAY_MS")
            .unwrap_or_else(|| "0".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("STUB_DELAY_MS".to_string(), format!("{}", e)))?;

        let host = var("HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let port = var("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), format!("{}", e)))?;

        Ok(Self {
            generator,
            api_key,
            model,
            openrouter_base_url,
            endpoint_url,
            stub_delay: Duration::from_millis(stub_delay_ms),
            host,
            port,
        })
    }

    /// Create a config with defaults for everything but the generator (useful for testing).
    pub fn new(generator: GeneratorKind) -> Self {
        Self {
            generator,
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            openrouter_base_url: DEFAULT_OPENROUTER_BASE_URL.to_string(),
            endpoint_url: None,
            stub_delay: Duration::ZERO,
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        Config::from_vars(lookup(vars))
    }

    #[test]
    fn defaults_to_stub_without_credential() {
        let config = load(&[]).expect("empty environment is valid");
        assert_eq!(config.generator, GeneratorKind::Stub);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.port, 3000);
        assert!(config.stub_delay.is_zero());
    }

    #[test]
    fn credential_selects_openrouter() {
        let config = load(&[("OPEN_ROUTER_API_KEY", "sk-or-1")]).unwrap();
        assert_eq!(config.generator, GeneratorKind::OpenRouter);
        assert_eq!(config.api_key.as_deref(), Some("sk-or-1"));
    }

    #[test]
    fn explicit_stub_wins_over_credential() {
        let config = load(&[
            ("OPEN_ROUTER_API_KEY", "sk-or-1"),
            ("DRAFT_GENERATOR", "stub"),
            ("STUB_DELAY_MS", "1500"),
        ])
        .unwrap();
        assert_eq!(config.generator, GeneratorKind::Stub);
        assert_eq!(config.stub_delay, Duration::from_millis(1500));
    }

    #[test]
    fn missing_requirements_are_reported() {
        assert!(matches!(
            load(&[("DRAFT_GENERATOR", "openrouter")]),
            Err(ConfigError::MissingEnvVar(name)) if name == "OPEN_ROUTER_API_KEY"
        ));
        assert!(matches!(
            load(&[("DRAFT_GENERATOR", "endpoint")]),
            Err(ConfigError::MissingEnvVar(name)) if name == "DRAFT_ENDPOINT_URL"
        ));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            load(&[("PORT", "eighty")]),
            Err(ConfigError::InvalidValue(name, _)) if name == "PORT"
        ));
        assert!(matches!(
            load(&[("DRAFT_GENERATOR", "gpt")]),
            Err(ConfigError::InvalidValue(name, _)) if name == "DRAFT_GENERATOR"
        ));
    }

    #[test]
    fn server_config_ignores_store_settings() {
        let config = load(&[("TASK_STORE", "postgres"), ("PORT", "8080")])
            .expect("store settings are not the server's concern");
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn store_settings_are_parsed_on_their_own() {
        let store = StoreConfig::from_vars(lookup(&[])).unwrap();
        assert_eq!(store.store_type, StoreType::File);
        assert_eq!(store.entry, "tasks");

        let store = StoreConfig::from_vars(lookup(&[
            ("TASK_STORE", "memory"),
            ("TASK_DATA_DIR", "/var/lib/drafter"),
            ("TASK_STORE_ENTRY", "team"),
        ]))
        .unwrap();
        assert_eq!(store.store_type, StoreType::Memory);
        assert_eq!(store.data_dir, PathBuf::from("/var/lib/drafter"));
        assert_eq!(store.entry, "team");

        assert!(matches!(
            StoreConfig::from_vars(lookup(&[("TASK_STORE", "postgres")])),
            Err(ConfigError::InvalidValue(name, _)) if name == "TASK_STORE"
        ));
    }
}
