//! Configuration management with validation and defaults
//!
//! Values come from defaults, an optional TOML file, then `GUESS_DUEL_*`
//! environment variables, in that order.

use crate::errors::{ConfigurationError, DuelResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

/// Complete server configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DuelConfig {
    pub game: GameConfig,
    pub storage: StorageConfig,
    pub api: ApiConfig,
    pub monitoring: MonitoringConfig,
}

/// Rules of a match
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Rounds per match; the match ends when the last one is won
    pub rounds: u32,
    pub min_secret: u32,
    pub max_secret: u32,
    /// Fixes player order and secret numbers for reproducible runs
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rounds: 6,
            min_secret: 1,
            max_secret: 100,
            seed: None,
        }
    }
}

/// Where match history is kept
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Single JSON array file, rewritten on every append
    #[serde(alias = "json", alias = "file")]
    JsonFile,
    /// Process memory only; lost on restart
    #[serde(alias = "mem")]
    Memory,
    /// Embedded RocksDB database (requires the `rocksdb` feature)
    #[serde(alias = "rocks")]
    RocksDb,
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" | "jsonfile" | "file" => Ok(StorageBackend::JsonFile),
            "memory" | "mem" => Ok(StorageBackend::Memory),
            "rocksdb" | "rocks" => Ok(StorageBackend::RocksDb),
            other => Err(format!("unknown storage backend '{}'", other)),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub history_path: String,
    pub rocksdb_path: String,
    /// Most recent matches kept; older ones are dropped on append
    pub history_cap: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::JsonFile,
            history_path: "./data/game_history.json".to_string(),
            rocksdb_path: "./data/history_db".to_string(),
            history_cap: 25,
        }
    }
}

/// HTTP server settings
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub request_timeout_secs: u64,
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            allowed_origins: vec!["*".to_string()],
            request_timeout_secs: 30,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            log_filter: "guess_duel=info,tower_http=info".to_string(),
        }
    }
}

impl DuelConfig {
    /// Validate configuration for logical consistency
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.game.rounds == 0 {
            return Err(ConfigurationError::ValidationFailed(
                "game.rounds must be > 0".to_string(),
            ));
        }

        if self.game.min_secret == 0 {
            return Err(ConfigurationError::ValidationFailed(
                "game.min_secret must be >= 1".to_string(),
            ));
        }

        if self.game.min_secret > self.game.max_secret {
            return Err(ConfigurationError::ValidationFailed(format!(
                "game.min_secret ({}) must be <= game.max_secret ({})",
                self.game.min_secret, self.game.max_secret
            )));
        }

        if self.storage.history_cap == 0 {
            return Err(ConfigurationError::ValidationFailed(
                "storage.history_cap must be > 0".to_string(),
            ));
        }

        if self.api.request_timeout_secs == 0 {
            return Err(ConfigurationError::ValidationFailed(
                "api.request_timeout_secs must be > 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration loader with environment variable support
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config_path: Option<String>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Set the configuration file path
    pub fn with_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_string_lossy().to_string());
        self
    }

    /// Load configuration from file and environment variables
    pub fn load(&self) -> DuelResult<DuelConfig> {
        let mut config = match self.config_path {
            Some(ref path) => Self::load_from_file(path)?,
            None => DuelConfig::default(),
        };

        Self::apply_overrides(&mut config, |key| env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    fn load_from_file(path: &str) -> DuelResult<DuelConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigurationError::LoadFailed(format!("Failed to read {}: {}", path, e))
        })?;

        Self::parse_toml(&content)
    }

    /// Parse a TOML document; missing sections fall back to defaults
    pub fn parse_toml(content: &str) -> DuelResult<DuelConfig> {
        toml::from_str(content).map_err(|e| {
            ConfigurationError::LoadFailed(format!("Failed to parse TOML: {}", e)).into()
        })
    }

    /// Apply `GUESS_DUEL_*` overrides using the given variable lookup
    pub fn apply_overrides<F>(config: &mut DuelConfig, lookup: F) -> DuelResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("GUESS_DUEL_HOST") {
            config.api.host = host;
        }
        if let Some(port) = lookup("GUESS_DUEL_PORT") {
            config.api.port = parse_var("GUESS_DUEL_PORT", &port)?;
        }
        if let Some(rounds) = lookup("GUESS_DUEL_ROUNDS") {
            config.game.rounds = parse_var("GUESS_DUEL_ROUNDS", &rounds)?;
        }
        if let Some(seed) = lookup("GUESS_DUEL_SEED") {
            config.game.seed = Some(parse_var("GUESS_DUEL_SEED", &seed)?);
        }
        if let Some(cap) = lookup("GUESS_DUEL_HISTORY_CAP") {
            config.storage.history_cap = parse_var("GUESS_DUEL_HISTORY_CAP", &cap)?;
        }
        if let Some(path) = lookup("GUESS_DUEL_HISTORY_PATH") {
            config.storage.history_path = path;
        }
        if let Some(backend) = lookup("GUESS_DUEL_STORAGE_BACKEND") {
            config.storage.backend = parse_var("GUESS_DUEL_STORAGE_BACKEND", &backend)?;
        }

        Ok(())
    }
}

fn parse_var<T>(field: &str, value: &str) -> Result<T, ConfigurationError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigurationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DuelError;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_is_valid() {
        let config = DuelConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.game.rounds, 6);
        assert_eq!(config.storage.history_cap, 25);
        assert_eq!(config.api.port, 5000);
    }

    #[test]
    fn test_invalid_config_validation() {
        let mut config = DuelConfig::default();
        config.game.rounds = 0;
        assert!(config.validate().is_err());

        let mut config = DuelConfig::default();
        config.game.min_secret = 50;
        config.game.max_secret = 10;
        assert!(config.validate().is_err());

        let mut config = DuelConfig::default();
        config.storage.history_cap = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ConfigLoader::parse_toml(
            r#"
            [game]
            rounds = 4

            [storage]
            backend = "memory"
            history_cap = 50
            "#,
        )
        .unwrap();

        assert_eq!(config.game.rounds, 4);
        assert_eq!(config.game.max_secret, 100);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.history_cap, 50);
        assert_eq!(config.api.port, 5000);
    }

    #[test]
    fn test_malformed_toml_is_load_error() {
        let err = ConfigLoader::parse_toml("[game\nrounds = ").unwrap_err();
        assert!(matches!(
            err,
            DuelError::Configuration(ConfigurationError::LoadFailed(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("GUESS_DUEL_PORT", "8088"),
            ("GUESS_DUEL_ROUNDS", "2"),
            ("GUESS_DUEL_SEED", "42"),
            ("GUESS_DUEL_STORAGE_BACKEND", "memory"),
        ]
        .into_iter()
        .collect();

        let mut config = DuelConfig::default();
        ConfigLoader::apply_overrides(&mut config, |k| vars.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.api.port, 8088);
        assert_eq!(config.game.rounds, 2);
        assert_eq!(config.game.seed, Some(42));
        assert_eq!(config.storage.backend, StorageBackend::Memory);
    }

    #[test]
    fn test_bad_env_override_is_rejected() {
        let mut config = DuelConfig::default();
        let result = ConfigLoader::apply_overrides(&mut config, |k| {
            (k == "GUESS_DUEL_PORT").then(|| "not-a-port".to_string())
        });

        match result {
            Err(DuelError::Configuration(ConfigurationError::InvalidValue { field, .. })) => {
                assert_eq!(field, "GUESS_DUEL_PORT")
            }
            other => panic!("Expected invalid value error, got {:?}", other),
        }
    }

    #[test]
    fn test_toml_accepts_cli_backend_names() {
        for (name, expected) in [
            ("json", StorageBackend::JsonFile),
            ("jsonfile", StorageBackend::JsonFile),
            ("file", StorageBackend::JsonFile),
            ("mem", StorageBackend::Memory),
            ("rocks", StorageBackend::RocksDb),
            ("rocksdb", StorageBackend::RocksDb),
        ] {
            let config =
                ConfigLoader::parse_toml(&format!("[storage]\nbackend = \"{}\"", name)).unwrap();
            assert_eq!(config.storage.backend, expected);
            assert_eq!(name.parse::<StorageBackend>().unwrap(), expected);
        }
    }

    #[test]
    fn test_storage_backend_parsing() {
        assert_eq!("json".parse::<StorageBackend>().unwrap(), StorageBackend::JsonFile);
        assert_eq!("RocksDB".parse::<StorageBackend>().unwrap(), StorageBackend::RocksDb);
        assert!("postgres".parse::<StorageBackend>().is_err());
    }
}
