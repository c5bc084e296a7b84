//! Configuration loading.
//!
//! Configuration is layered with figment (highest precedence first):
//! 1. Environment variables prefixed with `WEDDING_PLANNER_`, nested with `__`
//!    (e.g. `WEDDING_PLANNER_SERVER__BIND_ADDR`)
//! 2. `wedding-planner.toml` in the working directory
//! 3. Default values

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::logging::Verbosity;

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "wedding-planner.toml";

/// Environment variable prefix.
const ENV_PREFIX: &str = "WEDDING_PLANNER_";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

/// Where the JSON documents live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding `guest_list.json`, `venues.json`, etc.
    pub data_dir: PathBuf,
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind, e.g. `127.0.0.1:3000`.
    pub bind_addr: String,
    /// Attach a permissive CORS layer (for a separately served front end).
    pub permissive_cors: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub verbosity: Verbosity,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            permissive_cors: true,
        }
    }
}

impl Config {
    /// Load configuration from defaults, `wedding-planner.toml` and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a source fails to parse or validation fails.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(CONFIG_FILE_NAME))
    }

    /// Load configuration using an explicit TOML file path.
    ///
    /// A missing file is not an error; figment simply skips it.
    ///
    /// # Errors
    ///
    /// Returns an error if a source fails to parse or validation fails.
    pub fn load_from(config_file: &Path) -> Result<Self> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the bind address or data directory is empty.
    pub fn validate(&self) -> Result<()> {
        if self.server.bind_addr.trim().is_empty() {
            return Err(PlannerError::ConfigValidation {
                message: "server.bind_addr must not be empty".to_string(),
            });
        }

        if self.storage.data_dir.as_os_str().is_empty() {
            return Err(PlannerError::ConfigValidation {
                message: "storage.data_dir must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.storage.data_dir, PathBuf::from("."));
        assert_eq!(config.server.bind_addr, "127.0.0.1:3000");
        assert!(config.server.permissive_cors);
        assert_eq!(config.logging.verbosity, Verbosity::Normal);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_bind_addr() {
        let mut config = Config::default();
        config.server.bind_addr = "  ".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("bind_addr"));
    }

    #[test]
    fn test_validate_empty_data_dir() {
        let mut config = Config::default();
        config.storage.data_dir = PathBuf::new();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("data_dir"));
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planner.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[storage]\ndata_dir = \"/srv/wedding\"\n\n[server]\nbind_addr = \"0.0.0.0:8080\"\n\n[logging]\nverbosity = \"verbose\""
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.storage.data_dir, PathBuf::from("/srv/wedding"));
        assert_eq!(config.server.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.logging.verbosity, Verbosity::Verbose);
        // untouched keys keep their defaults
        assert!(config.server.permissive_cors);
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.server, ServerConfig::default());
    }

    #[test]
    fn test_load_from_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[server\nbind_addr = ").unwrap();

        let result = Config::load_from(&path);
        assert!(matches!(result, Err(PlannerError::Config(_))));
    }
}
