//! Configuration file management.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Complete daemon configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// OTP challenge settings.
    #[serde(default)]
    pub otp: OtpConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address. The `PORT` env var replaces the port.
    #[serde(default = "default_bind")]
    pub bind: String,
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Data directory. Empty = platform default.
    #[serde(default)]
    pub data_dir: String,
    /// Database file name inside the data directory.
    #[serde(default = "default_database_file")]
    pub database_file: String,
}

/// OTP configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpConfig {
    /// Challenge lifetime in seconds.
    #[serde(default = "default_challenge_ttl")]
    pub challenge_ttl_secs: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "debug" | "info" | "warn" | "error". `RUST_LOG` wins.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// Default value functions

fn default_bind() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_database_file() -> String {
    "emtc.db".to_string()
}

fn default_challenge_ttl() -> u64 {
    900
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: String::new(),
            database_file: default_database_file(),
        }
    }
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            challenge_ttl_secs: default_challenge_ttl(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl DaemonConfig {
    /// Load configuration from the default config file location.
    ///
    /// Falls back to defaults if file does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: DaemonConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Resolve the listen address, applying a `PORT` override.
    pub fn listen_addr(&self) -> anyhow::Result<SocketAddr> {
        let port = std::env::var("PORT").ok();
        self.listen_addr_with(port.as_deref())
    }

    fn listen_addr_with(&self, port: Option<&str>) -> anyhow::Result<SocketAddr> {
        let mut addr: SocketAddr = self.server.bind.parse()?;
        if let Some(port) = port {
            addr.set_port(port.trim().parse()?);
        }
        Ok(addr)
    }

    pub fn challenge_ttl(&self) -> Duration {
        Duration::from_secs(self.otp.challenge_ttl_secs)
    }

    /// Get the data directory path.
    pub fn data_dir(&self) -> PathBuf {
        if self.storage.data_dir.is_empty() {
            Self::default_data_dir()
        } else {
            PathBuf::from(&self.storage.data_dir)
        }
    }

    /// Full path of the SQLite database.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir().join(&self.storage.database_file)
    }

    /// Get the config file path.
    fn config_path() -> PathBuf {
        Self::default_data_dir().join("config.toml")
    }

    /// Platform-specific default data directory.
    fn default_data_dir() -> PathBuf {
        if let Ok(dir) = std::env::var("EMTC_DATA_DIR") {
            return PathBuf::from(dir);
        }
        #[cfg(target_os = "windows")]
        {
            dirs_fallback("eMTC")
        }
        #[cfg(not(target_os = "windows"))]
        {
            dirs_fallback(".emtc")
        }
    }
}

/// Fallback home directory resolution.
fn dirs_fallback(subpath: &str) -> PathBuf {
    std::env::var("HOME")
        .map(|h| PathBuf::from(h).join(subpath))
        .unwrap_or_else(|_| PathBuf::from("/tmp/emtc"))
}
