//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and `HOMEDASH_*` environment variable overrides.

use crate::dashboard::DashboardSettings;
use crate::widgets::employees::SimulationTiming;
use crate::widgets::sms_api::{TwilioConfig, DEFAULT_TWILIO_BASE_URL};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub simulation: SimulationConfig,

    #[serde(default)]
    pub sms_api: SmsApiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Key-value store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_db_path")]
    pub path: String,

    /// Keep everything in memory; nothing survives a restart
    #[serde(default)]
    pub in_memory: bool,
}

fn default_db_path() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("homedash").join("homedash.db").to_string_lossy().to_string())
        .unwrap_or_else(|| "./homedash_data/homedash.db".to_string())
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            in_memory: false,
        }
    }
}

impl StorageConfig {
    /// Database path with a leading `~/` expanded
    pub fn db_path(&self) -> PathBuf {
        match (self.path.strip_prefix("~/"), dirs::home_dir()) {
            (Some(rest), Some(home)) => home.join(rest),
            _ => PathBuf::from(&self.path),
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8086
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ApiConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Delays used by the simulated widgets
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_employee_min_delay")]
    pub employee_min_delay_ms: u64,

    #[serde(default = "default_employee_max_delay")]
    pub employee_max_delay_ms: u64,

    #[serde(default = "default_cooldown")]
    pub cooldown_ms: u64,

    #[serde(default = "default_clone_delay")]
    pub clone_delay_ms: u64,

    #[serde(default = "default_email_delay")]
    pub email_delay_ms: u64,
}

fn default_employee_min_delay() -> u64 {
    3000
}

fn default_employee_max_delay() -> u64 {
    8000
}

fn default_cooldown() -> u64 {
    2000
}

fn default_clone_delay() -> u64 {
    2000
}

fn default_email_delay() -> u64 {
    2000
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            employee_min_delay_ms: default_employee_min_delay(),
            employee_max_delay_ms: default_employee_max_delay(),
            cooldown_ms: default_cooldown(),
            clone_delay_ms: default_clone_delay(),
            email_delay_ms: default_email_delay(),
        }
    }
}

impl SimulationConfig {
    pub fn dashboard_settings(&self) -> DashboardSettings {
        DashboardSettings {
            employee_timing: SimulationTiming {
                min_delay: Duration::from_millis(self.employee_min_delay_ms),
                max_delay: Duration::from_millis(self.employee_max_delay_ms),
                cooldown: Duration::from_millis(self.cooldown_ms),
            },
            clone_delay: Duration::from_millis(self.clone_delay_ms),
            email_delay: Duration::from_millis(self.email_delay_ms),
        }
    }
}

/// Carrier SMS API credentials
///
/// Only ever read from here; they are never written to the key-value store.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SmsApiConfig {
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
    pub from_number: Option<String>,
    pub base_url: Option<String>,
}

impl SmsApiConfig {
    /// Provider settings, `None` unless all credentials are present
    pub fn twilio(&self) -> Option<TwilioConfig> {
        let non_empty = |v: &Option<String>| v.as_ref().filter(|s| !s.trim().is_empty()).cloned();

        Some(TwilioConfig {
            account_sid: non_empty(&self.account_sid)?,
            auth_token: non_empty(&self.auth_token)?,
            from_number: non_empty(&self.from_number)?,
            base_url: non_empty(&self.base_url)
                .unwrap_or_else(|| DEFAULT_TWILIO_BASE_URL.to_string()),
        })
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("homedash").join("config.toml")),
            Some(PathBuf::from("/etc/homedash/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply `HOMEDASH_*` environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Storage overrides
        if let Some(path) = var("HOMEDASH_DB_PATH") {
            self.storage.path = path;
        }
        if let Some(flag) = var("HOMEDASH_IN_MEMORY") {
            self.storage.in_memory = matches!(flag.to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }

        // API overrides
        if let Some(host) = var("HOMEDASH_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = var("HOMEDASH_API_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }

        // SMS provider overrides
        if let Some(sid) = var("HOMEDASH_SMS_ACCOUNT_SID") {
            self.sms_api.account_sid = Some(sid);
        }
        if let Some(token) = var("HOMEDASH_SMS_AUTH_TOKEN") {
            self.sms_api.auth_token = Some(token);
        }
        if let Some(from) = var("HOMEDASH_SMS_FROM") {
            self.sms_api.from_number = Some(from);
        }

        // Logging overrides
        if let Some(level) = var("HOMEDASH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("HOMEDASH_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Homedash Configuration
#
# Environment variables override these settings:
# - HOMEDASH_DB_PATH
# - HOMEDASH_IN_MEMORY
# - HOMEDASH_API_HOST
# - HOMEDASH_API_PORT
# - HOMEDASH_SMS_ACCOUNT_SID
# - HOMEDASH_SMS_AUTH_TOKEN
# - HOMEDASH_SMS_FROM
# - HOMEDASH_LOG_LEVEL
# - HOMEDASH_LOG_FORMAT

[storage]
# SQLite database holding every widget's state
path = "~/.local/share/homedash/homedash.db"

# Keep all state in memory (lost on restart)
in_memory = false

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8086

# Request timeout in seconds
request_timeout_secs = 30

[simulation]
# Employee task completion delay range (ms)
employee_min_delay_ms = 3000
employee_max_delay_ms = 8000

# How long a finished employee shows as completed (ms)
cooldown_ms = 2000

# Clone task run time and completion display time (ms)
clone_delay_ms = 2000

# Simulated email send time (ms)
email_delay_ms = 2000

[sms_api]
# Twilio credentials (get from console.twilio.com)
# account_sid = ""
# auth_token = ""
# from_number = "+15550001111"
# base_url = "https://api.twilio.com"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.port, 8086);
        assert_eq!(config.api.addr(), "0.0.0.0:8086");
        assert_eq!(config.simulation.employee_max_delay_ms, 8000);
        assert!(!config.storage.in_memory);
        assert!(config.sms_api.twilio().is_none());
        assert!(!config.logging.is_json());
    }

    #[test]
    fn test_generated_config_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.api.port, 8086);
        assert_eq!(config.simulation.cooldown_ms, 2000);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api]\nport = 9000\n\n[simulation]\nclone_delay_ms = 10").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.api.port, 9000);
        assert_eq!(config.api.host, "0.0.0.0");

        let settings = config.simulation.dashboard_settings();
        assert_eq!(settings.clone_delay, Duration::from_millis(10));
        assert_eq!(settings.employee_timing.min_delay, Duration::from_secs(3));
    }

    #[test]
    fn test_load_errors() {
        let err = Config::load(Path::new("/nonexistent/homedash.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api\nport = ").unwrap();
        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("HOMEDASH_API_PORT", "9999"),
            ("HOMEDASH_IN_MEMORY", "true"),
            ("HOMEDASH_SMS_ACCOUNT_SID", "AC1"),
            ("HOMEDASH_SMS_AUTH_TOKEN", "tok"),
            ("HOMEDASH_SMS_FROM", "+15550001111"),
            ("HOMEDASH_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.api.port, 9999);
        assert!(config.storage.in_memory);
        assert!(config.logging.is_json());

        let twilio = config.sms_api.twilio().unwrap();
        assert_eq!(twilio.account_sid, "AC1");
        assert_eq!(twilio.base_url, DEFAULT_TWILIO_BASE_URL);
    }

    #[test]
    fn test_bad_port_override_is_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|k| (k == "HOMEDASH_API_PORT").then(|| "http".to_string()));
        assert_eq!(config.api.port, 8086);
    }

    #[test]
    fn test_db_path_expands_home() {
        let storage = StorageConfig {
            path: "~/dash/homedash.db".to_string(),
            in_memory: false,
        };
        if let Some(home) = dirs::home_dir() {
            assert_eq!(storage.db_path(), home.join("dash/homedash.db"));
        }
    }
}
