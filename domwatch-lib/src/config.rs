//! Configuration file parsing and management.
//!
//! This module handles loading configuration from TOML files and `DW_*`
//! environment variables, and merging them with proper precedence rules:
//! built-in defaults < config files < environment < command line.

use crate::error::DomainCheckError;
use crate::types::{parse_record_types, CheckConfig, RecordType, Transport};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration loaded from TOML files.
///
/// ```toml
/// [defaults]
/// server = "1.1.1.1"
/// transport = "udp"
/// types = ["NS", "SOA", "MX"]
/// timeout = "3s"
/// concurrency = 8
/// json = false
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// Default values for CLI options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,
}

/// Default configuration values that map to CLI options.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DefaultsConfig {
    /// Bootstrap DNS server
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,

    /// "tcp" or "udp"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport: Option<String>,

    /// Record types to probe, in order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<String>>,

    /// Per-exchange timeout (as string, e.g., "2s", "1m")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    /// Domains checked at once
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,

    /// Emit JSON instead of text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json: Option<bool>,
}

impl DefaultsConfig {
    /// Overlay these values onto `config`.
    ///
    /// # Errors
    ///
    /// `ConfigError` for an unknown transport or record type or a malformed
    /// timeout; `NoRecordTypes` for an empty record type list.
    pub fn apply_to(&self, mut config: CheckConfig) -> Result<CheckConfig, DomainCheckError> {
        if let Some(server) = &self.server {
            config = config.with_server(server.trim());
        }
        if let Some(transport) = &self.transport {
            config = config.with_transport(transport.parse::<Transport>()?);
        }
        if let Some(types) = &self.types {
            config = config.with_record_types(parse_type_list(types)?);
        }
        if let Some(timeout) = &self.timeout {
            config = config.with_timeout(parse_timeout(timeout)?);
        }
        if let Some(concurrency) = self.concurrency {
            config = config.with_concurrency(concurrency);
        }
        Ok(config)
    }
}

/// Configuration discovery and loading functionality.
pub struct ConfigManager {
    /// Whether to report which config files were merged
    pub verbose: bool,
}

impl ConfigManager {
    /// Create a new configuration manager.
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// `FileError` if the file is missing or unreadable, `ConfigError` if it
    /// is not valid TOML or fails validation.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, DomainCheckError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(DomainCheckError::file_error(
                path.to_string_lossy(),
                "Configuration file not found",
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            DomainCheckError::file_error(
                path.to_string_lossy(),
                format!("Failed to read configuration file: {}", e),
            )
        })?;

        let config: FileConfig = toml::from_str(&content)?;

        self.validate_config(&config)?;

        Ok(config)
    }

    /// Discover and load configuration files in precedence order.
    ///
    /// XDG config < `$HOME/.domwatch.toml` < `./domwatch.toml`. Files that
    /// fail to load are skipped with a warning.
    pub fn discover_and_load(&self) -> Result<FileConfig, DomainCheckError> {
        let mut merged_config = FileConfig::default();
        let mut loaded_files = Vec::new();

        let candidates = [
            self.get_xdg_config_path(),
            self.get_global_config_path(),
            self.get_local_config_path(),
        ];

        for path in candidates.into_iter().flatten() {
            match self.load_file(&path) {
                Ok(config) => {
                    merged_config = self.merge_configs(merged_config, config);
                    loaded_files.push(path);
                }
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping config file"),
            }
        }

        if self.verbose && !loaded_files.is_empty() {
            for path in &loaded_files {
                debug!(path = %path.display(), "Loaded config file");
            }
        }

        Ok(merged_config)
    }

    /// Configuration file in the current directory.
    fn get_local_config_path(&self) -> Option<PathBuf> {
        let candidates = ["./domwatch.toml", "./.domwatch.toml"];

        candidates
            .into_iter()
            .map(Path::new)
            .find(|path| path.exists())
            .map(Path::to_path_buf)
    }

    /// Configuration file in the user's home directory.
    fn get_global_config_path(&self) -> Option<PathBuf> {
        let home = env::var_os("HOME")?;
        [".domwatch.toml", "domwatch.toml"]
            .iter()
            .map(|candidate| Path::new(&home).join(candidate))
            .find(|path| path.exists())
    }

    /// Configuration file under the XDG config directory.
    fn get_xdg_config_path(&self) -> Option<PathBuf> {
        let config_dir = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))?;

        let path = config_dir.join("domwatch").join("config.toml");
        path.exists().then_some(path)
    }

    /// Merge two configurations; values from `higher` win.
    fn merge_configs(&self, lower: FileConfig, higher: FileConfig) -> FileConfig {
        FileConfig {
            defaults: match (lower.defaults, higher.defaults) {
                (Some(lower), Some(higher)) => Some(DefaultsConfig {
                    server: higher.server.or(lower.server),
                    transport: higher.transport.or(lower.transport),
                    types: higher.types.or(lower.types),
                    timeout: higher.timeout.or(lower.timeout),
                    concurrency: higher.concurrency.or(lower.concurrency),
                    json: higher.json.or(lower.json),
                }),
                (lower, higher) => higher.or(lower),
            },
        }
    }

    /// Validate a configuration for common issues.
    fn validate_config(&self, config: &FileConfig) -> Result<(), DomainCheckError> {
        let Some(defaults) = &config.defaults else {
            return Ok(());
        };

        if let Some(concurrency) = defaults.concurrency {
            if concurrency == 0 || concurrency > 100 {
                return Err(DomainCheckError::config(
                    "Concurrency must be between 1 and 100",
                ));
            }
        }

        if let Some(server) = &defaults.server {
            if server.trim().is_empty() {
                return Err(DomainCheckError::config("Server cannot be empty"));
            }
        }

        if let Some(transport) = &defaults.transport {
            transport.parse::<Transport>()?;
        }

        if let Some(types) = &defaults.types {
            parse_type_list(types)?;
        }

        if let Some(timeout) = &defaults.timeout {
            parse_timeout(timeout)?;
        }

        Ok(())
    }
}

/// Environment variable configuration that mirrors CLI options.
///
/// This represents configuration values that can be set via DW_* environment
/// variables. Malformed values are dropped with a warning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvConfig {
    pub server: Option<String>,
    pub transport: Option<Transport>,
    pub types: Option<Vec<String>>,
    pub timeout: Option<String>,
    pub concurrency: Option<usize>,
    pub json: Option<bool>,
    pub config: Option<String>,
}

impl EnvConfig {
    /// Overlay these values onto `config`.
    pub fn apply_to(&self, mut config: CheckConfig) -> Result<CheckConfig, DomainCheckError> {
        if let Some(server) = &self.server {
            config = config.with_server(server.clone());
        }
        if let Some(transport) = self.transport {
            config = config.with_transport(transport);
        }
        if let Some(types) = &self.types {
            config = config.with_record_types(parse_type_list(types)?);
        }
        if let Some(timeout) = &self.timeout {
            config = config.with_timeout(parse_timeout(timeout)?);
        }
        if let Some(concurrency) = self.concurrency {
            config = config.with_concurrency(concurrency);
        }
        Ok(config)
    }
}

/// Load configuration from the process environment.
pub fn load_env_config() -> EnvConfig {
    load_env_config_from(|key| env::var(key).ok())
}

/// Load configuration from DW_* variables provided by `lookup`.
pub fn load_env_config_from<F>(lookup: F) -> EnvConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut env_config = EnvConfig::default();

    // DW_SERVER - bootstrap DNS server
    if let Some(server) = non_empty(lookup("DW_SERVER")) {
        debug!("Using DW_SERVER={}", server);
        env_config.server = Some(server);
    }

    // DW_TRANSPORT - tcp or udp
    if let Some(val) = lookup("DW_TRANSPORT") {
        match val.parse::<Transport>() {
            Ok(transport) => {
                debug!("Using DW_TRANSPORT={}", transport);
                env_config.transport = Some(transport);
            }
            Err(_) => warn!("Invalid DW_TRANSPORT='{}', use tcp/udp", val),
        }
    }

    // DW_TYPES - comma-separated record types
    if let Some(val) = lookup("DW_TYPES") {
        let types = split_list(&val);
        match parse_type_list(&types) {
            Ok(_) => {
                debug!("Using DW_TYPES={}", val);
                env_config.types = Some(types);
            }
            Err(e) => warn!("Invalid DW_TYPES='{}': {}", val, e),
        }
    }

    // DW_TIMEOUT - per-exchange timeout
    if let Some(val) = lookup("DW_TIMEOUT") {
        if parse_timeout(&val).is_ok() {
            debug!("Using DW_TIMEOUT={}", val);
            env_config.timeout = Some(val);
        } else {
            warn!("Invalid DW_TIMEOUT='{}', use format like '2s', '30s', '1m'", val);
        }
    }

    // DW_CONCURRENCY - concurrent domain checks
    if let Some(val) = lookup("DW_CONCURRENCY") {
        match val.trim().parse::<usize>() {
            Ok(concurrency) if (1..=100).contains(&concurrency) => {
                debug!("Using DW_CONCURRENCY={}", concurrency);
                env_config.concurrency = Some(concurrency);
            }
            _ => warn!("Invalid DW_CONCURRENCY='{}', must be 1-100", val),
        }
    }

    // DW_JSON - JSON output
    if let Some(val) = lookup("DW_JSON") {
        match parse_bool(&val) {
            Some(json) => {
                debug!("Using DW_JSON={}", json);
                env_config.json = Some(json);
            }
            None => warn!("Invalid DW_JSON='{}', use true/false", val),
        }
    }

    // DW_CONFIG - explicit config file
    if let Some(path) = non_empty(lookup("DW_CONFIG")) {
        debug!("Using DW_CONFIG={}", path);
        env_config.config = Some(path);
    }

    env_config
}

/// Parse a timeout string like "5s", "30s", "2m" into seconds.
///
/// A bare number means seconds. Returns `None` if parsing fails.
pub fn parse_timeout_string(timeout_str: &str) -> Option<u64> {
    let timeout_str = timeout_str.trim().to_lowercase();

    if let Some(secs) = timeout_str.strip_suffix('s') {
        secs.parse::<u64>().ok()
    } else if let Some(mins) = timeout_str.strip_suffix('m') {
        mins.parse::<u64>().ok().and_then(|m| m.checked_mul(60))
    } else {
        timeout_str.parse::<u64>().ok()
    }
}

/// Parse a timeout string into a non-zero duration.
pub fn parse_timeout(timeout_str: &str) -> Result<Duration, DomainCheckError> {
    match parse_timeout_string(timeout_str) {
        Some(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(DomainCheckError::config(format!(
            "Invalid timeout format '{}'. Use format like '2s', '30s', '1m'",
            timeout_str
        ))),
    }
}

fn parse_type_list<S: AsRef<str>>(types: &[S]) -> Result<Vec<RecordType>, DomainCheckError> {
    let parsed = parse_record_types(types)?;
    if parsed.is_empty() {
        return Err(DomainCheckError::NoRecordTypes);
    }
    Ok(parsed)
}

fn parse_bool(val: &str) -> Option<bool> {
    match val.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn split_list(val: &str) -> Vec<String> {
    val.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn non_empty(val: Option<String>) -> Option<String> {
    val.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
