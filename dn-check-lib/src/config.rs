//! Configuration file parsing and management.
//!
//! This module handles loading configuration from TOML files and `DNC_*`
//! environment variables. Merging into a [`crate::CheckConfig`] with CLI
//! precedence is left to the caller.

use crate::error::DnCheckError;
use crate::types::{ResolverKind, MAX_CONCURRENCY};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration loaded from TOML files.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// Default values for CLI options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,
}

/// Default configuration values that map to CLI options.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DefaultsConfig {
    /// Default TLD list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tlds: Option<Vec<String>>,

    /// Default concurrency level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,

    /// Default per-lookup timeout (as string, e.g., "5s", "30s")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    /// Default upstream resolver
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolver: Option<ResolverKind>,

    /// Colored table output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
}

/// Configuration discovery and loading functionality.
pub struct ConfigManager {
    /// Whether to report which files were picked up
    pub verbose: bool,
}

impl ConfigManager {
    /// Create a new configuration manager.
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Load and validate configuration from a specific file.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, DnCheckError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(DnCheckError::file_error(
                path.to_string_lossy(),
                "Configuration file not found",
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            DnCheckError::file_error(
                path.to_string_lossy(),
                format!("Failed to read configuration file: {}", e),
            )
        })?;

        let config: FileConfig = toml::from_str(&content)?;
        self.validate_config(&config)?;

        tracing::debug!(path = %path.display(), "loaded configuration file");
        Ok(config)
    }

    /// Discover and load configuration files in precedence order.
    ///
    /// XDG config is applied first, then the global file in `$HOME`, then a
    /// local file in the working directory; later files win per key.
    pub fn discover_and_load(&self) -> Result<FileConfig, DnCheckError> {
        let mut merged_config = FileConfig::default();
        let mut loaded_files = Vec::new();

        let candidates = [
            self.get_xdg_config_path(),
            self.get_global_config_path(),
            self.get_local_config_path(),
        ];

        for path in candidates.into_iter().flatten() {
            let config = self.load_file(&path)?;
            merged_config = self.merge_configs(merged_config, config);
            loaded_files.push(path);
        }

        if self.verbose && loaded_files.len() > 1 {
            for path in &loaded_files {
                tracing::info!(path = %path.display(), "merged configuration file");
            }
        }

        Ok(merged_config)
    }

    /// Look for configuration files in the current directory.
    fn get_local_config_path(&self) -> Option<PathBuf> {
        ["./dn-check.toml", "./.dn-check.toml"]
            .iter()
            .map(Path::new)
            .find(|path| path.exists())
            .map(Path::to_path_buf)
    }

    /// Look for configuration files in the user's home directory.
    fn get_global_config_path(&self) -> Option<PathBuf> {
        let home = env::var_os("HOME")?;
        [".dn-check.toml", "dn-check.toml"]
            .iter()
            .map(|candidate| Path::new(&home).join(candidate))
            .find(|path| path.exists())
    }

    /// Follows the XDG Base Directory Specification.
    fn get_xdg_config_path(&self) -> Option<PathBuf> {
        let config_dir = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))?;

        let path = config_dir.join("dn-check").join("config.toml");
        path.exists().then_some(path)
    }

    /// Merge two configurations; values from `higher` win.
    fn merge_configs(&self, lower: FileConfig, higher: FileConfig) -> FileConfig {
        let defaults = match (lower.defaults, higher.defaults) {
            (Some(lower), Some(higher)) => Some(DefaultsConfig {
                tlds: higher.tlds.or(lower.tlds),
                concurrency: higher.concurrency.or(lower.concurrency),
                timeout: higher.timeout.or(lower.timeout),
                resolver: higher.resolver.or(lower.resolver),
                color: higher.color.or(lower.color),
            }),
            (lower, higher) => higher.or(lower),
        };
        FileConfig { defaults }
    }

    /// Validate a configuration for common issues.
    fn validate_config(&self, config: &FileConfig) -> Result<(), DnCheckError> {
        let Some(defaults) = &config.defaults else {
            return Ok(());
        };

        if let Some(concurrency) = defaults.concurrency {
            if concurrency == 0 || concurrency > MAX_CONCURRENCY {
                return Err(DnCheckError::config(format!(
                    "Concurrency must be between 1 and {}",
                    MAX_CONCURRENCY
                )));
            }
        }

        if let Some(timeout_str) = &defaults.timeout {
            if parse_timeout(timeout_str).is_none() {
                return Err(DnCheckError::config(format!(
                    "Invalid timeout format '{}'. Use format like '5s', '30s', '2m'",
                    timeout_str
                )));
            }
        }

        if let Some(tlds) = &defaults.tlds {
            if tlds.is_empty() {
                return Err(DnCheckError::config("TLD list cannot be empty"));
            }
            for tld in tlds {
                if tld.trim().is_empty() || tld.contains(' ') {
                    return Err(DnCheckError::config(format!("Invalid TLD '{}'", tld)));
                }
            }
        }

        Ok(())
    }
}

/// Environment variable configuration that mirrors CLI options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvConfig {
    pub tlds: Option<Vec<String>>,
    pub concurrency: Option<usize>,
    pub timeout: Option<Duration>,
    pub resolver: Option<ResolverKind>,
    pub file: Option<String>,
    pub config: Option<String>,
}

/// Load configuration from `DNC_*` environment variables.
///
/// Invalid values are logged as warnings and ignored.
pub fn load_env_config() -> EnvConfig {
    EnvConfig::from_lookup(|key| env::var(key).ok())
}

impl EnvConfig {
    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut env_config = EnvConfig::default();

        // DNC_TLD - comma-separated TLD list
        if let Some(tld_str) = lookup("DNC_TLD") {
            let tlds = crate::utils::split_tlds(&tld_str);
            if tlds.is_empty() {
                tracing::warn!(value = %tld_str, "ignoring DNC_TLD without any TLD");
            } else {
                env_config.tlds = Some(tlds);
            }
        }

        // DNC_CONCURRENCY - concurrent lookups
        if let Some(val) = lookup("DNC_CONCURRENCY") {
            match val.trim().parse::<usize>() {
                Ok(n) if (1..=MAX_CONCURRENCY).contains(&n) => env_config.concurrency = Some(n),
                _ => tracing::warn!(value = %val, "ignoring invalid DNC_CONCURRENCY, must be 1-100"),
            }
        }

        // DNC_TIMEOUT - per-lookup deadline
        if let Some(val) = lookup("DNC_TIMEOUT") {
            match parse_timeout(&val) {
                Some(timeout) => env_config.timeout = Some(timeout),
                None => tracing::warn!(value = %val, "ignoring invalid DNC_TIMEOUT, use '5s', '30s', '2m'"),
            }
        }

        // DNC_RESOLVER - upstream name servers
        if let Some(val) = lookup("DNC_RESOLVER") {
            match val.parse::<ResolverKind>() {
                Ok(kind) => env_config.resolver = Some(kind),
                Err(e) => tracing::warn!(value = %val, "ignoring DNC_RESOLVER: {}", e),
            }
        }

        // DNC_FILE - default names file
        if let Some(path) = lookup("DNC_FILE").filter(|p| !p.trim().is_empty()) {
            env_config.file = Some(path);
        }

        // DNC_CONFIG - explicit config file
        if let Some(path) = lookup("DNC_CONFIG").filter(|p| !p.trim().is_empty()) {
            env_config.config = Some(path);
        }

        env_config
    }
}

/// Parse a timeout string like "5s", "30s", "2m" or "5" (seconds).
///
/// Zero is rejected.
pub fn parse_timeout(timeout_str: &str) -> Option<Duration> {
    let timeout_str = timeout_str.trim().to_lowercase();

    let secs = if let Some(s) = timeout_str.strip_suffix('s') {
        s.parse::<u64>().ok()
    } else if let Some(m) = timeout_str.strip_suffix('m') {
        m.parse::<u64>().ok().map(|m| m * 60)
    } else {
        timeout_str.parse::<u64>().ok()
    }?;

    (secs > 0).then(|| Duration::from_secs(secs))
}
