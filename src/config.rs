//! Configuration management for subhawk.
//!
//! Configuration is loaded from `./config/subhawk.toml` when present; when the
//! file is missing the embedded default template is used instead so the tool
//! runs non-interactively out of the box. Scan settings can be overridden from
//! the command line.

use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Configuration file path relative to working directory
pub const CONFIG_PATH: &str = "./config/subhawk.toml";

/// Default configuration file content - all defaults live in the template
pub const DEFAULT_CONFIG: &str = include_str!("../config/subhawk.toml");

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] io::Error),

    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid URL in '{field}': {url}")]
    InvalidUrl { field: String, url: String },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("At least one DoH server must be configured")]
    NoServersConfigured,
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub dns: DnsConfig,
    pub scan: ScanConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub user_agent: String,
}

/// DNS resolution configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DnsConfig {
    pub doh_servers: Vec<DohServerConfig>,
}

/// DNS-over-HTTPS server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DohServerConfig {
    pub url: String,
    pub name: String,
    pub timeout_secs: u64,
}

/// Takeover scan configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScanConfig {
    /// Worker pool size for concurrent takeover checks
    pub concurrency: usize,
    /// Per-call network timeout in seconds (DNS queries and HTTP probes)
    pub probe_timeout_secs: u64,
}

/// Enumeration source configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoveryConfig {
    /// Enable certificate-transparency enumeration via crt.sh
    #[serde(default = "default_ct_enabled")]
    pub ct_enabled: bool,
    /// Timeout for the crt.sh query in seconds
    #[serde(default = "default_ct_timeout_secs")]
    pub ct_timeout_secs: u64,
}

fn default_ct_enabled() -> bool {
    true
}

fn default_ct_timeout_secs() -> u64 {
    30
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            ct_enabled: default_ct_enabled(),
            ct_timeout_secs: default_ct_timeout_secs(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `./config/subhawk.toml`, falling back to the
    /// embedded default template when the file does not exist. A file that
    /// exists but cannot be read or parsed is a fatal configuration error.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Path::new(CONFIG_PATH);
        let contents = if path.exists() {
            fs::read_to_string(path)?
        } else {
            DEFAULT_CONFIG.to_string()
        };

        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.dns.doh_servers.is_empty() {
            return Err(ConfigError::NoServersConfigured);
        }
        for server in &self.dns.doh_servers {
            if !server.url.starts_with("http://") && !server.url.starts_with("https://") {
                return Err(ConfigError::InvalidUrl {
                    field: "dns.doh_servers.url".to_string(),
                    url: server.url.clone(),
                });
            }
        }
        if self.scan.concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scan.concurrency".to_string(),
                reason: "must be a positive integer".to_string(),
            });
        }
        if self.scan.probe_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scan.probe_timeout_secs".to_string(),
                reason: "must be a positive integer".to_string(),
            });
        }
        Ok(())
    }
}
