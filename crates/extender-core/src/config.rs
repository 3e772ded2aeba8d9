//! Configuration types for the extender

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use tracing::warn;

use crate::error::{ExtenderError, ExtenderResult};

/// Extender configuration, resolved once at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtenderConfig {
    /// `ip:port` to bind; a missing ip binds all interfaces
    pub http_addr: String,
    /// API prefix path (e.g., "/scheduler_extension")
    pub api_prefix: String,
    /// Priorities prefix path, appended to the API prefix
    pub priorities_prefix: String,
    /// Upper bound on handling one request, in seconds
    pub request_timeout_secs: u64,
    /// Largest accepted request body, in bytes
    pub max_body_bytes: usize,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for ExtenderConfig {
    fn default() -> Self {
        Self {
            http_addr: ":80".to_string(),
            api_prefix: "/my_scheduler_extension".to_string(),
            priorities_prefix: "/my_new_priorities".to_string(),
            request_timeout_secs: 10,
            max_body_bytes: 16 * 1024 * 1024,
            logging: LoggingConfig::default(),
        }
    }
}

impl ExtenderConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> ExtenderResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Fix up the address and prefixes, warning about each correction
    pub fn normalized(mut self) -> Self {
        if !self.http_addr.contains(':') {
            self.http_addr = format!(":{}", self.http_addr);
            warn!(
                http_addr = %self.http_addr,
                "http_addr was missing a `:`, it was automatically added"
            );
        }
        self.api_prefix = normalize_prefix("api_prefix", &self.api_prefix);
        self.priorities_prefix = normalize_prefix("priorities_prefix", &self.priorities_prefix);
        self
    }

    /// Full route path of the priority called `name`
    pub fn priority_path(&self, name: &str) -> String {
        format!("{}{}/{}", self.api_prefix, self.priorities_prefix, name)
    }

    /// Address to bind the HTTP listener to
    pub fn socket_addr(&self) -> ExtenderResult<SocketAddr> {
        let addr = if self.http_addr.starts_with(':') {
            format!("0.0.0.0{}", self.http_addr)
        } else {
            self.http_addr.clone()
        };
        addr.parse()
            .map_err(|e| ExtenderError::Config(format!("Invalid http_addr {:?}: {}", addr, e)))
    }
}

fn normalize_prefix(field: &str, prefix: &str) -> String {
    let trimmed = prefix.trim_end_matches('/');
    if trimmed.starts_with('/') || trimmed.is_empty() {
        return trimmed.to_string();
    }
    let fixed = format!("/{}", trimmed);
    warn!(
        field,
        prefix = %fixed,
        "prefix was missing a leading `/`, it was automatically added"
    );
    fixed
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
