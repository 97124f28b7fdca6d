use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

use crate::document_actor::StoreOptions;
use crate::http::HttpOptions;

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// API port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Prometheus exporter port
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,

    /// Log level, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// `compact` or `json`
    #[serde(default)]
    pub log_format: LogFormat,

    /// Request timeout in milliseconds
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Actions allowed to wait while one executes
    #[serde(default = "default_mailbox_capacity")]
    pub mailbox_capacity: usize,

    /// Longest accepted `/sleep`, in milliseconds
    #[serde(default = "default_max_sleep_ms")]
    pub max_sleep_ms: u64,

    /// Body limit for `/documents`
    #[serde(default = "default_max_document_bytes")]
    pub max_document_bytes: usize,

    /// Body limit for `/documents/find`
    #[serde(default = "default_max_query_bytes")]
    pub max_query_bytes: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            metrics_port: default_metrics_port(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            request_timeout_ms: default_request_timeout_ms(),
            mailbox_capacity: default_mailbox_capacity(),
            max_sleep_ms: default_max_sleep_ms(),
            max_document_bytes: default_max_document_bytes(),
            max_query_bytes: default_max_query_bytes(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from an optional `docstore` file, then `DOCSTORE__*` variables
    pub fn load() -> anyhow::Result<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("docstore").required(false))
            .add_source(config::Environment::with_prefix("DOCSTORE").separator("__"));

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Get the socket address to bind the API to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.bind_addr, self.port).parse()?)
    }

    /// Get the socket address to bind the metrics exporter to
    pub fn metrics_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.bind_addr, self.metrics_port).parse()?)
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            mailbox_capacity: self.mailbox_capacity,
            max_sleep: Duration::from_millis(self.max_sleep_ms),
        }
    }

    pub fn http_options(&self) -> HttpOptions {
        HttpOptions {
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            max_document_bytes: self.max_document_bytes,
            max_query_bytes: self.max_query_bytes,
        }
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_metrics_port() -> u16 {
    9090
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_request_timeout_ms() -> u64 {
    5000
}

fn default_mailbox_capacity() -> usize {
    1
}

fn default_max_sleep_ms() -> u64 {
    5000
}

fn default_max_document_bytes() -> usize {
    10000
}

fn default_max_query_bytes() -> usize {
    1000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.log_format, LogFormat::Compact);
        assert_eq!(cfg.request_timeout_ms, 5000);
        assert_eq!(cfg.mailbox_capacity, 1);
        assert_eq!(cfg.max_document_bytes, 10000);
        assert_eq!(cfg.max_query_bytes, 1000);
    }

    #[test]
    fn test_socket_addr() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.socket_addr().unwrap().port(), 8080);
        assert_eq!(cfg.metrics_addr().unwrap().port(), 9090);
    }

    #[test]
    fn test_bad_bind_addr_is_an_error() {
        let cfg = ServerConfig {
            bind_addr: "not an address".to_string(),
            ..ServerConfig::default()
        };
        assert!(cfg.socket_addr().is_err());
    }

    #[test]
    fn test_partial_source_keeps_defaults() {
        let cfg: ServerConfig = config::Config::builder()
            .add_source(config::File::from_str(
                "port = 3000\nlog_format = \"json\"",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.log_format, LogFormat::Json);
        assert_eq!(cfg.max_sleep_ms, 5000);
    }

    #[test]
    fn test_options_carry_limits() {
        let cfg = ServerConfig {
            max_sleep_ms: 1200,
            request_timeout_ms: 250,
            ..ServerConfig::default()
        };
        assert_eq!(cfg.store_options().max_sleep, Duration::from_millis(1200));
        assert_eq!(cfg.http_options().request_timeout, Duration::from_millis(250));
    }
}
