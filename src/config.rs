//! Server configuration.

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "defaults::bind")]
    pub bind: SocketAddr,
    #[serde(default = "defaults::log_level")]
    pub log_level: String,
    /// Pushes buffered per subscriber before it is dropped.
    #[serde(default = "defaults::subscriber_buffer")]
    pub subscriber_buffer: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read '{path}'")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config")]
    Parse(#[from] toml::de::Error),
}

mod defaults {
    use std::net::{IpAddr, Ipv4Addr, SocketAddr};

    pub fn bind() -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3001)
    }

    pub fn log_level() -> String {
        "info".into()
    }

    pub fn subscriber_buffer() -> usize {
        crate::subscriptions::DEFAULT_BUFFER_SIZE
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: defaults::bind(),
            log_level: defaults::log_level(),
            subscriber_buffer: defaults::subscriber_buffer(),
        }
    }
}

impl ServerConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }
}
