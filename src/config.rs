use std::{path::Path, time::Duration};

use serde::Deserialize;

use crate::{error::LoadError, islands::GeneratorOptions};

pub const ENV_NETWORK_ADDRESS: &str = "POLYPLAN_NETWORK_ADDRESS";
pub const ENV_NETWORK_PORT: &str = "POLYPLAN_NETWORK_PORT";

/// Where the command listener binds and how large a frame it accepts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub address: String,
    pub port: u16,
    /// Largest request or reply payload in bytes.
    pub max_frame_length: usize,
    /// A connection with no request for this long is closed.
    pub idle_timeout_ms: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 9991,
            max_frame_length: 8 * 1024 * 1024,
            idle_timeout_ms: 5_000,
        }
    }
}

impl NetworkConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PolyplanConfig {
    pub network: NetworkConfig,
    pub generator: GeneratorOptions,
}

impl PolyplanConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(text: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|source| LoadError::Io { path: path.display().to_string(), source })?;
        Self::from_json_str(&text)
    }

    /// Applies `POLYPLAN_NETWORK_*` variables from the process environment.
    pub fn with_env_overrides(self) -> Result<Self, LoadError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LoadError> {
        if let Some(address) = lookup(ENV_NETWORK_ADDRESS) {
            self.network.address = address;
        }
        if let Some(port) = lookup(ENV_NETWORK_PORT) {
            self.network.port = port.trim().parse().map_err(|_| LoadError::Invalid {
                key: ENV_NETWORK_PORT.to_string(),
                message: format!("'{}' is not a port number", port),
            })?;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use crate::{
        config::{PolyplanConfig, ENV_NETWORK_ADDRESS, ENV_NETWORK_PORT},
        error::LoadError,
    };

    #[test]
    pub fn test_config_defaults() {
        let config = PolyplanConfig::new();
        assert_eq!(config.network.bind_address(), "127.0.0.1:9991");
        assert!(!config.generator.emit_pruned_tokens);
        assert_eq!(config.network.idle_timeout(), std::time::Duration::from_secs(5));
    }

    #[test]
    pub fn test_config_partial_json() {
        let config = PolyplanConfig::from_json_str(r#"{"network": {"port": 7000, "idle_timeout_ms": 250}, "generator": {"terminate_statement": true}}"#).unwrap();
        assert_eq!(config.network.port, 7000);
        assert_eq!(config.network.idle_timeout_ms, 250);
        assert_eq!(config.network.address, "127.0.0.1");
        assert!(config.generator.terminate_statement);
    }

    #[test]
    pub fn test_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", r#"{"network": {"address": "0.0.0.0", "max_frame_length": 1024}}"#).unwrap();

        let config = PolyplanConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.network.address, "0.0.0.0");
        assert_eq!(config.network.max_frame_length, 1024);

        match PolyplanConfig::from_json_file(file.path().with_extension("missing")) {
            Err(LoadError::Io { .. }) => {},
            other => panic!("expected io error, got {:?}", other),
        }
    }

    #[test]
    pub fn test_config_overrides() {
        let config = PolyplanConfig::new()
            .with_overrides(|key| match key {
                ENV_NETWORK_ADDRESS => Some("10.0.0.5".to_string()),
                ENV_NETWORK_PORT => Some("6000".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.network.bind_address(), "10.0.0.5:6000");

        let bad = PolyplanConfig::new().with_overrides(|key| (key == ENV_NETWORK_PORT).then(|| "many".to_string()));
        assert!(matches!(bad, Err(LoadError::Invalid { .. })));
    }
}
