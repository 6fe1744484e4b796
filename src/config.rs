//! Configuration management
//!
//! Config file is `config.toml` in the working directory (or the path given
//! with `--config`). Missing file or missing fields fall back to defaults;
//! a malformed file logs a warning and uses defaults rather than aborting.

use crate::constants::{
    DEFAULT_COMPONENT_ID, DEFAULT_SERVER_IP, DEFAULT_SERVER_PORT, DEFAULT_STATUSTEXT_INTERVAL_US,
    DEFAULT_SYSTEM_ID, DEFAULT_TARGET_COMPONENT, DEFAULT_TARGET_SYSTEM,
};
use crate::error::{BridgeError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::IpAddr;
use std::path::Path;
use tracing::warn;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub connection: ConnectionConfig,
    pub link: LinkConfig,
}

/// Where the MAVLink server lives
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Server IP address
    pub server_ip: String,
    /// Server TCP port
    pub server_port: u16,
}

/// Identities and request parameters on the MAVLink link
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Our system id (255 = ground control station)
    pub system_id: u8,
    /// Our component id
    pub component_id: u8,
    /// Autopilot system id commands are addressed to
    pub target_system: u8,
    /// Autopilot component id commands are addressed to
    pub target_component: u8,
    /// Requested STATUSTEXT emission interval (microseconds)
    pub statustext_interval_us: i32,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            server_ip: DEFAULT_SERVER_IP.to_string(),
            server_port: DEFAULT_SERVER_PORT,
        }
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            system_id: DEFAULT_SYSTEM_ID,
            component_id: DEFAULT_COMPONENT_ID,
            target_system: DEFAULT_TARGET_SYSTEM,
            target_component: DEFAULT_TARGET_COMPONENT,
            statustext_interval_us: DEFAULT_STATUSTEXT_INTERVAL_US,
        }
    }
}

impl Config {
    /// Reject values the session cannot use before any connect attempt
    pub fn validate(&self) -> Result<()> {
        if self.connection.server_ip.parse::<IpAddr>().is_err() {
            return Err(BridgeError::ConfigValidation {
                field: "server_ip",
                reason: format!("not an IP address: {}", self.connection.server_ip),
            });
        }
        if self.connection.server_port == 0 {
            return Err(BridgeError::ConfigValidation {
                field: "server_port",
                reason: "must be non-zero".into(),
            });
        }
        Ok(())
    }
}

/// Load config from file; a missing file means defaults
///
/// A file that exists but cannot be read is an error; a file that parses
/// badly logs a warning and falls back to defaults rather than aborting.
pub fn load(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path).map_err(|e| BridgeError::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    match toml::from_str(&content) {
        Ok(config) => Ok(config),
        Err(e) => {
            warn!("Config parse error in {:?}: {}, using defaults", path, e);
            Ok(Config::default())
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::default();

        assert_eq!(config.connection.server_ip, DEFAULT_SERVER_IP);
        assert_eq!(config.connection.server_port, DEFAULT_SERVER_PORT);
        assert_eq!(config.link.system_id, DEFAULT_SYSTEM_ID);
        assert_eq!(config.link.component_id, DEFAULT_COMPONENT_ID);
        assert_eq!(config.link.target_system, DEFAULT_TARGET_SYSTEM);
        assert_eq!(config.link.target_component, DEFAULT_TARGET_COMPONENT);
        assert_eq!(
            config.link.statustext_interval_us,
            DEFAULT_STATUSTEXT_INTERVAL_US
        );
    }

    #[test]
    fn test_config_serialize_deserialize_roundtrip() {
        let config = Config {
            connection: ConnectionConfig {
                server_ip: "10.0.0.2".to_string(),
                server_port: 5760,
            },
            link: LinkConfig {
                system_id: 254,
                component_id: 1,
                target_system: 2,
                target_component: 1,
                statustext_interval_us: 500_000,
            },
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let restored: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(restored.connection.server_ip, "10.0.0.2");
        assert_eq!(restored.connection.server_port, 5760);
        assert_eq!(restored.link.system_id, 254);
        assert_eq!(restored.link.statustext_interval_us, 500_000);
    }

    #[test]
    fn test_config_partial_file() {
        // Only some fields set - rest should use defaults
        let partial_toml = r#"
[connection]
server_port = 5762
"#;

        let config: Config = toml::from_str(partial_toml).unwrap();

        assert_eq!(config.connection.server_port, 5762);
        assert_eq!(config.connection.server_ip, DEFAULT_SERVER_IP);
        assert_eq!(config.link.system_id, DEFAULT_SYSTEM_ID);
    }

    #[test]
    fn test_config_empty_file() {
        let config: Config = toml::from_str("").unwrap();

        assert_eq!(config.connection.server_ip, DEFAULT_SERVER_IP);
        assert_eq!(config.connection.server_port, DEFAULT_SERVER_PORT);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = load(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.connection.server_port, DEFAULT_SERVER_PORT);
    }

    #[test]
    fn test_validate_default_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_ip() {
        let mut config = Config::default();
        config.connection.server_ip = "not-an-ip".into();
        assert!(matches!(
            config.validate(),
            Err(BridgeError::ConfigValidation {
                field: "server_ip",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_port() {
        let mut config = Config::default();
        config.connection.server_port = 0;
        assert!(matches!(
            config.validate(),
            Err(BridgeError::ConfigValidation {
                field: "server_port",
                ..
            })
        ));
    }
}
