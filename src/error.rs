//! Centralized error types for the bridge
//!
//! All bridge errors are represented by the `BridgeError` enum.
//! Use `Result<T>` as shorthand for `std::result::Result<T, BridgeError>`.

use std::fmt;
use std::path::PathBuf;

/// All bridge errors
#[derive(Debug)]
pub enum BridgeError {
    // === Network ===
    /// Failed to connect to the MAVLink server
    Connect {
        addr: String,
        source: std::io::Error,
    },
    /// Failed to write an outbound frame
    Send { source: std::io::Error },

    // === IO ===
    /// Failed to read the config file
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Invalid config value
    ConfigValidation { field: &'static str, reason: String },

    // === Runtime ===
    /// Tokio runtime creation failed
    Runtime { source: std::io::Error },
}

impl std::error::Error for BridgeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Connect { source, .. }
            | Self::Send { source }
            | Self::ConfigRead { source, .. }
            | Self::Runtime { source } => Some(source),
            Self::ConfigValidation { .. } => None,
        }
    }
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect { addr, .. } => write!(f, "Cannot connect to MAVLink server: {}", addr),
            Self::Send { .. } => write!(f, "Failed to send frame"),
            Self::ConfigRead { path, .. } => write!(f, "Cannot read config: {}", path.display()),
            Self::ConfigValidation { field, reason } => {
                write!(f, "Invalid {}: {}", field, reason)
            }
            Self::Runtime { .. } => write!(f, "Failed to create runtime"),
        }
    }
}

/// Alias for Result with BridgeError
pub type Result<T> = std::result::Result<T, BridgeError>;
