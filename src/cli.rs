//! Command-line interface definition using clap
//!
//! Provides structured argument parsing with automatic help generation.

use clap::Parser;
use std::path::PathBuf;

/// TCP bridge to a MAVLink autopilot
#[derive(Parser, Debug, Default)]
#[command(name = "mav-bridge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose debug output
    #[arg(short, long)]
    pub verbose: bool,

    /// Server IP address (overrides config)
    #[arg(long, value_name = "ADDR")]
    pub ip: Option<String>,

    /// Server TCP port (overrides config)
    #[arg(long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Config file path (default: ./config.toml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_defaults() {
        let cli = Cli::parse_from(["mav-bridge"]);
        assert!(!cli.verbose);
        assert!(cli.ip.is_none());
        assert!(cli.port.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_parse_verbose() {
        let cli = Cli::parse_from(["mav-bridge", "-v"]);
        assert!(cli.verbose);

        let cli = Cli::parse_from(["mav-bridge", "--verbose"]);
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_parse_endpoint() {
        let cli = Cli::parse_from(["mav-bridge", "--ip", "10.0.0.2", "--port", "5760"]);
        assert_eq!(cli.ip, Some("10.0.0.2".to_string()));
        assert_eq!(cli.port, Some(5760));
    }

    #[test]
    fn test_cli_parse_config_path() {
        let cli = Cli::parse_from(["mav-bridge", "--config", "/etc/mav-bridge.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("/etc/mav-bridge.toml")));
    }
}
