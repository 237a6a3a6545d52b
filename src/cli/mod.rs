// CLI module for croply-relay
// Author: kelexine (https://github.com/kelexine)

use crate::config::Overrides;
use clap::Parser;
use std::path::PathBuf;

/// croply-relay - image analysis relay for a hosted vision workflow
#[derive(Parser, Debug)]
#[command(name = "croply-relay", version, about, long_about = None)]
pub struct Args {
    /// Path to a TOML config file (default: ~/.croply-relay/config.toml)
    #[arg(short, long, env = "CROPLY_RELAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to bind, overrides server.host
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on, overrides server.port
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl Args {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            config_path: self.config.clone(),
            host: self.host.clone(),
            port: self.port,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_overrides() {
        let args = Args::parse_from(["croply-relay", "--config", "relay.toml", "--port", "9090"]);
        let overrides = args.overrides();
        assert_eq!(overrides.config_path, Some(PathBuf::from("relay.toml")));
        assert_eq!(overrides.port, Some(9090));
        assert!(overrides.host.is_none());
    }
}
