//! Configuration loading from disk.

use std::net::SocketAddr;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::Config;

/// Why a configuration file was not accepted.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.client.timeout_secs == 0 {
        return Err(ConfigError::Invalid(
            "client.timeout_secs must be positive".to_string(),
        ));
    }
    if config.client.buffer_size == 0 {
        return Err(ConfigError::Invalid(
            "client.buffer_size must be positive".to_string(),
        ));
    }
    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        return Err(ConfigError::Invalid(format!(
            "server.bind_address is not a socket address: {}",
            config.server.bind_address
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: Config = toml::from_str("[client]\ntimeout_secs = 5\n").unwrap();
        assert_eq!(config.client.timeout_secs, 5);
        assert_eq!(config.client.buffer_size, crate::client::DEFAULT_BUFFER_SIZE);
        assert_eq!(config.server.bind_address, "127.0.0.1:8080");
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let config: Config = toml::from_str("[client]\ntimeout_secs = 0\n").unwrap();
        assert!(matches!(validate(&config), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn bad_bind_address_is_rejected() {
        let config: Config =
            toml::from_str("[server]\nbind_address = \"not-an-address\"\n").unwrap();
        assert!(matches!(validate(&config), Err(ConfigError::Invalid(_))));
    }
}
