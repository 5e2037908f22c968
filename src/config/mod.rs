//! Configuration module for socksd
//!
//! Configuration comes from an optional TOML file with CLI overrides applied
//! by `main`; the core never reads environment state.

mod server;

pub use server::{AuthConfig, Config, ServerConfig};

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let content = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

    parse_config(&content)
}

/// Parse configuration from a TOML string
pub fn parse_config(content: &str) -> Result<Config> {
    toml::from_str(content).with_context(|| "Failed to parse configuration")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let config_str = r#"
[auth]
username = "zhangsan"
password = "123456"
"#;

        let config = parse_config(config_str).unwrap();
        assert_eq!(config.server.listen, "0.0.0.0:9090");
        assert_eq!(config.server.connect_timeout, 10);
        assert_eq!(config.auth.username, "zhangsan");
        assert_eq!(config.auth.password, "123456");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let config_str = r#"
[server]
listen = "127.0.0.1:1080"
connect_timeout = 5

[auth]
username = "user"
password = "pass"
"#;

        let config = parse_config(config_str).unwrap();
        assert_eq!(config.server.listen, "127.0.0.1:1080");
        assert_eq!(config.server.connect_timeout, 5);
        assert_eq!(config.auth.username, "user");
    }

    #[test]
    fn test_parse_invalid_toml() {
        assert!(parse_config("[server\nlisten = ").is_err());
    }
}
