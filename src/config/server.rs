//! Server configuration types

use serde::{Deserialize, Serialize};

/// Default listen address
fn default_listen() -> String {
    "0.0.0.0:9090".to_string()
}

/// Default outbound connect timeout in seconds
fn default_connect_timeout() -> u64 {
    10
}

/// Root configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Listener and dial settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Credential pair for the username/password method
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Listener and dial settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    /// Address the TCP listener binds (e.g., "0.0.0.0:9090")
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Outbound connect timeout in seconds; 0 disables the timeout
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            listen: default_listen(),
            connect_timeout: default_connect_timeout(),
        }
    }
}

/// Credential pair for the username/password method
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct AuthConfig {
    /// Expected username
    #[serde(default)]
    pub username: String,

    /// Expected password
    #[serde(default)]
    pub password: String,
}

impl Config {
    /// Check the configuration for values the protocol cannot carry.
    ///
    /// Credentials must be non-empty and fit a 1-byte length prefix; the
    /// listen address must parse as `host:port`.
    pub fn validate(&self) -> Result<(), String> {
        if self.auth.username.is_empty() || self.auth.password.is_empty() {
            return Err("username and password must be configured".to_string());
        }
        if self.auth.username.len() > 255 {
            return Err("username exceeds 255 bytes".to_string());
        }
        if self.auth.password.len() > 255 {
            return Err("password exceeds 255 bytes".to_string());
        }
        if self.server.listen.parse::<std::net::SocketAddr>().is_err() {
            return Err(format!("invalid listen address: {}", self.server.listen));
        }
        Ok(())
    }
}
