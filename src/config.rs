//! Application configuration loaded from environment variables.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use serde::Deserialize;

use crate::error::{AppError, Result};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Server Configuration ===
    /// Address the HTTP server binds to.
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    // === Data ===
    /// Start from the four fixture users instead of an empty store.
    #[serde(default = "default_true")]
    pub seed_users: bool,

    // === Observability ===
    /// Log level filter (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Emit logs as JSON lines.
    #[serde(default)]
    pub log_json: bool,

    /// Install the Prometheus recorder and expose `/metrics`.
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            seed_users: true,
            rust_log: default_log_level(),
            log_json: false,
            metrics_enabled: true,
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    /// `overrides` take precedence over variables of the same name.
    pub fn load_with(overrides: Vec<(&str, String)>) -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars(), overrides)
    }

    /// Build configuration from variables, overrides applied before parsing.
    pub fn from_vars(
        vars: impl IntoIterator<Item = (String, String)>,
        overrides: Vec<(&str, String)>,
    ) -> Result<Self> {
        let mut vars: HashMap<String, String> = vars.into_iter().collect();
        for (key, value) in overrides {
            vars.insert(key.to_string(), value);
        }
        Ok(envy::from_iter(vars)?)
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<()> {
        if self.host.parse::<IpAddr>().is_err() {
            return Err(AppError::InvalidConfig(format!(
                "HOST must be an IP address, got {:?}",
                self.host
            )));
        }

        if self.port == 0 {
            return Err(AppError::InvalidConfig("PORT must be non-zero".to_string()));
        }

        Ok(())
    }

    /// Address to bind the HTTP listener to.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| AppError::InvalidConfig(format!("invalid HOST {:?}", self.host)))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
