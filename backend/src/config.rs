use serde::{Deserialize, Serialize};
use songbook_config::{CONFIG_FILE, ConfigError, ConfigSection, env_override};
use std::time::Duration;

pub const SERVER_HOST_ENV: &str = "SERVER_HOST";
pub const SERVER_PORT_ENV: &str = "SERVER_PORT";

/// `[server]` section of songbook.toml.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
  pub host: String,
  pub port: u16,
  /// Time in-flight requests get to finish after a shutdown signal.
  pub shutdown_grace_secs: u64,
}

impl Default for ServerConfig {
  fn default() -> Self {
    ServerConfig { host: "0.0.0.0".to_string(), port: 8080, shutdown_grace_secs: 30 }
  }
}

impl ConfigSection for ServerConfig {
  const NAME: &'static str = "server";
}

impl ServerConfig {
  pub fn load() -> Result<Self, ConfigError> {
    CONFIG_FILE.load_or_init::<ServerConfig>()?.with_env_overrides()
  }

  /// Applies `SERVER_HOST` / `SERVER_PORT`.
  pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
    if let Some(host) = env_override(SERVER_HOST_ENV) {
      self.host = host;
    }
    if let Some(port) = env_override(SERVER_PORT_ENV) {
      self.port = port
        .trim()
        .parse()
        .map_err(|e| ConfigError::InvalidValue { key: SERVER_PORT_ENV.to_string(), reason: format!("{port:?}: {e}") })?;
    }
    Ok(self)
  }

  pub fn bind_addr(&self) -> String {
    format!("{}:{}", self.host, self.port)
  }

  pub fn shutdown_grace(&self) -> Duration {
    Duration::from_secs(self.shutdown_grace_secs)
  }
}
