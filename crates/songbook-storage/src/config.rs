use songbook_config::{CONFIG_FILE, ConfigError, ConfigSection, PATHS, env_override};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Overrides `db_path` (a plain file path, `sqlite://` prefix accepted).
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
  pub db_path: PathBuf,
  pub journal_mode: Option<String>,
  pub busy_timeout_ms: u32,
  pub max_connections: u32,
}

impl Default for StorageConfig {
  fn default() -> Self {
    StorageConfig::for_path(PATHS.data_dir.join("songbook.db"))
  }
}

impl ConfigSection for StorageConfig {
  const NAME: &'static str = "storage";
}

impl StorageConfig {
  /// Default tuning for a database at `db_path`.
  pub fn for_path(db_path: impl Into<PathBuf>) -> Self {
    StorageConfig {
      db_path: db_path.into(),
      journal_mode: Some("WAL".to_string()),
      busy_timeout_ms: 5_000,
      max_connections: 8,
    }
  }

  /// Loads `[storage]` and applies the `DATABASE_URL` override (the
  /// override is not persisted).
  pub fn load() -> Result<Self, ConfigError> {
    CONFIG_FILE.load_or_init::<StorageConfig>().map(Self::with_env_overrides)
  }

  pub fn with_env_overrides(mut self) -> Self {
    if let Some(url) = env_override(DATABASE_URL_ENV) {
      self.db_path = PathBuf::from(url.strip_prefix("sqlite://").unwrap_or(&url));
    }
    self
  }

  /// Connection string understood by Diesel's SQLite backend.
  pub fn database_url(&self) -> String {
    self.db_path.to_string_lossy().into_owned()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use songbook_config::ConfigFile;
  use tempfile::tempdir;

  #[test]
  fn storage_section_is_read_from_config_file() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("songbook.toml");
    std::fs::write(
      &path,
      "[storage]\ndb_path = \"/srv/songs.db\"\njournal_mode = \"DELETE\"\nbusy_timeout_ms = 250\nmax_connections = 2\n",
    )
    .unwrap();

    let cfg = ConfigFile::new(&path).load_or_init::<StorageConfig>().unwrap();

    assert_eq!(cfg.database_url(), "/srv/songs.db");
    assert_eq!(cfg.journal_mode.as_deref(), Some("DELETE"));
    assert_eq!((cfg.busy_timeout_ms, cfg.max_connections), (250, 2));
  }

  #[test]
  fn database_url_env_replaces_path() {
    let cfg = StorageConfig::for_path("/var/lib/songbook/songbook.db");

    unsafe { std::env::set_var(DATABASE_URL_ENV, "sqlite:///tmp/override.db") };
    let overridden = cfg.clone().with_env_overrides();
    unsafe { std::env::set_var(DATABASE_URL_ENV, "") };
    let untouched = cfg.with_env_overrides();
    unsafe { std::env::remove_var(DATABASE_URL_ENV) };

    assert_eq!(overridden.database_url(), "/tmp/override.db");
    assert_eq!(untouched.database_url(), "/var/lib/songbook/songbook.db");
    assert_eq!(untouched.max_connections, 8);
  }
}
