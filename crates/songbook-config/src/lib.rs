mod error;
mod file;
mod paths;

pub use error::ConfigError;
pub use file::{ConfigFile, ConfigSection};
pub use paths::SongbookPaths;

use once_cell::sync::Lazy;

// Process wide paths, resolved once (SONGBOOK_BASE_DIR or platform dirs).
pub static PATHS: Lazy<SongbookPaths> = Lazy::new(|| SongbookPaths::new().expect("failed to init SongbookPaths"));

// Process wide `songbook.toml` under `PATHS.config_dir`.
pub static CONFIG_FILE: Lazy<ConfigFile> = Lazy::new(|| ConfigFile::in_dirs(&PATHS));

/// Reads an environment override, treating an empty value as unset.
pub fn env_override(key: &str) -> Option<String> {
  std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
