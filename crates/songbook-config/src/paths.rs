use directories::ProjectDirs;
use std::path::PathBuf;

use crate::error::ConfigError;

pub const BASE_DIR_ENV: &str = "SONGBOOK_BASE_DIR";

/// Directories used by the service: configuration and data (the SQLite file).
#[derive(Debug, Clone)]
pub struct SongbookPaths {
  pub base_dir: PathBuf,
  pub config_dir: PathBuf,
  pub data_dir: PathBuf,
}

impl SongbookPaths {
  /// Resolves the directories and creates them if missing.
  ///
  /// `SONGBOOK_BASE_DIR` puts everything under one directory (containers,
  /// tests); otherwise the platform conventions apply.
  pub fn new() -> Result<Self, ConfigError> {
    let paths = match std::env::var(BASE_DIR_ENV) {
      Ok(env_base) if !env_base.is_empty() => Self::under(PathBuf::from(env_base)),
      _ => {
        let proj_dirs = ProjectDirs::from("com", "songbook", "songbook").ok_or(ConfigError::Directories)?;
        Self {
          base_dir: proj_dirs.config_dir().to_path_buf(),
          config_dir: proj_dirs.config_dir().to_path_buf(),
          data_dir: proj_dirs.data_dir().to_path_buf(),
        }
      }
    };

    std::fs::create_dir_all(&paths.config_dir)?;
    std::fs::create_dir_all(&paths.data_dir)?;

    Ok(paths)
  }

  /// Layout rooted at `base`, without touching the filesystem.
  pub fn under(base: PathBuf) -> Self {
    Self { config_dir: base.join("config"), data_dir: base.join("data"), base_dir: base }
  }

  pub fn config_file(&self) -> PathBuf {
    self.config_dir.join("songbook.toml")
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  struct EnvVarGuard {
    key: String,
    original: Option<String>,
  }

  impl EnvVarGuard {
    fn new(key: &str, value: &str) -> Self {
      let original = std::env::var(key).ok();
      unsafe { std::env::set_var(key, value) };
      EnvVarGuard { key: key.to_owned(), original }
    }
  }

  impl Drop for EnvVarGuard {
    fn drop(&mut self) {
      match &self.original {
        Some(val) => unsafe { std::env::set_var(&self.key, val) },
        None => unsafe { std::env::remove_var(&self.key) },
      }
    }
  }

  #[test]
  fn test_songbook_base_dir_override() {
    let tmp = tempdir().unwrap();
    let _env = EnvVarGuard::new(BASE_DIR_ENV, tmp.path().to_str().unwrap());

    let paths = SongbookPaths::new().unwrap();

    assert_eq!(paths.base_dir, tmp.path());
    assert_eq!(paths.config_dir, tmp.path().join("config"));
    assert_eq!(paths.data_dir, tmp.path().join("data"));
    assert_eq!(paths.config_file(), tmp.path().join("config").join("songbook.toml"));

    assert!(paths.config_dir.exists());
    assert!(paths.data_dir.exists());
  }
}
