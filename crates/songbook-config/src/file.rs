use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use toml_edit::{DocumentMut, Item, Table};

use crate::error::ConfigError;
use crate::paths::SongbookPaths;

/// A top level table of `songbook.toml` owned by one component.
pub trait ConfigSection: Serialize + DeserializeOwned + Default {
  const NAME: &'static str;
}

/// `songbook.toml`, accessed one section at a time.
#[derive(Debug, Clone)]
pub struct ConfigFile {
  path: PathBuf,
}

impl ConfigFile {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn in_dirs(paths: &SongbookPaths) -> Self {
    Self::new(paths.config_file())
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Reads section `T`, falling back to `T::default()` for a missing file,
  /// table or key, then writes any missing keys back so the file lists every
  /// setting. Values, comments and other sections already in the file are
  /// left as they are, and the file is only rewritten when something was added.
  pub fn load_or_init<T: ConfigSection>(&self) -> Result<T, ConfigError> {
    let original = match fs::read_to_string(&self.path) {
      Ok(content) => content,
      Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
      Err(e) => return Err(e.into()),
    };
    let mut doc: DocumentMut = original.parse()?;
    let mut parsed: toml::Table =
      toml::from_str(&original).map_err(|source| ConfigError::Decode { section: T::NAME, source })?;

    let value: T = match parsed.remove(T::NAME) {
      Some(section) => section.try_into().map_err(|source| ConfigError::Decode { section: T::NAME, source })?,
      None => T::default(),
    };

    let resolved: DocumentMut = toml::to_string(&value)
      .map_err(|source| ConfigError::Encode { section: T::NAME, source })?
      .parse()?;
    fill_missing(&mut doc, T::NAME, resolved.as_table());

    let rendered = doc.to_string();
    if rendered != original {
      write_replacing(&self.path, &rendered)?;
    }
    Ok(value)
  }
}

fn fill_missing(doc: &mut DocumentMut, name: &str, resolved: &Table) {
  match doc.get_mut(name).and_then(Item::as_table_mut) {
    Some(existing) => {
      for (key, item) in resolved.iter() {
        if !existing.contains_key(key) {
          existing.insert(key, item.clone());
        }
      }
    }
    None => doc[name] = Item::Table(resolved.clone()),
  }
}

/// Writes through a sibling temp file and a rename so a crash never leaves a
/// truncated config behind.
fn write_replacing(path: &Path, contents: &str) -> io::Result<()> {
  if let Some(dir) = path.parent() {
    fs::create_dir_all(dir)?;
  }

  let staged = path.with_extension("toml.partial");
  let written = fs::File::create(&staged)
    .and_then(|mut file| {
      file.write_all(contents.as_bytes())?;
      file.sync_all()
    })
    .and_then(|()| fs::rename(&staged, path));

  if written.is_err() {
    let _ = fs::remove_file(&staged);
  }
  written
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde::Deserialize;
  use tempfile::{TempDir, tempdir};

  #[derive(Debug, PartialEq, Serialize, Deserialize)]
  #[serde(default)]
  struct Listener {
    port: u16,
    host: String,
  }

  impl Default for Listener {
    fn default() -> Self {
      Listener { port: 8080, host: "0.0.0.0".into() }
    }
  }

  impl ConfigSection for Listener {
    const NAME: &'static str = "listener";
  }

  fn config_file() -> (TempDir, ConfigFile) {
    let tmp = tempdir().unwrap();
    let file = ConfigFile::in_dirs(&SongbookPaths::under(tmp.path().to_path_buf()));
    (tmp, file)
  }

  #[test]
  fn missing_file_is_created_with_defaults() {
    let (_tmp, file) = config_file();

    let loaded: Listener = file.load_or_init().unwrap();

    assert_eq!(loaded, Listener::default());
    let raw = fs::read_to_string(file.path()).unwrap();
    assert!(raw.contains("[listener]"));
    assert!(raw.contains("port = 8080"));
  }

  #[test]
  fn partial_section_is_completed_in_place() {
    let (_tmp, file) = config_file();
    fs::create_dir_all(file.path().parent().unwrap()).unwrap();
    fs::write(file.path(), "# hand written\n[other]\nkeep = true\n\n[listener]\n# public port\nport = 9000\n").unwrap();

    let loaded: Listener = file.load_or_init().unwrap();

    assert_eq!(loaded, Listener { port: 9000, host: "0.0.0.0".into() });
    let raw = fs::read_to_string(file.path()).unwrap();
    assert!(raw.contains("# hand written"));
    assert!(raw.contains("keep = true"));
    assert!(raw.contains("# public port"));
    assert!(raw.contains("host = \"0.0.0.0\""));
  }

  #[test]
  fn complete_file_is_left_untouched() {
    let (_tmp, file) = config_file();
    fs::create_dir_all(file.path().parent().unwrap()).unwrap();
    let content = "[listener]\nport   = 7000 # spaced\nhost = \"127.0.0.1\"\n";
    fs::write(file.path(), content).unwrap();

    let loaded: Listener = file.load_or_init().unwrap();

    assert_eq!(loaded.port, 7000);
    assert_eq!(fs::read_to_string(file.path()).unwrap(), content);
  }

  #[test]
  fn bad_value_names_the_section() {
    let (_tmp, file) = config_file();
    fs::create_dir_all(file.path().parent().unwrap()).unwrap();
    fs::write(file.path(), "[listener]\nport = \"not a number\"\n").unwrap();

    let err = file.load_or_init::<Listener>().unwrap_err();

    assert!(matches!(err, ConfigError::Decode { section: "listener", .. }));
  }
}
