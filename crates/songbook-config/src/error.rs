use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
  #[error("could not determine a home directory")]
  Directories,
  #[error("malformed config file: {0}")]
  Syntax(#[from] toml_edit::TomlError),
  #[error("decode section [{section}]: {source}")]
  Decode {
    section: &'static str,
    #[source]
    source: toml::de::Error,
  },
  #[error("encode section [{section}]: {source}")]
  Encode {
    section: &'static str,
    #[source]
    source: toml::ser::Error,
  },
  #[error("invalid value for {key}: {reason}")]
  InvalidValue { key: String, reason: String },
}
