// crates/songbook-core/src/errors.rs
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Coarse classification of a [`CoreError`].
///
/// Boundary layers map each kind to their own status vocabulary (HTTP status
/// codes, exit codes, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
  NotFound,
  BadRequest,
  Validation,
  AlreadyExists,
  Internal,
}

/// Error of the songbook core.
///
/// Every failure carries a human readable message. All kinds except
/// `LyricsNotFound` can also carry the underlying cause.
#[derive(Debug, Error)]
pub enum CoreError {
  #[error("{message}")]
  NotFound {
    message: String,
    #[source]
    source: Option<BoxError>,
  },

  /// The song exists but has no lyrics text.
  #[error("{message}")]
  LyricsNotFound { message: String },

  #[error("{message}")]
  BadRequest {
    message: String,
    #[source]
    source: Option<BoxError>,
  },

  #[error("{message}")]
  Validation {
    message: String,
    #[source]
    source: Option<BoxError>,
  },

  #[error("{message}")]
  AlreadyExists {
    message: String,
    #[source]
    source: Option<BoxError>,
  },

  #[error("{message}")]
  Internal {
    message: String,
    #[source]
    source: Option<BoxError>,
  },
}

impl CoreError {
  pub fn not_found(message: impl Into<String>) -> Self {
    CoreError::NotFound { message: message.into(), source: None }
  }

  pub fn lyrics_not_found(message: impl Into<String>) -> Self {
    CoreError::LyricsNotFound { message: message.into() }
  }

  pub fn bad_request(message: impl Into<String>) -> Self {
    CoreError::BadRequest { message: message.into(), source: None }
  }

  pub fn validation(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
    CoreError::Validation { message: message.into(), source: Some(source.into()) }
  }

  pub fn already_exists(message: impl Into<String>) -> Self {
    CoreError::AlreadyExists { message: message.into(), source: None }
  }

  pub fn internal(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
    CoreError::Internal { message: message.into(), source: Some(source.into()) }
  }

  /// Attaches (or replaces) the underlying cause. `LyricsNotFound` has no cause
  /// and is returned unchanged.
  pub fn with_source(self, cause: impl Into<BoxError>) -> Self {
    let cause = Some(cause.into());
    match self {
      CoreError::NotFound { message, .. } => CoreError::NotFound { message, source: cause },
      CoreError::BadRequest { message, .. } => CoreError::BadRequest { message, source: cause },
      CoreError::Validation { message, .. } => CoreError::Validation { message, source: cause },
      CoreError::AlreadyExists { message, .. } => CoreError::AlreadyExists { message, source: cause },
      CoreError::Internal { message, .. } => CoreError::Internal { message, source: cause },
      lyrics @ CoreError::LyricsNotFound { .. } => lyrics,
    }
  }

  pub fn kind(&self) -> ErrorKind {
    match self {
      CoreError::NotFound { .. } | CoreError::LyricsNotFound { .. } => ErrorKind::NotFound,
      CoreError::BadRequest { .. } => ErrorKind::BadRequest,
      CoreError::Validation { .. } => ErrorKind::Validation,
      CoreError::AlreadyExists { .. } => ErrorKind::AlreadyExists,
      CoreError::Internal { .. } => ErrorKind::Internal,
    }
  }

  pub fn is_lyrics_not_found(&self) -> bool {
    matches!(self, CoreError::LyricsNotFound { .. })
  }

  pub fn message(&self) -> &str {
    match self {
      CoreError::NotFound { message, .. }
      | CoreError::LyricsNotFound { message }
      | CoreError::BadRequest { message, .. }
      | CoreError::Validation { message, .. }
      | CoreError::AlreadyExists { message, .. }
      | CoreError::Internal { message, .. } => message,
    }
  }
}
