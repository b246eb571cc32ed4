use chrono::{DateTime, Utc};

use crate::domain::ids::SongId;
use crate::errors::CoreError;

/// A catalogued song.
///
/// `(group, title)` is unique across the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
  pub id: SongId,
  /// Performing group or artist.
  pub group: String,
  pub title: String,
  pub release_date: DateTime<Utc>,
  /// Full lyrics, verses separated by a blank line. May be empty.
  pub text: String,
  /// External link, may be empty.
  pub link: String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Caller supplied fields for a new song.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongInput {
  pub group: String,
  pub title: String,
  pub text: String,
  pub link: String,
}

impl SongInput {
  pub fn validate(&self) -> Result<(), CoreError> {
    require_non_empty("group", &self.group)?;
    require_non_empty("song", &self.title)
  }
}

/// Row handed to the store on insert. The store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSong {
  pub group: String,
  pub title: String,
  pub release_date: DateTime<Utc>,
  pub text: String,
  pub link: String,
}

impl NewSong {
  pub fn from_input(input: SongInput, release_date: DateTime<Utc>) -> Self {
    NewSong { group: input.group, title: input.title, release_date, text: input.text, link: input.link }
  }
}

pub(crate) fn require_non_empty(field: &str, value: &str) -> Result<(), CoreError> {
  if value.trim().is_empty() {
    return Err(CoreError::bad_request(format!("field `{field}` must not be empty")));
  }
  Ok(())
}
