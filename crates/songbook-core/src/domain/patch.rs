use crate::domain::song::{Song, SongInput, require_non_empty};
use crate::errors::CoreError;

/// Presence-aware replacement for a single field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldUpdate<T> {
  /// Leave the stored value untouched.
  #[default]
  Keep,
  /// Replace the stored value, even with an empty one.
  Set(T),
}

impl<T> FieldUpdate<T> {
  pub fn apply_to(self, current: &mut T) {
    if let FieldUpdate::Set(value) = self {
      *current = value;
    }
  }

  pub fn is_keep(&self) -> bool {
    matches!(self, FieldUpdate::Keep)
  }
}

impl<T> From<Option<T>> for FieldUpdate<T> {
  fn from(value: Option<T>) -> Self {
    match value {
      Some(v) => FieldUpdate::Set(v),
      None => FieldUpdate::Keep,
    }
  }
}

impl FieldUpdate<String> {
  /// Empty string means "keep". This is the legacy update contract.
  pub fn non_empty(value: String) -> Self {
    if value.is_empty() { FieldUpdate::Keep } else { FieldUpdate::Set(value) }
  }
}

/// Partial update of a song.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongPatch {
  pub group: FieldUpdate<String>,
  pub title: FieldUpdate<String>,
  pub text: FieldUpdate<String>,
  pub link: FieldUpdate<String>,
}

impl SongPatch {
  /// Builds a patch where every non-empty field replaces the stored value and
  /// every empty field keeps it. Fields can not be cleared this way.
  pub fn from_non_empty(input: SongInput) -> Self {
    SongPatch {
      group: FieldUpdate::non_empty(input.group),
      title: FieldUpdate::non_empty(input.title),
      text: FieldUpdate::non_empty(input.text),
      link: FieldUpdate::non_empty(input.link),
    }
  }

  /// Merges the patch into `song`. Group and title stay mandatory.
  pub fn apply(self, song: &mut Song) -> Result<(), CoreError> {
    if let FieldUpdate::Set(group) = &self.group {
      require_non_empty("group", group)?;
    }
    if let FieldUpdate::Set(title) = &self.title {
      require_non_empty("song", title)?;
    }

    self.group.apply_to(&mut song.group);
    self.title.apply_to(&mut song.title);
    self.text.apply_to(&mut song.text);
    self.link.apply_to(&mut song.link);
    Ok(())
  }
}
