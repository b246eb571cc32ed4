use chrono::{DateTime, Utc};

use crate::pagination::PageRequest;

/// Match criteria for song listing.
///
/// An empty string matches every row for that field, an absent date bound
/// matches every release date. Both date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongFilter {
  pub group: String,
  pub title: String,
  pub text: String,
  pub link: String,
  pub released_from: Option<DateTime<Utc>>,
  pub released_to: Option<DateTime<Utc>>,
  pub page: PageRequest,
}

impl SongFilter {
  /// `true` when no criterion narrows the result set.
  pub fn matches_all(&self) -> bool {
    self.group.is_empty()
      && self.title.is_empty()
      && self.text.is_empty()
      && self.link.is_empty()
      && self.released_from.is_none()
      && self.released_to.is_none()
  }
}
