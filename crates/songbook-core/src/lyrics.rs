//! Verse based pagination of lyrics.

use crate::domain::LyricsPage;
use crate::errors::CoreError;
use crate::pagination::{PageRequest, paginate};

/// Blank line between two verses.
pub const VERSE_SEPARATOR: &str = "\n\n";

pub fn split_verses(text: &str) -> Vec<&str> {
  text.split(VERSE_SEPARATOR).collect()
}

/// Selects the verses of the requested page and joins them back with
/// [`VERSE_SEPARATOR`].
pub fn paginate_lyrics(text: &str, request: PageRequest) -> Result<LyricsPage, CoreError> {
  if text.is_empty() {
    return Err(CoreError::lyrics_not_found("lyrics not found"));
  }

  let verses = split_verses(text);
  let total = verses.len() as u64;
  let window = paginate(total, request)?;

  // Both bounds fit in `usize`: they never exceed `verses.len()`.
  let start = window.offset as usize;
  let end = window.end(total) as usize;

  Ok(LyricsPage {
    text: verses[start..end].join(VERSE_SEPARATOR),
    current_page: window.page,
    total_pages: window.total_pages,
    page_size: window.page_size,
  })
}
