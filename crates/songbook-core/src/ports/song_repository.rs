use async_trait::async_trait;

use crate::domain::{NewSong, Song, SongFilter, SongId};
use crate::errors::CoreError;

/// Persistence port for songs.
///
/// Implementations report a missing row as [`CoreError::NotFound`], a
/// `(group, title)` collision as [`CoreError::AlreadyExists`] and every other
/// storage failure as [`CoreError::Internal`].
#[async_trait]
pub trait SongRepository: Send + Sync {
  /// Number of songs matching `filter`. Paging fields of the filter are ignored.
  async fn count(&self, filter: &SongFilter) -> Result<u64, CoreError>;

  /// Matching songs, newest first, starting at `offset`.
  async fn list(&self, filter: &SongFilter, limit: u64, offset: u64) -> Result<Vec<Song>, CoreError>;

  async fn find_by_id(&self, id: SongId) -> Result<Song, CoreError>;

  /// Exact match on `(group, title)`, optionally ignoring one song.
  async fn exists_by_group_and_title(
    &self,
    group: &str,
    title: &str,
    exclude: Option<SongId>,
  ) -> Result<bool, CoreError>;

  /// Stores a new song; id and timestamps are assigned by the store.
  async fn insert(&self, song: NewSong) -> Result<Song, CoreError>;

  /// Overwrites every mutable column of the song with `song.id`.
  async fn update(&self, song: &Song) -> Result<Song, CoreError>;

  async fn delete(&self, id: SongId) -> Result<(), CoreError>;
}
