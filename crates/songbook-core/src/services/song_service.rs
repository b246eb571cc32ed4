use chrono::Utc;
use tracing::{debug, info};

use crate::domain::{LyricsPage, NewSong, Page, Song, SongFilter, SongId, SongInput, SongPatch};
use crate::errors::CoreError;
use crate::lyrics::paginate_lyrics;
use crate::pagination::{PageRequest, paginate};
use crate::ports::SongRepository;

const DUPLICATE_SONG: &str = "song with this group name and song name already exists";

/// Catalog operations on top of a [`SongRepository`].
///
/// The service holds no state besides the repository handle, so it can be
/// cloned into every request handler.
#[derive(Clone)]
pub struct SongService<R>
where
  R: SongRepository,
{
  repo: R,
}

impl<R> SongService<R>
where
  R: SongRepository,
{
  pub fn new(repo: R) -> Self {
    Self { repo }
  }

  pub fn repository(&self) -> &R {
    &self.repo
  }

  // -------- QUERY (read) --------

  /// Lists one page of songs matching `filter`, newest first.
  ///
  /// Count and page are read in two round trips; a concurrent write between
  /// them can make `total_items` disagree with the listed page.
  pub async fn get_songs(&self, filter: &SongFilter) -> Result<Page<Song>, CoreError> {
    info!(
      group = %filter.group,
      song = %filter.title,
      from_date = ?filter.released_from,
      to_date = ?filter.released_to,
      text = %filter.text,
      link = %filter.link,
      page = filter.page.page,
      page_size = filter.page.page_size,
      "getting songs"
    );

    let total_items = self.repo.count(filter).await?;
    let window = paginate(total_items, filter.page)?;
    let items = self.repo.list(filter, window.page_size, window.offset).await?;

    debug!(total_items, returned = items.len(), unfiltered = filter.matches_all(), "songs listed");

    Ok(Page {
      items,
      current_page: window.page,
      total_pages: window.total_pages,
      total_items,
      page_size: window.page_size,
    })
  }

  pub async fn get_song(&self, id: SongId) -> Result<Song, CoreError> {
    info!(song_id = %id, "getting song");
    self.repo.find_by_id(id).await
  }

  /// Returns one page of verses of the song's lyrics.
  pub async fn get_lyrics(&self, id: SongId, request: PageRequest) -> Result<LyricsPage, CoreError> {
    info!(song_id = %id, page = request.page, page_size = request.page_size, "getting lyrics");

    let song = self.repo.find_by_id(id).await?;
    paginate_lyrics(&song.text, request)
  }

  // -------- COMMAND (write) --------

  /// Creates a song released "now".
  ///
  /// The duplicate pre-check and the insert are separate round trips; the
  /// store's unique constraint reports a lost race as `AlreadyExists` too.
  pub async fn create_song(&self, input: SongInput) -> Result<Song, CoreError> {
    info!(group = %input.group, song = %input.title, "creating new song");

    input.validate()?;

    if self.repo.exists_by_group_and_title(&input.group, &input.title, None).await? {
      return Err(CoreError::already_exists(DUPLICATE_SONG));
    }

    let song = NewSong::from_input(input, Utc::now());
    self.repo.insert(song).await
  }

  /// Merges `patch` into the stored song and persists the result.
  ///
  /// Uniqueness is checked on the merged `(group, title)`, ignoring the song
  /// itself, so keeping the current pair always passes.
  pub async fn update_song(&self, id: SongId, patch: SongPatch) -> Result<Song, CoreError> {
    info!(
      song_id = %id,
      group = ?patch.group,
      song = ?patch.title,
      "updating song"
    );

    let mut song = self.repo.find_by_id(id).await?;
    patch.apply(&mut song)?;

    if self.repo.exists_by_group_and_title(&song.group, &song.title, Some(song.id)).await? {
      return Err(CoreError::already_exists(DUPLICATE_SONG));
    }

    song.updated_at = Utc::now();
    self.repo.update(&song).await
  }

  pub async fn delete_song(&self, id: SongId) -> Result<(), CoreError> {
    info!(song_id = %id, "deleting song");
    self.repo.delete(id).await
  }
}
