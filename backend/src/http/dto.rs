use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use songbook_core::domain::{LyricsPage, Page, Song, SongFilter, SongInput, SongPatch};
use songbook_core::pagination::PageRequest;
use tracing::warn;
use utoipa::{IntoParams, ToSchema};

/// Song as exposed over HTTP.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SongResponse {
  pub id: i32,
  pub group_name: String,
  pub song_name: String,
  pub release_date: DateTime<Utc>,
  pub text: String,
  pub link: String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl From<Song> for SongResponse {
  fn from(song: Song) -> Self {
    SongResponse {
      id: song.id.get(),
      group_name: song.group,
      song_name: song.title,
      release_date: song.release_date,
      text: song.text,
      link: song.link,
      created_at: song.created_at,
      updated_at: song.updated_at,
    }
  }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SongsResponse {
  pub songs: Vec<SongResponse>,
  pub current_page: u64,
  pub total_pages: u64,
  pub total_items: u64,
  pub page_size: u64,
}

impl From<Page<Song>> for SongsResponse {
  fn from(page: Page<Song>) -> Self {
    let page = page.map(SongResponse::from);
    SongsResponse {
      songs: page.items,
      current_page: page.current_page,
      total_pages: page.total_pages,
      total_items: page.total_items,
      page_size: page.page_size,
    }
  }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LyricsResponse {
  pub text: String,
  pub current_page: u64,
  pub total_pages: u64,
  pub page_size: u64,
}

impl From<LyricsPage> for LyricsResponse {
  fn from(page: LyricsPage) -> Self {
    LyricsResponse {
      text: page.text,
      current_page: page.current_page,
      total_pages: page.total_pages,
      page_size: page.page_size,
    }
  }
}

/// Body of `POST /songs` and `PUT /songs/{id}`.
///
/// On `PUT` an empty field keeps the stored value.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SongRequest {
  pub group: String,
  pub song: String,
  #[serde(default)]
  pub text: String,
  #[serde(default)]
  pub link: String,
}

impl From<SongRequest> for SongInput {
  fn from(req: SongRequest) -> Self {
    SongInput { group: req.group, title: req.song, text: req.text, link: req.link }
  }
}

/// Body of `PATCH /songs/{id}`. Absent or `null` keeps the stored value; a
/// present value replaces it, an empty string included.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct SongPatchRequest {
  pub group: Option<String>,
  pub song: Option<String>,
  pub text: Option<String>,
  pub link: Option<String>,
}

impl From<SongPatchRequest> for SongPatch {
  fn from(req: SongPatchRequest) -> Self {
    SongPatch {
      group: req.group.into(),
      title: req.song.into(),
      text: req.text.into(),
      link: req.link.into(),
    }
  }
}

/// Query of `GET /songs`. Values arrive as raw strings so that malformed
/// numbers fall back to defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SongListQuery {
  /// Substring of the group name, case-insensitive.
  pub group_name: Option<String>,
  /// Substring of the song title, case-insensitive.
  pub song_name: Option<String>,
  /// Earliest release day, inclusive (YYYY-MM-DD).
  pub from_date: Option<String>,
  /// Latest release day, inclusive (YYYY-MM-DD).
  pub to_date: Option<String>,
  /// Substring of the lyrics.
  pub text: Option<String>,
  /// Substring of the link.
  pub link: Option<String>,
  /// Page number, defaults to 1.
  pub page: Option<String>,
  /// Page size, defaults to 10.
  pub page_size: Option<String>,
}

impl SongListQuery {
  pub fn into_filter(self) -> SongFilter {
    SongFilter {
      group: self.group_name.unwrap_or_default(),
      title: self.song_name.unwrap_or_default(),
      text: self.text.unwrap_or_default(),
      link: self.link.unwrap_or_default(),
      released_from: parse_day("from_date", self.from_date.as_deref()).map(start_of_day),
      released_to: parse_day("to_date", self.to_date.as_deref()).map(end_of_day),
      page: PageRequest::new(lenient_int(self.page.as_deref()), lenient_int(self.page_size.as_deref())),
    }
  }
}

/// Query of `GET /songs/{id}/lyrics`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LyricsQuery {
  /// Page number, defaults to 1.
  pub page: Option<String>,
  /// Verses per page, defaults to 10.
  pub page_size: Option<String>,
}

impl LyricsQuery {
  pub fn page_request(&self) -> PageRequest {
    PageRequest::new(lenient_int(self.page.as_deref()), lenient_int(self.page_size.as_deref()))
  }
}

// Anything unparsable counts as "not given" (0), which selects the default.
fn lenient_int(raw: Option<&str>) -> i64 {
  raw.and_then(|s| s.trim().parse().ok()).unwrap_or(0)
}

fn parse_day(param: &str, raw: Option<&str>) -> Option<NaiveDate> {
  let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
  match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
    Ok(day) => Some(day),
    Err(e) => {
      warn!(param, value = raw, error = %e, "ignoring unparsable date");
      None
    }
  }
}

fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
  day.and_time(NaiveTime::MIN).and_utc()
}

fn end_of_day(day: NaiveDate) -> DateTime<Utc> {
  start_of_day(day)
    .checked_add_signed(TimeDelta::days(1) - TimeDelta::nanoseconds(1))
    .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
