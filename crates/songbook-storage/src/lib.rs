pub mod config;
pub mod models;
pub mod schema;

pub use config::StorageConfig;

use async_trait::async_trait;
use chrono::Utc;
use diesel::connection::SimpleConnection;
use diesel::define_sql_function;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::{Integer, Text};
use diesel::sqlite::{Sqlite, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

use songbook_core::domain::{NewSong, Song, SongFilter, SongId};
use songbook_core::errors::CoreError;
use songbook_core::ports::SongRepository;

use crate::models::{NewSongRow, SongChangeset, SongRow};
use crate::schema::songs;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;

define_sql_function! {
  /// Unicode lowercase. SQLite's built-in `lower` only folds ASCII.
  fn lower_unicode(value: Text) -> Text;
}

define_sql_function! {
  /// 1-based position of `needle` in `haystack`, 0 when absent.
  fn instr(haystack: Text, needle: Text) -> Integer;
}

/// Per-connection state: SQL functions and pragmas are scoped to the
/// connection, not the file.
#[derive(Debug)]
struct ConnectionSetup {
  journal_mode: Option<String>,
  busy_timeout_ms: u32,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionSetup {
  fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
    lower_unicode_utils::register_impl(conn, |value: String| value.to_lowercase())
      .map_err(diesel::r2d2::Error::QueryError)?;

    let mut pragmas = format!("PRAGMA busy_timeout = {}; PRAGMA foreign_keys = ON;", self.busy_timeout_ms);
    if let Some(mode) = self.journal_mode.as_deref().filter(|m| m.chars().all(|c| c.is_ascii_alphabetic())) {
      pragmas.push_str(&format!(" PRAGMA journal_mode = {mode};"));
    }
    conn.batch_execute(&pragmas).map_err(diesel::r2d2::Error::QueryError)
  }
}

/// SQLite backed [`SongRepository`].
///
/// Cloning is cheap: clones share the connection pool. Diesel is synchronous,
/// so every call runs on tokio's blocking pool.
#[derive(Clone)]
pub struct SqliteSongRepository {
  pool: SqlitePool,
}

impl SqliteSongRepository {
  /// Opens (creating if needed) the database at `database_url` with default
  /// tuning and applies pending migrations.
  pub fn new(database_url: &str) -> Result<Self, CoreError> {
    Self::open(&StorageConfig::for_path(database_url))
  }

  pub fn new_from_config() -> Result<Self, CoreError> {
    let config = StorageConfig::load().map_err(|e| CoreError::internal("failed to load storage config", e))?;
    Self::open(&config)
  }

  pub fn open(config: &StorageConfig) -> Result<Self, CoreError> {
    if let Some(parent) = config.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
      std::fs::create_dir_all(parent).map_err(|e| CoreError::internal("failed to create database directory", e))?;
    }

    let manager = ConnectionManager::<SqliteConnection>::new(config.database_url());
    let pool = Pool::builder()
      .max_size(config.max_connections.max(1))
      .connection_customizer(Box::new(ConnectionSetup {
        journal_mode: config.journal_mode.clone(),
        busy_timeout_ms: config.busy_timeout_ms,
      }))
      .build(manager)
      .map_err(|e| CoreError::internal("failed to open database pool", e))?;

    let repo = Self { pool };
    repo.run_migrations()?;

    info!(db_path = %config.db_path.display(), "song store ready");
    Ok(repo)
  }

  fn run_migrations(&self) -> Result<(), CoreError> {
    let mut pooled = self.pool.get().map_err(|e| CoreError::internal("failed to acquire database connection", e))?;
    let conn: &mut SqliteConnection = &mut pooled;

    let applied = conn
      .run_pending_migrations(MIGRATIONS)
      .map_err(|e| CoreError::internal("failed to run migrations", e))?;

    if !applied.is_empty() {
      info!(count = applied.len(), "applied database migrations");
    }
    Ok(())
  }

  async fn with_conn<T, F>(&self, op: &'static str, f: F) -> Result<T, CoreError>
  where
    T: Send + 'static,
    F: FnOnce(&mut SqliteConnection) -> Result<T, CoreError> + Send + 'static,
  {
    let pool = self.pool.clone();
    tokio::task::spawn_blocking(move || {
      let mut pooled = pool.get().map_err(|e| CoreError::internal("failed to acquire database connection", e))?;
      f(&mut pooled)
    })
    .await
    .map_err(|e| CoreError::internal(format!("{op}: blocking task failed"), e))?
  }
}

/// Rows matching every non-empty criterion of `filter`.
fn filtered(filter: &SongFilter) -> songs::BoxedQuery<'static, Sqlite> {
  let mut query = songs::table.into_boxed();

  if !filter.group.is_empty() {
    query = query.filter(instr(lower_unicode(songs::group_name), filter.group.to_lowercase()).gt(0));
  }
  if !filter.title.is_empty() {
    query = query.filter(instr(lower_unicode(songs::song_name), filter.title.to_lowercase()).gt(0));
  }
  if !filter.text.is_empty() {
    query = query.filter(instr(lower_unicode(songs::text), filter.text.to_lowercase()).gt(0));
  }
  if !filter.link.is_empty() {
    query = query.filter(instr(lower_unicode(songs::link), filter.link.to_lowercase()).gt(0));
  }
  if let Some(from) = filter.released_from {
    query = query.filter(songs::release_date.ge(from.naive_utc()));
  }
  if let Some(to) = filter.released_to {
    query = query.filter(songs::release_date.le(to.naive_utc()));
  }

  query
}

fn clamp_i64(value: u64) -> i64 {
  i64::try_from(value).unwrap_or(i64::MAX)
}

fn map_db_error(context: &str, err: DieselError) -> CoreError {
  match err {
    DieselError::NotFound => CoreError::not_found("song not found").with_source(err),
    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
      CoreError::already_exists("song with this group name and song name already exists").with_source(err)
    }
    DieselError::DatabaseError(DatabaseErrorKind::CheckViolation | DatabaseErrorKind::NotNullViolation, _) => {
      CoreError::validation(format!("{context}: row rejected by schema"), err)
    }
    _ => CoreError::internal(context.to_string(), err),
  }
}

#[async_trait]
impl SongRepository for SqliteSongRepository {
  #[instrument(level = "trace", skip(self))]
  async fn count(&self, filter: &SongFilter) -> Result<u64, CoreError> {
    let filter = filter.clone();
    self
      .with_conn("count songs", move |conn| {
        let total: i64 =
          filtered(&filter).count().get_result(conn).map_err(|e| map_db_error("failed to count songs", e))?;
        Ok(total.max(0) as u64)
      })
      .await
  }

  #[instrument(level = "trace", skip(self))]
  async fn list(&self, filter: &SongFilter, limit: u64, offset: u64) -> Result<Vec<Song>, CoreError> {
    let filter = filter.clone();
    let rows = self
      .with_conn("list songs", move |conn| {
        filtered(&filter)
          .order((songs::created_at.desc(), songs::id.desc()))
          .limit(clamp_i64(limit))
          .offset(clamp_i64(offset))
          .load::<SongRow>(conn)
          .map_err(|e| map_db_error("failed to query songs", e))
      })
      .await?;

    debug!(rows = rows.len(), "songs loaded");
    Ok(rows.into_iter().map(Song::from).collect())
  }

  #[instrument(level = "trace", skip(self))]
  async fn find_by_id(&self, id: SongId) -> Result<Song, CoreError> {
    self
      .with_conn("find song", move |conn| {
        songs::table.find(id.get()).first::<SongRow>(conn).map_err(|e| map_db_error("failed to get song", e))
      })
      .await
      .map(Song::from)
  }

  #[instrument(level = "trace", skip(self))]
  async fn exists_by_group_and_title(
    &self,
    group: &str,
    title: &str,
    exclude: Option<SongId>,
  ) -> Result<bool, CoreError> {
    let (group, title) = (group.to_owned(), title.to_owned());
    self
      .with_conn("check song existence", move |conn| {
        let mut query =
          songs::table.filter(songs::group_name.eq(group)).filter(songs::song_name.eq(title)).into_boxed();
        if let Some(id) = exclude {
          query = query.filter(songs::id.ne(id.get()));
        }

        let matches: i64 =
          query.count().get_result(conn).map_err(|e| map_db_error("failed to check song existence", e))?;
        Ok(matches > 0)
      })
      .await
  }

  #[instrument(level = "trace", skip(self))]
  async fn insert(&self, song: NewSong) -> Result<Song, CoreError> {
    let row = NewSongRow::new(song, Utc::now().naive_utc());
    self
      .with_conn("insert song", move |conn| {
        diesel::insert_into(songs::table)
          .values(&row)
          .get_result::<SongRow>(conn)
          .map_err(|e| map_db_error("failed to create song", e))
      })
      .await
      .map(Song::from)
  }

  #[instrument(level = "trace", skip(self))]
  async fn update(&self, song: &Song) -> Result<Song, CoreError> {
    let id = song.id.get();
    let changes = SongChangeset::from(song);
    self
      .with_conn("update song", move |conn| {
        diesel::update(songs::table.find(id))
          .set(&changes)
          .get_result::<SongRow>(conn)
          .map_err(|e| map_db_error("failed to update song", e))
      })
      .await
      .map(Song::from)
  }

  #[instrument(level = "trace", skip(self))]
  async fn delete(&self, id: SongId) -> Result<(), CoreError> {
    let affected = self
      .with_conn("delete song", move |conn| {
        diesel::delete(songs::table.find(id.get())).execute(conn).map_err(|e| map_db_error("failed to delete song", e))
      })
      .await?;

    if affected == 0 {
      return Err(CoreError::not_found("song not found"));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::{DateTime, TimeZone};
  use songbook_core::ErrorKind;
  use tempfile::{TempDir, tempdir};

  fn store() -> (TempDir, SqliteSongRepository) {
    let tmp = tempdir().unwrap();
    let repo = SqliteSongRepository::open(&StorageConfig::for_path(tmp.path().join("db").join("songs.db"))).unwrap();
    (tmp, repo)
  }

  fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 3, d, 12, 0, 0).unwrap()
  }

  fn new_song(group: &str, title: &str, released: DateTime<Utc>) -> NewSong {
    NewSong {
      group: group.into(),
      title: title.into(),
      release_date: released,
      text: format!("{title} verse one\n\n{title} verse two"),
      link: format!("https://songs.example/{}", title.to_lowercase().replace(' ', "-")),
    }
  }

  async fn seed(repo: &SqliteSongRepository) -> Vec<Song> {
    let mut stored = Vec::new();
    for (i, (group, title)) in [("Muse", "Uprising"), ("Muse", "Madness"), ("Queen", "Innuendo")].iter().enumerate() {
      stored.push(repo.insert(new_song(group, title, day(i as u32 + 1))).await.unwrap());
    }
    stored
  }

  #[tokio::test]
  async fn insert_assigns_id_and_timestamps() {
    let (_tmp, repo) = store();

    let song = repo.insert(new_song("Muse", "Uprising", day(1))).await.unwrap();
    let loaded = repo.find_by_id(song.id).await.unwrap();

    assert_eq!(song.id, SongId::new(1));
    assert_eq!(loaded.group, "Muse");
    assert_eq!(loaded.release_date, day(1));
    assert_eq!(loaded.created_at, loaded.updated_at);
    assert_eq!(loaded.text, "Uprising verse one\n\nUprising verse two");
  }

  #[tokio::test]
  async fn listing_is_newest_first_and_paged() {
    let (_tmp, repo) = store();
    seed(&repo).await;
    let all = SongFilter::default();

    assert_eq!(repo.count(&all).await.unwrap(), 3);
    let first: Vec<_> = repo.list(&all, 2, 0).await.unwrap().into_iter().map(|s| s.title).collect();
    let second: Vec<_> = repo.list(&all, 2, 2).await.unwrap().into_iter().map(|s| s.title).collect();

    assert_eq!(first, ["Innuendo", "Madness"]);
    assert_eq!(second, ["Uprising"]);
  }

  #[tokio::test]
  async fn substring_filters_ignore_ascii_case() {
    let (_tmp, repo) = store();
    seed(&repo).await;

    let by_group = SongFilter { group: "mUs".into(), ..SongFilter::default() };
    let by_text = SongFilter { text: "INNUENDO VERSE".into(), ..SongFilter::default() };
    let by_link = SongFilter { link: "/madness".into(), ..SongFilter::default() };

    assert_eq!(repo.count(&by_group).await.unwrap(), 2);
    assert_eq!(repo.count(&by_text).await.unwrap(), 1);
    assert_eq!(repo.list(&by_link, 10, 0).await.unwrap()[0].title, "Madness");
  }

  #[tokio::test]
  async fn substring_filters_fold_unicode_case() {
    let (_tmp, repo) = store();
    seed(&repo).await;
    repo.insert(new_song("Кино", "Группа крови", day(4))).await.unwrap();
    repo.insert(new_song("Die Ärzte", "Schrei nach Liebe", day(5))).await.unwrap();

    let cyrillic = SongFilter { group: "кИНО".into(), ..SongFilter::default() };
    let umlaut = SongFilter { group: "ÄRZTE".into(), ..SongFilter::default() };
    let title = SongFilter { title: "группа".into(), ..SongFilter::default() };

    assert_eq!(repo.list(&cyrillic, 10, 0).await.unwrap()[0].group, "Кино");
    assert_eq!(repo.count(&umlaut).await.unwrap(), 1);
    assert_eq!(repo.count(&title).await.unwrap(), 1);
  }

  #[tokio::test]
  async fn wildcard_characters_match_literally() {
    let (_tmp, repo) = store();
    seed(&repo).await;
    repo.insert(new_song("Muse", "100% Pure_Love", day(6))).await.unwrap();

    let underscore = SongFilter { title: "_".into(), ..SongFilter::default() };
    let percent = SongFilter { title: "%".into(), ..SongFilter::default() };
    let nothing = SongFilter { group: "m%e".into(), ..SongFilter::default() };

    assert_eq!(repo.count(&underscore).await.unwrap(), 1);
    assert_eq!(repo.count(&percent).await.unwrap(), 1);
    assert_eq!(repo.count(&nothing).await.unwrap(), 0);
  }

  #[tokio::test]
  async fn release_bounds_are_inclusive() {
    let (_tmp, repo) = store();
    seed(&repo).await;

    let window = SongFilter { released_from: Some(day(2)), released_to: Some(day(3)), ..SongFilter::default() };
    let open_ended = SongFilter { released_to: Some(day(1)), ..SongFilter::default() };

    assert_eq!(repo.count(&window).await.unwrap(), 2);
    assert_eq!(repo.count(&open_ended).await.unwrap(), 1);
  }

  #[tokio::test]
  async fn exists_honours_exclusion() {
    let (_tmp, repo) = store();
    let songs = seed(&repo).await;

    assert!(repo.exists_by_group_and_title("Muse", "Uprising", None).await.unwrap());
    assert!(!repo.exists_by_group_and_title("Muse", "Uprising", Some(songs[0].id)).await.unwrap());
    assert!(!repo.exists_by_group_and_title("muse", "uprising", None).await.unwrap());
  }

  #[tokio::test]
  async fn unique_violation_maps_to_already_exists() {
    let (_tmp, repo) = store();
    let songs = seed(&repo).await;

    let err = repo.insert(new_song("Muse", "Uprising", day(9))).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);

    let mut clash = songs[1].clone();
    clash.title = "Uprising".into();
    let err = repo.update(&clash).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
  }

  #[tokio::test]
  async fn blank_names_are_rejected_by_schema() {
    let (_tmp, repo) = store();

    let err = repo.insert(new_song(" ", "Untitled", day(1))).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(repo.count(&SongFilter::default()).await.unwrap(), 0);
  }

  #[tokio::test]
  async fn update_overwrites_mutable_columns_only() {
    let (_tmp, repo) = store();
    let songs = seed(&repo).await;

    let mut changed = songs[2].clone();
    changed.text = String::new();
    changed.updated_at = day(20);
    let saved = repo.update(&changed).await.unwrap();

    assert_eq!(saved.text, "");
    assert_eq!(saved.updated_at, day(20));
    assert_eq!(saved.created_at, songs[2].created_at);
  }

  #[tokio::test]
  async fn missing_rows_are_not_found() {
    let (_tmp, repo) = store();
    let songs = seed(&repo).await;

    assert_eq!(repo.find_by_id(SongId::new(404)).await.unwrap_err().kind(), ErrorKind::NotFound);

    let mut ghost = songs[0].clone();
    ghost.id = SongId::new(404);
    assert_eq!(repo.update(&ghost).await.unwrap_err().kind(), ErrorKind::NotFound);

    repo.delete(songs[0].id).await.unwrap();
    assert_eq!(repo.delete(songs[0].id).await.unwrap_err().kind(), ErrorKind::NotFound);
  }
}
