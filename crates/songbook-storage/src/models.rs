use crate::schema::songs;

use chrono::NaiveDateTime;
use diesel::prelude::*;
use songbook_core::domain::{NewSong, Song, SongId};

// SQLite has no timezone aware timestamp; every column holds naive UTC.

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = songs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SongRow {
  pub id: i32,
  pub group_name: String,
  pub song_name: String,
  pub release_date: NaiveDateTime,
  pub text: String,
  pub link: String,
  pub created_at: NaiveDateTime,
  pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = songs)]
pub struct NewSongRow {
  pub group_name: String,
  pub song_name: String,
  pub release_date: NaiveDateTime,
  pub text: String,
  pub link: String,
  pub created_at: NaiveDateTime,
  pub updated_at: NaiveDateTime,
}

/// Every mutable column; `id` and `created_at` are never written after insert.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = songs)]
pub struct SongChangeset {
  pub group_name: String,
  pub song_name: String,
  pub release_date: NaiveDateTime,
  pub text: String,
  pub link: String,
  pub updated_at: NaiveDateTime,
}

impl NewSongRow {
  pub fn new(song: NewSong, now: NaiveDateTime) -> Self {
    NewSongRow {
      group_name: song.group,
      song_name: song.title,
      release_date: song.release_date.naive_utc(),
      text: song.text,
      link: song.link,
      created_at: now,
      updated_at: now,
    }
  }
}

impl From<&Song> for SongChangeset {
  fn from(song: &Song) -> Self {
    SongChangeset {
      group_name: song.group.clone(),
      song_name: song.title.clone(),
      release_date: song.release_date.naive_utc(),
      text: song.text.clone(),
      link: song.link.clone(),
      updated_at: song.updated_at.naive_utc(),
    }
  }
}

impl From<SongRow> for Song {
  fn from(row: SongRow) -> Self {
    Song {
      id: SongId::new(row.id),
      group: row.group_name,
      title: row.song_name,
      release_date: row.release_date.and_utc(),
      text: row.text,
      link: row.link,
      created_at: row.created_at.and_utc(),
      updated_at: row.updated_at.and_utc(),
    }
  }
}
