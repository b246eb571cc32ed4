use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use songbook_core::CoreError;
use songbook_core::domain::{SongId, SongPatch};

use super::AppState;
use super::dto::{
  LyricsQuery, LyricsResponse, SongListQuery, SongPatchRequest, SongRequest, SongResponse, SongsResponse,
};
use super::error::{ApiError, ErrorBody};

pub const TAG: &str = "songs";

fn parse_id(raw: &str) -> Result<SongId, ApiError> {
  raw.parse::<SongId>().map_err(|e| CoreError::bad_request("Invalid song ID").with_source(e).into())
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
  payload.map(|Json(value)| value).map_err(|e| CoreError::bad_request("Invalid request body").with_source(e).into())
}

fn query<T>(params: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
  params.map(|Query(value)| value).map_err(|e| CoreError::bad_request("Invalid query string").with_source(e).into())
}

/// List songs with filtering and pagination.
#[utoipa::path(
  get,
  path = "/api/v1/songs",
  tag = TAG,
  params(SongListQuery),
  responses(
    (status = 200, body = SongsResponse),
    (status = 404, description = "Requested page does not exist", body = ErrorBody),
  ),
)]
pub async fn list_songs(
  State(state): State<AppState>,
  params: Result<Query<SongListQuery>, QueryRejection>,
) -> Result<Json<SongsResponse>, ApiError> {
  let filter = query(params)?.into_filter();
  let page = state.songs.get_songs(&filter).await?;
  Ok(Json(SongsResponse::from(page)))
}

#[utoipa::path(
  get,
  path = "/api/v1/songs/{id}",
  tag = TAG,
  params(("id" = i32, Path, description = "Song ID")),
  responses(
    (status = 200, body = SongResponse),
    (status = 400, body = ErrorBody),
    (status = 404, body = ErrorBody),
  ),
)]
pub async fn get_song(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<SongResponse>, ApiError> {
  let song = state.songs.get_song(parse_id(&id)?).await?;
  Ok(Json(song.into()))
}

/// Song lyrics, paginated by verse.
#[utoipa::path(
  get,
  path = "/api/v1/songs/{id}/lyrics",
  tag = TAG,
  params(("id" = i32, Path, description = "Song ID"), LyricsQuery),
  responses(
    (status = 200, body = LyricsResponse),
    (status = 400, body = ErrorBody),
    (status = 404, description = "Song, lyrics or page not found", body = ErrorBody),
  ),
)]
pub async fn get_lyrics(
  State(state): State<AppState>,
  Path(id): Path<String>,
  params: Result<Query<LyricsQuery>, QueryRejection>,
) -> Result<Json<LyricsResponse>, ApiError> {
  let id = parse_id(&id)?;
  let page = query(params)?.page_request();
  let lyrics = state.songs.get_lyrics(id, page).await?;
  Ok(Json(lyrics.into()))
}

#[utoipa::path(
  post,
  path = "/api/v1/songs",
  tag = TAG,
  request_body = SongRequest,
  responses(
    (status = 201, body = SongResponse),
    (status = 400, body = ErrorBody),
    (status = 409, description = "Group and song name already taken", body = ErrorBody),
  ),
)]
pub async fn create_song(
  State(state): State<AppState>,
  payload: Result<Json<SongRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SongResponse>), ApiError> {
  let request = body(payload)?;
  let song = state.songs.create_song(request.into()).await?;
  Ok((StatusCode::CREATED, Json(song.into())))
}

/// Replace the non-empty fields of a song; empty fields keep their value.
#[utoipa::path(
  put,
  path = "/api/v1/songs/{id}",
  tag = TAG,
  params(("id" = i32, Path, description = "Song ID")),
  request_body = SongRequest,
  responses(
    (status = 200, body = SongResponse),
    (status = 400, body = ErrorBody),
    (status = 404, body = ErrorBody),
    (status = 409, body = ErrorBody),
  ),
)]
pub async fn update_song(
  State(state): State<AppState>,
  Path(id): Path<String>,
  payload: Result<Json<SongRequest>, JsonRejection>,
) -> Result<Json<SongResponse>, ApiError> {
  let id = parse_id(&id)?;
  let patch = SongPatch::from_non_empty(body(payload)?.into());
  let song = state.songs.update_song(id, patch).await?;
  Ok(Json(song.into()))
}

/// Update only the fields present in the body; `""` clears text or link.
#[utoipa::path(
  patch,
  path = "/api/v1/songs/{id}",
  tag = TAG,
  params(("id" = i32, Path, description = "Song ID")),
  request_body = SongPatchRequest,
  responses(
    (status = 200, body = SongResponse),
    (status = 400, body = ErrorBody),
    (status = 404, body = ErrorBody),
    (status = 409, body = ErrorBody),
  ),
)]
pub async fn patch_song(
  State(state): State<AppState>,
  Path(id): Path<String>,
  payload: Result<Json<SongPatchRequest>, JsonRejection>,
) -> Result<Json<SongResponse>, ApiError> {
  let id = parse_id(&id)?;
  let patch = SongPatch::from(body(payload)?);
  let song = state.songs.update_song(id, patch).await?;
  Ok(Json(song.into()))
}

#[utoipa::path(
  delete,
  path = "/api/v1/songs/{id}",
  tag = TAG,
  params(("id" = i32, Path, description = "Song ID")),
  responses(
    (status = 204, description = "Deleted"),
    (status = 400, body = ErrorBody),
    (status = 404, body = ErrorBody),
  ),
)]
pub async fn delete_song(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
  state.songs.delete_song(parse_id(&id)?).await?;
  Ok(StatusCode::NO_CONTENT)
}
