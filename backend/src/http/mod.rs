pub mod dto;
pub mod error;
pub mod songs;

use axum::routing::get;
use axum::{Json, Router, middleware};
use serde_json::{Value, json};
use songbook_core::services::SongService;
use songbook_storage::SqliteSongRepository;
use utoipa::OpenApi;

use crate::infrastructure::request_log::log_requests;

pub type CatalogService = SongService<SqliteSongRepository>;

/// Shared handler state. Cloning only clones the pool handle inside.
#[derive(Clone)]
pub struct AppState {
  pub songs: CatalogService,
}

impl AppState {
  pub fn new(songs: CatalogService) -> Self {
    Self { songs }
  }
}

#[derive(OpenApi)]
#[openapi(
  info(title = "Music Library API", version = "1.0", description = "API for managing music library"),
  paths(
    songs::list_songs,
    songs::get_song,
    songs::get_lyrics,
    songs::create_song,
    songs::update_song,
    songs::patch_song,
    songs::delete_song,
  ),
  components(schemas(
    dto::SongResponse,
    dto::SongsResponse,
    dto::LyricsResponse,
    dto::SongRequest,
    dto::SongPatchRequest,
    error::ErrorBody,
  )),
  tags((name = songs::TAG, description = "Song catalog"))
)]
pub struct ApiDoc;

async fn health() -> Json<Value> {
  Json(json!({ "status": "ok" }))
}

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
  Json(ApiDoc::openapi())
}

pub fn router(state: AppState) -> Router {
  let api = Router::new()
    .route("/songs", get(songs::list_songs).post(songs::create_song))
    .route("/songs/{id}", get(songs::get_song).put(songs::update_song).patch(songs::patch_song).delete(songs::delete_song))
    .route("/songs/{id}/lyrics", get(songs::get_lyrics));

  Router::new()
    .route("/health", get(health))
    .route("/api-docs/openapi.json", get(openapi))
    .nest("/api/v1", api)
    .layer(middleware::from_fn(log_requests))
    .with_state(state)
}
