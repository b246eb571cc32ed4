use std::error::Error as _;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use songbook_core::{CoreError, ErrorKind};
use tracing::{error, warn};
use utoipa::ToSchema;

/// JSON body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
  pub status: u16,
  pub message: String,
}

/// A [`CoreError`] on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub CoreError);

impl From<CoreError> for ApiError {
  fn from(err: CoreError) -> Self {
    ApiError(err)
  }
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
  match kind {
    ErrorKind::NotFound => StatusCode::NOT_FOUND,
    ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
    ErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
    ErrorKind::AlreadyExists => StatusCode::CONFLICT,
    ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
  }
}

/// `message: cause: cause of cause ...`
fn describe(err: &CoreError) -> String {
  let mut out = err.to_string();
  let mut source = err.source();
  while let Some(cause) = source {
    out.push_str(": ");
    out.push_str(&cause.to_string());
    source = cause.source();
  }
  out
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = status_for(self.0.kind());

    let message = if status.is_server_error() {
      error!(status = status.as_u16(), error = %describe(&self.0), "request error");
      "Internal server error".to_string()
    } else {
      warn!(status = status.as_u16(), error = %describe(&self.0), "request error");
      self.0.message().to_string()
    };

    (status, Json(ErrorBody { status: status.as_u16(), message })).into_response()
  }
}
