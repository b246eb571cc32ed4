use std::time::Instant;

use axum::extract::Request;
use axum::http::header::USER_AGENT;
use axum::middleware::Next;
use axum::response::Response;
use tracing::info;

/// Logs every request on arrival and on completion with its status and latency.
pub async fn log_requests(request: Request, next: Next) -> Response {
  let method = request.method().clone();
  let path = request.uri().path().to_owned();
  let user_agent = request.headers().get(USER_AGENT).and_then(|v| v.to_str().ok()).unwrap_or("-").to_owned();

  info!(%method, %path, %user_agent, "incoming request");

  let started = Instant::now();
  let response = next.run(request).await;

  info!(
    %method,
    %path,
    status = response.status().as_u16(),
    elapsed_ms = started.elapsed().as_millis() as u64,
    "request completed"
  );

  response
}
