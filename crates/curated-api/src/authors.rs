//! Handlers for `/transformers/authors` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/transformers/authors/__count` | Refreshes first; bare integer body |
//! | `GET`  | `/transformers/authors/__ids` | `{"id":"<uuid>"} ` per person |
//! | `GET`  | `/transformers/authors/:uuid` | 404 if not in the current snapshot |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::header,
  response::IntoResponse,
};
use curated_core::{AuthorCache, AuthorSource, Person};
use tracing::warn;
use uuid::Uuid;

use crate::error::ApiError;

// ─── Count ────────────────────────────────────────────────────────────────────

/// `GET /transformers/authors/__count`
pub async fn count<S>(
  State(cache): State<Arc<AuthorCache<S>>>,
) -> Result<String, ApiError>
where
  S: AuthorSource + 'static,
{
  let count = cache.count().await.inspect_err(|e| {
    warn!(error = %e, "cannot count authors");
  })?;
  Ok(count.to_string())
}

// ─── Ids ──────────────────────────────────────────────────────────────────────

/// `GET /transformers/authors/__ids`
///
/// Concatenated `{"id":"..."}` objects, each followed by a space, the format
/// consumed by the concept ingester.
pub async fn ids<S>(State(cache): State<Arc<AuthorCache<S>>>) -> impl IntoResponse
where
  S: AuthorSource + 'static,
{
  let body: String = cache
    .list_ids()
    .iter()
    .map(|id| format!(r#"{{"id":"{id}"}} "#))
    .collect();
  ([(header::CONTENT_TYPE, "application/json")], body)
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /transformers/authors/:uuid`
pub async fn get_one<S>(
  State(cache): State<Arc<AuthorCache<S>>>,
  Path(id): Path<String>,
) -> Result<Json<Person>, ApiError>
where
  S: AuthorSource + 'static,
{
  let not_found = || ApiError::NotFound(format!("author {id} not found"));
  let uuid = Uuid::parse_str(&id).map_err(|_| not_found())?;
  cache.get_by_id(&uuid).map(Json).ok_or_else(not_found)
}
