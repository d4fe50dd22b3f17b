//! HTTP surface for the curated authors transformer.
//!
//! Exposes an axum [`Router`] backed by an [`AuthorCache`] over any
//! [`AuthorSource`]. Request logging and the listener are the caller's
//! responsibility.

pub mod authors;
pub mod error;
pub mod status;

use std::sync::Arc;

use axum::{Router, routing::get};
use curated_core::{AuthorCache, AuthorSource};

pub use error::ApiError;

/// Build the full router for `cache`.
pub fn router<S>(cache: Arc<AuthorCache<S>>) -> Router<()>
where
  S: AuthorSource + 'static,
{
  Router::new()
    // Transformer
    .route("/transformers/authors/__count", get(authors::count::<S>))
    .route("/transformers/authors/__ids", get(authors::ids::<S>))
    .route("/transformers/authors/{uuid}", get(authors::get_one::<S>))
    // Operational
    .route("/__health", get(status::health::<S>))
    .route("/__gtg", get(status::good_to_go::<S>))
    .route("/__ping", get(status::ping))
    .route("/ping", get(status::ping))
    .route("/__build-info", get(status::build_info))
    .route("/build-info", get(status::build_info))
    .with_state(cache)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use curated_core::{
    derive_uuid,
    test_support::{StaticSource, author},
  };
  use serde_json::Value;
  use tower::ServiceExt as _;

  use super::*;

  fn cache() -> Arc<AuthorCache<StaticSource>> {
    Arc::new(AuthorCache::new(StaticSource::new(vec![
      author("A1", "Alice", "<p>Hi</p>"),
      author("A2", "Bob", "<p>Yo</p>"),
    ])))
  }

  async fn get_raw(cache: Arc<AuthorCache<StaticSource>>, uri: &str) -> Response {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    router(cache).oneshot(req).await.unwrap()
  }

  async fn body_text(resp: Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
  }

  // ── Count ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn count_refreshes_and_returns_bare_integer() {
    let cache = cache();
    let resp = get_raw(cache.clone(), "/transformers/authors/__count").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, "2");
    assert_eq!(cache.source().fetch_count(), 1);
  }

  #[tokio::test]
  async fn count_failure_returns_500_with_message() {
    let cache = Arc::new(AuthorCache::new(StaticSource::failing(502)));
    let resp = get_raw(cache, "/transformers/authors/__count").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_str(&body_text(resp).await).unwrap();
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("502"), "message: {message}");
  }

  // ── Ids ─────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn ids_lists_published_snapshot() {
    let cache = cache();
    cache.refresh().await.unwrap();

    let resp = get_raw(cache, "/transformers/authors/__ids").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains(&format!(r#"{{"id":"{}"}} "#, derive_uuid("A1"))), "{body}");
    assert!(body.contains(&format!(r#"{{"id":"{}"}} "#, derive_uuid("A2"))), "{body}");
    assert_eq!(body.matches(r#"{"id":"#).count(), 2);
  }

  #[tokio::test]
  async fn ids_before_any_refresh_is_empty() {
    let resp = get_raw(cache(), "/transformers/authors/__ids").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, "");
  }

  // ── Get one ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn get_returns_person_json() {
    let cache = cache();
    cache.refresh().await.unwrap();
    let uuid = derive_uuid("A1");

    let resp = get_raw(cache, &format!("/transformers/authors/{uuid}")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let ct = resp.headers().get(header::CONTENT_TYPE).unwrap().to_str().unwrap();
    assert!(ct.contains("application/json"), "Content-Type: {ct}");

    let person: Value = serde_json::from_str(&body_text(resp).await).unwrap();
    assert_eq!(person["uuid"], uuid.to_string());
    assert_eq!(person["prefLabel"], "Alice");
    assert_eq!(person["description"], "Hi");
    assert_eq!(person["descriptionXML"], "<p>Hi</p>");
    assert_eq!(person["alternativeIdentifiers"]["TME"][0], "A1");
    assert!(person.get("twitterHandle").is_none());
  }

  #[tokio::test]
  async fn get_unknown_returns_404() {
    let cache = cache();
    cache.refresh().await.unwrap();
    let resp = get_raw(
      cache,
      &format!("/transformers/authors/{}", derive_uuid("unknown")),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn get_non_uuid_returns_404() {
    let resp = get_raw(cache(), "/transformers/authors/not-a-uuid").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  // ── Operational ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn gtg_follows_upstream() {
    let cache = cache();
    let resp = get_raw(cache.clone(), "/__gtg").await;
    assert_eq!(resp.status(), StatusCode::OK);

    cache.source().fail_with_status(500);
    let resp = get_raw(cache.clone(), "/__gtg").await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(cache.source().fetch_count(), 0);
  }

  #[tokio::test]
  async fn health_reports_failed_check() {
    let cache = cache();
    cache.source().fail_with_status(500);

    let resp = get_raw(cache, "/__health").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let report: Value = serde_json::from_str(&body_text(resp).await).unwrap();
    assert_eq!(report["ok"], false);
    assert_eq!(report["checks"][0]["ok"], false);
    assert_eq!(report["checks"][0]["severity"], 1);
    assert!(report["checks"][0]["checkOutput"]
      .as_str()
      .unwrap()
      .contains("500"));
  }

  #[tokio::test]
  async fn ping_and_build_info() {
    let resp = get_raw(cache(), "/__ping").await;
    assert_eq!(body_text(resp).await, "pong");

    let resp = get_raw(cache(), "/build-info").await;
    let info: Value = serde_json::from_str(&body_text(resp).await).unwrap();
    assert_eq!(info["name"], "curated-authors-transformer");
  }
}
