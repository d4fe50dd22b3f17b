//! The `AuthorSource` trait: where raw author records come from.
//!
//! The cache depends on this abstraction, not on any concrete transport. The
//! HTTP implementation lives in `curated-bertha`; tests use the in-memory
//! `StaticSource` from the `test_support` module.

use std::future::Future;

use thiserror::Error;

use crate::author::Author;

/// Any non-success outcome of talking to the upstream source.
#[derive(Debug, Error)]
pub enum FetchError {
  /// The request never produced a response (connect failure, timeout, ...).
  #[error("transport error: {0}")]
  Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("upstream returned unexpected HTTP status: {0}")]
  Status(u16),

  /// The response body was not a list of authors.
  #[error("malformed payload: {0}")]
  Decode(String),
}

/// A single upstream feed of curated authors.
pub trait AuthorSource: Send + Sync {
  /// Retrieve the complete current set of authors.
  fn fetch_all(
    &self,
  ) -> impl Future<Output = Result<Vec<Author>, FetchError>> + Send + '_;

  /// Check that the source is reachable and answering successfully. The
  /// response body is discarded.
  fn probe(&self) -> impl Future<Output = Result<(), FetchError>> + Send + '_;
}
