//! Error types for `curated-core`.

use thiserror::Error;

use crate::{source::FetchError, transform::TransformError};

/// Why a refresh did not publish a new snapshot.
#[derive(Debug, Error)]
pub enum Error {
  #[error("fetch failed: {0}")]
  Fetch(#[from] FetchError),

  #[error("transform failed: {0}")]
  Transform(#[from] TransformError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
