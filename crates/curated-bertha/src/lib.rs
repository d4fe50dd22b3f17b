//! Bertha-backed [`AuthorSource`].
//!
//! Bertha publishes the curated authors spreadsheet as a JSON array at a
//! single URL. [`BerthaSource`] owns its own HTTP client (no process-wide
//! state) and revalidates with `If-None-Match`, reusing the last decoded
//! author list when Bertha answers `304 Not Modified`.

use std::{
  sync::{Mutex, PoisonError},
  time::Duration,
};

use curated_core::{Author, AuthorSource, FetchError};
use reqwest::{
  Client, StatusCode,
  header::{ETAG, IF_NONE_MATCH},
};
use tracing::{debug, info};

/// Connection settings for the Bertha source.
#[derive(Debug, Clone)]
pub struct BerthaConfig {
  /// The Bertha view URL returning the authors JSON array.
  pub url:     String,
  /// Upper bound on a whole request, including reading the body.
  pub timeout: Duration,
}

impl BerthaConfig {
  pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

  pub fn new(url: impl Into<String>) -> Self {
    Self {
      url:     url.into(),
      timeout: Self::DEFAULT_TIMEOUT,
    }
  }
}

/// The last full response, kept for revalidation.
struct Validated {
  etag:    String,
  authors: Vec<Author>,
}

/// Fetches curated authors from one Bertha URL.
pub struct BerthaSource {
  client: Client,
  config: BerthaConfig,
  cached: Mutex<Option<Validated>>,
}

impl BerthaSource {
  pub fn new(config: BerthaConfig) -> Result<Self, FetchError> {
    let client = Client::builder()
      .timeout(config.timeout)
      .build()
      .map_err(transport)?;
    Ok(Self {
      client,
      config,
      cached: Mutex::new(None),
    })
  }

  pub fn url(&self) -> &str { &self.config.url }

  fn cached(&self) -> std::sync::MutexGuard<'_, Option<Validated>> {
    self.cached.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

fn transport(e: reqwest::Error) -> FetchError { FetchError::Transport(Box::new(e)) }

impl AuthorSource for BerthaSource {
  async fn fetch_all(&self) -> Result<Vec<Author>, FetchError> {
    info!(bertha_url = %self.config.url, "calling Bertha");

    let etag = self.cached().as_ref().map(|c| c.etag.clone());
    let mut request = self.client.get(&self.config.url);
    if let Some(etag) = &etag {
      request = request.header(IF_NONE_MATCH, etag);
    }

    let response = request.send().await.map_err(transport)?;
    let status = response.status();

    if status == StatusCode::NOT_MODIFIED {
      if let Some(cached) = self.cached().as_ref() {
        debug!(etag = %cached.etag, "Bertha content not modified");
        return Ok(cached.authors.clone());
      }
      return Err(FetchError::Status(status.as_u16()));
    }
    if !status.is_success() {
      return Err(FetchError::Status(status.as_u16()));
    }

    let etag = response
      .headers()
      .get(ETAG)
      .and_then(|v| v.to_str().ok())
      .map(str::to_owned);
    let body = response.bytes().await.map_err(transport)?;
    let authors: Vec<Author> = serde_json::from_slice(&body)
      .map_err(|e| FetchError::Decode(e.to_string()))?;

    *self.cached() = etag.map(|etag| Validated {
      etag,
      authors: authors.clone(),
    });
    Ok(authors)
  }

  async fn probe(&self) -> Result<(), FetchError> {
    let response = self
      .client
      .get(&self.config.url)
      .send()
      .await
      .map_err(transport)?;
    match response.status() {
      StatusCode::OK => Ok(()),
      other => Err(FetchError::Status(other.as_u16())),
    }
  }
}
