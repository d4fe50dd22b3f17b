//! curated-authors-transformer server binary.
//!
//! Resolves configuration, primes the author cache from Bertha and serves
//! the transformer and operational endpoints over HTTP.

use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;
use curated_bertha::{BerthaConfig, BerthaSource};
use curated_core::AuthorCache;
use curated_server::{Cli, ServerConfig};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let server_cfg = ServerConfig::load(&cli)?;

  let bertha = BerthaSource::new(BerthaConfig {
    url:     server_cfg.bertha_source_url.clone().unwrap_or_default(),
    timeout: server_cfg.timeout(),
  })
  .context("failed to build Bertha client")?;
  let cache = Arc::new(AuthorCache::new(bertha));

  // A failed priming refresh leaves the cache empty until the next count.
  tracing::info!(bertha_url = %cache.source().url(), "priming author cache");
  if let Err(e) = cache.refresh().await {
    tracing::warn!(
      bertha_url = %cache.source().url(),
      error = %e,
      "initial refresh from Bertha failed"
    );
  }

  let app = curated_api::router(cache).layer(TraceLayer::new_for_http());
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
