//! Command line and layered configuration for the transformer binary.
//!
//! Settings resolve in order: built-in defaults, the optional TOML file,
//! `CURATED_*` environment variables, then command line flags (which also
//! read `PORT` and `BERTHA_SOURCE_URL`).

use std::{path::PathBuf, time::Duration};

use anyhow::Context as _;
use clap::Parser;
use serde::Deserialize;

#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Transforms Bertha curated authors into people")]
pub struct Cli {
  /// Path to an optional TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  pub config: PathBuf,

  /// Address to listen on.
  #[arg(long)]
  pub host: Option<String>,

  /// Port to listen on.
  #[arg(short, long, env = "PORT")]
  pub port: Option<u16>,

  /// Bertha URL serving the curated authors JSON.
  #[arg(long, env = "BERTHA_SOURCE_URL")]
  pub bertha_source_url: Option<String>,

  /// Timeout in seconds for each call to Bertha.
  #[arg(long)]
  pub timeout_secs: Option<u64>,
}

/// Fully resolved runtime configuration.
#[derive(Deserialize, Debug, Clone)]
pub struct ServerConfig {
  pub host:              String,
  pub port:              u16,
  pub bertha_source_url: Option<String>,
  pub timeout_secs:      u64,
}

impl ServerConfig {
  /// Resolve all configuration layers for `cli`. Fails if no Bertha URL is
  /// configured anywhere.
  pub fn load(cli: &Cli) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .set_default("host", "0.0.0.0")?
      .set_default("port", 8080_i64)?
      .set_default("timeout_secs", 30_i64)?
      .add_source(config::File::from(cli.config.clone()).required(false))
      .add_source(config::Environment::with_prefix("CURATED"))
      .set_override_option("host", cli.host.clone())?
      .set_override_option("port", cli.port.map(i64::from))?
      .set_override_option("bertha_source_url", cli.bertha_source_url.clone())?
      .set_override_option(
        "timeout_secs",
        cli.timeout_secs.map(i64::try_from).transpose()?,
      )?
      .build()
      .context("failed to read configuration")?;

    let cfg: ServerConfig = settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")?;

    match cfg.bertha_source_url.as_deref() {
      Some(url) if !url.trim().is_empty() => Ok(cfg),
      _ => anyhow::bail!(
        "no Bertha source URL configured (set BERTHA_SOURCE_URL or --bertha-source-url)"
      ),
    }
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn timeout(&self) -> Duration { Duration::from_secs(self.timeout_secs) }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
