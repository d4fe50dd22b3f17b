//! Operational endpoints: health, good-to-go, ping and build info.
//!
//! Health and good-to-go both probe Bertha; neither touches the cached
//! snapshot.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, Utc};
use curated_core::{AuthorCache, AuthorSource};
use serde::Serialize;
use tracing::warn;

pub const SERVICE_NAME: &str = "curated-authors-transformer";

// ─── Health ──────────────────────────────────────────────────────────────────

/// Outcome of a single dependency check.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
  pub name:              String,
  pub ok:                bool,
  /// 1 is the most severe.
  pub severity:          u8,
  pub business_impact:   String,
  pub technical_summary: String,
  pub check_output:      String,
  pub last_updated:      DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
  pub schema_version: u8,
  pub name:           String,
  pub description:    String,
  pub checks:         Vec<CheckResult>,
  pub ok:             bool,
}

async fn bertha_check<S: AuthorSource>(cache: &AuthorCache<S>) -> CheckResult {
  let outcome = cache.check_connectivity().await;
  if let Err(e) = &outcome {
    warn!(error = %e, "Bertha connectivity check failed");
  }
  CheckResult {
    name:              "Check connectivity to Bertha".into(),
    ok:                outcome.is_ok(),
    severity:          1,
    business_impact:   "Unable to respond to request for curated author data from Bertha"
      .into(),
    technical_summary: "Cannot connect to Bertha to be able to supply curated authors"
      .into(),
    check_output:      match outcome {
      Ok(()) => "Connectivity to Bertha is ok".into(),
      Err(e) => format!("Error connecting to Bertha: {e}"),
    },
    last_updated:      Utc::now(),
  }
}

/// `GET /__health`
///
/// Always `200`; the report body carries the verdict.
pub async fn health<S>(State(cache): State<Arc<AuthorCache<S>>>) -> Json<HealthReport>
where
  S: AuthorSource + 'static,
{
  let check = bertha_check(cache.as_ref()).await;
  Json(HealthReport {
    schema_version: 1,
    name:           SERVICE_NAME.into(),
    description:    "Transforms Bertha curated authors into people".into(),
    ok:             check.ok,
    checks:         vec![check],
  })
}

/// `GET /__gtg`: `503` whenever Bertha is unreachable.
pub async fn good_to_go<S>(
  State(cache): State<Arc<AuthorCache<S>>>,
) -> impl IntoResponse
where
  S: AuthorSource + 'static,
{
  match cache.check_connectivity().await {
    Ok(()) => (StatusCode::OK, "OK"),
    Err(_) => (StatusCode::SERVICE_UNAVAILABLE, "Service Unavailable"),
  }
}

// ─── Static ──────────────────────────────────────────────────────────────────

/// `GET /__ping`
pub async fn ping() -> &'static str { "pong" }

#[derive(Debug, Serialize)]
pub struct BuildInfo {
  pub name:    &'static str,
  pub version: &'static str,
}

/// `GET /__build-info`
pub async fn build_info() -> Json<BuildInfo> {
  Json(BuildInfo {
    name:    SERVICE_NAME,
    version: env!("CARGO_PKG_VERSION"),
  })
}
