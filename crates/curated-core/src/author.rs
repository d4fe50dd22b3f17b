//! The raw author record as published by the upstream curated-data feed.

use serde::{Deserialize, Serialize};

/// One curated author entry from Bertha.
///
/// Keys on the wire are all-lowercase. Absent keys decode as empty strings so
/// that a sparsely filled spreadsheet row still yields a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Author {
  pub name:             String,
  pub email:            String,
  #[serde(rename = "imageurl")]
  pub image_url:        String,
  /// HTML fragment.
  pub biography:        String,
  #[serde(rename = "twitterhandle")]
  pub twitter_handle:   String,
  #[serde(rename = "facebookprofile")]
  pub facebook_profile: String,
  #[serde(rename = "linkedinprofile")]
  pub linkedin_profile: String,
  /// The TME identifier; the only input to the derived person UUID.
  #[serde(rename = "tmeidentifier")]
  pub tme_identifier:   String,
}
