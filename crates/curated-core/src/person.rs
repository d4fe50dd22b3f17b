//! Person, the canonical record served to downstream consumers.
//!
//! The JSON shape follows the people schema used across the platform: empty
//! optional fields are omitted rather than emitted as `null` or `""`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Identifiers ─────────────────────────────────────────────────────────────

/// Every identifier a person is known by, grouped by authority.
///
/// Each collection holds unique values in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternativeIdentifiers {
  /// Identifiers minted by the TME system.
  #[serde(rename = "TME", default, skip_serializing_if = "Vec::is_empty")]
  pub tme:   Vec<String>,
  #[serde(default)]
  pub uuids: Vec<String>,
}

impl AlternativeIdentifiers {
  /// Add a TME identifier unless it is already present.
  pub fn add_tme(&mut self, id: impl Into<String>) {
    push_unique(&mut self.tme, id.into());
  }

  /// Add a UUID unless it is already present.
  pub fn add_uuid(&mut self, id: Uuid) {
    push_unique(&mut self.uuids, id.to_string());
  }
}

fn push_unique(values: &mut Vec<String>, value: String) {
  if !values.contains(&value) {
    values.push(value);
  }
}

// ─── Person ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
  pub uuid:                    Uuid,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub birth_year:              Option<u16>,
  #[serde(default)]
  pub alternative_identifiers: AlternativeIdentifiers,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub name:                    String,
  #[serde(default)]
  pub pref_label:              String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub salutation:              String,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub aliases:                 Vec<String>,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub email_address:           String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub twitter_handle:          String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub facebook_profile:        String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub linkedin_profile:        String,
  /// Plain-text rendering of `description_xml`.
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub description:             String,
  /// The biography markup exactly as received.
  #[serde(rename = "descriptionXML", default, skip_serializing_if = "String::is_empty")]
  pub description_xml:         String,
  #[serde(rename = "_imageUrl", default, skip_serializing_if = "String::is_empty")]
  pub image_url:               String,
}

impl Person {
  /// A person with only an identity; every other field is empty.
  pub fn new(uuid: Uuid) -> Self {
    Self {
      uuid,
      birth_year: None,
      alternative_identifiers: AlternativeIdentifiers::default(),
      name: String::new(),
      pref_label: String::new(),
      salutation: String::new(),
      aliases: Vec::new(),
      email_address: String::new(),
      twitter_handle: String::new(),
      facebook_profile: String::new(),
      linkedin_profile: String::new(),
      description: String::new(),
      description_xml: String::new(),
      image_url: String::new(),
    }
  }
}
