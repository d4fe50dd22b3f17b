//! Author → Person conversion.
//!
//! Pure functions with no shared state: safe to call concurrently for
//! distinct records.

use thiserror::Error;
use uuid::Uuid;

use crate::{
  author::Author,
  person::{AlternativeIdentifiers, Person},
  text::{RenderError, html_to_text},
};

/// An author whose biography could not be rendered.
#[derive(Debug, Error)]
#[error("cannot render biography of author {tme_identifier}: {source}")]
pub struct TransformError {
  pub tme_identifier: String,
  #[source]
  pub source:         RenderError,
}

/// Derive the person UUID for a TME identifier.
///
/// Name-based (MD5, version 3) in the nil namespace, so the same identifier
/// always maps to the same UUID regardless of any other field.
pub fn derive_uuid(tme_identifier: &str) -> Uuid {
  Uuid::new_v3(&Uuid::nil(), tme_identifier.as_bytes())
}

/// Convert one raw author into its canonical person record.
pub fn author_to_person(author: &Author) -> Result<Person, TransformError> {
  let uuid = derive_uuid(&author.tme_identifier);
  let description =
    html_to_text(&author.biography).map_err(|source| TransformError {
      tme_identifier: author.tme_identifier.clone(),
      source,
    })?;

  let mut alternative_identifiers = AlternativeIdentifiers::default();
  alternative_identifiers.add_tme(author.tme_identifier.as_str());
  alternative_identifiers.add_uuid(uuid);

  Ok(Person {
    alternative_identifiers,
    name: author.name.clone(),
    pref_label: author.name.clone(),
    email_address: author.email.clone(),
    twitter_handle: author.twitter_handle.clone(),
    facebook_profile: author.facebook_profile.clone(),
    linkedin_profile: author.linkedin_profile.clone(),
    description,
    description_xml: author.biography.clone(),
    image_url: author.image_url.clone(),
    ..Person::new(uuid)
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  const CARTMAN_BIO: &str = r#"<p>Eric Theodore Cartman is one of the main characters in the animated television series <a href="https://en.wikipedia.org/wiki/South_Park">South Park</a>, created by Matt Stone and Trey Parker, and voiced by Trey Parker.</p>"#;

  fn cartman() -> Author {
    Author {
      name: "Eric Cartman".into(),
      email: "eric.cartman@southpark.cc.com".into(),
      image_url: "https://upload.wikimedia.org/wikipedia/en/7/77/EricCartman.png"
        .into(),
      biography: CARTMAN_BIO.into(),
      twitter_handle: "@SouthPark".into(),
      tme_identifier: "Q0ItMDAwMDkwMA==-QXV0aG9ycw==".into(),
      ..Author::default()
    }
  }

  #[test]
  fn derives_known_uuids() {
    assert_eq!(
      derive_uuid("Q0ItMDAwMDkwMA==-QXV0aG9ycw==").to_string(),
      "8a165847-3a69-3100-9933-d2a351591a81"
    );
    assert_eq!(
      derive_uuid("Q0ItMDAwMDkyNg==-QXV0aG9ycw==").to_string(),
      "7b4c3f77-2dc1-3c74-89a7-1cfac5a94c39"
    );
  }

  #[test]
  fn distinct_identifiers_derive_distinct_uuids() {
    let uuids: std::collections::HashSet<Uuid> = (0..1000)
      .map(|i| derive_uuid(&format!("Q0ItMDAw{i:05}==-QXV0aG9ycw==")))
      .collect();
    assert_eq!(uuids.len(), 1000);
  }

  #[test]
  fn transforms_every_field() {
    let person = author_to_person(&cartman()).unwrap();

    assert_eq!(person.uuid, derive_uuid("Q0ItMDAwMDkwMA==-QXV0aG9ycw=="));
    assert_eq!(person.name, "Eric Cartman");
    assert_eq!(person.pref_label, "Eric Cartman");
    assert_eq!(person.email_address, "eric.cartman@southpark.cc.com");
    assert_eq!(person.twitter_handle, "@SouthPark");
    assert_eq!(person.facebook_profile, "");
    assert_eq!(
      person.image_url,
      "https://upload.wikimedia.org/wikipedia/en/7/77/EricCartman.png"
    );
    assert_eq!(person.description_xml, CARTMAN_BIO);
    assert_eq!(
      person.description,
      "Eric Theodore Cartman is one of the main characters in the animated \
       television series South Park ( https://en.wikipedia.org/wiki/South_Park \
       ) , created by Matt Stone and Trey Parker, and voiced by Trey Parker."
    );
    assert_eq!(person.alternative_identifiers.tme, vec![
      "Q0ItMDAwMDkwMA==-QXV0aG9ycw=="
    ]);
    assert_eq!(person.alternative_identifiers.uuids, vec![
      person.uuid.to_string()
    ]);
    assert_eq!(person.birth_year, None);
    assert!(person.aliases.is_empty());
  }

  #[test]
  fn transform_is_deterministic() {
    let first = author_to_person(&cartman()).unwrap();
    let second = author_to_person(&cartman()).unwrap();
    assert_eq!(first.uuid, second.uuid);
    assert_eq!(first.alternative_identifiers, second.alternative_identifiers);
  }

  #[test]
  fn identity_survives_edits_to_other_fields() {
    let before = author_to_person(&cartman()).unwrap();
    let mut edited = cartman();
    edited.name = "Eric T. Cartman".into();
    edited.biography = "<p>Respect my authoritah.</p>".into();
    let after = author_to_person(&edited).unwrap();
    assert_eq!(before.uuid, after.uuid);
  }

  #[test]
  fn unrenderable_biography_names_the_author() {
    let mut author = cartman();
    author.biography = r#"<p>Tom <a href="x""#.into();
    let err = author_to_person(&author).unwrap_err();
    assert_eq!(err.tme_identifier, "Q0ItMDAwMDkwMA==-QXV0aG9ycw==");
    assert!(err.to_string().contains("Q0ItMDAwMDkwMA==-QXV0aG9ycw=="));
  }
}
