//! Core types and the refresh-and-transform engine for curated authors.
//!
//! Raw author records come from a single upstream [`AuthorSource`], are
//! converted into canonical [`Person`] records by [`transform`], and are
//! served from an [`AuthorCache`] snapshot that is replaced wholesale on every
//! successful refresh.
//!
//! This crate is free of HTTP dependencies; the network fetcher and the
//! request layer live in their own crates.

// Native `async fn` in traits; the returned futures are declared `Send` on
// the trait itself.
#![allow(async_fn_in_trait)]

pub mod author;
pub mod cache;
pub mod error;
pub mod person;
pub mod source;
pub mod text;
pub mod transform;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use author::Author;
pub use cache::{AuthorCache, Snapshot};
pub use error::{Error, Result};
pub use person::{AlternativeIdentifiers, Person};
pub use source::{AuthorSource, FetchError};
pub use transform::{TransformError, author_to_person, derive_uuid};
