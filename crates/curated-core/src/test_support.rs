//! In-memory [`AuthorSource`] for tests.

use std::sync::{
  Mutex,
  atomic::{AtomicUsize, Ordering},
};

use crate::{
  author::Author,
  source::{AuthorSource, FetchError},
};

enum Upstream {
  Serving(Vec<Author>),
  Failing(u16),
}

/// A source whose answer can be changed between calls, standing in for an
/// upstream that is edited or goes down.
pub struct StaticSource {
  upstream: Mutex<Upstream>,
  fetches:  AtomicUsize,
}

impl StaticSource {
  pub fn new(authors: Vec<Author>) -> Self {
    Self {
      upstream: Mutex::new(Upstream::Serving(authors)),
      fetches:  AtomicUsize::new(0),
    }
  }

  /// A source that answers every request with `status`.
  pub fn failing(status: u16) -> Self {
    Self {
      upstream: Mutex::new(Upstream::Failing(status)),
      fetches:  AtomicUsize::new(0),
    }
  }

  pub fn set_authors(&self, authors: Vec<Author>) {
    *self.upstream.lock().unwrap() = Upstream::Serving(authors);
  }

  pub fn fail_with_status(&self, status: u16) {
    *self.upstream.lock().unwrap() = Upstream::Failing(status);
  }

  /// How many times `fetch_all` has been called.
  pub fn fetch_count(&self) -> usize { self.fetches.load(Ordering::SeqCst) }
}

impl AuthorSource for StaticSource {
  async fn fetch_all(&self) -> Result<Vec<Author>, FetchError> {
    self.fetches.fetch_add(1, Ordering::SeqCst);
    match &*self.upstream.lock().unwrap() {
      Upstream::Serving(authors) => Ok(authors.clone()),
      Upstream::Failing(status) => Err(FetchError::Status(*status)),
    }
  }

  async fn probe(&self) -> Result<(), FetchError> {
    match &*self.upstream.lock().unwrap() {
      Upstream::Serving(_) => Ok(()),
      Upstream::Failing(status) => Err(FetchError::Status(*status)),
    }
  }
}

/// An author with the given identifier, name, and biography markup.
pub fn author(tme_identifier: &str, name: &str, biography: &str) -> Author {
  Author {
    name: name.to_owned(),
    email: format!("{}@example.com", name.to_lowercase()),
    biography: biography.to_owned(),
    tme_identifier: tme_identifier.to_owned(),
    ..Author::default()
  }
}
