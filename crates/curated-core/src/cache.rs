//! [`AuthorCache`]: the authoritative in-memory snapshot of people.
//!
//! A refresh fetches every author, transforms every one, and only then swaps
//! the finished [`Snapshot`] in. The single mutex guards nothing but the
//! `Arc<Snapshot>` pointer: it is held to clone or replace that pointer and
//! never across upstream I/O, so slow fetches do not block readers.
//!
//! # Refresh policy
//!
//! - [`AuthorCache::refresh`] is the explicit trigger.
//! - [`AuthorCache::count`] refreshes first and reports the size of the
//!   snapshot it published, surfacing any refresh failure.
//! - [`AuthorCache::list_ids`] and [`AuthorCache::get_by_id`] are pure reads
//!   of whatever snapshot was published last.

use std::{
  collections::HashMap,
  sync::{
    Arc, Mutex, MutexGuard, PoisonError,
    atomic::{AtomicU64, Ordering},
  },
};

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
  Result,
  author::Author,
  person::Person,
  source::{AuthorSource, FetchError},
  transform::{TransformError, author_to_person},
};

// ─── Snapshot ────────────────────────────────────────────────────────────────

/// One immutable, complete set of people produced by a single refresh.
#[derive(Debug, Default)]
pub struct Snapshot {
  people: HashMap<Uuid, Person>,
  /// Upstream order, de-duplicated.
  ids:    Vec<Uuid>,
  /// Which refresh built this snapshot; `0` for the initial empty one.
  ticket: u64,
}

impl Snapshot {
  /// Transform every author. Fails on the first record that cannot be
  /// transformed; nothing partial is returned.
  fn build(ticket: u64, authors: &[Author]) -> Result<Self, TransformError> {
    let mut people = HashMap::with_capacity(authors.len());
    let mut ids = Vec::with_capacity(authors.len());

    for author in authors {
      let person = author_to_person(author)?;
      let uuid = person.uuid;
      if people.insert(uuid, person).is_some() {
        warn!(
          tme_identifier = %author.tme_identifier,
          %uuid,
          "duplicate author identifier; keeping the later record"
        );
      } else {
        ids.push(uuid);
      }
    }

    Ok(Self { people, ids, ticket })
  }

  pub fn len(&self) -> usize { self.ids.len() }

  pub fn is_empty(&self) -> bool { self.ids.is_empty() }

  /// Identifiers in a stable order for the lifetime of this snapshot.
  pub fn ids(&self) -> &[Uuid] { &self.ids }

  pub fn get(&self, id: &Uuid) -> Option<&Person> { self.people.get(id) }

  /// Every person, in [`Snapshot::ids`] order.
  pub fn people(&self) -> impl Iterator<Item = &Person> {
    self.ids.iter().filter_map(|id| self.people.get(id))
  }
}

// ─── Cache ───────────────────────────────────────────────────────────────────

/// Serves people from the most recently published [`Snapshot`].
pub struct AuthorCache<S> {
  source:      S,
  current:     Mutex<Arc<Snapshot>>,
  last_ticket: AtomicU64,
}

impl<S: AuthorSource> AuthorCache<S> {
  /// A cache over `source` holding an empty snapshot. Nothing is fetched
  /// until the first refresh.
  pub fn new(source: S) -> Self {
    Self {
      source,
      current: Mutex::new(Arc::new(Snapshot::default())),
      last_ticket: AtomicU64::new(0),
    }
  }

  pub fn source(&self) -> &S { &self.source }

  /// The current snapshot. Readers holding it are unaffected by later
  /// refreshes.
  pub fn snapshot(&self) -> Arc<Snapshot> { Arc::clone(&self.guard()) }

  /// Fetch and transform the full author set, then publish it.
  ///
  /// All-or-nothing: if the fetch fails or any author fails to transform, the
  /// published snapshot is left untouched and the error is returned.
  pub async fn refresh(&self) -> Result<()> {
    let ticket = self.last_ticket.fetch_add(1, Ordering::Relaxed) + 1;
    info!(ticket, "refreshing author cache");

    let authors = self.source.fetch_all().await.inspect_err(|e| {
      error!(ticket, error = %e, "failed to fetch authors");
    })?;

    let snapshot = Snapshot::build(ticket, &authors).inspect_err(|e| {
      error!(ticket, error = %e, "failed to transform authors");
    })?;

    let size = snapshot.len();
    if self.publish(snapshot) {
      info!(ticket, count = size, "published author snapshot");
    } else {
      debug!(ticket, "newer snapshot already published; discarding");
    }
    Ok(())
  }

  /// Swap `snapshot` in unless a refresh that started later already
  /// published. Returns whether the swap happened.
  fn publish(&self, snapshot: Snapshot) -> bool {
    let mut current = self.guard();
    if current.ticket > snapshot.ticket {
      return false;
    }
    *current = Arc::new(snapshot);
    true
  }

  /// Refresh, then report how many people the cache holds.
  pub async fn count(&self) -> Result<usize> {
    self.refresh().await?;
    Ok(self.snapshot().len())
  }

  /// Identifiers of every person in the current snapshot.
  pub fn list_ids(&self) -> Vec<Uuid> { self.snapshot().ids().to_vec() }

  /// Look up one person in the current snapshot. `None` means no such
  /// person, never a person with empty fields.
  pub fn get_by_id(&self, id: &Uuid) -> Option<Person> {
    self.snapshot().get(id).cloned()
  }

  /// Probe the upstream source without touching the snapshot.
  pub async fn check_connectivity(&self) -> Result<(), FetchError> {
    self.source.probe().await
  }

  /// The snapshot pointer is only ever replaced whole, so a poisoned lock
  /// still guards a consistent value.
  fn guard(&self) -> MutexGuard<'_, Arc<Snapshot>> {
    self.current.lock().unwrap_or_else(PoisonError::into_inner)
  }
}
