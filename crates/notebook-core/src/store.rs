//! The `NoteStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g.
//! `notebook-store-sqlite`). The web layer depends on this abstraction, not on
//! any concrete backend.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{
  note::{NewNote, Note},
  notebook::NotebookName,
};

/// Upper bound on a single page; listing never scans a whole notebook.
pub const MAX_PAGE_SIZE: usize = 100;

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: usize = 10;

// ─── Query type ──────────────────────────────────────────────────────────────

/// The single active sort order for a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteOrder {
  /// Reverse-chronological by creation date.
  #[default]
  NewestFirst,
  /// Lexicographic by unit, newest first within a unit.
  Unit,
}

/// Parameters for [`NoteStore::list`].
#[derive(Debug, Clone)]
pub struct NoteQuery {
  /// The only partition the query may read.
  pub notebook: NotebookName,
  pub order:    NoteOrder,
  pub limit:    usize,
}

impl NoteQuery {
  pub fn new(notebook: NotebookName) -> Self {
    Self { notebook, order: NoteOrder::default(), limit: DEFAULT_PAGE_SIZE }
  }

  pub fn order(mut self, order: NoteOrder) -> Self {
    self.order = order;
    self
  }

  pub fn limit(mut self, limit: usize) -> Self {
    self.limit = limit;
    self
  }

  /// The limit actually applied: never zero, never above [`MAX_PAGE_SIZE`].
  pub fn effective_limit(&self) -> usize { self.limit.clamp(1, MAX_PAGE_SIZE) }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a note store backend.
///
/// Each notebook is one consistency domain: a [`list`](Self::list) scoped to a
/// notebook observes every [`create`](Self::create) previously completed in
/// that notebook. Notes are append-only.
///
/// Backends are expected to sustain roughly one write per second per
/// notebook. That rate is a caller discipline and is not enforced here.
pub trait NoteStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a validated note and return it with its id and date assigned.
  fn create(
    &self,
    input: NewNote,
  ) -> impl Future<Output = Result<Note, Self::Error>> + Send + '_;

  /// Return at most `query.effective_limit()` notes from one notebook, in the
  /// query's order.
  fn list<'a>(
    &'a self,
    query: &'a NoteQuery,
  ) -> impl Future<Output = Result<Vec<Note>, Self::Error>> + Send + 'a;

  /// Total number of notes in a notebook.
  fn count<'a>(
    &'a self,
    notebook: &'a NotebookName,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn limit_is_clamped() {
    let q = NoteQuery::new(NotebookName::default());
    assert_eq!(q.clone().limit(0).effective_limit(), 1);
    assert_eq!(q.clone().limit(30).effective_limit(), 30);
    assert_eq!(q.limit(10_000).effective_limit(), MAX_PAGE_SIZE);
  }
}
