//! Error type for `notebook-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A row that violates the note invariants (e.g. half of a coordinate).
  #[error("corrupt note row {0}: {1}")]
  CorruptRow(String, &'static str),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
