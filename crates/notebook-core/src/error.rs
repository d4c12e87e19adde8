//! Error types for `notebook-core`.

use thiserror::Error;

/// A submission that cannot become a note.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("required field `{0}` is empty")]
  MissingField(&'static str),
}
