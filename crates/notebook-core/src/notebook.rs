//! Notebook names — the grouping key that partitions notes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name used when a request does not name a notebook.
pub const DEFAULT_NOTEBOOK_NAME: &str = "intro_notes";

/// A named partition of notes.
///
/// Notebooks are never stored as entities of their own; the name is written
/// alongside every note and every read is scoped to exactly one name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotebookName(String);

impl NotebookName {
  /// Build a name from user input. Blank input yields `None`.
  pub fn new(raw: &str) -> Option<Self> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
      None
    } else {
      Some(Self(trimmed.to_owned()))
    }
  }

  /// Resolve an optional request parameter, falling back to `default`.
  pub fn or_default(raw: Option<&str>, default: &NotebookName) -> Self {
    raw.and_then(Self::new).unwrap_or_else(|| default.clone())
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl Default for NotebookName {
  fn default() -> Self { Self(DEFAULT_NOTEBOOK_NAME.to_owned()) }
}

impl fmt::Display for NotebookName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn blank_names_are_rejected() {
    assert!(NotebookName::new("").is_none());
    assert!(NotebookName::new("   \t").is_none());
  }

  #[test]
  fn names_are_trimmed() {
    assert_eq!(NotebookName::new("  math ").unwrap().as_str(), "math");
  }

  #[test]
  fn missing_or_blank_falls_back_to_default() {
    let default = NotebookName::default();
    assert_eq!(NotebookName::or_default(None, &default), default);
    assert_eq!(NotebookName::or_default(Some(" "), &default), default);
    assert_eq!(
      NotebookName::or_default(Some("science"), &default).as_str(),
      "science"
    );
  }
}
