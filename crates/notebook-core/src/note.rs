//! Note types — the single persisted record of the notebook application.
//!
//! A note is immutable once written. There is no update or delete path; the
//! only way a note comes into existence is through a validated submission.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ValidationError, notebook::NotebookName};

// ─── Author ──────────────────────────────────────────────────────────────────

/// The authenticated submitter of a note, as reported by the identity
/// provider at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
  /// Stable user id from the identity provider.
  pub identity: String,
  pub email:    String,
}

// ─── Coordinates ─────────────────────────────────────────────────────────────

/// An approximate geographic point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
  pub lat: f64,
  pub lon: f64,
}

impl GeoPoint {
  /// Build a point, rejecting values outside the valid degree ranges.
  pub fn new(lat: f64, lon: f64) -> Option<Self> {
    let valid = lat.is_finite()
      && lon.is_finite()
      && (-90.0..=90.0).contains(&lat)
      && (-180.0..=180.0).contains(&lon);
    valid.then_some(Self { lat, lon })
  }
}

// ─── Submission ──────────────────────────────────────────────────────────────

/// Raw, untrusted form input.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoteFields {
  #[serde(default)]
  pub unit:        String,
  #[serde(default)]
  pub title:       String,
  #[serde(default)]
  pub description: String,
}

impl NoteFields {
  /// Trim every field and reject the submission if any is left empty.
  pub fn validate(self) -> Result<ValidNote, ValidationError> {
    let unit = required("unit", &self.unit)?;
    let title = required("title", &self.title)?;
    let description = required("description", &self.description)?;
    Ok(ValidNote { unit, title, description })
  }
}

fn required(field: &'static str, raw: &str) -> Result<String, ValidationError> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    Err(ValidationError::MissingField(field))
  } else {
    Ok(trimmed.to_owned())
  }
}

/// Trimmed, non-empty note content. Only obtainable via
/// [`NoteFields::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidNote {
  unit:        String,
  title:       String,
  description: String,
}

impl ValidNote {
  pub fn unit(&self) -> &str { &self.unit }

  pub fn title(&self) -> &str { &self.title }

  pub fn description(&self) -> &str { &self.description }
}

// ─── NewNote ─────────────────────────────────────────────────────────────────

/// Input to [`crate::store::NoteStore::create`].
/// `note_id` and `date` are always set by the store.
#[derive(Debug, Clone)]
pub struct NewNote {
  pub notebook: NotebookName,
  pub content:  ValidNote,
  pub author:   Option<Author>,
  pub coords:   Option<GeoPoint>,
}

impl NewNote {
  /// An anonymous, un-located note.
  pub fn new(notebook: NotebookName, content: ValidNote) -> Self {
    Self { notebook, content, author: None, coords: None }
  }
}

// ─── Note ────────────────────────────────────────────────────────────────────

/// A persisted note. Once written, no field is ever updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
  pub note_id:     Uuid,
  pub notebook:    NotebookName,
  pub unit:        String,
  pub title:       String,
  pub description: String,
  pub author:      Option<Author>,
  /// Server-assigned creation time; never changes after creation.
  pub date:        DateTime<Utc>,
  pub coords:      Option<GeoPoint>,
}

impl Note {
  /// Whether `user_id` identifies the author of this note.
  pub fn is_authored_by(&self, user_id: &str) -> bool {
    self.author.as_ref().is_some_and(|a| a.identity == user_id)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn fields(unit: &str, title: &str, description: &str) -> NoteFields {
    NoteFields {
      unit:        unit.into(),
      title:       title.into(),
      description: description.into(),
    }
  }

  #[test]
  fn valid_fields_are_trimmed() {
    let valid = fields("  U1 ", "T1\n", "\tD1").validate().unwrap();
    assert_eq!(valid.unit(), "U1");
    assert_eq!(valid.title(), "T1");
    assert_eq!(valid.description(), "D1");
  }

  #[test]
  fn each_empty_field_is_reported() {
    assert_eq!(
      fields("", "T1", "D1").validate(),
      Err(ValidationError::MissingField("unit"))
    );
    assert_eq!(
      fields("U1", "   ", "D1").validate(),
      Err(ValidationError::MissingField("title"))
    );
    assert_eq!(
      fields("U1", "T1", "\n").validate(),
      Err(ValidationError::MissingField("description"))
    );
  }

  #[test]
  fn geo_point_rejects_out_of_range() {
    assert!(GeoPoint::new(37.4, -122.0).is_some());
    assert!(GeoPoint::new(91.0, 0.0).is_none());
    assert!(GeoPoint::new(0.0, -180.5).is_none());
    assert!(GeoPoint::new(f64::NAN, 0.0).is_none());
  }
}
