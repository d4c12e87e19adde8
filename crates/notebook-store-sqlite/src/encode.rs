//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings with a fixed nanosecond
//! precision so that lexicographic order matches chronological order. UUIDs
//! are stored as hyphenated lowercase strings.

use chrono::{DateTime, SecondsFormat, Utc};
use notebook_core::{
  note::{Author, GeoPoint, Note},
  notebook::NotebookName,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Raw row ──────────────────────────────────────────────────────────────────

/// A `notes` row exactly as read from SQLite.
pub struct RawNote {
  pub note_id:         String,
  pub notebook:        String,
  pub unit:            String,
  pub title:           String,
  pub description:     String,
  pub author_identity: Option<String>,
  pub author_email:    Option<String>,
  pub date:            String,
  pub lat:             Option<f64>,
  pub lon:             Option<f64>,
}

/// Column list matching [`RawNote::from_row`].
pub const NOTE_COLUMNS: &str = "note_id, notebook, unit, title, description, \
                                author_identity, author_email, date, lat, lon";

impl RawNote {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      note_id:         row.get(0)?,
      notebook:        row.get(1)?,
      unit:            row.get(2)?,
      title:           row.get(3)?,
      description:     row.get(4)?,
      author_identity: row.get(5)?,
      author_email:    row.get(6)?,
      date:            row.get(7)?,
      lat:             row.get(8)?,
      lon:             row.get(9)?,
    })
  }

  pub fn into_note(self) -> Result<Note> {
    let notebook = NotebookName::new(&self.notebook)
      .ok_or_else(|| Error::CorruptRow(self.note_id.clone(), "blank notebook"))?;

    let author = match (self.author_identity, self.author_email) {
      (Some(identity), Some(email)) => Some(Author { identity, email }),
      (None, None) => None,
      _ => return Err(Error::CorruptRow(self.note_id, "partial author")),
    };

    let coords = match (self.lat, self.lon) {
      (Some(lat), Some(lon)) => Some(
        GeoPoint::new(lat, lon)
          .ok_or_else(|| Error::CorruptRow(self.note_id.clone(), "coordinates out of range"))?,
      ),
      (None, None) => None,
      _ => return Err(Error::CorruptRow(self.note_id, "partial coordinates")),
    };

    Ok(Note {
      note_id: decode_uuid(&self.note_id)?,
      notebook,
      unit: self.unit,
      title: self.title,
      description: self.description,
      author,
      date: decode_dt(&self.date)?,
      coords,
    })
  }
}
