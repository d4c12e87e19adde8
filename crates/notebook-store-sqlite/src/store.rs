//! [`SqliteStore`] — the SQLite implementation of [`NoteStore`].

use std::path::Path;

use chrono::Utc;
use uuid::Uuid;

use notebook_core::{
  note::{NewNote, Note},
  notebook::NotebookName,
  store::{NoteOrder, NoteQuery, NoteStore},
};

use crate::{
  Result,
  encode::{NOTE_COLUMNS, RawNote, encode_dt, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A note store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

fn order_clause(order: NoteOrder) -> &'static str {
  match order {
    NoteOrder::NewestFirst => "ORDER BY date DESC, seq DESC",
    NoteOrder::Unit => "ORDER BY unit ASC, date DESC, seq DESC",
  }
}

// ─── NoteStore impl ──────────────────────────────────────────────────────────

impl NoteStore for SqliteStore {
  type Error = crate::Error;

  async fn create(&self, input: NewNote) -> Result<Note> {
    let note = Note {
      note_id:     Uuid::new_v4(),
      notebook:    input.notebook,
      unit:        input.content.unit().to_owned(),
      title:       input.content.title().to_owned(),
      description: input.content.description().to_owned(),
      author:      input.author,
      date:        Utc::now(),
      coords:      input.coords,
    };

    let id_str          = encode_uuid(note.note_id);
    let notebook        = note.notebook.as_str().to_owned();
    let unit            = note.unit.clone();
    let title           = note.title.clone();
    let description     = note.description.clone();
    let author_identity = note.author.as_ref().map(|a| a.identity.clone());
    let author_email    = note.author.as_ref().map(|a| a.email.clone());
    let date_str        = encode_dt(note.date);
    let lat             = note.coords.map(|c| c.lat);
    let lon             = note.coords.map(|c| c.lon);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO notes (
             note_id, notebook, unit, title, description,
             author_identity, author_email, date, lat, lon
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          rusqlite::params![
            id_str,
            notebook,
            unit,
            title,
            description,
            author_identity,
            author_email,
            date_str,
            lat,
            lon,
          ],
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(note_id = %note.note_id, notebook = %note.notebook, "note stored");
    Ok(note)
  }

  async fn list(&self, query: &NoteQuery) -> Result<Vec<Note>> {
    let notebook  = query.notebook.as_str().to_owned();
    let limit_val = query.effective_limit() as i64;
    let sql = format!(
      "SELECT {NOTE_COLUMNS} FROM notes WHERE notebook = ?1 {} LIMIT ?2",
      order_clause(query.order),
    );

    let raws: Vec<RawNote> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![notebook, limit_val], RawNote::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawNote::into_note).collect()
  }

  async fn count(&self, notebook: &NotebookName) -> Result<u64> {
    let notebook = notebook.as_str().to_owned();

    let n: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM notes WHERE notebook = ?1",
          rusqlite::params![notebook],
          |row| row.get(0),
        )?)
      })
      .await?;

    Ok(n.max(0) as u64)
  }
}
