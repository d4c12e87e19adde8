//! `POST /sign` — validate a submission and store it as a note.

use axum::{
  Form,
  extract::{
    Query, State,
    rejection::{FormRejection, QueryRejection},
  },
  response::Redirect,
};
use notebook_core::{
  note::{NewNote, NoteFields},
  notebook::NotebookName,
  store::NoteStore,
};
use notebook_geo::GeoResolver;
use serde::Deserialize;
use url::form_urlencoded;

use crate::{
  AppState, client_addr::ClientAddr, error::Error, handlers::NotebookParams,
  identity::Viewer,
};

pub const ERROR_PATH: &str = "/error";

#[derive(Debug, Default, Deserialize)]
pub struct SignForm {
  pub notebook_name: Option<String>,
  #[serde(default)]
  pub unit:          String,
  #[serde(default)]
  pub title:         String,
  #[serde(default)]
  pub description:   String,
}

/// Listing URL for `notebook`.
pub fn listing_path(notebook: &NotebookName) -> String {
  let query = form_urlencoded::Serializer::new(String::new())
    .append_pair("notebook_name", notebook.as_str())
    .finish();
  format!("/?{query}")
}

pub async fn handler<S, G>(
  State(state): State<AppState<S, G>>,
  Viewer(user): Viewer,
  ClientAddr(addr): ClientAddr,
  params: Result<Query<NotebookParams>, QueryRejection>,
  form: Result<Form<SignForm>, FormRejection>,
) -> Result<Redirect, Error>
where
  S: NoteStore + 'static,
  G: GeoResolver + 'static,
{
  // A body or query that cannot be decoded is a rejected submission.
  let (Query(params), Form(form)) = match (params, form) {
    (Ok(params), Ok(form)) => (params, form),
    (Err(e), _) => {
      tracing::info!(reason = %e, "rejected submission query");
      return Ok(Redirect::to(ERROR_PATH));
    }
    (_, Err(e)) => {
      tracing::info!(reason = %e, "rejected submission body");
      return Ok(Redirect::to(ERROR_PATH));
    }
  };

  let raw_name = form
    .notebook_name
    .as_deref()
    .filter(|s| !s.trim().is_empty())
    .or(params.notebook_name.as_deref());
  let notebook = NotebookName::or_default(raw_name, &state.default_notebook);

  let fields = NoteFields {
    unit:        form.unit,
    title:       form.title,
    description: form.description,
  };
  let content = match fields.validate() {
    Ok(c) => c,
    Err(e) => {
      tracing::info!(%notebook, reason = %e, "rejected submission");
      return Ok(Redirect::to(ERROR_PATH));
    }
  };

  let coords = match addr {
    Some(addr) => state.geo.resolve(addr).await,
    None => None,
  };

  let input = NewNote {
    notebook: notebook.clone(),
    content,
    author: user.as_ref().map(Into::into),
    coords,
  };
  let note = state.store.create(input).await.map_err(Error::store)?;

  tracing::info!(
    note_id = %note.note_id,
    %notebook,
    authenticated = note.author.is_some(),
    located = note.coords.is_some(),
    "note created"
  );
  Ok(Redirect::to(&listing_path(&notebook)))
}
