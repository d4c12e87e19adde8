//! `GET /` — list one notebook's notes.

use axum::{
  extract::{Query, State},
  http::Uri,
  response::Html,
};
use notebook_core::{
  note::GeoPoint,
  notebook::NotebookName,
  store::{NoteQuery, NoteStore},
};
use notebook_geo::{GeoResolver, static_map_url};

use crate::{
  AppState,
  error::Error,
  handlers::NotebookParams,
  identity::Viewer,
  render::{AuthLink, ListingPage},
};

pub async fn handler<S, G>(
  State(state): State<AppState<S, G>>,
  Viewer(user): Viewer,
  uri: Uri,
  Query(params): Query<NotebookParams>,
) -> Result<Html<String>, Error>
where
  S: NoteStore + 'static,
  G: GeoResolver + 'static,
{
  let notebook = NotebookName::or_default(params.notebook_name.as_deref(), &state.default_notebook);

  let query = NoteQuery::new(notebook.clone())
    .order(state.config.order)
    .limit(state.config.page_size);
  let notes = state.store.list(&query).await.map_err(Error::store)?;
  let total = state.store.count(&notebook).await.map_err(Error::store)?;

  let points: Vec<GeoPoint> = notes.iter().filter_map(|n| n.coords).collect();
  let map_url = static_map_url(&state.config.map, &points);

  let return_to = uri.to_string();
  let auth = match &user {
    Some(_) => AuthLink { url: state.identity.logout_url(&return_to), text: "Logout" },
    None => AuthLink { url: state.identity.login_url(&return_to), text: "Login" },
  };

  let page = ListingPage {
    notebook: &notebook,
    notes: &notes,
    total,
    viewer_id: user.as_ref().map(|u| u.id.as_str()),
    map_url,
    auth,
  };
  Ok(Html(state.renderer.render_listing(&page)))
}
