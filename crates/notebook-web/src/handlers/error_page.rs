//! `GET /error` — the fixed validation-failure page.

use axum::{extract::State, response::Html};
use notebook_core::store::NoteStore;
use notebook_geo::GeoResolver;

use crate::AppState;

pub async fn handler<S, G>(State(state): State<AppState<S, G>>) -> Html<String>
where
  S: NoteStore + 'static,
  G: GeoResolver + 'static,
{
  Html(state.renderer.render_error())
}
