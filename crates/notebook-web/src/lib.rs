//! HTTP layer for the notebook application.
//!
//! Exposes an axum [`Router`] serving the listing page, the submission
//! endpoint and the validation-error page, backed by any [`NoteStore`] and
//! any [`GeoResolver`].

pub mod client_addr;
pub mod config;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod render;

pub use config::ServerConfig;
pub use error::Error;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use notebook_core::{notebook::NotebookName, store::NoteStore};
use notebook_geo::GeoResolver;
use tower_http::trace::TraceLayer;

use identity::IdentityProvider;
use render::Renderer;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers. Immutable after startup.
pub struct AppState<S, G> {
  pub store:            Arc<S>,
  pub geo:              Arc<G>,
  pub identity:         Arc<dyn IdentityProvider>,
  pub renderer:         Arc<Renderer>,
  pub config:           Arc<ServerConfig>,
  pub default_notebook: NotebookName,
}

impl<S, G> AppState<S, G> {
  pub fn new(
    store: S,
    geo: G,
    identity: impl IdentityProvider + 'static,
    config: ServerConfig,
  ) -> Self {
    Self {
      store:            Arc::new(store),
      geo:              Arc::new(geo),
      identity:         Arc::new(identity),
      renderer:         Arc::new(Renderer::new(config.site_title.clone())),
      default_notebook: config.default_notebook(),
      config:           Arc::new(config),
    }
  }
}

impl<S, G> Clone for AppState<S, G> {
  fn clone(&self) -> Self {
    Self {
      store:            Arc::clone(&self.store),
      geo:              Arc::clone(&self.geo),
      identity:         Arc::clone(&self.identity),
      renderer:         Arc::clone(&self.renderer),
      config:           Arc::clone(&self.config),
      default_notebook: self.default_notebook.clone(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the notebook server.
pub fn router<S, G>(state: AppState<S, G>) -> Router
where
  S: NoteStore + 'static,
  G: GeoResolver + 'static,
{
  Router::new()
    .route("/",        get(handlers::list::handler::<S, G>))
    .route("/sign",    post(handlers::sign::handler::<S, G>))
    .route("/error",   get(handlers::error_page::handler::<S, G>))
    .route("/healthz", get(|| async { "ok" }))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
