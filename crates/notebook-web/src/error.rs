//! Error types and axum `IntoResponse` implementation.
//!
//! End users never see diagnostic detail; the cause is logged instead.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Error::Store(Box::new(e))
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::Store(e) => {
        tracing::error!(error = %e, "note store unavailable");
        (StatusCode::INTERNAL_SERVER_ERROR, "The notebook is unavailable right now.")
          .into_response()
      }
    }
  }
}
