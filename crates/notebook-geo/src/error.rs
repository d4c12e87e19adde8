//! Errors raised inside a geo lookup. They never cross
//! [`GeoResolver::resolve`](crate::GeoResolver::resolve).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeoError {
  #[error("transport error: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("lookup service returned HTTP {0}")]
  Status(u16),

  #[error("xml error: {0}")]
  Xml(String),

  #[error("response carries no coordinates")]
  NoCoordinates,

  #[error("malformed coordinates: {0:?}")]
  MalformedCoordinates(String),
}
