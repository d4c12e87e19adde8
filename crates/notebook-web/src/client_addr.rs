//! The submitter's network address, for geo-enrichment.

use std::{
  convert::Infallible,
  net::{IpAddr, SocketAddr},
};

use axum::{
  extract::{ConnectInfo, FromRequestParts},
  http::{HeaderMap, request::Parts},
};
use notebook_core::store::NoteStore;
use notebook_geo::GeoResolver;

use crate::AppState;

/// The caller's address, if one can be determined.
///
/// Read from the first `X-Forwarded-For` entry when the server is configured
/// to trust it, otherwise from the TCP peer.
pub struct ClientAddr(pub Option<IpAddr>);

fn forwarded_for(headers: &HeaderMap) -> Option<IpAddr> {
  headers
    .get("x-forwarded-for")?
    .to_str()
    .ok()?
    .split(',')
    .next()?
    .trim()
    .parse()
    .ok()
}

impl<S, G> FromRequestParts<AppState<S, G>> for ClientAddr
where
  S: NoteStore + 'static,
  G: GeoResolver + 'static,
{
  type Rejection = Infallible;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S, G>,
  ) -> Result<Self, Self::Rejection> {
    let forwarded = if state.config.trust_forwarded_for {
      forwarded_for(&parts.headers)
    } else {
      None
    };
    let peer = parts
      .extensions
      .get::<ConnectInfo<SocketAddr>>()
      .map(|ConnectInfo(addr)| addr.ip());
    Ok(ClientAddr(forwarded.or(peer)))
  }
}

#[cfg(test)]
mod tests {
  use axum::http::HeaderValue;

  use super::*;

  #[test]
  fn first_forwarded_entry_wins() {
    let mut headers = HeaderMap::new();
    headers.insert("x-forwarded-for", HeaderValue::from_static("8.8.8.8, 10.0.0.1"));
    assert_eq!(forwarded_for(&headers), Some("8.8.8.8".parse().unwrap()));
  }

  #[test]
  fn garbage_forwarded_for_is_ignored() {
    let mut headers = HeaderMap::new();
    headers.insert("x-forwarded-for", HeaderValue::from_static("unknown"));
    assert_eq!(forwarded_for(&headers), None);
    assert_eq!(forwarded_for(&HeaderMap::new()), None);
  }
}
