//! Viewer identity, delegated to an external identity provider.
//!
//! Nothing here authenticates anyone. An [`IdentityProvider`] reports who the
//! provider says the caller is and where to send them to sign in or out. The
//! [`Viewer`] extractor hands that answer to handlers as an explicit,
//! request-scoped value.

use std::convert::Infallible;

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, request::Parts},
};
use notebook_core::{note::Author, store::NoteStore};
use notebook_geo::GeoResolver;
use serde::Deserialize;
use url::form_urlencoded;

use crate::AppState;

/// A signed-in user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
  pub id:    String,
  pub email: String,
}

impl From<&User> for Author {
  fn from(user: &User) -> Self {
    Author { identity: user.id.clone(), email: user.email.clone() }
  }
}

/// The capability handlers use to learn about the current viewer.
pub trait IdentityProvider: Send + Sync {
  fn current_user(&self, headers: &HeaderMap) -> Option<User>;

  /// Where to send a visitor to sign in, returning to `return_to` afterwards.
  fn login_url(&self, return_to: &str) -> String;

  /// Where to send a user to sign out, returning to `return_to` afterwards.
  fn logout_url(&self, return_to: &str) -> String;
}

// ─── Reverse-proxy headers ────────────────────────────────────────────────────

/// Settings for [`ProxyHeaderIdentity`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
  pub user_header:  String,
  pub email_header: String,
  pub login_url:    String,
  pub logout_url:   String,
  /// Query parameter carrying the post-login/logout destination.
  pub return_param: String,
}

impl Default for IdentityConfig {
  fn default() -> Self {
    Self {
      user_header:  "x-forwarded-user".to_owned(),
      email_header: "x-forwarded-email".to_owned(),
      login_url:    "/oauth2/start".to_owned(),
      logout_url:   "/oauth2/sign_out".to_owned(),
      return_param: "rd".to_owned(),
    }
  }
}

/// Trusts identity headers injected by an authenticating reverse proxy
/// (oauth2-proxy and friends). The proxy must strip these headers from
/// client requests.
#[derive(Debug, Clone)]
pub struct ProxyHeaderIdentity {
  config: IdentityConfig,
}

impl ProxyHeaderIdentity {
  pub fn new(config: IdentityConfig) -> Self { Self { config } }

  fn with_return(&self, base: &str, return_to: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
      .append_pair(&self.config.return_param, return_to)
      .finish();
    let sep = if base.contains('?') { '&' } else { '?' };
    format!("{base}{sep}{query}")
  }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
  headers
    .get(name)
    .and_then(|v| v.to_str().ok())
    .map(str::trim)
    .filter(|s| !s.is_empty())
}

impl IdentityProvider for ProxyHeaderIdentity {
  fn current_user(&self, headers: &HeaderMap) -> Option<User> {
    let id = header_str(headers, &self.config.user_header)?;
    // Some proxies only forward the user; the id doubles as the label.
    let email = header_str(headers, &self.config.email_header).unwrap_or(id);
    Some(User { id: id.to_owned(), email: email.to_owned() })
  }

  fn login_url(&self, return_to: &str) -> String {
    self.with_return(&self.config.login_url, return_to)
  }

  fn logout_url(&self, return_to: &str) -> String {
    self.with_return(&self.config.logout_url, return_to)
  }
}

// ─── Extractor ────────────────────────────────────────────────────────────────

/// The current viewer, or `None` for an anonymous visitor.
pub struct Viewer(pub Option<User>);

impl<S, G> FromRequestParts<AppState<S, G>> for Viewer
where
  S: NoteStore + 'static,
  G: GeoResolver + 'static,
{
  type Rejection = Infallible;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S, G>,
  ) -> Result<Self, Self::Rejection> {
    Ok(Viewer(state.identity.current_user(&parts.headers)))
  }
}

#[cfg(test)]
mod tests {
  use axum::http::HeaderValue;

  use super::*;

  fn provider() -> ProxyHeaderIdentity { ProxyHeaderIdentity::new(IdentityConfig::default()) }

  #[test]
  fn anonymous_without_headers() {
    assert_eq!(provider().current_user(&HeaderMap::new()), None);
  }

  #[test]
  fn user_from_headers() {
    let mut headers = HeaderMap::new();
    headers.insert("x-forwarded-user", HeaderValue::from_static("42"));
    headers.insert("x-forwarded-email", HeaderValue::from_static("alice@example.com"));
    assert_eq!(
      provider().current_user(&headers),
      Some(User { id: "42".into(), email: "alice@example.com".into() })
    );
  }

  #[test]
  fn missing_email_falls_back_to_id() {
    let mut headers = HeaderMap::new();
    headers.insert("x-forwarded-user", HeaderValue::from_static("alice"));
    let user = provider().current_user(&headers).unwrap();
    assert_eq!(user.email, "alice");
  }

  #[test]
  fn blank_user_header_is_anonymous() {
    let mut headers = HeaderMap::new();
    headers.insert("x-forwarded-user", HeaderValue::from_static("  "));
    assert_eq!(provider().current_user(&headers), None);
  }

  #[test]
  fn urls_carry_encoded_return_target() {
    let p = provider();
    assert_eq!(
      p.login_url("/?notebook_name=math"),
      "/oauth2/start?rd=%2F%3Fnotebook_name%3Dmath"
    );
    assert_eq!(p.logout_url("/"), "/oauth2/sign_out?rd=%2F");

    let p = ProxyHeaderIdentity::new(IdentityConfig {
      login_url: "https://id.example.com/login?app=notes".into(),
      ..IdentityConfig::default()
    });
    assert_eq!(
      p.login_url("/"),
      "https://id.example.com/login?app=notes&rd=%2F"
    );
  }
}
