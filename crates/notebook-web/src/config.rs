//! Runtime server configuration, deserialised from `config.toml` and
//! `NOTEBOOK_*` environment variables. Every field has a default.

use std::{path::PathBuf, time::Duration};

use notebook_core::{
  notebook::{DEFAULT_NOTEBOOK_NAME, NotebookName},
  store::{DEFAULT_PAGE_SIZE, NoteOrder},
};
use notebook_geo::{MapConfig, hostip};
use serde::Deserialize;

use crate::identity::IdentityConfig;

/// `NOTEBOOK_`-prefixed environment source. Nested keys are joined with a
/// double underscore: `NOTEBOOK_PORT`, `NOTEBOOK_GEO__ENABLED`.
pub fn environment() -> config::Environment {
  config::Environment::with_prefix("NOTEBOOK")
    .prefix_separator("_")
    .separator("__")
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:                String,
  pub port:                u16,
  pub store_path:          PathBuf,
  pub site_title:          String,
  /// Notebook shown and written to when a request names none.
  pub default_notebook:    String,
  pub page_size:           usize,
  pub order:               NoteOrder,
  /// Take the client address from `X-Forwarded-For`. Only enable behind a
  /// proxy that sets it.
  pub trust_forwarded_for: bool,
  pub identity:            IdentityConfig,
  pub geo:                 GeoConfig,
  pub map:                 MapConfig,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                "127.0.0.1".to_owned(),
      port:                8080,
      store_path:          PathBuf::from("notebook.sqlite"),
      site_title:          "Notebook".to_owned(),
      default_notebook:    DEFAULT_NOTEBOOK_NAME.to_owned(),
      page_size:           DEFAULT_PAGE_SIZE,
      order:               NoteOrder::default(),
      trust_forwarded_for: false,
      identity:            IdentityConfig::default(),
      geo:                 GeoConfig::default(),
      map:                 MapConfig::default(),
    }
  }
}

impl ServerConfig {
  /// The configured default notebook; a blank setting means the built-in one.
  pub fn default_notebook(&self) -> NotebookName {
    NotebookName::or_default(Some(&self.default_notebook), &NotebookName::default())
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeoConfig {
  pub enabled:    bool,
  pub endpoint:   String,
  pub timeout_ms: u64,
}

impl Default for GeoConfig {
  fn default() -> Self {
    Self {
      enabled:    true,
      endpoint:   hostip::DEFAULT_ENDPOINT.to_owned(),
      timeout_ms: 2000,
    }
  }
}

impl GeoConfig {
  pub fn timeout(&self) -> Duration { Duration::from_millis(self.timeout_ms) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn blank_default_notebook_uses_builtin() {
    let cfg = ServerConfig { default_notebook: "  ".into(), ..ServerConfig::default() };
    assert_eq!(cfg.default_notebook().as_str(), DEFAULT_NOTEBOOK_NAME);
  }

  #[test]
  fn deserialises_partial_config() {
    let settings = config::Config::builder()
      .add_source(config::File::from_str(
        "port = 9000\norder = \"unit\"\npage_size = 30\n[geo]\nenabled = false\n",
        config::FileFormat::Toml,
      ))
      .build()
      .unwrap();
    let cfg: ServerConfig = settings.try_deserialize().unwrap();
    assert_eq!(cfg.port, 9000);
    assert_eq!(cfg.order, NoteOrder::Unit);
    assert_eq!(cfg.page_size, 30);
    assert!(!cfg.geo.enabled);
    assert_eq!(cfg.geo.timeout_ms, 2000);
    assert_eq!(cfg.host, "127.0.0.1");
  }

  #[test]
  fn environment_overrides_use_single_underscore_prefix() {
    let vars = config::Map::from([
      ("NOTEBOOK_PORT".to_owned(), "9000".to_owned()),
      ("NOTEBOOK_GEO__ENABLED".to_owned(), "false".to_owned()),
      ("NOTEBOOK_TRUST_FORWARDED_FOR".to_owned(), "true".to_owned()),
      ("NOTEBOOK_GEO__TIMEOUT_MS".to_owned(), "500".to_owned()),
      ("OTHER_PORT".to_owned(), "1".to_owned()),
    ]);
    let settings = config::Config::builder()
      .add_source(environment().source(Some(vars)))
      .build()
      .unwrap();
    let cfg: ServerConfig = settings.try_deserialize().unwrap();
    assert_eq!(cfg.port, 9000);
    assert!(!cfg.geo.enabled);
    assert!(cfg.trust_forwarded_for);
    assert_eq!(cfg.geo.timeout_ms, 500);
  }
}
