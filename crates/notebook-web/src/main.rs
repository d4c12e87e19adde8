//! Notebook server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`) plus
//! `NOTEBOOK_*` environment variables, opens the SQLite store, and serves the
//! notebook over HTTP.
//!
//! Environment keys take a single-underscore prefix and double underscores
//! between nested keys, e.g. `NOTEBOOK_PORT=9000`, `NOTEBOOK_GEO__ENABLED=false`.

use std::{
  net::SocketAddr,
  path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::Parser;
use notebook_geo::HostIpResolver;
use notebook_store_sqlite::SqliteStore;
use notebook_web::{AppState, ServerConfig, identity::ProxyHeaderIdentity};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Notebook web server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(notebook_web::config::environment())
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let geo = if server_cfg.geo.enabled {
    let resolver = HostIpResolver::new(server_cfg.geo.endpoint.clone(), server_cfg.geo.timeout())
      .context("failed to build geo lookup client")?;
    tracing::info!(endpoint = %server_cfg.geo.endpoint, "geo enrichment enabled");
    Some(resolver)
  } else {
    tracing::info!("geo enrichment disabled");
    None
  };

  let identity = ProxyHeaderIdentity::new(server_cfg.identity.clone());
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  let state = AppState::new(store, geo, identity, server_cfg);

  let app = notebook_web::router(state);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
    .await
    .context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
