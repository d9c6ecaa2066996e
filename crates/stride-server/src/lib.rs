//! HTTP server wiring for Stride: configuration and the top-level router.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use serde::Deserialize;
use stride_store_sqlite::SqliteStore;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `STRIDE_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8080 }

fn default_store_path() -> PathBuf { PathBuf::from("~/.local/share/stride/stride.db") }

impl ServerConfig {
  /// Load from an optional TOML file, overridden by `STRIDE_*` env vars.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("STRIDE"))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` (alone or followed by `/`) to the user's home
/// directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let Ok(rest) = path.strip_prefix("~") else {
    return path.to_path_buf();
  };
  match std::env::var_os("HOME") {
    Some(home) if rest.as_os_str().is_empty() => PathBuf::from(home),
    Some(home) => PathBuf::from(home).join(rest),
    None => path.to_path_buf(),
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The API mounted under `/v1`, with request tracing.
pub fn router(store: SqliteStore) -> Router {
  Router::new()
    .nest("/v1", stride_api::api_router(Arc::new(store)))
    .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
  use std::io::Write as _;

  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use tower::ServiceExt as _;

  use super::*;

  #[test]
  fn missing_config_file_uses_defaults() {
    let cfg = ServerConfig::load(Path::new("/nonexistent/stride.toml")).unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.address(), format!("{}:8080", cfg.host));
  }

  #[test]
  fn config_file_overrides_defaults() {
    let dir = std::env::temp_dir().join(format!("stride-cfg-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("config.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "port = 9999\nstore_path = \"/tmp/stride-test.db\"").unwrap();

    let cfg = ServerConfig::load(&path).unwrap();
    assert_eq!(cfg.port, 9999);
    assert_eq!(cfg.store_path, PathBuf::from("/tmp/stride-test.db"));

    std::fs::remove_dir_all(&dir).ok();
  }

  #[test]
  fn tilde_expansion_only_touches_leading_tilde() {
    assert_eq!(expand_tilde(Path::new("/abs/db")), PathBuf::from("/abs/db"));
    assert_eq!(expand_tilde(Path::new("rel/~/db")), PathBuf::from("rel/~/db"));
    assert_eq!(expand_tilde(Path::new("~user/db")), PathBuf::from("~user/db"));
  }

  #[test]
  fn tilde_expansion_handles_bare_tilde() {
    let Some(home) = std::env::var_os("HOME") else { return };
    assert_eq!(expand_tilde(Path::new("~")), PathBuf::from(&home));
    assert_eq!(
      expand_tilde(Path::new("~/stride.db")),
      PathBuf::from(&home).join("stride.db")
    );
  }

  #[tokio::test]
  async fn api_is_nested_under_v1() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let app = router(store);

    let res = app
      .clone()
      .oneshot(Request::get("/v1/profiles").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(res.into_body(), 1024).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, serde_json::json!([]));

    let res = app
      .oneshot(Request::get("/profiles").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
  }
}
