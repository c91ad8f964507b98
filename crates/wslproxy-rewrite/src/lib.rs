//! # wslproxy-rewrite
//!
//! Bind-mount path rewriting for a Docker API proxy bridging Windows, WSL
//! distros, and the Docker daemon.
//!
//! The client and the daemon see different filesystems. A Windows client
//! talks about `C:\Users\me`, a client inside the `Ubuntu` distro talks about
//! `/home/me`, and the daemon only understands the shared mount bridges
//! `/mnt/host/...` and `/mnt/wsl/<distro>/...`. Every bind path inside an API
//! body is translated on its way through the proxy.
//!
//! ## Architecture
//!
//! ```text
//! docker CLI ──► proxy ──► rewrite_body ──► dockerd
//!                              │
//!              route::resolve  │  (method + URL path → Schema)
//!                              ▼
//!              walker::rewrite_document  (Binds / Mounts fields)
//!                              │
//!                              ▼
//!              mapper::map_path  (one bind expression)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use axum::http::Method;
//! use wslproxy_rewrite::{RewriteDirection, rewrite_body};
//!
//! let body = br#"{"HostConfig":{"Binds":["/home/me:/src"]}}"#;
//! let rewritten = rewrite_body(
//!     body,
//!     &Method::POST,
//!     "/v1.43/containers/create",
//!     "Ubuntu",
//!     RewriteDirection::Request,
//! )
//! .unwrap()
//! .unwrap();
//! assert_eq!(
//!     &rewritten[..],
//!     br#"{"HostConfig":{"Binds":["/mnt/wsl/Ubuntu/home/me:/src"]}}"#
//! );
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod mapper;
pub mod proxy;
pub mod route;
pub mod schema;
pub mod walker;

pub use config::RewriteConfig;
pub use context::{RewriteContext, RewriteDirection};
pub use error::{Result, RewriteError};
pub use mapper::map_path;
pub use proxy::{rewrite_middleware, rewrite_request, rewrite_response};
pub use schema::Schema;

use axum::http::Method;
use bytes::Bytes;
use serde_json::Value;

/// Rewrites the bind paths inside a Docker API body.
///
/// Returns `Ok(None)` when the route carries no bind paths or the body is
/// not a JSON object or array; the caller then forwards the original body
/// as is. An empty body on a rewritten route yields an empty result.
///
/// # Errors
///
/// Returns [`RewriteError::Decode`] if the body starts like JSON but does
/// not parse, and [`RewriteError::Encode`] if re-encoding fails.
pub fn rewrite_body(
    body: &[u8],
    method: &Method,
    url_path: &str,
    distro_name: &str,
    direction: RewriteDirection,
) -> Result<Option<Bytes>> {
    let Some(schema) = route::resolve(method, url_path) else {
        return Ok(None);
    };

    tracing::trace!(body = %String::from_utf8_lossy(body), "original body");

    if body.is_empty() {
        return Ok(Some(Bytes::new()));
    }

    match body.iter().copied().find(|b| !b.is_ascii_whitespace()) {
        Some(b'{' | b'[') => {}
        _ => {
            tracing::debug!(%method, path = url_path, "body is not a JSON document, skipping");
            return Ok(None);
        }
    }

    let mut document: Value = serde_json::from_slice(body).map_err(RewriteError::Decode)?;

    let ctx = RewriteContext::new(direction, distro_name);
    tracing::debug!(
        %schema,
        %direction,
        base = ctx.base_path(),
        path = url_path,
        "rewriting body"
    );
    walker::rewrite_document(schema, &mut document, &ctx);

    let rewritten = serde_json::to_vec(&document).map_err(RewriteError::Encode)?;
    tracing::trace!(body = %String::from_utf8_lossy(&rewritten), "rewritten body");

    Ok(Some(Bytes::from(rewritten)))
}
