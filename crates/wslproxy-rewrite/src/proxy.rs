//! Body plumbing for proxies forwarding Docker API traffic.
//!
//! Bodies are only buffered on routes that carry bind paths; everything
//! else (image pushes, log streams, attach) streams through untouched.

use crate::config::RewriteConfig;
use crate::context::RewriteDirection;
use crate::error::{Result, RewriteError};
use crate::{rewrite_body, route};
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderValue, Method, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use http_body_util::BodyExt;

/// Rewrites the bind paths of a client request before it reaches the daemon.
///
/// # Errors
///
/// Returns an error if the body cannot be read or is malformed JSON.
pub async fn rewrite_request(request: Request, distro_name: &str) -> Result<Request> {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    if route::resolve(&method, &path).is_none() {
        return Ok(request);
    }

    let (mut parts, body) = request.into_parts();
    let body = collect(body).await?;
    let body = replace_body(
        &mut parts.headers,
        body,
        &method,
        &path,
        distro_name,
        RewriteDirection::Request,
    )?;

    Ok(Request::from_parts(parts, Body::from(body)))
}

/// Rewrites the bind paths of a daemon response before it reaches the client.
///
/// `method` and `path` are those of the request the response answers.
///
/// # Errors
///
/// Returns an error if the body cannot be read or is malformed JSON.
pub async fn rewrite_response(
    method: &Method,
    path: &str,
    response: Response,
    distro_name: &str,
) -> Result<Response> {
    if route::resolve(method, path).is_none() {
        return Ok(response);
    }

    let (mut parts, body) = response.into_parts();
    let body = collect(body).await?;
    let body = replace_body(
        &mut parts.headers,
        body,
        method,
        path,
        distro_name,
        RewriteDirection::Response,
    )?;

    Ok(Response::from_parts(parts, Body::from(body)))
}

/// Axum middleware rewriting both the request and the response body.
///
/// Install with `axum::middleware::from_fn_with_state(config, rewrite_middleware)`
/// in front of the handler that forwards to the daemon.
pub async fn rewrite_middleware(
    State(config): State<RewriteConfig>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    let request = match rewrite_request(request, &config.distro_name).await {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(%method, path = %path, error = %e, "failed to rewrite request body");
            return e.into_response();
        }
    };

    let response = next.run(request).await;

    match rewrite_response(&method, &path, response, &config.distro_name).await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(%method, path = %path, error = %e, "failed to rewrite response body");
            e.into_response()
        }
    }
}

async fn collect(body: Body) -> Result<Bytes> {
    body.collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .map_err(|e| RewriteError::Body(e.to_string()))
}

fn replace_body(
    headers: &mut HeaderMap,
    body: Bytes,
    method: &Method,
    path: &str,
    distro_name: &str,
    direction: RewriteDirection,
) -> Result<Bytes> {
    let Some(rewritten) = rewrite_body(&body, method, path, distro_name, direction)? else {
        return Ok(body);
    };

    // The body is now fully buffered.
    headers.remove(header::TRANSFER_ENCODING);
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(rewritten.len()));

    Ok(rewritten)
}
