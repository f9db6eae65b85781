//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: body limits, route matching,
//! dispatch to the film handlers or pages, common headers and access log.

use crate::config::AppState;
use crate::handler::{films, pages};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::HeaderValue;
use hyper::{Method, Request, Response, StatusCode};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Resolved request path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Films,
    /// `/api/films/:id`; `None` when the segment has no usable id
    Film(Option<u64>),
    Unknown,
}

impl Route {
    pub fn resolve(path: &str) -> Self {
        // Tolerate a single trailing slash like most routers do
        let path = if path.len() > 1 {
            path.strip_suffix('/').unwrap_or(path)
        } else {
            path
        };

        match path {
            "/" => Self::Home,
            "/api/films" => Self::Films,
            _ => match path.strip_prefix("/api/films/") {
                Some(segment) if !segment.is_empty() && !segment.contains('/') => {
                    Self::Film(parse_id(segment))
                }
                _ => Self::Unknown,
            },
        }
    }
}

/// Read the leading decimal digits of a path segment, so `12abc` is 12
/// and `1.5` is 1. Zero and digit-less segments give `None`.
fn parse_id(segment: &str) -> Option<u64> {
    let digits = segment
        .find(|c: char| !c.is_ascii_digit())
        .map_or(segment, |end| &segment[..end]);
    digits.parse().ok().filter(|id| *id > 0)
}

/// True when the body is declared as `application/json`; other bodies are
/// not parsed and count as an empty object
fn is_json_body<B>(req: &Request<B>) -> bool {
    req.headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|media| media.trim().eq_ignore_ascii_case("application/json"))
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = format!("{:?}", req.version())
        .trim_start_matches("HTTP/")
        .to_string();
    entry.user_agent = req
        .headers()
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);

    let is_head = req.method() == Method::HEAD;
    let mut response = dispatch(req, &state).await;
    apply_common_headers(&mut response, &state);

    if state.access_log_enabled() {
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .headers()
            .get("content-length")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    if is_head {
        response = http::strip_body(response);
    }
    Ok(response)
}

async fn dispatch<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let method = req.method().clone();
    let route = Route::resolve(req.uri().path());
    let query = req.uri().query().map(ToString::to_string);

    if method == Method::OPTIONS {
        if state.config.http.enable_cors && route != Route::Unknown {
            return http::build_options_response();
        }
        return pages::serve_not_found(&state.config.templates).await;
    }

    if let Some(resp) = check_body_size(&req, state.config.http.max_body_size) {
        return resp;
    }

    let result = match (&method, route) {
        (&Method::GET | &Method::HEAD, Route::Home) => {
            return pages::serve_homepage(&state.config.templates).await;
        }
        (&Method::GET | &Method::HEAD, Route::Films) => {
            return films::list_films(state, query.as_deref()).await;
        }
        (&Method::GET | &Method::HEAD, Route::Film(id)) => films::get_film(state, id).await,
        (&Method::POST, Route::Films) => match read_body(req, state).await {
            Ok(body) => films::create_film(state, &body).await,
            Err(resp) => return resp,
        },
        (&Method::PUT, Route::Film(id)) => match read_body(req, state).await {
            Ok(body) => films::update_film(state, id, &body).await,
            Err(resp) => return resp,
        },
        (&Method::DELETE, Route::Film(id)) => films::delete_film(state, id).await,
        _ => return pages::serve_not_found(&state.config.templates).await,
    };

    result.unwrap_or_else(films::ApiError::into_response)
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_warning(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Collect the request body, enforcing the size limit on streamed bodies.
///
/// The body is always drained; it is returned only when it is JSON.
async fn read_body<B>(req: Request<B>, state: &AppState) -> Result<Bytes, Response<Full<Bytes>>>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let is_json = is_json_body(&req);
    let limit = usize::try_from(state.config.http.max_body_size).unwrap_or(usize::MAX);
    match Limited::new(req.into_body(), limit).collect().await {
        Ok(collected) if is_json => Ok(collected.to_bytes()),
        Ok(_) => Ok(Bytes::new()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            logger::log_warning(&format!("Request body exceeded {limit} bytes"));
            Err(http::build_413_response())
        }
        Err(e) => {
            logger::log_error(&format!("Failed to read request body: {e}"));
            Err(http::build_text_response(
                StatusCode::BAD_REQUEST,
                "Failed to read request body",
            ))
        }
    }
}

fn apply_common_headers(response: &mut Response<Full<Bytes>>, state: &AppState) {
    let headers = response.headers_mut();
    if let Ok(server) = HeaderValue::from_str(&state.config.http.server_name) {
        headers.insert("server", server);
    }
    if state.config.http.enable_cors {
        headers.insert("access-control-allow-origin", HeaderValue::from_static("*"));
    }
}
