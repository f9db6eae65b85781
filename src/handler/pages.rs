//! HTML page serving
//!
//! The homepage and the 404 document are read from the templates directory
//! on each request; built-in documents stand in when a file is missing.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use tokio::fs;

use crate::config::TemplatesConfig;
use crate::http;
use crate::logger;

const DEFAULT_HOMEPAGE: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Films API</title></head>
<body>
<h1>Films API</h1>
<ul>
<li>GET /api/films[?field=value]</li>
<li>GET /api/films/:id</li>
<li>POST /api/films</li>
<li>PUT /api/films/:id</li>
<li>DELETE /api/films/:id</li>
</ul>
</body>
</html>"#;

const DEFAULT_NOT_FOUND: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>404 Not Found</title></head>
<body><h1>404</h1><p>The page you are looking for does not exist.</p></body>
</html>"#;

/// Serve the homepage document with 200
pub async fn serve_homepage(templates: &TemplatesConfig) -> Response<Full<Bytes>> {
    let page = load_page(&templates.homepage, DEFAULT_HOMEPAGE).await;
    http::build_html_response(StatusCode::OK, page)
}

/// Serve the error document with 404
pub async fn serve_not_found(templates: &TemplatesConfig) -> Response<Full<Bytes>> {
    let page = load_page(&templates.not_found, DEFAULT_NOT_FOUND).await;
    http::build_html_response(StatusCode::NOT_FOUND, page)
}

async fn load_page(path: &str, fallback: &'static str) -> Bytes {
    match fs::read(path).await {
        Ok(content) => Bytes::from(content),
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                logger::log_warning(&format!("Failed to read template '{path}': {e}"));
            }
            Bytes::from_static(fallback.as_bytes())
        }
    }
}
