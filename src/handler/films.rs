//! Film CRUD handlers
//!
//! Each handler takes the shared state and already-extracted request parts
//! and returns either a JSON response or an [`ApiError`].

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use std::fmt;

use crate::config::AppState;
use crate::film::{validate_body, FilmFilter, ValidationError, ValidationMode};
use crate::http;
use crate::logger;

pub const FILM_NOT_FOUND: &str = "Sorry, such film was not found";
pub const DELETE_NOT_FOUND: &str = "The film with the given id was not found";

/// Request-terminating errors of the film API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Lookup or update of an id that is not in the store
    FilmNotFound,
    /// Delete of an id that is not in the store
    DeleteTargetNotFound,
    /// Submitted payload broke a schema rule
    Validation(ValidationError),
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::FilmNotFound | Self::DeleteTargetNotFound => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn into_response(self) -> Response<Full<Bytes>> {
        http::build_text_response(self.status(), &self.to_string())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FilmNotFound => f.write_str(FILM_NOT_FOUND),
            Self::DeleteTargetNotFound => f.write_str(DELETE_NOT_FOUND),
            Self::Validation(e) => write!(f, "{e}"),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

type HandlerResult = Result<Response<Full<Bytes>>, ApiError>;

/// GET /api/films
pub async fn list_films(state: &AppState, query: Option<&str>) -> Response<Full<Bytes>> {
    let filter = FilmFilter::from_query(query);
    let store = state.store.read().await;
    if filter.is_empty() {
        http::build_json_response(StatusCode::OK, store.all())
    } else {
        http::build_json_response(StatusCode::OK, &store.filter(&filter))
    }
}

/// GET /api/films/:id
pub async fn get_film(state: &AppState, id: Option<u64>) -> HandlerResult {
    let store = state.store.read().await;
    let film = id
        .and_then(|id| store.find_by_id(id))
        .ok_or(ApiError::FilmNotFound)?;
    Ok(http::build_json_response(StatusCode::OK, film))
}

/// POST /api/films
pub async fn create_film(state: &AppState, body: &[u8]) -> HandlerResult {
    let payload = validate_body(body, ValidationMode::Create)?;
    let film = state.store.write().await.append(payload);
    logger::log_film_change("created", film.id, &film.title);
    Ok(http::build_json_response(StatusCode::OK, &film))
}

/// PUT /api/films/:id
///
/// Only submitted fields change. A missing id wins over an invalid body.
pub async fn update_film(state: &AppState, id: Option<u64>, body: &[u8]) -> HandlerResult {
    let mut store = state.store.write().await;
    let id = id
        .filter(|id| store.find_by_id(*id).is_some())
        .ok_or(ApiError::FilmNotFound)?;
    let payload = validate_body(body, ValidationMode::Update)?;
    let film = store.update(id, payload).ok_or(ApiError::FilmNotFound)?;
    drop(store);
    logger::log_film_change("updated", film.id, &film.title);
    Ok(http::build_json_response(StatusCode::OK, &film))
}

/// DELETE /api/films/:id
pub async fn delete_film(state: &AppState, id: Option<u64>) -> HandlerResult {
    let film = {
        let mut store = state.store.write().await;
        id.and_then(|id| store.remove(id))
            .ok_or(ApiError::DeleteTargetNotFound)?
    };
    logger::log_film_change("deleted", film.id, &film.title);
    Ok(http::build_json_response(StatusCode::OK, &film))
}
