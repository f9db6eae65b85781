//! In-memory film store

use super::filter::FilmFilter;
use super::model::{seed_films, Film};
use super::schema::FilmPayload;

/// Ordered collection of films plus the id counter.
///
/// Ids come from `next_id`, which only ever grows, so a deleted id is
/// never handed out again.
#[derive(Debug, Clone)]
pub struct FilmStore {
    films: Vec<Film>,
    next_id: u64,
}

impl Default for FilmStore {
    fn default() -> Self {
        Self::from_films(Vec::new())
    }
}

impl FilmStore {
    /// Store holding the built-in seed records
    pub fn seeded() -> Self {
        Self::from_films(seed_films())
    }

    pub fn from_films(films: Vec<Film>) -> Self {
        let next_id = films.iter().map(|f| f.id).max().unwrap_or(0) + 1;
        Self { films, next_id }
    }

    pub fn all(&self) -> &[Film] {
        &self.films
    }

    pub fn len(&self) -> usize {
        self.films.len()
    }

    pub fn find_by_id(&self, id: u64) -> Option<&Film> {
        self.films.iter().find(|f| f.id == id)
    }

    pub fn filter(&self, filter: &FilmFilter) -> Vec<&Film> {
        filter.apply(&self.films)
    }

    /// Create a record from a validated payload and append it
    pub fn append(&mut self, payload: FilmPayload) -> Film {
        let film = Film {
            id: self.next_id,
            title: payload.title.unwrap_or_default(),
            genre: payload.genre,
            cast: payload.cast,
            imdb_rating: payload.imdb_rating,
            director: payload.director,
            budget: payload.budget,
            gross_worldwide: payload.gross_worldwide,
            release_date: payload.release_date,
        };
        self.next_id += 1;
        self.films.push(film.clone());
        film
    }

    /// Overwrite the fields present in `payload`; `id` is left alone
    pub fn update(&mut self, id: u64, payload: FilmPayload) -> Option<Film> {
        let film = self.films.iter_mut().find(|f| f.id == id)?;
        if let Some(title) = payload.title {
            film.title = title;
        }
        if payload.genre.is_some() {
            film.genre = payload.genre;
        }
        if payload.cast.is_some() {
            film.cast = payload.cast;
        }
        if payload.imdb_rating.is_some() {
            film.imdb_rating = payload.imdb_rating;
        }
        if payload.director.is_some() {
            film.director = payload.director;
        }
        if payload.budget.is_some() {
            film.budget = payload.budget;
        }
        if payload.gross_worldwide.is_some() {
            film.gross_worldwide = payload.gross_worldwide;
        }
        if payload.release_date.is_some() {
            film.release_date = payload.release_date;
        }
        Some(film.clone())
    }

    /// Remove the first record with `id`, returning its content
    pub fn remove(&mut self, id: u64) -> Option<Film> {
        let index = self.films.iter().position(|f| f.id == id)?;
        Some(self.films.remove(index))
    }
}
