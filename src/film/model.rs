//! Film record type and seed data

use serde::Serialize;
use serde_json::Value;

/// One film/show entry in the store.
///
/// Optional fields serialize as `null` when absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Film {
    pub id: u64,
    pub title: String,
    pub genre: Option<String>,
    pub cast: Option<Vec<String>>,
    pub imdb_rating: Option<f64>,
    pub director: Option<String>,
    pub budget: Option<i64>,
    pub gross_worldwide: Option<i64>,
    pub release_date: Option<i64>,
}

impl Film {
    /// Look up a field by its JSON name.
    ///
    /// Returns `None` for names that are not part of the record.
    pub fn field_value(&self, name: &str) -> Option<Value> {
        let value = match name {
            "id" => Value::from(self.id),
            "title" => Value::from(self.title.as_str()),
            "genre" => self.genre.as_deref().map_or(Value::Null, Value::from),
            "cast" => self.cast.clone().map_or(Value::Null, Value::from),
            "imdb_rating" => self.imdb_rating.map_or(Value::Null, Value::from),
            "director" => self.director.as_deref().map_or(Value::Null, Value::from),
            "budget" => self.budget.map_or(Value::Null, Value::from),
            "gross_worldwide" => self.gross_worldwide.map_or(Value::Null, Value::from),
            "release_date" => self.release_date.map_or(Value::Null, Value::from),
            _ => return None,
        };
        Some(value)
    }
}

/// Records loaded into a fresh store
pub fn seed_films() -> Vec<Film> {
    vec![
        Film {
            id: 1,
            title: "The Social Network".to_string(),
            genre: Some("Drama".to_string()),
            cast: Some(names(&["Jesse Eisenberg", "Justin Timberlake", "Andrew Garfield"])),
            imdb_rating: Some(7.8),
            director: Some("David Fincher".to_string()),
            budget: Some(40_000_000),
            gross_worldwide: Some(224_920_375),
            release_date: Some(2010),
        },
        Film {
            id: 2,
            title: "American Psycho".to_string(),
            genre: Some("Drama".to_string()),
            cast: Some(names(&[
                "Christian Bale",
                "Jared Leto",
                "Matt Ross",
                "Willem Dafoe",
            ])),
            imdb_rating: Some(7.6),
            director: Some("Mary Harron".to_string()),
            budget: Some(7_000_000),
            gross_worldwide: Some(34_266_564),
            release_date: Some(2000),
        },
        Film {
            id: 3,
            title: "Icahn: The Restless Billionaire".to_string(),
            genre: Some("Documentary".to_string()),
            cast: Some(names(&["Carl Icahn"])),
            imdb_rating: Some(7.0),
            director: Some("Bruce David Klein".to_string()),
            budget: None,
            gross_worldwide: None,
            release_date: Some(2022),
        },
    ]
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_fields_serialize_as_null() {
        let film = Film {
            id: 9,
            title: "Up!".to_string(),
            genre: None,
            cast: None,
            imdb_rating: None,
            director: None,
            budget: None,
            gross_worldwide: None,
            release_date: None,
        };
        let json = serde_json::to_value(&film).unwrap();
        assert_eq!(json["id"], 9);
        assert_eq!(json["title"], "Up!");
        assert!(json["genre"].is_null());
        assert!(json["budget"].is_null());
        assert_eq!(json.as_object().unwrap().len(), 9);
    }

    #[test]
    fn test_field_value() {
        let film = &seed_films()[0];
        assert_eq!(film.field_value("genre"), Some(Value::from("Drama")));
        assert_eq!(film.field_value("release_date"), Some(Value::from(2010)));
        assert_eq!(film.field_value("rating"), None);
        assert_eq!(seed_films()[2].field_value("budget"), Some(Value::Null));
    }

    #[test]
    fn test_seed_ids_are_sequential() {
        let ids: Vec<u64> = seed_films().iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
