//! Query-string filtering
//!
//! Every pair must equal the record's field exactly. Query values are
//! strings, so numeric, array and null fields never match.

use serde_json::Value;

use super::model::Film;

/// Field-name to expected-value pairs, in query order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilmFilter {
    pairs: Vec<(String, String)>,
}

impl FilmFilter {
    /// Decode a raw query string (`genre=Drama&director=Mary+Harron`)
    pub fn from_query(query: Option<&str>) -> Self {
        let pairs = query
            .map(|q| {
                form_urlencoded::parse(q.as_bytes())
                    .into_owned()
                    .collect()
            })
            .unwrap_or_default();
        Self { pairs }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Whether `film` satisfies every pair
    pub fn matches(&self, film: &Film) -> bool {
        self.pairs.iter().all(|(field, expected)| {
            matches!(film.field_value(field), Some(Value::String(actual)) if actual == *expected)
        })
    }

    /// Records that satisfy the filter, in store order
    pub fn apply<'a>(&self, films: &'a [Film]) -> Vec<&'a Film> {
        films.iter().filter(|film| self.matches(film)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::film::model::seed_films;

    fn ids(filter: &FilmFilter) -> Vec<u64> {
        filter.apply(&seed_films()).iter().map(|f| f.id).collect()
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        assert!(FilmFilter::from_query(None).is_empty());
        assert!(FilmFilter::from_query(Some("")).is_empty());
        assert_eq!(ids(&FilmFilter::from_query(None)), vec![1, 2, 3]);
    }

    #[test]
    fn test_filter_by_genre() {
        assert_eq!(ids(&FilmFilter::from_query(Some("genre=Drama"))), vec![1, 2]);
        assert_eq!(ids(&FilmFilter::from_query(Some("genre=drama"))), Vec::<u64>::new());
    }

    #[test]
    fn test_all_pairs_must_match() {
        let filter = FilmFilter::from_query(Some("genre=Drama&director=Mary+Harron"));
        assert_eq!(ids(&filter), vec![2]);
        let filter = FilmFilter::from_query(Some("genre=Drama&director=Bruce%20David%20Klein"));
        assert!(ids(&filter).is_empty());
    }

    #[test]
    fn test_unknown_field_matches_nothing() {
        assert!(ids(&FilmFilter::from_query(Some("studio=Warner"))).is_empty());
    }

    #[test]
    fn test_numeric_fields_are_type_sensitive() {
        assert!(ids(&FilmFilter::from_query(Some("release_date=2010"))).is_empty());
        assert!(ids(&FilmFilter::from_query(Some("id=1"))).is_empty());
        assert!(ids(&FilmFilter::from_query(Some("budget=null"))).is_empty());
    }

    #[test]
    fn test_conflicting_repeated_key() {
        let filter = FilmFilter::from_query(Some("genre=Drama&genre=Documentary"));
        assert!(ids(&filter).is_empty());
    }

    #[test]
    fn test_result_is_subset_satisfying_constraints() {
        let films = seed_films();
        for query in ["genre=Drama", "title=American+Psycho", "genre=Documentary&title=x"] {
            let filter = FilmFilter::from_query(Some(query));
            for film in filter.apply(&films) {
                assert!(films.contains(film));
                assert!(filter.matches(film));
            }
        }
    }
}
