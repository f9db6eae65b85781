//! Film payload validation
//!
//! A single static rule table describes every accepted field. Both create
//! and update run submitted bodies through [`validate`], which reports the
//! first violated rule in table order and otherwise returns a typed,
//! coerced [`FilmPayload`]. Keys outside the table are allowed and ignored.
//! Updates are partial, so required fields are only enforced on create.

use serde_json::{Map, Value};
use std::fmt;

/// Largest integer a JSON client can round-trip exactly (2^53 - 1)
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Constraint applied to one field
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    /// Non-empty string with an optional minimum length in characters
    Text { min_len: Option<usize> },
    /// Array whose items are all strings
    TextList,
    /// Number (or numeric string); `integer` rejects fractional values
    Number {
        integer: bool,
        min: Option<f64>,
        max: Option<f64>,
    },
}

/// One row of the schema table
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub required: bool,
    pub rule: Rule,
}

const INTEGER: Rule = Rule::Number {
    integer: true,
    min: None,
    max: None,
};

/// The film schema, shared by create and update
pub const FILM_SCHEMA: &[FieldRule] = &[
    FieldRule {
        name: "title",
        required: true,
        rule: Rule::Text { min_len: Some(3) },
    },
    FieldRule {
        name: "genre",
        required: false,
        rule: Rule::Text { min_len: Some(3) },
    },
    FieldRule {
        name: "cast",
        required: false,
        rule: Rule::TextList,
    },
    FieldRule {
        name: "imdb_rating",
        required: false,
        rule: Rule::Number {
            integer: true,
            min: Some(0.0),
            max: Some(10.0),
        },
    },
    FieldRule {
        name: "director",
        required: false,
        rule: Rule::Text { min_len: None },
    },
    FieldRule {
        name: "budget",
        required: false,
        rule: INTEGER,
    },
    FieldRule {
        name: "gross_worldwide",
        required: false,
        rule: INTEGER,
    },
    FieldRule {
        name: "release_date",
        required: false,
        rule: INTEGER,
    },
];

/// Whether missing required fields are an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    Create,
    Update,
}

/// First violated rule of a submitted payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for ValidationError {}

/// Validated and coerced payload; `None` means the key was not submitted
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilmPayload {
    pub title: Option<String>,
    pub genre: Option<String>,
    pub cast: Option<Vec<String>>,
    pub imdb_rating: Option<f64>,
    pub director: Option<String>,
    pub budget: Option<i64>,
    pub gross_worldwide: Option<i64>,
    pub release_date: Option<i64>,
}

/// A single field value that passed its rule
#[derive(Debug, Clone, PartialEq)]
enum Checked {
    Text(String),
    TextList(Vec<String>),
    Number(f64),
}

impl FilmPayload {
    #[allow(clippy::cast_possible_truncation)]
    fn assign(&mut self, name: &str, value: Checked) {
        match (name, value) {
            ("title", Checked::Text(s)) => self.title = Some(s),
            ("genre", Checked::Text(s)) => self.genre = Some(s),
            ("director", Checked::Text(s)) => self.director = Some(s),
            ("cast", Checked::TextList(list)) => self.cast = Some(list),
            ("imdb_rating", Checked::Number(n)) => self.imdb_rating = Some(n),
            // Integer rules bound these to the safe-integer range
            ("budget", Checked::Number(n)) => self.budget = Some(n as i64),
            ("gross_worldwide", Checked::Number(n)) => self.gross_worldwide = Some(n as i64),
            ("release_date", Checked::Number(n)) => self.release_date = Some(n as i64),
            _ => {}
        }
    }
}

/// Parse a raw request body and validate it.
///
/// An empty body counts as an empty object.
pub fn validate_body(body: &[u8], mode: ValidationMode) -> Result<FilmPayload, ValidationError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return validate(&Value::Object(Map::new()), mode);
    }
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ValidationError::new(format!("Invalid JSON body: {e}")))?;
    validate(&value, mode)
}

/// Validate a JSON value against [`FILM_SCHEMA`]
pub fn validate(value: &Value, mode: ValidationMode) -> Result<FilmPayload, ValidationError> {
    let Some(object) = value.as_object() else {
        return Err(ValidationError::new("\"value\" must be of type object"));
    };

    let mut payload = FilmPayload::default();
    for field in FILM_SCHEMA {
        match object.get(field.name) {
            Some(raw) => payload.assign(field.name, check_field(field, raw)?),
            None if field.required && mode == ValidationMode::Create => {
                return Err(ValidationError::new(format!(
                    "\"{}\" is required",
                    field.name
                )));
            }
            None => {}
        }
    }
    Ok(payload)
}

fn check_field(field: &FieldRule, raw: &Value) -> Result<Checked, ValidationError> {
    let name = field.name;
    match field.rule {
        Rule::Text { min_len } => check_text(name, raw, min_len).map(Checked::Text),
        Rule::TextList => {
            let Value::Array(items) = raw else {
                return Err(ValidationError::new(format!("\"{name}\" must be an array")));
            };
            items
                .iter()
                .enumerate()
                .map(|(i, item)| check_text(&format!("{name}[{i}]"), item, None))
                .collect::<Result<Vec<_>, _>>()
                .map(Checked::TextList)
        }
        Rule::Number { integer, min, max } => {
            check_number(name, raw, integer, min, max).map(Checked::Number)
        }
    }
}

fn check_text(name: &str, raw: &Value, min_len: Option<usize>) -> Result<String, ValidationError> {
    let Value::String(s) = raw else {
        return Err(ValidationError::new(format!("\"{name}\" must be a string")));
    };
    if s.is_empty() {
        return Err(ValidationError::new(format!(
            "\"{name}\" is not allowed to be empty"
        )));
    }
    if let Some(min) = min_len {
        if s.chars().count() < min {
            return Err(ValidationError::new(format!(
                "\"{name}\" length must be at least {min} characters long"
            )));
        }
    }
    Ok(s.clone())
}

fn check_number(
    name: &str,
    raw: &Value,
    integer: bool,
    min: Option<f64>,
    max: Option<f64>,
) -> Result<f64, ValidationError> {
    let number = match raw {
        Value::Number(n) => n.as_f64(),
        // Numeric strings are converted, matching lenient form input
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
    .ok_or_else(|| ValidationError::new(format!("\"{name}\" must be a number")))?;

    if integer {
        if number.fract() != 0.0 {
            return Err(ValidationError::new(format!(
                "\"{name}\" must be an integer"
            )));
        }
        if number.abs() > MAX_SAFE_INTEGER {
            return Err(ValidationError::new(format!(
                "\"{name}\" must be a safe number"
            )));
        }
    }
    if let Some(min) = min {
        if number < min {
            return Err(ValidationError::new(format!(
                "\"{name}\" must be greater than or equal to {min}"
            )));
        }
    }
    if let Some(max) = max {
        if number > max {
            return Err(ValidationError::new(format!(
                "\"{name}\" must be less than or equal to {max}"
            )));
        }
    }
    Ok(number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn error_of(value: &Value) -> String {
        validate(value, ValidationMode::Create).unwrap_err().message().to_string()
    }

    #[test]
    fn test_title_is_required() {
        assert_eq!(error_of(&json!({"genre": "Drama"})), "\"title\" is required");
    }

    #[test]
    fn test_title_min_length() {
        assert_eq!(
            error_of(&json!({"title": "Up"})),
            "\"title\" length must be at least 3 characters long"
        );
        assert!(validate(&json!({"title": "Jaws"}), ValidationMode::Create).is_ok());
    }

    #[test]
    fn test_non_object_body() {
        assert_eq!(error_of(&json!([1, 2])), "\"value\" must be of type object");
        assert_eq!(error_of(&json!("title")), "\"value\" must be of type object");
    }

    #[test]
    fn test_first_failure_in_schema_order() {
        // Both genre and budget are wrong; genre comes first in the table
        let err = error_of(&json!({"title": "Heat", "budget": "lots", "genre": "X"}));
        assert_eq!(err, "\"genre\" length must be at least 3 characters long");
    }

    #[test]
    fn test_cast_items_must_be_strings() {
        assert_eq!(
            error_of(&json!({"title": "Heat", "cast": ["Al Pacino", 7]})),
            "\"cast[1]\" must be a string"
        );
        assert_eq!(
            error_of(&json!({"title": "Heat", "cast": "Al Pacino"})),
            "\"cast\" must be an array"
        );
    }

    #[test]
    fn test_rating_range_and_integer() {
        assert_eq!(
            error_of(&json!({"title": "Heat", "imdb_rating": 11})),
            "\"imdb_rating\" must be less than or equal to 10"
        );
        assert_eq!(
            error_of(&json!({"title": "Heat", "imdb_rating": -1})),
            "\"imdb_rating\" must be greater than or equal to 0"
        );
        assert_eq!(
            error_of(&json!({"title": "Heat", "imdb_rating": 8.3})),
            "\"imdb_rating\" must be an integer"
        );
    }

    #[test]
    fn test_numeric_strings_are_coerced() {
        let body = json!({
            "title": "Heat",
            "imdb_rating": "8",
            "budget": "60000000",
            "release_date": 1995
        });
        let payload = validate(&body, ValidationMode::Create).unwrap();
        assert_eq!(payload.imdb_rating, Some(8.0));
        assert_eq!(payload.budget, Some(60_000_000));
        assert_eq!(payload.release_date, Some(1995));
        assert_eq!(payload.gross_worldwide, None);
    }

    #[test]
    fn test_malformed_numbers_rejected() {
        assert_eq!(
            error_of(&json!({"title": "Heat", "budget": "sixty"})),
            "\"budget\" must be a number"
        );
        assert_eq!(
            error_of(&json!({"title": "Heat", "release_date": null})),
            "\"release_date\" must be a number"
        );
        assert_eq!(
            error_of(&json!({"title": "Heat", "budget": 1e300})),
            "\"budget\" must be a safe number"
        );
    }

    #[test]
    fn test_unknown_keys_allowed() {
        let body = json!({"title": "Heat", "studio": "Warner"});
        let payload = validate(&body, ValidationMode::Create).unwrap();
        assert_eq!(payload.title.as_deref(), Some("Heat"));
    }

    #[test]
    fn test_update_mode_skips_required() {
        let payload = validate(&json!({"genre": "Comedy"}), ValidationMode::Update).unwrap();
        assert_eq!(payload.title, None);
        assert_eq!(payload.genre.as_deref(), Some("Comedy"));
        assert_eq!(
            validate(&json!({"title": "Up"}), ValidationMode::Update).unwrap_err().message(),
            "\"title\" length must be at least 3 characters long"
        );
    }

    #[test]
    fn test_empty_strings_rejected() {
        assert_eq!(
            error_of(&json!({"title": "Heat", "director": ""})),
            "\"director\" is not allowed to be empty"
        );
    }

    #[test]
    fn test_validate_body() {
        assert_eq!(
            validate_body(b"", ValidationMode::Create).unwrap_err().message(),
            "\"title\" is required"
        );
        let err = validate_body(b"{not json", ValidationMode::Create).unwrap_err();
        assert!(err.message().starts_with("Invalid JSON body"));
        assert!(validate_body(br#"{"title":"Heat"}"#, ValidationMode::Create).is_ok());
    }
}
