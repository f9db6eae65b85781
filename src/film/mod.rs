//! Film domain module
//!
//! Record type, validation schema, query filtering and the in-memory store.

pub mod filter;
pub mod model;
pub mod schema;
pub mod store;

pub use filter::FilmFilter;
pub use schema::{validate_body, ValidationError, ValidationMode};
pub use store::FilmStore;
