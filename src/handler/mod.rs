//! Request handler module
//!
//! Responsible for request routing dispatch and the film API business logic,
//! plus the HTML pages served outside the API.

pub mod films;
pub mod pages;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
