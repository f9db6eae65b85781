//! HTTP protocol layer module
//!
//! Response builders shared by the film handlers and page serving.

pub mod response;

// Re-export commonly used builders
pub use response::{
    build_413_response, build_html_response, build_json_response, build_options_response,
    build_text_response, strip_body,
};
