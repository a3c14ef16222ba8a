//! HTTP layer modules
//!
//! Path decoding, MIME detection, response building, and cache-busting
//! header injection.

pub mod mime;
pub mod no_cache;
pub mod path;
pub mod response;

pub use response::{
    build_400_response, build_404_response, build_405_response, build_500_response,
    build_file_response, build_html_response, build_options_response, build_redirect_response,
};
