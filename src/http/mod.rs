//! HTTP protocol layer module
//!
//! Response builders shared by all routes, decoupled from the relay logic.

pub mod response;

// Re-export commonly used types
pub use response::{
    build_404_response, build_health_response, build_redirect_response, build_text_response,
    location_value,
};
