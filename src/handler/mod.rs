//! Request handler module
//!
//! Responsible for request routing dispatch and the relay route itself.

pub mod relay;
pub mod router;

// Re-export main entry point
pub use relay::{PDF_LINK_PATTERN, SOURCE_PAGE_URL};
pub use router::{build_router, handle_request, Router};
