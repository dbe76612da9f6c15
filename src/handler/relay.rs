//! Document relay route
//!
//! Resolves the outline link on every request and redirects to it. Failures
//! are reported as plain text with status 200; callers tell success from
//! failure by the redirect, not by the status code.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::time::Instant;

use crate::http;
use crate::logger;
use crate::resolver::LinkResolver;

/// Page scraped for the outline link
pub const SOURCE_PAGE_URL: &str = "https://graceambassadors.com/live";

/// First absolute https link ending in `.pdf`
pub const PDF_LINK_PATTERN: &str = r"https://.*\.pdf";

/// Resolve and answer with a 301, or with the diagnostic text on failure
pub async fn serve_document_redirect(resolver: &LinkResolver) -> Response<Full<Bytes>> {
    let started = Instant::now();
    match resolver.resolve().await {
        Ok(link) => {
            let shown = String::from_utf8_lossy(&link);
            logger::log_upstream_resolved(resolver.page_url(), &shown, started.elapsed());
            let location = http::location_value(&link);
            if location.as_bytes() != &link[..] {
                logger::log_warning(&format!(
                    "[Upstream] Control bytes in {shown:?} replaced with spaces in Location"
                ));
            }
            http::build_redirect_response(&location)
        }
        Err(err) => {
            logger::log_upstream_failed(&err, started.elapsed());
            http::build_text_response(err.to_string())
        }
    }
}
