//! HTTP response building module
//!
//! Builders for every response the relay sends. None of them panic: a builder
//! failure is logged and replaced by a bare response.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, CONTENT_TYPE, LOCATION};
use hyper::{Response, StatusCode};

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const TEXT_HTML: &str = "text/html; charset=utf-8";

/// Build a 200 plain-text response
pub fn build_text_response(body: impl Into<Bytes>) -> Response<Full<Bytes>> {
    let body = body.into();
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, TEXT_PLAIN)
        .body(Full::new(body.clone()))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(body))
        })
}

/// `Location` value for a raw link
///
/// Bytes a header value cannot carry (CR, LF and other control bytes) become
/// spaces. Everything else, non-UTF-8 bytes included, is kept as given.
pub fn location_value(target: &[u8]) -> HeaderValue {
    if let Ok(value) = HeaderValue::from_bytes(target) {
        return value;
    }
    let cleaned: Vec<u8> = target
        .iter()
        .map(|&b| if is_header_value_byte(b) { b } else { b' ' })
        .collect();
    HeaderValue::from_bytes(&cleaned).unwrap_or_else(|_| HeaderValue::from_static(""))
}

const fn is_header_value_byte(b: u8) -> bool {
    b == b'\t' || (b >= 0x20 && b != 0x7f)
}

/// Build a redirect to `location` with the given 3xx status
///
/// The small HTML body mirrors what browsers expect from a permanent redirect.
pub fn build_redirect_response_with_code(
    location: &HeaderValue,
    status: StatusCode,
) -> Response<Full<Bytes>> {
    let body = Bytes::from(format!(
        "<a href=\"{}\">{}</a>.\n",
        escape_html(&String::from_utf8_lossy(location.as_bytes())),
        status.canonical_reason().unwrap_or("Redirect")
    ));

    Response::builder()
        .status(status)
        .header(LOCATION, location.clone())
        .header(CONTENT_TYPE, TEXT_HTML)
        .body(Full::new(body.clone()))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(body))
        })
}

/// Build 301 Moved Permanently response
pub fn build_redirect_response(location: &HeaderValue) -> Response<Full<Bytes>> {
    build_redirect_response_with_code(location, StatusCode::MOVED_PERMANENTLY)
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header(CONTENT_TYPE, TEXT_PLAIN)
        .header("X-Content-Type-Options", "nosniff")
        .body(Full::new(Bytes::from_static(b"404 page not found")))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(Full::new(Bytes::from_static(b"404 page not found")))
        })
}

/// Build health check response
pub fn build_health_response(status: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, TEXT_PLAIN)
        .header("Cache-Control", "no-cache, no-store")
        .body(Full::new(Bytes::from_static(status.as_bytes())))
        .unwrap_or_else(|e| {
            log_build_error("health", &e);
            Response::new(Full::new(Bytes::from_static(status.as_bytes())))
        })
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
