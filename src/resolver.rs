//! Link resolution
//!
//! Fetches a source page and pulls the first link matching an extraction
//! pattern out of its body. Each call is independent: nothing about the page
//! or the result is kept between calls.

use hyper::body::Bytes;
use regex::bytes::{Regex, RegexBuilder};
use std::time::Instant;
use url::Url;

use crate::config::UpstreamConfig;
use crate::error::ResolveError;
use crate::logger;

/// Build the outbound client shared by all resolutions
///
/// Redirects follow reqwest's default policy (up to 10 hops). The client holds
/// a connection pool only; responses are never cached.
pub fn build_client(upstream: &UpstreamConfig) -> Result<reqwest::Client, reqwest::Error> {
    let mut builder = reqwest::Client::builder().user_agent(upstream.user_agent.as_str());
    if let Some(timeout) = upstream.fetch_timeout() {
        builder = builder.timeout(timeout);
    }
    builder.build()
}

/// Resolves a document link from a fixed page and pattern
#[derive(Debug)]
pub struct LinkResolver {
    /// URL as given, used verbatim in diagnostics
    page_url: String,
    target: Url,
    pattern: Regex,
    client: reqwest::Client,
}

impl LinkResolver {
    /// Validate the page URL and compile the pattern
    ///
    /// Both are checked here so a bad value fails at startup instead of on
    /// every request.
    pub fn new(
        page_url: &str,
        pattern: &str,
        client: reqwest::Client,
    ) -> Result<Self, ResolveError> {
        let target = Url::parse(page_url).map_err(|source| ResolveError::InvalidPageUrl {
            url: page_url.to_string(),
            source,
        })?;
        // bytes mode with ASCII classes, so `.` also spans bytes that are not UTF-8
        let pattern = RegexBuilder::new(pattern).unicode(false).build()?;

        Ok(Self {
            page_url: page_url.to_string(),
            target,
            pattern,
            client,
        })
    }

    pub fn page_url(&self) -> &str {
        &self.page_url
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Fetch the page and return the first matching link, byte for byte
    pub async fn resolve(&self) -> Result<Bytes, ResolveError> {
        let started = Instant::now();
        let body = self.fetch_page().await?;
        logger::log_debug(&format!(
            "[Upstream] Fetched {} bytes from {} in {}ms",
            body.len(),
            self.page_url,
            started.elapsed().as_millis()
        ));

        self.extract_link(&body)
            .ok_or_else(|| ResolveError::NotFound {
                url: self.page_url.clone(),
            })
    }

    /// One GET, body drained fully regardless of status code
    async fn fetch_page(&self) -> Result<Bytes, ResolveError> {
        let response = self
            .client
            .get(self.target.clone())
            .send()
            .await
            .map_err(|source| ResolveError::FetchFailed {
                url: self.page_url.clone(),
                source,
            })?;

        logger::log_debug(&format!(
            "[Upstream] {} answered {}",
            response.url(),
            response.status()
        ));

        response
            .bytes()
            .await
            .map_err(|source| ResolveError::ReadFailed {
                url: self.page_url.clone(),
                source,
            })
    }

    /// Leftmost-first match over the whole body
    ///
    /// Returns capture group 1 when the pattern has one and it participated,
    /// otherwise the full match. The result shares `body`'s buffer and keeps
    /// any non-UTF-8 bytes as they were.
    pub fn extract_link(&self, body: &Bytes) -> Option<Bytes> {
        let caps = self.pattern.captures(body)?;
        caps.get(1)
            .or_else(|| caps.get(0))
            .map(|m| body.slice(m.range()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{PDF_LINK_PATTERN, SOURCE_PAGE_URL};
    use crate::test_support::{
        spawn_page_server, spawn_truncating_server, test_client, unreachable_addr,
    };
    use std::sync::Arc;

    fn resolver_for(url: &str) -> LinkResolver {
        LinkResolver::new(url, PDF_LINK_PATTERN, test_client()).unwrap()
    }

    fn source_resolver() -> LinkResolver {
        resolver_for(SOURCE_PAGE_URL)
    }

    fn extract(body: &'static [u8]) -> Option<Bytes> {
        source_resolver().extract_link(&Bytes::from_static(body))
    }

    #[test]
    fn test_extract_first_link() {
        let body = b"<html>\n<a href=\"https://cdn.example.com/outline.pdf\">Outline</a>\n\
                     <a href=\"https://cdn.example.com/other.pdf\">Other</a>\n</html>";
        assert_eq!(
            extract(body).as_deref(),
            Some(&b"https://cdn.example.com/outline.pdf"[..])
        );
    }

    #[test]
    fn test_extract_is_greedy_within_a_line() {
        // `.*` runs to the last ".pdf" on the line, as a leftmost-first greedy match does
        let body = b"https://a.example/1.pdf and https://a.example/2.pdf trailing";
        assert_eq!(
            extract(body).as_deref(),
            Some(&b"https://a.example/1.pdf and https://a.example/2.pdf"[..])
        );
    }

    #[test]
    fn test_extract_does_not_cross_newlines() {
        let body = b"https://a.example/page.html\nsee also https://b.example/doc.pdf";
        assert_eq!(
            extract(body).as_deref(),
            Some(&b"https://b.example/doc.pdf"[..])
        );
    }

    #[test]
    fn test_extract_requires_literal_dot() {
        let body = b"https://a.example/notapdf";
        assert_eq!(extract(body), None);
    }

    #[test]
    fn test_extract_no_match() {
        assert_eq!(
            extract(b"<html>http://insecure.example/x.pdf</html>"),
            None
        );
        assert_eq!(extract(b""), None);
    }

    #[test]
    fn test_extract_tolerates_invalid_utf8() {
        let body = b"\xff\xfe https://a.example/doc.pdf";
        assert_eq!(
            extract(body).as_deref(),
            Some(&b"https://a.example/doc.pdf"[..])
        );
    }

    #[test]
    fn test_extract_keeps_non_utf8_bytes_in_match() {
        let body = b"see https://a.example/\xe9t\xe9.pdf now";
        assert_eq!(
            extract(body).as_deref(),
            Some(&b"https://a.example/\xe9t\xe9.pdf"[..])
        );
    }

    #[test]
    fn test_extract_prefers_first_capture_group() {
        let resolver = LinkResolver::new(
            SOURCE_PAGE_URL,
            r#"href="(https://[^"]+\.pdf)""#,
            test_client(),
        )
        .unwrap();
        let body = br#"<a href="https://a.example/doc.pdf">doc</a>"#;
        assert_eq!(
            resolver.extract_link(&Bytes::from_static(body)).as_deref(),
            Some(&b"https://a.example/doc.pdf"[..])
        );
    }

    #[test]
    fn test_new_rejects_bad_pattern() {
        let err = LinkResolver::new(SOURCE_PAGE_URL, "https://(.*\\.pdf", test_client())
            .unwrap_err();
        assert!(matches!(err, ResolveError::PatternCompileFailed(_)));
    }

    #[test]
    fn test_new_rejects_relative_url() {
        let err = LinkResolver::new("/live", PDF_LINK_PATTERN, test_client()).unwrap_err();
        assert!(matches!(err, ResolveError::InvalidPageUrl { .. }));
    }

    #[test]
    fn test_accessors() {
        let resolver = source_resolver();
        assert_eq!(resolver.page_url(), "https://graceambassadors.com/live");
        assert_eq!(resolver.pattern(), r"https://.*\.pdf");
    }

    #[test]
    fn test_build_client_with_and_without_timeout() {
        let mut upstream = UpstreamConfig::default();
        assert!(build_client(&upstream).is_ok());
        upstream.fetch_timeout = 0;
        assert!(build_client(&upstream).is_ok());
    }

    #[tokio::test]
    async fn test_resolve_returns_match() {
        let addr = spawn_page_server("<p>Outline: https://files.example/outline-2024.pdf</p>").await;
        let resolver = resolver_for(&format!("http://{addr}/live"));
        assert_eq!(
            resolver.resolve().await.unwrap(),
            "https://files.example/outline-2024.pdf"
        );
    }

    #[tokio::test]
    async fn test_resolve_not_found() {
        let addr = spawn_page_server("<p>No outline posted this week.</p>").await;
        let url = format!("http://{addr}/live");
        let err = resolver_for(&url).resolve().await.unwrap_err();
        assert!(matches!(err, ResolveError::NotFound { .. }));
        assert_eq!(err.to_string(), format!("could not find pdf file from {url}"));
    }

    #[tokio::test]
    async fn test_resolve_unreachable() {
        let url = format!("http://{}/live", unreachable_addr());
        let err = resolver_for(&url).resolve().await.unwrap_err();
        assert!(matches!(err, ResolveError::FetchFailed { .. }));
        assert_eq!(err.to_string(), format!("failed to get page from {url}"));
    }

    #[tokio::test]
    async fn test_resolve_truncated_body() {
        let addr = spawn_truncating_server().await;
        let url = format!("http://{addr}/live");
        let err = resolver_for(&url).resolve().await.unwrap_err();
        assert!(matches!(err, ResolveError::ReadFailed { .. }));
        assert_eq!(err.to_string(), format!("Failed to read body from {url}"));
    }

    #[tokio::test]
    async fn test_concurrent_resolutions_are_independent() {
        let a = spawn_page_server("https://a.example/a.pdf").await;
        let b = spawn_page_server("https://b.example/b.pdf").await;
        let resolver_a = Arc::new(resolver_for(&format!("http://{a}/")));
        let resolver_b = Arc::new(resolver_for(&format!("http://{b}/")));

        let mut tasks = Vec::new();
        for i in 0..16 {
            let (resolver, expected) = if i % 2 == 0 {
                (Arc::clone(&resolver_a), "https://a.example/a.pdf")
            } else {
                (Arc::clone(&resolver_b), "https://b.example/b.pdf")
            };
            tasks.push(tokio::spawn(async move {
                (resolver.resolve().await.unwrap(), expected)
            }));
        }

        for task in tasks {
            let (got, expected) = task.await.unwrap();
            assert_eq!(got, expected);
        }
    }
}
