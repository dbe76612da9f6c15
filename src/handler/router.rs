//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: exact-path lookup in an explicit
//! route table built at startup, dispatch, and access logging.

use crate::config::AppState;
use crate::handler::relay;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::resolver::LinkResolver;
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderName, LOCATION, REFERER, USER_AGENT};
use hyper::{Request, Response, Version};
use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// What a registered path does
pub enum RouteHandler {
    /// Resolve a link upstream and redirect to it
    DocumentRedirect(Arc<LinkResolver>),
    /// Fixed 200 plain-text body
    Text(&'static str),
    /// Liveness probe
    Health,
}

impl fmt::Display for RouteHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DocumentRedirect(resolver) => write!(
                f,
                "redirect to first /{}/ on {}",
                resolver.pattern(),
                resolver.page_url()
            ),
            Self::Text(body) => write!(f, "text {body:?}"),
            Self::Health => f.write_str("health check"),
        }
    }
}

/// Exact-match route table
///
/// Paths are compared as-is: no prefix matching, no trailing-slash folding.
#[derive(Default)]
pub struct Router {
    routes: HashMap<&'static str, RouteHandler>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `path`, replacing any previous handler
    #[must_use]
    pub fn route(mut self, path: &'static str, handler: RouteHandler) -> Self {
        self.routes.insert(path, handler);
        self
    }

    pub fn lookup(&self, path: &str) -> Option<&RouteHandler> {
        self.routes.get(path)
    }

    /// Registered paths in sorted order
    pub fn paths(&self) -> Vec<&'static str> {
        let mut paths: Vec<_> = self.routes.keys().copied().collect();
        paths.sort_unstable();
        paths
    }

    /// Log every registered route
    pub fn log_routes(&self) {
        for path in self.paths() {
            if let Some(handler) = self.lookup(path) {
                logger::log_route_registered(path, &handler.to_string());
            }
        }
    }

    /// Produce the response for `path`; unknown paths get a 404
    pub async fn dispatch(&self, path: &str) -> Response<Full<Bytes>> {
        match self.lookup(path) {
            Some(RouteHandler::DocumentRedirect(resolver)) => {
                relay::serve_document_redirect(resolver).await
            }
            Some(RouteHandler::Text(body)) => http::build_text_response(*body),
            Some(RouteHandler::Health) => http::build_health_response("ok"),
            None => http::build_404_response(),
        }
    }
}

/// The relay's full route table
pub fn build_router(resolver: Arc<LinkResolver>) -> Router {
    Router::new()
        .route("/gabf_outline", RouteHandler::DocumentRedirect(resolver))
        .route("/placeholder", RouteHandler::Text("placeholder"))
        .route("/healthz", RouteHandler::Health)
}

/// Main entry point for HTTP request handling
///
/// Every method is accepted; the relay routes ignore method, query and body.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    // owned, so the request is not borrowed across the upstream fetch
    let path = req.uri().path().to_owned();
    let response = state.router.dispatch(&path).await;

    let logging = &state.config.logging;
    if logging.access_log {
        let entry = build_access_entry(&req, &response, peer_addr, started);
        logger::log_access(&entry, &logging.access_log_format);
    }

    Ok(response)
}

fn build_access_entry<B>(
    req: &Request<B>,
    response: &Response<Full<Bytes>>,
    peer_addr: SocketAddr,
    started: Instant,
) -> AccessLogEntry {
    let header = |name: HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = format_http_version(req.version());
    entry.status = response.status().as_u16();
    entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
    entry.referer = header(REFERER);
    entry.user_agent = header(USER_AGENT);
    entry.location = response
        .headers()
        .get(LOCATION)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());
    entry.request_time = started.elapsed();
    entry
}

fn format_http_version(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
