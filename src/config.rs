use crate::context::Context;
use crate::cookies::SameSite;
use crate::error::{Error, RouteError};
use crate::handler::{ErrorHandler, Handler, HandlerFuture};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

/// Default request body limit: 4 MiB.
pub const DEFAULT_BODY_LIMIT: usize = 4 * 1024 * 1024;

/// Default listen address.
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";

/// Engine configuration. All fields have defaults, so partial construction
/// with struct-update syntax is the usual way to build one:
///
/// ```
/// use tern::Config;
///
/// let config = Config {
///     addr: "127.0.0.1:3000".to_string(),
///     strict_routing: true,
///     ..Config::default()
/// };
/// assert_eq!(config.body_limit, tern::config::DEFAULT_BODY_LIMIT);
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The `ip:port` the engine listens on.
    pub addr: String,
    /// When `true`, a match requires the request path and the registered
    /// pattern to agree on a trailing slash, so `/foo` and `/foo/` are
    /// different routes. Default `false`: the two are interchangeable.
    pub strict_routing: bool,
    /// Maximum request body size in bytes; larger bodies are rejected
    /// before any handler runs.
    pub body_limit: usize,
    /// Rejects any non-GET request with `405 Method Not Allowed`.
    pub get_only: bool,
    /// Logs each route registration at debug level.
    pub debug: bool,
    /// Default `SameSite` attribute for cookies that do not set their own.
    pub cookie_same_site: SameSite,
    /// Invoked when a handler chain returns an error. Defaults to a plain
    /// text response with the status recovered from [`Error`], or 500.
    #[serde(skip)]
    pub error_handler: Option<Arc<dyn ErrorHandler>>,
    /// Invoked when no route matches. Defaults to a `404 not found` text
    /// response.
    #[serde(skip)]
    pub not_found_handler: Option<Arc<dyn Handler>>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            addr: DEFAULT_LISTEN_ADDR.to_string(),
            strict_routing: false,
            body_limit: DEFAULT_BODY_LIMIT,
            get_only: false,
            debug: true,
            cookie_same_site: SameSite::default(),
            error_handler: None,
            not_found_handler: None,
        }
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("strict_routing", &self.strict_routing)
            .field("body_limit", &self.body_limit)
            .field("get_only", &self.get_only)
            .field("debug", &self.debug)
            .field("cookie_same_site", &self.cookie_same_site)
            .field("error_handler", &self.error_handler.as_ref().map(|_| ".."))
            .field(
                "not_found_handler",
                &self.not_found_handler.as_ref().map(|_| ".."),
            )
            .finish()
    }
}

/// Answers with the status carried by a downcast [`Error`], or 500, and
/// the error message as plain text.
pub(crate) fn default_error_handler<'a>(
    cx: &'a mut Context,
    err: RouteError,
) -> HandlerFuture<'a> {
    Box::pin(async move {
        let status = err
            .downcast_ref::<Error>()
            .map(Error::status)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        cx.status(status).text(err.to_string())
    })
}

pub(crate) fn default_not_found_handler(cx: &mut Context) -> HandlerFuture<'_> {
    Box::pin(async move { cx.status(StatusCode::NOT_FOUND).text("404 not found") })
}
