//! The engine: owns the configuration, the route table, the group list and
//! the context pool, and dispatches requests through the handler chain.

use crate::config::{self, Config};
use crate::error::{Error, RouteError};
use crate::group::{Group, RouterGroup};
use crate::handler::{BoxHandler, ErrorHandler, Handler};
use crate::pool::ContextPool;
use crate::router::Router;
use crate::service::EngineService;
use bytes::Bytes;
use http::{Method, Request, Response, StatusCode};
use http_body_util::{BodyExt, Full, Limited};
use hyper::body::Body;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder;
use percent_encoding::percent_decode_str;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// The top-level framework value. Routes, groups and middleware are
/// registered during a setup phase that requires `&mut Engine`; serving
/// consumes the engine into an `Arc`, so registration after serving starts
/// is ruled out by construction and matching runs lock-free.
///
/// ```no_run
/// use tern::{Config, Context, Engine, HandlerFuture};
///
/// fn home(cx: &mut Context) -> HandlerFuture<'_> {
///     Box::pin(async move { cx.text("Home page") })
/// }
///
/// fn user(cx: &mut Context) -> HandlerFuture<'_> {
///     Box::pin(async move {
///         let id = cx.param_or("id", "unknown").to_string();
///         cx.text(format!("Hello {id}"))
///     })
/// }
///
/// #[tokio::main]
/// async fn main() -> tern::Result<()> {
///     let mut app = Engine::new(Config {
///         addr: "127.0.0.1:3000".to_string(),
///         ..Config::default()
///     });
///     app.get("/", home)?;
///     app.get("/users/:id", user)?;
///     app.listen().await
/// }
/// ```
pub struct Engine {
    config: Config,
    router: Router,
    pub(crate) groups: Vec<Group>,
    pool: ContextPool,
    error_handler: Arc<dyn ErrorHandler>,
    not_found_handler: BoxHandler,
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new(Config::default())
    }
}

impl Engine {
    pub fn new(config: Config) -> Self {
        let error_handler = config
            .error_handler
            .clone()
            .unwrap_or_else(|| Arc::new(config::default_error_handler));
        let not_found_handler = config
            .not_found_handler
            .clone()
            .unwrap_or_else(|| Arc::new(config::default_not_found_handler));
        Engine {
            router: Router::new(config.strict_routing),
            groups: vec![Group::root()],
            pool: ContextPool::new(),
            error_handler,
            not_found_handler,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Creates a top-level route group under `prefix`.
    pub fn group(&mut self, prefix: &str) -> RouterGroup<'_> {
        let index = self.push_group(prefix.to_string());
        RouterGroup::new(self, index)
    }

    /// Appends engine-wide middleware, which applies to every request.
    pub fn middleware<H: Handler>(&mut self, handler: H) -> &mut Self {
        self.groups[0].middlewares.push(Arc::new(handler));
        self
    }

    /// Registers `handler` for `method` at `pattern`. Registering the same
    /// `(method, pattern)` twice replaces the handler; the last
    /// registration wins.
    pub fn route<H: Handler>(
        &mut self,
        method: Method,
        pattern: &str,
        handler: H,
    ) -> crate::Result<&mut Self> {
        self.add_route_arc(method, pattern, Arc::new(handler))?;
        Ok(self)
    }

    pub fn get<H: Handler>(&mut self, pattern: &str, handler: H) -> crate::Result<&mut Self> {
        self.route(Method::GET, pattern, handler)
    }

    pub fn post<H: Handler>(&mut self, pattern: &str, handler: H) -> crate::Result<&mut Self> {
        self.route(Method::POST, pattern, handler)
    }

    pub fn put<H: Handler>(&mut self, pattern: &str, handler: H) -> crate::Result<&mut Self> {
        self.route(Method::PUT, pattern, handler)
    }

    pub fn patch<H: Handler>(&mut self, pattern: &str, handler: H) -> crate::Result<&mut Self> {
        self.route(Method::PATCH, pattern, handler)
    }

    pub fn delete<H: Handler>(&mut self, pattern: &str, handler: H) -> crate::Result<&mut Self> {
        self.route(Method::DELETE, pattern, handler)
    }

    pub fn head<H: Handler>(&mut self, pattern: &str, handler: H) -> crate::Result<&mut Self> {
        self.route(Method::HEAD, pattern, handler)
    }

    pub fn options<H: Handler>(&mut self, pattern: &str, handler: H) -> crate::Result<&mut Self> {
        self.route(Method::OPTIONS, pattern, handler)
    }

    pub(crate) fn push_group(&mut self, prefix: String) -> usize {
        self.groups.push(Group::new(prefix));
        self.groups.len() - 1
    }

    pub(crate) fn add_route_arc(
        &mut self,
        method: Method,
        pattern: &str,
        handler: BoxHandler,
    ) -> crate::Result<()> {
        if self.config.debug {
            tracing::debug!(method = %method, pattern = %pattern, "route registered");
        }
        self.router.add_route_arc(method, pattern, handler)
    }

    /// Runs one request through matching and the handler chain and builds
    /// its response.
    ///
    /// This is also the seam tests drive directly, without a socket. The
    /// returned `Err` is the abandoned-request case: the handler chain
    /// failed *and* the error handler failed too.
    pub async fn dispatch<B>(
        &self,
        req: Request<B>,
        remote_addr: Option<SocketAddr>,
    ) -> crate::Result<Response<Full<Bytes>>>
    where
        B: Body + Send,
        B::Data: Send,
        B::Error: Into<RouteError>,
    {
        if self.config.get_only && req.method() != Method::GET {
            let mut response = Response::new(Full::new(Bytes::from_static(b"405 method not allowed")));
            *response.status_mut() = StatusCode::METHOD_NOT_ALLOWED;
            return Ok(response);
        }

        let (parts, body) = req.into_parts();

        let path = percent_decode_str(parts.uri.path())
            .decode_utf8()
            .map_err(|e| {
                Error::with_status(
                    StatusCode::BAD_REQUEST,
                    format!("malformed request path: {e}"),
                )
            })?
            .into_owned();

        let body = match Limited::new(body, self.config.body_limit).collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                let mut response = Response::new(Full::new(Bytes::from(format!(
                    "failed to read request body: {e}"
                ))));
                *response.status_mut() = StatusCode::PAYLOAD_TOO_LARGE;
                return Ok(response);
            }
        };

        // Middleware of every group whose prefix is a textual prefix of
        // the request path, in group-creation order.
        let mut handler_chain: Vec<BoxHandler> = Vec::new();
        for group in &self.groups {
            if path.starts_with(group.prefix.as_str()) {
                handler_chain.extend(group.middlewares.iter().cloned());
            }
        }

        let matched = self.router.lookup(&parts.method, &path);

        let mut cx = self.pool.acquire();
        cx.reset(
            parts.method,
            parts.uri,
            parts.version,
            path,
            parts.headers,
            body,
            remote_addr,
            self.config.cookie_same_site,
        );

        match matched {
            Some(found) => {
                cx.set_matched_pattern(found.pattern);
                cx.set_params(found.params);
                handler_chain.push(found.handler);
            }
            None => handler_chain.push(Arc::clone(&self.not_found_handler)),
        }
        cx.set_chain(handler_chain);

        if let Err(err) = cx.next().await {
            if let Err(err) = self.error_handler.call(&mut cx, err).await {
                tracing::error!(error = %err, "error handler failed, abandoning response");
                self.pool.release(cx);
                return Err(err);
            }
        }

        let response = cx.take_response();
        self.pool.release(cx);
        Ok(response)
    }

    /// Binds the configured address and serves until the process exits.
    pub async fn listen(self) -> crate::Result<()> {
        let addr: SocketAddr = self.config.addr.parse().map_err(|e| {
            Error::new(format!("invalid listen address {:?}: {}", self.config.addr, e))
        })?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| Error::new(format!("failed to bind {addr}: {e}")))?;
        tracing::info!(%addr, routes = self.router.len(), "listening");

        let service = Arc::new(EngineService::new(self));
        loop {
            let (stream, _) = match listener.accept().await {
                Ok(conn) => conn,
                Err(e) => {
                    tracing::error!(error = %e, "failed to accept connection");
                    continue;
                }
            };
            let service = Arc::clone(&service);

            tokio::spawn(async move {
                let remote_addr = stream
                    .peer_addr()
                    .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], 0)));
                let request_service = service.request_service(remote_addr);

                let io = TokioIo::new(stream);
                let builder = Builder::new(TokioExecutor::new());
                if let Err(err) = builder.serve_connection(io, request_service).await {
                    tracing::error!(error = %err, "error serving connection");
                }
            });
        }
    }
}
