//! `tern` is a lightweight, trie-routed web framework with route groups and middleware
//! support for the Rust HTTP library [hyper](https://hyper.rs/).
//!
//! Tern's core features:
//!
//! - 🌳 Fast route matching using one segment tree per HTTP method, with `:param` and
//!   trailing `*wildcard` segments
//! - 🌀 Route composition with prefix [groups](./struct.RouterGroup.html) and chained
//!   [middleware](./struct.Context.html#method.next)
//! - 📦 A pooled per-request [`Context`](./struct.Context.html) carrying params, query
//!   values, the request body and the response under construction
//! - ❗ Flexible [error handling](#error-handling): handlers return `Result`, a configured
//!   error handler turns errors into responses
//! - 🧾 JSON in and out via [serde](https://serde.rs/), plus declarative
//!   [body validation](./validator/index.html)
//!
//! ## Basic Example
//!
//! A simple server app using `tern` would look like the following:
//!
//! ```no_run
//! use tern::{Config, Context, Engine, HandlerFuture};
//!
//! // A handler for "/" page.
//! fn home_handler(cx: &mut Context) -> HandlerFuture<'_> {
//!     Box::pin(async move { cx.text("Home page") })
//! }
//!
//! // A handler for "/users/:userId" page.
//! fn user_handler(cx: &mut Context) -> HandlerFuture<'_> {
//!     Box::pin(async move {
//!         let user_id = cx.param_or("userId", "unknown").to_string();
//!         cx.text(format!("Hello {user_id}"))
//!     })
//! }
//!
//! // A middleware which logs every request and proceeds down the chain.
//! fn logger(cx: &mut Context) -> HandlerFuture<'_> {
//!     Box::pin(async move {
//!         tracing::info!(method = %cx.method(), path = cx.path(), "request");
//!         Ok(())
//!     })
//! }
//!
//! #[tokio::main]
//! async fn main() -> tern::Result<()> {
//!     let mut app = Engine::new(Config {
//!         addr: "127.0.0.1:3000".to_string(),
//!         ..Config::default()
//!     });
//!
//!     app.middleware(logger);
//!     app.get("/", home_handler)?;
//!     app.get("/users/:userId", user_handler)?;
//!
//!     app.listen().await
//! }
//! ```
//!
//! ## Routing
//!
//! ### Route Handlers
//!
//! A handler is anything implementing [`Handler`](./trait.Handler.html): most commonly a
//! function taking `&mut Context` and returning a boxed future. The handler writes its
//! response through the context and returns `Ok(())`, or an error for the error handler.
//!
//! ```
//! use tern::{Context, Engine, HandlerFuture};
//!
//! fn about_handler(cx: &mut Context) -> HandlerFuture<'_> {
//!     Box::pin(async move { cx.text("About page") })
//! }
//!
//! # fn run() -> tern::Result<()> {
//! let mut app = Engine::default();
//! app.get("/about", about_handler)?;
//! # Ok(())
//! # }
//! # run().unwrap();
//! ```
//!
//! Plain synchronous functions can be adapted with
//! [`adapter::sync_handler`](./adapter/fn.sync_handler.html).
//!
//! ### Route Paths
//!
//! A pattern is split on `/` into segments:
//!
//! - a *static* segment matches only identical text;
//! - a `:name` segment matches exactly one path segment and binds it as the parameter
//!   `name`;
//! - a trailing `*name` segment matches everything left of the path and binds the
//!   `/`-joined remainder; a bare `*` matches without binding. A `*` segment anywhere but
//!   the last position is rejected at registration.
//!
//! When a static segment and a `:param` at the same level both match, the static one
//! wins. `/foo` and `/foo/` are interchangeable unless
//! [`strict_routing`](./struct.Config.html#structfield.strict_routing) is set.
//!
//! ### Route Parameters
//!
//! ```
//! use tern::{Context, Engine, HandlerFuture};
//!
//! fn book_handler(cx: &mut Context) -> HandlerFuture<'_> {
//!     Box::pin(async move {
//!         let user = cx.param_or("userName", "?").to_string();
//!         let book = cx.param_or("bookName", "?").to_string();
//!         cx.text(format!("User: {user}, Book: {book}"))
//!     })
//! }
//!
//! # fn run() -> tern::Result<()> {
//! let mut app = Engine::default();
//! app.get("/users/:userName/books/:bookName", book_handler)?;
//! # Ok(())
//! # }
//! # run().unwrap();
//! ```
//!
//! Typed access with a fallback is available via
//! [`param_parse`](./struct.Context.html#method.param_parse) and
//! [`param_parse_or`](./struct.Context.html#method.param_parse_or).
//!
//! ### Route Groups
//!
//! A group scopes registration under a prefix and owns its own middleware list. Groups
//! exist only at setup time; at dispatch the engine applies the middleware of every group
//! whose prefix is a textual prefix of the request path, in the order the groups were
//! created.
//!
//! ```
//! use tern::{Context, Engine, HandlerFuture};
//!
//! fn list_books(cx: &mut Context) -> HandlerFuture<'_> {
//!     Box::pin(async move { cx.text("List of books") })
//! }
//!
//! # fn run() -> tern::Result<()> {
//! let mut app = Engine::default();
//! let mut api = app.group("/api");
//! api.get("/books", list_books)?; // serves GET /api/books
//! # Ok(())
//! # }
//! # run().unwrap();
//! ```
//!
//! ## Middleware
//!
//! Middleware are ordinary chain entries registered with
//! [`Engine::middleware`](./struct.Engine.html#method.middleware) or
//! [`RouterGroup::middleware`](./struct.RouterGroup.html#method.middleware); the matched
//! route handler runs last. The chain auto-advances: a handler that returns `Ok(())`
//! without doing anything else is simply followed by the next entry, so "before"-style
//! middleware never needs to call anything.
//!
//! A middleware that wants to run code *after* the downstream handlers — timing, response
//! decoration — calls [`Context::next`](./struct.Context.html#method.next) itself and
//! observes the downstream result at the call site:
//!
//! ```
//! use tern::{Context, HandlerFuture};
//!
//! fn timing(cx: &mut Context) -> HandlerFuture<'_> {
//!     Box::pin(async move {
//!         let start = std::time::Instant::now();
//!         let result = cx.next().await;
//!         tracing::info!(elapsed = ?start.elapsed(), failed = result.is_err(), "handled");
//!         result
//!     })
//! }
//! ```
//!
//! The first handler error short-circuits the chain and is handed to the error handler.
//!
//! ## Error Handling
//!
//! Handlers may return any error type; it is boxed into
//! [`RouteError`](./type.RouteError.html) and propagated to the configured error handler,
//! where the original value is accessible by downcasting. The built-in
//! [`Error`](./struct.Error.html) carries an HTTP status the default error handler
//! answers with.
//!
//! ```
//! use http::StatusCode;
//! use std::sync::Arc;
//! use tern::{Config, Context, Engine, ErrorHandler, HandlerFuture, RouteError};
//!
//! fn error_handler(cx: &mut Context, err: RouteError) -> HandlerFuture<'_> {
//!     Box::pin(async move {
//!         cx.status(StatusCode::INTERNAL_SERVER_ERROR)
//!             .text(format!("Something went wrong: {err}"))
//!     })
//! }
//!
//! # fn run() -> Engine {
//! let handler: Arc<dyn ErrorHandler> = Arc::new(error_handler);
//! let app = Engine::new(Config {
//!     error_handler: Some(handler),
//!     ..Config::default()
//! });
//! # app
//! # }
//! # run();
//! ```
//!
//! Requests that match no route run the configured
//! [`not_found_handler`](./struct.Config.html#structfield.not_found_handler) (by default
//! a `404 not found` text response) behind the same middleware chain.
//!
//! ## Concurrency model
//!
//! Routes, groups and middleware are registered during setup, which requires
//! `&mut Engine`; serving consumes the engine. The route tables are therefore read-only
//! while serving and matching needs no locks. Each request runs on its own task and owns
//! its pooled [`Context`](./struct.Context.html) exclusively between acquire and release;
//! the release clears all request-scoped state before reuse. The executor imposes no
//! timeout of its own.

pub use self::config::Config;
pub use self::context::Context;
pub use self::cookies::{Cookie, SameSite};
pub use self::engine::Engine;
pub use self::error::{Error, RouteError};
pub use self::group::RouterGroup;
pub use self::handler::{ErrorHandler, Handler, HandlerFuture};
pub use self::router::{RouteMatch, Router};
pub use self::types::RouteParams;

pub mod adapter;
pub mod config;
mod constants;
mod context;
mod cookies;
mod engine;
mod error;
mod group;
mod handler;
mod pool;
mod router;
pub mod service;
mod tree;
mod types;
pub mod validator;

/// A Result type often returned from methods that can have tern errors.
pub type Result<T> = std::result::Result<T, RouteError>;
