use crate::context::Context;
use crate::error::RouteError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// The boxed future a handler returns; it borrows the context for the
/// duration of the call.
pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = crate::Result<()>> + Send + 'a>>;

/// A route handler or middleware entry in a handler chain.
///
/// Implemented for any `Fn(&mut Context) -> HandlerFuture`, which makes a
/// plain function item a handler:
///
/// ```
/// use tern::{Context, HandlerFuture};
///
/// fn home(cx: &mut Context) -> HandlerFuture<'_> {
///     Box::pin(async move { cx.text("Home page") })
/// }
///
/// # fn run() -> tern::Result<()> {
/// let mut app = tern::Engine::default();
/// app.get("/", home)?;
/// # Ok(())
/// # }
/// # run().unwrap();
/// ```
pub trait Handler: Send + Sync + 'static {
    fn call<'a>(&'a self, cx: &'a mut Context) -> HandlerFuture<'a>;
}

impl<F> Handler for F
where
    F: for<'a> Fn(&'a mut Context) -> HandlerFuture<'a> + Send + Sync + 'static,
{
    fn call<'a>(&'a self, cx: &'a mut Context) -> HandlerFuture<'a> {
        (self)(cx)
    }
}

/// The callback invoked when a handler chain returns an error. It must
/// produce a response of its own; if it fails as well, the request is
/// abandoned at the transport level.
pub trait ErrorHandler: Send + Sync + 'static {
    fn call<'a>(&'a self, cx: &'a mut Context, err: RouteError) -> HandlerFuture<'a>;
}

impl<F> ErrorHandler for F
where
    F: for<'a> Fn(&'a mut Context, RouteError) -> HandlerFuture<'a> + Send + Sync + 'static,
{
    fn call<'a>(&'a self, cx: &'a mut Context, err: RouteError) -> HandlerFuture<'a> {
        (self)(cx, err)
    }
}

pub(crate) type BoxHandler = Arc<dyn Handler>;
