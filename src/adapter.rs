//! Adapters wrapping foreign handler signatures into [`Handler`].

use crate::context::Context;
use crate::handler::{Handler, HandlerFuture};

struct SyncHandler<F>(F);

impl<F> Handler for SyncHandler<F>
where
    F: Fn(&mut Context) -> crate::Result<()> + Send + Sync + 'static,
{
    fn call<'a>(&'a self, cx: &'a mut Context) -> HandlerFuture<'a> {
        let result = (self.0)(cx);
        Box::pin(async move { result })
    }
}

/// Wraps a plain synchronous function into a [`Handler`]. The function
/// runs to completion before the chain advances; it cannot call
/// [`Context::next`](crate::Context::next).
///
/// ```
/// use tern::{adapter, Context, Engine};
///
/// fn version(cx: &mut Context) -> tern::Result<()> {
///     cx.text("v1")
/// }
///
/// # fn run() -> tern::Result<()> {
/// let mut app = Engine::default();
/// app.get("/version", adapter::sync_handler(version))?;
/// # Ok(())
/// # }
/// # run().unwrap();
/// ```
pub fn sync_handler<F>(f: F) -> impl Handler
where
    F: Fn(&mut Context) -> crate::Result<()> + Send + Sync + 'static,
{
    SyncHandler(f)
}
