use http::StatusCode;
use std::sync::Arc;
use tern::{Config, Context, Engine, ErrorHandler, Handler, HandlerFuture, RouteError};

// A custom error type a handler might return.
#[derive(Debug)]
struct RateLimited;

impl std::fmt::Display for RateLimited {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("rate limited")
    }
}

impl std::error::Error for RateLimited {}

fn throttled_handler(_cx: &mut Context) -> HandlerFuture<'_> {
    Box::pin(async move { Err(RateLimited.into()) })
}

fn teapot_handler(cx: &mut Context) -> HandlerFuture<'_> {
    Box::pin(async move { cx.fail(StatusCode::IM_A_TEAPOT, "short and stout") })
}

// The error handler downcasts to decide the response; it must always
// produce one.
fn error_handler(cx: &mut Context, err: RouteError) -> HandlerFuture<'_> {
    Box::pin(async move {
        if err.downcast_ref::<RateLimited>().is_some() {
            return cx
                .status(StatusCode::TOO_MANY_REQUESTS)
                .text("slow down, please");
        }
        cx.status(StatusCode::INTERNAL_SERVER_ERROR)
            .text(format!("Something went wrong: {err}"))
    })
}

fn not_found_handler(cx: &mut Context) -> HandlerFuture<'_> {
    Box::pin(async move { cx.status(StatusCode::NOT_FOUND).text("nothing here") })
}

#[tokio::main]
async fn main() -> tern::Result<()> {
    tracing_subscriber::fmt().init();

    let error_handler: Arc<dyn ErrorHandler> = Arc::new(error_handler);
    let not_found: Arc<dyn Handler> = Arc::new(not_found_handler);
    let mut app = Engine::new(Config {
        addr: "127.0.0.1:3000".to_string(),
        error_handler: Some(error_handler),
        not_found_handler: Some(not_found),
        ..Config::default()
    });

    app.get("/throttled", throttled_handler)?;
    app.get("/teapot", teapot_handler)?;

    app.listen().await
}
