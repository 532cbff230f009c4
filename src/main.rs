use http::StatusCode;
use tern::{Config, Context, Engine, HandlerFuture};

// A handler for "/" page.
fn home_handler(cx: &mut Context) -> HandlerFuture<'_> {
    Box::pin(async move { cx.text("Home page") })
}

// A handler for "/users/:userId" page.
fn user_handler(cx: &mut Context) -> HandlerFuture<'_> {
    Box::pin(async move {
        let user_id = cx.param_or("userId", "unknown").to_string();
        cx.text(format!("Hello {user_id}"))
    })
}

// A handler that fails, to exercise the error handler.
fn broken_handler(_cx: &mut Context) -> HandlerFuture<'_> {
    Box::pin(async move {
        Err(tern::Error::with_status(StatusCode::SERVICE_UNAVAILABLE, "not today").into())
    })
}

// A middleware which logs every request.
fn logger(cx: &mut Context) -> HandlerFuture<'_> {
    Box::pin(async move {
        tracing::info!(method = %cx.method(), path = cx.path(), "request");
        Ok(())
    })
}

#[tokio::main]
async fn main() -> tern::Result<()> {
    let mut app = Engine::new(Config {
        addr: "127.0.0.1:3000".to_string(),
        ..Config::default()
    });

    app.middleware(logger);
    app.get("/", home_handler)?;
    app.get("/users/:userId", user_handler)?;
    app.get("/broken", broken_handler)?;

    app.listen().await
}
