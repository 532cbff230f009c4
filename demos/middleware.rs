use tern::{Config, Context, Engine, HandlerFuture};

// A "before" middleware: does its work and lets the chain auto-advance.
fn request_id(cx: &mut Context) -> HandlerFuture<'_> {
    Box::pin(async move {
        let id = std::process::id() as u64 ^ std::time::UNIX_EPOCH.elapsed().map_or(0, |d| d.as_nanos() as u64);
        cx.set_header("x-request-id", &format!("{id:016x}"))?;
        cx.set_value("request_id", id);
        Ok(())
    })
}

// A wrapping middleware: runs the rest of the chain itself so it can log
// afterwards, including whether the downstream failed.
fn timing(cx: &mut Context) -> HandlerFuture<'_> {
    Box::pin(async move {
        let start = std::time::Instant::now();
        let result = cx.next().await;
        tracing::info!(
            path = cx.path(),
            elapsed = ?start.elapsed(),
            failed = result.is_err(),
            "request finished"
        );
        result
    })
}

fn home_handler(cx: &mut Context) -> HandlerFuture<'_> {
    Box::pin(async move {
        let id = cx.value::<u64>("request_id").copied().unwrap_or(0);
        cx.text(format!("Home page (request {id:016x})"))
    })
}

fn admin_handler(cx: &mut Context) -> HandlerFuture<'_> {
    Box::pin(async move { cx.text("Admin area") })
}

#[tokio::main]
async fn main() -> tern::Result<()> {
    tracing_subscriber::fmt().init();

    let mut app = Engine::new(Config {
        addr: "127.0.0.1:3000".to_string(),
        ..Config::default()
    });

    app.middleware(timing);
    app.middleware(request_id);
    app.get("/", home_handler)?;

    // Group middleware applies to every path under the group's prefix.
    let mut admin = app.group("/admin");
    admin.middleware(timing);
    admin.get("/", admin_handler)?;

    app.listen().await
}
