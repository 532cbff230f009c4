use tern::{Config, Context, Engine, HandlerFuture};

fn home_handler(cx: &mut Context) -> HandlerFuture<'_> {
    Box::pin(async move { cx.text("Home page") })
}

fn user_handler(cx: &mut Context) -> HandlerFuture<'_> {
    Box::pin(async move {
        let user_id = cx.param_or("userId", "unknown").to_string();
        cx.text(format!("Hello {user_id}"))
    })
}

fn search_handler(cx: &mut Context) -> HandlerFuture<'_> {
    Box::pin(async move {
        let q = cx.query_or("q", "");
        cx.text(format!("Searching for {q:?}"))
    })
}

#[tokio::main]
async fn main() -> tern::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tern=debug".into()),
        )
        .init();

    let mut app = Engine::new(Config {
        addr: "127.0.0.1:3000".to_string(),
        ..Config::default()
    });

    app.get("/", home_handler)?;
    app.get("/users/:userId", user_handler)?;
    app.get("/search", search_handler)?;

    println!("App is running on: 127.0.0.1:3000");
    app.listen().await
}
