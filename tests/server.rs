//! End-to-end tests over a real TCP socket.

use bytes::Bytes;
use http::{header, StatusCode};
use http_body_util::Full;
use tern::{Context, Engine, HandlerFuture};

mod support;

fn home(cx: &mut Context) -> HandlerFuture<'_> {
    Box::pin(async move { cx.text("Home page") })
}

fn user(cx: &mut Context) -> HandlerFuture<'_> {
    Box::pin(async move {
        let id = cx.param_or("id", "unknown").to_string();
        cx.text(format!("Hello {id}"))
    })
}

fn echo_json(cx: &mut Context) -> HandlerFuture<'_> {
    Box::pin(async move {
        let value: serde_json::Value = cx.parse_json()?;
        cx.json(&value)
    })
}

fn peer(cx: &mut Context) -> HandlerFuture<'_> {
    Box::pin(async move {
        let seen = cx.remote_addr().is_some();
        cx.text(format!("peer:{seen}"))
    })
}

async fn app() -> support::Serve {
    let mut app = Engine::default();
    app.get("/", home).unwrap();
    app.get("/users/:id", user).unwrap();
    app.post("/echo", echo_json).unwrap();
    app.get("/peer", peer).unwrap();
    support::serve(app).await
}

#[tokio::test]
async fn serves_static_and_param_routes() {
    let serve = app().await;

    let (status, body) = serve.get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Home page");

    let (status, body) = serve.get("/users/42").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Hello 42");
}

#[tokio::test]
async fn unknown_route_is_a_404() {
    let serve = app().await;
    let (status, body) = serve.get("/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "404 not found");
}

#[tokio::test]
async fn posts_roundtrip_json() {
    let serve = app().await;
    let req = serve
        .new_request("POST", "/echo")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from_static(br#"{"ping":"pong"}"#)))
        .unwrap();
    let res = serve.send(req).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    let body = support::into_text(res.into_body()).await;
    assert_eq!(body, r#"{"ping":"pong"}"#);
}

#[tokio::test]
async fn handlers_see_the_peer_address() {
    let serve = app().await;
    let (_, body) = serve.get("/peer").await;
    assert_eq!(body, "peer:true");
}

#[tokio::test]
async fn concurrent_requests_use_isolated_contexts() {
    let serve = std::sync::Arc::new(app().await);

    let mut handles = Vec::new();
    for i in 0..32u32 {
        let serve = serve.clone();
        handles.push(tokio::spawn(async move {
            let (status, body) = serve.get(&format!("/users/{i}")).await;
            (i, status, body)
        }));
    }
    for handle in handles {
        let (i, status, body) = handle.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, format!("Hello {i}"));
    }
}
