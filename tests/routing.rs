//! Routing and chain behavior driven through `Engine::dispatch`, without a
//! socket in the way.

use bytes::Bytes;
use http::{header, Method, Request, StatusCode};
use http_body_util::{BodyExt, Full};
use std::sync::Arc;
use tern::validator::{Constraint, Schema};
use tern::{Config, Context, Engine, Error, ErrorHandler, Handler, HandlerFuture, RouteError};

fn request(method: Method, uri: &str) -> Request<Full<Bytes>> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Full::new(Bytes::new()))
        .unwrap()
}

async fn call(app: &Engine, method: Method, uri: &str) -> (StatusCode, String) {
    let res = app.dispatch(request(method, uri), None).await.unwrap();
    let status = res.status();
    let body = res.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

/// Answers with the matched pattern and every bound parameter.
fn describe_match(cx: &mut Context) -> HandlerFuture<'_> {
    Box::pin(async move {
        let pattern = cx.pattern().unwrap_or("").to_string();
        let params: Vec<String> = cx
            .params()
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        cx.text(format!("{pattern} [{}]", params.join(",")))
    })
}

#[tokio::test]
async fn exact_static_match_has_empty_params() {
    let mut app = Engine::default();
    app.get("/about", describe_match).unwrap();
    let (status, body) = call(&app, Method::GET, "/about").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "/about []");
}

#[tokio::test]
async fn param_route_binds_the_segment() {
    let mut app = Engine::default();
    app.get("/user/:id", describe_match).unwrap();
    let (_, body) = call(&app, Method::GET, "/user/42").await;
    assert_eq!(body, "/user/:id [id=42]");
}

#[tokio::test]
async fn wildcard_route_binds_the_joined_remainder() {
    let mut app = Engine::default();
    app.get("/static/*filepath", describe_match).unwrap();
    let (_, body) = call(&app, Method::GET, "/static/a/b/c").await;
    assert_eq!(body, "/static/*filepath [filepath=a/b/c]");
}

#[tokio::test]
async fn bare_wildcard_matches_without_binding() {
    let mut app = Engine::default();
    app.get("/any/*", describe_match).unwrap();
    let (_, body) = call(&app, Method::GET, "/any/x/y").await;
    assert_eq!(body, "/any/* []");
}

#[tokio::test]
async fn static_route_preferred_over_param_route() {
    let mut app = Engine::default();
    app.get("/user/new", describe_match).unwrap();
    app.get("/user/:id", describe_match).unwrap();

    let (_, body) = call(&app, Method::GET, "/user/new").await;
    assert_eq!(body, "/user/new []");
    let (_, body) = call(&app, Method::GET, "/user/99").await;
    assert_eq!(body, "/user/:id [id=99]");
}

#[tokio::test]
async fn unregistered_method_is_not_found() {
    let mut app = Engine::default();
    app.get("/about", describe_match).unwrap();
    let (status, _) = call(&app, Method::POST, "/about").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn structural_prefix_is_not_found() {
    let mut app = Engine::default();
    app.get("/a/b/c", describe_match).unwrap();
    let (status, _) = call(&app, Method::GET, "/a/b").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn last_registration_wins() {
    fn first(cx: &mut Context) -> HandlerFuture<'_> {
        Box::pin(async move { cx.text("first") })
    }
    fn second(cx: &mut Context) -> HandlerFuture<'_> {
        Box::pin(async move { cx.text("second") })
    }

    let mut app = Engine::default();
    app.get("/dup", first).unwrap();
    app.get("/dup", second).unwrap();
    let (_, body) = call(&app, Method::GET, "/dup").await;
    assert_eq!(body, "second");
}

#[tokio::test]
async fn nested_groups_combine_prefixes() {
    let mut app = Engine::default();
    let mut api = app.group("/api");
    let mut v2 = api.group("/v2");
    v2.get("/ping", describe_match).unwrap();

    let (_, body) = call(&app, Method::GET, "/api/v2/ping").await;
    assert_eq!(body, "/api/v2/ping []");
    let (status, _) = call(&app, Method::GET, "/v2/ping").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn handler_error_reaches_the_default_error_handler() {
    fn teapot(_cx: &mut Context) -> HandlerFuture<'_> {
        Box::pin(async move {
            Err(Error::with_status(StatusCode::IM_A_TEAPOT, "short and stout").into())
        })
    }

    let mut app = Engine::default();
    app.get("/brew", teapot).unwrap();
    let (status, body) = call(&app, Method::GET, "/brew").await;
    assert_eq!(status, StatusCode::IM_A_TEAPOT);
    assert_eq!(body, "short and stout");
}

#[tokio::test]
async fn custom_error_and_not_found_handlers() {
    fn boom(_cx: &mut Context) -> HandlerFuture<'_> {
        Box::pin(async move { Err(Error::new("boom").into()) })
    }
    fn on_error(cx: &mut Context, err: RouteError) -> HandlerFuture<'_> {
        Box::pin(async move { cx.status(StatusCode::BAD_GATEWAY).text(format!("caught: {err}")) })
    }
    fn on_not_found(cx: &mut Context) -> HandlerFuture<'_> {
        Box::pin(async move { cx.status(StatusCode::NOT_FOUND).text("nothing here") })
    }

    let error_handler: Arc<dyn ErrorHandler> = Arc::new(on_error);
    let not_found_handler: Arc<dyn Handler> = Arc::new(on_not_found);
    let mut app = Engine::new(Config {
        error_handler: Some(error_handler),
        not_found_handler: Some(not_found_handler),
        ..Config::default()
    });
    app.get("/explode", boom).unwrap();

    let (status, body) = call(&app, Method::GET, "/explode").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body, "caught: boom");

    let (status, body) = call(&app, Method::GET, "/elsewhere").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "nothing here");
}

#[tokio::test]
async fn strict_routing_distinguishes_trailing_slash() {
    let mut app = Engine::new(Config {
        strict_routing: true,
        ..Config::default()
    });
    app.get("/exact", describe_match).unwrap();

    let (status, _) = call(&app, Method::GET, "/exact").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, Method::GET, "/exact/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn json_body_is_parsed_and_validated() {
    #[derive(serde::Deserialize)]
    struct Signup {
        name: String,
    }

    fn signup(cx: &mut Context) -> HandlerFuture<'_> {
        Box::pin(async move {
            let schema = Schema::new()
                .rule("name", Constraint::Required, "name is required")
                .rule("email", Constraint::Email, "email is invalid");
            cx.validate(&schema)?;
            let body: Signup = cx.parse_json()?;
            cx.status(StatusCode::CREATED).text(format!("welcome {}", body.name))
        })
    }

    let mut app = Engine::default();
    app.post("/signup", signup).unwrap();

    let valid = Request::builder()
        .method(Method::POST)
        .uri("/signup")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from_static(
            br#"{"name":"ada","email":"ada@example.com"}"#,
        )))
        .unwrap();
    let res = app.dispatch(valid, None).await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let invalid = Request::builder()
        .method(Method::POST)
        .uri("/signup")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from_static(br#"{"email":"nope"}"#)))
        .unwrap();
    let res = app.dispatch(invalid, None).await.unwrap();
    // The validation error carries 400 and is rendered by the default
    // error handler.
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn cookies_roundtrip_through_headers() {
    fn whoami(cx: &mut Context) -> HandlerFuture<'_> {
        Box::pin(async move {
            let session = cx.cookie("session").unwrap_or("anonymous").to_string();
            cx.set_cookie(&tern::Cookie::new("seen", "yes"))?;
            cx.text(session)
        })
    }

    let mut app = Engine::default();
    app.get("/whoami", whoami).unwrap();

    let req = Request::builder()
        .method(Method::GET)
        .uri("/whoami")
        .header(header::COOKIE, "session=s3cr3t; theme=dark")
        .body(Full::new(Bytes::new()))
        .unwrap();
    let res = app.dispatch(req, None).await.unwrap();
    let set_cookie = res.headers().get(header::SET_COOKIE).unwrap();
    assert_eq!(set_cookie, "seen=yes; SameSite=Lax");
    let body = res.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"s3cr3t");
}

#[tokio::test]
async fn fail_short_circuits_with_a_json_error() {
    fn gate(cx: &mut Context) -> HandlerFuture<'_> {
        Box::pin(async move { cx.fail(StatusCode::UNAUTHORIZED, "login required") })
    }
    fn never(cx: &mut Context) -> HandlerFuture<'_> {
        Box::pin(async move { cx.text("unreachable") })
    }

    let mut app = Engine::default();
    app.middleware(gate);
    app.get("/secret", never).unwrap();

    let (status, body) = call(&app, Method::GET, "/secret").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, r#"{"code":401,"message":"login required"}"#);
}
