use bytes::Bytes;
use http::{Request, Response, StatusCode};
use http_body_util::Full;
use hyper::service::Service;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder;
use std::net::SocketAddr;
use std::sync::Arc;
use tern::service::EngineService;
use tern::Engine;
use tokio::net::TcpListener;

pub struct Serve {
    addr: SocketAddr,
    client: Client<HttpConnector, Full<Bytes>>,
}

impl Serve {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn new_request(&self, method: &str, route: &str) -> http::request::Builder {
        Request::builder()
            .method(method.to_ascii_uppercase().as_str())
            .uri(format!("http://{}{}", self.addr(), route))
    }

    pub async fn send(&self, req: Request<Full<Bytes>>) -> Response<hyper::body::Incoming> {
        self.client.request(req).await.expect("request failed")
    }

    pub async fn get(&self, route: &str) -> (StatusCode, String) {
        let req = self
            .new_request("GET", route)
            .body(Full::new(Bytes::new()))
            .unwrap();
        let res = self.send(req).await;
        let status = res.status();
        (status, into_text(res.into_body()).await)
    }
}

pub async fn serve(engine: Engine) -> Serve {
    // Bind a TCP listener to an available port.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let service = Arc::new(EngineService::new(engine));

    tokio::spawn(async move {
        loop {
            let (stream, _) = listener.accept().await.unwrap();
            let service = service.clone();
            tokio::spawn(async move {
                let request_service = service
                    .call(&stream)
                    .await
                    .expect("EngineService is infallible");
                let io = TokioIo::new(stream);
                let builder = Builder::new(TokioExecutor::new());
                let _ = builder.serve_connection(io, request_service).await;
            });
        }
    });

    Serve {
        addr,
        client: Client::builder(TokioExecutor::new()).build_http(),
    }
}

pub async fn into_text<B>(body: B) -> String
where
    B: hyper::body::Body<Data = Bytes> + Send,
    B::Error: std::fmt::Debug,
{
    use http_body_util::BodyExt;
    String::from_utf8_lossy(&body.collect().await.unwrap().to_bytes()).to_string()
}
