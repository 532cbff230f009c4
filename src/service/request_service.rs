use crate::engine::Engine;
use crate::error::RouteError;
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::service::Service;
use hyper::{Request, Response};
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;

/// The per-connection service: carries the engine and the peer address and
/// forwards each request into [`Engine::dispatch`]. A dispatch error (the
/// abandoned-request case) surfaces as the service error, which fails only
/// this connection.
pub struct RequestService {
    pub(crate) engine: Arc<Engine>,
    pub(crate) remote_addr: SocketAddr,
}

impl Service<Request<Incoming>> for RequestService {
    type Response = Response<Full<Bytes>>;
    type Error = RouteError;
    #[allow(clippy::type_complexity)]
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

    fn call(&self, req: Request<Incoming>) -> Self::Future {
        let engine = Arc::clone(&self.engine);
        let remote_addr = self.remote_addr;

        Box::pin(async move { engine.dispatch(req, Some(remote_addr)).await })
    }
}
