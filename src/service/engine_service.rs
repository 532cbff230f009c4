use crate::engine::Engine;
use crate::service::request_service::RequestService;
use hyper::service::Service;
use std::convert::Infallible;
use std::future::{ready, Ready};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;

/// The connection-level service: produces a [`RequestService`] per
/// accepted connection, stamped with the peer address.
///
/// [`Engine::listen`](crate::Engine::listen) uses this internally; it is
/// public for custom accept loops:
///
/// ```no_run
/// use hyper_util::rt::{TokioExecutor, TokioIo};
/// use hyper_util::server::conn::auto::Builder;
/// use hyper::service::Service;
/// use std::sync::Arc;
/// use tern::service::EngineService;
/// use tern::Engine;
/// use tokio::net::TcpListener;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
///     let app = Engine::default();
///     let service = Arc::new(EngineService::new(app));
///     let listener = TcpListener::bind("127.0.0.1:3001").await?;
///
///     loop {
///         let (stream, _) = listener.accept().await?;
///         let service = Arc::clone(&service);
///
///         tokio::spawn(async move {
///             let request_service = service.call(&stream).await.expect("infallible");
///             let io = TokioIo::new(stream);
///             let builder = Builder::new(TokioExecutor::new());
///             if let Err(err) = builder.serve_connection(io, request_service).await {
///                 eprintln!("Error serving connection: {:?}", err);
///             }
///         });
///     }
/// }
/// ```
pub struct EngineService {
    engine: Arc<Engine>,
}

impl EngineService {
    pub fn new(engine: Engine) -> Self {
        EngineService {
            engine: Arc::new(engine),
        }
    }

    /// Builds the per-connection service for a known peer address.
    pub fn request_service(&self, remote_addr: SocketAddr) -> RequestService {
        RequestService {
            engine: Arc::clone(&self.engine),
            remote_addr,
        }
    }
}

impl Service<&TcpStream> for EngineService {
    type Response = RequestService;
    type Error = Infallible;
    type Future = Ready<Result<Self::Response, Self::Error>>;

    fn call(&self, conn: &TcpStream) -> Self::Future {
        let remote_addr = conn
            .peer_addr()
            .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], 0)));

        ready(Ok(self.request_service(remote_addr)))
    }
}
