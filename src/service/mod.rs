//! Hyper [`Service`](hyper::service::Service) adapters for serving an
//! [`Engine`](crate::Engine) with a hand-rolled accept loop.

pub use self::engine_service::EngineService;
pub use self::request_service::RequestService;

mod engine_service;
mod request_service;
