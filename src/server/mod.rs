//! Server assembly: the route table and the accept loop.

pub mod listener;

use crate::config::Config;
use crate::handlers::{DigestHandler, EchoFormHandler, GreetingHandler, StaticFileHandler};
use crate::http::request::Method;
use crate::router::Router;

/// Builds the route table served by the binary.
///
/// | Method | Path      | Handler             |
/// |--------|-----------|---------------------|
/// | GET    | `/`       | static index file   |
/// | POST   | `/`       | form echo           |
/// | GET    | `/hello`  | greeting            |
/// | POST   | `/digest` | body digest         |
pub fn build_router(cfg: &Config) -> Router {
    Router::new()
        .route(Method::GET, "/", StaticFileHandler::new(cfg.static_files.index_path.clone()))
        .route(Method::POST, "/", EchoFormHandler)
        .route(Method::GET, "/hello", GreetingHandler)
        .route(Method::POST, "/digest", DigestHandler::new(cfg.digest.algorithm))
}
