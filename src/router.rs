//! Exact-match routing on `(method, path)`.
//!
//! Routes are registered while the server is being assembled; once serving
//! starts the router is shared behind an `Arc` and never mutated, so lookups
//! need no locking.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::handlers::Handler;
use crate::http::request::{Method, Request};
use crate::http::response::Response;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RouteKey {
    method: Method,
    path: String,
}

#[derive(Default)]
pub struct Router {
    routes: HashMap<RouteKey, Arc<dyn Handler>>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a handler to an exact method and path. Registering the same pair
    /// again replaces the earlier handler.
    pub fn register(&mut self, method: Method, path: impl Into<String>, handler: impl Handler + 'static) {
        let key = RouteKey {
            method,
            path: path.into(),
        };

        if self.routes.insert(key.clone(), Arc::new(handler)).is_some() {
            debug!(method = %key.method, path = %key.path, "route handler replaced");
        }
    }

    /// Fluent form of [`Router::register`].
    pub fn route(mut self, method: Method, path: impl Into<String>, handler: impl Handler + 'static) -> Self {
        self.register(method, path, handler);
        self
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Runs the handler bound to the request's method and path.
    ///
    /// Unmatched requests get the built-in 404. Handler failures never escape:
    /// not-found conditions become 404, anything else 500.
    pub async fn dispatch(&self, request: &Request) -> Response {
        let key = RouteKey {
            method: request.method.clone(),
            path: request.path.clone(),
        };

        let Some(handler) = self.routes.get(&key) else {
            debug!(method = %request.method, path = %request.path, "no route matched");
            return Response::not_found();
        };

        match handler.handle(request).await {
            Ok(response) => response,
            Err(e) if e.is_not_found() => {
                warn!(method = %request.method, path = %request.path, error = %e, "handler reported missing resource");
                Response::not_found()
            }
            Err(e) => {
                warn!(method = %request.method, path = %request.path, error = %e, "handler failed");
                Response::internal_error()
            }
        }
    }
}
