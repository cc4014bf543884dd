use crate::handlers::{BoxFuture, Handler, HandlerResult};
use crate::http::request::Request;
use crate::http::response::{Response, StatusCode};

/// Describes the request it received and says hello.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreetingHandler;

impl Handler for GreetingHandler {
    fn handle<'a>(&'a self, request: &'a Request) -> BoxFuture<'a, HandlerResult> {
        let target = match &request.query {
            Some(q) => format!("{}?{}", request.path, q),
            None => request.path.clone(),
        };

        let page = format!(
            "<html><body>This is an HTTP response to an HTTP {} request pointing to URL path {}\
             <h1>Hello, World!</h1></body></html>",
            request.method, target
        );

        Box::pin(std::future::ready(Ok(Response::html(StatusCode::OK, page))))
    }
}
