use crate::handlers::{BoxFuture, Handler, HandlerResult};
use crate::http::form;
use crate::http::request::Request;
use crate::http::response::{Response, StatusCode};

/// Greets the submitted `first` field and echoes the raw form body back.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoFormHandler;

impl EchoFormHandler {
    pub fn respond(&self, request: &Request) -> Response {
        // Bodies sent without a form Content-Type are still decoded as forms.
        let fields = request
            .form
            .clone()
            .unwrap_or_else(|| form::decode(&request.body));

        let first = fields.get("first").map(String::as_str).unwrap_or("");
        let raw = String::from_utf8_lossy(&request.body);

        Response::html(StatusCode::OK, render_page(first, &raw))
    }
}

impl Handler for EchoFormHandler {
    fn handle<'a>(&'a self, request: &'a Request) -> BoxFuture<'a, HandlerResult> {
        Box::pin(std::future::ready(Ok(self.respond(request))))
    }
}

fn render_page(first: &str, raw_body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         <title>Form Results</title>\n\
         </head>\n\
         <body>\n\
         <h1>Greetings {first}!</h1>\n\
         <p>I have received an HTTP POST request with the following body</p>\n\
         <p>{raw_body}</p>\n\
         </body>\n\
         </html>\n"
    )
}
