use crate::digest::{Algorithm, StreamDigest};
use crate::handlers::{BoxFuture, Handler, HandlerResult};
use crate::http::request::Request;
use crate::http::response::{Response, StatusCode};

const CHUNK: usize = 4096;

/// Replies with the hex digest of the request body.
#[derive(Debug, Clone, Copy, Default)]
pub struct DigestHandler {
    algorithm: Algorithm,
}

impl DigestHandler {
    pub fn new(algorithm: Algorithm) -> Self {
        Self { algorithm }
    }

    pub fn digest_body(&self, body: &[u8]) -> String {
        let mut digest = StreamDigest::new(self.algorithm);
        for chunk in body.chunks(CHUNK) {
            digest.update(chunk);
        }
        digest.finalize()
    }
}

impl Handler for DigestHandler {
    fn handle<'a>(&'a self, request: &'a Request) -> BoxFuture<'a, HandlerResult> {
        let hex = self.digest_body(&request.body);
        Box::pin(std::future::ready(Ok(Response::text(StatusCode::OK, hex))))
    }
}
