//! Request handlers.
//!
//! A handler turns one parsed [`Request`] into a [`Response`]. It may do
//! local I/O (reading a file, hashing a body) but owns no state shared with
//! other connections unless that state is synchronized.

use std::future::Future;
use std::io;
use std::pin::Pin;

use thiserror::Error;

use crate::http::request::Request;
use crate::http::response::Response;

pub mod digest;
pub mod echo_form;
pub mod greeting;
pub mod static_file;

pub use digest::DigestHandler;
pub use echo_form::EchoFormHandler;
pub use greeting::GreetingHandler;
pub use static_file::StaticFileHandler;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub type HandlerResult = Result<Response, HandlerError>;

/// A failure a handler did not turn into a response itself.
///
/// The dispatcher converts these into 404 or 500 responses.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HandlerError {
    /// Whether this failure means the requested resource does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            HandlerError::NotFound(_) => true,
            HandlerError::Io(e) => e.kind() == io::ErrorKind::NotFound,
            HandlerError::Other(_) => false,
        }
    }
}

pub trait Handler: Send + Sync {
    fn handle<'a>(&'a self, request: &'a Request) -> BoxFuture<'a, HandlerResult>;
}

/// Plain functions and closures work as synchronous handlers.
impl<F> Handler for F
where
    F: Fn(&Request) -> HandlerResult + Send + Sync,
{
    fn handle<'a>(&'a self, request: &'a Request) -> BoxFuture<'a, HandlerResult> {
        Box::pin(std::future::ready(self(request)))
    }
}
