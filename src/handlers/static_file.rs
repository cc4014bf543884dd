use std::path::PathBuf;

use tokio::fs::File;
use tracing::debug;

use crate::handlers::{BoxFuture, Handler, HandlerError, HandlerResult};
use crate::http::mime;
use crate::http::request::Request;
use crate::http::response::{Response, StatusCode};

/// Streams one fixed file as the response body.
///
/// The file is opened per request, so edits on disk show up immediately and
/// a missing file yields 404 instead of failing at startup.
#[derive(Debug, Clone)]
pub struct StaticFileHandler {
    path: PathBuf,
    content_type: &'static str,
}

impl StaticFileHandler {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let content_type = mime::from_path(&path);
        Self { path, content_type }
    }

    async fn serve(&self) -> HandlerResult {
        let file = File::open(&self.path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                HandlerError::NotFound(self.path.display().to_string())
            } else {
                HandlerError::Io(e)
            }
        })?;

        let meta = file.metadata().await?;
        if !meta.is_file() {
            // Directories open fine on unix but cannot be read as a body.
            return Err(HandlerError::NotFound(self.path.display().to_string()));
        }

        let len = meta.len();
        debug!(path = %self.path.display(), bytes = len, "streaming static file");

        Ok(Response::builder(StatusCode::OK)
            .header("Content-Type", self.content_type)
            .stream(file, len)
            .build())
    }
}

impl Handler for StaticFileHandler {
    fn handle<'a>(&'a self, _request: &'a Request) -> BoxFuture<'a, HandlerResult> {
        Box::pin(self.serve())
    }
}
