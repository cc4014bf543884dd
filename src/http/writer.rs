use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::http::headers::Headers;
use crate::http::response::{Body, Response, StatusCode};

const HTTP_VERSION: &str = "HTTP/1.1";
const DEFAULT_CONTENT_TYPE: &str = "text/html";

/// Connection-level settings applied to every response on its way out.
#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    pub keep_alive: bool,
    /// Added to each response unless the handler already set them.
    pub extra_headers: Headers,
}

/// Fills in the headers every response must carry.
///
/// Content-Type defaults to `text/html`. Content-Length is always recomputed
/// from the body so it appears exactly once, and any Transfer-Encoding the
/// handler set is dropped since bodies are never chunked.
pub fn finalize_headers(status: StatusCode, headers: &mut Headers, body: &Body, options: &WriteOptions) {
    headers.insert_if_absent("Content-Type", DEFAULT_CONTENT_TYPE);

    headers.remove("Transfer-Encoding");
    headers.remove("Content-Length");
    headers.insert("Content-Length", body.len().to_string());

    for (k, v) in options.extra_headers.iter() {
        headers.insert_if_absent(k, v);
    }

    let connection = if options.keep_alive { "keep-alive" } else { "close" };
    headers.insert("Connection", connection);

    tracing::trace!(status = status.as_u16(), headers = headers.len(), "response headers finalized");
}

/// Serializes the status line, headers and separating blank line.
pub fn serialize_head(status: StatusCode, headers: &Headers) -> Vec<u8> {
    let mut buf = Vec::with_capacity(128);

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        status.as_u16(),
        status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());

    // Headers
    for (k, v) in headers.iter() {
        buf.extend_from_slice(k.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(v.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    // Header/body separator
    buf.extend_from_slice(b"\r\n");

    buf
}

/// Owns a response from the moment it leaves the handler until its last
/// byte is on the wire.
pub struct ResponseWriter {
    buffer: Vec<u8>,
    written: usize,
    stream_body: Option<Body>,
}

impl ResponseWriter {
    pub fn new(response: Response, options: &WriteOptions) -> Self {
        let Response {
            status,
            mut headers,
            body,
        } = response;

        finalize_headers(status, &mut headers, &body, options);
        let mut buffer = serialize_head(status, &headers);

        // Buffered bodies go out with the head in one write.
        let stream_body = match body {
            Body::Full(bytes) => {
                buffer.extend_from_slice(&bytes);
                None
            }
            stream @ Body::Stream { .. } => Some(stream),
        };

        Self {
            buffer,
            written: 0,
            stream_body,
        }
    }

    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        while self.written < self.buffer.len() {
            let n = stream.write(&self.buffer[self.written..]).await?;

            if n == 0 {
                return Err(anyhow::anyhow!("connection closed while writing"));
            }

            self.written += n;
        }

        if let Some(Body::Stream { reader, len }) = self.stream_body.take() {
            let mut limited = reader.take(len);
            let copied = tokio::io::copy(&mut limited, stream).await?;

            if copied != len {
                return Err(anyhow::anyhow!(
                    "body stream ended after {} of {} bytes",
                    copied,
                    len
                ));
            }
        }

        stream.flush().await?;
        Ok(())
    }
}
