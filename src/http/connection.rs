use std::sync::Arc;
use std::time::Duration;

use bytes::BytesMut;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;
use tracing::{debug, info, trace, warn};

use crate::config::Config;
use crate::http::accumulator::Accumulator;
use crate::http::headers::Headers;
use crate::http::parser::{ParseError, parse_request};
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::writer::{ResponseWriter, WriteOptions};
use crate::router::Router;

const READ_CHUNK: usize = 4096;

/// Per-connection limits and response policy, shared by all connections.
#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    pub read_timeout: Duration,
    pub max_request_bytes: usize,
    pub keep_alive: bool,
    pub extra_headers: Headers,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl ConnectionSettings {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            read_timeout: cfg.server.read_timeout(),
            max_request_bytes: cfg.server.max_request_bytes,
            keep_alive: cfg.server.keep_alive,
            extra_headers: cfg.extra_headers(),
        }
    }
}

/// Why a request was answered with an error instead of being dispatched.
#[derive(Debug, Error)]
pub enum ConnectionFault {
    #[error("parse fault: {0}")]
    Parse(#[from] ParseError),

    #[error("request exceeds {limit} bytes")]
    TooLarge { limit: usize },

    #[error("peer went idle mid-request")]
    IdleTimeout,
}

impl ConnectionFault {
    pub fn response(&self) -> Response {
        match self {
            ConnectionFault::Parse(_) => Response::bad_request(),
            ConnectionFault::TooLarge { .. } => Response::payload_too_large(),
            ConnectionFault::IdleTimeout => Response::request_timeout(),
        }
    }
}

pub enum ConnectionState {
    Accepted,
    Reading(Accumulator),
    Parsed(Request),
    Dispatched(Response, bool),     // bool = keep_alive?
    Writing(ResponseWriter, bool),
    Error(ConnectionFault),
    Closed,
}

impl ConnectionState {
    pub fn name(&self) -> &'static str {
        match self {
            ConnectionState::Accepted => "accepted",
            ConnectionState::Reading(_) => "reading",
            ConnectionState::Parsed(_) => "parsed",
            ConnectionState::Dispatched(..) => "dispatched",
            ConnectionState::Writing(..) => "writing",
            ConnectionState::Error(_) => "error",
            ConnectionState::Closed => "closed",
        }
    }
}

/// One request/response pipeline bound to one peer.
///
/// Generic over the byte stream so it runs the same over a `TcpStream` or an
/// in-memory duplex pipe.
pub struct Connection<S> {
    stream: S,
    peer: String,
    router: Arc<Router>,
    settings: Arc<ConnectionSettings>,
    leftover: BytesMut,
    state: ConnectionState,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub fn new(
        stream: S,
        peer: impl Into<String>,
        router: Arc<Router>,
        settings: Arc<ConnectionSettings>,
    ) -> Self {
        Self {
            stream,
            peer: peer.into(),
            router,
            settings,
            leftover: BytesMut::new(),
            state: ConnectionState::Accepted,
        }
    }

    /// Drives the connection until it closes.
    ///
    /// Returns an error only for transport faults; protocol problems are
    /// answered with an error response and a clean close.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            // A failure below leaves the connection Closed with its buffers dropped.
            let state = std::mem::replace(&mut self.state, ConnectionState::Closed);
            trace!(peer = %self.peer, state = state.name(), "connection step");

            self.state = match state {
                ConnectionState::Accepted => ConnectionState::Reading(Accumulator::new()),

                ConnectionState::Reading(acc) => self.read_request(acc).await?,

                ConnectionState::Parsed(req) => {
                    let keep_alive = self.settings.keep_alive && req.keep_alive();
                    let response = self.router.dispatch(&req).await;

                    info!(
                        peer = %self.peer,
                        method = %req.method,
                        path = %req.path,
                        status = response.status.as_u16(),
                        "request handled"
                    );
                    ConnectionState::Dispatched(response, keep_alive)
                }

                ConnectionState::Dispatched(response, keep_alive) => {
                    let writer = ResponseWriter::new(response, &self.write_options(keep_alive));
                    ConnectionState::Writing(writer, keep_alive)
                }

                ConnectionState::Writing(mut writer, keep_alive) => {
                    writer.write_to_stream(&mut self.stream).await?;

                    if keep_alive {
                        // Fresh state for the next cycle on this connection.
                        let leftover = std::mem::take(&mut self.leftover);
                        ConnectionState::Reading(Accumulator::with_leftover(leftover))
                    } else {
                        ConnectionState::Closed
                    }
                }

                ConnectionState::Error(fault) => {
                    warn!(peer = %self.peer, error = %fault, "rejecting request");

                    let mut writer = ResponseWriter::new(fault.response(), &self.write_options(false));
                    if let Err(e) = writer.write_to_stream(&mut self.stream).await {
                        debug!(peer = %self.peer, error = %e, "error response not delivered");
                    }
                    ConnectionState::Closed
                }

                ConnectionState::Closed => break,
            };
        }

        if let Err(e) = self.stream.shutdown().await {
            trace!(peer = %self.peer, error = %e, "shutdown after close failed");
        }
        debug!(peer = %self.peer, "connection closed");

        Ok(())
    }

    async fn read_request(&mut self, mut acc: Accumulator) -> anyhow::Result<ConnectionState> {
        let mut chunk = [0u8; READ_CHUNK];

        loop {
            // Reject a declared body that cannot fit before reading any of it.
            let claimed = acc.declared_total().unwrap_or(0).max(acc.len());
            if claimed > self.settings.max_request_bytes {
                return Ok(ConnectionState::Error(ConnectionFault::TooLarge {
                    limit: self.settings.max_request_bytes,
                }));
            }

            if acc.is_complete() {
                if acc.is_ended() && acc.is_empty() {
                    // Peer closed between requests.
                    return Ok(ConnectionState::Closed);
                }

                let (bytes, leftover) = acc.finish();
                self.leftover = leftover;

                return Ok(match parse_request(&bytes) {
                    Ok(request) => ConnectionState::Parsed(request),
                    Err(e) => ConnectionState::Error(e.into()),
                });
            }

            match timeout(self.settings.read_timeout, self.stream.read(&mut chunk)).await {
                Err(_) if acc.awaits_end() => {
                    debug!(peer = %self.peer, "peer went quiet, taking unframed body as complete");
                    acc.on_end();
                }
                Err(_) if acc.is_empty() => {
                    debug!(peer = %self.peer, "idle connection timed out");
                    return Ok(ConnectionState::Closed);
                }
                Err(_) => return Ok(ConnectionState::Error(ConnectionFault::IdleTimeout)),
                Ok(Ok(0)) => acc.on_end(),
                Ok(Ok(n)) => acc.on_chunk(&chunk[..n]),
                Ok(Err(e)) => return Err(e.into()),
            }
        }
    }

    fn write_options(&self, keep_alive: bool) -> WriteOptions {
        WriteOptions {
            keep_alive,
            extra_headers: self.settings.extra_headers.clone(),
        }
    }
}
