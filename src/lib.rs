//! Ferry - a small HTTP request/response server core
//!
//! Connection handling, request parsing, exact-match routing and response
//! framing, plus a streaming digest utility.

pub mod config;
pub mod digest;
pub mod handlers;
pub mod http;
pub mod router;
pub mod server;
