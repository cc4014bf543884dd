//! HTTP protocol implementation.
//!
//! A deliberately small HTTP/1.x subset: requests framed by Content-Length,
//! responses always framed by Content-Length, optional keep-alive.
//!
//! # Architecture
//!
//! - **`accumulator`**: Buffers incoming chunks until a request is complete
//! - **`parser`**: Parses complete request (and response) buffers
//! - **`headers`**: Ordered, case-insensitive header map
//! - **`form`**: `application/x-www-form-urlencoded` decoding
//! - **`request`**: HTTP request representation
//! - **`response`**: HTTP response representation with builder pattern
//! - **`writer`**: Serializes and writes HTTP responses to the client
//! - **`mime`**: MIME type lookup based on file extensions
//! - **`connection`**: The per-connection request/response state machine
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │  Accepted   │
//!        └──────┬──────┘
//!               ▼
//!        ┌─────────────┐  chunk
//!        │   Reading   │◄──────┐ ← Accumulate request bytes
//!        └──┬───────┬──┘───────┘
//!  complete │       │ too large / idle
//!           ▼       ▼
//!     ┌────────┐  ┌───────┐
//!     │ Parsed │─►│ Error │ ← 400 / 408 / 413, then close
//!     └───┬────┘  └───┬───┘
//!         ▼           │
//!   ┌────────────┐    │
//!   │ Dispatched │    │   ← Handler produced a response
//!   └─────┬──────┘    │
//!         ▼           │
//!   ┌────────────┐    │
//!   │  Writing   │    │   ← Send response to client
//!   └─────┬──────┘    │
//!         ├─ Keep-Alive → Reading (fresh state)
//!         ▼           ▼
//!        ┌─────────────┐
//!        │   Closed    │
//!        └─────────────┘
//! ```

pub mod accumulator;
pub mod connection;
pub mod form;
pub mod headers;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
