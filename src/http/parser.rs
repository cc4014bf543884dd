use thiserror::Error;

use crate::http::headers::Headers;
use crate::http::request::{Method, Request, decode_form_body, keeps_alive, split_target};
use crate::http::response::StatusCode;

const HEAD_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Why a buffered message could not be turned into a request or response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty request")]
    Empty,

    #[error("message head is not valid UTF-8")]
    InvalidEncoding,

    #[error("malformed request line: {0:?}")]
    MalformedRequestLine(String),

    #[error("malformed status line: {0:?}")]
    MalformedStatusLine(String),

    #[error("header line without colon: {0:?}")]
    MalformedHeader(String),

    #[error("invalid Content-Length: {0:?}")]
    InvalidContentLength(String),

    #[error("unsupported Transfer-Encoding: {0:?}")]
    UnsupportedTransferEncoding(String),

    #[error("body truncated: expected {expected} bytes, received {received}")]
    TruncatedBody { expected: usize, received: usize },
}

/// A response as seen from the client side of the connection.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedResponse {
    pub version: String,
    pub status: StatusCode,
    pub reason: String,
    pub headers: Headers,
    pub body: Vec<u8>,
}

/// Parses a complete, buffered HTTP request.
///
/// The buffer must hold the whole request: the head and, when Content-Length
/// is declared, at least that many body bytes. Without a declared length the
/// body is whatever follows the head.
pub fn parse_request(buf: &[u8]) -> Result<Request, ParseError> {
    let (head, body_bytes) = split_head(buf);

    let mut lines = head_lines(head)?;

    let request_line = lines.next().ok_or(ParseError::Empty)?;
    let mut parts = request_line.split_whitespace();

    let malformed = || ParseError::MalformedRequestLine(request_line.to_string());
    let method_str = parts.next().ok_or_else(malformed)?;
    let target = parts.next().ok_or_else(malformed)?;
    let version = parts.next().ok_or_else(malformed)?;
    if parts.next().is_some() {
        return Err(malformed());
    }

    let method = Method::parse(method_str);
    let (path, query) = split_target(target);

    let headers = parse_headers(lines)?;

    if let Some(te) = headers.get("Transfer-Encoding") {
        if !te.eq_ignore_ascii_case("identity") {
            return Err(ParseError::UnsupportedTransferEncoding(te.to_string()));
        }
    }

    let body = take_body(&headers, body_bytes)?;
    let form = decode_form_body(&method, &headers, &body);

    Ok(Request {
        method,
        path,
        query,
        version: version.to_string(),
        headers,
        body,
        form,
    })
}

/// Parses a complete, buffered HTTP response the way a client would.
pub fn parse_response(buf: &[u8]) -> Result<ParsedResponse, ParseError> {
    let (head, body_bytes) = split_head(buf);

    let mut lines = head_lines(head)?;

    let status_line = lines.next().ok_or(ParseError::Empty)?;
    let malformed = || ParseError::MalformedStatusLine(status_line.to_string());

    let mut parts = status_line.splitn(3, ' ');
    let version = parts.next().filter(|v| v.starts_with("HTTP/")).ok_or_else(malformed)?;
    let code: u16 = parts
        .next()
        .and_then(|c| c.parse().ok())
        .ok_or_else(malformed)?;
    let reason = parts.next().unwrap_or("").to_string();

    let headers = parse_headers(lines)?;
    let body = take_body(&headers, body_bytes)?;

    Ok(ParsedResponse {
        version: version.to_string(),
        status: StatusCode::from_u16(code),
        reason,
        headers,
        body,
    })
}

/// Returns the offset just past the blank line ending the message head.
pub(crate) fn find_head_end(buf: &[u8]) -> Option<usize> {
    buf.windows(HEAD_TERMINATOR.len())
        .position(|w| w == HEAD_TERMINATOR)
        .map(|pos| pos + HEAD_TERMINATOR.len())
}

/// Reads a Content-Length value out of a raw, possibly partial, head.
pub(crate) fn declared_content_length(head: &[u8]) -> Result<Option<usize>, ParseError> {
    let text = std::str::from_utf8(head).map_err(|_| ParseError::InvalidEncoding)?;
    let mut declared = None;

    for line in text.split("\r\n").skip(1) {
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("Content-Length") {
                declared = Some(parse_content_length(value)?);
            }
        }
    }

    Ok(declared)
}

/// Whether a request head with no declared length carries a body that only
/// ends when the peer closes its side.
///
/// That holds for a request that will not be kept alive and whose method may
/// carry a body. GET and HEAD, and every keep-alive request, end with the head.
pub(crate) fn body_runs_to_end(head: &[u8]) -> bool {
    let Ok(text) = std::str::from_utf8(head) else {
        return false;
    };

    let mut lines = text.split("\r\n").skip_while(|line| line.is_empty());
    let mut parts = match lines.next() {
        Some(line) => line.split_whitespace(),
        None => return false,
    };
    let (Some(method), Some(_), Some(version)) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if method.eq_ignore_ascii_case("GET") || method.eq_ignore_ascii_case("HEAD") {
        return false;
    }

    let connection = lines
        .filter_map(|line| line.split_once(':'))
        .filter(|(name, _)| name.trim().eq_ignore_ascii_case("Connection"))
        .map(|(_, value)| value.trim())
        .last();

    !keeps_alive(version, connection)
}

// A buffer that ended without a blank line is all head.
fn split_head(buf: &[u8]) -> (&[u8], &[u8]) {
    match find_head_end(buf) {
        Some(end) => (&buf[..end - HEAD_TERMINATOR.len()], &buf[end..]),
        None => (buf, &[]),
    }
}

fn head_lines(head: &[u8]) -> Result<impl Iterator<Item = &str>, ParseError> {
    let text = std::str::from_utf8(head).map_err(|_| ParseError::InvalidEncoding)?;

    Ok(text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .skip_while(|line| line.is_empty()))
}

fn parse_headers<'a>(lines: impl Iterator<Item = &'a str>) -> Result<Headers, ParseError> {
    let mut headers = Headers::new();

    for line in lines {
        if line.is_empty() {
            continue;
        }

        let (key, value) = line
            .split_once(':')
            .ok_or_else(|| ParseError::MalformedHeader(line.to_string()))?;

        headers.insert(key.trim(), value.trim());
    }

    Ok(headers)
}

fn parse_content_length(value: &str) -> Result<usize, ParseError> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|_| ParseError::InvalidContentLength(value.trim().to_string()))
}

fn take_body(headers: &Headers, body_bytes: &[u8]) -> Result<Vec<u8>, ParseError> {
    let content_length = headers
        .get("Content-Length")
        .map(parse_content_length)
        .transpose()?;

    match content_length {
        Some(expected) if body_bytes.len() < expected => Err(ParseError::TruncatedBody {
            expected,
            received: body_bytes.len(),
        }),
        Some(expected) => Ok(body_bytes[..expected].to_vec()),
        None => Ok(body_bytes.to_vec()),
    }
}
