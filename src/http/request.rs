use std::fmt;

use crate::http::form::{self, FormData};
use crate::http::headers::Headers;

/// HTTP request methods.
///
/// Only GET and POST carry behaviour of their own; every other token is kept
/// verbatim in `Other` so it can still be routed (normally to the 404 handler).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// POST - Submit data
    POST,
    /// Any other method token, as received
    Other(String),
}

/// Represents a parsed HTTP request from a client.
///
/// Contains everything extracted from the request line, headers and body.
/// `form` is filled in by the parser for form-encoded POST bodies.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// The HTTP method (GET, POST, etc.)
    pub method: Method,
    /// The raw request path without the query string (e.g. "/index.html")
    pub path: String,
    /// The raw query string after `?`, if any
    pub query: Option<String>,
    /// HTTP version (typically "HTTP/1.1")
    pub version: String,
    /// Request headers
    pub headers: Headers,
    /// Request body, exactly Content-Length bytes
    pub body: Vec<u8>,
    /// Decoded fields of a form-encoded POST body
    pub form: Option<FormData>,
}

/// Builder for constructing Request objects.
pub struct RequestBuilder {
    method: Option<Method>,
    path: Option<String>,
    query: Option<String>,
    version: Option<String>,
    headers: Headers,
    body: Vec<u8>,
}

impl Method {
    /// Parses an HTTP method token. Matching is case-sensitive, as in HTTP.
    ///
    /// # Example
    ///
    /// ```
    /// # use ferry::http::request::Method;
    /// assert_eq!(Method::parse("GET"), Method::GET);
    /// assert_eq!(Method::parse("get"), Method::Other("get".to_string()));
    /// ```
    pub fn parse(s: &str) -> Self {
        match s {
            "GET" => Method::GET,
            "POST" => Method::POST,
            other => Method::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::Other(s) => s,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: None,
            path: None,
            query: None,
            version: None,
            headers: Headers::new(),
            body: Vec::new(),
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the request target; anything after `?` becomes the query.
    pub fn path(mut self, target: impl Into<String>) -> Self {
        let (path, query) = split_target(&target.into());
        self.path = Some(path);
        self.query = query;
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key, value);
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Builds the request, decoding a form body the same way the parser does.
    pub fn build(self) -> Result<Request, &'static str> {
        let method = self.method.ok_or("method missing")?;
        let form = decode_form_body(&method, &self.headers, &self.body);

        Ok(Request {
            method,
            path: self.path.ok_or("path missing")?,
            query: self.query,
            version: self.version.unwrap_or_else(|| "HTTP/1.1".to_string()),
            headers: self.headers,
            body: self.body,
            form,
        })
    }
}

impl Request {
    /// Retrieves a header value by name, ignoring case.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key)
    }

    /// Determines whether the connection should remain open after the response.
    ///
    /// HTTP/1.1 defaults to keep-alive unless `Connection: close` is sent;
    /// HTTP/1.0 only stays open with an explicit `Connection: keep-alive`.
    pub fn keep_alive(&self) -> bool {
        keeps_alive(&self.version, self.header("Connection"))
    }

    /// Decodes the query string with form-encoding rules.
    pub fn query_params(&self) -> FormData {
        self.query
            .as_deref()
            .map(|q| form::decode(q.as_bytes()))
            .unwrap_or_default()
    }
}

pub(crate) fn keeps_alive(version: &str, connection: Option<&str>) -> bool {
    match connection {
        Some(v) if v.eq_ignore_ascii_case("close") => false,
        Some(v) if v.eq_ignore_ascii_case("keep-alive") => true,
        _ => version != "HTTP/1.0",
    }
}

/// Splits a request target into path and optional query string.
pub(crate) fn split_target(target: &str) -> (String, Option<String>) {
    match target.split_once('?') {
        Some((path, query)) => (path.to_string(), Some(query.to_string())),
        None => (target.to_string(), None),
    }
}

/// Decodes the body into form fields when the request is a form-encoded POST.
pub(crate) fn decode_form_body(method: &Method, headers: &Headers, body: &[u8]) -> Option<FormData> {
    let is_form = headers
        .get("Content-Type")
        .map(form::is_form_urlencoded)
        .unwrap_or(false);

    (*method == Method::POST && is_form).then(|| form::decode(body))
}
