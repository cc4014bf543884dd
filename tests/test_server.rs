//! End-to-end tests against the real route table over TCP.

use std::net::SocketAddr;
use std::sync::Arc;

use ferry::config::Config;
use ferry::http::connection::ConnectionSettings;
use ferry::http::parser::{ParsedResponse, parse_response};
use ferry::http::response::StatusCode;
use ferry::server::{build_router, listener};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

struct TestServer {
    addr: SocketAddr,
    _public: TempDir,
}

async fn start(index_html: Option<&str>) -> TestServer {
    let public = tempfile::tempdir().unwrap();
    let index_path = public.path().join("index.html");
    if let Some(html) = index_html {
        std::fs::write(&index_path, html).unwrap();
    }

    let mut cfg = Config::default();
    cfg.static_files.index_path = index_path;
    cfg.extra_headers
        .insert("X-Powered-By".to_string(), "bacon".to_string());

    let tcp = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = tcp.local_addr().unwrap();

    let router = Arc::new(build_router(&cfg));
    let settings = Arc::new(ConnectionSettings::from_config(&cfg));
    tokio::spawn(listener::serve(tcp, router, settings));

    TestServer {
        addr,
        _public: public,
    }
}

async fn send(addr: SocketAddr, raw: &[u8]) -> ParsedResponse {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw).await.unwrap();

    let mut out = Vec::new();
    stream.read_to_end(&mut out).await.unwrap();
    parse_response(&out).unwrap()
}

fn form_post(body: &str) -> Vec<u8> {
    format!(
        "POST / HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/x-www-form-urlencoded\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    )
    .into_bytes()
}

#[tokio::test]
async fn test_get_index_serves_file() {
    let server = start(Some("<p>hi</p>")).await;

    let response = send(server.addr, b"GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.headers.get("Content-Type"), Some("text/html"));
    assert_eq!(response.body, b"<p>hi</p>".to_vec());
    assert_eq!(response.headers.get("X-Powered-By"), Some("bacon"));
}

#[tokio::test]
async fn test_get_index_missing_file_is_404() {
    let server = start(None).await;

    let response = send(server.addr, b"GET / HTTP/1.1\r\nConnection: close\r\n\r\n").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_post_form_greets() {
    let server = start(None).await;

    let response = send(server.addr, &form_post("first=Ada&last=Lovelace")).await;
    let body = String::from_utf8(response.body).unwrap();

    assert_eq!(response.status, StatusCode::OK);
    assert!(body.contains("Greetings Ada!"));
    assert!(body.contains("first=Ada&last=Lovelace"));
}

#[tokio::test]
async fn test_post_form_without_length_reads_to_close() {
    let server = start(None).await;

    let mut stream = TcpStream::connect(server.addr).await.unwrap();
    stream
        .write_all(b"POST / HTTP/1.0\r\nContent-Type: application/x-www-form-urlencoded\r\n\r\nfirst=Ada")
        .await
        .unwrap();
    stream.shutdown().await.unwrap();

    let mut out = Vec::new();
    stream.read_to_end(&mut out).await.unwrap();
    let response = parse_response(&out).unwrap();
    let body = String::from_utf8(response.body).unwrap();

    assert_eq!(response.status, StatusCode::OK);
    assert!(body.contains("Greetings Ada!"));
    assert!(body.contains("first=Ada"));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let server = start(Some("<p>hi</p>")).await;

    let response = send(server.addr, b"GET /missing HTTP/1.1\r\nConnection: close\r\n\r\n").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_other_method_routes_to_default_handler() {
    let server = start(Some("<p>hi</p>")).await;

    let response = send(server.addr, b"PUT / HTTP/1.1\r\nContent-Length: 0\r\nConnection: close\r\n\r\n").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_parse_fault_does_not_affect_next_connection() {
    let server = start(Some("<p>hi</p>")).await;

    let bad = send(server.addr, b"GET HTTP/1.1\r\n\r\n").await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);

    let good = send(server.addr, b"GET /hello HTTP/1.1\r\nConnection: close\r\n\r\n").await;
    assert_eq!(good.status, StatusCode::OK);
    assert!(String::from_utf8(good.body).unwrap().contains("Hello, World!"));
}

#[tokio::test]
async fn test_concurrent_connections_are_independent() {
    let server = start(Some("<p>hi</p>")).await;

    // Holds a connection open mid-request while others are served.
    let mut stalled = TcpStream::connect(server.addr).await.unwrap();
    stalled.write_all(b"POST / HTTP/1.1\r\nContent-Length: 100\r\n\r\npartial").await.unwrap();

    let mut tasks = Vec::new();
    for i in 0..8 {
        let addr = server.addr;
        tasks.push(tokio::spawn(async move {
            let body = format!("first=user{i}");
            send(addr, &form_post(&body)).await
        }));
    }

    for (i, task) in tasks.into_iter().enumerate() {
        let response = task.await.unwrap();
        let body = String::from_utf8(response.body).unwrap();
        assert!(body.contains(&format!("Greetings user{i}!")));
    }
}

#[tokio::test]
async fn test_digest_route() {
    let server = start(None).await;

    let response = send(
        server.addr,
        b"POST /digest HTTP/1.1\r\nContent-Length: 3\r\nConnection: close\r\n\r\nabc",
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, b"a9993e364706816aba3e25717850c26c9cd0d89d".to_vec());
}
