use ferry::http::headers::Headers;
use ferry::http::parser::parse_response;
use ferry::http::response::{Response, ResponseBuilder, StatusCode};
use ferry::http::writer::{ResponseWriter, WriteOptions};

async fn write(response: Response, options: &WriteOptions) -> Vec<u8> {
    let mut out = Vec::new();
    ResponseWriter::new(response, options)
        .write_to_stream(&mut out)
        .await
        .unwrap();
    out
}

fn count_header(raw: &[u8], name: &str) -> usize {
    let text = String::from_utf8_lossy(raw);
    let head = text.split("\r\n\r\n").next().unwrap_or("");
    head.lines()
        .filter(|line| {
            line.split_once(':')
                .map(|(k, _)| k.trim().eq_ignore_ascii_case(name))
                .unwrap_or(false)
        })
        .count()
}

#[tokio::test]
async fn test_round_trip_through_client_parser() {
    let response = ResponseBuilder::new(StatusCode::from_u16(201))
        .header("Content-Type", "application/json")
        .header("X-Request-Id", "abc-123")
        .body(r#"{"ok":true}"#)
        .build();

    let raw = write(response, &WriteOptions::default()).await;
    let parsed = parse_response(&raw).unwrap();

    assert_eq!(parsed.status.as_u16(), 201);
    assert_eq!(parsed.reason, "Created");
    assert_eq!(parsed.headers.get("content-type"), Some("application/json"));
    assert_eq!(parsed.headers.get("x-request-id"), Some("abc-123"));
    assert_eq!(parsed.headers.get("content-length"), Some("11"));
    assert_eq!(parsed.body, br#"{"ok":true}"#.to_vec());
}

#[tokio::test]
async fn test_status_line_comes_first() {
    let raw = write(Response::not_found(), &WriteOptions::default()).await;
    assert!(raw.starts_with(b"HTTP/1.1 404 Not Found\r\n"));
}

#[tokio::test]
async fn test_content_type_defaults_to_html() {
    let raw = write(Response::ok("<p>x</p>"), &WriteOptions::default()).await;
    let parsed = parse_response(&raw).unwrap();

    assert_eq!(parsed.headers.get("Content-Type"), Some("text/html"));
    assert_eq!(count_header(&raw, "content-type"), 1);
}

#[tokio::test]
async fn test_content_length_exactly_once() {
    let response = ResponseBuilder::new(StatusCode::OK)
        .header("Content-Length", "999")
        .header("Transfer-Encoding", "chunked")
        .body("four")
        .build();

    let raw = write(response, &WriteOptions::default()).await;

    assert_eq!(count_header(&raw, "content-length"), 1);
    assert_eq!(count_header(&raw, "transfer-encoding"), 0);
    assert_eq!(parse_response(&raw).unwrap().body, b"four".to_vec());
}

#[tokio::test]
async fn test_extra_headers_do_not_override_handler() {
    let options = WriteOptions {
        keep_alive: false,
        extra_headers: [("X-Powered-By", "bacon"), ("Content-Type", "text/css")]
            .into_iter()
            .collect::<Headers>(),
    };
    let response = Response::text(StatusCode::OK, "plain");

    let parsed = parse_response(&write(response, &options).await).unwrap();

    assert_eq!(parsed.headers.get("X-Powered-By"), Some("bacon"));
    assert_eq!(parsed.headers.get("Content-Type"), Some("text/plain"));
    assert_eq!(parsed.headers.get("Connection"), Some("close"));
}

#[tokio::test]
async fn test_keep_alive_header() {
    let options = WriteOptions {
        keep_alive: true,
        ..Default::default()
    };
    let parsed = parse_response(&write(Response::ok(""), &options).await).unwrap();

    assert_eq!(parsed.headers.get("Connection"), Some("keep-alive"));
    assert_eq!(parsed.headers.get("Content-Length"), Some("0"));
}

#[tokio::test]
async fn test_stream_body_written_after_head() {
    let data: &'static [u8] = b"0123456789";
    let response = ResponseBuilder::new(StatusCode::OK).stream(data, 10).build();

    let raw = write(response, &WriteOptions::default()).await;
    let parsed = parse_response(&raw).unwrap();

    assert_eq!(parsed.headers.get("Content-Length"), Some("10"));
    assert_eq!(parsed.body, b"0123456789".to_vec());
}

#[tokio::test]
async fn test_short_stream_is_an_error() {
    let data: &'static [u8] = b"short";
    let response = ResponseBuilder::new(StatusCode::OK).stream(data, 50).build();

    let mut out = Vec::new();
    let result = ResponseWriter::new(response, &WriteOptions::default())
        .write_to_stream(&mut out)
        .await;

    assert!(result.is_err());
}
