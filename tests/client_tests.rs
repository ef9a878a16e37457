//! Unit and mock HTTP tests for ScreenshotClient.
//!
//! These tests cover:
//! - Client creation and configuration
//! - Request formatting
//! - Error mapping for non-success statuses
//! - Streaming captures to disk
//! - Cleanup after a response body is cut short

use ascii_snap::client::{partial_path, ClientError, ScreenshotClient, DEFAULT_SERVICE_URL};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FAKE_PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake-image-data";

// === Client Creation Tests ===

#[test]
fn test_new_creates_client() {
    let client = ScreenshotClient::new("http://localhost:3000/api/html-to-image").unwrap();
    assert_eq!(client.url(), "http://localhost:3000/api/html-to-image");
}

#[test]
fn test_new_rejects_empty_url() {
    assert!(matches!(ScreenshotClient::new(""), Err(ClientError::MissingUrl)));
}

#[test]
fn test_default_service_url_is_local() {
    assert!(DEFAULT_SERVICE_URL.starts_with("http://127.0.0.1:"));
    assert!(DEFAULT_SERVICE_URL.ends_with("/api/html-to-image"));
}

// === Mock Server Tests ===

#[tokio::test]
async fn test_capture_posts_json_markup() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/html-to-image"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(serde_json::json!({ "html": "<pre>hi</pre>" })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "image/png")
                .insert_header("x-ascii-renderer", "clip-singlepass-20x10")
                .set_body_bytes(FAKE_PNG),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client =
        ScreenshotClient::new(format!("{}/api/html-to-image", mock_server.uri())).unwrap();
    let png = client.capture("<pre>hi</pre>").await.unwrap();
    assert_eq!(png, FAKE_PNG);
}

#[tokio::test]
async fn test_capture_maps_client_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Missing html"))
        .mount(&mock_server)
        .await;

    let client = ScreenshotClient::new(mock_server.uri()).unwrap();
    let err = client.capture("<pre></pre>").await.unwrap_err();
    match err {
        ClientError::Service { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Missing html");
        }
        other => panic!("Expected Service error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_capture_maps_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Render failed: boom"))
        .mount(&mock_server)
        .await;

    let client = ScreenshotClient::new(mock_server.uri()).unwrap();
    let err = client.capture("<pre>x</pre>").await.unwrap_err();
    assert!(matches!(err, ClientError::Service { status: 500, .. }));
    assert_eq!(
        err.to_string(),
        "Screenshot service returned 500: Render failed: boom"
    );
}

#[tokio::test]
async fn test_capture_to_file_streams_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(FAKE_PNG))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("nested").join("dir").join("art.png");

    let client = ScreenshotClient::new(mock_server.uri()).unwrap();
    let path = client.capture_to_file("<pre>x</pre>", &dest).await.unwrap();

    assert_eq!(path, dest);
    assert_eq!(std::fs::read(&dest).unwrap(), FAKE_PNG);
}

#[tokio::test]
async fn test_capture_to_file_writes_nothing_on_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(405).set_body_string("Use POST"))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("art.png");

    let client = ScreenshotClient::new(mock_server.uri()).unwrap();
    let result = client.capture_to_file("<pre>x</pre>", &dest).await;

    assert!(matches!(result, Err(ClientError::Service { status: 405, .. })));
    assert!(!dest.exists());
}

/// Serve one request with a PNG response that promises more bytes than it sends.
async fn spawn_truncating_service() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        // Drain the request so closing the socket does not reset it
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&request).to_string();
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .find_map(|l| {
                        let (name, value) = l.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if request.len() >= end + 4 + length {
                    break;
                }
            }
        }

        let head = "HTTP/1.1 200 OK\r\nContent-Type: image/png\r\nContent-Length: 1000\r\n\r\n";
        socket.write_all(head.as_bytes()).await.unwrap();
        socket.write_all(FAKE_PNG).await.unwrap();
        socket.flush().await.unwrap();
        socket.shutdown().await.unwrap();
    });

    format!("http://{}/api/html-to-image", addr)
}

#[tokio::test]
async fn test_capture_to_file_cleans_up_truncated_body() {
    let url = spawn_truncating_service().await;

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("art.png");
    std::fs::write(&dest, b"previous capture").unwrap();

    let client = ScreenshotClient::new(url).unwrap();
    let result = client.capture_to_file("<pre>x</pre>", &dest).await;

    assert!(matches!(result, Err(ClientError::Http(_))), "{:?}", result);
    assert_eq!(std::fs::read(&dest).unwrap(), b"previous capture");
    assert!(!partial_path(&dest).exists());
}

#[tokio::test]
async fn test_capture_to_file_leaves_no_partial_file() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(FAKE_PNG))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("art.png");

    let client = ScreenshotClient::new(mock_server.uri()).unwrap();
    client.capture_to_file("<pre>x</pre>", &dest).await.unwrap();

    assert_eq!(std::fs::read(&dest).unwrap(), FAKE_PNG);
    assert!(!partial_path(&dest).exists());
}

#[tokio::test]
async fn test_unreachable_service_is_http_error() {
    // Nothing listens on port 9 (discard) in the test environment
    let client = ScreenshotClient::new("http://127.0.0.1:9/api/html-to-image").unwrap();
    let result = client.capture("<pre>x</pre>").await;
    assert!(matches!(result, Err(ClientError::Http(_))));
}
