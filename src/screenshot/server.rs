//! HTTP screenshot service.
//!
//! Accepts `POST` with either a raw HTML body or a JSON object `{"html": "..."}`
//! and answers with the PNG capture of the document's `<pre>` block.
//!
//! | Condition                          | Status | Body                 |
//! |------------------------------------|--------|----------------------|
//! | method other than POST             | 405    | `Use POST`           |
//! | empty or missing markup            | 400    | `Missing html`       |
//! | markup without a `<pre>`           | 400    | `Missing <pre> block`|
//! | body larger than the limit         | 413    | error message        |
//! | render failure                     | 500    | error message        |
//! | success                            | 200    | PNG bytes            |

use std::io::Read;

use serde::Deserialize;

use super::{has_content_block, RenderError, Renderer};

/// Header carrying the capture mode and size, e.g. `clip-singlepass-800x600`.
pub const RENDERER_HEADER: &str = "x-ascii-renderer";

/// Default request body limit (32 MiB).
pub const DEFAULT_MAX_BODY_BYTES: u64 = 32 * 1024 * 1024;

const CONTENT_TYPE_PNG: &str = "image/png";
const CONTENT_TYPE_TEXT: &str = "text/plain; charset=utf-8";

#[derive(Debug, Deserialize)]
struct MarkupPayload {
    #[serde(default)]
    html: Option<String>,
}

/// A response produced by [`ScreenshotService::handle`], independent of the
/// HTTP server in use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl ServiceResponse {
    fn text(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            headers: vec![("Content-Type".to_string(), CONTENT_TYPE_TEXT.to_string())],
            body: message.into().into_bytes(),
        }
    }

    /// Look up a header value, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The body as UTF-8 text (lossy).
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Extract the markup from a request body.
///
/// JSON content types are parsed as `{"html": "..."}`; anything else is taken
/// as the raw document. Returns `None` when no non-empty markup is present.
pub fn extract_markup(content_type: Option<&str>, body: &[u8]) -> Option<String> {
    let is_json = content_type
        .map(|ct| ct.to_ascii_lowercase().contains("application/json"))
        .unwrap_or(false);

    let markup = if is_json {
        serde_json::from_slice::<MarkupPayload>(body)
            .ok()
            .and_then(|p| p.html)
    } else {
        String::from_utf8(body.to_vec()).ok()
    }?;

    if markup.trim().is_empty() {
        None
    } else {
        Some(markup)
    }
}

/// Read a request body of at most `limit` bytes.
///
/// Larger bodies are answered with 413 without reading past the limit.
pub fn read_body<B: Read>(body: B, limit: u64) -> Result<Vec<u8>, ServiceResponse> {
    let mut buf = Vec::new();
    body.take(limit.saturating_add(1))
        .read_to_end(&mut buf)
        .map_err(|e| ServiceResponse::text(400, format!("Failed to read body: {}", e)))?;
    if buf.len() as u64 > limit {
        return Err(ServiceResponse::text(
            413,
            format!("Request body exceeds {} bytes", limit),
        ));
    }
    Ok(buf)
}

/// Screenshot service around a [`Renderer`].
#[derive(Debug)]
pub struct ScreenshotService<R> {
    renderer: R,
    max_body: u64,
}

impl<R: Renderer> ScreenshotService<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            max_body: DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// Set the request body limit used by [`serve`](Self::serve).
    pub fn with_max_body(mut self, bytes: u64) -> Self {
        self.max_body = bytes;
        self
    }

    pub fn max_body(&self) -> u64 {
        self.max_body
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Handle one request.
    ///
    /// # Arguments
    /// * `method` - HTTP method, compared case-insensitively
    /// * `content_type` - value of the `Content-Type` header, if any
    /// * `body` - raw request body
    pub fn handle(&self, method: &str, content_type: Option<&str>, body: &[u8]) -> ServiceResponse {
        if !method.eq_ignore_ascii_case("POST") {
            return ServiceResponse::text(405, "Use POST");
        }

        let Some(markup) = extract_markup(content_type, body) else {
            return ServiceResponse::text(400, RenderError::MissingMarkup.to_string());
        };
        if !has_content_block(&markup) {
            return ServiceResponse::text(400, RenderError::MissingContentBlock.to_string());
        }

        match self.renderer.render(&markup) {
            Ok(capture) => ServiceResponse {
                status: 200,
                headers: vec![
                    ("Content-Type".to_string(), CONTENT_TYPE_PNG.to_string()),
                    ("Cache-Control".to_string(), "no-store".to_string()),
                    (
                        RENDERER_HEADER.to_string(),
                        format!("clip-singlepass-{}x{}", capture.width, capture.height),
                    ),
                ],
                body: capture.png,
            },
            Err(e) if e.is_client_error() => ServiceResponse::text(400, e.to_string()),
            Err(e) => {
                log::error!("Render failed: {}", e);
                ServiceResponse::text(500, e.to_string())
            }
        }
    }

    /// Serve requests until the server is unblocked.
    ///
    /// Requests are handled one at a time; each render owns its own browser.
    pub fn serve(&self, server: &tiny_http::Server) {
        for mut request in server.incoming_requests() {
            let method = request.method().to_string();
            let content_type = request
                .headers()
                .iter()
                .find(|h| h.field.equiv("Content-Type"))
                .map(|h| h.value.as_str().to_string());

            let response = match read_body(request.as_reader(), self.max_body) {
                Ok(body) => self.handle(&method, content_type.as_deref(), &body),
                Err(rejected) => rejected,
            };

            log::info!("{} {} -> {}", method, request.url(), response.status);
            if let Err(e) = request.respond(to_http_response(response)) {
                log::warn!("Failed to send response: {}", e);
            }
        }
        log::info!("Screenshot service stopped");
    }
}

fn to_http_response(response: ServiceResponse) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let mut http = tiny_http::Response::from_data(response.body)
        .with_status_code(tiny_http::StatusCode(response.status));
    for (name, value) in &response.headers {
        match tiny_http::Header::from_bytes(name.as_bytes(), value.as_bytes()) {
            Ok(header) => http.add_header(header),
            Err(()) => log::warn!("Dropping invalid header {}", name),
        }
    }
    http
}
