//! Framework-native response types, the streamed subtype included.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use http::header::{self, HeaderName, HeaderValue};
use http::{HeaderMap, StatusCode};

use crate::cookie::CookieRecord;

// =============================================================================
// Native Response
// =============================================================================

/// Framework response as the dispatch pipeline produces it.
///
/// Cookies set through the framework's response API arrive structured; a
/// streamed file download carries a path instead of a body (never both).
#[derive(Debug, Clone)]
pub struct NativeResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: String,
    cookies: Vec<CookieRecord>,
    file: Option<PathBuf>,
}

impl NativeResponse {
    /// Creates a response from status, body, and headers.
    pub fn new(status: StatusCode, body: impl Into<String>, headers: HeaderMap) -> Self {
        NativeResponse {
            status,
            headers,
            body: body.into(),
            cookies: Vec::new(),
            file: None,
        }
    }

    /// Creates a 200 OK response with body.
    #[inline]
    pub fn ok(body: impl Into<String>) -> Self {
        NativeResponse::new(StatusCode::OK, body, HeaderMap::new())
    }

    /// Creates an empty response with the given status.
    #[inline]
    pub fn empty(status: StatusCode) -> Self {
        NativeResponse::new(status, String::new(), HeaderMap::new())
    }

    // Modifiers

    /// Sets the status code.
    #[inline]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Sets a header, replacing previous values of the same name.
    #[inline]
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::try_from(name.as_ref()),
            HeaderValue::try_from(value.as_ref()),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Appends a header value, keeping previous values of the same name.
    #[inline]
    pub fn with_added_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::try_from(name.as_ref()),
            HeaderValue::try_from(value.as_ref()),
        ) {
            self.headers.append(name, value);
        }
        self
    }

    /// Sets the body.
    #[inline]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Attaches a structured cookie.
    #[inline]
    pub fn with_cookie(mut self, cookie: CookieRecord) -> Self {
        self.cookies.push(cookie);
        self
    }

    /// Attaches a streamed file path.
    #[inline]
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    // Getters

    /// Status code.
    #[inline]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// All headers.
    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// First value of a header, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Response body.
    #[inline]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Structured cookies attached to the response.
    #[inline]
    pub fn cookies(&self) -> &[CookieRecord] {
        &self.cookies
    }

    /// Streamed file path, when the response is a file download.
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Raw `Set-Cookie` header values, in insertion order.
    pub fn set_cookie_headers(&self) -> Vec<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .map(str::to_string)
            .collect()
    }

    // Status checks

    /// Whether this is a successful response (2xx).
    #[inline]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Whether this is a server error (5xx).
    #[inline]
    pub fn is_server_error(&self) -> bool {
        self.status.is_server_error()
    }
}

// =============================================================================
// Stream Response
// =============================================================================

/// Backing store of a [`StreamResponse`] body.
#[derive(Debug, Clone)]
pub enum StreamBody {
    /// Body streamed from a file on disk.
    PlainFile(PathBuf),

    /// Body held in memory.
    Buffer(Bytes),
}

/// Lightweight server-layer response.
///
/// Produced when the pipeline short-circuits below the framework's response
/// builder. Carries no structured cookies; anything cookie-shaped lives in
/// raw `Set-Cookie` headers.
#[derive(Debug, Clone)]
pub struct StreamResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: StreamBody,
}

impl StreamResponse {
    /// Creates a stream response.
    pub fn new(status: StatusCode, headers: HeaderMap, body: StreamBody) -> Self {
        StreamResponse {
            status,
            headers,
            body,
        }
    }

    /// Status code.
    #[inline]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// All headers.
    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Body backing store.
    #[inline]
    pub fn body(&self) -> &StreamBody {
        &self.body
    }
}

// =============================================================================
// Pipeline Response
// =============================================================================

/// What one dispatch run hands back to the connector.
#[derive(Debug, Clone)]
pub enum PipelineResponse {
    /// Full framework response.
    Native(NativeResponse),

    /// Lightweight response needing conversion before translation.
    Stream(StreamResponse),
}

impl From<NativeResponse> for PipelineResponse {
    fn from(response: NativeResponse) -> Self {
        PipelineResponse::Native(response)
    }
}

impl From<StreamResponse> for PipelineResponse {
    fn from(response: StreamResponse) -> Self {
        PipelineResponse::Stream(response)
    }
}
