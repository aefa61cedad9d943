//! Abstract browser-side request and response types.
//!
//! [`BrowserRequest`] is what a test composes: method, target URL, body
//! parameters, raw file descriptors, cookies, and extra server variables.
//! [`BrowserResponse`] is what a test inspects after the dispatch pipeline
//! ran: status, headers, and the body as text.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use http::{HeaderMap, Method, StatusCode};

use crate::params::{ParamMap, ParamValue};

/// Default `HTTP_HOST` seeded into every request.
const DEFAULT_HOST: &str = "localhost";

// =============================================================================
// File Upload
// =============================================================================

/// Raw browser-side file descriptor, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct FileUpload {
    /// Temporary file path on disk
    pub tmp_path: PathBuf,
    /// Original filename
    pub name: String,
    /// MIME type
    pub content_type: String,
    /// File size in bytes
    pub size: u64,
    /// PHP upload error code (0 = success)
    pub error: u8,
}

impl FileUpload {
    /// Creates a descriptor for a successful upload.
    pub fn new(
        tmp_path: impl Into<PathBuf>,
        name: impl Into<String>,
        content_type: impl Into<String>,
        size: u64,
    ) -> Self {
        FileUpload {
            tmp_path: tmp_path.into(),
            name: name.into(),
            content_type: content_type.into(),
            size,
            error: 0,
        }
    }

    /// Sets the PHP upload error code.
    pub fn with_error(mut self, error: u8) -> Self {
        self.error = error;
        self
    }

    /// Builds a descriptor from a file on disk.
    ///
    /// The filename comes from the last path component, the size from file
    /// metadata, and the MIME type from the extension.
    pub fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidInput, "path has no file name")
            })?
            .to_string();
        let size = std::fs::metadata(path)?.len();
        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Ok(FileUpload::new(path, name, content_type, size))
    }
}

/// Raw descriptor tree as composed by the test, nesting included.
#[derive(Debug, Clone, PartialEq)]
pub enum FileTree {
    /// Single descriptor.
    File(FileUpload),

    /// Positionally indexed descriptors.
    List(Vec<FileTree>),

    /// Field-keyed descriptors.
    Map(BTreeMap<String, FileTree>),
}

impl From<FileUpload> for FileTree {
    fn from(file: FileUpload) -> Self {
        FileTree::File(file)
    }
}

impl From<Vec<FileUpload>> for FileTree {
    fn from(files: Vec<FileUpload>) -> Self {
        FileTree::List(files.into_iter().map(FileTree::File).collect())
    }
}

// =============================================================================
// Browser Request
// =============================================================================

/// Abstract request composed by a test.
#[derive(Debug, Clone)]
pub struct BrowserRequest {
    method: Method,
    target: String,
    server: BTreeMap<String, String>,
    params: ParamMap,
    files: BTreeMap<String, FileTree>,
    cookies: BTreeMap<String, String>,
}

impl BrowserRequest {
    /// Creates a request with default server variables seeded.
    pub fn new(method: Method, target: impl Into<String>) -> Self {
        let mut server = BTreeMap::new();
        server.insert("HTTP_HOST".to_string(), DEFAULT_HOST.to_string());
        server.insert(
            "HTTP_USER_AGENT".to_string(),
            format!("browserkit/{}", crate::PKG_VERSION),
        );
        BrowserRequest {
            method,
            target: target.into(),
            server,
            params: ParamMap::new(),
            files: BTreeMap::new(),
            cookies: BTreeMap::new(),
        }
    }

    /// Creates a GET request.
    pub fn get(target: impl Into<String>) -> Self {
        BrowserRequest::new(Method::GET, target)
    }

    /// Creates a POST request.
    pub fn post(target: impl Into<String>) -> Self {
        BrowserRequest::new(Method::POST, target)
    }

    /// Creates a PUT request.
    pub fn put(target: impl Into<String>) -> Self {
        BrowserRequest::new(Method::PUT, target)
    }

    /// Creates a PATCH request.
    pub fn patch(target: impl Into<String>) -> Self {
        BrowserRequest::new(Method::PATCH, target)
    }

    /// Creates a DELETE request.
    pub fn delete(target: impl Into<String>) -> Self {
        BrowserRequest::new(Method::DELETE, target)
    }

    /// Sets a body parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Sets a server variable.
    pub fn server(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.server.insert(key.into(), value.into());
        self
    }

    /// Sets a request cookie.
    pub fn cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    /// Attaches a single file descriptor to a field.
    pub fn file(mut self, field: impl Into<String>, file: FileUpload) -> Self {
        self.files.insert(field.into(), FileTree::File(file));
        self
    }

    /// Attaches a descriptor tree to a field, for nested or indexed uploads.
    pub fn file_tree(mut self, field: impl Into<String>, tree: FileTree) -> Self {
        self.files.insert(field.into(), tree);
        self
    }

    /// HTTP method.
    #[inline]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Target URL as composed, origin included.
    #[inline]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Server variables.
    #[inline]
    pub fn server_vars(&self) -> &BTreeMap<String, String> {
        &self.server
    }

    /// Body parameters.
    #[inline]
    pub fn params(&self) -> &ParamMap {
        &self.params
    }

    /// Raw file descriptor trees, keyed by field.
    #[inline]
    pub fn files(&self) -> &BTreeMap<String, FileTree> {
        &self.files
    }

    /// Request cookies.
    #[inline]
    pub fn cookies(&self) -> &BTreeMap<String, String> {
        &self.cookies
    }
}

// =============================================================================
// Browser Response
// =============================================================================

/// Plain response handed back to the test.
#[derive(Debug, Clone)]
pub struct BrowserResponse {
    body: String,
    status: StatusCode,
    headers: HeaderMap,
}

impl BrowserResponse {
    pub(crate) fn new(body: String, status: StatusCode, headers: HeaderMap) -> Self {
        BrowserResponse {
            body,
            status,
            headers,
        }
    }

    /// Response body as text.
    #[inline]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Response status.
    #[inline]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// All response headers.
    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// First value of a header, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}
