//! Framework-native request handed to the dispatch pipeline.

use std::collections::BTreeMap;
use std::sync::Arc;

use http::Method;

use crate::params::ParamMap;
use crate::session::Session;
use crate::uploads::UploadTree;

/// Request in the shape the application under test expects.
///
/// Built by the request translator, never directly by tests. The environment
/// map plays the role of PHP's `$_SERVER`, uploads are already normalized,
/// and the session handle is shared with the connector.
#[derive(Debug, Clone)]
pub struct NativeRequest {
    url: String,
    post: ParamMap,
    files: BTreeMap<String, UploadTree>,
    cookies: BTreeMap<String, String>,
    environment: BTreeMap<String, String>,
    session: Arc<Session>,
}

impl NativeRequest {
    pub(crate) fn new(
        url: String,
        post: ParamMap,
        files: BTreeMap<String, UploadTree>,
        cookies: BTreeMap<String, String>,
        environment: BTreeMap<String, String>,
        session: Arc<Session>,
    ) -> Self {
        NativeRequest {
            url,
            post,
            files,
            cookies,
            environment,
            session,
        }
    }

    /// Request URL: path plus optional query string, origin already stripped.
    #[inline]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Path portion of the URL.
    pub fn path(&self) -> &str {
        match self.url.split_once('?') {
            Some((path, _)) => path,
            None => &self.url,
        }
    }

    /// Query string, if the URL carries one.
    pub fn query(&self) -> Option<&str> {
        self.url.split_once('?').map(|(_, query)| query)
    }

    /// HTTP method, read from the `REQUEST_METHOD` environment entry.
    pub fn method(&self) -> Method {
        self.environment
            .get("REQUEST_METHOD")
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    /// Parsed body parameters, uploads already merged in.
    #[inline]
    pub fn post(&self) -> &ParamMap {
        &self.post
    }

    /// Normalized upload descriptors, keyed by field.
    #[inline]
    pub fn files(&self) -> &BTreeMap<String, UploadTree> {
        &self.files
    }

    /// Request cookies.
    #[inline]
    pub fn cookies(&self) -> &BTreeMap<String, String> {
        &self.cookies
    }

    /// One request cookie by name.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// Environment map (`$_SERVER` equivalent).
    #[inline]
    pub fn environment(&self) -> &BTreeMap<String, String> {
        &self.environment
    }

    /// One environment entry by key.
    pub fn env(&self, key: &str) -> Option<&str> {
        self.environment.get(key).map(String::as_str)
    }

    /// Session attached to this request.
    #[inline]
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }
}
