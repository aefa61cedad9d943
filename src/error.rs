//! Connector error types.

use std::fmt;

use crate::cookie::CookieError;
use crate::render::RenderError;
use crate::translate::request::RequestError;

/// Errors a simulated request can surface to the test.
///
/// Pipeline failures are absent on purpose: those are rendered into an error
/// response instead (see [`crate::render`]). What remains are translation
/// problems on either side of the pipeline, assertion failures that must
/// reach the test runner, and a renderer that itself failed.
#[derive(Debug)]
pub enum ConnectorError {
    /// Request translation failed.
    Request(RequestError),

    /// Response cookie decoding failed.
    Cookie(CookieError),

    /// Test-framework assertion failure, propagated unmodified.
    Assertion(String),

    /// Error rendering failed; nothing left to substitute.
    Render(RenderError),
}

impl ConnectorError {
    /// Whether this is a propagated assertion failure.
    #[inline]
    pub fn is_assertion(&self) -> bool {
        matches!(self, ConnectorError::Assertion(_))
    }
}

impl fmt::Display for ConnectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectorError::Request(e) => write!(f, "request translation failed: {}", e),
            ConnectorError::Cookie(e) => write!(f, "cookie decoding failed: {}", e),
            ConnectorError::Assertion(msg) => write!(f, "{}", msg),
            ConnectorError::Render(e) => write!(f, "error rendering failed: {}", e),
        }
    }
}

impl std::error::Error for ConnectorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConnectorError::Request(e) => Some(e),
            ConnectorError::Cookie(e) => Some(e),
            ConnectorError::Render(e) => Some(e),
            ConnectorError::Assertion(_) => None,
        }
    }
}

impl From<RequestError> for ConnectorError {
    fn from(e: RequestError) -> Self {
        ConnectorError::Request(e)
    }
}

impl From<CookieError> for ConnectorError {
    fn from(e: CookieError) -> Self {
        ConnectorError::Cookie(e)
    }
}

impl From<RenderError> for ConnectorError {
    fn from(e: RenderError) -> Self {
        ConnectorError::Render(e)
    }
}
