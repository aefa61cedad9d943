//! Error rendering for failed dispatch runs.
//!
//! When the pipeline raises a non-assertion failure, the connector does not
//! fail the test. It resolves an [`ErrorRenderer`] and substitutes the
//! rendered response, the same way the framework's own error handler would
//! turn an uncaught exception into an error page.

use std::fmt;

use http::{HeaderMap, StatusCode};

use crate::native::NativeResponse;
use crate::pipeline::DispatchError;

/// Error raised while rendering an error response.
///
/// This is the one unrecoverable path: a renderer that itself fails leaves
/// nothing to hand back, so the error propagates to the caller.
#[derive(Debug, Clone)]
pub struct RenderError {
    pub message: String,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for RenderError {}

impl From<String> for RenderError {
    fn from(message: String) -> Self {
        RenderError { message }
    }
}

impl From<&str> for RenderError {
    fn from(message: &str) -> Self {
        RenderError {
            message: message.to_string(),
        }
    }
}

/// Turns a caught dispatch failure into a substitute response.
pub trait ErrorRenderer: Send + Sync {
    /// Renders the failure as a native response.
    fn render(&self, error: &DispatchError) -> Result<NativeResponse, RenderError>;
}

/// Built-in renderer used when no renderer is configured or the configured
/// name is not registered.
///
/// Produces a minimal HTML page with a 500 status and the failure message.
#[derive(Debug, Clone, Default)]
pub struct DefaultErrorRenderer;

impl ErrorRenderer for DefaultErrorRenderer {
    fn render(&self, error: &DispatchError) -> Result<NativeResponse, RenderError> {
        let body = format!(
            "<!DOCTYPE html>\n<html>\n<head><title>An Internal Error Has Occurred</title></head>\n\
             <body>\n<h1>An Internal Error Has Occurred</h1>\n<p>{}</p>\n</body>\n</html>\n",
            escape_html(error.message())
        );
        Ok(
            NativeResponse::new(StatusCode::INTERNAL_SERVER_ERROR, body, HeaderMap::new())
                .with_header("content-type", "text/html; charset=utf-8"),
        )
    }
}

/// Escapes text for embedding in the error page body.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            c => escaped.push(c),
        }
    }
    escaped
}
