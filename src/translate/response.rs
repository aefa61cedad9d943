//! Native-to-abstract response translation and cookie replay.

use std::path::PathBuf;

use http::{header, HeaderMap};

use crate::browser::BrowserResponse;
use crate::cookie::{self, CookieJar, CookieRecord};
use crate::error::ConnectorError;
use crate::native::{NativeResponse, PipelineResponse, StreamBody, StreamResponse};

/// Content extracted from a stream body: text XOR file, never both.
#[derive(Debug, PartialEq)]
enum ExtractedBody {
    Empty,
    Text(String),
    File(PathBuf),
}

/// Translates a pipeline response for the simulated browser.
///
/// A stream response is converted to native shape first. Every cookie on the
/// converted response is replayed into the caller's jar. Returns the browser
/// response together with the converted native response and the cookie
/// records, for capture.
pub(crate) fn translate(
    response: PipelineResponse,
    jar: &mut CookieJar,
) -> Result<(BrowserResponse, NativeResponse, Vec<CookieRecord>), ConnectorError> {
    let native = match response {
        PipelineResponse::Native(native) => native,
        PipelineResponse::Stream(stream) => convert_stream(stream)?,
    };

    let cookies = response_cookies(&native)?;
    for record in &cookies {
        jar.set(record.clone());
    }

    tracing::debug!(
        status = %native.status(),
        cookies = cookies.len(),
        file = native.file().is_some(),
        "translated native response"
    );

    let browser = BrowserResponse::new(
        native.body().to_string(),
        native.status(),
        native.headers().clone(),
    );
    Ok((browser, native, cookies))
}

/// Converts a lightweight stream response into native shape.
///
/// The body is extracted (or a file path attached instead), headers carry
/// over unchanged, and raw `Set-Cookie` headers are decoded into structured
/// records on the converted response.
fn convert_stream(stream: StreamResponse) -> Result<NativeResponse, ConnectorError> {
    let (body, file) = match extract_body(stream.body()) {
        ExtractedBody::Empty => (String::new(), None),
        ExtractedBody::Text(text) => (text, None),
        ExtractedBody::File(path) => (String::new(), Some(path)),
    };

    let mut native = NativeResponse::new(stream.status(), body, stream.headers().clone());
    if let Some(path) = file {
        native = native.with_file(path);
    }
    for record in cookie::parse_set_cookie(&set_cookie_lines(stream.headers()))? {
        native = native.with_cookie(record);
    }
    Ok(native)
}

/// File backing takes precedence, then the zero-size check, then the buffer
/// contents as text.
fn extract_body(body: &StreamBody) -> ExtractedBody {
    match body {
        StreamBody::PlainFile(path) => ExtractedBody::File(path.clone()),
        StreamBody::Buffer(bytes) if bytes.is_empty() => ExtractedBody::Empty,
        StreamBody::Buffer(bytes) => {
            ExtractedBody::Text(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

/// Structured cookies first; a `Set-Cookie` header line is decoded only when
/// its name is not already covered by a structured record.
fn response_cookies(native: &NativeResponse) -> Result<Vec<CookieRecord>, ConnectorError> {
    let mut cookies = native.cookies().to_vec();
    let lines = set_cookie_lines(native.headers());
    if !lines.is_empty() {
        for record in cookie::parse_set_cookie(&lines)? {
            if !cookies.iter().any(|existing| existing.name == record.name) {
                cookies.push(record);
            }
        }
    }
    Ok(cookies)
}

fn set_cookie_lines(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .map(str::to_string)
        .collect()
}
