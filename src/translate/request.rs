//! Abstract-to-native request translation.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::browser::BrowserRequest;
use crate::config::ConfigProvider;
use crate::native::NativeRequest;
use crate::session::Session;
use crate::uploads;

/// Scheme plus authority prefix of an absolute http(s) URL.
static ORIGIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[a-z0-9.-]+(?::\d+)?").unwrap());

/// Request translation errors.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestError {
    /// Target is neither an absolute http(s) URL nor rooted at `/`.
    MalformedTarget {
        target: String,
    },
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::MalformedTarget { target } => {
                write!(f, "malformed request target: {:?}", target)
            }
        }
    }
}

impl std::error::Error for RequestError {}

/// Builds the native request the pipeline will dispatch.
///
/// The environment map seeds `REQUEST_METHOD` from the request method before
/// merging server variables, so the method value wins on key collision.
pub(crate) fn translate(
    request: &BrowserRequest,
    session: Arc<Session>,
    config: &dyn ConfigProvider,
) -> Result<NativeRequest, RequestError> {
    let url = strip_origin(request.target())?;

    let mut environment = BTreeMap::new();
    environment.insert(
        "REQUEST_METHOD".to_string(),
        request.method().as_str().to_string(),
    );
    for (key, value) in request.server_vars() {
        environment
            .entry(key.clone())
            .or_insert_with(|| value.clone());
    }

    let files = uploads::normalize(request.files());
    // Read once per translation, not per file.
    let as_objects = config.uploaded_files_as_objects();
    let post = uploads::merge_into_body(request.params().clone(), &files, as_objects);

    tracing::debug!(
        method = %request.method(),
        url = %url,
        files = files.len(),
        as_objects,
        "translated browser request"
    );

    Ok(NativeRequest::new(
        url,
        post,
        files,
        request.cookies().clone(),
        environment,
        session,
    ))
}

/// Strips scheme and authority from an absolute URL, leaving path plus query.
///
/// A target that is already a rooted path passes through unchanged; an
/// absolute URL with no path becomes `/`. Anything else is malformed.
pub(crate) fn strip_origin(target: &str) -> Result<String, RequestError> {
    let stripped = ORIGIN.replace(target, "");
    if stripped.is_empty() {
        return Ok("/".to_string());
    }
    if !stripped.starts_with('/') {
        return Err(RequestError::MalformedTarget {
            target: target.to_string(),
        });
    }
    Ok(stripped.into_owned())
}
