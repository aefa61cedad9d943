//! Configuration access for the connector.
//!
//! The connector never reads ambient global configuration. Everything it
//! needs is provided through [`ConfigProvider`], injected at construction:
//! the session section, the upload merge flag, the application namespace,
//! and the optional exception-renderer name.

use std::collections::BTreeMap;

use serde_json::Value;

/// Configuration reads the connector performs.
///
/// Default implementations mirror the framework defaults, so a provider only
/// overrides what a test cares about.
pub trait ConfigProvider: Send + Sync {
    /// `Session` configuration section used when building a fresh session.
    fn session_config(&self) -> BTreeMap<String, Value> {
        BTreeMap::new()
    }

    /// `App.uploadedFilesAsObjects`: merge descriptors as structured leaves
    /// (true, default) or flatten them into plain records (false).
    fn uploaded_files_as_objects(&self) -> bool {
        true
    }

    /// `App.namespace`: root namespace the application entry point lives in.
    fn app_namespace(&self) -> String {
        "App".to_string()
    }

    /// `Error.exceptionRenderer`: name of a registered error renderer to use
    /// for pipeline failures, or `None` for the built-in default.
    fn exception_renderer(&self) -> Option<String> {
        None
    }
}

/// Fixed configuration values, built fluently.
#[derive(Debug, Clone)]
pub struct StaticConfig {
    session: BTreeMap<String, Value>,
    uploaded_files_as_objects: bool,
    app_namespace: String,
    exception_renderer: Option<String>,
}

impl Default for StaticConfig {
    fn default() -> Self {
        StaticConfig {
            session: BTreeMap::new(),
            uploaded_files_as_objects: true,
            app_namespace: "App".to_string(),
            exception_renderer: None,
        }
    }
}

impl StaticConfig {
    /// Creates a config with framework defaults.
    pub fn new() -> Self {
        StaticConfig::default()
    }

    /// Sets one key in the `Session` section.
    pub fn with_session_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.session.insert(key.into(), value.into());
        self
    }

    /// Sets the upload merge flag.
    pub fn with_uploaded_files_as_objects(mut self, as_objects: bool) -> Self {
        self.uploaded_files_as_objects = as_objects;
        self
    }

    /// Sets the application namespace.
    pub fn with_app_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.app_namespace = namespace.into();
        self
    }

    /// Selects a named exception renderer.
    pub fn with_exception_renderer(mut self, name: impl Into<String>) -> Self {
        self.exception_renderer = Some(name.into());
        self
    }
}

impl ConfigProvider for StaticConfig {
    fn session_config(&self) -> BTreeMap<String, Value> {
        self.session.clone()
    }

    fn uploaded_files_as_objects(&self) -> bool {
        self.uploaded_files_as_objects
    }

    fn app_namespace(&self) -> String {
        self.app_namespace.clone()
    }

    fn exception_renderer(&self) -> Option<String> {
        self.exception_renderer.clone()
    }
}
