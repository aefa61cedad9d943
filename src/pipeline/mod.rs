//! Dispatch pipeline seam.
//!
//! The connector never touches a concrete framework object. It depends on
//! the traits here:
//!
//! - [`Application`] - one dispatch run: native request in, response out
//! - [`ApplicationFactory`] - resolves the entry point from a namespace
//! - [`Controller`] / [`AuthComponent`] / [`View`] - the pipeline-internal
//!   objects the observation hooks capture
//!
//! The pipeline reports its progress by firing the typed extension points on
//! [`DispatchHooks`] as dispatch, controller startup, and rendering happen.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

mod hooks;

pub use hooks::{DispatchEvent, DispatchHooks, RenderEvent, StartupEvent};

/// Error raised by a dispatch run.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchError {
    /// Pipeline-internal failure; the connector renders an error response
    /// instead of failing the test.
    Failure(String),

    /// Test-framework assertion failure; must propagate unmodified so the
    /// test runner reports it, never rendered.
    Assertion(String),
}

impl DispatchError {
    /// Creates a pipeline failure.
    pub fn failure(message: impl Into<String>) -> Self {
        DispatchError::Failure(message.into())
    }

    /// Creates an assertion failure.
    pub fn assertion(message: impl Into<String>) -> Self {
        DispatchError::Assertion(message.into())
    }

    /// Error message.
    pub fn message(&self) -> &str {
        match self {
            DispatchError::Failure(message) => message,
            DispatchError::Assertion(message) => message,
        }
    }

    /// Whether this is an assertion failure.
    #[inline]
    pub fn is_assertion(&self) -> bool {
        matches!(self, DispatchError::Assertion(_))
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::Failure(message) => write!(f, "dispatch failed: {}", message),
            DispatchError::Assertion(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for DispatchError {}

/// One application dispatch run.
///
/// Implementations must fire the extension points on the given hooks at the
/// matching pipeline moments: `before_dispatch` once routing resolved (with
/// the controller, or without one when no route matched), `controller_startup`
/// before the action runs, and `before_render` before the view renders.
#[async_trait]
pub trait Application: Send + Sync {
    /// Runs the dispatch pipeline for one request.
    async fn run(
        &self,
        request: crate::native::NativeRequest,
        hooks: &DispatchHooks,
    ) -> Result<crate::native::PipelineResponse, DispatchError>;

    /// Returns the name of this application for logging purposes.
    fn name(&self) -> &'static str {
        "application"
    }
}

/// Resolves the application entry point from a configured namespace.
pub trait ApplicationFactory: Send + Sync {
    /// Builds the application for one dispatch run.
    fn make(&self, namespace: &str) -> Result<Box<dyn Application>, DispatchError>;

    /// Whether an application exists under the namespace.
    fn exists(&self, _namespace: &str) -> bool {
        true
    }
}

/// Controller selected by routing.
pub trait Controller: Send + Sync {
    /// Controller name, e.g. `Articles`.
    fn name(&self) -> &str;

    /// Authentication component attached to the controller, if any.
    fn auth(&self) -> Option<Arc<dyn AuthComponent>> {
        None
    }
}

/// Authentication component exposed by a controller.
pub trait AuthComponent: Send + Sync {
    /// Identity of the authenticated user, if someone is logged in.
    fn user(&self) -> Option<Value> {
        None
    }
}

/// View object about to render.
pub trait View: Send + Sync {
    /// View name, e.g. `Articles/index`.
    fn name(&self) -> &str;
}
