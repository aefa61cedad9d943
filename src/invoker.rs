//! Pipeline invocation and failure handling.
//!
//! The invoker resolves the application entry point from configuration,
//! registers the observation spies on a fresh hook set, and runs one
//! dispatch. A failing run is rendered into a substitute error response so
//! the test keeps a response to assert against; only assertion failures and
//! renderer failures escape.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::config::ConfigProvider;
use crate::error::ConnectorError;
use crate::native::{NativeRequest, NativeResponse, PipelineResponse};
use crate::pipeline::{ApplicationFactory, DispatchError, DispatchHooks};
use crate::render::{DefaultErrorRenderer, ErrorRenderer};
use crate::spy::{self, SpyCaptures};

pub(crate) struct Invoker {
    config: Arc<dyn ConfigProvider>,
    factory: Arc<dyn ApplicationFactory>,
    renderers: HashMap<String, Arc<dyn ErrorRenderer>>,
    default_renderer: Arc<dyn ErrorRenderer>,
}

impl Invoker {
    pub fn new(config: Arc<dyn ConfigProvider>, factory: Arc<dyn ApplicationFactory>) -> Self {
        Invoker {
            config,
            factory,
            renderers: HashMap::new(),
            default_renderer: Arc::new(DefaultErrorRenderer),
        }
    }

    /// Registers a named error renderer selectable via configuration.
    pub fn add_renderer(&mut self, name: String, renderer: Arc<dyn ErrorRenderer>) {
        self.renderers.insert(name, renderer);
    }

    /// Whether the factory can resolve the configured application.
    pub fn has_application(&self) -> bool {
        self.factory.exists(&self.config.app_namespace())
    }

    /// Runs one dispatch with the spies registered.
    ///
    /// `request_id` correlates the pipeline events with the surrounding
    /// simulated call in the log stream.
    pub async fn run(
        &self,
        request: NativeRequest,
        captures: Arc<Mutex<SpyCaptures>>,
        request_id: Uuid,
    ) -> Result<PipelineResponse, ConnectorError> {
        let namespace = self.config.app_namespace();
        tracing::debug!(
            request_id = %request_id,
            namespace = %namespace,
            url = %request.url(),
            "invoking dispatch pipeline"
        );

        let outcome = match self.factory.make(&namespace) {
            Ok(application) => {
                let mut hooks = DispatchHooks::new();
                spy::register(&mut hooks, &captures);
                application.run(request, &hooks).await
            }
            Err(error) => Err(error),
        };

        match outcome {
            Ok(response) => Ok(response),
            Err(error) if error.is_assertion() => {
                tracing::debug!(
                    request_id = %request_id,
                    error = %error,
                    "assertion failure propagated to test runner"
                );
                Err(ConnectorError::Assertion(error.message().to_string()))
            }
            Err(error) => {
                tracing::warn!(
                    request_id = %request_id,
                    error = %error,
                    "dispatch failed, rendering error response"
                );
                let rendered = self.render_error(&error, request_id)?;
                Ok(PipelineResponse::Native(rendered))
            }
        }
    }

    /// Resolves the configured renderer, falling back to the built-in default
    /// when none is configured or the configured name is not registered.
    fn render_error(
        &self,
        error: &DispatchError,
        request_id: Uuid,
    ) -> Result<NativeResponse, ConnectorError> {
        let renderer = match self.config.exception_renderer() {
            Some(name) => match self.renderers.get(&name) {
                Some(renderer) => Arc::clone(renderer),
                None => {
                    tracing::warn!(
                        request_id = %request_id,
                        renderer = %name,
                        "configured error renderer not registered, using default"
                    );
                    Arc::clone(&self.default_renderer)
                }
            },
            None => Arc::clone(&self.default_renderer),
        };
        renderer.render(error).map_err(ConnectorError::Render)
    }
}
