//! Shared scaffold for the integration tests.
//!
//! `ScaffoldApp` fakes a framework dispatch pipeline: a handful of fixed
//! routes, controllers with and without an auth component, session reads and
//! writes, and both response shapes (full and streamed). Tests drive it
//! through a real [`Connector`], so everything from request translation to
//! cookie replay runs exactly as it would against a real application.

use std::sync::{Arc, Once};

use async_trait::async_trait;
use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_DISPOSITION, CONTENT_TYPE, SET_COOKIE};
use http::{HeaderMap, StatusCode};
use serde_json::{json, Value};

use browserkit::{
    Application, ApplicationFactory, AuthComponent, BrowserResponse, Connector, Controller,
    CookieRecord, DispatchError, DispatchEvent, DispatchHooks, ErrorRenderer, NativeRequest,
    NativeResponse, PipelineResponse, RenderError, RenderEvent, StartupEvent, StaticConfig,
    StreamBody, StreamResponse, View,
};

/// File path served by the `/download` route.
pub const REPORT_PATH: &str = "/tmp/scaffold-report.pdf";

static INIT: Once = Once::new();

/// Installs a test subscriber once; `RUST_LOG` controls verbosity.
fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

// =============================================================================
// Connector construction
// =============================================================================

/// Connector over the scaffold application with default configuration.
pub fn connector() -> Connector {
    connector_with(StaticConfig::new())
}

/// Connector over the scaffold application with the given configuration.
pub fn connector_with(config: StaticConfig) -> Connector {
    init_tracing();
    Connector::new(Arc::new(config), Arc::new(ScaffoldFactory))
}

// =============================================================================
// Scaffold pipeline objects
// =============================================================================

pub struct ScaffoldController {
    name: &'static str,
    auth: Option<Arc<ScaffoldAuth>>,
}

impl Controller for ScaffoldController {
    fn name(&self) -> &str {
        self.name
    }

    fn auth(&self) -> Option<Arc<dyn AuthComponent>> {
        self.auth
            .as_ref()
            .map(|auth| Arc::clone(auth) as Arc<dyn AuthComponent>)
    }
}

pub struct ScaffoldAuth {
    user: Value,
}

impl AuthComponent for ScaffoldAuth {
    fn user(&self) -> Option<Value> {
        Some(self.user.clone())
    }
}

pub struct ScaffoldView {
    name: &'static str,
}

impl View for ScaffoldView {
    fn name(&self) -> &str {
        self.name
    }
}

fn controller(name: &'static str) -> Arc<dyn Controller> {
    Arc::new(ScaffoldController { name, auth: None })
}

fn auth_controller(name: &'static str, user: Value) -> Arc<dyn Controller> {
    Arc::new(ScaffoldController {
        name,
        auth: Some(Arc::new(ScaffoldAuth { user })),
    })
}

/// Fires the three extension points the way a real dispatch would.
fn fire_pipeline(hooks: &DispatchHooks, controller: &Arc<dyn Controller>, view: &'static str) {
    hooks.fire_before_dispatch(&DispatchEvent::new(Some(Arc::clone(controller))));
    hooks.fire_controller_startup(&StartupEvent::new(Arc::clone(controller)));
    hooks.fire_before_render(&RenderEvent::new(Arc::new(ScaffoldView { name: view })));
}

// =============================================================================
// Scaffold application
// =============================================================================

pub struct ScaffoldApp;

#[async_trait]
impl Application for ScaffoldApp {
    async fn run(
        &self,
        request: NativeRequest,
        hooks: &DispatchHooks,
    ) -> Result<PipelineResponse, DispatchError> {
        match request.path() {
            "/ping" => {
                let ping = controller("Ping");
                fire_pipeline(hooks, &ping, "Ping/index");
                Ok(NativeResponse::ok("pong")
                    .with_header("content-type", "text/plain")
                    .into())
            }

            "/echo" => {
                let echo = controller("Echo");
                fire_pipeline(hooks, &echo, "Echo/json");
                let payload = json!({
                    "method": request.method().as_str(),
                    "url": request.url(),
                    "query": request.query(),
                    "post": request.post(),
                    "cookies": request.cookies(),
                    "files": request.files().len(),
                });
                Ok(NativeResponse::ok(payload.to_string())
                    .with_header("content-type", "application/json")
                    .into())
            }

            "/login" => {
                let username = request
                    .post()
                    .get("username")
                    .and_then(|value| value.as_text())
                    .unwrap_or("alice")
                    .to_string();
                let session = request.session();
                session.write("user_id", 1);
                session.write("username", username.clone());

                let users =
                    auth_controller("Users", json!({ "id": 1, "username": username.clone() }));
                fire_pipeline(hooks, &users, "Users/login");

                Ok(NativeResponse::ok(format!("Welcome back, {}", username))
                    .with_cookie(CookieRecord::new("session_id", session.id()))
                    .with_added_header("set-cookie", "remember_me=1; Path=/; HttpOnly")
                    .into())
            }

            "/profile" => {
                let users = controller("Users");
                fire_pipeline(hooks, &users, "Users/profile");
                let response = match request.session().read("user_id") {
                    Some(id) => NativeResponse::ok(format!("user:{}", id)),
                    None => NativeResponse::empty(StatusCode::FORBIDDEN).with_body("login required"),
                };
                Ok(response.into())
            }

            "/cookie-set" => {
                let prefs = controller("Prefs");
                fire_pipeline(hooks, &prefs, "Prefs/save");
                Ok(NativeResponse::ok("saved")
                    .with_added_header("set-cookie", "pref=\"a;b\"; Path=/account")
                    .with_added_header(
                        "set-cookie",
                        "legacy=old%20value; Expires=Wed, 01 Jan 2020 00:00:00 GMT",
                    )
                    .into())
            }

            "/fail" => Err(DispatchError::failure(
                "Missing template Articles/view.php",
            )),

            // Routing and startup succeed, the action blows up afterwards.
            "/late-fail" => {
                let late = controller("Late");
                hooks.fire_before_dispatch(&DispatchEvent::new(Some(Arc::clone(&late))));
                hooks.fire_controller_startup(&StartupEvent::new(late));
                Err(DispatchError::failure("action exploded"))
            }

            "/assert" => Err(DispatchError::assertion(
                "Failed asserting that 404 matches expected 200.",
            )),

            "/download" => {
                let reports = controller("Reports");
                fire_pipeline(hooks, &reports, "Reports/download");
                let mut headers = HeaderMap::new();
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/pdf"));
                headers.insert(
                    CONTENT_DISPOSITION,
                    HeaderValue::from_static("attachment; filename=\"report.pdf\""),
                );
                Ok(StreamResponse::new(
                    StatusCode::OK,
                    headers,
                    StreamBody::PlainFile(REPORT_PATH.into()),
                )
                .into())
            }

            "/stream" => {
                let mut headers = HeaderMap::new();
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
                Ok(StreamResponse::new(
                    StatusCode::OK,
                    headers,
                    StreamBody::Buffer(Bytes::from_static(b"streamed chunk")),
                )
                .into())
            }

            "/stream-empty" => Ok(StreamResponse::new(
                StatusCode::OK,
                HeaderMap::new(),
                StreamBody::Buffer(Bytes::new()),
            )
            .into()),

            "/stream-cookie" => {
                let mut headers = HeaderMap::new();
                headers.insert(
                    SET_COOKIE,
                    HeaderValue::from_static("token=stream-token; Path=/; HttpOnly"),
                );
                Ok(StreamResponse::new(
                    StatusCode::OK,
                    headers,
                    StreamBody::Buffer(Bytes::from_static(b"ok")),
                )
                .into())
            }

            _ => {
                hooks.fire_before_dispatch(&DispatchEvent::new(None));
                Ok(NativeResponse::empty(StatusCode::NOT_FOUND)
                    .with_body("Not Found")
                    .into())
            }
        }
    }

    fn name(&self) -> &'static str {
        "scaffold"
    }
}

pub struct ScaffoldFactory;

impl ApplicationFactory for ScaffoldFactory {
    fn make(&self, namespace: &str) -> Result<Box<dyn Application>, DispatchError> {
        if namespace != "App" {
            return Err(DispatchError::failure(format!(
                "missing application class {}\\Application",
                namespace
            )));
        }
        Ok(Box::new(ScaffoldApp))
    }

    fn exists(&self, namespace: &str) -> bool {
        namespace == "App"
    }
}

/// Renderer used by the configured-renderer tests.
pub struct TeapotRenderer;

impl ErrorRenderer for TeapotRenderer {
    fn render(&self, error: &DispatchError) -> Result<NativeResponse, RenderError> {
        Ok(NativeResponse::empty(StatusCode::IM_A_TEAPOT)
            .with_body(format!("teapot: {}", error.message())))
    }
}

/// Renderer that fails, leaving the run unrecoverable.
pub struct FailingRenderer;

impl ErrorRenderer for FailingRenderer {
    fn render(&self, _error: &DispatchError) -> Result<NativeResponse, RenderError> {
        Err(RenderError::from("renderer template missing"))
    }
}

// =============================================================================
// Assertions
// =============================================================================

#[allow(dead_code)]
pub fn assert_status(response: &BrowserResponse, expected: StatusCode) {
    assert_eq!(
        response.status(),
        expected,
        "unexpected status, body: {:?}",
        response.body()
    );
}

#[allow(dead_code)]
pub fn assert_body_contains(response: &BrowserResponse, needle: &str) {
    assert!(
        response.body().contains(needle),
        "body {:?} does not contain {:?}",
        response.body(),
        needle
    );
}

#[allow(dead_code)]
pub fn assert_header(response: &BrowserResponse, name: &str, expected: &str) {
    match response.header(name) {
        Some(value) => assert_eq!(value, expected, "unexpected value for header {}", name),
        None => panic!("header {} missing from response", name),
    }
}

/// Parses an `/echo` response body.
#[allow(dead_code)]
pub fn json_body(response: &BrowserResponse) -> Value {
    serde_json::from_str(response.body()).expect("echo body is not valid JSON")
}
