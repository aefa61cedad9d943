//! Connector facade: one simulated browser driving the dispatch pipeline.

use std::fmt;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::browser::{BrowserRequest, BrowserResponse};
use crate::config::ConfigProvider;
use crate::cookie::{CookieJar, CookieRecord};
use crate::error::ConnectorError;
use crate::invoker::Invoker;
use crate::native::{NativeRequest, NativeResponse};
use crate::pipeline::{ApplicationFactory, AuthComponent, Controller, View};
use crate::render::ErrorRenderer;
use crate::session::Session;
use crate::spy::SpyCaptures;
use crate::translate;

// =============================================================================
// Captured State
// =============================================================================

/// Everything observed during the most recent simulated request.
///
/// Rebuilt per call and populated as the call progresses: request and session
/// at translation time, controller/auth/view by the spies during the run,
/// response and cookies at response translation. After a failed call the
/// fields filled before the failure remain readable, so a test can still see
/// how far dispatch got.
#[derive(Default)]
pub struct CapturedState {
    request: Option<NativeRequest>,
    response: Option<NativeResponse>,
    session: Option<Arc<Session>>,
    controller: Option<Arc<dyn Controller>>,
    view: Option<Arc<dyn View>>,
    auth: Option<Arc<dyn AuthComponent>>,
    cookies: Vec<CookieRecord>,
}

impl CapturedState {
    /// Native request dispatched by the most recent call.
    pub fn request(&self) -> Option<&NativeRequest> {
        self.request.as_ref()
    }

    /// Native response of the most recent call, stream conversion applied.
    pub fn response(&self) -> Option<&NativeResponse> {
        self.response.as_ref()
    }

    /// Session the most recent call ran with.
    pub fn session(&self) -> Option<&Arc<Session>> {
        self.session.as_ref()
    }

    /// Controller selected by routing, when one matched.
    pub fn controller(&self) -> Option<&Arc<dyn Controller>> {
        self.controller.as_ref()
    }

    /// View that rendered the response, when rendering happened.
    pub fn view(&self) -> Option<&Arc<dyn View>> {
        self.view.as_ref()
    }

    /// Auth component of the matched controller, when it exposed one.
    pub fn auth(&self) -> Option<&Arc<dyn AuthComponent>> {
        self.auth.as_ref()
    }

    /// Cookies decoded from the most recent response.
    pub fn cookies(&self) -> &[CookieRecord] {
        &self.cookies
    }
}

impl fmt::Debug for CapturedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapturedState")
            .field("request", &self.request.as_ref().map(|r| r.url()))
            .field("response", &self.response.as_ref().map(|r| r.status()))
            .field("session", &self.session.as_ref().map(|s| s.id()))
            .field("controller", &self.controller.as_ref().map(|c| c.name()))
            .field("view", &self.view.as_ref().map(|v| v.name()))
            .field("auth", &self.auth.is_some())
            .field("cookies", &self.cookies.len())
            .finish()
    }
}

// =============================================================================
// Connector
// =============================================================================

/// Drives the application's dispatch pipeline in-process.
///
/// One connector models one browser: it keeps the session alive across
/// requests and retains the captured state of the most recent call for
/// assertions. The cookie jar stays with the caller and is passed per
/// request.
pub struct Connector {
    config: Arc<dyn ConfigProvider>,
    invoker: Invoker,
    session: Option<Arc<Session>>,
    captured: CapturedState,
}

impl Connector {
    /// Creates a connector over the given configuration and application
    /// factory.
    pub fn new(config: Arc<dyn ConfigProvider>, factory: Arc<dyn ApplicationFactory>) -> Self {
        let invoker = Invoker::new(Arc::clone(&config), factory);
        Connector {
            config,
            invoker,
            session: None,
            captured: CapturedState::default(),
        }
    }

    /// Registers a named error renderer selectable via the
    /// `Error.exceptionRenderer` configuration read.
    pub fn with_renderer(
        mut self,
        name: impl Into<String>,
        renderer: Arc<dyn ErrorRenderer>,
    ) -> Self {
        self.invoker.add_renderer(name.into(), renderer);
        self
    }

    /// Whether the factory can resolve the configured application.
    pub fn has_application(&self) -> bool {
        self.invoker.has_application()
    }

    /// State captured during the most recent call.
    pub fn captured(&self) -> &CapturedState {
        &self.captured
    }

    /// Resolves the session for the next request.
    ///
    /// Order: the cached session; else the session attached to the most
    /// recently dispatched request; else a fresh session built from the
    /// `Session` configuration section. The resolved instance is cached, so
    /// session identity stays stable across calls until [`Connector::reset`]
    /// or [`Connector::clear_session`].
    pub fn session(&mut self) -> Arc<Session> {
        if let Some(session) = &self.session {
            return Arc::clone(session);
        }
        if let Some(request) = &self.captured.request {
            let session = Arc::clone(request.session());
            self.session = Some(Arc::clone(&session));
            return session;
        }
        let session = Session::create(self.config.session_config());
        tracing::debug!(session_id = %session.id(), "created session from configuration");
        self.session = Some(Arc::clone(&session));
        session
    }

    /// Drops the cached session handle.
    ///
    /// The next [`Connector::session`] call re-resolves: it recovers the
    /// session from the last dispatched request if one exists, else builds a
    /// fresh one.
    pub fn clear_session(&mut self) {
        self.session = None;
    }

    /// Returns the connector to its initial state: no session, no captured
    /// state. Registered renderers stay.
    pub fn reset(&mut self) {
        self.session = None;
        self.captured = CapturedState::default();
    }

    /// Runs one simulated request through the pipeline.
    ///
    /// Response cookies are replayed into `jar`; the jar belongs to the
    /// caller and is never read here. Each call gets a fresh request id
    /// tagged onto every log event it emits.
    pub async fn request(
        &mut self,
        request: BrowserRequest,
        jar: &mut CookieJar,
    ) -> Result<BrowserResponse, ConnectorError> {
        let request_id = Uuid::new_v4();
        tracing::debug!(
            request_id = %request_id,
            method = %request.method(),
            target = %request.target(),
            "simulated browser request"
        );

        // Session resolution may read the previous request; reset after it so
        // a failed translation leaves no stale capture behind.
        let session = self.session();
        self.captured = CapturedState::default();

        let native =
            translate::request::translate(&request, Arc::clone(&session), self.config.as_ref())?;
        self.captured.session = Some(session);
        self.captured.request = Some(native.clone());

        let captures = Arc::new(Mutex::new(SpyCaptures::default()));
        let outcome = self
            .invoker
            .run(native, Arc::clone(&captures), request_id)
            .await;

        // Keep spy observations even for a failed run.
        {
            let mut seen = captures.lock().unwrap();
            self.captured.controller = seen.controller.take();
            self.captured.auth = seen.auth.take();
            self.captured.view = seen.view.take();
        }

        let response = outcome?;
        let (browser, native_response, cookies) =
            translate::response::translate(response, jar)?;
        self.captured.response = Some(native_response);
        self.captured.cookies = cookies;

        tracing::debug!(
            request_id = %request_id,
            status = %browser.status(),
            "simulated browser response"
        );
        Ok(browser)
    }
}
