//! Error rendering, assertion passthrough, and renderer selection.

use std::sync::Arc;

use crate::helpers::*;
use browserkit::{BrowserRequest, ConnectorError, CookieJar, StaticConfig};
use http::StatusCode;

/// Test that a pipeline failure is rendered instead of failing the run
#[tokio::test]
async fn test_pipeline_failure_is_rendered() {
    let mut connector = connector();
    let mut jar = CookieJar::new();

    let response = connector
        .request(BrowserRequest::get("/fail"), &mut jar)
        .await
        .expect("failure must be rendered, not returned");

    assert_status(&response, StatusCode::INTERNAL_SERVER_ERROR);
    assert_body_contains(&response, "An Internal Error Has Occurred");
    assert_body_contains(&response, "Missing template Articles/view.php");
}

/// Test that the rendered response is captured like any other
#[tokio::test]
async fn test_rendered_failure_is_captured() {
    let mut connector = connector();
    let mut jar = CookieJar::new();

    connector
        .request(BrowserRequest::get("/fail"), &mut jar)
        .await
        .expect("failure must be rendered");

    let captured = connector.captured();
    assert_eq!(captured.request().expect("request").url(), "/fail");
    assert_eq!(
        captured.response().expect("response").status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert!(captured.controller().is_none(), "failed before routing");
}

/// Test that an assertion failure propagates with its message untouched
#[tokio::test]
async fn test_assertion_failure_propagates() {
    let mut connector = connector();
    let mut jar = CookieJar::new();

    let err = connector
        .request(BrowserRequest::get("/assert"), &mut jar)
        .await
        .expect_err("assertion must propagate");

    assert!(err.is_assertion());
    assert!(matches!(err, ConnectorError::Assertion(_)));
    assert_eq!(err.to_string(), "Failed asserting that 404 matches expected 200.");

    // Translation happened, so the request is still observable.
    assert!(connector.captured().request().is_some());
    assert!(connector.captured().response().is_none());
}

/// Test that spy observations survive a run that fails after startup
#[tokio::test]
async fn test_observations_survive_late_failure() {
    let mut connector = connector();
    let mut jar = CookieJar::new();

    let response = connector
        .request(BrowserRequest::get("/late-fail"), &mut jar)
        .await
        .expect("failure must be rendered");

    assert_status(&response, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        connector.captured().controller().expect("controller").name(),
        "Late"
    );
    assert!(connector.captured().view().is_none(), "render never started");
}

/// Test that a configured renderer takes over error rendering
#[tokio::test]
async fn test_configured_renderer_is_used() {
    let mut connector =
        connector_with(StaticConfig::new().with_exception_renderer("teapot"))
            .with_renderer("teapot", Arc::new(TeapotRenderer));
    let mut jar = CookieJar::new();

    let response = connector
        .request(BrowserRequest::get("/fail"), &mut jar)
        .await
        .expect("failure must be rendered");

    assert_status(&response, StatusCode::IM_A_TEAPOT);
    assert_body_contains(&response, "teapot: Missing template Articles/view.php");
}

/// Test the fallback when the configured renderer was never registered
#[tokio::test]
async fn test_unregistered_renderer_falls_back() {
    let mut connector = connector_with(StaticConfig::new().with_exception_renderer("ghost"));
    let mut jar = CookieJar::new();

    let response = connector
        .request(BrowserRequest::get("/fail"), &mut jar)
        .await
        .expect("failure must be rendered");

    assert_status(&response, StatusCode::INTERNAL_SERVER_ERROR);
    assert_body_contains(&response, "An Internal Error Has Occurred");
}

/// Test that a failing renderer leaves the run unrecoverable
#[tokio::test]
async fn test_renderer_failure_is_unrecoverable() {
    let mut connector =
        connector_with(StaticConfig::new().with_exception_renderer("broken"))
            .with_renderer("broken", Arc::new(FailingRenderer));
    let mut jar = CookieJar::new();

    let err = connector
        .request(BrowserRequest::get("/fail"), &mut jar)
        .await
        .expect_err("render failure must surface");

    assert!(matches!(err, ConnectorError::Render(_)));
    assert!(err.to_string().contains("error rendering failed"));
}

/// Test that a missing application namespace is rendered like any failure
#[tokio::test]
async fn test_missing_application_is_rendered() {
    let mut connector = connector_with(StaticConfig::new().with_app_namespace("Vendor"));
    let mut jar = CookieJar::new();

    let response = connector
        .request(BrowserRequest::get("/ping"), &mut jar)
        .await
        .expect("failure must be rendered");

    assert_status(&response, StatusCode::INTERNAL_SERVER_ERROR);
    assert_body_contains(&response, "missing application class Vendor\\Application");
}

/// Test that a rendered failure does not poison later requests
#[tokio::test]
async fn test_failure_keeps_connector_usable() {
    let mut connector = connector();
    let mut jar = CookieJar::new();

    connector
        .request(BrowserRequest::get("/fail"), &mut jar)
        .await
        .expect("failure must be rendered");

    let response = connector
        .request(BrowserRequest::get("/ping"), &mut jar)
        .await
        .expect("request failed");
    assert_status(&response, StatusCode::OK);
    assert_eq!(response.body(), "pong");
}
