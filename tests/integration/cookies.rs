//! Cookie decoding into the caller's jar and replay onto later requests.

use crate::helpers::*;
use browserkit::{BrowserRequest, CookieJar};
use chrono::{Datelike, Utc};

/// Test that raw Set-Cookie headers are decoded into the jar
#[tokio::test]
async fn test_response_cookies_land_in_jar() {
    let mut connector = connector();
    let mut jar = CookieJar::new();

    connector
        .request(BrowserRequest::get("/cookie-set"), &mut jar)
        .await
        .expect("request failed");

    assert_eq!(jar.len(), 2);

    // The quoted value keeps its quotes and its inner semicolon.
    let pref = jar.get("pref").expect("pref cookie");
    assert_eq!(pref.value, "\"a;b\"");
    assert_eq!(pref.path.as_deref(), Some("/account"));

    let legacy = jar.get("legacy").expect("legacy cookie");
    assert_eq!(legacy.value, "old value");
    assert_eq!(legacy.expire.expect("expires parsed").year(), 2020);
}

/// Test that a cookie with a past Expires flushes out of the jar
#[tokio::test]
async fn test_expired_cookie_flushes_from_jar() {
    let mut connector = connector();
    let mut jar = CookieJar::new();

    connector
        .request(BrowserRequest::get("/cookie-set"), &mut jar)
        .await
        .expect("request failed");

    assert!(jar.get("legacy").expect("legacy cookie").is_expired(Utc::now()));

    jar.flush_expired(Utc::now());
    assert!(jar.get("legacy").is_none());
    assert!(jar.get("pref").is_some(), "unexpired cookie must survive");
}

/// Test that structured response cookies and header cookies both reach the jar
#[tokio::test]
async fn test_structured_and_header_cookies_mix() {
    let mut connector = connector();
    let mut jar = CookieJar::new();

    connector
        .request(BrowserRequest::post("/login"), &mut jar)
        .await
        .expect("login failed");

    // Structured cookie set through the response API.
    let session_cookie = jar.get("session_id").expect("session cookie");
    assert_eq!(session_cookie.value, connector.session().id());

    // Raw header cookie set alongside it.
    let remember = jar.get("remember_me").expect("remember cookie");
    assert_eq!(remember.value, "1");
    assert_eq!(remember.path.as_deref(), Some("/"));
    assert!(remember.http_only);

    assert_eq!(connector.captured().cookies().len(), 2);
}

/// Test that request cookies reach the application
#[tokio::test]
async fn test_request_cookies_reach_application() {
    let mut connector = connector();
    let mut jar = CookieJar::new();

    let response = connector
        .request(BrowserRequest::get("/echo").cookie("theme", "dark"), &mut jar)
        .await
        .expect("request failed");

    assert_eq!(json_body(&response)["cookies"]["theme"], "dark");
}

/// Test replaying jar cookies onto a later request
#[tokio::test]
async fn test_caller_replays_jar_on_next_request() {
    let mut connector = connector();
    let mut jar = CookieJar::new();

    connector
        .request(BrowserRequest::get("/cookie-set"), &mut jar)
        .await
        .expect("request failed");

    // The jar belongs to the caller: replay is an explicit copy.
    let pref = jar.get("pref").expect("pref cookie").value.clone();
    let response = connector
        .request(BrowserRequest::get("/echo").cookie("pref", pref), &mut jar)
        .await
        .expect("request failed");

    assert_eq!(json_body(&response)["cookies"]["pref"], "\"a;b\"");
}
