//! End-to-end tests for the routing and lifecycle engine, driven over a real
//! listener.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::http::StatusCode;
use axum::response::IntoResponse;

use lambda_host::engine::registry::handler;
use lambda_host::RouteRegistry;

mod common;

const WINDOW: Duration = Duration::from_secs(5);

#[tokio::test]
async fn literal_route_dispatches_with_empty_params_and_query() {
    let invoked = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&invoked);

    let mut registry = RouteRegistry::new();
    registry.get(
        "/",
        handler(move |ctx| {
            let flag = Arc::clone(&flag);
            async move {
                assert!(ctx.params.is_empty());
                assert!(ctx.query.is_empty());
                flag.store(true, Ordering::SeqCst);
                (StatusCode::OK, "Hello World from lambda-host!").into_response()
            }
        }),
    );

    let addr = common::start_engine(registry, WINDOW).await;
    let response = reqwest::get(format!("http://{addr}/")).await.expect("request");

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.expect("body"), "Hello World from lambda-host!");
    assert!(invoked.load(Ordering::SeqCst));
}

#[tokio::test]
async fn wildcard_parameter_is_extracted() {
    let mut registry = RouteRegistry::new();
    registry.get(
        "/test/:id",
        handler(|ctx| async move {
            let id = ctx.param("id").unwrap_or("missing").to_string();
            (StatusCode::OK, id).into_response()
        }),
    );

    let addr = common::start_engine(registry, WINDOW).await;
    let response = reqwest::get(format!("http://{addr}/test/42"))
        .await
        .expect("request");

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.expect("body"), "42");
}

#[tokio::test]
async fn trailing_slash_and_query_are_normalized_away() {
    let mut registry = RouteRegistry::new();
    registry.get(
        "/test/:id/bob",
        handler(|ctx| async move {
            let id = ctx.param("id").unwrap_or("missing");
            let foo = ctx.query_value("foo").unwrap_or("missing");
            (StatusCode::OK, format!("{id}|{foo}")).into_response()
        }),
    );

    let addr = common::start_engine(registry, WINDOW).await;
    let response = reqwest::get(format!("http://{addr}/test/123/bob/?foo=bar"))
        .await
        .expect("request");

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.expect("body"), "123|bar");
}

#[tokio::test]
async fn query_parses_with_and_without_trailing_slash() {
    let mut registry = RouteRegistry::new();
    registry.get(
        "/test",
        handler(|ctx| async move {
            let foo = ctx.query_value("foo").unwrap_or("missing").to_string();
            (StatusCode::OK, foo).into_response()
        }),
    );

    let addr = common::start_engine(registry, WINDOW).await;

    for path in ["/test?foo=bar", "/test/?foo=bar"] {
        let response = reqwest::get(format!("http://{addr}{path}"))
            .await
            .expect("request");
        assert_eq!(response.status(), 200);
        assert_eq!(response.text().await.expect("body"), "bar");
    }
}

#[tokio::test]
async fn first_registered_route_wins() {
    let mut registry = RouteRegistry::new();
    registry.get(
        "/things/:id",
        handler(|_ctx| async { (StatusCode::OK, "wildcard").into_response() }),
    );
    registry.get(
        "/things/special",
        handler(|_ctx| async { (StatusCode::OK, "literal").into_response() }),
    );

    let addr = common::start_engine(registry, WINDOW).await;
    let response = reqwest::get(format!("http://{addr}/things/special"))
        .await
        .expect("request");

    assert_eq!(response.text().await.expect("body"), "wildcard");
}

#[tokio::test]
async fn unmatched_path_finalizes_404() {
    let registry = RouteRegistry::new();
    let addr = common::start_engine(registry, WINDOW).await;

    let response = reqwest::get(format!("http://{addr}/missing"))
        .await
        .expect("request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn method_mismatch_finalizes_404() {
    let mut registry = RouteRegistry::new();
    registry.get(
        "/only-get",
        handler(|_ctx| async { StatusCode::OK.into_response() }),
    );

    let addr = common::start_engine(registry, WINDOW).await;
    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{addr}/only-get"))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn malformed_json_body_short_circuits_before_the_handler() {
    let invoked = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&invoked);

    let mut registry = RouteRegistry::new();
    registry.post(
        "/",
        handler(move |_ctx| {
            let flag = Arc::clone(&flag);
            async move {
                flag.store(true, Ordering::SeqCst);
                StatusCode::OK.into_response()
            }
        }),
    );

    let addr = common::start_engine(registry, WINDOW).await;
    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{addr}/"))
        .header("content-type", "application/json")
        .body("invalid")
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 400);
    assert!(!invoked.load(Ordering::SeqCst));
}

#[tokio::test]
async fn well_formed_json_body_reaches_the_handler_parsed() {
    let mut registry = RouteRegistry::new();
    registry.post(
        "/echo",
        handler(|ctx| async move {
            let name = ctx
                .json
                .as_ref()
                .and_then(|value| value.get("name"))
                .and_then(|value| value.as_str())
                .unwrap_or("missing")
                .to_string();
            (StatusCode::OK, name).into_response()
        }),
    );

    let addr = common::start_engine(registry, WINDOW).await;
    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{addr}/echo"))
        .json(&serde_json::json!({ "name": "alice" }))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.expect("body"), "alice");
}

#[tokio::test]
async fn slow_handler_finalizes_408_and_its_late_result_is_discarded() {
    let completed = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&completed);

    let mut registry = RouteRegistry::new();
    registry.get(
        "/slow",
        handler(move |_ctx| {
            let flag = Arc::clone(&flag);
            async move {
                tokio::time::sleep(Duration::from_millis(300)).await;
                flag.store(true, Ordering::SeqCst);
                (StatusCode::OK, "too late").into_response()
            }
        }),
    );
    registry.get(
        "/ok",
        handler(|_ctx| async { StatusCode::OK.into_response() }),
    );

    let addr = common::start_engine(registry, Duration::from_millis(50)).await;

    let started = Instant::now();
    let response = reqwest::get(format!("http://{addr}/slow"))
        .await
        .expect("request");
    assert_eq!(response.status(), 408);
    assert!(started.elapsed() < Duration::from_secs(2));

    // the handler keeps running past the timeout; its response hits a
    // closed slot instead of the wire
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(completed.load(Ordering::SeqCst));

    let response = reqwest::get(format!("http://{addr}/ok"))
        .await
        .expect("request");
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn fast_handler_is_not_timed_out() {
    let mut registry = RouteRegistry::new();
    registry.get(
        "/quick",
        handler(|_ctx| async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            (StatusCode::OK, "done").into_response()
        }),
    );

    let addr = common::start_engine(registry, Duration::from_millis(500)).await;
    let response = reqwest::get(format!("http://{addr}/quick"))
        .await
        .expect("request");
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn panicking_handler_finalizes_500() {
    let mut registry = RouteRegistry::new();
    registry.get(
        "/boom",
        handler(|_ctx| async { panic!("handler blew up") }),
    );

    let addr = common::start_engine(registry, WINDOW).await;
    let response = reqwest::get(format!("http://{addr}/boom"))
        .await
        .expect("request");
    assert_eq!(response.status(), 500);
}

#[tokio::test]
async fn preflight_advertises_registered_methods() {
    let mut registry = RouteRegistry::new();
    registry.get("/a", handler(|_ctx| async { StatusCode::OK.into_response() }));
    registry.post("/a", handler(|_ctx| async { StatusCode::OK.into_response() }));

    let addr = common::start_engine(registry, WINDOW).await;
    let client = reqwest::Client::new();

    let response = client
        .request(reqwest::Method::OPTIONS, format!("http://{addr}/a"))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status(), 200);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-methods")
            .and_then(|v| v.to_str().ok()),
        Some("GET, POST")
    );
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );

    let response = client
        .request(reqwest::Method::OPTIONS, format!("http://{addr}/missing"))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status(), 404);
}
