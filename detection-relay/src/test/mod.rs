//! End-to-end tests: the full router in front of a mocked inference service.

use crate::test_utils::{create_test_app, create_test_config, create_test_server, install_crypto_provider};
use axum::http::{Method, StatusCode};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::info;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Follows the dashboard's flow: one frame per detector, then a text scan
#[test_log::test(tokio::test)]
async fn test_e2e_dashboard_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/detect/weapon"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "detected": false, "score": 40.1, "riskDelta": 5, "message": "no threat"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/detect/violence"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "detected": true, "score": 88.0, "riskDelta": 25, "message": "violent activity"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/text/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hits": ["mdma"], "score": 15, "riskDelta": 15, "summary": "Detected 1 suspicious keywords: mdma"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let server = create_test_app(&mock_server.uri());
    let frame = json!({ "imageDataUrl": "data:image/jpeg;base64,/9j/4AAQ" });

    let mut risk = 0;
    for detector in ["weapon", "violence"] {
        let response = server.post(&format!("/api/detect/{detector}")).json(&frame).await;
        response.assert_status(StatusCode::OK);
        let body: Value = response.json();
        risk += body["riskDelta"].as_i64().unwrap();
    }

    let response = server.post("/api/text/analyze").json(&json!({ "text": "selling mdma" })).await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    risk += body["riskDelta"].as_i64().unwrap();

    info!(risk, "dashboard risk after session");
    assert_eq!(risk, 45);
}

#[tokio::test]
async fn test_repeated_requests_are_forwarded_independently() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/detect/weapon"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "detected": false })))
        .expect(2)
        .mount(&mock_server)
        .await;

    let server = create_test_app(&mock_server.uri());
    let frame = json!({ "imageDataUrl": "data:image/jpeg;base64,AAAA" });

    server.post("/api/detect/weapon").json(&frame).await.assert_status(StatusCode::OK);
    server.post("/api/detect/weapon").json(&frame).await.assert_status(StatusCode::OK);

    let received = mock_server.received_requests().await.unwrap();
    assert_eq!(received.len(), 2);
    assert_eq!(received[0].body, received[1].body);
}

#[tokio::test]
async fn test_upstream_body_is_not_reinterpreted() {
    let mock_server = MockServer::start().await;
    // Key order, spacing and the trailing newline must all survive
    let raw = "{ \"score\" : 1.50,\"detected\":false }\n";
    Mock::given(method("POST"))
        .and(path("/detect/violence"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(raw, "application/json"))
        .mount(&mock_server)
        .await;

    let server = create_test_app(&mock_server.uri());
    let response = server
        .post("/api/detect/violence")
        .json(&json!({ "imageDataUrl": "data:image/png;base64,AAAA" }))
        .await;

    response.assert_status(StatusCode::OK);
    assert_eq!(response.text(), raw);
    assert_eq!(response.header("content-type"), "application/json");
}

#[tokio::test]
async fn test_slow_upstream_is_gateway_timeout() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri());
    config.upstream.timeout = Duration::from_millis(200);
    let server = create_test_server(config);

    let response = server.post("/api/text/analyze").json(&json!({ "text": "hello" })).await;

    response.assert_status(StatusCode::GATEWAY_TIMEOUT);
    response.assert_json(&json!({ "error": "Upstream service timed out" }));
}

#[tokio::test]
async fn test_oversized_body_is_rejected_before_forwarding() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri());
    config.limits.max_body_size = 1024;
    let server = create_test_server(config);

    let frame = json!({ "imageDataUrl": format!("data:image/jpeg;base64,{}", "A".repeat(4096)) });
    let response = server.post("/api/detect/weapon").json(&frame).await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_healthz() {
    let server = create_test_app("http://127.0.0.1:9");

    let response = server.get("/healthz").await;

    response.assert_status(StatusCode::OK);
    response.assert_text("OK");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let server = create_test_app("http://127.0.0.1:9");

    let response = server.get("/api-docs/openapi.json").await;

    response.assert_status(StatusCode::OK);
    let doc: Value = response.json();
    assert!(doc["paths"]["/detect/{type}"]["post"].is_object());
    assert!(doc["paths"]["/text/analyze"]["post"].is_object());
}

#[tokio::test]
async fn test_cors_preflight_for_dashboard_origin() {
    let server = create_test_app("http://127.0.0.1:9");

    let response = server
        .method(Method::OPTIONS, "/api/detect/weapon")
        .add_header("origin", "http://localhost:5173")
        .add_header("access-control-request-method", "POST")
        .add_header("access-control-request-headers", "content-type")
        .await;

    response.assert_status(StatusCode::OK);
    assert_eq!(response.header("access-control-allow-origin"), "http://localhost:5173");
}

#[tokio::test]
async fn test_cors_rejects_unknown_origin() {
    let server = create_test_app("http://127.0.0.1:9");

    let response = server
        .method(Method::OPTIONS, "/api/detect/weapon")
        .add_header("origin", "http://evil.example")
        .add_header("access-control-request-method", "POST")
        .await;

    assert!(response.maybe_header("access-control-allow-origin").is_none());
}

/// Serves over a real socket and shuts down through the graceful shutdown future
#[tokio::test]
async fn test_serve_over_tcp_with_graceful_shutdown() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/text/analyze"))
        .respond_with(ResponseTemplate::new(503).set_body_raw(r#"{"busy":true}"#, "application/json"))
        .expect(1)
        .mount(&mock_server)
        .await;

    install_crypto_provider();
    let app = crate::Application::new(create_test_config(&mock_server.uri())).unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let handle = tokio::spawn(app.serve_with_listener(listener, async move {
        let _ = shutdown_rx.await;
    }));

    let response = reqwest::Client::new()
        .post(format!("http://{addr}/api/text/analyze"))
        .json(&json!({ "text": "anything" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.text().await.unwrap(), r#"{"busy":true}"#);

    shutdown_tx.send(()).unwrap();
    handle.await.unwrap().unwrap();
}
