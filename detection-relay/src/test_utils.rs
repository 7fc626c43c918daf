//! Test utilities shared by unit and end-to-end tests.

use std::time::Duration;

use axum_test::TestServer;

use crate::config::{Config, CorsConfig, CorsOrigin, LimitsConfig, UpstreamConfig};

/// reqwest is built without a bundled crypto provider; tests install the same one as `main`.
pub fn install_crypto_provider() {
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
}

pub fn create_test_config(upstream_url: &str) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        upstream: UpstreamConfig {
            url: upstream_url.parse().expect("valid upstream url"),
            timeout: Duration::from_secs(2),
            connect_timeout: Duration::from_secs(1),
        },
        cors: CorsConfig {
            allowed_origins: vec![CorsOrigin::Url("http://localhost:5173".parse().unwrap())],
            allow_credentials: false,
            max_age: Some(60),
        },
        limits: LimitsConfig::default(),
        // The Prometheus recorder is process-global and can only be installed once
        enable_metrics: false,
        enable_otel_export: false,
    }
}

pub fn create_test_server(config: Config) -> TestServer {
    install_crypto_provider();
    crate::Application::new(config)
        .expect("Failed to create application")
        .into_test_server()
}

pub fn create_test_app(upstream_url: &str) -> TestServer {
    create_test_server(create_test_config(upstream_url))
}

/// A URL on which nothing is listening.
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
