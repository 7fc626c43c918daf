//! # detection-relay: gateway between the monitoring dashboard and the AI inference service
//!
//! `detection-relay` is the backend the browser dashboard talks to. It accepts camera frames
//! and free text, forwards them to a separate inference service that runs the actual weapon,
//! violence and drug-keyword detectors, and relays the inference service's answer back.
//!
//! ## Request Flow
//!
//! The relay exposes two forwarding routes:
//!
//! - `POST /api/detect/{type}` checks that `type` is `weapon` or `violence` (anything else is
//!   answered with `400 {"error": "Invalid type"}` without contacting the upstream), then posts
//!   the `{"imageDataUrl": ...}` body to `<upstream>/detect/{type}`.
//! - `POST /api/text/analyze` posts the `{"text": ...}` body to `<upstream>/text/analyze`.
//!
//! In both cases the caller receives the upstream status code and body bytes unchanged. The
//! relay holds no state between requests: every call produces exactly one outbound request,
//! with no retries and no caching. When the upstream cannot be reached the caller gets a
//! `502`, and when it does not answer within `upstream.timeout` a `504`.
//!
//! ## Architecture
//!
//! The HTTP layer is [Axum](https://github.com/tokio-rs/axum); the outbound side is a single
//! pooled `reqwest` client wrapped in [`upstream::UpstreamClient`] and shared through
//! [`AppState`]. Around the forwarding routes sit a request body limit, CORS for the
//! dashboard, `tower-http` tracing, optional Prometheus metrics and an OpenAPI reference.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use detection_relay::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = detection_relay::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     detection_relay::telemetry::init_telemetry(config.enable_otel_export)?;
//!
//!     let app = Application::new(config)?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options.
pub mod api;
pub mod config;
pub mod errors;
mod openapi;
pub mod telemetry;
pub mod upstream;

#[cfg(test)]
mod test;
#[cfg(test)]
pub mod test_utils;

use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use axum_prometheus::PrometheusMetricLayer;
use bon::Builder;
pub use config::Config;
use config::CorsOrigin;
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info, instrument};
use upstream::UpstreamClient;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::openapi::ApiDoc;

/// Application state shared across all request handlers.
///
/// Both fields are immutable after startup; the upstream client is a cheap handle onto a
/// shared connection pool.
///
/// # Example
///
/// ```ignore
/// let state = AppState::builder()
///     .config(config)
///     .upstream(upstream)
///     .build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub config: Config,
    pub upstream: UpstreamClient,
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let allowed_origins = &config.cors.allowed_origins;

    let allow_origin = if allowed_origins.iter().any(|origin| matches!(origin, CorsOrigin::Wildcard)) {
        AllowOrigin::any()
    } else {
        let mut origins = Vec::new();
        for origin in allowed_origins {
            if let CorsOrigin::Url(url) = origin {
                // Browsers send `Origin` without a trailing slash, unlike `Url::as_str`
                origins.push(url.origin().ascii_serialization().parse::<HeaderValue>()?);
            }
        }
        AllowOrigin::list(origins)
    };

    let mut cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(config.cors.allow_credentials);

    if let Some(max_age) = config.cors.max_age {
        cors = cors.max_age(std::time::Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Build the main application router with all endpoints and middleware.
///
/// This function constructs the complete Axum router with:
/// - Forwarding routes under `/api`
/// - Health check and OpenAPI documentation
/// - Request body limit
/// - CORS configuration
/// - Optional Prometheus metrics
/// - Tracing middleware
///
/// # Errors
///
/// Returns an error if the CORS configuration cannot be turned into header values.
#[instrument(skip_all)]
pub fn build_router(state: &AppState) -> anyhow::Result<Router> {
    let api_routes = Router::new()
        .route("/detect/{type}", post(api::handlers::detect::detect))
        .route("/text/analyze", post(api::handlers::text::analyze_text))
        .with_state(state.clone());

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .nest("/api", api_routes)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::max(state.config.limits.max_body_size));

    let cors_layer = create_cors_layer(&state.config)?;
    let mut router = router.layer(cors_layer);

    if state.config.enable_metrics {
        let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();

        router = router
            .route("/internal/metrics", get(move || std::future::ready(metric_handle.render())))
            .layer(prometheus_layer);
    }

    let router = router.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    Ok(router)
}

/// The relay: configuration plus a fully built router.
///
/// 1. **Create**: [`Application::new`] builds the upstream client, state and router
/// 2. **Serve**: [`Application::serve`] binds to `host:port` and handles requests
/// 3. **Shutdown**: when the shutdown future resolves, in-flight requests finish and telemetry is flushed
pub struct Application {
    router: Router,
    config: Config,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting detection relay with configuration: {:#?}", config);

        let upstream = UpstreamClient::new(&config.upstream)?;
        let app_state = AppState::builder().config(config.clone()).upstream(upstream).build();
        let router = build_router(&app_state)?;

        Ok(Self { router, config })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    /// Start serving the application on the configured bind address
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        self.serve_with_listener(listener, shutdown).await
    }

    /// Serve on an already bound listener
    pub async fn serve_with_listener<F>(self, listener: TcpListener, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        info!(
            "Detection relay listening on http://{}, forwarding to {}",
            listener.local_addr()?,
            self.config.upstream.url
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}
