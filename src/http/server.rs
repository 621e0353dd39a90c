//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build binding rules before serving (invalid rules are startup errors)
//! - Create the Axum Router with every endpoint
//! - Wire up middleware (request ID, tracing, timeout, body limit)
//! - Serve on a listener until shutdown is signalled

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    routing::{any, get},
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::binding::RegistrationError;
use crate::config::AppConfig;
use crate::http::handlers::{self, ParamRules};
use crate::http::request::{request_id_of, UuidRequestId};
use crate::lifecycle::shutdown;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub rules: Arc<ParamRules>,
}

/// Errors that stop the server from starting or serving.
#[derive(Debug, Error)]
pub enum ServerError {
    /// A binding rule or record schema is invalid.
    #[error("Invalid binding rule: {0}")]
    Registration(#[from] RegistrationError),

    /// The metrics exporter could not be started.
    #[error("Metrics exporter failed: {0}")]
    Metrics(String),

    /// Binding or serving the listener failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP server for the parameter binding endpoints.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: AppConfig) -> Result<Self, ServerError> {
        let state = AppState {
            rules: Arc::new(ParamRules::new()?),
        };
        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        let middleware = ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = %request_id_of(request.headers()),
                )
            }))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id());

        Router::new()
            .route("/request-param-v1", any(handlers::request_param_v1))
            .route("/request-param-v2", any(handlers::request_param_v2))
            .route("/request-param-v3", any(handlers::request_param_v3))
            .route("/request-param-v4", any(handlers::request_param_v4))
            .route("/request-param-required", any(handlers::request_param_required))
            .route("/request-param-default", any(handlers::request_param_default))
            .route("/request-param-map", any(handlers::request_param_map))
            .route("/model-attribute-v1", any(handlers::model_attribute_v1))
            .route("/model-attribute-v2", any(handlers::model_attribute_v2))
            .route("/health", get(handlers::health))
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.limits.max_body_size))
            .layer(middleware)
    }

    /// A handle to the router, for serving it in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Serve on `listener` until `shutdown_rx` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown_rx))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, StatusCode};
    use tower::ServiceExt;

    async fn call(router: Router, request: Request<Body>) -> (StatusCode, String) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    async fn get(uri: &str) -> (StatusCode, String) {
        let router = HttpServer::new(AppConfig::default()).unwrap().router();
        call(router, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
    }

    #[tokio::test]
    async fn test_scalar_endpoints_accept_valid_input() {
        for path in [
            "/request-param-v1",
            "/request-param-v2",
            "/request-param-v3",
            "/request-param-v4",
            "/request-param-required",
            "/request-param-default",
            "/request-param-map",
            "/model-attribute-v1",
            "/model-attribute-v2",
        ] {
            let (status, body) = get(&format!("{path}?username=hello&age=20")).await;
            assert_eq!(status, StatusCode::OK, "{path}");
            assert_eq!(body, "ok", "{path}");
        }
    }

    #[tokio::test]
    async fn test_non_numeric_age_rejected() {
        for path in [
            "/request-param-v1",
            "/request-param-v2",
            "/request-param-v3",
            "/request-param-v4",
            "/request-param-required",
            "/request-param-default",
            "/model-attribute-v1",
            "/model-attribute-v2",
        ] {
            let (status, body) = get(&format!("{path}?username=hello&age=abc")).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{path}");
            assert_eq!(body, "Failed to convert value 'abc' of parameter 'age' to integer", "{path}");
        }
    }

    #[tokio::test]
    async fn test_map_accepts_anything() {
        let (status, _) = get("/request-param-map?username=id1&username=id2&age=abc").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_required_endpoint() {
        assert_eq!(get("/request-param-required?username=hello").await.0, StatusCode::OK);
        assert_eq!(get("/request-param-required?username=").await.0, StatusCode::OK);

        let (status, body) = get("/request-param-required?age=20").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Required request parameter 'username' is not present");
    }

    #[tokio::test]
    async fn test_missing_required_age() {
        let (status, body) = get("/request-param-v3?username=hello").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Required request parameter 'age' is not present");
    }

    #[tokio::test]
    async fn test_default_endpoint_without_params() {
        assert_eq!(get("/request-param-default").await, (StatusCode::OK, "ok".to_string()));
    }

    #[tokio::test]
    async fn test_form_body() {
        let router = HttpServer::new(AppConfig::default()).unwrap().router();
        let request = Request::builder()
            .method("POST")
            .uri("/model-attribute-v1")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("username=hello&age=20"))
            .unwrap();
        assert_eq!(call(router, request).await, (StatusCode::OK, "ok".to_string()));
    }

    #[tokio::test]
    async fn test_model_attribute_versions_agree() {
        let cases = [
            ("username=hello&age=20", (StatusCode::OK, "ok")),
            (
                "username=hello",
                (StatusCode::BAD_REQUEST, "Required request parameter 'age' is not present"),
            ),
            (
                "username=hello&age=abc",
                (StatusCode::BAD_REQUEST, "Failed to convert value 'abc' of parameter 'age' to integer"),
            ),
        ];
        for (query, (status, body)) in cases {
            let v1 = get(&format!("/model-attribute-v1?{query}")).await;
            let v2 = get(&format!("/model-attribute-v2?{query}")).await;
            assert_eq!(v1, v2, "query {query}");
            assert_eq!(v1, (status, body.to_string()), "query {query}");
        }

        let mut posted = Vec::new();
        for uri in ["/model-attribute-v1", "/model-attribute-v2"] {
            let router = HttpServer::new(AppConfig::default()).unwrap().router();
            let request = Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("username=hello&age=x"))
                .unwrap();
            posted.push(call(router, request).await);
        }
        assert_eq!(posted[0], posted[1]);
        assert_eq!(posted[0].0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_body_limit() {
        let mut config = AppConfig::default();
        config.limits.max_body_size = 16;
        let router = HttpServer::new(config).unwrap().router();
        let request = Request::builder()
            .method("POST")
            .uri("/request-param-map")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("username=".to_string() + &"x".repeat(64)))
            .unwrap();
        assert_eq!(call(router, request).await.0, StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_request_id_propagated() {
        let router = HttpServer::new(AppConfig::default()).unwrap().router();
        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_unknown_route() {
        assert_eq!(get("/nope").await.0, StatusCode::NOT_FOUND);
    }
}
