//! API Module
//!
//! HTTP API layer for the gateway.

pub mod error;
pub mod health;
pub mod repo;

use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::service::GatewayState;

/// Create the main API router with all endpoints
pub fn create_router(state: GatewayState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Repository browsing
        .route("/analysis", get(repo::get_analysis))
        .route("/code", get(repo::get_snippets))
        .route("/logs", get(repo::get_logs))
        // Add state and middleware
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::{Value, json};

    /// Serve the router on an ephemeral port and return its base URL
    async fn spawn_gateway(backend_url: &str) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = create_router(GatewayState::new(backend_url));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_health() {
        let base = spawn_gateway("http://127.0.0.1:9").await;
        let response = reqwest::get(format!("{}/health", base)).await.unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(response.text().await.unwrap(), "OK");
    }

    #[tokio::test]
    async fn test_analysis_is_relayed() {
        let backend = MockServer::start();
        let mock = backend.mock(|when, then| {
            when.method(GET)
                .path("/analysis")
                .query_param("repo", "aro-service");
            then.status(200)
                .json_body(json!({"analysis": {"summary": "null check missing"}, "extra": 1}));
        });

        let base = spawn_gateway(&backend.base_url()).await;
        let response = reqwest::get(format!("{}/analysis?repo=aro-service", base))
            .await
            .unwrap();

        mock.assert();
        assert_eq!(response.status(), 200);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({"analysis": {"summary": "null check missing"}}));
    }

    #[tokio::test]
    async fn test_code_and_logs_are_relayed() {
        let backend = MockServer::start();
        backend.mock(|when, then| {
            when.method(GET).path("/code").query_param("repo", "aro-service");
            then.status(200).json_body(json!({"snippets": ["class Foo {}"]}));
        });
        backend.mock(|when, then| {
            when.method(GET).path("/logs").query_param("repo", "aro-service");
            then.status(200).json_body(json!({"logs": ["16:46:10 - boom"]}));
        });

        let base = spawn_gateway(&backend.base_url()).await;

        let code: Value = reqwest::get(format!("{}/code?repo=aro-service", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(code, json!({"snippets": ["class Foo {}"]}));

        let logs: Value = reqwest::get(format!("{}/logs?repo=aro-service", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(logs, json!({"logs": ["16:46:10 - boom"]}));
    }

    #[tokio::test]
    async fn test_missing_repo_is_bad_request() {
        let backend = MockServer::start();
        let mock = backend.mock(|when, then| {
            when.method(GET).path("/analysis");
            then.status(200).json_body(json!({"analysis": "x"}));
        });

        let base = spawn_gateway(&backend.base_url()).await;
        let response = reqwest::get(format!("{}/analysis", base)).await.unwrap();

        assert_eq!(response.status(), 400);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({"error": "Repository is required"}));
        mock.assert_calls(0);
    }

    #[tokio::test]
    async fn test_backend_failure_is_internal_error() {
        let backend = MockServer::start();
        backend.mock(|when, then| {
            when.method(GET).path("/logs");
            then.status(503).body("unavailable");
        });

        let base = spawn_gateway(&backend.base_url()).await;
        let response = reqwest::get(format!("{}/logs?repo=aro-service", base))
            .await
            .unwrap();

        assert_eq!(response.status(), 500);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({"error": "Failed to fetch logs"}));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_internal_error() {
        let base = spawn_gateway("http://127.0.0.1:9").await;
        let response = reqwest::get(format!("{}/code?repo=aro-service", base))
            .await
            .unwrap();

        assert_eq!(response.status(), 500);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({"error": "Failed to fetch code snippets"}));
    }
}
