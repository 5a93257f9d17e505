//! Thin HTTP boundary over the responder.
//!
//! Routes:
//! - POST /api/chatbot/message
//! - GET  /api/chatbot/health
//! - GET  /api/resources

use anyhow::{Context, Result};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::boundary::{ChatRequest, ErrorResponse};
use crate::responder::Responder;

#[derive(Clone)]
pub struct AppState {
    pub responder: Arc<Responder>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub response_categories: usize,
    pub oracle: Option<String>,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
struct ResourcesResponse {
    success: bool,
    data: mindcare_core::Resources,
}

pub fn router(responder: Arc<Responder>) -> Router {
    Router::new()
        .route("/api/chatbot/message", post(post_message))
        .route("/api/chatbot/health", get(get_health))
        .route("/api/resources", get(get_resources))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(AppState { responder })
}

pub async fn serve(responder: Arc<Responder>, host: &str, port: u16) -> Result<()> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("bind {addr}"))?;

    tracing::info!(
        oracle = responder.oracle_name().unwrap_or("fallback"),
        "MindCare responder listening on http://{addr}"
    );

    axum::serve(listener, router(responder))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "ctrl-c handler failed");
    }
}

async fn post_message(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "rejected chat request body");
            let err = ErrorResponse::invalid_body(rejection.body_text());
            return (StatusCode::BAD_REQUEST, Json(err)).into_response();
        }
    };
    match state.responder.handle(&body).await {
        Some(resp) => Json(resp).into_response(),
        None => (StatusCode::BAD_REQUEST, Json(ErrorResponse::message_required())).into_response(),
    }
}

async fn get_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        response_categories: mindcare_core::Topic::ALL.len(),
        oracle: state.responder.oracle_name().map(str::to_string),
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn get_resources() -> Json<ResourcesResponse> {
    Json(ResourcesResponse {
        success: true,
        data: mindcare_core::resources(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use mindcare_core::{Classifier, Topic};
    use serde_json::Value;
    use tower::ServiceExt;

    fn app() -> Router {
        router(Arc::new(Responder::new(Classifier::builtin().unwrap())))
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_post_message_returns_boundary_shape() {
        let (status, v) = send(
            app(),
            post_json(
                "/api/chatbot/message",
                r#"{"message":"I want to end it all","conversationHistory":[]}"#,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(v["success"], true);
        assert_eq!(v["usingExternalOracle"], false);
        let text = v["response"].as_str().unwrap();
        assert!(Topic::Crisis.templates().contains(&text));
        assert!(v["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[tokio::test]
    async fn test_post_message_accepts_role_content_history() {
        let (status, v) = send(
            app(),
            post_json(
                "/api/chatbot/message",
                r#"{"message":"any tips?","conversationHistory":[
                    {"role":"user","content":"I feel so lonely"},
                    {"role":"assistant","content":"I'm here with you"}]}"#,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let text = v["response"].as_str().unwrap();
        assert!(Topic::Loneliness.templates().contains(&text));
    }

    #[tokio::test]
    async fn test_missing_message_is_bad_request() {
        for body in [r#"{}"#, r#"{"message":""}"#, r#"{"message":"   "}"#] {
            let (status, v) = send(app(), post_json("/api/chatbot/message", body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
            assert_eq!(v["success"], false);
            assert_eq!(v["error"], "Message is required");
        }
    }

    #[tokio::test]
    async fn test_mistyped_body_gets_json_error() {
        for body in [
            r#"{"message":123}"#,
            r#"{"message":"hi","conversationHistory":[{"role":"user","content":null}]}"#,
            r#"not json"#,
        ] {
            let (status, v) = send(app(), post_json("/api/chatbot/message", body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
            assert_eq!(v["success"], false, "{body}");
            assert!(
                v["error"].as_str().unwrap().starts_with("Invalid request body"),
                "{body}"
            );
        }
    }

    #[tokio::test]
    async fn test_health_reports_categories() {
        let req = Request::builder()
            .uri("/api/chatbot/health")
            .body(Body::empty())
            .unwrap();
        let (status, v) = send(app(), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(v["status"], "healthy");
        assert_eq!(v["response_categories"], 12);
        assert!(v["oracle"].is_null());
    }

    #[tokio::test]
    async fn test_resources_lists_helplines() {
        let req = Request::builder()
            .uri("/api/resources")
            .body(Body::empty())
            .unwrap();
        let (status, v) = send(app(), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(v["success"], true);
        assert!(!v["data"]["helplines"].as_array().unwrap().is_empty());
    }
}
