//! Router assembly: HTTP endpoints, WebSocket upgrade, static files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;
pub mod ws;

/// Build the application router with:
/// - WebSocket at `/ws` (one quiz session per connection)
/// - REST-ish API under `/api/v1/...` (sessions addressed by id)
/// - Static SPA from the configured static dir with index fallback
/// - CORS (allow any origin/method/headers)
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    let static_dir = state.settings.static_dir.clone();
    let static_service = ServeDir::new(&static_dir)
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        // WebSocket
        .route("/ws", get(ws::ws_upgrade))
        // HTTP API
        .route("/api/v1/health", get(http::http_health))
        .route("/api/v1/levels", get(http::http_get_levels))
        .route("/api/v1/records", get(http::http_get_records))
        .route("/api/v1/session", post(http::http_create_session))
        .route(
            "/api/v1/session/:id",
            get(http::http_get_session).delete(http::http_delete_session),
        )
        .route("/api/v1/session/:id/start", post(http::http_start_level))
        .route("/api/v1/session/:id/answer", post(http::http_submit_answer))
        .route("/api/v1/session/:id/next", post(http::http_next))
        .route("/api/v1/session/:id/menu", post(http::http_menu))
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Frontend fallback
        .fallback_service(static_service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Settings;
    use crate::records::MemoryStore;

    fn app() -> Router {
        let settings = Settings { rng_seed: Some(99), ..Settings::default() };
        build_router(Arc::new(AppState::with_store(settings, Box::new(MemoryStore::default()))))
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                req = req.header("content-type", "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let res = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, value)
    }

    #[tokio::test]
    async fn health_and_levels() {
        let app = app();
        let (status, body) = call(&app, "GET", "/api/v1/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "ok": true }));

        let (_, body) = call(&app, "GET", "/api/v1/levels", None).await;
        assert_eq!(body["levels"].as_array().unwrap().len(), 3);
        assert_eq!(body["levels"][0]["shapes"][0]["shape"], "triangle");
    }

    #[tokio::test]
    async fn play_a_level_over_http() {
        let app = app();
        let (status, created) = call(&app, "POST", "/api/v1/session", None).await;
        assert_eq!(status, StatusCode::OK);
        let id = created["id"].as_str().unwrap().to_string();
        assert_eq!(created["session"]["phase"], "menu");

        let (_, view) = call(&app, "POST", &format!("/api/v1/session/{id}/start"), Some(json!({ "levelIndex": 1 }))).await;
        assert_eq!(view["phase"], "in_progress");

        for i in 0..5 {
            let (_, view) = call(&app, "POST", &format!("/api/v1/session/{id}/answer"), Some(json!({ "answer": "0" }))).await;
            assert_eq!(view["verdict"]["correct"], false);
            assert_eq!(view["progress"], format!("{}/5", i + 1));
            call(&app, "POST", &format!("/api/v1/session/{id}/next"), None).await;
        }

        let (_, view) = call(&app, "GET", &format!("/api/v1/session/{id}"), None).await;
        assert_eq!(view["phase"], "level_complete");
        assert_eq!(view["summary"]["record"]["percentage"], 0);

        let (_, records) = call(&app, "GET", "/api/v1/records", None).await;
        assert_eq!(records["records"][0]["level"], 2);
        assert_eq!(records["records"][0]["total"], 5);

        let (_, view) = call(&app, "POST", &format!("/api/v1/session/{id}/menu"), None).await;
        assert_eq!(view["phase"], "menu");
    }

    #[tokio::test]
    async fn errors_are_json() {
        let app = app();
        let (status, body) = call(&app, "GET", "/api/v1/session/missing", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().is_some());

        let (_, created) = call(&app, "POST", "/api/v1/session", None).await;
        let id = created["id"].as_str().unwrap().to_string();
        let (status, body) = call(&app, "POST", &format!("/api/v1/session/{id}/start"), Some(json!({ "levelIndex": 7 }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("unknown level"));

        let (status, _) = call(&app, "DELETE", &format!("/api/v1/session/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = call(&app, "DELETE", &format!("/api/v1/session/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn bad_bodies_get_the_error_shape() {
        let app = app();
        let (_, created) = call(&app, "POST", "/api/v1/session", None).await;
        let id = created["id"].as_str().unwrap().to_string();

        let cases = [
            ("application/json", "{not json"),
            ("application/json", r#"{"levelIndex":"one"}"#),
            ("application/json", ""),
            ("text/plain", r#"{"levelIndex":0}"#),
        ];
        for (content_type, raw) in cases {
            let req = Request::builder()
                .method("POST")
                .uri(format!("/api/v1/session/{id}/start"))
                .header("content-type", content_type)
                .body(Body::from(raw))
                .unwrap();
            let res = app.clone().oneshot(req).await.unwrap();
            assert!(res.status().is_client_error(), "{raw:?} gave {}", res.status());
            let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
            let body: Value = serde_json::from_slice(&bytes).unwrap();
            assert!(!body["error"].as_str().unwrap().is_empty());
        }

        // Missing body on the answer route.
        let (status, body) = call(&app, "POST", &format!("/api/v1/session/{id}/answer"), None).await;
        assert!(status.is_client_error());
        assert!(body["error"].as_str().is_some());

        // The session is untouched by rejected requests.
        let (_, view) = call(&app, "GET", &format!("/api/v1/session/{id}"), None).await;
        assert_eq!(view["phase"], "menu");
    }
}
