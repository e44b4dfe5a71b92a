pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    http::Method,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::extraction::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/extract", post(handlers::handle_extract))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(cors_layer())
        .with_state(state)
}

/// Browsers on any origin may POST uploads.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST])
        .allow_headers(Any)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::extraction::test_support::{FileTextExtractor, ScriptedModel};

    fn app() -> Router {
        build_router(
            AppState {
                model: Arc::new(ScriptedModel::form_filler()),
                extractor: Arc::new(FileTextExtractor::default()),
            },
            1024,
        )
    }

    #[tokio::test]
    async fn test_health_reports_active_model() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["model"], "scripted");
    }

    #[tokio::test]
    async fn test_cors_preflight_allows_any_origin_for_post() {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/extract")
            .header(header::ORIGIN, "http://localhost:5173")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert!(response.status().is_success());
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "POST");
    }

    #[tokio::test]
    async fn test_extract_rejects_get() {
        let response = app()
            .oneshot(Request::get("/extract").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
