//! HTTP route definitions

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::any,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::trace;

use crate::app::AppState;
use crate::game::PlayerId;
use crate::store::parse_input_body;

pub const SCORE1_HEADER: &str = "x-score1";
pub const SCORE2_HEADER: &str = "x-score2";

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/frame1", any(frame1_handler))
        .route("/frame2", any(frame2_handler))
        .route("/input1", any(input1_handler))
        .route("/input2", any(input2_handler))
        .fallback(index_handler)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ============================================================================
// Frame endpoints
// ============================================================================

async fn frame1_handler(State(state): State<AppState>) -> Result<Response, AppError> {
    frame_response(&state, PlayerId::One)
}

async fn frame2_handler(State(state): State<AppState>) -> Result<Response, AppError> {
    frame_response(&state, PlayerId::Two)
}

fn frame_response(state: &AppState, player: PlayerId) -> Result<Response, AppError> {
    let snapshot = state.store.frame_snapshot(player);
    let frame = snapshot.frame.ok_or(AppError::FrameUnavailable)?;
    let [score1, score2] = snapshot.scores;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("image/jpeg")),
            (header::CACHE_CONTROL, HeaderValue::from_static("no-cache")),
            (header::HeaderName::from_static(SCORE1_HEADER), HeaderValue::from(score1)),
            (header::HeaderName::from_static(SCORE2_HEADER), HeaderValue::from(score2)),
        ],
        frame,
    )
        .into_response())
}

// ============================================================================
// Input endpoints
// ============================================================================

async fn input1_handler(State(state): State<AppState>, body: Bytes) -> StatusCode {
    apply_input(&state, PlayerId::One, &body)
}

async fn input2_handler(State(state): State<AppState>, body: Bytes) -> StatusCode {
    apply_input(&state, PlayerId::Two, &body)
}

/// Unknown keys and unparseable bodies are silently ignored
fn apply_input(state: &AppState, player: PlayerId, body: &[u8]) -> StatusCode {
    let updates = parse_input_body(player, body);
    trace!(player = %player, updates = updates.len(), "Input update");
    state.store.apply_input(player, updates);
    StatusCode::OK
}

// ============================================================================
// Control page
// ============================================================================

async fn index_handler(State(state): State<AppState>) -> Html<String> {
    Html(state.index_html.to_string())
}

// ============================================================================
// Error handling
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("No frame captured yet")]
    FrameUnavailable,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::FrameUnavailable => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::DEFAULT_INDEX_HTML;
    use crate::config::Config;
    use crate::game::Control;
    use crate::store::SharedStore;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn setup() -> (Router, Arc<SharedStore>) {
        let store = Arc::new(SharedStore::new());
        let state = AppState::new(&Config::default(), store.clone());
        (build_router(state), store)
    }

    fn request(method: Method, uri: &str, body: &'static str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn frame_before_first_capture_is_503() {
        let (router, _store) = setup();
        let response = router
            .oneshot(request(Method::GET, "/frame2", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn frame_carries_scores() {
        let (router, store) = setup();
        store.publish_frame(PlayerId::One, Bytes::from_static(b"\xFF\xD8jpeg"), [4, 2]);

        let response = router
            .oneshot(request(Method::GET, "/frame1", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "image/jpeg");
        assert_eq!(headers[header::CACHE_CONTROL], "no-cache");
        assert_eq!(headers[SCORE1_HEADER], "4");
        assert_eq!(headers[SCORE2_HEADER], "2");

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"\xFF\xD8jpeg");
    }

    #[tokio::test]
    async fn frame_is_served_for_any_method() {
        let (router, store) = setup();
        store.publish_frame(PlayerId::One, Bytes::from_static(b"\xFF\xD8jpeg"), [0, 1]);

        let response = router
            .oneshot(request(Method::POST, "/frame1", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"\xFF\xD8jpeg");
    }

    #[tokio::test]
    async fn input_applies_only_own_keys() {
        let (router, store) = setup();
        let response = router
            .oneshot(request(
                Method::POST,
                "/input2",
                r#"{"up": true, "enter": true, "w": true}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.is_empty());

        let [one, two] = store.input_snapshot();
        assert!(two.forward && two.fire);
        assert!(!one.forward);
    }

    #[tokio::test]
    async fn bad_input_body_is_still_200() {
        let (router, store) = setup();
        store.apply_input(PlayerId::One, [(Control::Left, true)]);

        let response = router
            .oneshot(request(Method::POST, "/input1", "}{ nonsense"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(store.input_snapshot()[0].left);
    }

    #[tokio::test]
    async fn unknown_paths_serve_control_page() {
        let (router, _store) = setup();
        let response = router
            .oneshot(request(Method::GET, "/some/where", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], DEFAULT_INDEX_HTML.as_bytes());
    }
}
