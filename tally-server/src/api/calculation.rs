//! `POST /calculo` – submission boundary of the ingestion pipeline.
//!
//! The handler only decodes and enqueues. The aggregate is applied later by
//! a worker and is never part of the response.

use axum::{Router, body::Bytes, extract::State, http::StatusCode, routing::post};
use tally_core::UpdateRequest;
use tally_sdk::objects::CalculationRequest;

use super::error::ApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/calculo",
        post(submit_calculation).fallback(method_not_allowed),
    )
}

/// Decode the body, validate it and hand it to the request queue.
///
/// Responds `202 Accepted` with an empty body once queued.
async fn submit_calculation(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let payload: CalculationRequest = serde_json::from_slice(&body)?;
    let request = UpdateRequest::try_from(payload)?;

    tracing::debug!(key = %request.key(), "Submitting calculation");
    state.sender.submit(request).await?;

    Ok(StatusCode::ACCEPTED)
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::state_with_queue;
    use axum::body::Body;
    use axum::http::{Method, Request};
    use std::time::Duration;
    use tally_core::config::OverflowPolicy;
    use tower::ServiceExt;

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/calculo")
            .header("content-type", "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_accepted_request_is_queued() {
        let (state, receiver) = state_with_queue(10, OverflowPolicy::Reject);
        let app = router().with_state(state);

        let response = app
            .oneshot(post_json(r#"{"ID":"x","Valor1":2,"Valor2":3,"Valor3":1}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert!(body_text(response).await.is_empty());

        let queued = receiver.dequeue().await.unwrap();
        assert_eq!(queued, UpdateRequest::new("x", 2.0, 3.0, 1.0).unwrap());
    }

    #[tokio::test]
    async fn test_content_type_is_not_required() {
        let (state, receiver) = state_with_queue(10, OverflowPolicy::Reject);
        let request = Request::builder()
            .method(Method::POST)
            .uri("/calculo")
            .body(Body::from(r#"{"ID":"y","Valor1":1}"#))
            .unwrap();

        let response = router().with_state(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(receiver.dequeue().await.unwrap().key(), "y");
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let (state, receiver) = state_with_queue(10, OverflowPolicy::Reject);
        // Hold a sender so the queue stays open after the router is consumed.
        let _sender = state.sender.clone();
        let response = router()
            .with_state(state)
            .oneshot(post_json(r#"{"ID":"x","Valor1":"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(!body_text(response).await.is_empty());
        let nothing = tokio::time::timeout(Duration::from_millis(20), receiver.dequeue()).await;
        assert!(nothing.is_err());
    }

    #[tokio::test]
    async fn test_field_names_match_case_insensitively() {
        let (state, receiver) = state_with_queue(10, OverflowPolicy::Reject);
        let response = router()
            .with_state(state)
            .oneshot(post_json(r#"{"id":"x","VALOR1":5,"valor2":1,"vAlOr3":2}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let queued = receiver.dequeue().await.unwrap();
        assert_eq!(queued, UpdateRequest::new("x", 5.0, 1.0, 2.0).unwrap());
    }

    #[tokio::test]
    async fn test_missing_id_reports_decode_error() {
        let (state, _receiver) = state_with_queue(10, OverflowPolicy::Reject);
        let response = router()
            .with_state(state)
            .oneshot(post_json(r#"{"Valor1":1,"Valor2":2,"Valor3":3}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.contains("missing field `ID`"));
    }

    #[tokio::test]
    async fn test_empty_id_is_bad_request() {
        let (state, _receiver) = state_with_queue(10, OverflowPolicy::Reject);
        let response = router()
            .with_state(state)
            .oneshot(post_json(r#"{"ID":"","Valor1":1}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "ID must not be empty");
    }

    #[tokio::test]
    async fn test_other_methods_not_allowed() {
        for method in [Method::GET, Method::PUT, Method::DELETE] {
            let (state, _receiver) = state_with_queue(10, OverflowPolicy::Reject);
            let request = Request::builder()
                .method(method)
                .uri("/calculo")
                .body(Body::empty())
                .unwrap();

            let response = router().with_state(state).oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
            assert_eq!(body_text(response).await, "method not supported");
        }
    }

    #[tokio::test]
    async fn test_full_queue_is_service_unavailable() {
        let (state, receiver) = state_with_queue(1, OverflowPolicy::Reject);
        let _sender = state.sender.clone();
        let app = router().with_state(state);

        let first = app
            .clone()
            .oneshot(post_json(r#"{"ID":"a","Valor1":1}"#))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::ACCEPTED);

        let second = app
            .oneshot(post_json(r#"{"ID":"b","Valor1":1}"#))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_text(second).await, "request queue is full");

        // Only the accepted request was queued.
        assert_eq!(receiver.dequeue().await.unwrap().key(), "a");
        let nothing = tokio::time::timeout(Duration::from_millis(20), receiver.dequeue()).await;
        assert!(nothing.is_err());
    }

    #[tokio::test]
    async fn test_block_policy_waits_for_space() {
        let (state, receiver) = state_with_queue(1, OverflowPolicy::Block);
        let app = router().with_state(state);

        let first = app
            .clone()
            .oneshot(post_json(r#"{"ID":"a","Valor1":1}"#))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::ACCEPTED);

        let mut second = tokio::spawn(app.oneshot(post_json(r#"{"ID":"b","Valor1":1}"#)));
        let still_waiting = tokio::time::timeout(Duration::from_millis(50), &mut second).await;
        assert!(still_waiting.is_err());

        assert_eq!(receiver.dequeue().await.unwrap().key(), "a");
        let second = tokio::time::timeout(Duration::from_secs(1), second)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(second.status(), StatusCode::ACCEPTED);
        assert_eq!(receiver.dequeue().await.unwrap().key(), "b");
    }
}
