//! Axum server setup and router configuration.

use crate::shutdown::shutdown_signal;
use crate::state::AppState;
use axum::{Json, Router, response::IntoResponse, routing::get};
use serde::Serialize;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Build the main application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        .merge(crate::api::router())
        .with_state(state)
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    queue_capacity: usize,
    queue_available: usize,
    keys: usize,
}

/// Health check with a glance at pipeline occupancy.
async fn health_check(state: axum::extract::State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        queue_capacity: state.sender.capacity(),
        queue_available: state.sender.available(),
        keys: state.store.len(),
    })
}

/// Run the server with graceful shutdown support.
pub async fn run_server(router: Router, addr: SocketAddr) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::state_with_queue;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tally_core::config::OverflowPolicy;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health() {
        let (state, _receiver) = state_with_queue(7, OverflowPolicy::Reject);
        let response = build_router(state)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["status"], "healthy");
        assert_eq!(value["queue_capacity"], 7);
        assert_eq!(value["queue_available"], 7);
        assert_eq!(value["keys"], 0);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let (state, _receiver) = state_with_queue(1, OverflowPolicy::Reject);
        let response = build_router(state)
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_client_round_trip_through_workers() {
        use std::time::Duration;
        use tally_core::processors::WorkerPool;
        use tally_sdk::client::{ClientError, TallyClient};
        use tally_sdk::objects::CalculationRequest;
        use tokio::sync::watch;

        let (state, receiver) = state_with_queue(10, OverflowPolicy::Reject);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let _pool = WorkerPool::start(
            2,
            receiver,
            state.store.clone(),
            state.config.report.clone(),
            shutdown_rx,
        );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = build_router(state);
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        let client = TallyClient::new(url::Url::parse(&format!("http://{addr}")).unwrap());

        assert!(client.result("x").await.unwrap().is_none());
        client
            .submit(&CalculationRequest {
                id: "x".into(),
                valor1: 2.0,
                valor2: 3.0,
                valor3: 1.0,
            })
            .await
            .unwrap();

        let result = tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                if let Some(result) = client.result("x").await.unwrap() {
                    return result;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("update never applied");
        assert_eq!((result.sum_result, result.diff_result), (5.0, 2.0));

        let snapshot = client.snapshot().await.unwrap();
        assert_eq!(snapshot.results, vec![result]);

        let err = client
            .submit(&CalculationRequest {
                id: "".into(),
                valor1: 0.0,
                valor2: 0.0,
                valor3: 0.0,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Api { .. }));
    }
}
