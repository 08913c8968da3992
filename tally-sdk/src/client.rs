//! HTTP client for a Tally server.
//!
//! Gated behind the `client` cargo feature so crates that only need the
//! wire types do not pull in `reqwest`.

use reqwest::{Client, StatusCode};
use url::Url;

use crate::objects::{CalculationRequest, CalculationResult, SnapshotResponse};

/// Body the server sends with a 503 when the queue is at capacity.
const QUEUE_FULL_BODY: &str = "request queue is full";

/// Errors produced by [`TallyClient`].
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level failure (DNS, TLS, connection reset, …).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server's request queue was full and the submission was rejected.
    /// The caller may retry later.
    #[error("server queue is full")]
    QueueFull,

    /// The server returned any other non-2xx status code, including a 503
    /// from a server whose workers have stopped.
    #[error("api error: status {status}, body: {body}")]
    Api { status: StatusCode, body: String },

    /// Response body could not be deserialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The base URL could not be joined with the endpoint path.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

/// Typed HTTP client for the Tally API.
#[derive(Debug, Clone)]
pub struct TallyClient {
    http: Client,
    base_url: Url,
}

impl TallyClient {
    /// Create a new client rooted at `base_url` (e.g. `http://localhost:8080`).
    pub fn new(base_url: Url) -> Self {
        Self {
            http: Client::new(),
            base_url,
        }
    }

    /// Replace the default `reqwest::Client`.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// `POST /calculo` – enqueue an update. Returns once the server has
    /// accepted it; the aggregate is applied asynchronously.
    pub async fn submit(&self, request: &CalculationRequest) -> Result<(), ClientError> {
        let url = self.base_url.join("/calculo")?;
        let resp = self.http.post(url).json(request).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            if status == StatusCode::SERVICE_UNAVAILABLE && body == QUEUE_FULL_BODY {
                return Err(ClientError::QueueFull);
            }
            return Err(ClientError::Api { status, body });
        }
        Ok(())
    }

    /// `GET /resultados/{id}` – current aggregates of one key, `None` if the
    /// key has never been updated.
    pub async fn result(&self, id: &str) -> Result<Option<CalculationResult>, ClientError> {
        let mut url = self.base_url.join("/resultados/")?;
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .push(id);

        let resp = self.http.get(url).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        parse_response(resp).await.map(Some)
    }

    /// `GET /resultados` – every key's aggregates.
    pub async fn snapshot(&self) -> Result<SnapshotResponse, ClientError> {
        let url = self.base_url.join("/resultados")?;
        let resp = self.http.get(url).send().await?;
        parse_response(resp).await
    }
}

async fn parse_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::Api { status, body });
    }
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(ClientError::Json)
}
