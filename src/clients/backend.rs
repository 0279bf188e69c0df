use std::time::{Duration, Instant};

use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::core::config::Settings;
use crate::core::security::Session;

const REQUEST_ID_HEADER: &str = "x-request-id";
const MAX_DETAIL_LEN: usize = 300;

#[derive(Debug, Error)]
pub(crate) enum ClientError {
    #[error("upstream resource not found: {path}")]
    NotFound { path: String },
    #[error("upstream rejected request ({status}): {detail}")]
    Rejected { status: u16, detail: String },
    #[error("upstream failure ({status}) on {path}")]
    Upstream { status: u16, path: String },
    #[error("failed to reach upstream: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("failed to decode upstream response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("invalid upstream url: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    pub(crate) fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// HTTP handle on the upstream REST backend.
///
/// Every call forwards the caller's bearer token and request id; the backend owns
/// authorization of the underlying records.
#[derive(Debug, Clone)]
pub(crate) struct BackendClient {
    client: Client,
    base_url: Url,
}

impl BackendClient {
    pub(crate) fn from_settings(settings: &Settings) -> Result<Self, ClientError> {
        let backend = settings.backend();
        Self::new(
            &backend.base_url,
            Duration::from_secs(backend.timeout_seconds),
            Duration::from_secs(backend.connect_timeout_seconds),
        )
    }

    pub(crate) fn new(
        base_url: &str,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, ClientError> {
        let base_url =
            Url::parse(base_url).map_err(|err| ClientError::InvalidUrl(err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }

        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(timeout)
            .build()
            .map_err(ClientError::Transport)?;

        Ok(Self { client, base_url })
    }

    pub(crate) fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        session: &Session,
        segments: &[&str],
    ) -> Result<T, ClientError> {
        let url = self.url(segments)?;
        let request = self.request(Method::GET, url.clone(), session);
        self.send_json(request, &url).await
    }

    pub(crate) async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        session: &Session,
        segments: &[&str],
        query: &Q,
    ) -> Result<T, ClientError> {
        let url = self.url(segments)?;
        let request = self.request(Method::GET, url.clone(), session).query(query);
        self.send_json(request, &url).await
    }

    pub(crate) async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        session: &Session,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ClientError> {
        let url = self.url(segments)?;
        let request = self.request(Method::POST, url.clone(), session).json(body);
        self.send_json(request, &url).await
    }

    pub(crate) async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        session: &Session,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ClientError> {
        let url = self.url(segments)?;
        let request = self.request(Method::PUT, url.clone(), session).json(body);
        self.send_json(request, &url).await
    }

    /// POST whose answer carries nothing the gateway needs; the body is discarded.
    pub(crate) async fn post_discarding<B: Serialize + ?Sized>(
        &self,
        session: &Session,
        segments: &[&str],
        body: &B,
    ) -> Result<(), ClientError> {
        let url = self.url(segments)?;
        let request = self.request(Method::POST, url.clone(), session).json(body);
        self.send(request, &url).await.map(|_| ())
    }

    /// Upstream answers deletes with a free-form message; the body is discarded.
    pub(crate) async fn delete(
        &self,
        session: &Session,
        segments: &[&str],
    ) -> Result<(), ClientError> {
        let url = self.url(segments)?;
        let request = self.request(Method::DELETE, url.clone(), session);
        self.send(request, &url).await.map(|_| ())
    }

    /// Any HTTP answer counts as reachable; only transport errors mark the backend down.
    pub(crate) async fn probe(&self) -> Result<StatusCode, ClientError> {
        self.client
            .get(self.base_url.clone())
            .send()
            .await
            .map(|response| response.status())
            .map_err(ClientError::Transport)
    }

    fn url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url, session: &Session) -> RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(&session.token)
            .header(REQUEST_ID_HEADER, &session.request_id)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &Url,
    ) -> Result<T, ClientError> {
        let response = self.send(request, url).await?;
        response
            .json::<T>()
            .await
            .map_err(|source| ClientError::Decode { path: url.path().to_string(), source })
    }

    async fn send(
        &self,
        request: RequestBuilder,
        url: &Url,
    ) -> Result<reqwest::Response, ClientError> {
        let timer = Instant::now();
        let result = request.send().await;
        let elapsed = timer.elapsed().as_secs_f64();

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                record_upstream_call("transport_error", elapsed);
                tracing::warn!(path = %url.path(), error = %err, "Upstream request failed");
                return Err(ClientError::Transport(err));
            }
        };

        let status = response.status();
        record_upstream_call(status.as_str(), elapsed);
        tracing::debug!(path = %url.path(), status = status.as_u16(), elapsed, "Upstream call");

        if status.is_success() {
            return Ok(response);
        }

        let path = url.path().to_string();
        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound { path });
        }

        if status.is_client_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                detail: extract_detail(&body),
            });
        }

        Err(ClientError::Upstream { status: status.as_u16(), path })
    }
}

fn record_upstream_call(outcome: &str, elapsed_seconds: f64) {
    metrics::counter!("upstream_requests_total", "outcome" => outcome.to_string()).increment(1);
    metrics::histogram!("upstream_request_duration_seconds").record(elapsed_seconds);
}

fn extract_detail(body: &str) -> String {
    let parsed = serde_json::from_str::<Value>(body).ok();
    let message = parsed.as_ref().and_then(|value| {
        ["message", "error", "detail"]
            .iter()
            .find_map(|key| value.get(*key).and_then(Value::as_str))
            .map(str::to_string)
    });

    let detail = message.unwrap_or_else(|| body.trim().to_string());
    if detail.is_empty() {
        return "Request rejected by backend".to_string();
    }

    detail.chars().take(MAX_DETAIL_LEN).collect()
}
