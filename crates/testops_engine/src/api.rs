use std::fmt;

use serde::Deserialize;
use serde_json::Value;
use testops_core::{JobKind, JobStatus, LiveJobView};

use crate::ClientSettings;

/// Failure classes for backend requests.
///
/// Every variant here is transient from the polling subsystem's point of
/// view: a failed status poll is retried on the next tick. Only an explicit
/// terminal job status stops polling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiFailure {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    Decode,
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiFailure::InvalidUrl => write!(f, "invalid url"),
            ApiFailure::HttpStatus(code) => write!(f, "http status {code}"),
            ApiFailure::Timeout => write!(f, "timeout"),
            ApiFailure::Network => write!(f, "network error"),
            ApiFailure::Decode => write!(f, "response decode error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: ApiFailure,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: ApiFailure, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Synchronous acknowledgement returned by a submission endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubmitAck {
    pub job_id: String,
    pub status: JobStatus,
    #[serde(default)]
    pub message: Option<String>,
    /// Server-side estimate in seconds, informational only.
    #[serde(default)]
    pub estimated_time: Option<u32>,
    #[serde(default)]
    pub progress: Option<u8>,
}

/// Boundary to the TestOps backend, one method per endpoint family.
///
/// `fetch_status` must be idempotent and safe to call repeatedly; it is the
/// only method driven by the polling loop.
#[async_trait::async_trait]
pub trait JobApi: Send + Sync {
    async fn fetch_status(&self, kind: JobKind, job_id: &str) -> Result<LiveJobView, ApiError>;

    async fn submit(&self, kind: JobKind, body: Value) -> Result<SubmitAck, ApiError>;

    /// Fetch the generated artifact. Called only after the caller has
    /// observed `completed`; never part of the polling loop.
    async fn download(&self, kind: JobKind, job_id: &str) -> Result<Vec<u8>, ApiError>;
}

/// [`JobApi`] over HTTP via reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestJobApi {
    base_url: String,
    client: reqwest::Client,
}

impl ReqwestJobApi {
    pub fn new(settings: &ClientSettings) -> Result<Self, ApiError> {
        reqwest::Url::parse(&settings.base_url)
            .map_err(|err| ApiError::new(ApiFailure::InvalidUrl, err.to_string()))?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(ApiFailure::Network, err.to_string()))?;
        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait::async_trait]
impl JobApi for ReqwestJobApi {
    async fn fetch_status(&self, kind: JobKind, job_id: &str) -> Result<LiveJobView, ApiError> {
        let response = self
            .client
            .get(self.url(&kind.status_path(job_id)))
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                ApiFailure::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        response
            .json::<LiveJobView>()
            .await
            .map_err(|err| ApiError::new(ApiFailure::Decode, err.to_string()))
    }

    async fn submit(&self, kind: JobKind, body: Value) -> Result<SubmitAck, ApiError> {
        let response = self
            .client
            .post(self.url(kind.submit_path()))
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                ApiFailure::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        response
            .json::<SubmitAck>()
            .await
            .map_err(|err| ApiError::new(ApiFailure::Decode, err.to_string()))
    }

    async fn download(&self, kind: JobKind, job_id: &str) -> Result<Vec<u8>, ApiError> {
        let response = self
            .client
            .get(self.url(&kind.download_path(job_id)))
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                ApiFailure::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        Ok(bytes.to_vec())
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(ApiFailure::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ApiError::new(ApiFailure::Decode, err.to_string());
    }
    ApiError::new(ApiFailure::Network, err.to_string())
}
