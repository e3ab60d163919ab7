use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::ClientError;
use crate::message::{
    HealthStatus, PredictionRequest, PredictionResponse, QueryRequest, QueryResponse, StatsQuery,
    StatsResponse,
};

/// The remote air-quality service.
///
/// Implementations make exactly one attempt per call; retrying is up to the
/// user.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn health(&self) -> Result<HealthStatus, ClientError>;
    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse, ClientError>;
    async fn predict(&self, request: &PredictionRequest)
    -> Result<PredictionResponse, ClientError>;
    async fn statistics(&self, query: &StatsQuery) -> Result<StatsResponse, ClientError>;
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))
    }
}

/// Reads the body as JSON whatever the status code, the way `fetch` callers
/// do: a 503 with a JSON error body is an answer, not a transport failure.
async fn decode_body<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    let url = response.url().clone();
    let bytes = response.bytes().await?;
    let value: Value = serde_json::from_slice(&bytes).map_err(ClientError::Decode)?;
    if value.is_null() {
        return Err(ClientError::NullBody);
    }
    if !status.is_success() {
        debug!(%url, %status, body = %value, "backend answered with an error status");
    }
    serde_json::from_value(value).map_err(ClientError::UnexpectedShape)
}

#[async_trait]
impl Backend for HttpBackend {
    async fn health(&self) -> Result<HealthStatus, ClientError> {
        let response = self.client.get(self.endpoint("health")?).send().await?;
        decode_body(response).await
    }

    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse, ClientError> {
        let response = self
            .client
            .post(self.endpoint("api/query")?)
            .json(request)
            .send()
            .await?;
        decode_body(response).await
    }

    async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, ClientError> {
        let response = self
            .client
            .post(self.endpoint("api/predict")?)
            .json(request)
            .send()
            .await?;
        decode_body(response).await
    }

    async fn statistics(&self, query: &StatsQuery) -> Result<StatsResponse, ClientError> {
        let mut url = self.endpoint("api/stats/")?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push(&query.stat_type);

        let response = self.client.get(url).query(query).send().await?;
        decode_body(response).await
    }
}
