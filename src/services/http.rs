//! HTTP implementation of [`FarmServices`]
//!
//! One `reqwest::Client` (with a cookie store) serves every call, so the
//! context recorded by `/predict` is looked up under the same client
//! identity when `/userQuery` runs.

use crate::config::ServicesConfig;
use crate::error::{AgronusError, Result};
use crate::services::types::{
    ChatRequest, ChatResponse, HealthStatus, LatestPrediction, LatestPredictionEnvelope,
    PredictionAck, UserQueryRequest, UserQueryResponse,
};
use crate::services::FarmServices;
use crate::soil::SoilParameters;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;

/// Prediction and chat services reached over HTTP
///
/// # Examples
///
/// ```
/// use agronus::config::ServicesConfig;
/// use agronus::services::HttpFarmServices;
///
/// let services = HttpFarmServices::new(&ServicesConfig::default()).unwrap();
/// assert_eq!(services.prediction_url(), "http://127.0.0.1:5001");
/// ```
#[derive(Debug, Clone)]
pub struct HttpFarmServices {
    client: Client,
    prediction_url: String,
    chat_url: String,
}

impl HttpFarmServices {
    /// Create a client for the configured services
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(config: &ServicesConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .user_agent(concat!("agronus/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AgronusError::Service(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "Initialized farm services: prediction={}, chat={}",
            config.prediction_url,
            config.chat_url
        );

        Ok(Self {
            client,
            prediction_url: config.prediction_url.trim_end_matches('/').to_string(),
            chat_url: config.chat_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL of the prediction service
    pub fn prediction_url(&self) -> &str {
        &self.prediction_url
    }

    /// Base URL of the chat service
    pub fn chat_url(&self) -> &str {
        &self.chat_url
    }

    /// Query the prediction service health endpoint
    ///
    /// # Errors
    ///
    /// Returns error on network failure, a non-success status, or an
    /// unparseable body
    pub async fn health(&self) -> Result<HealthStatus> {
        let url = format!("{}/health", self.prediction_url);
        let response = self.get(&url).await?;
        let response = ensure_success("health", response).await?;
        parse_json("health", response).await
    }

    /// Fetch the prediction context the service holds for this client
    ///
    /// Returns `Ok(None)` when the service has no prediction stored yet.
    ///
    /// # Errors
    ///
    /// Returns error on network failure, an unexpected status, or an
    /// unparseable body
    pub async fn latest_prediction(&self) -> Result<Option<LatestPrediction>> {
        let url = format!("{}/get-latest-prediction", self.prediction_url);
        let response = self.get(&url).await?;
        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!("No prediction stored for this client");
            return Ok(None);
        }
        let response = ensure_success("get-latest-prediction", response).await?;
        let envelope: LatestPredictionEnvelope =
            parse_json("get-latest-prediction", response).await?;
        Ok(Some(envelope.latest_prediction))
    }

    async fn get(&self, url: &str) -> Result<Response> {
        tracing::debug!("GET {}", url);
        self.client.get(url).send().await.map_err(|e| {
            tracing::error!("Request to {} failed: {}", url, e);
            AgronusError::Service(format!("Request to {} failed: {}", url, e)).into()
        })
    }

    async fn post<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> Result<Response> {
        tracing::debug!("POST {}", url);
        self.client.post(url).json(body).send().await.map_err(|e| {
            tracing::error!("Request to {} failed: {}", url, e);
            AgronusError::Service(format!("Request to {} failed: {}", url, e)).into()
        })
    }
}

async fn ensure_success(endpoint: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let error_text = response.text().await.unwrap_or_default();
    tracing::error!("{} returned error {}: {}", endpoint, status, error_text);
    Err(AgronusError::Service(format!("{} returned error {}: {}", endpoint, status, error_text)).into())
}

async fn parse_json<T: serde::de::DeserializeOwned>(endpoint: &str, response: Response) -> Result<T> {
    response.json().await.map_err(|e| {
        tracing::error!("Failed to parse {} response: {}", endpoint, e);
        AgronusError::Service(format!("Failed to parse {} response: {}", endpoint, e)).into()
    })
}

#[async_trait]
impl FarmServices for HttpFarmServices {
    async fn submit_context(&self, soil: &SoilParameters) -> Result<PredictionAck> {
        let url = format!("{}/predict", self.prediction_url);
        let response = self.post(&url, soil).await?;
        let response = ensure_success("predict", response).await?;

        // Only the status matters here; an odd body is logged, not fatal.
        let body = response.text().await?;
        let ack = match serde_json::from_str::<PredictionAck>(&body) {
            Ok(ack) => ack,
            Err(e) => {
                tracing::debug!("Ignoring unparseable predict body: {}", e);
                PredictionAck::default()
            }
        };
        tracing::debug!("Prediction context set: crop={:?}", ack.crop);
        Ok(ack)
    }

    async fn transform_query(&self, text: &str) -> Result<String> {
        let url = format!("{}/userQuery", self.prediction_url);
        let response = self.post(&url, &UserQueryRequest { text }).await?;
        let response = ensure_success("userQuery", response).await?;
        let body: UserQueryResponse = parse_json("userQuery", response).await?;
        tracing::debug!("Received prompt of {} chars", body.prompt.len());
        Ok(body.prompt)
    }

    async fn generate_answer(&self, prompt: &str) -> Result<Option<String>> {
        let url = format!("{}/chat", self.chat_url);
        let response = self.post(&url, &ChatRequest { prompt }).await?;
        let response = ensure_success("chat", response).await?;
        let body: ChatResponse = parse_json("chat", response).await?;
        Ok(body.rag_response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_trailing_slash() {
        let config = ServicesConfig {
            prediction_url: "http://farm.example:5001/".to_string(),
            chat_url: "http://rag.example:5002/api/".to_string(),
            timeout_seconds: Some(10),
        };
        let services = HttpFarmServices::new(&config).unwrap();
        assert_eq!(services.prediction_url(), "http://farm.example:5001");
        assert_eq!(services.chat_url(), "http://rag.example:5002/api");
    }

    #[tokio::test]
    async fn test_unreachable_service_is_service_error() {
        let config = ServicesConfig {
            // Port 9 (discard) on localhost is closed in test environments.
            prediction_url: "http://127.0.0.1:9".to_string(),
            ..ServicesConfig::default()
        };
        let services = HttpFarmServices::new(&config).unwrap();
        let err = services
            .submit_context(&SoilParameters::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Request to http://127.0.0.1:9/predict failed"));
    }
}
