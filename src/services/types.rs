//! Wire types for the prediction and chat services
//!
//! Request bodies borrow from the caller; response bodies are lenient about
//! optional fields so an older or newer backend still deserializes.

use serde::{Deserialize, Serialize};

/// Acknowledgement returned by `POST /predict`
///
/// The chat flow never reads these fields; they are kept for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PredictionAck {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub prediction: Option<serde_json::Value>,
    #[serde(default)]
    pub crop: Option<serde_json::Value>,
}

/// Body of `POST /userQuery`
#[derive(Debug, Serialize)]
pub struct UserQueryRequest<'a> {
    pub text: &'a str,
}

/// Response of `POST /userQuery`
#[derive(Debug, Deserialize)]
pub struct UserQueryResponse {
    pub prompt: String,
}

/// Body of `POST /chat`
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub prompt: &'a str,
}

/// Response of `POST /chat`
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub rag_response: Option<String>,
}

/// Response of `GET /health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub model_loaded: Option<bool>,
    #[serde(default)]
    pub vector_store_loaded: Option<bool>,
    #[serde(default)]
    pub llm_configured: Option<bool>,
}

/// Prediction context the service holds for this client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestPrediction {
    /// Feature vector in wire order (N, P, K, temperature, humidity, pH, rainfall)
    #[serde(default)]
    pub features: Vec<f64>,
    #[serde(default)]
    pub prediction: Option<serde_json::Value>,
    #[serde(default)]
    pub latest_query: Option<String>,
}

/// Envelope of `GET /get-latest-prediction`
#[derive(Debug, Deserialize)]
pub(crate) struct LatestPredictionEnvelope {
    pub latest_prediction: LatestPrediction,
}
