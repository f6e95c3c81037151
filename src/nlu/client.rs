//! Async client for a hosted zero-shot classification endpoint
//!
//! Talks to the Hugging Face inference API (or anything serving the same
//! `zero-shot-classification` task format). The model runs remotely; this
//! client only shapes requests and normalizes responses into a [`Ranking`].

use crate::core::config::{ServerConfig, LOG_TARGET, WARM_UP_LABELS, WARM_UP_TEXT};
use crate::core::error::{NluError, Result};
use crate::nlu::classifier::{LabelScore, Ranking, ZeroShotClassifier};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Async inference client bound to one model
pub struct InferenceClient {
    client: Client,
    model_url: String,
    model: String,
    api_token: Option<String>,
}

impl InferenceClient {
    /// Create a client without contacting the endpoint
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            client: Client::new(),
            model_url: config.model_url(),
            model: config.model.clone(),
            api_token: config.api_token.clone(),
        }
    }

    /// Create a client and make sure the model is loaded and answering
    ///
    /// Blocks (asynchronously) until the endpoint has loaded the model,
    /// which can take a while on a cold start.
    pub async fn connect(config: &ServerConfig) -> Result<Self> {
        let client = Self::new(config);
        tracing::info!(
            target: LOG_TARGET,
            "Initializing zero-shot classification pipeline with model: {}...",
            client.model
        );

        let ranking = client.request(WARM_UP_TEXT, &WARM_UP_LABELS, true).await?;
        tracing::debug!(
            target: LOG_TARGET,
            "Warm-up classified as {:?} ({:.3})",
            ranking.top().label,
            ranking.top().score
        );
        tracing::info!(target: LOG_TARGET, "Classifier initialized successfully.");

        Ok(client)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn request(
        &self,
        text: &str,
        candidate_labels: &[&str],
        wait_for_model: bool,
    ) -> Result<Ranking> {
        let request = ZeroShotRequest {
            inputs: text,
            parameters: ZeroShotParameters {
                candidate_labels,
                multi_label: false,
            },
            options: RequestOptions { wait_for_model },
        };

        let mut builder = self
            .client
            .post(&self.model_url)
            .header("content-type", "application/json")
            .json(&request);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| NluError::Inference(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| NluError::Inference(e.to_string()))?;

        if !status.is_success() {
            return Err(NluError::Inference(format!(
                "API error ({}): {}",
                status,
                api_error_message(&body)
            )));
        }

        parse_ranking(&body)
    }
}

impl ZeroShotClassifier for InferenceClient {
    async fn classify(&self, text: &str, candidate_labels: &[&str]) -> Result<Ranking> {
        self.request(text, candidate_labels, false).await
    }
}

/// Normalize either response shape the endpoint may produce
fn parse_ranking(body: &str) -> Result<Ranking> {
    let response: ZeroShotResponse = serde_json::from_str(body).map_err(|e| {
        NluError::MalformedResponse(format!("{} - Response: {}", e, body))
    })?;

    match response {
        ZeroShotResponse::Pipeline { labels, scores } => {
            Ranking::from_parallel(labels, scores)
        }
        ZeroShotResponse::Scored(entries) => Ranking::from_entries(
            entries
                .into_iter()
                .map(|e| LabelScore {
                    label: e.label,
                    score: e.score,
                })
                .collect(),
        ),
    }
}

/// Pull the `error` field out of a failure body, falling back to the raw text
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiError>(body)
        .map(|e| e.error)
        .unwrap_or_else(|_| body.trim().to_string())
}

#[derive(Serialize)]
struct ZeroShotRequest<'a> {
    inputs: &'a str,
    parameters: ZeroShotParameters<'a>,
    options: RequestOptions,
}

#[derive(Serialize)]
struct ZeroShotParameters<'a> {
    candidate_labels: &'a [&'a str],
    multi_label: bool,
}

#[derive(Serialize)]
struct RequestOptions {
    wait_for_model: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ZeroShotResponse {
    // Classic pipeline output
    Pipeline {
        labels: Vec<String>,
        scores: Vec<f64>,
    },
    // Router output
    Scored(Vec<ScoredLabel>),
}

#[derive(Deserialize)]
struct ScoredLabel {
    label: String,
    score: f64,
}

#[derive(Deserialize)]
struct ApiError {
    error: String,
}
