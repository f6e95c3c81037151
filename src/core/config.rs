//! Server configuration with documented constants
//!
//! The model identifier is fixed at compile time. Only the endpoint that
//! serves it (and the credential for that endpoint) come from the
//! environment.

/// Pretrained zero-shot model every classification is run against
pub const MODEL_NAME: &str = "facebook/bart-large-mnli";

/// Input line that shuts the server down (compared case-insensitively)
pub const EXIT_SENTINEL: &str = "__exit__";

/// Keyword reported when the predicted label has no catalog entry
pub const UNKNOWN_INTENT: &str = "unknown";

/// Tracing target every diagnostic is emitted under
pub const LOG_TARGET: &str = "nlu_server";

/// Hosted inference base URL; the model identifier is appended as a path segment
pub const DEFAULT_INFERENCE_URL: &str = "https://router.huggingface.co/hf-inference/models";

/// Text classified once at startup to force the model to load
pub const WARM_UP_TEXT: &str = "show command instructions";

/// Labels used for the warm-up classification
pub const WARM_UP_LABELS: [&str; 2] = ["help", "exit"];

/// Endpoint settings for the inference backend
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Base URL of the inference service
    pub inference_url: String,

    /// Bearer token sent with every request, if any
    ///
    /// Anonymous requests work against some deployments but are heavily
    /// rate limited on the public endpoint.
    pub api_token: Option<String>,

    /// Model identifier, always [`MODEL_NAME`]
    pub model: String,
}

impl ServerConfig {
    /// Build configuration from environment variables
    ///
    /// Optional: NLU_INFERENCE_URL (defaults to the hosted inference API)
    /// Optional: HF_API_TOKEN
    pub fn from_env() -> Self {
        let inference_url =
            std::env::var("NLU_INFERENCE_URL").unwrap_or_else(|_| DEFAULT_INFERENCE_URL.into());
        let api_token = std::env::var("HF_API_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty());

        Self {
            inference_url,
            api_token,
            model: MODEL_NAME.into(),
        }
    }

    /// Full URL of the model endpoint
    pub fn model_url(&self) -> String {
        format!("{}/{}", self.inference_url.trim_end_matches('/'), self.model)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            inference_url: DEFAULT_INFERENCE_URL.into(),
            api_token: None,
            model: MODEL_NAME.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_targets_fixed_model() {
        let config = ServerConfig::default();
        assert_eq!(config.model, MODEL_NAME);
        assert!(config.api_token.is_none());
    }

    #[test]
    fn test_model_url_joins_without_double_slash() {
        let config = ServerConfig {
            inference_url: "http://localhost:8080/models/".into(),
            ..ServerConfig::default()
        };
        assert_eq!(
            config.model_url(),
            "http://localhost:8080/models/facebook/bart-large-mnli"
        );
    }
}
