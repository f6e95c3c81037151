//! Classify one command line into a structured response
//!
//! This is the per-line isolation boundary: whatever the classifier does,
//! `process` always comes back with something to send to the shell.

use crate::core::config::{LOG_TARGET, UNKNOWN_INTENT};
use crate::nlu::catalog::IntentCatalog;
use crate::nlu::classifier::ZeroShotClassifier;
use serde::{Deserialize, Serialize};

/// Message returned when no classifier was ever attached
pub const NOT_INITIALIZED: &str = "Classifier not initialized.";

/// Successful classification of one input line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub original_text: String,
    /// Canonical command keyword, or "unknown"
    pub intent: String,
    /// Catalog description the model ranked first
    pub predicted_label: String,
    pub confidence: f64,
    /// Everything after the first word
    pub arguments_text: String,
}

/// Failure to classify one input line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResult {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub original_text: Option<String>,
}

/// One line of output to the shell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NluResponse {
    Classified(ClassificationResult),
    Failed(ErrorResult),
}

impl NluResponse {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Drop the first whitespace-delimited token and rejoin the rest with single spaces
pub fn arguments_text(text: &str) -> String {
    text.split_whitespace().skip(1).collect::<Vec<_>>().join(" ")
}

/// Owns the classifier and the catalog it scores against
pub struct CommandProcessor<C> {
    classifier: Option<C>,
    catalog: IntentCatalog,
}

impl<C: ZeroShotClassifier> CommandProcessor<C> {
    pub fn new(classifier: C, catalog: IntentCatalog) -> Self {
        Self {
            classifier: Some(classifier),
            catalog,
        }
    }

    /// A processor that answers every line with an initialization error
    pub fn without_classifier(catalog: IntentCatalog) -> Self {
        Self {
            classifier: None,
            catalog,
        }
    }

    pub fn has_classifier(&self) -> bool {
        self.classifier.is_some()
    }

    /// Classify `text` and map the winning label to a command keyword
    pub async fn process(&self, text: &str) -> NluResponse {
        let Some(classifier) = &self.classifier else {
            return NluResponse::Failed(ErrorResult {
                error: NOT_INITIALIZED.into(),
                original_text: None,
            });
        };

        let labels = self.catalog.descriptions();
        let ranking = match classifier.classify(text, &labels).await {
            Ok(ranking) => ranking,
            Err(e) => {
                tracing::error!(
                    target: LOG_TARGET,
                    "Error processing command '{}': {}",
                    text,
                    e
                );
                return NluResponse::Failed(ErrorResult {
                    error: e.to_string(),
                    original_text: Some(text.into()),
                });
            }
        };

        let top = ranking.top();
        let intent = self.catalog.keyword_for(&top.label).or(UNKNOWN_INTENT);
        tracing::debug!(
            target: LOG_TARGET,
            "{:?} -> {} ({:?}, {:.3})",
            text,
            intent,
            top.label,
            top.score
        );

        NluResponse::Classified(ClassificationResult {
            original_text: text.into(),
            intent: intent.into(),
            predicted_label: top.label.clone(),
            confidence: top.score,
            arguments_text: arguments_text(text),
        })
    }
}
