//! Zero-shot classification capability
//!
//! The server never depends on a concrete model backend. Anything that can
//! score a text against a set of candidate labels implements
//! [`ZeroShotClassifier`]; the HTTP client in `nlu::client` is the
//! production implementation and tests substitute deterministic stubs.

use crate::core::error::{NluError, Result};
use serde::Serialize;

/// A candidate label with its score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

/// Candidate labels ordered by descending score
///
/// Never empty. For single-label scoring the scores sum to roughly 1.0,
/// but nothing here relies on that.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    entries: Vec<LabelScore>,
}

impl Ranking {
    /// Pair labels with scores and sort them best first
    pub fn from_parallel(labels: Vec<String>, scores: Vec<f64>) -> Result<Self> {
        if labels.len() != scores.len() {
            return Err(NluError::MalformedResponse(format!(
                "{} labels but {} scores",
                labels.len(),
                scores.len()
            )));
        }

        Self::from_entries(
            labels
                .into_iter()
                .zip(scores)
                .map(|(label, score)| LabelScore { label, score })
                .collect(),
        )
    }

    /// Sort arbitrary (label, score) entries best first
    ///
    /// The sort is stable, so ties keep the order they arrived in.
    pub fn from_entries(mut entries: Vec<LabelScore>) -> Result<Self> {
        if entries.is_empty() {
            return Err(NluError::MalformedResponse("no labels returned".into()));
        }
        if let Some(bad) = entries.iter().find(|e| !e.score.is_finite()) {
            return Err(NluError::MalformedResponse(format!(
                "non-finite score for label {:?}",
                bad.label
            )));
        }

        entries.sort_by(|a, b| b.score.total_cmp(&a.score));
        Ok(Self { entries })
    }

    /// Highest scoring label (rank 0)
    pub fn top(&self) -> &LabelScore {
        // from_entries rejects empty rankings
        &self.entries[0]
    }

    pub fn entries(&self) -> &[LabelScore] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Scores a text against candidate labels
///
/// Implementations perform single-label scoring and must return every
/// candidate label, ranked best first. Failures are returned, never
/// panicked, so one bad input cannot take the server down.
#[allow(async_fn_in_trait)]
pub trait ZeroShotClassifier {
    async fn classify(&self, text: &str, candidate_labels: &[&str]) -> Result<Ranking>;
}

impl<C: ZeroShotClassifier + ?Sized> ZeroShotClassifier for &C {
    async fn classify(&self, text: &str, candidate_labels: &[&str]) -> Result<Ranking> {
        (**self).classify(text, candidate_labels).await
    }
}
