//! Natural language understanding: zero-shot intent classification

pub mod catalog;
pub mod classifier;
pub mod client;
pub mod processor;

pub use catalog::{IntentCatalog, IntentEntry, KeywordLookup};
pub use classifier::{LabelScore, Ranking, ZeroShotClassifier};
pub use client::InferenceClient;
pub use processor::{
    arguments_text, ClassificationResult, CommandProcessor, ErrorResult, NluResponse,
};
