use chrono::NaiveDate;
use serde::Serialize;

use crate::entity::{Confidence, Extraction};
use crate::story::Story;

/// Everything the decision engine looked at, for auditing automated removals
#[derive(Debug, Clone, Serialize)]
pub struct DecisionRecord {
    pub entities1: Extraction,
    pub entities2: Extraction,
    pub entity_match: bool,
    pub high_confidence: bool,
    pub confidence: Confidence,
    pub entity_reason: String,
    // Rounded to 3 decimals
    pub word_similarity: f64,
    // None when no embedding comparison was made
    pub embedding_similarity: Option<f64>,
    pub decision_reason: String,
}

/// A candidate story dropped because it repeats a published one
#[derive(Debug, Clone, Serialize)]
pub struct Removal {
    pub story: Story,
    pub matched_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_date: Option<NaiveDate>,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision: Option<DecisionRecord>,
}

/// Result of filtering candidates against history
#[derive(Debug, Clone, Default, Serialize)]
pub struct FilterOutcome {
    pub kept: Vec<Story>,
    pub removed: Vec<Removal>,
}

impl FilterOutcome {
    pub fn all_removed(&self) -> bool {
        self.kept.is_empty() && !self.removed.is_empty()
    }
}

pub(crate) fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

pub(crate) fn percent(value: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, value * 100.0)
}
