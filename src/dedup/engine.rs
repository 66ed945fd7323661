use std::sync::Arc;
use tracing::debug;

use super::types::{percent, round3, DecisionRecord};
use super::TARGET_DEDUP;
use crate::entity::{classify_overlap, default_lexicon, extract_entities, Confidence, Lexicon};
use crate::similarity::similarity;
use crate::vector::{embedding_similarity, CachedEmbedder};

/// Thresholds for the hybrid duplicate decision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorConfig {
    // Word similarity needed when entities already corroborate the match
    pub word_threshold: f64,
    pub embedding_threshold: f64,
    // Word similarity needed when no entity evidence exists
    pub no_entity_threshold: f64,
    pub use_embeddings: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            word_threshold: 0.3,
            embedding_threshold: 0.8,
            no_entity_threshold: 0.6,
            use_embeddings: true,
        }
    }
}

/// Hybrid entity + word + embedding duplicate classifier
#[derive(Clone)]
pub struct DuplicateDetector {
    lexicon: Arc<Lexicon>,
    embedder: Option<CachedEmbedder>,
    config: DetectorConfig,
}

impl Default for DuplicateDetector {
    fn default() -> Self {
        Self::new(DetectorConfig::default())
    }
}

impl DuplicateDetector {
    /// Detector over the built-in lexicon with no embedding fallback
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            lexicon: Arc::new(default_lexicon().clone()),
            embedder: None,
            config,
        }
    }

    pub fn with_lexicon(mut self, lexicon: Arc<Lexicon>) -> Self {
        self.lexicon = lexicon;
        self
    }

    pub fn with_embedder(mut self, embedder: CachedEmbedder) -> Self {
        self.embedder = Some(embedder);
        self
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Decide whether two story texts report the same event
    ///
    /// Cheapest checks first:
    /// 1. high-confidence entity overlap is a duplicate without further checks
    /// 2. no entity overlap needs word similarity above `no_entity_threshold`
    /// 3. medium overlap needs word similarity above `word_threshold`, or
    ///    embedding similarity above `embedding_threshold`
    pub async fn is_duplicate(&self, text1: &str, text2: &str) -> (bool, DecisionRecord) {
        let entities1 = extract_entities(text1, &self.lexicon);
        let entities2 = extract_entities(text2, &self.lexicon);
        let overlap = classify_overlap(&entities1, &entities2);
        let word_sim = similarity(text1, text2);

        let mut record = DecisionRecord {
            entities1,
            entities2,
            entity_match: overlap.is_match(),
            high_confidence: overlap.is_high_confidence(),
            confidence: overlap.confidence,
            entity_reason: overlap.reason.clone(),
            word_similarity: round3(word_sim),
            embedding_similarity: None,
            decision_reason: String::new(),
        };

        let duplicate = match overlap.confidence {
            Confidence::High => {
                record.decision_reason =
                    format!("High-confidence entity match: {}", overlap.reason);
                true
            }
            Confidence::None => {
                if word_sim > self.config.no_entity_threshold {
                    record.decision_reason = format!(
                        "No entity match, but high word similarity ({})",
                        percent(word_sim, 1)
                    );
                    true
                } else {
                    record.decision_reason = format!(
                        "No entity match, low word similarity ({})",
                        percent(word_sim, 1)
                    );
                    false
                }
            }
            Confidence::Medium => self.medium_confidence(text1, text2, word_sim, &mut record).await,
        };

        debug!(
            target: TARGET_DEDUP,
            "Duplicate check: duplicate={}, confidence={}, reason={}",
            duplicate, record.confidence, record.decision_reason
        );

        (duplicate, record)
    }

    async fn medium_confidence(
        &self,
        text1: &str,
        text2: &str,
        word_sim: f64,
        record: &mut DecisionRecord,
    ) -> bool {
        let word_threshold = self.config.word_threshold;
        if word_sim > word_threshold {
            record.decision_reason = format!(
                "Entity match + word similarity ({} > {})",
                percent(word_sim, 1),
                percent(word_threshold, 0)
            );
            return true;
        }

        if let Some(embedder) = self.embedder.as_ref().filter(|_| self.config.use_embeddings) {
            let emb_sim = embedding_similarity(embedder, text1, text2).await;
            record.embedding_similarity = Some(round3(emb_sim));

            let embedding_threshold = self.config.embedding_threshold;
            if emb_sim > embedding_threshold {
                record.decision_reason = format!(
                    "Entity match + embedding similarity ({} > {})",
                    percent(emb_sim, 1),
                    percent(embedding_threshold, 0)
                );
                return true;
            }
        }

        record.decision_reason = format!(
            "Entity match but similarities below thresholds (word={}, emb={})",
            percent(word_sim, 1),
            record
                .embedding_similarity
                .map(|s| percent(s, 1))
                .unwrap_or_else(|| "N/A".to_string())
        );
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::dedup::scenarios::{stripe_story, today_story, visa_plaid_story, yesterday_story};
    use crate::vector::cached::tests::FakeProvider;

    fn detector_with(provider: Arc<FakeProvider>, config: DetectorConfig) -> DuplicateDetector {
        DuplicateDetector::new(config)
            .with_embedder(CachedEmbedder::new(provider, Arc::new(MemoryCache::new())))
    }

    #[tokio::test]
    async fn test_reworded_acquisition_is_high_confidence_duplicate() {
        let today = today_story().text();
        let yesterday = yesterday_story().text();

        // Word overlap alone would never catch this pair
        assert!(similarity(&today, &yesterday) < 0.2);

        let provider = Arc::new(FakeProvider::new(vec![1.0, 0.0]));
        let detector = detector_with(provider.clone(), DetectorConfig::default());
        let (duplicate, record) = detector.is_duplicate(&today, &yesterday).await;

        assert!(duplicate);
        assert!(record.high_confidence);
        assert_eq!(record.confidence, Confidence::High);
        assert!(record.entities1.companies.contains("capital one"));
        assert!(record.entities1.companies.contains("brex"));
        assert!(record.decision_reason.starts_with("High-confidence entity match"));
        // The short circuit skips the embedding call entirely
        assert_eq!(record.embedding_similarity, None);
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_unrelated_company_is_not_duplicate() {
        let detector = DuplicateDetector::default();
        let (duplicate, record) = detector
            .is_duplicate(&today_story().text(), &stripe_story().text())
            .await;

        assert!(!duplicate);
        assert!(!record.entity_match);
        assert!(record.decision_reason.starts_with("No entity match, low word similarity"));
    }

    #[tokio::test]
    async fn test_same_space_different_companies_is_not_duplicate() {
        let provider = Arc::new(FakeProvider::new(vec![1.0, 0.0]));
        let detector = detector_with(provider.clone(), DetectorConfig::default());
        let (duplicate, record) = detector
            .is_duplicate(&today_story().text(), &visa_plaid_story().text())
            .await;

        assert!(!duplicate);
        assert_eq!(record.confidence, Confidence::None);
        // No entity match never reaches the embedding fallback
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_no_entity_match_with_near_identical_text() {
        let detector = DuplicateDetector::default();
        let text = "Regional lender rolls out instant payouts for gig workers across the country";
        let (duplicate, record) = detector
            .is_duplicate(text, &format!("{} today", text))
            .await;

        assert!(duplicate);
        assert!(!record.entity_match);
        assert!(record.decision_reason.starts_with("No entity match, but high word similarity"));
    }

    #[tokio::test]
    async fn test_medium_confidence_word_similarity() {
        let detector = DuplicateDetector::default();
        let (duplicate, record) = detector
            .is_duplicate(
                "Ramp raises $500M Series E at a $13B valuation",
                "Ramp raises $500M Series E from Founders Fund",
            )
            .await;

        assert_eq!(record.confidence, Confidence::Medium);
        assert!(duplicate);
        assert!(record.decision_reason.starts_with("Entity match + word similarity"));
        assert_eq!(record.embedding_similarity, None);
    }

    #[tokio::test]
    async fn test_medium_confidence_embedding_fallback() {
        let first = "Ramp secures fresh funding from Founders Fund";
        let second = "Spend platform Ramp closes new funding round led by existing investors at higher valuation";
        let provider = Arc::new(
            FakeProvider::new(vec![0.0, 1.0])
                .with_vector(first, vec![1.0, 0.1])
                .with_vector(second, vec![1.0, 0.0]),
        );
        let detector = detector_with(provider.clone(), DetectorConfig::default());

        let (duplicate, record) = detector.is_duplicate(first, second).await;

        assert_eq!(record.confidence, Confidence::Medium);
        assert!(duplicate);
        assert!(record.embedding_similarity.unwrap() > 0.8);
        assert!(record.decision_reason.starts_with("Entity match + embedding similarity"));
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_medium_confidence_below_all_thresholds() {
        let first = "Ramp secures fresh funding from Founders Fund";
        let second = "Spend platform Ramp closes new funding round led by existing investors at higher valuation";
        let provider = Arc::new(
            FakeProvider::new(vec![0.0, 1.0]).with_vector(first, vec![1.0, 0.0]),
        );
        let detector = detector_with(provider, DetectorConfig::default());

        let (duplicate, record) = detector.is_duplicate(first, second).await;

        assert!(!duplicate);
        assert_eq!(record.embedding_similarity, Some(0.0));
        assert!(record.decision_reason.starts_with("Entity match but similarities below thresholds"));
    }

    #[tokio::test]
    async fn test_embeddings_disabled_skips_provider() {
        let first = "Ramp secures fresh funding from Founders Fund";
        let second = "Spend platform Ramp closes new funding round led by existing investors at higher valuation";
        let provider = Arc::new(FakeProvider::new(vec![1.0, 0.0]));
        let config = DetectorConfig {
            use_embeddings: false,
            ..DetectorConfig::default()
        };
        let detector = detector_with(provider.clone(), config);

        let (duplicate, record) = detector.is_duplicate(first, second).await;

        assert!(!duplicate);
        assert_eq!(record.embedding_similarity, None);
        assert!(record.decision_reason.ends_with("emb=N/A)"));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_embedding_outage_degrades_to_not_duplicate() {
        let first = "Ramp secures fresh funding from Founders Fund";
        let second = "Spend platform Ramp closes new funding round led by existing investors at higher valuation";
        let detector = detector_with(Arc::new(FakeProvider::failing()), DetectorConfig::default());

        let (duplicate, record) = detector.is_duplicate(first, second).await;

        assert!(!duplicate);
        assert_eq!(record.embedding_similarity, Some(0.0));
    }

    #[tokio::test]
    async fn test_empty_texts() {
        let detector = DuplicateDetector::default();
        let (duplicate, record) = detector.is_duplicate("", "").await;

        assert!(!duplicate);
        assert_eq!(record.word_similarity, 0.0);
    }

    #[tokio::test]
    async fn test_decision_record_serializes() {
        let detector = DuplicateDetector::default();
        let (_, record) = detector
            .is_duplicate(&today_story().text(), &yesterday_story().text())
            .await;

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["high_confidence"], true);
        assert_eq!(json["confidence"], "high");
        assert!(json["embedding_similarity"].is_null());
        assert!(json["entities1"]["events"]
            .as_array()
            .unwrap()
            .contains(&serde_json::json!("acquisition")));
    }
}
