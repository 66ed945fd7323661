use tracing::{debug, info};

use super::engine::DuplicateDetector;
use super::types::{percent, FilterOutcome, Removal};
use super::TARGET_DEDUP;
use crate::similarity::similarity;
use crate::story::{PublishedStory, Story};

/// Jaccard bar for dropping near-copies inside one batch
pub const DEFAULT_BATCH_THRESHOLD: f64 = 0.9;

/// Jaccard bar for the plain history filter
pub const DEFAULT_HISTORY_THRESHOLD: f64 = 0.6;

/// Drop candidates that are near-copies of an earlier candidate in the same batch
///
/// Single pass in input order; the first occurrence of a story is the one kept.
pub fn dedup_stories(stories: Vec<Story>, threshold: f64) -> Vec<Story> {
    if stories.is_empty() {
        return stories;
    }

    let total = stories.len();
    let mut seen: Vec<String> = Vec::with_capacity(total);
    let mut unique = Vec::with_capacity(total);

    for story in stories {
        let text = story.text();
        if let Some(best) = seen.iter().map(|s| similarity(&text, s)).find(|&s| s > threshold) {
            debug!(
                target: TARGET_DEDUP,
                "Dropping in-batch duplicate '{}' ({})",
                story.title,
                percent(best, 1)
            );
            continue;
        }
        seen.push(text);
        unique.push(story);
    }

    if unique.len() < total {
        info!(
            target: TARGET_DEDUP,
            "Removed {} in-batch duplicates, {} stories remain",
            total - unique.len(),
            unique.len()
        );
    }

    unique
}

/// How new stories are compared against history
#[derive(Clone, Copy)]
pub enum FilterMode<'a> {
    /// Hybrid entity/word/embedding decision
    Hybrid(&'a DuplicateDetector),
    /// Jaccard similarity only
    Plain { threshold: f64 },
}

impl Default for FilterMode<'_> {
    fn default() -> Self {
        FilterMode::Plain {
            threshold: DEFAULT_HISTORY_THRESHOLD,
        }
    }
}

/// Remove new stories that repeat something already published
///
/// Each new story is compared against `history` in order and removed on the
/// first match. Returns both the kept stories and an audit trail of removals.
/// An empty `kept` list is a legitimate result; deciding on a fallback is up to
/// the caller.
pub async fn filter_against_history(
    new_stories: Vec<Story>,
    history: &[PublishedStory],
    mode: FilterMode<'_>,
) -> FilterOutcome {
    if new_stories.is_empty() || history.is_empty() {
        return FilterOutcome {
            kept: new_stories,
            removed: Vec::new(),
        };
    }

    let history_texts: Vec<String> = history.iter().map(|p| p.story.text()).collect();
    let mut outcome = FilterOutcome::default();

    for story in new_stories {
        let text = story.text();
        let mut matched = None;

        for (published, published_text) in history.iter().zip(&history_texts) {
            match mode {
                FilterMode::Hybrid(detector) => {
                    let (duplicate, record) = detector.is_duplicate(&text, published_text).await;
                    if duplicate {
                        matched = Some((published, record.decision_reason.clone(), Some(record)));
                        break;
                    }
                }
                FilterMode::Plain { threshold } => {
                    let sim = similarity(&text, published_text);
                    if sim > threshold {
                        let reason = format!("Word similarity {} > {}", percent(sim, 1), percent(threshold, 0));
                        matched = Some((published, reason, None));
                        break;
                    }
                }
            }
        }

        match matched {
            Some((published, reason, decision)) => {
                info!(
                    target: TARGET_DEDUP,
                    "Removing duplicate '{}' (matches '{}'{}): {}",
                    story.title,
                    published.story.title,
                    published
                        .date
                        .map(|d| format!(" from {}", d))
                        .unwrap_or_default(),
                    reason
                );
                outcome.removed.push(Removal {
                    story,
                    matched_title: published.story.title.clone(),
                    matched_date: published.date,
                    reason,
                    decision,
                });
            }
            None => outcome.kept.push(story),
        }
    }

    info!(
        target: TARGET_DEDUP,
        "History filter kept {} stories, removed {}",
        outcome.kept.len(),
        outcome.removed.len()
    );

    outcome
}
