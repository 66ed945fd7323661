use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

use super::types::{EventType, Extraction};

/// How strongly shared entities suggest the same underlying event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Entity evidence alone is conclusive
    High,
    /// Entity evidence needs a similarity check
    Medium,
    /// No meaningful entity overlap
    None,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::High => write!(f, "HIGH"),
            Confidence::Medium => write!(f, "MEDIUM"),
            Confidence::None => write!(f, "NONE"),
        }
    }
}

/// Verdict of comparing two extractions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlap {
    pub confidence: Confidence,
    pub reason: String,
}

impl Overlap {
    pub fn is_match(&self) -> bool {
        self.confidence != Confidence::None
    }

    pub fn is_high_confidence(&self) -> bool {
        self.confidence == Confidence::High
    }
}

/// Classify the entity/event overlap between two stories
///
/// Rules, first match wins:
/// 1. 2+ shared companies and a shared acquisition/merger/IPO: high confidence
/// 2. 2+ shared companies and any shared event: medium
/// 3. 1+ shared company and a shared acquisition/merger/IPO/funding: medium
/// 4. anything else: no match
pub fn classify_overlap(first: &Extraction, second: &Extraction) -> Overlap {
    let common_companies = first.shared_companies(second);
    let common_events = first.shared_events(second);

    let decisive: BTreeSet<EventType> = common_events
        .iter()
        .copied()
        .filter(EventType::is_high_confidence)
        .collect();

    if common_companies.len() >= 2 && !decisive.is_empty() {
        return Overlap {
            confidence: Confidence::High,
            reason: format!(
                "Same companies ({}) + high-confidence event ({})",
                join(&common_companies),
                join(&decisive)
            ),
        };
    }

    if common_companies.len() >= 2 && !common_events.is_empty() {
        return Overlap {
            confidence: Confidence::Medium,
            reason: format!(
                "Same companies ({}) + same event ({})",
                join(&common_companies),
                join(&common_events)
            ),
        };
    }

    if !common_companies.is_empty() && common_events.iter().any(EventType::is_specific) {
        return Overlap {
            confidence: Confidence::Medium,
            reason: format!(
                "Company ({}) + specific event ({})",
                join(&common_companies),
                join(&common_events)
            ),
        };
    }

    Overlap {
        confidence: Confidence::None,
        reason: "No significant entity overlap".to_string(),
    }
}

fn join<T: fmt::Display>(items: &BTreeSet<T>) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extraction(companies: &[&str], events: &[EventType]) -> Extraction {
        Extraction {
            companies: companies.iter().map(|c| c.to_string()).collect(),
            events: events.iter().copied().collect(),
        }
    }

    #[test]
    fn test_two_companies_and_acquisition_is_high_confidence() {
        let a = extraction(&["capital one", "brex"], &[EventType::Acquisition, EventType::Expansion]);
        let b = extraction(&["capital one", "brex", "visa"], &[EventType::Acquisition]);

        let overlap = classify_overlap(&a, &b);
        assert!(overlap.is_match());
        assert!(overlap.is_high_confidence());
        assert_eq!(
            overlap.reason,
            "Same companies (brex, capital one) + high-confidence event (acquisition)"
        );
    }

    #[test]
    fn test_two_companies_and_other_event_is_medium() {
        let a = extraction(&["visa", "plaid"], &[EventType::Partnership]);
        let b = extraction(&["visa", "plaid"], &[EventType::Partnership, EventType::Launch]);

        let overlap = classify_overlap(&a, &b);
        assert_eq!(overlap.confidence, Confidence::Medium);
        assert!(overlap.reason.starts_with("Same companies (plaid, visa) + same event"));
    }

    #[test]
    fn test_one_company_and_funding_is_medium() {
        let a = extraction(&["ramp"], &[EventType::Funding]);
        let b = extraction(&["ramp", "brex"], &[EventType::Funding, EventType::Launch]);

        let overlap = classify_overlap(&a, &b);
        assert_eq!(overlap.confidence, Confidence::Medium);
        assert!(overlap.reason.starts_with("Company (ramp) + specific event"));
    }

    #[test]
    fn test_one_company_and_generic_event_is_no_match() {
        let a = extraction(&["stripe"], &[EventType::Launch]);
        let b = extraction(&["stripe"], &[EventType::Launch]);

        let overlap = classify_overlap(&a, &b);
        assert!(!overlap.is_match());
        assert_eq!(overlap.reason, "No significant entity overlap");
    }

    #[test]
    fn test_two_companies_without_shared_event_is_no_match() {
        let a = extraction(&["visa", "mastercard"], &[EventType::Regulation]);
        let b = extraction(&["visa", "mastercard"], &[EventType::Launch]);

        assert_eq!(classify_overlap(&a, &b).confidence, Confidence::None);
    }

    #[test]
    fn test_no_shared_companies() {
        let a = extraction(&["capital one", "brex"], &[EventType::Acquisition]);
        let b = extraction(&["visa", "plaid"], &[EventType::Acquisition]);

        assert!(!classify_overlap(&a, &b).is_match());
    }

    #[test]
    fn test_empty_extractions() {
        assert!(!classify_overlap(&Extraction::new(), &Extraction::new()).is_match());
    }
}
