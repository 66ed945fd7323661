use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Business-action categories recognised in story text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Acquisition,
    Merger,
    Partnership,
    Launch,
    Funding,
    Ipo,
    Expansion,
    Regulation,
}

impl EventType {
    pub const ALL: [EventType; 8] = [
        EventType::Acquisition,
        EventType::Merger,
        EventType::Partnership,
        EventType::Launch,
        EventType::Funding,
        EventType::Ipo,
        EventType::Expansion,
        EventType::Regulation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Acquisition => "acquisition",
            EventType::Merger => "merger",
            EventType::Partnership => "partnership",
            EventType::Launch => "launch",
            EventType::Funding => "funding",
            EventType::Ipo => "ipo",
            EventType::Expansion => "expansion",
            EventType::Regulation => "regulation",
        }
    }

    /// Corporate actions that essentially happen once per company pair
    pub fn is_high_confidence(&self) -> bool {
        matches!(
            self,
            EventType::Acquisition | EventType::Merger | EventType::Ipo
        )
    }

    /// Events specific enough to corroborate a single shared company
    pub fn is_specific(&self) -> bool {
        self.is_high_confidence() || *self == EventType::Funding
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EventType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventType::ALL
            .into_iter()
            .find(|event| event.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| anyhow::anyhow!("Unknown event type: {}", s))
    }
}

/// Companies and events detected in a piece of text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    // Canonical (lowercased) lexicon names
    pub companies: BTreeSet<String>,

    pub events: BTreeSet<EventType>,
}

impl Extraction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty() && self.events.is_empty()
    }

    pub fn shared_companies<'a>(&'a self, other: &'a Extraction) -> BTreeSet<&'a str> {
        self.companies
            .intersection(&other.companies)
            .map(String::as_str)
            .collect()
    }

    pub fn shared_events(&self, other: &Extraction) -> BTreeSet<EventType> {
        self.events.intersection(&other.events).copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_round_trip_names() {
        for event in EventType::ALL {
            assert_eq!(event.as_str().parse::<EventType>().unwrap(), event);
        }
        assert_eq!(" IPO ".parse::<EventType>().unwrap(), EventType::Ipo);
        assert!("layoffs".parse::<EventType>().is_err());
    }

    #[test]
    fn test_event_tiers() {
        assert!(EventType::Merger.is_high_confidence());
        assert!(!EventType::Funding.is_high_confidence());
        assert!(EventType::Funding.is_specific());
        assert!(!EventType::Partnership.is_specific());
    }

    #[test]
    fn test_event_type_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&EventType::Ipo).unwrap(), "\"ipo\"");
    }
}
