//! Company and event lexicon used for entity extraction.
//!
//! The lexicon is plain data: a list of organization names and one regular
//! expression per event category. A built-in payments/fintech table ships with
//! the crate and can be replaced at start-up from a JSON file of the form
//!
//! ```json
//! {
//!   "companies": ["visa", "capital one"],
//!   "events": { "acquisition": "\\b(acquires|bought)\\b" }
//! }
//! ```

use anyhow::{Context, Result};
use lazy_static::lazy_static;
use regex::{Regex, RegexSet};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::info;

use super::types::EventType;
use super::TARGET_ENTITY;

// Card networks, processors, banks, BNPL, crypto, B2B fintech and big tech platforms
pub const DEFAULT_COMPANIES: &[&str] = &[
    "visa", "mastercard", "american express", "amex", "discover", "jcb", "unionpay",
    "fiserv", "fis", "global payments", "worldpay", "adyen", "stripe", "square", "block",
    "paypal", "venmo", "braintree", "checkout.com", "mollie", "razorpay", "payu",
    "jpmorgan", "jp morgan", "chase", "bank of america", "wells fargo", "citibank", "citi",
    "capital one", "goldman sachs", "morgan stanley", "hsbc", "barclays", "bnp paribas",
    "deutsche bank", "santander", "ing", "revolut", "monzo", "n26", "chime", "nubank",
    "klarna", "affirm", "afterpay", "clearpay", "sezzle", "zip", "splitit",
    "coinbase", "binance", "kraken", "circle", "ripple", "chainalysis", "fireblocks",
    "brex", "ramp", "airbase", "divvy", "coupa", "bill.com", "tipalti", "melio",
    "plaid", "mx", "yodlee", "finicity", "tink", "truelayer", "marqeta", "galileo",
    "synapse", "unit", "treasury prime", "column", "increase", "modern treasury",
    "apple", "google", "amazon", "meta", "microsoft", "shopify", "toast", "lightspeed",
    "clover", "zettle", "sumup", "paytm", "phonepe", "grab", "gojek", "mercado pago",
];

pub const DEFAULT_EVENT_PATTERNS: &[(EventType, &str)] = &[
    (
        EventType::Acquisition,
        r"\b(acqui(?:res?|red?|sition)|buy(?:s|ing)?|bought|purchase[sd]?|take(?:s|ing)?\s+over|takeover)\b",
    ),
    (
        EventType::Merger,
        r"\b(merg(?:es?|ed?|ing|er)|combin(?:es?|ed?|ing))\b",
    ),
    (
        EventType::Partnership,
        r"\b(partner(?:s|ed|ship|ing)?|collaborat(?:es?|ed?|ion|ing)|team(?:s|ed|ing)?\s+(?:up|with)|alliance|joint\s+venture)\b",
    ),
    (
        EventType::Launch,
        r"\b(launch(?:es|ed|ing)?|introduc(?:es?|ed?|ing)|unveil(?:s|ed|ing)?|roll(?:s|ed|ing)?\s+out|debut(?:s|ed|ing)?|announce[sd]?\s+(?:new|a\s+new))\b",
    ),
    (
        EventType::Funding,
        r"\b(rais(?:es?|ed?|ing)|secur(?:es?|ed?|ing)|funding|series\s+[a-z]|seed\s+round|investment|invest(?:s|ed|ing)?)\b",
    ),
    (
        EventType::Ipo,
        r"\b(ipo|initial\s+public\s+offering|go(?:es|ing)?\s+public|public\s+listing)\b",
    ),
    (
        EventType::Expansion,
        r"\b(expand(?:s|ed|ing)?|expansion|enter(?:s|ed|ing)?|growth|grow(?:s|ing)?|scale[sd]?|scaling)\b",
    ),
    (
        EventType::Regulation,
        r"\b(regulat(?:es?|ed?|ion|ory|ing)|compliance|fine[sd]?|penalt(?:y|ies)|enforcement|licens(?:e[sd]?|ing)|approv(?:es?|ed?|al|ing))\b",
    ),
];

lazy_static! {
    static ref DEFAULT_LEXICON: Lexicon =
        Lexicon::builtin().expect("built-in lexicon patterns must compile");
}

/// Returns the shared built-in lexicon
pub fn default_lexicon() -> &'static Lexicon {
    &DEFAULT_LEXICON
}

/// Serialized form of a lexicon
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LexiconTable {
    #[serde(default)]
    pub companies: Vec<String>,

    // Event category name -> regular expression
    #[serde(default)]
    pub events: BTreeMap<String, String>,
}

impl LexiconTable {
    pub fn builtin() -> Self {
        Self {
            companies: DEFAULT_COMPANIES.iter().map(|c| c.to_string()).collect(),
            events: DEFAULT_EVENT_PATTERNS
                .iter()
                .map(|(event, pattern)| (event.as_str().to_string(), pattern.to_string()))
                .collect(),
        }
    }
}

/// Compiled company and event matchers
#[derive(Debug, Clone)]
pub struct Lexicon {
    companies: Vec<String>,
    company_matcher: RegexSet,
    events: Vec<EventType>,
    event_matcher: RegexSet,
}

impl Lexicon {
    /// Compile the built-in payments/fintech lexicon
    pub fn builtin() -> Result<Self> {
        Self::from_table(LexiconTable::builtin())
    }

    /// Compile a lexicon table
    pub fn from_table(table: LexiconTable) -> Result<Self> {
        let mut seen = HashSet::new();
        let companies: Vec<String> = table
            .companies
            .iter()
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty() && seen.insert(c.clone()))
            .collect();

        let company_patterns: Vec<String> = companies
            .iter()
            .map(|c| format!(r"\b{}\b", regex::escape(c)))
            .collect();
        let company_matcher =
            RegexSet::new(&company_patterns).context("Failed to compile company patterns")?;

        let mut events = Vec::with_capacity(table.events.len());
        let mut event_patterns = Vec::with_capacity(table.events.len());
        for (name, pattern) in &table.events {
            let event: EventType = name.parse()?;
            // Validate each pattern individually for a useful error message
            Regex::new(pattern)
                .with_context(|| format!("Invalid pattern for event '{}'", name))?;
            events.push(event);
            event_patterns.push(format!("(?i){}", pattern));
        }
        let event_matcher =
            RegexSet::new(&event_patterns).context("Failed to compile event patterns")?;

        Ok(Self {
            companies,
            company_matcher,
            events,
            event_matcher,
        })
    }

    /// Load a lexicon table from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read lexicon file {}", path.display()))?;
        let table: LexiconTable = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse lexicon file {}", path.display()))?;
        let lexicon = Self::from_table(table)?;

        info!(
            target: TARGET_ENTITY,
            "Loaded lexicon from {} with {} companies and {} event patterns",
            path.display(),
            lexicon.companies.len(),
            lexicon.events.len()
        );

        Ok(lexicon)
    }

    pub fn companies(&self) -> &[String] {
        &self.companies
    }

    pub fn event_types(&self) -> &[EventType] {
        &self.events
    }

    /// Companies whole-word matched in already-lowercased text
    pub(crate) fn match_companies<'a>(&'a self, lowered: &str) -> impl Iterator<Item = &'a str> {
        self.company_matcher
            .matches(lowered)
            .into_iter()
            .map(move |idx| self.companies[idx].as_str())
    }

    pub(crate) fn match_events<'a>(&'a self, text: &str) -> impl Iterator<Item = EventType> + 'a {
        self.event_matcher
            .matches(text)
            .into_iter()
            .map(move |idx| self.events[idx])
    }
}
