//! Type definitions for the RSS tool.

use serde::Serialize;
use std::fmt;
use tokio::time::Duration;

/// External research tools whose responses are cached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    Rss,
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolKind::Rss => write!(f, "rss"),
        }
    }
}

/// Title and summary of one feed entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedEntry {
    pub title: Option<String>,
    pub summary: Option<String>,
}

// Constants
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const RETRY_DELAY: Duration = Duration::from_secs(5);
pub const MAX_RETRIES: usize = 3;

/// Entries included in a formatted feed
pub const MAX_ENTRIES: usize = 5;

/// Default lifetime of a cached tool response
pub const DEFAULT_TOOL_CACHE_TTL: Duration = Duration::from_secs(6 * 60 * 60);

pub const NO_TITLE: &str = "No Title";
pub const NO_SUMMARY: &str = "No Summary Available.";
pub const NO_ARTICLES: &str = "No articles found in this RSS feed.";
pub const PARSE_FAILED: &str = "Error: Failed to parse RSS feed.";
