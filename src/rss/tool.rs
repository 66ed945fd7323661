//! The RSS reader tool used by newsletter research.
//!
//! The tool never fails: every outcome is a string meant for a language model
//! to read, either the formatted entries or a short error message.

use anyhow::Result;
use std::sync::Arc;
use tokio::time::Duration;
use tracing::{debug, warn};

use super::client::{create_http_client, fetch_feed};
use super::parser::{format_entries, parse_feed};
use super::types::{ToolKind, DEFAULT_TOOL_CACHE_TTL, PARSE_FAILED};
use super::util::is_valid_url;
use crate::cache::{Cache, TtlCache};
use crate::TARGET_WEB_REQUEST;

/// Tool responses keyed by tool and resource identifier
pub type ToolCache = TtlCache<(ToolKind, String), String>;

/// Format a fetched feed body, or the parse error message
pub fn format_feed_body(body: &str) -> Result<String, String> {
    match parse_feed(body) {
        Ok(entries) => Ok(format_entries(&entries)),
        Err(e) => {
            warn!(target: TARGET_WEB_REQUEST, "Failed to parse RSS feed: {:#}", e);
            Err(PARSE_FAILED.to_string())
        }
    }
}

/// RSS reader with a shared response cache
#[derive(Clone)]
pub struct RssTool {
    client: reqwest::Client,
    cache: Arc<ToolCache>,
}

impl RssTool {
    pub fn new(ttl: Duration) -> Result<Self> {
        Ok(Self {
            client: create_http_client()?,
            cache: Arc::new(ToolCache::new(ttl)),
        })
    }

    /// Share an existing cache, e.g. across several tools
    pub fn with_cache(mut self, cache: Arc<ToolCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn cache(&self) -> &Arc<ToolCache> {
        &self.cache
    }

    /// Read a feed and return up to five formatted entries
    ///
    /// Only successfully parsed feeds are cached, so an outage is retried on
    /// the next call.
    pub async fn read(&self, url: &str) -> String {
        let key = (ToolKind::Rss, url.to_string());
        if let Some(cached) = self.cache.get(&key) {
            debug!(target: TARGET_WEB_REQUEST, "Tool cache hit for {} {}", ToolKind::Rss, url);
            return cached;
        }

        if !is_valid_url(url) {
            return format!("An error occurred: Invalid URL format: {}", url);
        }

        let body = match fetch_feed(&self.client, url).await {
            Ok(body) => body,
            Err(e) => return format!("An error occurred: {}", e),
        };

        self.respond(key, &body)
    }

    /// Format a fetched body and cache it when it parsed
    ///
    /// Expired entries are purged before each insert so feeds that are never
    /// read again do not pile up.
    fn respond(&self, key: (ToolKind, String), body: &str) -> String {
        match format_feed_body(body) {
            Ok(formatted) => {
                self.cache.purge_expired();
                self.cache.set(key, formatted.clone());
                formatted
            }
            Err(message) => message,
        }
    }
}

impl Default for RssTool {
    fn default() -> Self {
        Self {
            client: reqwest::Client::new(),
            cache: Arc::new(ToolCache::new(DEFAULT_TOOL_CACHE_TTL)),
        }
    }
}
