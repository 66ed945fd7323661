//! Feed parsing and formatting for RSS and Atom.

use anyhow::{anyhow, Result};
use feed_rs::model::Entry;
use feed_rs::parser;
use std::io::Cursor;
use tracing::debug;

use super::types::{FeedEntry, MAX_ENTRIES, NO_ARTICLES, NO_SUMMARY, NO_TITLE};
use super::util::cleanup_xml;
use crate::TARGET_WEB_REQUEST;

/// Parse a feed body into its entries, retrying once on cleaned-up XML
pub fn parse_feed(body: &str) -> Result<Vec<FeedEntry>> {
    let feed = match parser::parse(Cursor::new(body.as_bytes())) {
        Ok(feed) => feed,
        Err(first_err) => {
            let cleaned = cleanup_xml(body);
            if !(cleaned.contains("<rss") || cleaned.contains("<feed")) {
                return Err(anyhow!("Content is not an RSS or Atom feed: {}", first_err));
            }
            debug!(target: TARGET_WEB_REQUEST, "Retrying feed parse after XML cleanup: {}", first_err);
            parser::parse(Cursor::new(cleaned.into_bytes())).map_err(|second_err| {
                anyhow!(
                    "Failed to parse feed even after cleanup. First error: {}. Second error: {}",
                    first_err,
                    second_err
                )
            })?
        }
    };

    Ok(feed.entries.into_iter().map(entry_info).collect())
}

fn entry_info(entry: Entry) -> FeedEntry {
    // Atom feeds often carry only content, not a summary
    let summary = entry
        .summary
        .map(|s| s.content)
        .or_else(|| entry.content.and_then(|c| c.body));

    FeedEntry {
        title: entry.title.map(|t| t.content),
        summary,
    }
}

/// Render the first few entries as `- Title: ..\n  Summary: ..` blocks
pub fn format_entries(entries: &[FeedEntry]) -> String {
    if entries.is_empty() {
        return NO_ARTICLES.to_string();
    }

    entries
        .iter()
        .take(MAX_ENTRIES)
        .map(|entry| {
            format!(
                "- Title: {}\n  Summary: {}\n",
                entry.title.as_deref().unwrap_or(NO_TITLE),
                entry.summary.as_deref().unwrap_or(NO_SUMMARY)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
