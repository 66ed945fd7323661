use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::debug;

use super::{HistoryStore, TARGET_HISTORY};
use crate::story::{NewsletterRow, PublishedStory};

/// Local archive of published newsletters
///
/// The file holds a JSON array of newsletter rows, the same shape the
/// publishing side stores: `[{"publication_date": "2026-01-21", "content": {"news": [...]}}]`.
/// Rows without a publication date are never returned.
#[derive(Debug, Clone)]
pub struct JsonHistoryStore {
    path: PathBuf,
}

impl JsonHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    async fn read_rows(&self) -> Result<Vec<NewsletterRow>> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read history archive {}", self.path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse history archive {}", self.path.display()))
    }
}

#[async_trait]
impl HistoryStore for JsonHistoryStore {
    async fn stories_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<PublishedStory>> {
        let mut rows: Vec<NewsletterRow> = self
            .read_rows()
            .await?
            .into_iter()
            .filter(|row| matches!(row.publication_date, Some(d) if start <= d && d <= end))
            .collect();
        rows.sort_by_key(|row| row.publication_date);

        debug!(
            target: TARGET_HISTORY,
            "{} newsletters in {} between {} and {}",
            rows.len(),
            self.path.display(),
            start,
            end
        );

        Ok(rows.into_iter().flat_map(NewsletterRow::into_published).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, day).unwrap()
    }

    fn write_archive(name: &str, json: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("newsdedup-{}-{}.json", name, std::process::id()));
        std::fs::write(&path, json).unwrap();
        path
    }

    const ARCHIVE: &str = r#"[
        {"publication_date": "2026-01-21", "content": {"news": [
            {"title": "Capital One Acquires Brex", "body": "Deal."},
            {"title": "Visa Partners with Plaid", "body": null}
        ]}},
        {"publication_date": "2026-01-14", "content": {"news": [{"title": "Too old"}]}},
        {"publication_date": "2026-01-19", "content": {"news": [{"title": "Klarna IPO"}]}},
        {"publication_date": "2026-01-22", "content": {"news": [{"title": "Today"}]}},
        {"publication_date": null, "content": {"news": [{"title": "Undated"}]}}
    ]"#;

    #[tokio::test]
    async fn test_stories_between_filters_and_orders() {
        let path = write_archive("history-window", ARCHIVE);
        let store = JsonHistoryStore::new(&path);

        let stories = store.stories_between(date(15), date(21)).await.unwrap();
        std::fs::remove_file(&path).ok();

        let titles: Vec<&str> = stories.iter().map(|s| s.story.title.as_str()).collect();
        assert_eq!(titles, ["Klarna IPO", "Capital One Acquires Brex", "Visa Partners with Plaid"]);
        assert_eq!(stories[0].date, Some(date(19)));
        assert_eq!(stories[2].story.body, "");
    }

    #[tokio::test]
    async fn test_string_sources_in_archive() {
        let path = write_archive(
            "history-string-source",
            r#"[{"publication_date": "2026-01-20", "content": {"news": [
                {"title": "Capital One Acquires Brex", "source": "Reuters"},
                {"title": "Visa Partners with Plaid", "source": {"name": "Payments Dive", "url": "https://example.com"}}
            ]}}]"#,
        );
        let store = JsonHistoryStore::new(&path);

        let stories = store.stories_between(date(15), date(21)).await.unwrap();
        std::fs::remove_file(&path).ok();

        let sources: Vec<_> = stories
            .iter()
            .map(|s| s.story.source.as_ref().and_then(|source| source.name()))
            .collect();
        assert_eq!(sources, [Some("Reuters"), Some("Payments Dive")]);
    }

    #[tokio::test]
    async fn test_empty_archive() {
        let path = write_archive("history-empty", "[]");
        let store = JsonHistoryStore::new(&path);

        let stories = store.stories_between(date(15), date(21)).await.unwrap();
        std::fs::remove_file(&path).ok();

        assert!(stories.is_empty());
    }

    #[tokio::test]
    async fn test_missing_archive_is_an_error() {
        let store = JsonHistoryStore::new("/nonexistent/newsletters.json");
        assert!(store.stories_between(date(15), date(21)).await.is_err());
    }

    #[tokio::test]
    async fn test_malformed_archive_is_an_error() {
        let path = write_archive("history-bad", r#"{"news": []}"#);
        let store = JsonHistoryStore::new(&path);

        let result = store.stories_between(date(15), date(21)).await;
        std::fs::remove_file(&path).ok();

        assert!(result.is_err());
    }
}
