use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use tokio::time::{timeout, Duration};
use tracing::{debug, error};

use super::{HistoryStore, TARGET_HISTORY};
use crate::story::{NewsletterRow, PublishedStory};
use crate::TARGET_WEB_REQUEST;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const NEWSLETTERS_TABLE: &str = "newsletters";

/// Published newsletters read from the Supabase `newsletters` table over PostgREST
#[derive(Debug, Clone)]
pub struct SupabaseHistoryStore {
    client: Client,
    base_url: String,
    service_key: String,
}

impl SupabaseHistoryStore {
    pub fn new(base_url: &str, service_key: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
        }
    }

    /// Query URL selecting rows with `start <= publication_date <= end`, oldest first
    pub fn query_url(&self, start: NaiveDate, end: NaiveDate) -> String {
        format!(
            "{}/rest/v1/{}?select=content,publication_date&publication_date=gte.{}&publication_date=lte.{}&order=publication_date.asc",
            self.base_url,
            NEWSLETTERS_TABLE,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        )
    }
}

#[async_trait]
impl HistoryStore for SupabaseHistoryStore {
    async fn stories_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<PublishedStory>> {
        let url = self.query_url(start, end);
        debug!(target: TARGET_WEB_REQUEST, "Fetching newsletters from {}", url);

        let request = self
            .client
            .get(&url)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .header("Accept", "application/json")
            .send();

        let response = timeout(REQUEST_TIMEOUT, request)
            .await
            .map_err(|_| anyhow!("Supabase request timed out after {} seconds", REQUEST_TIMEOUT.as_secs()))?
            .context("Supabase request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!(target: TARGET_HISTORY, "Supabase returned {}: {}", status, error_text);
            return Err(anyhow!("Supabase returned {}", status));
        }

        let rows: Vec<NewsletterRow> = response
            .json()
            .await
            .context("Failed to decode newsletters from Supabase")?;

        debug!(target: TARGET_HISTORY, "Supabase returned {} newsletters", rows.len());

        Ok(rows.into_iter().flat_map(NewsletterRow::into_published).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_url() {
        let store = SupabaseHistoryStore::new("https://abc.supabase.co/", "key");
        let url = store.query_url(
            NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 21).unwrap(),
        );

        assert_eq!(
            url,
            "https://abc.supabase.co/rest/v1/newsletters?select=content,publication_date&publication_date=gte.2026-01-15&publication_date=lte.2026-01-21&order=publication_date.asc"
        );
    }

    #[tokio::test]
    async fn test_unreachable_store_is_an_error() {
        let store = SupabaseHistoryStore::new("http://127.0.0.1:9", "key");
        let day = NaiveDate::from_ymd_opt(2026, 1, 21).unwrap();

        assert!(store.stories_between(day, day).await.is_err());
    }
}
