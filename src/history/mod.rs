//! Previously published stories, for filtering out repeats.

pub mod digest;
pub mod json;
pub mod supabase;

pub use digest::format_digest;
pub use json::JsonHistoryStore;
pub use supabase::SupabaseHistoryStore;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use tracing::info;

use crate::story::PublishedStory;

pub const TARGET_HISTORY: &str = "history";

/// Source of previously published newsletter stories
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Stories published on any day in `start..=end`, oldest first
    async fn stories_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<PublishedStory>>;
}

/// Inclusive range of publication dates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl HistoryWindow {
    /// The `days` days before `today`, excluding today itself
    pub fn last_days(today: NaiveDate, days: u64) -> Self {
        let start = today.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN);
        let end = today.pred_opt().unwrap_or(NaiveDate::MIN);
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Load the stories published in `window`
pub async fn load_history(store: &dyn HistoryStore, window: HistoryWindow) -> Result<Vec<PublishedStory>> {
    if window.is_empty() {
        return Ok(Vec::new());
    }

    let stories = store.stories_between(window.start, window.end).await?;
    info!(
        target: TARGET_HISTORY,
        "Loaded {} historical stories published {} to {}",
        stories.len(),
        window.start,
        window.end
    );
    Ok(stories)
}
