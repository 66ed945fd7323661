use std::collections::BTreeMap;

use crate::story::PublishedStory;

pub const EMPTY_DIGEST: &str = "No stories available from this period.";

/// Render "recently covered" titles grouped by publication date, oldest day first
///
/// ```text
/// **2026-01-21:**
///   - Capital One Acquires Brex (Payments Dive)
/// ```
pub fn format_digest(stories: &[PublishedStory]) -> String {
    if stories.is_empty() {
        return EMPTY_DIGEST.to_string();
    }

    // None sorts first, so undated stories lead the digest
    let mut by_date: BTreeMap<_, Vec<&PublishedStory>> = BTreeMap::new();
    for story in stories {
        by_date.entry(story.date).or_default().push(story);
    }

    let mut lines = Vec::new();
    for (date, group) in by_date {
        let heading = date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "Unknown".to_string());
        lines.push(format!("**{}:**", heading));

        for published in group {
            let title = match published.story.title.as_str() {
                "" => "Untitled",
                title => title,
            };
            let source = published
                .story
                .source
                .as_ref()
                .and_then(|s| s.name())
                .unwrap_or("Unknown source");
            lines.push(format!("  - {} ({})", title, source));
        }
    }

    lines.join("\n")
}
