//! Story records and the newsletter JSON shapes they travel in.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use std::path::Path;

/// Where a story came from; carried through untouched
///
/// Newsletters store either a bare name or URL string, or an object such as
/// `{"name": .., "url": ..}`. Any other JSON value is kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Source {
    Name(String),
    Detailed(Value),
}

impl Source {
    /// Display name, if the source carries one
    pub fn name(&self) -> Option<&str> {
        match self {
            Source::Name(name) => Some(name.as_str()),
            Source::Detailed(value) => value.get("name").and_then(Value::as_str),
        }
    }
}

/// A news item as written into the daily newsletter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    // Missing or null fields read as empty strings
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
}

impl Story {
    pub fn new(title: &str, body: &str) -> Self {
        Story {
            title: title.to_string(),
            body: body.to_string(),
            source: None,
        }
    }

    pub fn with_source(mut self, name: &str, url: &str) -> Self {
        self.source = Some(Source::Detailed(json!({ "name": name, "url": url })));
        self
    }

    /// Title and body joined by a space, the unit every comparison works on
    pub fn text(&self) -> String {
        format!("{} {}", self.title, self.body)
    }
}

/// A story that already appeared in a published newsletter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedStory {
    #[serde(flatten)]
    pub story: Story,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

/// Newsletter document body; only the `news` list matters here
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsletterContent {
    #[serde(default, deserialize_with = "null_as_default")]
    pub news: Vec<Story>,
}

/// One published newsletter as stored by the publishing side
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsletterRow {
    #[serde(default)]
    pub publication_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: NewsletterContent,
}

impl NewsletterRow {
    pub fn into_published(self) -> Vec<PublishedStory> {
        let date = self.publication_date;
        self.content
            .news
            .into_iter()
            .map(|story| PublishedStory { story, date })
            .collect()
    }
}

/// A candidate file as read from disk
///
/// Either a newsletter object whose `news` list holds the stories, or a bare
/// array of stories. The whole document is kept so that writing it back only
/// replaces the stories and leaves every other newsletter section intact.
#[derive(Debug, Clone)]
pub struct StoryFile {
    document: Value,
    pub stories: Vec<Story>,
}

impl StoryFile {
    pub fn parse(json: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(json).context("Invalid JSON")?;
        let stories = match &document {
            Value::Array(_) => Vec::<Story>::deserialize(&document)?,
            Value::Object(map) => match map.get("news") {
                Some(news) => Option::<Vec<Story>>::deserialize(news)?.unwrap_or_default(),
                None => Vec::new(),
            },
            _ => bail!("Expected a newsletter object or an array of stories"),
        };
        Ok(Self { document, stories })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read stories from {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// The original document with its stories replaced by `stories`
    pub fn with_stories(&self, stories: &[Story]) -> Result<Value> {
        let stories = serde_json::to_value(stories)?;
        Ok(match self.document.clone() {
            Value::Object(mut map) => {
                map.insert("news".to_string(), stories);
                Value::Object(map)
            }
            _ => stories,
        })
    }

    pub fn save(&self, path: impl AsRef<Path>, stories: &[Story]) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(&self.with_stories(stories)?)?;
        std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
