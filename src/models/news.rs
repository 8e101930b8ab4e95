use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Row identifier as issued by the store. Kept opaque: numeric and text keys
/// are both carried as their literal text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawId", into = "String")]
pub struct NewsId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(serde_json::Number),
    Text(String),
}

impl From<RawId> for NewsId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Number(n) => NewsId(n.to_string()),
            RawId::Text(s) => NewsId(s),
        }
    }
}

impl From<NewsId> for String {
    fn from(id: NewsId) -> Self {
        id.0
    }
}

impl NewsId {
    pub fn new(id: impl Into<String>) -> Self {
        NewsId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NewsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Row as projected by the list query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsSummary {
    pub id: NewsId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default, deserialize_with = "nullable_string")]
    pub created_at: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub word_count: Option<i64>,
    #[serde(default)]
    pub describe_text: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Row as projected by the detail query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: NewsId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default, deserialize_with = "nullable_string")]
    pub created_at: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub word_count: Option<i64>,
    #[serde(default, deserialize_with = "lenient_meta_filter")]
    pub meta_filter: Option<MetaFilter>,
    #[serde(default)]
    pub article: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub summarizer: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Structured metadata attached to a row. Nothing in it is guaranteed to be present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaFilter {
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient_text")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub published_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub tags: Option<String>,
}

impl MetaFilter {
    /// Parses the raw column value. Accepts an object or a string holding one;
    /// anything else is logged and dropped.
    pub fn from_value(value: Value) -> Option<Self> {
        let parsed = match value {
            Value::Null => return None,
            Value::Object(_) => serde_json::from_value::<MetaFilter>(value),
            Value::String(raw) if raw.trim().is_empty() => return None,
            Value::String(raw) => serde_json::from_str::<MetaFilter>(&raw),
            other => {
                tracing::warn!("Ignoring meta_filter of unexpected shape: {}", other);
                return None;
            }
        };

        match parsed.map(MetaFilter::without_blank_tags) {
            Ok(meta) if meta.is_empty() => None,
            Ok(meta) => Some(meta),
            Err(e) => {
                tracing::warn!("Failed to parse meta_filter: {}", e);
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        [
            &self.title,
            &self.kind,
            &self.author,
            &self.published_date,
            &self.tags,
        ]
        .iter()
        .all(|field| field.is_none())
    }

    /// Drops a tags value such as `" , "` that holds no actual tag.
    fn without_blank_tags(mut self) -> Self {
        if self.tag_list().is_empty() {
            self.tags = None;
        }
        self
    }

    pub fn tag_list(&self) -> Vec<String> {
        self.tags.as_deref().map(split_tags).unwrap_or_default()
    }
}

/// Splits a comma-separated tag string, trimming each tag and dropping empties.
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let text = match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(Value::Array(items)) => Some(
            items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join(","),
        ),
        _ => None,
    };
    Ok(text.filter(|s| !s.trim().is_empty()))
}

fn lenient_meta_filter<'de, D>(deserializer: D) -> Result<Option<MetaFilter>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(MetaFilter::from_value))
}
