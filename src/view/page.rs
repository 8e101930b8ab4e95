use crate::models::{MetaFilter, NewsId, NewsItem, NewsSummary};

use super::format::{format_timestamp, split_paragraphs, truncate_chars, DateLocale, SUMMARY_LIMIT};

pub const UNTITLED: &str = "untitled";
pub const NO_CONTENT: &str = "no content.";

/// One entry of the list screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ListCard {
    pub id: NewsId,
    pub title: String,
    pub host: Option<String>,
    pub collected_at: String,
    pub word_count: Option<i64>,
    pub summary: String,
    pub url: Option<String>,
}

impl ListCard {
    pub fn from_summary(row: &NewsSummary, locale: DateLocale) -> Self {
        Self {
            id: row.id.clone(),
            title: present(&row.title).unwrap_or_else(|| UNTITLED.to_string()),
            host: present(&row.host),
            collected_at: format_timestamp(&row.created_at, locale),
            word_count: row.word_count.filter(|count| *count > 0),
            summary: row
                .describe_text
                .as_deref()
                .map(|text| truncate_chars(text, SUMMARY_LIMIT).into_owned())
                .unwrap_or_default(),
            url: present(&row.url),
        }
    }

    pub fn to_plain_text(&self) -> String {
        let mut out = format!("[{}] {}\n", self.id, self.title);
        out.push_str(&meta_line(&self.host, &self.collected_at, self.word_count));
        out.push('\n');
        if !self.summary.is_empty() {
            out.push_str(&self.summary);
            out.push('\n');
        }
        if let Some(url) = &self.url {
            out.push_str(&format!("Original: {url}\n"));
        }
        out
    }
}

/// Where a detail page's body came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodySource {
    Article,
    Text,
    Placeholder,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetadataBlock {
    pub title: Option<String>,
    pub kind: Option<String>,
    pub author: Option<String>,
    pub published_at: Option<String>,
    pub tags: Vec<String>,
}

impl MetadataBlock {
    fn from_meta(meta: &MetaFilter, locale: DateLocale) -> Self {
        Self {
            title: present(&meta.title),
            kind: present(&meta.kind),
            author: present(&meta.author),
            published_at: present(&meta.published_date)
                .map(|date| format_timestamp(&date, locale)),
            tags: meta.tag_list(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields().is_empty() && self.tags.is_empty()
    }

    /// Labelled fields that have a value, in display order.
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        [
            ("Title", &self.title),
            ("Type", &self.kind),
            ("Author", &self.author),
            ("Published", &self.published_at),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.as_deref().map(|v| (label, v)))
        .collect()
    }
}

/// Everything the detail screen shows for one row.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailPage {
    pub title: String,
    pub host: Option<String>,
    pub collected_at: String,
    pub word_count: Option<i64>,
    pub body_source: BodySource,
    pub paragraphs: Vec<String>,
    /// Markdown source of the generated summary.
    pub summary: Option<String>,
    pub metadata: Option<MetadataBlock>,
    pub url: Option<String>,
}

impl DetailPage {
    pub fn from_item(item: &NewsItem, locale: DateLocale) -> Self {
        let (body_source, paragraphs) = resolve_body(item);

        Self {
            title: present(&item.title).unwrap_or_else(|| UNTITLED.to_string()),
            host: present(&item.host),
            collected_at: format_timestamp(&item.created_at, locale),
            word_count: item.word_count.filter(|count| *count > 0),
            body_source,
            paragraphs,
            summary: present(&item.summarizer),
            metadata: item
                .meta_filter
                .as_ref()
                .map(|meta| MetadataBlock::from_meta(meta, locale))
                .filter(|block| !block.is_empty()),
            url: present(&item.url),
        }
    }

    pub fn meta_line(&self) -> String {
        meta_line(&self.host, &self.collected_at, self.word_count)
    }

    pub fn to_plain_text(&self) -> String {
        let mut out = format!("{}\n{}\n\n", self.title, self.meta_line());

        if let Some(metadata) = &self.metadata {
            for (label, value) in metadata.fields() {
                out.push_str(&format!("{label}: {value}\n"));
            }
            if !metadata.tags.is_empty() {
                out.push_str(&format!("Tags: {}\n", metadata.tags.join(", ")));
            }
            out.push('\n');
        }

        out.push_str(&self.paragraphs.join("\n\n"));
        out.push('\n');

        if let Some(summary) = &self.summary {
            out.push_str("\nSummary\n");
            out.push_str(summary);
            out.push('\n');
        }
        if let Some(url) = &self.url {
            out.push_str(&format!("\nOriginal: {url}\n"));
        }
        out
    }
}

fn resolve_body(item: &NewsItem) -> (BodySource, Vec<String>) {
    let candidates = [
        (BodySource::Article, &item.article),
        (BodySource::Text, &item.text),
    ];

    for (source, body) in candidates {
        if let Some(body) = present(body) {
            let paragraphs = split_paragraphs(&body);
            if !paragraphs.is_empty() {
                return (source, paragraphs);
            }
        }
    }

    (BodySource::Placeholder, vec![NO_CONTENT.to_string()])
}

fn meta_line(host: &Option<String>, collected_at: &str, word_count: Option<i64>) -> String {
    let mut parts = Vec::new();
    if let Some(host) = host {
        parts.push(format!("Source: {host}"));
    }
    parts.push(format!("Collected: {collected_at}"));
    if let Some(count) = word_count {
        parts.push(format!("Words: {count}"));
    }
    parts.join(" | ")
}

/// The value when it has visible content.
fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
}
