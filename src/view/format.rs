use std::borrow::Cow;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

/// Maximum characters of `describe_text` shown on a list card.
pub const SUMMARY_LIMIT: usize = 200;
pub const ELLIPSIS: &str = "...";

/// Locale used for every displayed date. One per process, shared by both views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DateLocale {
    #[default]
    #[serde(rename = "zh-CN")]
    ZhCn,
    #[serde(rename = "en-US")]
    EnUs,
}

impl DateLocale {
    fn pattern(self) -> &'static str {
        match self {
            DateLocale::ZhCn => "%Y年%-m月%-d日 %H:%M",
            DateLocale::EnUs => "%B %-d, %Y at %I:%M %p",
        }
    }
}

/// Long-form date plus hour and minute in the local time zone.
/// Input that is not a recognizable timestamp is returned unchanged.
pub fn format_timestamp(raw: &str, locale: DateLocale) -> String {
    format_timestamp_in(raw, locale, &Local)
}

pub fn format_timestamp_in<Tz: TimeZone>(raw: &str, locale: DateLocale, tz: &Tz) -> String {
    match wall_clock(raw, tz) {
        Some(datetime) => datetime.format(locale.pattern()).to_string(),
        None => raw.to_string(),
    }
}

fn wall_clock<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Some(datetime.with_timezone(tz).naive_local());
    }

    // Postgres text output, e.g. `2025-08-30 12:00:00.123+00`
    for pattern in ["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"] {
        if let Ok(datetime) = DateTime::parse_from_str(raw, pattern) {
            return Some(datetime.with_timezone(tz).naive_local());
        }
    }

    // Zone-less values are already wall-clock time
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, pattern) {
            return Some(datetime);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// First `limit` characters followed by an ellipsis, or the text as-is when it fits.
pub fn truncate_chars(text: &str, limit: usize) -> Cow<'_, str> {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => Cow::Owned(format!("{}{ELLIPSIS}", &text[..cut])),
        None => Cow::Borrowed(text),
    }
}

/// Splits a body on blank-line delimiters. Whitespace-only paragraphs are dropped.
pub fn split_paragraphs(body: &str) -> Vec<String> {
    body.split("\n\n")
        .filter(|paragraph| !paragraph.trim().is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn zh_cn_long_form_with_24h_clock() {
        let formatted = format_timestamp_in("2025-08-30T14:05:09.123456+00:00", DateLocale::ZhCn, &Utc);

        assert_eq!(formatted, "2025年8月30日 14:05");
    }

    #[test]
    fn zoned_timestamps_are_shifted_to_the_display_zone() {
        let shanghai = FixedOffset::east_opt(8 * 3600).unwrap();

        let formatted = format_timestamp_in("2025-08-30T20:30:00Z", DateLocale::ZhCn, &shanghai);

        assert_eq!(formatted, "2025年8月31日 04:30");
    }

    #[test]
    fn en_us_long_form() {
        let formatted = format_timestamp_in("2025-08-30T14:05:00+00:00", DateLocale::EnUs, &Utc);

        assert_eq!(formatted, "August 30, 2025 at 02:05 PM");
    }

    #[test]
    fn postgres_text_and_naive_forms_are_accepted() {
        assert_eq!(
            format_timestamp_in("2025-08-30 14:05:00.5+00", DateLocale::ZhCn, &Utc),
            "2025年8月30日 14:05"
        );
        assert_eq!(
            format_timestamp_in("2025-08-30T09:15:00", DateLocale::ZhCn, &Utc),
            "2025年8月30日 09:15"
        );
        assert_eq!(
            format_timestamp_in("2025-08-29", DateLocale::ZhCn, &Utc),
            "2025年8月29日 00:00"
        );
    }

    #[test]
    fn unparseable_dates_pass_through() {
        assert_eq!(format_timestamp_in("last tuesday", DateLocale::ZhCn, &Utc), "last tuesday");
        assert_eq!(format_timestamp_in("", DateLocale::EnUs, &Utc), "");
    }

    #[test]
    fn long_text_is_cut_at_exactly_the_limit() {
        let text = "x".repeat(250);

        let truncated = truncate_chars(&text, SUMMARY_LIMIT);

        assert_eq!(truncated, format!("{}{}", "x".repeat(200), ELLIPSIS));
    }

    #[test]
    fn short_text_is_untouched() {
        let exact = "y".repeat(200);

        assert!(matches!(truncate_chars(&exact, SUMMARY_LIMIT), Cow::Borrowed(_)));
        assert_eq!(truncate_chars("short", SUMMARY_LIMIT), "short");
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let text = "新闻".repeat(150);

        let truncated = truncate_chars(&text, SUMMARY_LIMIT);

        assert_eq!(truncated.chars().count(), 200 + ELLIPSIS.len());
        assert!(truncated.starts_with("新闻新闻"));
    }

    #[test]
    fn paragraphs_split_on_blank_lines_in_order() {
        assert_eq!(split_paragraphs("Para one.\n\nPara two."), vec!["Para one.", "Para two."]);
        assert_eq!(split_paragraphs("Line one.\nLine two."), vec!["Line one.\nLine two."]);
        assert_eq!(split_paragraphs("A\n\n\n\nB"), vec!["A", "B"]);
    }
}
