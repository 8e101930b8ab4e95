use url::Url;

use crate::error::{AppError, Result};
use crate::models::NewsId;

/// Columns fetched for the list view.
pub const LIST_COLUMNS: &[&str] = &[
    "id",
    "title",
    "host",
    "created_at",
    "describe_text",
    "word_count",
    "url",
];

/// Columns fetched for the detail view.
pub const DETAIL_COLUMNS: &[&str] = &[
    "id",
    "title",
    "host",
    "created_at",
    "word_count",
    "meta_filter",
    "article",
    "text",
    "summarizer",
    "url",
];

/// A read against one table of the REST endpoint, in PostgREST query dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableQuery {
    table: String,
    columns: Vec<String>,
    order: Option<String>,
    filters: Vec<(String, String)>,
    single: bool,
}

impl TableQuery {
    pub fn table(table: &str) -> Self {
        Self {
            table: table.to_string(),
            columns: Vec::new(),
            order: None,
            filters: Vec::new(),
            single: false,
        }
    }

    pub fn select(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Sorts by `column`, largest first.
    pub fn order_desc(mut self, column: &str) -> Self {
        self.order = Some(format!("{column}.desc"));
        self
    }

    pub fn eq(mut self, column: &str, value: &str) -> Self {
        self.filters.push((column.to_string(), value.to_string()));
        self
    }

    /// Requires the response to be exactly one row; the store rejects zero or many.
    pub fn single(mut self) -> Self {
        self.single = true;
        self
    }

    pub fn expects_single(&self) -> bool {
        self.single
    }

    pub fn url(&self, base: &Url) -> Result<Url> {
        let mut url = base.clone();
        url.set_query(None);
        url.path_segments_mut()
            .map_err(|_| AppError::Config(format!("store URL cannot be a base: {base}")))?
            .pop_if_empty()
            .extend(["rest", "v1", self.table.as_str()]);

        {
            let mut pairs = url.query_pairs_mut();
            let select = if self.columns.is_empty() {
                "*".to_string()
            } else {
                self.columns.join(",")
            };
            pairs.append_pair("select", &select);
            for (column, value) in &self.filters {
                pairs.append_pair(column, &format!("eq.{value}"));
            }
            if let Some(order) = &self.order {
                pairs.append_pair("order", order);
            }
        }

        Ok(url)
    }
}

/// Every row, newest first. No limit: the whole table is fetched.
pub fn list_query(table: &str) -> TableQuery {
    TableQuery::table(table)
        .select(LIST_COLUMNS)
        .order_desc("created_at")
}

pub fn detail_query(table: &str, id: &NewsId) -> TableQuery {
    TableQuery::table(table)
        .select(DETAIL_COLUMNS)
        .eq("id", id.as_str())
        .single()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(url: &Url) -> Vec<(String, String)> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn list_query_orders_newest_first_without_limit() {
        let base = Url::parse("https://example.supabase.co").unwrap();
        let url = list_query("News").url(&base).unwrap();

        assert_eq!(url.path(), "/rest/v1/News");
        assert_eq!(
            pairs(&url),
            vec![
                (
                    "select".to_string(),
                    "id,title,host,created_at,describe_text,word_count,url".to_string()
                ),
                ("order".to_string(), "created_at.desc".to_string()),
            ]
        );
        assert!(!list_query("News").expects_single());
    }

    #[test]
    fn detail_query_filters_by_id_and_expects_one_row() {
        let base = Url::parse("https://example.supabase.co/").unwrap();
        let query = detail_query("News", &NewsId::new("42"));
        let url = query.url(&base).unwrap();

        assert!(query.expects_single());
        assert!(pairs(&url).contains(&("id".to_string(), "eq.42".to_string())));
        assert!(pairs(&url)
            .iter()
            .any(|(k, v)| k == "select" && v.contains("meta_filter") && v.contains("summarizer")));
    }

    #[test]
    fn base_path_and_query_on_the_base_are_handled() {
        let base = Url::parse("http://localhost:54321/proxy/?stale=1").unwrap();
        let url = TableQuery::table("News").url(&base).unwrap();

        assert_eq!(url.path(), "/proxy/rest/v1/News");
        assert_eq!(pairs(&url), vec![("select".to_string(), "*".to_string())]);
    }

    #[test]
    fn table_names_are_percent_encoded() {
        let base = Url::parse("https://example.supabase.co").unwrap();
        let url = TableQuery::table("Daily News").url(&base).unwrap();

        assert_eq!(url.path(), "/rest/v1/Daily%20News");
    }
}
