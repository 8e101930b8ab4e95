use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{NewsId, NewsItem, NewsSummary};

use super::query::{detail_query, list_query, TableQuery};

const SINGLE_OBJECT_MEDIA_TYPE: &str = "application/vnd.pgrst.object+json";
const NO_SINGLE_ROW_CODE: &str = "PGRST116";

/// Outcome of a point lookup that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

#[derive(Debug, Default, Deserialize)]
struct StoreErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<String>,
    #[serde(default)]
    hint: Option<String>,
}

/// Read-only client for the hosted news table.
pub struct NewsStore {
    client: Client,
    base_url: Url,
    api_key: String,
    table: String,
}

impl NewsStore {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("news-reader/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.store_url()?,
            api_key: config.store_key()?.to_string(),
            table: config.table.clone(),
        })
    }

    /// Fetch the list projection of every row, newest first.
    pub async fn list_news(&self) -> Result<Vec<NewsSummary>> {
        let response = self.send(&list_query(&self.table)).await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await?;
            return Err(store_error(status, &body));
        }

        let rows: Vec<NewsSummary> = response.json().await?;
        tracing::debug!("Fetched {} rows from {}", rows.len(), self.table);
        Ok(rows)
    }

    /// Fetch one row by id. Zero matches is `NotFound`; several matches is an error.
    pub async fn get_news(&self, id: &NewsId) -> Result<Lookup<NewsItem>> {
        let response = self.send(&detail_query(&self.table, id)).await?;
        let status = response.status();
        let body = response.text().await?;
        classify_single(status, &body)
    }

    async fn send(&self, query: &TableQuery) -> Result<Response> {
        let url = query.url(&self.base_url)?;
        tracing::debug!("GET {}", url);

        let mut request = self
            .client
            .get(url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key);

        if query.expects_single() {
            request = request.header(ACCEPT, SINGLE_OBJECT_MEDIA_TYPE);
        }

        Ok(request.send().await?)
    }
}

/// Interprets the response to a single-row request.
pub(crate) fn classify_single<T: DeserializeOwned>(
    status: StatusCode,
    body: &str,
) -> Result<Lookup<T>> {
    if !status.is_success() {
        let error: StoreErrorBody = serde_json::from_str(body).unwrap_or_default();
        let no_rows = status == StatusCode::NOT_ACCEPTABLE
            && error.code.as_deref() == Some(NO_SINGLE_ROW_CODE)
            && error
                .details
                .as_deref()
                .is_some_and(|details| details.contains(" 0 rows"));

        if no_rows {
            return Ok(Lookup::NotFound);
        }
        return Err(store_error(status, body));
    }

    // The object media type should yield a bare object, but tolerate an array
    // from stores that ignore it.
    match serde_json::from_str::<Value>(body)? {
        Value::Array(mut rows) => match rows.len() {
            0 => Ok(Lookup::NotFound),
            1 => Ok(Lookup::Found(serde_json::from_value(rows.remove(0))?)),
            n => Err(AppError::Store {
                status: status.as_u16(),
                message: format!("expected a single row, got {n}"),
            }),
        },
        Value::Null => Ok(Lookup::NotFound),
        row => Ok(Lookup::Found(serde_json::from_value(row)?)),
    }
}

fn store_error(status: StatusCode, body: &str) -> AppError {
    let message = match serde_json::from_str::<StoreErrorBody>(body) {
        Ok(error) => {
            let parts: Vec<String> = [error.message, error.details, error.hint]
                .into_iter()
                .flatten()
                .filter(|part| !part.trim().is_empty())
                .collect();
            parts.join("; ")
        }
        Err(_) => body.trim().to_string(),
    };

    let message = if message.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    } else {
        message
    };

    AppError::Store {
        status: status.as_u16(),
        message,
    }
}
