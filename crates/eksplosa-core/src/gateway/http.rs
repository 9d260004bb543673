//! REST client for the Strapi content API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{
    DataGateway, LanguageFilter, LevelFilter, QuestionFilter, LANGUAGES_ENDPOINT,
    LEVELS_ENDPOINT, PROVINCES_ENDPOINT, QUESTIONS_ENDPOINT,
};
use crate::error::{CoreError, Result};
use crate::model::{flatten_entry, Language, Level, Province, Question};
use crate::storage::config::ApiConfig;

pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Build a client from the `[api]` config section.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CoreError::NetworkFailure {
                endpoint: config.base_url.clone(),
                status: None,
                message: e.to_string(),
            })?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `endpoint` and return the `data` member of the envelope.
    async fn fetch_data(&self, endpoint: &str, query: &[(String, String)]) -> Result<Value> {
        let url = format!("{}{}", self.base_url, endpoint);
        tracing::debug!(%url, ?query, "fetching");

        let network = |e: reqwest::Error| CoreError::NetworkFailure {
            endpoint: endpoint.to_string(),
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        };

        let resp = self.client.get(&url).query(query).send().await.map_err(network)?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            tracing::warn!(endpoint, status, "fetch failed");
            return Err(CoreError::NetworkFailure {
                endpoint: endpoint.to_string(),
                status: Some(status),
                message: format!("HTTP {status}"),
            });
        }

        let body: Value = resp.json().await.map_err(|e| CoreError::Decode {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })?;
        unwrap_envelope(endpoint, body)
    }

    async fn fetch_list<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(String, String)],
    ) -> Result<Vec<T>> {
        let data = self.fetch_data(endpoint, query).await?;
        decode_list(endpoint, data)
    }
}

fn unwrap_envelope(endpoint: &str, mut body: Value) -> Result<Value> {
    match body.get_mut("data") {
        Some(data) => Ok(data.take()),
        None => Err(CoreError::Decode {
            endpoint: endpoint.to_string(),
            message: "response has no `data` member".into(),
        }),
    }
}

/// Decode the `data` array of a list endpoint, accepting flat or nested entries.
pub fn decode_list<T: DeserializeOwned>(endpoint: &str, data: Value) -> Result<Vec<T>> {
    let items = match data {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => {
            return Err(CoreError::Decode {
                endpoint: endpoint.to_string(),
                message: format!("expected a list, got {other}"),
            })
        }
    };
    items
        .into_iter()
        .map(|item| {
            serde_json::from_value(flatten_entry(item)).map_err(|e| CoreError::Decode {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            })
        })
        .collect()
}

#[async_trait]
impl DataGateway for ApiClient {
    async fn provinces(&self) -> Result<Vec<Province>> {
        let query = vec![("populate".to_string(), "*".to_string())];
        self.fetch_list(PROVINCES_ENDPOINT, &query).await
    }

    async fn languages(&self, filter: LanguageFilter) -> Result<Vec<Language>> {
        self.fetch_list(LANGUAGES_ENDPOINT, &filter.query()).await
    }

    async fn levels(&self, filter: LevelFilter) -> Result<Vec<Level>> {
        self.fetch_list(LEVELS_ENDPOINT, &filter.query()).await
    }

    async fn questions(&self, filter: QuestionFilter) -> Result<Vec<Question>> {
        self.fetch_list(QUESTIONS_ENDPOINT, &filter.query()).await
    }

    async fn language(&self, id: &str) -> Result<Language> {
        let endpoint = format!("{LANGUAGES_ENDPOINT}/{id}");
        let data = match self.fetch_data(&endpoint, &[]).await {
            Err(CoreError::NetworkFailure {
                status: Some(404), ..
            }) => return Err(CoreError::not_found("language", id)),
            other => other?,
        };
        if data.is_null() {
            return Err(CoreError::not_found("language", id));
        }
        serde_json::from_value(flatten_entry(data)).map_err(|e| CoreError::Decode {
            endpoint,
            message: e.to_string(),
        })
    }
}
