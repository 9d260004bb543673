//! Request context for a quiz session.
//!
//! The canonical query parameter names are `language`, `province` and
//! `level`. They are used both when reading a link and when building one.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{CoreError, Result};

pub const LANGUAGE_PARAM: &str = "language";
pub const PROVINCE_PARAM: &str = "province";
pub const LEVEL_PARAM: &str = "level";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizParams {
    pub language_id: Option<String>,
    pub province_id: Option<String>,
    pub level_id: Option<String>,
}

impl QuizParams {
    pub fn new(language_id: impl Into<String>, province_id: impl Into<String>) -> Self {
        Self {
            language_id: Some(language_id.into()),
            province_id: Some(province_id.into()),
            level_id: None,
        }
    }

    pub fn with_level(mut self, level_id: impl Into<String>) -> Self {
        self.level_id = Some(level_id.into());
        self
    }

    /// Parse a query string such as `language=3&province=1&level=7`.
    /// A leading `?` is accepted. Empty values count as absent.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = Self::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                LANGUAGE_PARAM => params.language_id = Some(value.to_string()),
                PROVINCE_PARAM => params.province_id = Some(value.to_string()),
                LEVEL_PARAM => params.level_id = Some(value.to_string()),
                _ => {}
            }
        }
        params
    }

    /// Parse the query part of a full link.
    pub fn from_url(link: &str) -> Result<Self> {
        let url = Url::parse(link).map_err(|e| CoreError::InvalidState(format!("invalid link {link}: {e}")))?;
        Ok(Self::from_query(url.query().unwrap_or_default()))
    }

    /// Required ids, or `MissingParameter` naming the first absent one.
    /// Blank ids count as absent.
    pub fn require(&self) -> Result<(&str, &str)> {
        let language = present(&self.language_id).ok_or(CoreError::MissingParameter(LANGUAGE_PARAM))?;
        let province = present(&self.province_id).ok_or(CoreError::MissingParameter(PROVINCE_PARAM))?;
        Ok((language, province))
    }

    /// Render the canonical query string (without the leading `?`).
    pub fn to_query(&self) -> String {
        let mut out = url::form_urlencoded::Serializer::new(String::new());
        if let Some(ref id) = self.language_id {
            out.append_pair(LANGUAGE_PARAM, id);
        }
        if let Some(ref id) = self.province_id {
            out.append_pair(PROVINCE_PARAM, id);
        }
        if let Some(ref id) = self.level_id {
            out.append_pair(LEVEL_PARAM, id);
        }
        out.finish()
    }
}

fn present(id: &Option<String>) -> Option<&str> {
    id.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
