//! Remote data gateway.
//!
//! Every content source implements [`DataGateway`]. The quiz engine and the
//! browsing catalog only talk to this trait, so the HTTP client can be swapped
//! for the bundled static content or a test double.

pub mod fixture;
pub mod http;

use async_trait::async_trait;

use crate::error::{CoreError, Result};
use crate::model::{Language, Level, Province, Question};

pub use fixture::StaticGateway;
pub use http::ApiClient;

pub const PROVINCES_ENDPOINT: &str = "/provinsis";
pub const LANGUAGES_ENDPOINT: &str = "/bahasas";
pub const LEVELS_ENDPOINT: &str = "/levels";
pub const QUESTIONS_ENDPOINT: &str = "/soals";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageFilter {
    All,
    Province(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelFilter {
    All,
    Language(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionFilter {
    All,
    Level(String),
}

impl LanguageFilter {
    pub fn query(&self) -> Vec<(String, String)> {
        match self {
            LanguageFilter::All => Vec::new(),
            LanguageFilter::Province(id) => relation_filter("provinsi", id),
        }
    }
}

impl LevelFilter {
    pub fn query(&self) -> Vec<(String, String)> {
        match self {
            LevelFilter::All => Vec::new(),
            LevelFilter::Language(id) => relation_filter("bahasa", id),
        }
    }
}

impl QuestionFilter {
    pub fn query(&self) -> Vec<(String, String)> {
        match self {
            QuestionFilter::All => Vec::new(),
            QuestionFilter::Level(id) => relation_filter("level", id),
        }
    }
}

fn relation_filter(relation: &str, id: &str) -> Vec<(String, String)> {
    vec![
        (format!("filters[{relation}][id][$eq]"), id.to_string()),
        ("populate".to_string(), "*".to_string()),
    ]
}

/// Source of provinces, languages, levels and questions.
#[async_trait]
pub trait DataGateway: Send + Sync {
    async fn provinces(&self) -> Result<Vec<Province>>;

    async fn languages(&self, filter: LanguageFilter) -> Result<Vec<Language>>;

    async fn levels(&self, filter: LevelFilter) -> Result<Vec<Level>>;

    async fn questions(&self, filter: QuestionFilter) -> Result<Vec<Question>>;

    /// Single language by id.
    async fn language(&self, id: &str) -> Result<Language> {
        self.languages(LanguageFilter::All)
            .await?
            .into_iter()
            .find(|l| l.id == id)
            .ok_or_else(|| CoreError::not_found("language", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_render_strapi_queries() {
        assert!(LevelFilter::All.query().is_empty());
        let q = LevelFilter::Language("3".into()).query();
        assert_eq!(q[0], ("filters[bahasa][id][$eq]".to_string(), "3".to_string()));
        let q = QuestionFilter::Level("9".into()).query();
        assert_eq!(q[0].0, "filters[level][id][$eq]");
        let q = LanguageFilter::Province("1".into()).query();
        assert_eq!(q[0].0, "filters[provinsi][id][$eq]");
    }
}
