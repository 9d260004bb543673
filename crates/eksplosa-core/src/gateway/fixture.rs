//! Static content gateway.
//!
//! Serves content from memory: either the bundled starter course or a JSON
//! document with `provinces`, `languages`, `levels` and `questions` arrays.
//! Filters are applied locally.

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{DataGateway, LanguageFilter, LevelFilter, QuestionFilter};
use crate::error::{CoreError, Result};
use crate::model::{Language, Level, Province, Question};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticGateway {
    #[serde(default)]
    pub provinces: Vec<Province>,
    #[serde(default)]
    pub languages: Vec<Language>,
    #[serde(default)]
    pub levels: Vec<Level>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl StaticGateway {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Starter course: one province, one language, five single-question levels.
    pub fn builtin() -> Self {
        let province = Province {
            id: "1".into(),
            name: "Jawa Timur".into(),
            slug: Some("jawa-timur".into()),
            languages: Vec::new(),
            fun_facts: Vec::new(),
        };
        let language = Language {
            id: "1".into(),
            name: "Jawa".into(),
            province_id: Some("1".into()),
        };

        let course: [(&str, &str, &[&str], &str); 5] = [
            ("Aku sedang makan", "Aku lagi nedha", &["nedha", "iya", "lagi", "Aku", "bo'"], "A"),
            ("Aku lagi berak", "Aku lagi ngising", &["lan", "Aku", "ngising", "kumaha", "lagi"], "B"),
            ("Aku lagi sare", "Aku sedang tidur", &["sedang", "enak", "Aku", "tidur", "cihuy"], "C"),
            (
                "Aku ingin bermain bola",
                "Aku pingin dolan tembung",
                &["Aku", "tembung", "dolan", "kumaha", "pingin"],
                "D",
            ),
            (
                "Koncoku kepising ning dalan",
                "Temanku berak di jalan",
                &["Temanku", "di", "berak", "jalan", "bo'"],
                "E",
            ),
        ];

        let mut levels = Vec::new();
        let mut questions = Vec::new();
        for (i, (prompt, answer, options, kind)) in course.iter().enumerate() {
            let level_id = format!("1{}", kind.to_lowercase());
            levels.push(Level {
                id: level_id.clone(),
                level_number: i as u32 + 1,
                topic: Some("Percakapan sehari hari".into()),
                language_id: Some(language.id.clone()),
            });
            questions.push(Question {
                id: format!("{level_id}-1"),
                level_id: Some(level_id),
                prompt: prompt.to_string(),
                kind: kind.to_string(),
                options: options.iter().map(|o| o.to_string()).collect(),
                answer: answer.to_string(),
            });
        }

        Self {
            provinces: vec![province],
            languages: vec![language],
            levels,
            questions,
        }
    }
}

#[async_trait]
impl DataGateway for StaticGateway {
    async fn provinces(&self) -> Result<Vec<Province>> {
        Ok(self
            .provinces
            .iter()
            .cloned()
            .map(|mut p| {
                if p.languages.is_empty() {
                    p.languages = self
                        .languages
                        .iter()
                        .filter(|l| l.province_id.as_deref() == Some(p.id.as_str()))
                        .cloned()
                        .collect();
                }
                p
            })
            .collect())
    }

    async fn languages(&self, filter: LanguageFilter) -> Result<Vec<Language>> {
        Ok(self
            .languages
            .iter()
            .filter(|l| match &filter {
                LanguageFilter::All => true,
                LanguageFilter::Province(id) => l.province_id.as_deref() == Some(id.as_str()),
            })
            .cloned()
            .collect())
    }

    async fn levels(&self, filter: LevelFilter) -> Result<Vec<Level>> {
        Ok(self
            .levels
            .iter()
            .filter(|l| match &filter {
                LevelFilter::All => true,
                LevelFilter::Language(id) => l.language_id.as_deref() == Some(id.as_str()),
            })
            .cloned()
            .collect())
    }

    async fn questions(&self, filter: QuestionFilter) -> Result<Vec<Question>> {
        Ok(self
            .questions
            .iter()
            .filter(|q| match &filter {
                QuestionFilter::All => true,
                QuestionFilter::Level(id) => q.level_id.as_deref() == Some(id.as_str()),
            })
            .cloned()
            .collect())
    }

    async fn language(&self, id: &str) -> Result<Language> {
        self.languages
            .iter()
            .find(|l| l.id == id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("language", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builtin_course_has_five_levels() {
        let gateway = StaticGateway::builtin();
        let levels = gateway.levels(LevelFilter::Language("1".into())).await.unwrap();
        assert_eq!(levels.len(), 5);
        let questions = gateway
            .questions(QuestionFilter::Level("1c".into()))
            .await
            .unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].answer_len(), 3);
    }

    #[tokio::test]
    async fn provinces_embed_their_languages() {
        let gateway = StaticGateway::builtin();
        let provinces = gateway.provinces().await.unwrap();
        assert_eq!(provinces[0].languages[0].name, "Jawa");
    }

    #[tokio::test]
    async fn unknown_language_is_not_found() {
        let gateway = StaticGateway::builtin();
        let err = gateway.language("99").await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound { kind: "language", .. }));
    }

    #[test]
    fn from_json_reads_flat_document() {
        let gateway = StaticGateway::from_json(
            r#"{ "levels": [{ "id": 1, "level": 1, "bahasa": 2 }] }"#,
        )
        .unwrap();
        assert_eq!(gateway.levels[0].language_id.as_deref(), Some("2"));
        assert!(gateway.questions.is_empty());
    }
}
