//! Content types served by the remote data source.
//!
//! Field names follow the API payloads (`nama`, `topik`, `pertanyaan`, ...)
//! while the Rust side uses descriptive names. Identifiers are normalised to
//! strings because the API sends numbers but URLs and storage carry strings.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Topic shown when a level has none.
pub const DEFAULT_TOPIC: &str = "Percakapan sehari-hari";

/// A province whose regional languages can be explored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Province {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(rename = "nama", default)]
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    /// Languages embedded in the province payload, when the API populates them.
    #[serde(rename = "bahasas", default, deserialize_with = "relation_list")]
    pub languages: Vec<Language>,
    #[serde(rename = "fakta_menariks", default, deserialize_with = "relation_list")]
    pub fun_facts: Vec<FunFact>,
}

/// A short trivia card attached to a province.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunFact {
    #[serde(rename = "judul", default)]
    pub title: Option<String>,
    #[serde(rename = "deskripsi", default)]
    pub description: Option<String>,
}

/// A regional language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Language {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(rename = "nama", default)]
    pub name: String,
    #[serde(rename = "provinsi", default, deserialize_with = "relation_id")]
    pub province_id: Option<String>,
}

/// One stage of the quiz for a language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    /// Ordinal position within the language.
    #[serde(rename = "level")]
    pub level_number: u32,
    #[serde(rename = "topik", default)]
    pub topic: Option<String>,
    #[serde(rename = "bahasa", default, deserialize_with = "relation_id")]
    pub language_id: Option<String>,
}

impl Level {
    pub fn topic_label(&self) -> &str {
        self.topic
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(DEFAULT_TOPIC)
    }
}

/// A prompt sentence with its word pool and the correct ordered answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(rename = "level", default, deserialize_with = "relation_id")]
    pub level_id: Option<String>,
    #[serde(rename = "pertanyaan")]
    pub prompt: String,
    #[serde(rename = "tipe", default)]
    pub kind: String,
    /// Word pool the player picks from.
    #[serde(rename = "pilihan", default)]
    pub options: Vec<String>,
    /// Correct answer as a sentence; tokens are its whitespace-separated words.
    #[serde(rename = "jawaban_benar")]
    pub answer: String,
}

impl Question {
    pub fn answer_tokens(&self) -> Vec<&str> {
        self.answer.split_whitespace().collect()
    }

    /// Number of words the player must place before the answer is checked.
    pub fn answer_len(&self) -> usize {
        self.answer.split_whitespace().count()
    }

    pub fn has_option(&self, word: &str) -> bool {
        self.options.iter().any(|o| o == word)
    }
}

/// Merge a nested `{ "id": .., "attributes": {..} }` entry into a flat object.
///
/// Flat entries are returned unchanged.
pub fn flatten_entry(entry: Value) -> Value {
    match entry {
        Value::Object(mut obj) => match obj.remove("attributes") {
            Some(Value::Object(mut attrs)) => {
                if let Some(id) = obj.remove("id") {
                    attrs.insert("id".into(), id);
                }
                for (k, v) in obj {
                    attrs.entry(k).or_insert(v);
                }
                Value::Object(attrs)
            }
            Some(other) => {
                obj.insert("attributes".into(), other);
                Value::Object(obj)
            }
            None => Value::Object(obj),
        },
        other => other,
    }
}

fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    scalar_id(&value).ok_or_else(|| serde::de::Error::custom(format!("invalid id: {value}")))
}

fn scalar_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Extract an id from a bare id, `{ "id": .. }` or `{ "data": { "id": .. } }`.
fn relation_value_id(value: &Value) -> Option<String> {
    match value {
        Value::Object(obj) => {
            if let Some(id) = obj.get("id") {
                return scalar_id(id);
            }
            obj.get("data").and_then(relation_value_id)
        }
        other => scalar_id(other),
    }
}

fn relation_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(relation_value_id))
}

/// A to-many relation: a bare array or `{ "data": [..] }`, entries flat or nested.
fn relation_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let items = match value {
        Some(Value::Array(items)) => items,
        Some(Value::Object(mut obj)) => match obj.remove("data") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };
    items
        .into_iter()
        .map(|item| serde_json::from_value(flatten_entry(item)).map_err(serde::de::Error::custom))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn level_accepts_numeric_ids_and_nested_relation() {
        let level: Level = serde_json::from_value(json!({
            "id": 7,
            "level": 2,
            "topik": "Salam",
            "bahasa": { "data": { "id": 3, "attributes": { "nama": "Jawa" } } }
        }))
        .unwrap();
        assert_eq!(level.id, "7");
        assert_eq!(level.level_number, 2);
        assert_eq!(level.language_id.as_deref(), Some("3"));
        assert_eq!(level.topic_label(), "Salam");
    }

    #[test]
    fn level_without_topic_uses_default_label() {
        let level: Level =
            serde_json::from_value(json!({ "id": "a", "level": 1, "topik": null })).unwrap();
        assert_eq!(level.topic_label(), DEFAULT_TOPIC);
        assert!(level.language_id.is_none());
    }

    #[test]
    fn question_tokens_split_on_whitespace() {
        let q: Question = serde_json::from_value(json!({
            "id": 1,
            "level": 4,
            "pertanyaan": "Aku sedang makan",
            "tipe": "A",
            "pilihan": ["nedha", "iya", "lagi", "Aku", "bo'"],
            "jawaban_benar": "Aku  lagi nedha"
        }))
        .unwrap();
        assert_eq!(q.answer_tokens(), vec!["Aku", "lagi", "nedha"]);
        assert_eq!(q.answer_len(), 3);
        assert_eq!(q.level_id.as_deref(), Some("4"));
        assert!(q.has_option("bo'"));
        assert!(!q.has_option("makan"));
    }

    #[test]
    fn flatten_entry_merges_attributes() {
        let flat = flatten_entry(json!({ "id": 5, "attributes": { "nama": "Bali" } }));
        assert_eq!(flat, json!({ "id": 5, "nama": "Bali" }));

        let already_flat = json!({ "id": 5, "nama": "Bali" });
        assert_eq!(flatten_entry(already_flat.clone()), already_flat);
    }

    #[test]
    fn province_reads_nested_languages() {
        let province: Province = serde_json::from_value(json!({
            "id": 1,
            "nama": "Jawa Timur",
            "slug": "jawa-timur",
            "bahasas": { "data": [
                { "id": 10, "attributes": { "nama": "Madura" } },
                { "id": 11, "attributes": { "nama": "Jawa" } }
            ]},
            "fakta_menariks": [{ "judul": "Reog", "deskripsi": null }]
        }))
        .unwrap();
        assert_eq!(province.languages.len(), 2);
        assert_eq!(province.languages[0].id, "10");
        assert_eq!(province.languages[1].name, "Jawa");
        assert_eq!(province.fun_facts[0].title.as_deref(), Some("Reog"));
    }

    #[test]
    fn invalid_id_is_rejected() {
        let result: Result<Language, _> = serde_json::from_value(json!({ "id": true }));
        assert!(result.is_err());
    }
}
