//! Taxonomy files: subject → topics → subtopics.
//!
//! # Format
//! ```json
//! {
//!   "subject": "Basic Learning",
//!   "subtopicsLabel": "Concepts",
//!   "topics": {
//!     "name": "Categories",
//!     "values": [
//!       { "name": "Programming", "key": "PROG",
//!         "subtopics": [{ "name": "Loops", "key": "P03", "comment": "..." }] }
//!     ]
//!   }
//! }
//! ```
//!
//! Only the outer shape is checked. Content is taken as-is.

use crate::error::TaxonomyError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A loaded quiz taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Taxonomy {
    pub subject: String,
    #[serde(default)]
    pub subtopics_label: String,
    pub topics: TopicGroup,
}

/// The topic list together with its heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicGroup {
    #[serde(default)]
    pub name: String,
    pub values: Vec<Topic>,
}

/// A category that subtopics are matched against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default)]
    pub subtopics: Vec<Subtopic>,
}

/// A leaf concept the user has to classify.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtopic {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Taxonomy {
    /// Build a taxonomy from already-parsed JSON.
    pub fn load(raw: &Value) -> Result<Self, TaxonomyError> {
        let object = raw
            .as_object()
            .ok_or_else(|| TaxonomyError::InvalidFormat("expected a JSON object".into()))?;

        for field in ["subject", "topics"] {
            if !object.contains_key(field) {
                return Err(TaxonomyError::InvalidFormat(format!(
                    "missing `{field}` field"
                )));
            }
        }

        let taxonomy: Taxonomy = serde_json::from_value(raw.clone())
            .map_err(|e| TaxonomyError::InvalidFormat(e.to_string()))?;

        if taxonomy.topics.values.is_empty() {
            return Err(TaxonomyError::InvalidFormat("`topics.values` is empty".into()));
        }

        Ok(taxonomy)
    }

    /// Parse and load a taxonomy from file contents.
    pub fn from_json_str(content: &str) -> Result<Self, TaxonomyError> {
        let raw: Value = serde_json::from_str(content)?;
        Self::load(&raw)
    }

    /// Built-in taxonomy shown before any file is opened.
    pub fn sample() -> Self {
        fn sub(name: &str, key: &str, comment: &str) -> Subtopic {
            Subtopic {
                name: name.to_string(),
                key: Some(key.to_string()),
                comment: Some(comment.to_string()),
            }
        }

        Self {
            subject: "Basic Learning".to_string(),
            subtopics_label: "Concepts".to_string(),
            topics: TopicGroup {
                name: "Categories".to_string(),
                values: vec![
                    Topic {
                        name: "Programming".to_string(),
                        key: Some("PROG".to_string()),
                        comment: None,
                        subtopics: vec![
                            sub(
                                "Variables",
                                "P01",
                                "Storage containers for data values in programming.",
                            ),
                            sub(
                                "Functions",
                                "P02",
                                "Reusable blocks of code that perform specific tasks.",
                            ),
                            sub(
                                "Loops",
                                "P03",
                                "Control structures that repeat code execution.",
                            ),
                        ],
                    },
                    Topic {
                        name: "Mathematics".to_string(),
                        key: Some("MATH".to_string()),
                        comment: None,
                        subtopics: vec![
                            sub(
                                "Algebra",
                                "M01",
                                "Mathematical operations with symbols and variables.",
                            ),
                            sub(
                                "Geometry",
                                "M02",
                                "Study of shapes, sizes, and spatial relationships.",
                            ),
                        ],
                    },
                ],
            },
        }
    }

    /// Total number of subtopics across all topics.
    pub fn subtopic_count(&self) -> usize {
        self.topics.values.iter().map(|t| t.subtopics.len()).sum()
    }

    /// Look up a topic by name.
    pub fn topic(&self, name: &str) -> Option<&Topic> {
        self.topics.values.iter().find(|t| t.name == name)
    }
}

/// Detail title for a keyed entry: `"{key} - {name}"`, or just the name.
pub fn display_title(key: Option<&str>, name: &str) -> String {
    match key {
        Some(key) if !key.is_empty() => format!("{key} - {name}"),
        _ => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn load_minimal_taxonomy() {
        let raw = json!({
            "subject": "Biology",
            "subtopicsLabel": "Organs",
            "topics": {
                "name": "Systems",
                "values": [
                    { "name": "Circulatory", "subtopics": [{ "name": "Heart" }] }
                ]
            }
        });
        let taxonomy = Taxonomy::load(&raw).unwrap();
        assert_eq!(taxonomy.subject, "Biology");
        assert_eq!(taxonomy.subtopics_label, "Organs");
        assert_eq!(taxonomy.topics.name, "Systems");
        assert_eq!(taxonomy.topics.values[0].subtopics[0].name, "Heart");
        assert_eq!(taxonomy.topics.values[0].subtopics[0].key, None);
    }

    #[test]
    fn reject_missing_subject() {
        let raw = json!({ "topics": { "name": "T", "values": [{ "name": "A" }] } });
        let err = Taxonomy::load(&raw).unwrap_err();
        assert!(matches!(err, TaxonomyError::InvalidFormat(_)));
        assert!(err.to_string().contains("subject"));
    }

    #[test]
    fn reject_missing_topics() {
        let err = Taxonomy::load(&json!({ "foo": 1 })).unwrap_err();
        assert!(matches!(err, TaxonomyError::InvalidFormat(_)));
    }

    #[test]
    fn reject_non_object() {
        let err = Taxonomy::load(&json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, TaxonomyError::InvalidFormat(_)));
    }

    #[test]
    fn reject_empty_topic_list() {
        let raw = json!({ "subject": "S", "topics": { "name": "T", "values": [] } });
        assert!(Taxonomy::load(&raw).is_err());
    }

    #[test]
    fn topic_without_subtopics_is_accepted() {
        let raw = json!({ "subject": "S", "topics": { "values": [{ "name": "Empty" }] } });
        let taxonomy = Taxonomy::load(&raw).unwrap();
        assert_eq!(taxonomy.subtopic_count(), 0);
        assert_eq!(taxonomy.subtopics_label, "");
    }

    #[test]
    fn malformed_text_is_reported() {
        let err = Taxonomy::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, TaxonomyError::Malformed(_)));
    }

    #[test]
    fn sample_counts() {
        let sample = Taxonomy::sample();
        assert_eq!(sample.subtopic_count(), 5);
        assert_eq!(sample.topic("Mathematics").unwrap().subtopics.len(), 2);
        assert!(sample.topic("History").is_none());
    }

    #[test]
    fn sample_survives_json_round_trip() {
        let text = serde_json::to_string(&Taxonomy::sample()).unwrap();
        assert!(text.contains("\"subtopicsLabel\""));
        assert_eq!(Taxonomy::from_json_str(&text).unwrap(), Taxonomy::sample());
    }

    #[test]
    fn title_with_and_without_key() {
        assert_eq!(display_title(Some("P01"), "Variables"), "P01 - Variables");
        assert_eq!(display_title(None, "Variables"), "Variables");
        assert_eq!(display_title(Some(""), "Variables"), "Variables");
    }
}
