//! Knowledge rows and the collaborator trait that supplies them.
//!
//! A [`KnowledgeRow`] is one fact/document unit of the knowledge base. Rows
//! are created by a [`KnowledgeSource`] and never mutated afterwards.
//!
//! Collaborators rarely hand over clean records, so the boundary type
//! [`RawKnowledgeRow`] accepts the loose shapes seen in practice (camelCase
//! or snake_case keys, tags as string or list, highlight flags as strings or
//! numbers) and [`RawKnowledgeRow::into_row`] turns it into the fixed-field
//! record or rejects it.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::error::KnowledgeError;

/// A single knowledge base row.
///
/// `project`, `content_type` and `content` are always present and non-empty.
/// Every other facet is optional and rendered as a placeholder when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeRow {
    /// Insertion identifier assigned by the collaborator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Project this row belongs to
    pub project: String,

    /// Free-form category label ("summary", "method", "outcome", ...)
    pub content_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Body text injected into the rendered context
    pub content: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pillar: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools_or_methods: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_liner: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_highlight: Option<bool>,

    /// Depth label ("overview", "supporting_detail", ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<String>,
}

impl KnowledgeRow {
    /// Create a row with only the required fields set.
    pub fn new(
        project: impl Into<String>,
        content_type: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            project: project.into(),
            content_type: content_type.into(),
            title: None,
            content: content.into(),
            tags: None,
            pillar: None,
            medium: None,
            audience: None,
            role: None,
            tools_or_methods: None,
            one_liner: None,
            is_highlight: None,
            depth: None,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = Some(tags.into());
        self
    }

    pub fn with_pillar(mut self, pillar: impl Into<String>) -> Self {
        self.pillar = Some(pillar.into());
        self
    }

    pub fn with_medium(mut self, medium: impl Into<String>) -> Self {
        self.medium = Some(medium.into());
        self
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_tools_or_methods(mut self, tools: impl Into<String>) -> Self {
        self.tools_or_methods = Some(tools.into());
        self
    }

    pub fn with_one_liner(mut self, one_liner: impl Into<String>) -> Self {
        self.one_liner = Some(one_liner.into());
        self
    }

    pub fn with_highlight(mut self, highlight: bool) -> Self {
        self.is_highlight = Some(highlight);
        self
    }

    pub fn with_depth(mut self, depth: impl Into<String>) -> Self {
        self.depth = Some(depth.into());
        self
    }
}

/// A loosely typed row as handed over by a collaborator.
///
/// Every field is optional here; [`RawKnowledgeRow::into_row`] enforces the
/// required ones.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawKnowledgeRow {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<i64>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub project: Option<String>,

    #[serde(default, alias = "contentType", deserialize_with = "lenient_string")]
    pub content_type: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub content: Option<String>,

    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub pillar: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub medium: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub audience: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub role: Option<String>,

    #[serde(default, alias = "toolsOrMethods", deserialize_with = "lenient_string")]
    pub tools_or_methods: Option<String>,

    #[serde(default, alias = "oneLiner", deserialize_with = "lenient_string")]
    pub one_liner: Option<String>,

    #[serde(default, alias = "isHighlight", deserialize_with = "lenient_flag")]
    pub is_highlight: Option<bool>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub depth: Option<String>,
}

impl RawKnowledgeRow {
    /// Validate required fields and normalize facets.
    ///
    /// `index` is the position in the collaborator's result set and is only
    /// used for the error message.
    pub fn into_row(self, index: usize) -> Result<KnowledgeRow, KnowledgeError> {
        let required = |value: Option<String>, field: &str| {
            non_blank(value).ok_or_else(|| KnowledgeError::InvalidRow {
                index,
                reason: format!("missing required field '{field}'"),
            })
        };

        Ok(KnowledgeRow {
            id: self.id,
            project: required(self.project, "project")?,
            content_type: required(self.content_type, "content_type")?,
            content: required(self.content, "content")?,
            title: non_blank(self.title),
            tags: non_blank(self.tags),
            pillar: non_blank(self.pillar),
            medium: non_blank(self.medium),
            audience: non_blank(self.audience),
            role: non_blank(self.role),
            tools_or_methods: non_blank(self.tools_or_methods),
            one_liner: non_blank(self.one_liner),
            is_highlight: self.is_highlight,
            depth: non_blank(self.depth),
        })
    }
}

/// Convert a batch of raw rows, skipping (and logging) the malformed ones.
///
/// Relative order of the surviving rows is preserved.
pub fn coerce_rows(source: &str, raw: impl IntoIterator<Item = RawKnowledgeRow>) -> Vec<KnowledgeRow> {
    raw.into_iter()
        .enumerate()
        .filter_map(|(index, row)| match row.into_row(index) {
            Ok(row) => Some(row),
            Err(e) => {
                warn!(source, error = %e, "Skipping malformed knowledge row");
                None
            }
        })
        .collect()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn scalar_to_string(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(scalar_to_string(value))
}

fn lenient_tags<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Array(items) => {
            let tags: Vec<String> = items
                .into_iter()
                .filter_map(scalar_to_string)
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect();
            Some(tags.join(", "))
        }
        other => scalar_to_string(other),
    })
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Bool(b) => Some(b),
        serde_json::Value::Number(n) => n.as_i64().map(|n| n != 0),
        serde_json::Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// The knowledge collaborator.
///
/// Implementations: static (in-memory), JSONL/JSON file, SQLite, unconfigured.
/// `fetch_all` must return rows in a stable order (e.g. by insertion id).
/// Errors are reported to the caller, which logs them and treats the corpus
/// as empty; they are never fatal.
#[async_trait]
pub trait KnowledgeSource: Send + Sync {
    /// The source name (e.g., "file", "sqlite", "static").
    fn name(&self) -> &str;

    /// Bulk-read every row.
    async fn fetch_all(&self) -> std::result::Result<Vec<KnowledgeRow>, KnowledgeError>;
}
