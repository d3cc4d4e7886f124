//! Static in-memory source — useful for testing and embedding a fixed corpus.

use async_trait::async_trait;
use kbscope_core::error::KnowledgeError;
use kbscope_core::knowledge::{coerce_rows, KnowledgeRow, KnowledgeSource, RawKnowledgeRow};
use std::sync::Arc;

/// A source that serves a fixed set of rows held in memory.
#[derive(Clone, Default)]
pub struct StaticSource {
    rows: Arc<Vec<KnowledgeRow>>,
}

impl StaticSource {
    pub fn new(rows: Vec<KnowledgeRow>) -> Self {
        Self {
            rows: Arc::new(rows),
        }
    }

    /// Build from loosely typed rows, dropping the ones that fail validation.
    pub fn from_raw(raw: Vec<RawKnowledgeRow>) -> Self {
        Self::new(coerce_rows("static", raw))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[async_trait]
impl KnowledgeSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch_all(&self) -> Result<Vec<KnowledgeRow>, KnowledgeError> {
        Ok(self.rows.as_ref().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serves_rows_in_insertion_order() {
        let source = StaticSource::new(vec![
            KnowledgeRow::new("alpha", "summary", "first"),
            KnowledgeRow::new("beta", "method", "second"),
        ]);

        let rows = source.fetch_all().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].project, "alpha");
        assert_eq!(rows[1].project, "beta");
    }

    #[tokio::test]
    async fn from_raw_drops_invalid_rows() {
        let raw: Vec<RawKnowledgeRow> = serde_json::from_value(serde_json::json!([
            {"project": "alpha", "contentType": "summary", "content": "ok"},
            {"project": "beta", "contentType": "summary"}
        ]))
        .unwrap();

        let source = StaticSource::from_raw(raw);
        assert_eq!(source.len(), 1);
        assert_eq!(source.fetch_all().await.unwrap()[0].project, "alpha");
    }
}
