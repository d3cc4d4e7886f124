//! File-based knowledge source — JSON-lines or JSON array.
//!
//! Each line (JSONL) or array element (JSON) is one raw knowledge row.
//! Row order is file order. Lines that are not valid JSON, and rows missing
//! a required field, are skipped with a warning.
//!
//! Storage location is configured via `knowledge.path`; there is no default.

use async_trait::async_trait;
use kbscope_core::error::KnowledgeError;
use kbscope_core::knowledge::{coerce_rows, KnowledgeRow, KnowledgeSource, RawKnowledgeRow};
use std::path::PathBuf;
use tracing::{debug, warn};

/// A read-only source backed by a JSONL or JSON file.
///
/// The file is read on every `fetch_all`; caching is the store's job.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Parse file content into raw rows.
    ///
    /// Content starting with `[` is treated as a JSON array, anything else as
    /// JSON lines.
    pub fn parse(content: &str) -> Result<Vec<RawKnowledgeRow>, KnowledgeError> {
        if content.trim_start().starts_with('[') {
            let values: Vec<serde_json::Value> = serde_json::from_str(content)
                .map_err(|e| KnowledgeError::Storage(format!("Invalid JSON array: {e}")))?;
            return Ok(values
                .into_iter()
                .enumerate()
                .filter_map(|(index, value)| {
                    match serde_json::from_value::<RawKnowledgeRow>(value) {
                        Ok(row) => Some(row),
                        Err(e) => {
                            warn!(index, error = %e, "Skipping unreadable knowledge element");
                            None
                        }
                    }
                })
                .collect());
        }

        Ok(content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .filter_map(|(line_no, line)| {
                match serde_json::from_str::<RawKnowledgeRow>(line) {
                    Ok(row) => Some(row),
                    Err(e) => {
                        warn!(line = line_no + 1, error = %e, "Skipping corrupted knowledge line");
                        None
                    }
                }
            })
            .collect())
    }
}

#[async_trait]
impl KnowledgeSource for FileSource {
    fn name(&self) -> &str {
        "file"
    }

    async fn fetch_all(&self) -> Result<Vec<KnowledgeRow>, KnowledgeError> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            KnowledgeError::Unavailable(format!(
                "Failed to read {}: {e}",
                self.path.display()
            ))
        })?;

        let raw = Self::parse(&content)?;
        let rows = coerce_rows("file", raw);
        debug!(path = %self.path.display(), count = rows.len(), "Knowledge file read");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn reads_jsonl_in_file_order() {
        let mut tmp = NamedTempFile::new().unwrap();
        writeln!(tmp, r#"{{"id":1,"project":"jascore_1_0","contentType":"summary","content":"Scoring engine"}}"#).unwrap();
        writeln!(tmp).unwrap();
        writeln!(tmp, r#"{{"id":2,"project":"loom","content_type":"method","content":"Weaving","tags":["textile","craft"]}}"#).unwrap();

        let source = FileSource::new(tmp.path());
        let rows = source.fetch_all().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].project, "jascore_1_0");
        assert_eq!(rows[1].tags.as_deref(), Some("textile, craft"));
    }

    #[tokio::test]
    async fn reads_json_array() {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(
            tmp,
            r#"[
                {{"project":"a","contentType":"outcome","content":"one"}},
                {{"project":"b","contentType":"outcome","content":"two"}}
            ]"#
        )
        .unwrap();

        let rows = FileSource::new(tmp.path()).fetch_all().await.unwrap();
        let projects: Vec<&str> = rows.iter().map(|r| r.project.as_str()).collect();
        assert_eq!(projects, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn handles_corrupted_lines() {
        let mut tmp = NamedTempFile::new().unwrap();
        writeln!(tmp, r#"{{"project":"a","contentType":"summary","content":"valid"}}"#).unwrap();
        writeln!(tmp, "this is not json").unwrap();
        writeln!(tmp, r#"{{"project":"b","contentType":"summary"}}"#).unwrap();
        writeln!(tmp, r#"{{"project":"c","contentType":"summary","content":"also valid"}}"#).unwrap();

        let rows = FileSource::new(tmp.path()).fetch_all().await.unwrap();
        // The unparseable line and the row missing content are both skipped
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].project, "c");
    }

    #[tokio::test]
    async fn missing_file_is_unavailable() {
        let path = PathBuf::from("/tmp/kbscope_test_nonexistent_knowledge.jsonl");
        let _ = std::fs::remove_file(&path);

        let err = FileSource::new(path).fetch_all().await.unwrap_err();
        assert!(matches!(err, KnowledgeError::Unavailable(_)));
    }

    #[test]
    fn broken_json_array_is_a_storage_error() {
        let err = FileSource::parse("[{\"project\": ").unwrap_err();
        assert!(matches!(err, KnowledgeError::Storage(_)));
    }
}
