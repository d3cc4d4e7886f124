//! Build the configured knowledge source.

use crate::{FileSource, UnconfiguredSource};
use kbscope_config::KnowledgeConfig;
use kbscope_core::knowledge::KnowledgeSource;
use std::sync::Arc;
use tracing::warn;

/// Create the source named by `knowledge.source`.
///
/// Misconfiguration is not an error here: it produces an
/// [`UnconfiguredSource`] carrying the reason, which the store later logs
/// and serves as an empty corpus.
pub async fn build_source(config: &KnowledgeConfig) -> Arc<dyn KnowledgeSource> {
    match config.source.as_str() {
        "file" => match config.resolved_path() {
            Some(path) => Arc::new(FileSource::new(path)),
            None => unconfigured("knowledge.path is not set for the file source"),
        },
        "sqlite" => open_sqlite(config).await,
        "none" => unconfigured("knowledge.source = \"none\""),
        other => unconfigured(&format!("unknown knowledge source '{other}'")),
    }
}

#[cfg(feature = "sqlite")]
async fn open_sqlite(config: &KnowledgeConfig) -> Arc<dyn KnowledgeSource> {
    let Some(path) = config.resolved_path() else {
        return unconfigured("knowledge.path is not set for the sqlite source");
    };

    // Reading never creates the database; `kbscope import` does that
    match crate::SqliteSource::open(&path.to_string_lossy()).await {
        Ok(source) => Arc::new(source),
        Err(e) => unconfigured(&e.to_string()),
    }
}

#[cfg(not(feature = "sqlite"))]
async fn open_sqlite(_config: &KnowledgeConfig) -> Arc<dyn KnowledgeSource> {
    unconfigured("sqlite support was not compiled in")
}

fn unconfigured(reason: &str) -> Arc<dyn KnowledgeSource> {
    warn!(reason, "Knowledge source not available");
    Arc::new(UnconfiguredSource::new(reason))
}
