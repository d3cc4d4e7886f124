//! Placeholder source used when no knowledge backend is configured.

use async_trait::async_trait;
use kbscope_core::error::KnowledgeError;
use kbscope_core::knowledge::{KnowledgeRow, KnowledgeSource};

/// A source that always reports it is not configured.
///
/// The store logs the failure and serves an empty corpus, so requests still
/// succeed with the "no matching entries" context.
pub struct UnconfiguredSource {
    reason: String,
}

impl UnconfiguredSource {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl KnowledgeSource for UnconfiguredSource {
    fn name(&self) -> &str {
        "none"
    }

    async fn fetch_all(&self) -> Result<Vec<KnowledgeRow>, KnowledgeError> {
        Err(KnowledgeError::NotConfigured(self.reason.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn always_not_configured() {
        let source = UnconfiguredSource::new("knowledge.source = none");
        let err = source.fetch_all().await.unwrap_err();
        assert!(matches!(err, KnowledgeError::NotConfigured(_)));
        assert!(err.to_string().contains("knowledge.source = none"));
    }
}
