//! Request pipeline: history → corpus → filter → rank → truncate → render.
//!
//! # Determinism
//!
//! Given the same corpus (same rows, same load order) and the same query,
//! [`ScopingEngine::scope`] always produces byte-identical text. No random
//! or time-dependent logic is involved.

use crate::history;
use crate::scope::token;
use crate::scope::{filter, serialize, PriorityRanker};
use kbscope_config::ScopingConfig;
use kbscope_core::knowledge::KnowledgeRow;
use kbscope_core::message::ConversationMessage;
use kbscope_knowledge::KnowledgeStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

// ── Types ─────────────────────────────────────────────────────────────────

/// The raw inbound payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScopeRequest {
    /// The user's current question.
    pub query: String,
    /// Prior turns, in whatever shape the caller sent them.
    #[serde(default)]
    pub history: serde_json::Value,
}

impl ScopeRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            history: serde_json::Value::Null,
        }
    }

    pub fn with_history(mut self, history: serde_json::Value) -> Self {
        self.history = history;
        self
    }
}

/// The rendered knowledge block for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedContext {
    rows: Vec<KnowledgeRow>,
    text: String,
    fallback: bool,
    total_candidates: usize,
}

impl ScopedContext {
    /// Rows that were rendered, in rendered order.
    pub fn rows(&self) -> &[KnowledgeRow] {
        &self.rows
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// True when the query matched nothing and the whole corpus was ranked.
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    /// Rows that survived filtering, before truncation.
    pub fn total_candidates(&self) -> usize {
        self.total_candidates
    }

    pub fn estimated_tokens(&self) -> usize {
        token::estimate_tokens(&self.text)
    }
}

/// Everything the generation step needs from this engine.
#[derive(Debug, Clone)]
pub struct GroundingOutput {
    pub context: ScopedContext,
    /// Normalized history, oldest first, at most `history_limit` long.
    pub history: Vec<ConversationMessage>,
}

/// Instruction text plus the ordered conversation, ready for a chat API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroundedPrompt {
    /// Instructions followed by the rendered knowledge block.
    pub system_message: String,
    /// Bounded history, then the current user turn.
    pub messages: Vec<ConversationMessage>,
}

impl GroundingOutput {
    /// Arrange the output the way the generation step consumes it.
    pub fn to_prompt(&self, instructions: &str, query: &str) -> GroundedPrompt {
        let system_message = if instructions.trim().is_empty() {
            self.context.text.clone()
        } else {
            format!("{}\n\n{}", instructions.trim_end(), self.context.text)
        };

        let mut messages = self.history.clone();
        messages.push(ConversationMessage::user(query.trim()));

        GroundedPrompt {
            system_message,
            messages,
        }
    }
}

// ── Engine ────────────────────────────────────────────────────────────────

/// The scoping engine. Cheap to share: wrap it in an `Arc` and call it from
/// any number of tasks.
pub struct ScopingEngine {
    store: Arc<KnowledgeStore>,
    ranker: PriorityRanker,
    max_rows: usize,
    history_limit: usize,
}

impl ScopingEngine {
    pub fn new(store: Arc<KnowledgeStore>, config: &ScopingConfig) -> Self {
        Self {
            store,
            ranker: PriorityRanker::new(&config.preferred_types),
            max_rows: config.max_rows,
            history_limit: config.history_limit,
        }
    }

    pub fn store(&self) -> &KnowledgeStore {
        &self.store
    }

    /// Run the full pipeline for one request.
    pub async fn prepare(&self, request: &ScopeRequest) -> GroundingOutput {
        let history = history::normalize_bounded(&request.history, self.history_limit);
        let corpus = self.store.load().await;
        let context = self.scope(&request.query, &corpus);

        debug!(
            corpus = corpus.len(),
            candidates = context.total_candidates,
            rendered = context.rows.len(),
            fallback = context.fallback,
            history = history.len(),
            context_tokens = context.estimated_tokens(),
            history_tokens = token::estimate_messages_tokens(&history),
            "Scoped knowledge for request"
        );

        GroundingOutput { context, history }
    }

    /// Filter, rank, truncate and render `corpus` for `query`. Pure.
    pub fn scope(&self, query: &str, corpus: &[KnowledgeRow]) -> ScopedContext {
        let outcome = filter(query, corpus);
        let total_candidates = outcome.rows.len();

        let mut ranked = self.ranker.rank(&outcome.rows);
        ranked.truncate(self.max_rows);

        ScopedContext {
            text: serialize(&ranked),
            rows: ranked.into_iter().cloned().collect(),
            fallback: outcome.fallback,
            total_candidates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::NO_MATCHES;
    use kbscope_core::message::Role;
    use kbscope_knowledge::{StaticSource, UnconfiguredSource};
    use serde_json::json;

    fn corpus() -> Vec<KnowledgeRow> {
        vec![
            KnowledgeRow::new("tidepool", "anecdote", "Sensor story").with_id(1),
            KnowledgeRow::new("jascore_1_0", "summary", "Scoring engine")
                .with_id(2)
                .with_title("JasCore")
                .with_depth("overview"),
            KnowledgeRow::new("jascore_1_0", "method", "Uses Rust")
                .with_id(3)
                .with_title("JasCore")
                .with_depth("supporting_detail"),
            KnowledgeRow::new("loom", "outcome", "Shown at a festival")
                .with_id(4)
                .with_depth("overview"),
            KnowledgeRow::new("loom", "method", "Weaving pipeline").with_id(5),
        ]
    }

    fn engine_with(rows: Vec<KnowledgeRow>, max_rows: usize) -> ScopingEngine {
        let store = Arc::new(KnowledgeStore::new(Arc::new(StaticSource::new(rows))));
        let config = ScopingConfig {
            max_rows,
            ..ScopingConfig::default()
        };
        ScopingEngine::new(store, &config)
    }

    fn ids(context: &ScopedContext) -> Vec<Option<i64>> {
        context.rows().iter().map(|r| r.id).collect()
    }

    #[tokio::test]
    async fn matching_query_narrows_and_ranks() {
        let engine = engine_with(corpus(), 8);
        let out = engine.prepare(&ScopeRequest::new("JasCore overview")).await;

        assert!(!out.context.is_fallback());
        assert_eq!(ids(&out.context), vec![Some(2), Some(3)]);
        assert!(out.context.text().starts_with("PROJECT: jascore_1_0\nTYPE: summary"));
    }

    #[tokio::test]
    async fn unmatched_query_ranks_full_corpus_then_truncates() {
        let engine = engine_with(corpus(), 3);
        let out = engine.prepare(&ScopeRequest::new("hello")).await;

        assert!(out.context.is_fallback());
        assert_eq!(out.context.total_candidates(), 5);
        // scores: 1→0, 2→4, 3→3, 4→4, 5→2
        assert_eq!(ids(&out.context), vec![Some(2), Some(4), Some(3)]);
        assert_ne!(out.context.text(), NO_MATCHES);
    }

    #[tokio::test]
    async fn unavailable_source_renders_sentinel() {
        let store = Arc::new(KnowledgeStore::new(Arc::new(UnconfiguredSource::new("test"))));
        let engine = ScopingEngine::new(store, &ScopingConfig::default());

        let out = engine.prepare(&ScopeRequest::new("JasCore")).await;
        assert_eq!(out.context.text(), NO_MATCHES);
        assert!(out.context.rows().is_empty());
    }

    #[tokio::test]
    async fn history_is_normalized_and_bounded() {
        let engine = engine_with(corpus(), 8);
        let history: Vec<serde_json::Value> = (1..=9)
            .map(|i| {
                let role = if i % 2 == 0 { "assistant" } else { "user" };
                json!({"role": role, "content": format!("turn {i}")})
            })
            .collect();
        let request = ScopeRequest::new("hello").with_history(json!(history));

        let out = engine.prepare(&request).await;
        assert_eq!(out.history.len(), 6);
        assert_eq!(out.history[0].content, "turn 4");
        assert_eq!(out.history[5].content, "turn 9");
    }

    #[test]
    fn scope_is_deterministic() {
        let engine = engine_with(vec![], 4);
        let rows = corpus();
        for query in ["hello", "loom", "JasCore overview", ""] {
            assert_eq!(engine.scope(query, &rows), engine.scope(query, &rows));
        }
    }

    #[test]
    fn request_deserializes_without_history() {
        let request: ScopeRequest = serde_json::from_value(json!({"query": "hi"})).unwrap();
        assert!(request.history.is_null());

        let request: ScopeRequest =
            serde_json::from_value(json!({"query": "hi", "history": "garbage"})).unwrap();
        assert!(history::normalize(&request.history).is_empty());
    }

    #[tokio::test]
    async fn prompt_orders_instructions_history_and_query() {
        let engine = engine_with(corpus(), 2);
        let request = ScopeRequest::new("  What is loom?  ").with_history(json!([
            {"role": "user", "content": "hi"},
            {"role": "assistant", "content": "hello!"}
        ]));
        let out = engine.prepare(&request).await;

        let prompt = out.to_prompt("Answer using the knowledge below.", &request.query);
        assert!(prompt.system_message.starts_with("Answer using the knowledge below.\n\n"));
        assert!(prompt.system_message.ends_with(out.context.text()));
        assert_eq!(prompt.messages.len(), 3);
        assert_eq!(prompt.messages[1].role, Role::Assistant);
        assert_eq!(prompt.messages[2], ConversationMessage::user("What is loom?"));
    }
}
