//! The knowledge scoping engine — the heart of kbscope.
//!
//! Every request goes through the same pipeline:
//!
//! 1. **Normalize** the raw conversation history and keep the most recent turns
//! 2. **Load** the full corpus from the [`KnowledgeStore`] (cached after the first call)
//! 3. **Filter** rows whose facets appear in the query (full corpus if none do)
//! 4. **Rank** by content-type and depth preference, stable on ties
//! 5. **Truncate** to the configured row budget
//! 6. **Render** the rows into a fixed-field text block
//!
//! The rendered block and the bounded history are handed to the generation
//! step, which lives outside this crate.
//!
//! [`KnowledgeStore`]: kbscope_knowledge::KnowledgeStore

pub mod history;
pub mod pipeline;
pub mod scope;

pub use history::{normalize, normalize_bounded, truncate};
pub use pipeline::{GroundedPrompt, GroundingOutput, ScopeRequest, ScopedContext, ScopingEngine};
pub use scope::{filter, serialize, FilterOutcome, PriorityRanker, NO_MATCHES};
