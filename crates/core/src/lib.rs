//! # kbscope Core
//!
//! Domain types, traits, and error definitions for the kbscope
//! knowledge-grounding engine. This crate does **no I/O** and pulls in no
//! storage or runtime crates; it defines the domain model that the knowledge
//! sources and the scoping engine implement against.
//!
//! ## Design Philosophy
//!
//! The backing knowledge store is a collaborator, defined here as the
//! [`KnowledgeSource`] trait. Implementations live in `kbscope-knowledge`.
//! This enables:
//! - Swapping the backing store via configuration
//! - Easy testing with static or counting sources
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod knowledge;
pub mod message;

// Re-export key types at crate root for ergonomics
pub use error::{Error, KnowledgeError, Result};
pub use knowledge::{KnowledgeRow, KnowledgeSource, RawKnowledgeRow};
pub use message::{ConversationMessage, Role};
