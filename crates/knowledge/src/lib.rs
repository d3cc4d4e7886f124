//! Knowledge sources and the load-once knowledge store for kbscope.
//!
//! A source is the backing collaborator that knows how to bulk-read the
//! corpus. The [`KnowledgeStore`] wraps one source and caches its rows for
//! the lifetime of the store.

pub mod factory;
pub mod file_source;
pub mod static_source;
pub mod store;
pub mod unconfigured;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use factory::build_source;
pub use file_source::FileSource;
pub use static_source::StaticSource;
pub use store::KnowledgeStore;
pub use unconfigured::UnconfiguredSource;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteSource;
