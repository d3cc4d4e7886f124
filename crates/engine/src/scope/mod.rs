//! Row selection and rendering.
//!
//! | Step | Module | Behaviour on edge cases |
//! |------|--------|-------------------------|
//! | Filter | [`filter`] | No matches → full corpus |
//! | Rank | [`ranker`] | Equal scores keep load order |
//! | Render | [`serializer`] | Empty input → fixed sentinel |
//!
//! All three are pure functions of their input; none touches shared state.

pub mod filter;
pub mod ranker;
pub mod serializer;
pub mod token;

pub use filter::{filter, FilterOutcome};
pub use ranker::PriorityRanker;
pub use serializer::{serialize, NO_MATCHES, SEPARATOR};
