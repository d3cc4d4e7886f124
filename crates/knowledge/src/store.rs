//! Load-once knowledge cache.
//!
//! The store wraps one [`KnowledgeSource`] and keeps the full corpus in memory
//! after the first successful read. Its only state transition is
//! unloaded → loaded, and it never goes back: a new store (in practice a
//! process restart) is the only way to pick up collaborator changes.
//!
//! Concurrent callers that arrive while a read is running all await that one
//! read and share its outcome, success or failure. A failed read leaves the
//! store unloaded, is logged, and is served as an empty corpus; the next
//! request starts a fresh attempt.

use futures::future::{BoxFuture, FutureExt, Shared};
use kbscope_core::error::KnowledgeError;
use kbscope_core::knowledge::{KnowledgeRow, KnowledgeSource};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info, warn};

type LoadResult = Result<Arc<[KnowledgeRow]>, KnowledgeError>;
type Attempt = Shared<BoxFuture<'static, LoadResult>>;

/// An injectable, load-once cache in front of a knowledge source.
pub struct KnowledgeStore {
    source: Arc<dyn KnowledgeSource>,
    cache: OnceCell<Arc<[KnowledgeRow]>>,
    in_flight: Mutex<Option<Attempt>>,
}

impl KnowledgeStore {
    pub fn new(source: Arc<dyn KnowledgeSource>) -> Self {
        Self {
            source,
            cache: OnceCell::new(),
            in_flight: Mutex::new(None),
        }
    }

    /// The full corpus in load order.
    ///
    /// Never fails: collaborator errors are logged and yield an empty slice.
    pub async fn load(&self) -> Arc<[KnowledgeRow]> {
        if let Some(rows) = self.cache.get() {
            return Arc::clone(rows);
        }

        let attempt = {
            let mut slot = self.in_flight.lock().await;
            // A previous attempt may have filled the cache while we waited
            if let Some(rows) = self.cache.get() {
                return Arc::clone(rows);
            }
            match slot.as_ref() {
                Some(attempt) => attempt.clone(),
                None => {
                    let attempt = fetch(Arc::clone(&self.source)).boxed().shared();
                    *slot = Some(attempt.clone());
                    attempt
                }
            }
        };

        let result = attempt.clone().await;

        // Fill the cache before clearing the slot so a late caller finds one of them
        if let Ok(rows) = &result {
            let _ = self.cache.set(Arc::clone(rows));
        }
        {
            let mut slot = self.in_flight.lock().await;
            if slot.as_ref().is_some_and(|current| current.ptr_eq(&attempt)) {
                *slot = None;
            }
        }

        match result {
            Ok(rows) => rows,
            Err(e) => {
                warn!(
                    source = self.source.name(),
                    error = %e,
                    "Knowledge source unavailable, serving empty corpus"
                );
                Vec::new().into()
            }
        }
    }

    /// Whether the corpus has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.cache.initialized()
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }
}

async fn fetch(source: Arc<dyn KnowledgeSource>) -> LoadResult {
    let started = Instant::now();
    debug!(source = source.name(), "Loading knowledge corpus");

    let rows = source.fetch_all().await?;
    info!(
        source = source.name(),
        count = rows.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Knowledge corpus cached"
    );
    Ok(rows.into())
}
