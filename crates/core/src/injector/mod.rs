//! Schema injector: validated schemas on demand, served from a TTL cache.
//!
//! The injector owns its cache; there is no process-wide instance. Create one
//! with [`SchemaInjector::new`], share it by reference or `Arc`, and call
//! [`SchemaInjector::dispose`] when it is no longer needed.
//!
//! Concurrent requests for the same uncached table share a single fetch: the
//! first caller spawns it as a task and registers it by table name, and later
//! callers await the same task. The task settles the cache itself, so a
//! cancelled caller never leaves a stalled fetch behind.

pub mod cache;
pub mod file;
pub mod source;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

pub use cache::{CacheEntry, CacheStatus, SchemaCache};
pub use file::FileSchemaSource;
pub use source::{HttpSchemaSource, SchemaSource, ServerHealth, DEFAULT_TIMEOUT};

use crate::error::{SchemaError, SchemaResult};
use crate::schema::TableSchema;

/// Default time-to-live of a cache entry
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

type SharedFetch = Shared<BoxFuture<'static, SchemaResult<Arc<TableSchema>>>>;

struct PendingFetch {
    id: u64,
    fetch: SharedFetch,
}

#[derive(Default)]
struct InjectorState {
    cache: SchemaCache,
    pending: HashMap<String, PendingFetch>,
    next_id: u64,
    disposed: bool,
}

pub struct SchemaInjector {
    source: Arc<dyn SchemaSource>,
    ttl: Duration,
    state: Arc<Mutex<InjectorState>>,
}

impl std::fmt::Debug for SchemaInjector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaInjector")
            .field("source", &self.source.describe())
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl SchemaInjector {
    pub fn new(source: impl SchemaSource) -> Self {
        Self::from_arc(Arc::new(source))
    }

    pub fn from_arc(source: Arc<dyn SchemaSource>) -> Self {
        Self {
            source,
            ttl: DEFAULT_TTL,
            state: Arc::new(Mutex::new(InjectorState::default())),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn source(&self) -> &Arc<dyn SchemaSource> {
        &self.source
    }

    /// Returns the validated schema for `table`.
    ///
    /// A fresh cache entry is returned without touching the source. On a miss
    /// the schema is fetched (or an in-flight fetch for the same table is
    /// joined), validated and stored. A failed fetch leaves the cache as it was.
    pub async fn get_schema(&self, table: &str) -> SchemaResult<Arc<TableSchema>> {
        if table.trim().is_empty() {
            return Err(SchemaError::EmptyTableName);
        }

        let fetch = {
            let mut state = self.state.lock().await;
            if state.disposed {
                return Err(SchemaError::Disposed);
            }

            if let Some(schema) = state.cache.get_fresh(table, self.ttl) {
                debug!(table, "schema cache hit");
                return Ok(schema);
            }

            match state.pending.get(table) {
                Some(pending) => {
                    debug!(table, "joining in-flight schema fetch");
                    pending.fetch.clone()
                }
                None => {
                    debug!(table, "schema cache miss");
                    let id = state.next_id;
                    state.next_id += 1;
                    let fetch = self.spawn_fetch(table, id);
                    state.pending.insert(
                        table.to_string(),
                        PendingFetch {
                            id,
                            fetch: fetch.clone(),
                        },
                    );
                    fetch
                }
            }
        };

        fetch.await
    }

    /// Starts the fetch on its own task, so it completes and settles the cache
    /// even when every waiter has gone away.
    fn spawn_fetch(&self, table: &str, id: u64) -> SharedFetch {
        let source = Arc::clone(&self.source);
        let state = Arc::clone(&self.state);
        let owned = table.to_string();

        let task = tokio::spawn(async move {
            let result = fetch_from(source.as_ref(), &owned).await;

            let mut state = state.lock().await;
            if state.pending.get(&owned).is_some_and(|pending| pending.id == id) {
                state.pending.remove(&owned);
                if let (Ok(schema), false) = (&result, state.disposed) {
                    state.cache.insert(owned.clone(), Arc::clone(schema));
                }
            }
            result
        });

        let table = table.to_string();
        async move {
            task.await.unwrap_or_else(|err| {
                warn!(table = %table, error = %err, "schema fetch task did not finish");
                Err(SchemaError::remote(format!("schema fetch for '{table}'"), err))
            })
        }
        .boxed()
        .shared()
    }

    /// Drops one cached entry. Returns whether an entry existed.
    pub async fn invalidate(&self, table: &str) -> bool {
        self.state.lock().await.cache.remove(table)
    }

    /// Empties the cache. In-flight fetches still complete and populate it.
    pub async fn clear_cache(&self) {
        let mut state = self.state.lock().await;
        state.cache.clear();
        info!("schema cache cleared");
    }

    pub async fn cache_status(&self) -> CacheStatus {
        self.state.lock().await.cache.status()
    }

    /// Empties the cache, forgets pending fetches and refuses further requests.
    pub async fn dispose(&self) {
        let mut state = self.state.lock().await;
        state.cache.clear();
        state.pending.clear();
        state.disposed = true;
        debug!("schema injector disposed");
    }

    pub async fn is_disposed(&self) -> bool {
        self.state.lock().await.disposed
    }
}

async fn fetch_from(source: &dyn SchemaSource, table: &str) -> SchemaResult<Arc<TableSchema>> {
    let started = Instant::now();
    info!(table, source = %source.describe(), "fetching schema");

    match source.fetch_schema(table).await {
        Ok(schema) => {
            info!(
                table,
                columns = schema.columns.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "schema loaded"
            );
            Ok(Arc::new(schema))
        }
        Err(err) => {
            warn!(table, error = %err, "schema fetch failed");
            Err(err)
        }
    }
}
