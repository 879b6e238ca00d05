//! Time-bounded schema cache

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::schema::TableSchema;

/// A schema paired with the moment it was captured.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub schema: Arc<TableSchema>,
    pub captured_at: Instant,
}

impl CacheEntry {
    pub fn new(schema: Arc<TableSchema>) -> Self {
        Self {
            schema,
            captured_at: Instant::now(),
        }
    }

    pub fn age(&self) -> Duration {
        self.captured_at.elapsed()
    }

    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.age() < ttl
    }
}

/// Snapshot of the cache contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStatus {
    pub entries: usize,
    /// Cached table names, sorted
    pub tables: Vec<String>,
}

/// Entries keyed by table name. Entries are only ever replaced.
#[derive(Debug, Default)]
pub struct SchemaCache {
    entries: HashMap<String, CacheEntry>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached schema if its entry is younger than `ttl`
    pub fn get_fresh(&self, table: &str, ttl: Duration) -> Option<Arc<TableSchema>> {
        self.entries
            .get(table)
            .filter(|entry| entry.is_fresh(ttl))
            .map(|entry| Arc::clone(&entry.schema))
    }

    pub fn get(&self, table: &str) -> Option<&CacheEntry> {
        self.entries.get(table)
    }

    pub fn insert(&mut self, table: String, schema: Arc<TableSchema>) {
        self.entries.insert(table, CacheEntry::new(schema));
    }

    pub fn remove(&mut self, table: &str) -> bool {
        self.entries.remove(table).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn status(&self) -> CacheStatus {
        let mut tables: Vec<String> = self.entries.keys().cloned().collect();
        tables.sort();
        CacheStatus {
            entries: tables.len(),
            tables,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::RowLevelSecurity;

    fn schema(name: &str) -> Arc<TableSchema> {
        Arc::new(TableSchema::new(name, Vec::new(), RowLevelSecurity::default()))
    }

    #[tokio::test(start_paused = true)]
    async fn entry_expires_after_ttl() {
        let ttl = Duration::from_secs(300);
        let mut cache = SchemaCache::new();
        cache.insert("invoices".into(), schema("invoices"));

        tokio::time::advance(Duration::from_secs(299)).await;
        assert!(cache.get_fresh("invoices", ttl).is_some());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(cache.get_fresh("invoices", ttl).is_none());
        assert!(cache.get("invoices").is_some(), "stale entries stay until replaced");
    }

    #[test]
    fn status_lists_sorted_names() {
        let mut cache = SchemaCache::new();
        cache.insert("orders".into(), schema("orders"));
        cache.insert("customers".into(), schema("customers"));

        assert_eq!(
            cache.status(),
            CacheStatus {
                entries: 2,
                tables: vec!["customers".into(), "orders".into()],
            }
        );

        assert!(cache.remove("orders"));
        assert!(!cache.remove("orders"));
        cache.clear();
        assert_eq!(cache.status(), CacheStatus::default());
    }
}
