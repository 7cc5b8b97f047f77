//! Single-use in-memory store for merged CSV results

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use uuid::Uuid;

struct StoredResult {
    csv: String,
    created: Instant,
}

/// Process-wide map from result handle to CSV payload.
///
/// Cloning shares the underlying map. Entries are removed on first retrieval;
/// lookup and removal happen under one lock so a handle is served at most once.
#[derive(Clone, Default)]
pub struct ResultStore {
    inner: Arc<Mutex<HashMap<String, StoredResult>>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a payload and return its freshly generated handle
    pub async fn insert(&self, csv: String) -> String {
        let id = Uuid::new_v4().to_string();
        self.inner.lock().await.insert(
            id.clone(),
            StoredResult {
                csv,
                created: Instant::now(),
            },
        );
        id
    }

    /// Remove and return the payload for `id`
    pub async fn take(&self, id: &str) -> Option<String> {
        self.inner.lock().await.remove(id).map(|entry| entry.csv)
    }

    /// Number of unclaimed results
    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop entries older than `ttl`, returning how many were removed
    pub async fn sweep(&self, ttl: Duration) -> usize {
        let mut map = self.inner.lock().await;
        let before = map.len();
        map.retain(|_, entry| entry.created.elapsed() < ttl);
        before - map.len()
    }

    /// Spawn a background task sweeping every `ttl / 2` (at least once a second)
    pub fn spawn_sweeper(&self, ttl: Duration) -> JoinHandle<()> {
        let store = self.clone();
        let period = (ttl / 2).max(Duration::from_secs(1));
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                let removed = store.sweep(ttl).await;
                if removed > 0 {
                    tracing::info!(removed, "Swept expired results");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn results_are_single_use() {
        let store = ResultStore::new();
        let id = store.insert("a,b\n".to_string()).await;
        assert_eq!(store.len().await, 1);
        assert_eq!(store.take(&id).await.as_deref(), Some("a,b\n"));
        assert_eq!(store.take(&id).await, None);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn handles_are_unique() {
        let store = ResultStore::new();
        let a = store.insert("x".to_string()).await;
        let b = store.insert("x".to_string()).await;
        assert_ne!(a, b);
        assert!(Uuid::parse_str(&a).is_ok());
    }

    #[tokio::test]
    async fn concurrent_takes_serve_once() {
        let store = ResultStore::new();
        let id = store.insert("payload".to_string()).await;

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                let id = id.clone();
                tokio::spawn(async move { store.take(&id).await })
            })
            .collect();

        let mut served = 0;
        for task in tasks {
            if task.await.unwrap().is_some() {
                served += 1;
            }
        }
        assert_eq!(served, 1);
    }

    #[tokio::test]
    async fn sweep_removes_only_stale_entries() {
        let store = ResultStore::new();
        store.insert("old".to_string()).await;
        tokio::time::sleep(Duration::from_millis(150)).await;
        let fresh = store.insert("new".to_string()).await;

        assert_eq!(store.sweep(Duration::from_millis(75)).await, 1);
        assert_eq!(store.take(&fresh).await.as_deref(), Some("new"));
        assert_eq!(store.sweep(Duration::from_secs(60)).await, 0);
    }
}
