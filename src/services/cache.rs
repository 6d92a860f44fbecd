// src/services/cache.rs
use dashmap::DashMap;
use log::debug;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::models::PriceBar;

/// Which rendering of a (ticker, period) fetch an entry holds. The two are
/// stored independently even when the periods match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    Chart,
    Table,
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Purpose::Chart => write!(f, "chart"),
            Purpose::Table => write!(f, "table"),
        }
    }
}

pub fn cache_key(ticker: &str, period: &str, purpose: Purpose) -> String {
    format!("{}_{}_{}", ticker, period, purpose)
}

/// Process-wide store of cleaned bar series. Unbounded, never expires.
///
/// Concurrent misses on one key are not coordinated: each caller fetches and
/// the last insert wins.
#[derive(Clone, Default)]
pub struct ResponseCache {
    entries: Arc<DashMap<String, Vec<PriceBar>>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Vec<PriceBar>> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Returns the cached series for `key`, or runs `fetch` and stores what it
    /// produced. Failed fetches are not cached.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: &str, fetch: F) -> Result<Vec<PriceBar>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<PriceBar>, E>>,
    {
        if let Some(bars) = self.get(key) {
            debug!("Cache hit for {}", key);
            return Ok(bars);
        }

        debug!("Cache miss for {}", key);
        let bars = fetch().await?;
        self.entries.insert(key.to_string(), bars.clone());
        Ok(bars)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::clean_rows;
    use crate::test_support::rows_from;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn bars() -> Vec<PriceBar> {
        clean_rows(&rows_from(&[(2024, 6, 3, 194.03), (2024, 6, 4, 194.35)]))
    }

    #[test]
    fn test_cache_key_format() {
        assert_eq!(cache_key("AAPL", "1mo", Purpose::Chart), "AAPL_1mo_chart");
        assert_eq!(cache_key("BTC-USD", "5y", Purpose::Table), "BTC-USD_5y_table");
    }

    #[tokio::test]
    async fn test_get_or_fetch_fetches_once() {
        let cache = ResponseCache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let got = cache
                .get_or_fetch("AAPL_1mo_chart", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, String>(bars())
                })
                .await
                .unwrap();
            assert_eq!(got, bars());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_cached() {
        let cache = ResponseCache::new();

        let err = cache
            .get_or_fetch("AAPL_1mo_table", || async { Err::<Vec<PriceBar>, _>("timed out") })
            .await
            .unwrap_err();
        assert_eq!(err, "timed out");
        assert!(cache.is_empty());

        let got = cache
            .get_or_fetch("AAPL_1mo_table", || async { Ok::<_, &str>(bars()) })
            .await
            .unwrap();
        assert_eq!(got.len(), 2);
    }

    #[tokio::test]
    async fn test_purposes_are_stored_independently() {
        let cache = ResponseCache::new();
        let chart = cache_key("AAPL", "1mo", Purpose::Chart);
        let table = cache_key("AAPL", "1mo", Purpose::Table);

        cache.get_or_fetch(&chart, || async { Ok::<_, ()>(bars()) }).await.unwrap();
        assert!(cache.get(&chart).is_some());
        assert!(cache.get(&table).is_none());
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let cache = ResponseCache::new();
        let handle = cache.clone();
        cache.get_or_fetch("k", || async { Ok::<_, ()>(bars()) }).await.unwrap();
        assert_eq!(handle.len(), 1);
    }
}
