// src/test_support.rs
//! In-process stand-ins for the upstream providers.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::models::QuoteRow;
use crate::services::cache::ResponseCache;
use crate::services::market_data::{MarketData, MarketDataError, SymbolProfile};
use crate::services::news::{NewsError, NewsSource};
use crate::state::AppState;

pub fn rows_from(points: &[(i32, u32, u32, f64)]) -> Vec<QuoteRow> {
    points
        .iter()
        .map(|&(y, m, d, close)| QuoteRow {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            open: Some(close),
            high: Some(close),
            low: Some(close),
            close: Some(close),
            volume: Some(1_000),
        })
        .collect()
}

/// `count` consecutive daily rows starting at `start`, close rising by 1.0 a day.
pub fn daily_rows(start: NaiveDate, count: usize, first_close: f64) -> Vec<QuoteRow> {
    (0..count)
        .map(|i| {
            let close = first_close + i as f64;
            QuoteRow {
                date: start + Duration::days(i as i64),
                open: Some(close - 0.5),
                high: Some(close + 1.0),
                low: Some(close - 1.0),
                close: Some(close),
                volume: Some(10_000 + i as u64),
            }
        })
        .collect()
}

#[derive(Default)]
pub struct FakeMarket {
    histories: HashMap<String, Vec<QuoteRow>>,
    profiles: HashMap<String, SymbolProfile>,
    failing: HashSet<String>,
    history_calls: AtomicUsize,
    profile_calls: AtomicUsize,
}

impl FakeMarket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Same rows are served for every period.
    pub fn with_history(mut self, ticker: &str, rows: Vec<QuoteRow>) -> Self {
        self.histories.insert(ticker.to_string(), rows);
        self
    }

    pub fn with_profile(mut self, ticker: &str, long_name: &str, exchange: &str) -> Self {
        self.profiles.insert(
            ticker.to_string(),
            SymbolProfile {
                long_name: Some(long_name.to_string()),
                exchange: Some(exchange.to_string()),
            },
        );
        self
    }

    pub fn failing(mut self, ticker: &str) -> Self {
        self.failing.insert(ticker.to_string());
        self
    }

    pub fn history_calls(&self) -> usize {
        self.history_calls.load(Ordering::SeqCst)
    }

    pub fn profile_calls(&self) -> usize {
        self.profile_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketData for FakeMarket {
    async fn history(&self, ticker: &str, _period: &str) -> Result<Vec<QuoteRow>, MarketDataError> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(ticker) {
            return Err(MarketDataError::Network(format!("connection refused for {}", ticker)));
        }
        self.histories
            .get(ticker)
            .cloned()
            .ok_or_else(|| MarketDataError::NotFound(ticker.to_string()))
    }

    async fn profile(&self, ticker: &str) -> Result<SymbolProfile, MarketDataError> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(ticker) {
            return Err(MarketDataError::Network(format!("connection refused for {}", ticker)));
        }
        if let Some(profile) = self.profiles.get(ticker) {
            return Ok(profile.clone());
        }
        if self.histories.contains_key(ticker) {
            return Ok(SymbolProfile::default());
        }
        Err(MarketDataError::NotFound(ticker.to_string()))
    }
}

#[derive(Default)]
pub struct FakeNews {
    articles: Vec<Value>,
    transport_error: Option<String>,
    queries: Mutex<Vec<String>>,
}

impl FakeNews {
    pub fn new(articles: Vec<Value>) -> Self {
        Self {
            articles,
            ..Self::default()
        }
    }

    pub fn unreachable(message: &str) -> Self {
        Self {
            transport_error: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl NewsSource for FakeNews {
    async fn search(&self, query: &str) -> Result<Vec<Value>, NewsError> {
        self.queries.lock().unwrap().push(query.to_string());
        match &self.transport_error {
            Some(message) => Err(NewsError::Transport(message.clone())),
            None => Ok(self.articles.clone()),
        }
    }
}

pub fn state_with(market: Arc<FakeMarket>, news: Arc<FakeNews>) -> AppState {
    AppState {
        market,
        news,
        cache: ResponseCache::new(),
        model: None,
    }
}
