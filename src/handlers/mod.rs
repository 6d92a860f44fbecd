// src/handlers/mod.rs
pub mod error;
pub mod predict;
pub mod stock;
pub mod stocks;

use serde::Deserialize;

/// Period applied when a chart or table period is not given.
pub const DEFAULT_PERIOD: &str = "1mo";

#[derive(Debug, Default, Deserialize)]
pub struct StockQuery {
    pub ticker: Option<String>,
    pub chart_period: Option<String>,
    pub table_period: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TickerQuery {
    pub ticker: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExchangeQuery {
    pub exchange: Option<String>,
}

/// An empty query value counts as missing.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
