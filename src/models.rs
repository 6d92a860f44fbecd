// src/models.rs
use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt::Display;

/// Date format of table rows and chart axes (`DD-MM-YYYY`).
pub const DISPLAY_DATE_FORMAT: &str = "%d-%m-%Y";
/// Date format of forecast series (`YYYY-MM-DD`).
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Placeholder written in place of a missing value.
pub const NOT_AVAILABLE: &str = "N/A";

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// A single session as reported by the provider. Any field may be missing
/// (halted sessions, the in-progress bar, holidays).
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRow {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<u64>,
}

/// A complete daily bar. Serialized with the capitalised column names the
/// frontend table reads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceBar {
    #[serde(rename = "Date", serialize_with = "display_date")]
    pub date: NaiveDate,
    #[serde(rename = "Open")]
    pub open: f64,
    #[serde(rename = "High")]
    pub high: f64,
    #[serde(rename = "Low")]
    pub low: f64,
    #[serde(rename = "Close")]
    pub close: f64,
    #[serde(rename = "Volume")]
    pub volume: u64,
}

impl PriceBar {
    /// `None` when any field is missing. Prices are rounded to 3 decimals.
    pub fn from_row(row: &QuoteRow) -> Option<Self> {
        Some(PriceBar {
            date: row.date,
            open: round_to(row.open?, 3),
            high: round_to(row.high?, 3),
            low: round_to(row.low?, 3),
            close: round_to(row.close?, 3),
            volume: row.volume?,
        })
    }

    pub fn display_date(&self) -> String {
        self.date.format(DISPLAY_DATE_FORMAT).to_string()
    }
}

/// Drops every row with a missing field, keeping provider order.
pub fn clean_rows(rows: &[QuoteRow]) -> Vec<PriceBar> {
    rows.iter().filter_map(PriceBar::from_row).collect()
}

fn display_date<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&date.format(DISPLAY_DATE_FORMAT))
}

/// Writes `"N/A"` for an absent value.
pub fn na_or<T: Serialize, S: Serializer>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => v.serialize(serializer),
        None => serializer.serialize_str(NOT_AVAILABLE),
    }
}

/// Latest-session summary for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockSnapshot {
    #[serde(serialize_with = "na_or")]
    pub name: Option<String>,
    #[serde(serialize_with = "na_or")]
    pub open: Option<f64>,
    #[serde(serialize_with = "na_or")]
    pub close: Option<f64>,
    #[serde(serialize_with = "na_or")]
    pub low: Option<f64>,
    #[serde(serialize_with = "na_or")]
    pub high: Option<f64>,
    #[serde(serialize_with = "na_or")]
    pub exchange: Option<String>,
}

/// Either the value or the bare error text. The stock routes hand upstream
/// failures of the snapshot and news lookups to the frontend in this shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Lenient<T> {
    Value(T),
    Error(String),
}

impl<T, E: Display> From<Result<T, E>> for Lenient<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Lenient::Value(value),
            Err(e) => Lenient::Error(e.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StockResponse {
    pub stock_data: Vec<PriceBar>,
    pub graph_data1: String,
    pub graph_data2: String,
    pub stock_info: Lenient<StockSnapshot>,
    pub stock_news: Lenient<Vec<Value>>,
    pub chart_period: String,
    pub table_period: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnRow {
    pub stocks_bought: u32,
    pub current_price: f64,
    pub after_1_year: f64,
    pub after_5_years: f64,
    pub after_10_years: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForecastResult {
    pub predictions: Vec<f64>,
    pub predicted_dates: Vec<String>,
    pub actual: Vec<f64>,
    pub actual_dates: Vec<String>,
    pub returns: Vec<ReturnRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeListing {
    pub symbol: String,
    pub name: String,
    #[serde(serialize_with = "na_or")]
    pub open: Option<f64>,
    #[serde(serialize_with = "na_or")]
    pub high: Option<f64>,
    #[serde(serialize_with = "na_or")]
    pub low: Option<f64>,
    #[serde(serialize_with = "na_or")]
    pub close: Option<f64>,
}

impl ExchangeListing {
    /// Prices come from the first session in `rows`, rounded to cents.
    pub fn from_rows(symbol: &str, long_name: Option<String>, rows: &[QuoteRow]) -> Self {
        let first = rows.first();
        let price = |pick: fn(&QuoteRow) -> Option<f64>| first.and_then(pick).map(|v| round_to(v, 2));
        ExchangeListing {
            symbol: symbol.to_string(),
            name: long_name.unwrap_or_else(|| symbol.to_string()),
            open: price(|r| r.open),
            high: price(|r| r.high),
            low: price(|r| r.low),
            close: price(|r| r.close),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StocksResponse {
    pub stocks: Vec<ExchangeListing>,
}
