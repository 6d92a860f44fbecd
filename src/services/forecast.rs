// src/services/forecast.rs
use chrono::{Datelike, Duration, NaiveDate};
use log::info;
use thiserror::Error;

use super::market_data::{MarketData, MarketDataError};
use crate::models::{round_to, ForecastResult, ReturnRow, ISO_DATE_FORMAT};

/// History the regression is fitted on.
pub const HISTORY_PERIOD: &str = "5y";
/// Number of yearly points predicted.
pub const HORIZON: usize = 10;
pub const DAYS_PER_STEP: i64 = 365;
pub const SHARE_QUANTITIES: [u32; 4] = [10, 20, 50, 100];

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("no data found for {0}")]
    NoData(String),

    #[error(transparent)]
    Fetch(MarketDataError),
}

/// Ordinary least squares fit of `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    /// `None` for empty or mismatched input. A single distinct `x` yields a
    /// flat line through the mean.
    pub fn fit(xs: &[f64], ys: &[f64]) -> Option<Self> {
        if xs.is_empty() || xs.len() != ys.len() {
            return None;
        }

        let n = xs.len() as f64;
        let mean_x = xs.iter().sum::<f64>() / n;
        let mean_y = ys.iter().sum::<f64>() / n;

        let (sxy, sxx) = xs.iter().zip(ys).fold((0.0, 0.0), |(sxy, sxx), (x, y)| {
            let dx = x - mean_x;
            (sxy + dx * (y - mean_y), sxx + dx * dx)
        });

        let slope = if sxx == 0.0 { 0.0 } else { sxy / sxx };
        Some(LinearFit {
            slope,
            intercept: mean_y - slope * mean_x,
        })
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Proleptic Gregorian ordinal, 0001-01-01 being day 1.
pub fn date_ordinal(date: NaiveDate) -> i64 {
    date.num_days_from_ce() as i64
}

pub fn future_dates(today: NaiveDate) -> [NaiveDate; HORIZON] {
    std::array::from_fn(|i| today + Duration::days((i as i64 + 1) * DAYS_PER_STEP))
}

/// Cost of each share quantity at `current_price` and its projected value
/// after 1, 5 and 10 years.
pub fn returns_table(current_price: f64, predictions: &[f64; HORIZON]) -> Vec<ReturnRow> {
    SHARE_QUANTITIES
        .iter()
        .map(|&stocks| {
            let qty = stocks as f64;
            ReturnRow {
                stocks_bought: stocks,
                current_price: round_to(current_price * qty, 2),
                after_1_year: round_to(qty * predictions[0], 0),
                after_5_years: round_to(qty * predictions[4], 0),
                after_10_years: round_to(qty * predictions[9], 0),
            }
        })
        .collect()
}

/// Fits closes against date ordinals and projects the next ten years from
/// `today`. `None` when there are no closes.
pub fn build_forecast(closes: &[(NaiveDate, f64)], today: NaiveDate) -> Option<ForecastResult> {
    let (last_date, current_price) = *closes.last()?;
    let xs: Vec<f64> = closes.iter().map(|(d, _)| date_ordinal(*d) as f64).collect();
    let ys: Vec<f64> = closes.iter().map(|(_, c)| *c).collect();
    let fit = LinearFit::fit(&xs, &ys)?;

    let dates = future_dates(today);
    let predictions: [f64; HORIZON] = std::array::from_fn(|i| fit.predict(date_ordinal(dates[i]) as f64));

    info!(
        "Fitted {} closes through {}: slope {:.6}/day, intercept {:.4}",
        closes.len(),
        last_date,
        fit.slope,
        fit.intercept
    );

    Some(ForecastResult {
        predictions: predictions.to_vec(),
        predicted_dates: dates.iter().map(|d| d.format(ISO_DATE_FORMAT).to_string()).collect(),
        actual: ys,
        actual_dates: closes.iter().map(|(d, _)| d.format(ISO_DATE_FORMAT).to_string()).collect(),
        returns: returns_table(current_price, &predictions),
    })
}

pub async fn forecast(
    market: &dyn MarketData,
    ticker: &str,
    today: NaiveDate,
) -> Result<ForecastResult, ForecastError> {
    let rows = match market.history(ticker, HISTORY_PERIOD).await {
        Ok(rows) => rows,
        Err(MarketDataError::NotFound(_)) => return Err(ForecastError::NoData(ticker.to_string())),
        Err(e) => return Err(ForecastError::Fetch(e)),
    };

    let closes: Vec<(NaiveDate, f64)> = rows.iter().filter_map(|r| Some((r.date, r.close?))).collect();
    build_forecast(&closes, today).ok_or_else(|| ForecastError::NoData(ticker.to_string()))
}
