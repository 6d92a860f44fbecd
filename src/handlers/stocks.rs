// src/handlers/stocks.rs
use log::{info, warn};
use warp::reply::Json;
use warp::Rejection;

use super::error::{ApiError, EXCHANGE_REQUIRED, INVALID_EXCHANGE};
use super::{present, ExchangeQuery};
use crate::models::{ExchangeListing, StocksResponse};
use crate::services::exchanges::Exchange;
use crate::state::AppState;

/// `GET /api/stocks`: one batched session fetch for the exchange's list.
/// Tickers that fail are left out, so the list may be empty.
pub async fn get_stocks_by_exchange(query: ExchangeQuery, state: AppState) -> Result<Json, Rejection> {
    let name = present(query.exchange).ok_or_else(|| ApiError::bad_request(EXCHANGE_REQUIRED))?;
    let exchange: Exchange = name.parse().map_err(|e| {
        warn!("Rejected listing request: {}", e);
        ApiError::bad_request(INVALID_EXCHANGE)
    })?;

    let tickers: Vec<String> = exchange.tickers().iter().map(|t| t.to_string()).collect();
    info!("Listing {} tickers for {}", tickers.len(), exchange.name());

    let batch = state.market.daily_batch(&tickers).await;

    // provider list order, not completion order
    let stocks: Vec<ExchangeListing> = tickers
        .iter()
        .filter_map(|ticker| {
            let session = batch.get(ticker)?;
            Some(ExchangeListing::from_rows(
                ticker,
                session.profile.long_name.clone(),
                &session.rows,
            ))
        })
        .collect();

    info!("Returning {} of {} {} tickers", stocks.len(), tickers.len(), exchange.name());
    Ok(warp::reply::json(&StocksResponse { stocks }))
}
