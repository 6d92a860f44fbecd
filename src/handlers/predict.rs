// src/handlers/predict.rs
use chrono::Local;
use log::{error, info};
use warp::reply::Json;
use warp::Rejection;

use super::error::{ApiError, NO_DATA, TICKER_SYMBOL_REQUIRED};
use super::{present, TickerQuery};
use crate::services::forecast::{self, ForecastError};
use crate::state::AppState;

pub async fn predict_stock(query: TickerQuery, state: AppState) -> Result<Json, Rejection> {
    let ticker = present(query.ticker).ok_or_else(|| ApiError::bad_request(TICKER_SYMBOL_REQUIRED))?;
    info!("Handling prediction request for {}", ticker);

    let today = Local::now().date_naive();
    match forecast::forecast(state.market.as_ref(), &ticker, today).await {
        Ok(result) => Ok(warp::reply::json(&result)),
        Err(ForecastError::NoData(_)) => Err(ApiError::not_found(NO_DATA).into()),
        Err(e) => {
            error!("Error during prediction for {}: {:?}", ticker, e);
            Err(ApiError::internal(format!("Internal Server Error: {}", e)).into())
        }
    }
}
