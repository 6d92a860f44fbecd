// src/routes.rs
use log::info;
use std::convert::Infallible;
use warp::http::StatusCode;
use warp::reject::Rejection;
use warp::{Filter, Reply};

use crate::handlers::error::ApiError;
use crate::handlers::predict::predict_stock;
use crate::handlers::stock::{get_stock, get_stock_info};
use crate::handlers::stocks::get_stocks_by_exchange;
use crate::handlers::{ExchangeQuery, StockQuery, TickerQuery};
use crate::state::AppState;

// Renders every rejection as `{"error": ...}`
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message;

    if err.is_not_found() {
        code = StatusCode::NOT_FOUND;
        message = "Not Found".to_string();
    } else if let Some(api_error) = err.find::<ApiError>() {
        code = api_error.status;
        message = api_error.message.clone();
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        code = StatusCode::METHOD_NOT_ALLOWED;
        message = "Method Not Allowed".to_string();
    } else if let Some(e) = err.find::<warp::reject::InvalidQuery>() {
        code = StatusCode::BAD_REQUEST;
        message = e.to_string();
    } else {
        code = StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal Server Error".to_string();
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": message,
        })),
        code,
    ))
}

pub fn cors(allowed_origin: &str) -> warp::cors::Builder {
    warp::cors()
        .allow_origin(allowed_origin)
        .allow_header("content-type")
        .allow_methods(vec!["GET", "OPTIONS"])
}

pub fn routes(state: AppState) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let state_filter = warp::any().map(move || state.clone());

    let stock_route = warp::path!("api" / "stock")
        .and(warp::get())
        .and(warp::query::<StockQuery>())
        .and(state_filter.clone())
        .and_then(get_stock);

    let predict_route = warp::path!("api" / "stock" / "predict")
        .and(warp::get())
        .and(warp::query::<TickerQuery>())
        .and(state_filter.clone())
        .and_then(predict_stock);

    let info_route = warp::path!("api" / "stock" / "info")
        .and(warp::get())
        .and(warp::query::<StockQuery>())
        .and(state_filter.clone())
        .and_then(get_stock_info);

    let stocks_route = warp::path!("api" / "stocks")
        .and(warp::get())
        .and(warp::query::<ExchangeQuery>())
        .and(state_filter.clone())
        .and_then(get_stocks_by_exchange);

    info!("All routes configured successfully.");

    stock_route
        .or(predict_route)
        .or(info_route)
        .or(stocks_route)
        .recover(handle_rejection)
}
