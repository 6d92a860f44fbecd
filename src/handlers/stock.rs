// src/handlers/stock.rs
use log::{error, info, warn};
use warp::reply::Json;
use warp::Rejection;

use super::error::{ApiError, FETCH_FAILED, TICKER_REQUIRED};
use super::{present, StockQuery, DEFAULT_PERIOD};
use crate::models::{clean_rows, Lenient, PriceBar, StockResponse};
use crate::services::cache::{cache_key, Purpose};
use crate::services::charts;
use crate::services::market_data::{MarketData, MarketDataError, Session};
use crate::services::news::company_news;
use crate::state::AppState;

struct Periods {
    ticker: String,
    chart: String,
    table: String,
}

fn periods(query: StockQuery) -> Result<Periods, ApiError> {
    let ticker = present(query.ticker).ok_or_else(|| ApiError::bad_request(TICKER_REQUIRED))?;
    Ok(Periods {
        ticker,
        chart: query.chart_period.unwrap_or_else(|| DEFAULT_PERIOD.to_string()),
        table: query.table_period.unwrap_or_else(|| DEFAULT_PERIOD.to_string()),
    })
}

/// `GET /api/stock`: uncached, bars kept in provider (ascending) order.
pub async fn get_stock(query: StockQuery, state: AppState) -> Result<Json, Rejection> {
    let req = periods(query)?;
    info!(
        "Handling request for stock data: {} (chart {}, table {})",
        req.ticker, req.chart, req.table
    );

    let chart_rows = state.market.history(&req.ticker, &req.chart).await;
    let table_rows = state.market.history(&req.ticker, &req.table).await;

    let (chart, table) = match (chart_rows, table_rows) {
        (Ok(chart), Ok(table)) => (clean_rows(&chart), clean_rows(&table)),
        (Err(e), _) | (_, Err(e)) => {
            error!("Failed to fetch stock data for {}: {}", req.ticker, e);
            return Err(ApiError::internal(FETCH_FAILED).into());
        }
    };

    let response = assemble(&state, req, &chart, table).await?;
    Ok(warp::reply::json(&response))
}

/// `GET /api/stock/info`: like [`get_stock`], but both series go through the
/// response cache and are stored newest first.
pub async fn get_stock_info(query: StockQuery, state: AppState) -> Result<Json, Rejection> {
    let req = periods(query)?;
    info!(
        "Handling request for cached stock info: {} (chart {}, table {})",
        req.ticker, req.chart, req.table
    );

    let market = state.market.as_ref();

    let chart_key = cache_key(&req.ticker, &req.chart, Purpose::Chart);
    let chart = state
        .cache
        .get_or_fetch(&chart_key, || newest_first(market, &req.ticker, &req.chart))
        .await
        .map_err(|e| {
            error!("Failed to fetch chart data for {}: {}", chart_key, e);
            ApiError::internal(FETCH_FAILED)
        })?;

    let table_key = cache_key(&req.ticker, &req.table, Purpose::Table);
    let table = state
        .cache
        .get_or_fetch(&table_key, || newest_first(market, &req.ticker, &req.table))
        .await
        .map_err(|e| {
            error!("Failed to fetch table data for {}: {}", table_key, e);
            ApiError::internal(FETCH_FAILED)
        })?;

    let response = assemble(&state, req, &chart, table).await?;
    Ok(warp::reply::json(&response))
}

async fn newest_first(
    market: &dyn MarketData,
    ticker: &str,
    period: &str,
) -> Result<Vec<PriceBar>, MarketDataError> {
    let rows = market.history(ticker, period).await?;
    let mut bars = clean_rows(&rows);
    bars.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(bars)
}

async fn assemble(
    state: &AppState,
    req: Periods,
    chart: &[PriceBar],
    table: Vec<PriceBar>,
) -> Result<StockResponse, ApiError> {
    let graph_data1 = charts::to_json(&charts::line_chart(&req.ticker, chart))
        .map_err(|e| ApiError::internal(e.to_string()))?;
    let graph_data2 = charts::to_json(&charts::area_chart(&req.ticker, chart))
        .map_err(|e| ApiError::internal(e.to_string()))?;

    // one session lookup feeds both the snapshot and the news query
    let session = state.market.session(&req.ticker).await;
    if let Err(e) = &session {
        warn!("Snapshot for {} failed: {}", req.ticker, e);
    }
    let stock_info = session.as_ref().map(Session::snapshot).map_err(|e| e.to_string());

    let stock_news = match &session {
        Ok(session) => company_news(state.news.as_ref(), &req.ticker, &session.profile)
            .await
            .map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };
    if let Err(e) = &stock_news {
        warn!("News lookup for {} failed: {}", req.ticker, e);
    }

    Ok(StockResponse {
        stock_data: table,
        graph_data1,
        graph_data2,
        stock_info: Lenient::from(stock_info),
        stock_news: Lenient::from(stock_news),
        chart_period: req.chart,
        table_period: req.table,
    })
}
