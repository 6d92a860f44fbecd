use anyhow::Context;
use dotenv::dotenv;
use log::info;
use std::net::SocketAddr;
use std::sync::Arc;
use warp::Filter;

use stock_analyzer_backend::config::AppConfig;
use stock_analyzer_backend::routes;
use stock_analyzer_backend::services::cache::ResponseCache;
use stock_analyzer_backend::services::market_data::YahooClient;
use stock_analyzer_backend::services::news::NewsApiClient;
use stock_analyzer_backend::services::pretrained;
use stock_analyzer_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Initialize the logger
    env_logger::init();
    info!("Logger initialized. Starting the application...");

    let config = AppConfig::from_env().context("invalid configuration")?;

    // A missing or unreadable model does not stop the server
    let model = pretrained::load_or_log(&config.model_path);

    let state = AppState {
        market: Arc::new(YahooClient::new(config.yahoo_base_url.clone())),
        news: Arc::new(NewsApiClient::new(
            config.news_api_base_url.clone(),
            config.news_api_key.clone(),
        )),
        cache: ResponseCache::new(),
        model,
    };

    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    info!("Will bind to: {}", addr);

    let cors = routes::cors(&config.allowed_origin);
    info!("CORS restricted to {}", config.allowed_origin);

    let api = routes::routes(state)
        .with(cors)
        .with(warp::log("stock_analyzer_backend"));
    info!("Routes configured successfully with CORS.");

    info!("Starting server on {}", addr);
    warp::serve(api).run(addr).await;
    Ok(())
}
