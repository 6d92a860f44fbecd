use dotenv::dotenv;
use log::{error, info};
use std::env;

use stock_analyzer_backend::config::AppConfig;
use stock_analyzer_backend::models::clean_rows;
use stock_analyzer_backend::services::market_data::{MarketData, YahooClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::init();

    let ticker = env::args().nth(1).unwrap_or_else(|| "AAPL".to_string());
    let period = env::args().nth(2).unwrap_or_else(|| "1mo".to_string());
    let config = AppConfig::from_env()?;

    info!("Testing Yahoo Finance history for {} ({})...", ticker, period);
    let client = YahooClient::new(config.yahoo_base_url);

    match client.history(&ticker, &period).await {
        Ok(rows) => {
            let bars = clean_rows(&rows);
            info!("SUCCESS: {} rows, {} complete", rows.len(), bars.len());
            if let (Some(first), Some(last)) = (bars.first(), bars.last()) {
                info!("First: {:?}", first);
                info!("Last: {:?}", last);
            }
        }
        Err(e) => {
            error!("ERROR: Failed to fetch history: {}", e);
            return Err(e.into());
        }
    }

    match client.snapshot(&ticker).await {
        Ok(snapshot) => info!("Snapshot: {}", serde_json::to_string(&snapshot)?),
        Err(e) => error!("ERROR: Failed to fetch snapshot: {}", e),
    }

    Ok(())
}
