use dotenv::dotenv;
use log::{error, info};
use std::env;

use stock_analyzer_backend::config::AppConfig;
use stock_analyzer_backend::services::market_data::YahooClient;
use stock_analyzer_backend::services::news::{fetch_stock_news, NewsApiClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::init();

    let ticker = env::args().nth(1).unwrap_or_else(|| "AAPL".to_string());
    let config = AppConfig::from_env()?;

    let market = YahooClient::new(config.yahoo_base_url);
    let news = NewsApiClient::new(config.news_api_base_url, config.news_api_key);

    info!("Testing news lookup for {}...", ticker);
    match fetch_stock_news(&market, &news, &ticker).await {
        Ok(articles) => {
            info!("SUCCESS: {} articles", articles.len());
            for article in &articles {
                info!("{} ({})", article["title"], article["url"]);
            }
        }
        Err(e) => {
            error!("ERROR: News lookup failed: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
