// src/state.rs
use std::sync::Arc;

use crate::services::cache::ResponseCache;
use crate::services::market_data::MarketData;
use crate::services::news::NewsSource;
use crate::services::pretrained::ModelArtifact;

/// Everything the handlers share. Built once in `main`, cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub market: Arc<dyn MarketData>,
    pub news: Arc<dyn NewsSource>,
    pub cache: ResponseCache,
    pub model: Option<Arc<ModelArtifact>>,
}
