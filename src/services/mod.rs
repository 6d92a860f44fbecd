// src/services/mod.rs
pub mod cache;
pub mod charts;
pub mod exchanges;
pub mod forecast;
pub mod market_data;
pub mod news;
pub mod pretrained;
