// src/handlers/error.rs
use std::fmt;
use warp::http::StatusCode;
use warp::reject::Reject;

pub const TICKER_REQUIRED: &str = "Ticker parameter is required";
pub const TICKER_SYMBOL_REQUIRED: &str = "Ticker symbol is required";
pub const EXCHANGE_REQUIRED: &str = "Exchange parameter is required";
pub const INVALID_EXCHANGE: &str = "Invalid exchange";
pub const FETCH_FAILED: &str = "Failed to fetch stock data";
pub const NO_DATA: &str = "No data found for the given ticker";

/// Rejection carrying the status and the `error` text of the JSON body.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.status.as_u16(), self.message)
    }
}

impl std::error::Error for ApiError {}
impl Reject for ApiError {}
