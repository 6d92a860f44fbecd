// src/services/exchanges.rs
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exchange {
    Bse,
    Nse,
    Us,
    Cryptocurrency,
    Uk,
}

#[derive(Debug, Error)]
#[error("invalid exchange: {0}")]
pub struct UnknownExchange(pub String);

impl FromStr for Exchange {
    type Err = UnknownExchange;

    // Names are matched exactly, as the frontend sends them.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BSE" => Ok(Exchange::Bse),
            "NSE" => Ok(Exchange::Nse),
            "US" => Ok(Exchange::Us),
            "Cryptocurrency" => Ok(Exchange::Cryptocurrency),
            "UK" => Ok(Exchange::Uk),
            other => Err(UnknownExchange(other.to_string())),
        }
    }
}

impl Exchange {
    pub fn name(&self) -> &'static str {
        match self {
            Exchange::Bse => "BSE",
            Exchange::Nse => "NSE",
            Exchange::Us => "US",
            Exchange::Cryptocurrency => "Cryptocurrency",
            Exchange::Uk => "UK",
        }
    }

    /// Listed symbols, in display order. Some lists repeat a symbol; the
    /// listing endpoint reports it once per occurrence.
    pub fn tickers(&self) -> &'static [&'static str] {
        match self {
            Exchange::Bse => BSE,
            Exchange::Nse => NSE,
            Exchange::Us => US,
            Exchange::Cryptocurrency => CRYPTOCURRENCY,
            Exchange::Uk => UK,
        }
    }
}

const BSE: &[&str] = &[
    "RELIANCE.BO", "TCS.BO", "INFY.BO", "HDFCBANK.BO", "ICICIBANK.BO", "MARUTI.BO", "HINDALCO.BO",
    "ITC.BO", "SBIN.BO", "AXISBANK.BO", "KOTAKBANK.BO", "NTPC.BO", "BAJAJ-AUTO.BO", "HAL.BO",
    "BHEL.BO", "ADANIPORTS.BO", "M&M.BO", "TATAMOTORS.BO", "BHARTIARTL.BO", "ULTRACEMCO.BO",
    "GAIL.BO", "ASIANPAINT.BO", "ONGC.BO", "SUNPHARMA.BO", "TATASTEEL.BO", "WIPRO.BO",
    "DIVISLAB.BO", "TECHM.BO", "NESTLEIND.BO", "GRASIM.BO", "LUPIN.BO",
];

const NSE: &[&str] = &[
    "RELIANCE.NS", "TCS.NS", "INFY.NS", "HDFCBANK.NS", "ICICIBANK.NS", "MARUTI.NS", "HINDALCO.NS",
    "ITC.NS", "SBIN.NS", "AXISBANK.NS", "KOTAKBANK.NS", "NTPC.NS", "BAJAJ-AUTO.NS", "HAL.NS",
    "BHEL.NS", "ADANIPORTS.NS", "M&M.NS", "TATAMOTORS.NS", "BHARTIARTL.NS", "ULTRACEMCO.NS",
    "GAIL.NS", "ASIANPAINT.NS", "ONGC.NS", "SUNPHARMA.NS", "TATASTEEL.NS", "WIPRO.NS",
    "DIVISLAB.NS", "TECHM.NS", "NESTLEIND.NS", "GRASIM.NS", "LUPIN.NS",
];

const US: &[&str] = &[
    "GOOG", "AAPL", "MSFT", "AMZN", "TSLA", "FB", "NFLX", "NVDA", "AMD", "PYPL", "DIS", "BA", "V",
    "JNJ", "WMT", "MA", "INTC", "CVX", "GM", "IBM", "META", "CSCO", "AMGN", "NVDA", "ZM", "AMD",
    "PEP", "ADBE", "WFC", "KO", "BA", "SQ", "GS", "UBER", "ABT", "MMM", "PFE", "BMY", "PYPL",
    "TXN", "INTU", "SPGI", "ISRG", "BIIB", "EXPE", "PINS", "ATVI", "LMT", "RTX", "COP", "JNJ",
    "VZ", "PG", "MO", "XOM", "COST", "SYF", "MS", "GS", "FISV",
];

const CRYPTOCURRENCY: &[&str] = &[
    "BTC-USD", "ETH-USD", "XRP-USD", "LTC-USD", "ADA-USD", "DOGE-USD", "SOL-USD", "DOT-USD",
    "MATIC-USD", "BNB-USD", "AVAX-USD", "SHIB-USD", "LINK-USD", "VET-USD", "XLM-USD", "TRX-USD",
    "BCH-USD", "EOS-USD", "MKR-USD", "AAVE-USD", "CRV-USD", "SUSHI-USD", "FTT-USD", "YFI-USD",
    "ZRX-USD", "LEND-USD", "FLOKI-USD",
];

const UK: &[&str] = &[
    "BP.L", "HSBC.L", "BARC.L", "VOD.L", "RDSB.L", "LLOY.L", "GSK.L", "TSCO.L", "RIO.L", "AAL.L",
    "SHEL.L", "BATS.L", "ULVR.L", "IMB.L", "DGE.L", "LSEG.L", "BT.L", "PERF.L", "CRH.L", "STAN.L",
    "CINE.L", "ITV.L", "AHT.L", "TW.L", "SMDS.L",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_exchanges() {
        for name in ["BSE", "NSE", "US", "Cryptocurrency", "UK"] {
            let exchange: Exchange = name.parse().unwrap();
            assert_eq!(exchange.name(), name);
        }
    }

    #[test]
    fn test_parse_is_exact() {
        assert!("us".parse::<Exchange>().is_err());
        assert!("NASDAQ".parse::<Exchange>().is_err());
        assert!("".parse::<Exchange>().is_err());
    }

    #[test]
    fn test_list_sizes() {
        assert_eq!(Exchange::Bse.tickers().len(), 31);
        assert_eq!(Exchange::Nse.tickers().len(), 31);
        assert_eq!(Exchange::Us.tickers().len(), 60);
        assert_eq!(Exchange::Cryptocurrency.tickers().len(), 27);
        assert_eq!(Exchange::Uk.tickers().len(), 25);
    }

    #[test]
    fn test_exchange_suffixes() {
        assert!(Exchange::Bse.tickers().iter().all(|t| t.ends_with(".BO")));
        assert!(Exchange::Nse.tickers().iter().all(|t| t.ends_with(".NS")));
        assert!(Exchange::Uk.tickers().iter().all(|t| t.ends_with(".L")));
        assert!(Exchange::Cryptocurrency.tickers().iter().all(|t| t.ends_with("-USD")));
    }
}
