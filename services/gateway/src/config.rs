//! Command-line configuration for the gateway binary

use std::time::Duration;

use clap::{ArgAction, Parser};
use matching_engine::book::{ladder_ticks, MAX_LADDER_TICKS};
use thiserror::Error;
use types::ids::AssetSymbol;
use types::numeric::Price;

use crate::dispatcher::{DispatcherConfig, OverflowPolicy};

#[derive(Debug, Clone, Parser)]
#[command(name = "gateway", about = "HTTP gateway in front of the matching engine")]
pub struct GatewayConfig {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, default_value_t = 8080)]
    pub port: u16,

    /// Order book to create at startup; repeatable
    #[arg(
        long = "market",
        num_args = 3,
        allow_negative_numbers = true,
        value_names = ["TICKER", "MIN", "MAX"],
        action = ArgAction::Append
    )]
    pub market: Vec<String>,

    /// Fill notices held before the overflow policy applies
    #[arg(long, default_value_t = 1024)]
    pub dispatch_capacity: usize,

    #[arg(long, value_enum, default_value_t = OverflowPolicy::DropNewest)]
    pub dispatch_policy: OverflowPolicy,

    /// Per-request timeout for callback POSTs
    #[arg(long, default_value_t = 2000)]
    pub callback_timeout_ms: u64,
}

/// A book to create at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketSpec {
    pub asset: AssetSymbol,
    pub min_price: Price,
    pub max_price: Price,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("market `{ticker}`: `{value}` is not a valid integer price")]
    InvalidPrice { ticker: String, value: String },

    #[error("market `{ticker}`: min price must be less than max price")]
    EmptyRange { ticker: String },

    #[error("market `{ticker}`: price range spans more than {max_ticks} ticks")]
    TooWide { ticker: String, max_ticks: u64 },

    #[error("--market takes exactly three values: <TICKER> <MIN> <MAX>")]
    Incomplete,
}

impl GatewayConfig {
    /// Books requested with `--market`, in command-line order
    pub fn markets(&self) -> Result<Vec<MarketSpec>, ConfigError> {
        if self.market.len() % 3 != 0 {
            return Err(ConfigError::Incomplete);
        }

        self.market
            .chunks(3)
            .map(|chunk| {
                let ticker = &chunk[0];
                let parse = |value: &String| {
                    value.parse::<i64>().map(Price::new).map_err(|_| ConfigError::InvalidPrice {
                        ticker: ticker.clone(),
                        value: value.clone(),
                    })
                };
                let min_price = parse(&chunk[1])?;
                let max_price = parse(&chunk[2])?;
                if min_price >= max_price {
                    return Err(ConfigError::EmptyRange { ticker: ticker.clone() });
                }
                if !ladder_ticks(min_price, max_price).is_some_and(|ticks| ticks <= MAX_LADDER_TICKS) {
                    return Err(ConfigError::TooWide {
                        ticker: ticker.clone(),
                        max_ticks: MAX_LADDER_TICKS,
                    });
                }
                Ok(MarketSpec {
                    asset: AssetSymbol::new(ticker.as_str()),
                    min_price,
                    max_price,
                })
            })
            .collect()
    }

    pub fn dispatcher(&self) -> DispatcherConfig {
        DispatcherConfig {
            capacity: self.dispatch_capacity,
            policy: self.dispatch_policy,
        }
    }

    pub fn callback_timeout(&self) -> Duration {
        Duration::from_millis(self.callback_timeout_ms)
    }
}
