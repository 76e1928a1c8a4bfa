use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::app_config::ClientConfig;

const THOUSAND: i64 = 1_000;
const LAKH: i64 = 100_000;
const CRORE: i64 = 10_000_000;

/// Display currency, e.g. `₹` / `INR`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Currency {
    pub symbol: String,
    pub code: String,
}

impl Default for Currency {
    fn default() -> Self {
        Self {
            symbol: "₹".to_string(),
            code: "INR".to_string(),
        }
    }
}

impl From<&ClientConfig> for Currency {
    fn from(config: &ClientConfig) -> Self {
        Self::new(config.currency_symbol.clone(), config.currency_code.clone())
    }
}

impl Currency {
    #[must_use]
    pub fn new(symbol: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            code: code.into(),
        }
    }

    /// `₹285.00`, or `₹285` without decimals. A missing price renders as `₹0`.
    #[must_use]
    pub fn format_price(&self, price: Option<Decimal>, show_decimals: bool) -> String {
        let Some(price) = price else {
            return format!("{}0", self.symbol);
        };
        if show_decimals {
            format!("{}{:.2}", self.symbol, round(price, 2))
        } else {
            format!("{}{}", self.symbol, round(price, 0))
        }
    }

    /// Compact Indian notation: `₹1.5K`, `₹1.50 L`, `₹1.50 Cr`.
    #[must_use]
    pub fn format_price_indian(&self, price: Option<Decimal>) -> String {
        let Some(price) = price else {
            return format!("{}0", self.symbol);
        };
        let symbol = &self.symbol;
        let (crore, lakh, thousand) = (
            Decimal::from(CRORE),
            Decimal::from(LAKH),
            Decimal::from(THOUSAND),
        );
        if price >= crore {
            format!("{symbol}{:.2} Cr", round(price / crore, 2))
        } else if price >= lakh {
            format!("{symbol}{:.2} L", round(price / lakh, 2))
        } else if price >= thousand {
            format!("{symbol}{:.1}K", round(price / thousand, 1))
        } else {
            format!("{symbol}{:.2}", round(price, 2))
        }
    }
}

fn round(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Parse a user-entered price such as `"₹1,250.50"`. Unparseable input is zero.
#[must_use]
pub fn parse_price(raw: &str) -> Decimal {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '₹' | '$' | ',') && !c.is_whitespace())
        .collect();
    Decimal::from_str(&cleaned).unwrap_or(Decimal::ZERO)
}
