//! Currency - Type-safe ISO-4217 currency codes
//!
//! Wallets in this system are fiat-only (spec: "each wallet has one fixed
//! currency", no multi-currency conversion). Instead of raw strings we use
//! an enum for the currencies this platform actually settles in, with a
//! fallback for anything else a player's jurisdiction might require.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when parsing currencies
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CurrencyError {
    #[error("Empty currency code")]
    EmptyCode,

    #[error("Currency code too long (max 10 chars): {0}")]
    TooLong(String),

    #[error("Invalid currency code format: {0}")]
    InvalidFormat(String),
}

/// ISO-4217 currency codes
///
/// # Examples
/// ```
/// use casino_core::Currency;
///
/// let eur: Currency = "EUR".parse().unwrap();
/// assert_eq!(eur, Currency::Eur);
///
/// // Unlisted codes fall back to `Other`
/// let custom: Currency = "ZAR".parse().unwrap();
/// assert!(matches!(custom, Currency::Other(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Currency {
    /// US Dollar
    Usd,
    /// Euro
    Eur,
    /// British Pound
    Gbp,
    /// Japanese Yen
    Jpy,
    /// South Korean Won
    Krw,
    /// Philippine Peso
    Php,
    /// Vietnamese Dong
    Vnd,

    /// Any other ISO-4217 code not listed above
    Other(String),
}

impl Currency {
    /// Returns the currency code as a string slice
    pub fn code(&self) -> &str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Jpy => "JPY",
            Currency::Krw => "KRW",
            Currency::Php => "PHP",
            Currency::Vnd => "VND",
            Currency::Other(s) => s.as_str(),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = CurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_uppercase();

        if s.is_empty() {
            return Err(CurrencyError::EmptyCode);
        }

        if s.len() > 10 {
            return Err(CurrencyError::TooLong(s));
        }

        if !s.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(CurrencyError::InvalidFormat(s));
        }

        Ok(match s.as_str() {
            "USD" => Currency::Usd,
            "EUR" => Currency::Eur,
            "GBP" => Currency::Gbp,
            "JPY" => Currency::Jpy,
            "KRW" => Currency::Krw,
            "PHP" => Currency::Php,
            "VND" => Currency::Vnd,
            _ => Currency::Other(s),
        })
    }
}

impl TryFrom<String> for Currency {
    type Error = CurrencyError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Currency> for String {
    fn from(c: Currency) -> Self {
        c.code().to_string()
    }
}

impl From<&str> for Currency {
    fn from(s: &str) -> Self {
        s.parse().unwrap_or_else(|_| Currency::Other(s.to_uppercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_currencies() {
        assert_eq!("EUR".parse::<Currency>().unwrap(), Currency::Eur);
        assert_eq!("krw".parse::<Currency>().unwrap(), Currency::Krw);
        assert_eq!("php".parse::<Currency>().unwrap(), Currency::Php);
    }

    #[test]
    fn test_parse_fallback_code() {
        let other: Currency = "ZAR".parse().unwrap();
        assert_eq!(other, Currency::Other("ZAR".to_string()));
        assert_eq!(other.to_string(), "ZAR");
    }

    #[test]
    fn test_display() {
        assert_eq!(Currency::Eur.to_string(), "EUR");
        assert_eq!(Currency::Other("XYZ".to_string()).to_string(), "XYZ");
    }

    #[test]
    fn test_empty_code_error() {
        let result: Result<Currency, _> = "".parse();
        assert!(matches!(result, Err(CurrencyError::EmptyCode)));
    }

    #[test]
    fn test_too_long_error() {
        let result: Result<Currency, _> = "VERYLONGCURRENCYNAME".parse();
        assert!(matches!(result, Err(CurrencyError::TooLong(_))));
    }

    #[test]
    fn test_invalid_format_error() {
        let result: Result<Currency, _> = "USD-X".parse();
        assert!(matches!(result, Err(CurrencyError::InvalidFormat(_))));
    }

    #[test]
    fn test_serde_roundtrip() {
        for currency in [Currency::Usd, Currency::Krw, Currency::Other("ZAR".to_string())] {
            let json = serde_json::to_string(&currency).unwrap();
            let parsed: Currency = serde_json::from_str(&json).unwrap();
            assert_eq!(currency, parsed);
        }
    }

    #[test]
    fn test_from_str_trait() {
        let currency: Currency = "JPY".into();
        assert_eq!(currency, Currency::Jpy);
    }
}
