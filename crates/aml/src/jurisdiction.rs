//! Jurisdiction thresholds and country risk sets (spec.md §4.4)

use std::collections::HashSet;
use std::sync::OnceLock;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Jurisdiction {
    Malta,
    Philippines,
    Curacao,
    Fallback,
}

impl Jurisdiction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Jurisdiction::Malta => "MALTA",
            Jurisdiction::Philippines => "PHILIPPINES",
            Jurisdiction::Curacao => "CURACAO",
            Jurisdiction::Fallback => "FALLBACK",
        }
    }

    /// `player.country` → jurisdiction (spec.md §4.4: "MT→MALTA,
    /// PH→PHILIPPINES, AW|CW→CURACAO, else fallback").
    pub fn for_country(country: &str) -> Self {
        match country.to_uppercase().as_str() {
            "MT" => Jurisdiction::Malta,
            "PH" => Jurisdiction::Philippines,
            "AW" | "CW" => Jurisdiction::Curacao,
            _ => Jurisdiction::Fallback,
        }
    }

    /// Large-transaction threshold for this jurisdiction, indexed by
    /// currency. Falls back to the jurisdiction's `Default` column when
    /// the currency has no dedicated entry (spec.md §4.4 threshold table).
    pub fn threshold(&self, currency: &str) -> Decimal {
        match (self, currency.to_uppercase().as_str()) {
            (Jurisdiction::Malta, "EUR") => dec!(2000),
            (Jurisdiction::Malta, "USD") => dec!(2200),
            (Jurisdiction::Malta, _) => dec!(2000),

            (Jurisdiction::Philippines, "USD") => dec!(10000),
            (Jurisdiction::Philippines, "PHP") => dec!(500000),
            (Jurisdiction::Philippines, _) => dec!(10000),

            (Jurisdiction::Curacao, "EUR") => dec!(4500),
            (Jurisdiction::Curacao, "USD") => dec!(5000),
            (Jurisdiction::Curacao, _) => dec!(5000),

            (Jurisdiction::Fallback, "EUR") => dec!(9500),
            (Jurisdiction::Fallback, "USD") => dec!(10000),
            (Jurisdiction::Fallback, _) => dec!(10000),
        }
    }
}

/// FATF high-risk/monitored jurisdiction list (spec.md §4.4), fixed at
/// compile time.
pub fn high_risk_countries() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| {
        [
            "AF", "BY", "BI", "CF", "CD", "KP", "ER", "IR", "IQ", "LY", "ML", "MM", "NI", "PK",
            "RU", "SO", "SS", "SD", "SY", "VE", "YE", "ZW",
        ]
        .into_iter()
        .collect()
    })
}

/// Subset of the high-risk set under comprehensive sanctions; a match
/// upgrades alert severity to CRITICAL regardless of which rule fired.
pub fn sanctioned_countries() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| ["KP", "IR"].into_iter().collect())
}

pub fn is_high_risk_country(country: &str) -> bool {
    high_risk_countries().contains(country.to_uppercase().as_str())
}

pub fn is_sanctioned_country(country: &str) -> bool {
    sanctioned_countries().contains(country.to_uppercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_country_mapping() {
        assert!(matches!(Jurisdiction::for_country("MT"), Jurisdiction::Malta));
        assert!(matches!(Jurisdiction::for_country("ph"), Jurisdiction::Philippines));
        assert!(matches!(Jurisdiction::for_country("AW"), Jurisdiction::Curacao));
        assert!(matches!(Jurisdiction::for_country("CW"), Jurisdiction::Curacao));
        assert!(matches!(Jurisdiction::for_country("DE"), Jurisdiction::Fallback));
    }

    #[test]
    fn test_threshold_table() {
        assert_eq!(Jurisdiction::Malta.threshold("EUR"), dec!(2000));
        assert_eq!(Jurisdiction::Malta.threshold("USD"), dec!(2200));
        assert_eq!(Jurisdiction::Philippines.threshold("PHP"), dec!(500000));
        assert_eq!(Jurisdiction::Fallback.threshold("KRW"), dec!(10000));
    }

    #[test]
    fn test_sanctions_subset_of_high_risk() {
        for c in sanctioned_countries() {
            assert!(is_high_risk_country(c));
        }
    }
}
