//! Currency codes and money precision helpers.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All monetary amounts are `rust_decimal::Decimal` scaled to two
//! fractional digits.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Number of fractional digits for monetary amounts.
pub const MONEY_SCALE: u32 = 2;

/// ISO 4217 currency codes supported by the system.
///
/// `Gbp` is the system default: new accounts are denominated in it unless
/// configuration says otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Pound Sterling
    Gbp,
    /// US Dollar
    Usd,
    /// Euro
    Eur,
}

impl Default for Currency {
    fn default() -> Self {
        Self::Gbp
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gbp => write!(f, "GBP"),
            Self::Usd => write!(f, "USD"),
            Self::Eur => write!(f, "EUR"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GBP" => Ok(Self::Gbp),
            "USD" => Ok(Self::Usd),
            "EUR" => Ok(Self::Eur),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}

/// Rounds an amount to [`MONEY_SCALE`] using Banker's Rounding.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointNearestEven)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[rstest]
    #[case("GBP", Currency::Gbp)]
    #[case("gbp", Currency::Gbp)]
    #[case("USD", Currency::Usd)]
    #[case("eur", Currency::Eur)]
    fn test_currency_from_str(#[case] input: &str, #[case] expected: Currency) {
        assert_eq!(Currency::from_str(input).unwrap(), expected);
    }

    #[rstest]
    #[case("XXX")]
    #[case("")]
    #[case("POUND")]
    fn test_currency_from_str_rejects_unknown(#[case] input: &str) {
        assert!(Currency::from_str(input).is_err());
    }

    #[test]
    fn test_currency_display_round_trip() {
        for currency in [Currency::Gbp, Currency::Usd, Currency::Eur] {
            assert_eq!(
                Currency::from_str(&currency.to_string()).unwrap(),
                currency
            );
        }
    }

    #[test]
    fn test_default_currency_is_gbp() {
        assert_eq!(Currency::default(), Currency::Gbp);
    }

    #[test]
    fn test_round_money_bankers() {
        // Midpoints round to even
        assert_eq!(round_money(dec!(1.005)), dec!(1.00));
        assert_eq!(round_money(dec!(1.015)), dec!(1.02));
        assert_eq!(round_money(dec!(2.5)), dec!(2.50));
    }
}
