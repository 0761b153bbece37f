//! [`Money`]-related definitions.

use std::str::FromStr;

use derive_more::Display;
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;

use crate::Percent;

/// Monetary amount, quantized to 2 fraction digits.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Money(Decimal);

impl Money {
    /// Creates a new [`Money`] amount by checking the provided value is not
    /// negative, quantizing it to 2 fraction digits.
    #[must_use]
    pub fn new(amount: Decimal) -> Option<Self> {
        (amount >= Decimal::ZERO).then(|| Self(quantize(amount)))
    }

    /// Returns the inner [`Decimal`] amount of this [`Money`].
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Returns this [`Money`] amount increased by the provided [`Percent`],
    /// quantized to 2 fraction digits with banker's rounding.
    #[must_use]
    pub fn increased_by(self, pct: Percent) -> Self {
        Self(quantize(
            self.0 + self.0 * pct.as_decimal() / Decimal::ONE_HUNDRED,
        ))
    }
}

/// Rounds the provided [`Decimal`] half-to-even and rescales it to exactly 2
/// fraction digits.
fn quantize(amount: Decimal) -> Decimal {
    let mut q = amount.round_dp(2);
    q.rescale(2);
    q
}

impl FromStr for Money {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s)
            .ok()
            .and_then(Self::new)
            .ok_or("invalid money amount")
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use std::str::FromStr as _;

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Non-negative monetary amount with 2 fraction digits.
    #[graphql_scalar(with = Self, parse_token(String))]
    type Money = super::Money;

    impl Money {
        fn to_output<S: ScalarValue>(m: &Money) -> Value<S> {
            Value::scalar(m.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Money` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `Money` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use rust_decimal::Decimal;

    use crate::Percent;

    use super::Money;

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn percent(s: &str) -> Percent {
        Percent::new(decimal(s)).unwrap()
    }

    #[test]
    fn quantizes_on_creation() {
        assert_eq!(Money::new(decimal("1000")).unwrap().to_string(), "1000.00");
        assert_eq!(Money::new(decimal("10.5")).unwrap().to_string(), "10.50");
        assert_eq!(Money::new(decimal("10.005")).unwrap().to_string(), "10.00");
        assert_eq!(Money::new(decimal("10.015")).unwrap().to_string(), "10.02");
    }

    #[test]
    fn rejects_negative_amounts() {
        assert!(Money::new(decimal("-0.01")).is_none());
        assert!(Money::new(Decimal::ZERO).is_some());
    }

    #[test]
    fn from_str() {
        assert_eq!(
            Money::from_str("123.45").unwrap(),
            Money::new(decimal("123.45")).unwrap(),
        );
        assert_eq!(Money::from_str("123").unwrap().to_string(), "123.00");

        assert!(Money::from_str("-123.45").is_err());
        assert!(Money::from_str("12x").is_err());
        assert!(Money::from_str("").is_err());
    }

    #[test]
    fn increases_by_percent() {
        assert_eq!(
            Money::from_str("1000").unwrap().increased_by(percent("10")),
            Money::from_str("1100").unwrap(),
        );
        assert_eq!(
            Money::from_str("333.33")
                .unwrap()
                .increased_by(percent("3.25")),
            Money::from_str("344.16").unwrap(),
        );
        assert_eq!(
            Money::from_str("1000").unwrap().increased_by(percent("0")),
            Money::from_str("1000").unwrap(),
        );
    }

    #[test]
    fn increase_rounds_half_to_even() {
        // 15.25 * 1.1 = 16.775: midpoint cent, even neighbor is 16.78.
        assert_eq!(
            Money::from_str("15.25").unwrap().increased_by(percent("10")),
            Money::from_str("16.78").unwrap(),
        );
        // 15.35 * 1.1 = 16.885: midpoint cent, even neighbor is 16.88.
        assert_eq!(
            Money::from_str("15.35").unwrap().increased_by(percent("10")),
            Money::from_str("16.88").unwrap(),
        );
    }
}
