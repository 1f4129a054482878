//! Balance tracking types.
//!
//! Every account (participant or reserve) carries a running `total` and a
//! `daily` figure that is zeroed by the morning/finish reports.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{LedgerError, Result};

/// Running and daily totals for one account.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Balance {
    /// Everything ever credited.
    pub total: Decimal,
    /// Credited since the last daily reset.
    pub daily: Decimal,
}

impl Balance {
    /// Create a zero balance.
    #[must_use]
    pub fn new() -> Self {
        Self {
            total: Decimal::ZERO,
            daily: Decimal::ZERO,
        }
    }

    /// Apply a credit to both figures.
    ///
    /// # Errors
    /// Returns [`LedgerError::AmountOverflow`] if either figure would leave
    /// the decimal range; the balance is unchanged in that case.
    pub fn credit(&mut self, amount: Decimal) -> Result<()> {
        let total = self
            .total
            .checked_add(amount)
            .ok_or(LedgerError::AmountOverflow(amount))?;
        let daily = self
            .daily
            .checked_add(amount)
            .ok_or(LedgerError::AmountOverflow(amount))?;
        self.total = total;
        self.daily = daily;
        Ok(())
    }

    /// Whether nothing was ever credited.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.total.is_zero() && self.daily.is_zero()
    }
}

impl Default for Balance {
    fn default() -> Self {
        Self::new()
    }
}

/// All balance rows, in storage order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheet {
    rows: Vec<(String, Balance)>,
}

impl BalanceSheet {
    #[must_use]
    pub fn new(rows: Vec<(String, Balance)>) -> Self {
        Self { rows }
    }

    /// Balance for `name`, if a row exists.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Balance> {
        self.rows
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, b)| *b)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Balance)> {
        self.rows.iter().map(|(n, b)| (n.as_str(), b))
    }

    /// Sum of every account's `total`.
    #[must_use]
    pub fn grand_total(&self) -> Decimal {
        self.rows.iter().map(|(_, b)| b.total).sum()
    }

    /// Sum of every account's `daily`.
    #[must_use]
    pub fn daily_total(&self) -> Decimal {
        self.rows.iter().map(|(_, b)| b.daily).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balance_default_is_zero() {
        let b = Balance::default();
        assert_eq!(b.total, Decimal::ZERO);
        assert_eq!(b.daily, Decimal::ZERO);
        assert!(b.is_zero());
    }

    #[test]
    fn credit_moves_both_figures() {
        let mut b = Balance::new();
        b.credit(Decimal::new(1250, 2)).unwrap();
        b.credit(Decimal::new(750, 2)).unwrap();
        assert_eq!(b.total, Decimal::new(20, 0));
        assert_eq!(b.daily, Decimal::new(20, 0));
    }

    #[test]
    fn credit_past_decimal_range_is_refused() {
        let mut b = Balance::new();
        b.credit(Decimal::MAX).unwrap();
        let err = b.credit(Decimal::ONE).unwrap_err();
        assert!(matches!(err, LedgerError::AmountOverflow(_)));
        assert_eq!(b.total, Decimal::MAX);
        assert_eq!(b.daily, Decimal::MAX);
    }

    #[test]
    fn sheet_lookup_and_sums() {
        let sheet = BalanceSheet::new(vec![
            (
                "butch".into(),
                Balance {
                    total: Decimal::new(30, 0),
                    daily: Decimal::new(10, 0),
                },
            ),
            (
                "reserve".into(),
                Balance {
                    total: Decimal::new(70, 0),
                    daily: Decimal::ZERO,
                },
            ),
        ]);
        assert_eq!(sheet.iter().count(), 2);
        assert_eq!(sheet.get("reserve").unwrap().total, Decimal::new(70, 0));
        assert!(sheet.get("mia").is_none());
        assert_eq!(sheet.grand_total(), Decimal::new(100, 0));
        assert_eq!(sheet.daily_total(), Decimal::new(10, 0));
    }

    #[test]
    fn balance_serde_roundtrip() {
        let b = Balance {
            total: Decimal::new(12345, 2),
            daily: Decimal::new(678, 1),
        };
        let json = serde_json::to_string(&b).unwrap();
        let back: Balance = serde_json::from_str(&json).unwrap();
        assert_eq!(b, back);
    }
}
