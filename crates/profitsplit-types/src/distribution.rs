//! Result of splitting one amount across the accounts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One account's share of a distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credit {
    /// Account name (participant or reserve).
    pub name: String,
    /// Rate the share was computed from, in percent.
    pub rate: Decimal,
    /// Amount credited.
    pub amount: Decimal,
}

/// A fully attributed split of `amount`.
///
/// Credits are ordered as the rate table is, with the reserve last when it
/// received a share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distribution {
    pub amount: Decimal,
    pub credits: Vec<Credit>,
}

impl Distribution {
    /// Sum of every credit.
    #[must_use]
    pub fn credited(&self) -> Decimal {
        self.credits.iter().map(|c| c.amount).sum()
    }

    /// Credit for `name`, if it was part of this distribution.
    #[must_use]
    pub fn credit_for(&self, name: &str) -> Option<Decimal> {
        self.credits
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.amount)
    }
}
