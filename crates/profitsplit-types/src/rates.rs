//! Allocation rates.
//!
//! A [`RateTable`] holds the stored percentage for every participant row in
//! storage order. The reserve share is derived as `100 - total` and never
//! stored.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{LedgerError, Result, constants};

/// One stored rate row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateEntry {
    pub name: String,
    /// Percentage, `0..=100`.
    pub rate: Decimal,
}

/// All stored rates, in storage order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTable {
    entries: Vec<RateEntry>,
}

impl RateTable {
    #[must_use]
    pub fn new(entries: Vec<RateEntry>) -> Self {
        Self { entries }
    }

    /// Stored rate for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Decimal> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.rate)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RateEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all stored rates.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.entries.iter().map(|e| e.rate).sum()
    }

    /// Classify the current total against 100%.
    #[must_use]
    pub fn status(&self) -> RateStatus {
        RateStatus::classify(self.total())
    }

    /// Share left for the reserve. Zero when the total is 100% or more.
    #[must_use]
    pub fn reserve_rate(&self) -> Decimal {
        (constants::MAX_RATE - self.total()).max(Decimal::ZERO)
    }
}

/// Where the rate total sits relative to 100%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateStatus {
    /// Rates add up to more than 100%. Distributions are refused.
    Over { total: Decimal },
    /// Rates leave `reserve` percent for the reserve account.
    Under { reserve: Decimal },
    /// Rates add up to exactly 100%; the reserve gets nothing.
    Exact,
}

impl RateStatus {
    #[must_use]
    pub fn classify(total: Decimal) -> Self {
        match total.cmp(&constants::MAX_RATE) {
            std::cmp::Ordering::Greater => Self::Over { total },
            std::cmp::Ordering::Less => Self::Under {
                reserve: constants::MAX_RATE - total,
            },
            std::cmp::Ordering::Equal => Self::Exact,
        }
    }

    /// Whether a distribution may run under this status.
    #[must_use]
    pub fn allows_distribution(self) -> bool {
        !matches!(self, Self::Over { .. })
    }
}

/// Check a rate against the inclusive `[0, 100]` bounds.
///
/// # Errors
/// Returns [`LedgerError::RateOutOfRange`] when outside the bounds.
pub fn validate_rate(rate: Decimal) -> Result<Decimal> {
    if rate < constants::MIN_RATE || rate > constants::MAX_RATE {
        return Err(LedgerError::RateOutOfRange(rate));
    }
    Ok(rate)
}
