//! Percentage distribution of an incoming amount.
//!
//! 1. Reject non-positive amounts
//! 2. Reject rate tables summing to more than 100% (nothing is touched)
//! 3. Credit every rate row `amount * rate / 100`
//! 4. Credit the reserve with whatever percentage is left, if any
//! 5. Check conservation, then write all credits in one transaction

use profitsplit_store::LedgerStore;
use profitsplit_types::{Credit, Distribution, LedgerError, RateTable, Result, constants};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::conservation::verify_conservation;

/// Compute the split of `amount` under `rates` without touching storage.
///
/// Credits follow the rate table's order; the reserve comes last and only
/// when it has a positive share.
///
/// # Errors
/// - `NonPositiveAmount` if `amount <= 0`
/// - `RateTotalExceeded` if the rates add up to more than 100%
/// - `AmountOverflow` if a share cannot be represented
pub fn plan_distribution(amount: Decimal, rates: &RateTable) -> Result<Distribution> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::NonPositiveAmount(amount));
    }

    if !rates.status().allows_distribution() {
        return Err(LedgerError::RateTotalExceeded {
            total: rates.total(),
        });
    }

    let mut credits = Vec::with_capacity(rates.len() + 1);
    for entry in rates.iter() {
        credits.push(Credit {
            name: entry.name.clone(),
            rate: entry.rate,
            amount: share(amount, entry.rate)?,
        });
    }

    let reserve_rate = rates.reserve_rate();
    if reserve_rate > Decimal::ZERO {
        credits.push(Credit {
            name: constants::RESERVE.to_string(),
            rate: reserve_rate,
            amount: share(amount, reserve_rate)?,
        });
    }

    Ok(Distribution { amount, credits })
}

fn share(amount: Decimal, rate: Decimal) -> Result<Decimal> {
    amount
        .checked_mul(rate)
        .and_then(|scaled| scaled.checked_div(constants::MAX_RATE))
        .ok_or(LedgerError::AmountOverflow(amount))
}

/// Applies distributions against a [`LedgerStore`].
#[derive(Debug, Clone)]
pub struct Distributor {
    store: LedgerStore,
}

impl Distributor {
    #[must_use]
    pub fn new(store: LedgerStore) -> Self {
        Self { store }
    }

    /// Split `amount` under the currently stored rates and credit every share.
    ///
    /// All credits are written in a single transaction: on failure no
    /// balance has moved.
    pub async fn distribute(&self, amount: Decimal) -> Result<Distribution> {
        let rates = self.store.rates().await?;
        let distribution = match plan_distribution(amount, &rates) {
            Ok(d) => d,
            Err(err @ LedgerError::RateTotalExceeded { .. }) => {
                warn!(%amount, total_rate = %rates.total(), "distribution refused");
                return Err(err);
            }
            Err(err) => return Err(err),
        };
        verify_conservation(&distribution)?;

        self.store.apply_credits(&distribution.credits).await?;
        info!(
            %amount,
            accounts = distribution.credits.len(),
            "amount distributed"
        );
        Ok(distribution)
    }
}
