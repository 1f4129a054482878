//! Rate changes for the fixed participant set.
//!
//! A change is validated (rate bounds first, then participant name) before
//! anything is written. After the write the whole table is re-read and the
//! new total classified; the classification is informational and never
//! undoes the write.

use profitsplit_store::LedgerStore;
use profitsplit_types::{Participant, RateStatus, Result, validate_rate};
use rust_decimal::Decimal;
use tracing::{info, warn};

/// Outcome of a successful rate change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateChange {
    pub participant: Participant,
    /// The rate now stored for `participant`.
    pub rate: Decimal,
    /// Sum of all stored rates after the change.
    pub total: Decimal,
    pub status: RateStatus,
}

/// Validates and writes participant rates.
#[derive(Debug, Clone)]
pub struct RateManager {
    store: LedgerStore,
}

impl RateManager {
    #[must_use]
    pub fn new(store: LedgerStore) -> Self {
        Self { store }
    }

    /// Set the rate for a participant given by (case-insensitive) name.
    ///
    /// # Errors
    /// - `RateOutOfRange` if `rate` is outside `[0, 100]`
    /// - `UnknownParticipant` if `name` is not in the fixed set
    ///
    /// In both cases the rate table is left unchanged.
    pub async fn set_rate_by_name(&self, name: &str, rate: Decimal) -> Result<RateChange> {
        let rate = validate_rate(rate)?;
        let participant: Participant = name.parse()?;
        self.set_rate(participant, rate).await
    }

    /// Set the rate for `participant`.
    pub async fn set_rate(&self, participant: Participant, rate: Decimal) -> Result<RateChange> {
        let rate = validate_rate(rate)?;
        self.store.set_rate(participant.name(), rate).await?;

        let rates = self.store.rates().await?;
        let total = rates.total();
        let status = rates.status();
        match status {
            RateStatus::Over { .. } => {
                warn!(%participant, %rate, %total, "rate total now exceeds 100%");
            }
            RateStatus::Under { reserve } => {
                info!(%participant, %rate, %reserve, "rate updated");
            }
            RateStatus::Exact => {
                info!(%participant, %rate, "rate updated, total exactly 100%");
            }
        }

        Ok(RateChange {
            participant,
            rate,
            total,
            status,
        })
    }
}
