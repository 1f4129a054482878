//! Error types for the ProfitSplit ledger.
//!
//! All errors use the `PS_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Validation errors (bad input, rate bounds, unknown names)
//! - 2xx: Access errors
//! - 3xx: Storage errors
//! - 9xx: Configuration errors

use rust_decimal::Decimal;
use thiserror::Error;

/// Central error enum for all ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // =================================================================
    // Validation Errors (1xx)
    // =================================================================
    /// Amount to distribute must be strictly positive.
    #[error("PS_ERR_100: Amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// Rate outside the inclusive `[0, 100]` range.
    #[error("PS_ERR_101: Rate must be between 0 and 100, got {0}")]
    RateOutOfRange(Decimal),

    /// Name is not one of the fixed participants.
    #[error("PS_ERR_102: Unknown participant: {0}")]
    UnknownParticipant(String),

    /// The stored rates add up to more than 100%; nothing can be distributed.
    #[error("PS_ERR_103: Total rate exceeds 100%: {total}")]
    RateTotalExceeded { total: Decimal },

    /// Text could not be parsed as a decimal number.
    #[error("PS_ERR_104: Invalid number: {0}")]
    InvalidNumber(String),

    /// Credited shares do not add back up to the distributed amount.
    #[error("PS_ERR_105: Distribution not conserved: credited {credited}, expected {expected}")]
    ShareMismatch { credited: Decimal, expected: Decimal },

    /// Amount is too large for decimal arithmetic to split.
    #[error("PS_ERR_106: Amount too large to distribute: {0}")]
    AmountOverflow(Decimal),

    // =================================================================
    // Access Errors (2xx)
    // =================================================================
    /// Caller is not on the admin allow-list.
    #[error("PS_ERR_200: User {0} is not an administrator")]
    NotAdmin(i64),

    // =================================================================
    // Storage Errors (3xx)
    // =================================================================
    /// The database could not be opened or the schema created.
    #[error("PS_ERR_300: Storage initialisation failed: {0}")]
    StorageInit(String),

    /// A read or write against an open store failed.
    #[error("PS_ERR_301: Storage error: {0}")]
    Storage(String),

    /// A stored value could not be decoded.
    #[error("PS_ERR_302: Corrupt stored value for {name}: {reason}")]
    CorruptValue { name: String, reason: String },

    // =================================================================
    // Configuration (9xx)
    // =================================================================
    /// Configuration error (missing token, unreadable config file, etc.).
    #[error("PS_ERR_900: Configuration error: {0}")]
    Configuration(String),
}

impl LedgerError {
    /// Whether this error is the caller's fault (bad input or access) rather
    /// than a failure of the ledger itself.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::NonPositiveAmount(_)
                | Self::AmountOverflow(_)
                | Self::RateOutOfRange(_)
                | Self::UnknownParticipant(_)
                | Self::RateTotalExceeded { .. }
                | Self::InvalidNumber(_)
                | Self::NotAdmin(_)
        )
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, LedgerError>;
