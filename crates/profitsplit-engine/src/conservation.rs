//! Share conservation check.
//!
//! Invariant enforced before any credit is written:
//! ```text
//! Σ(credited shares, reserve included) == amount
//! ```
//!
//! Shares are exact decimal products, so the only slack allowed is the
//! rounding decimal arithmetic performs past its 28 significant digits.

use profitsplit_types::{Distribution, LedgerError, Result};
use rust_decimal::Decimal;

/// Largest tolerated gap between the credited sum and the amount.
pub const CONSERVATION_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 12);

/// Verify that a planned distribution credits exactly its amount.
///
/// # Errors
/// Returns [`LedgerError::ShareMismatch`] if the credits drift from the amount.
pub fn verify_conservation(distribution: &Distribution) -> Result<()> {
    let credited = distribution.credited();
    if (credited - distribution.amount).abs() > CONSERVATION_TOLERANCE {
        return Err(LedgerError::ShareMismatch {
            credited,
            expected: distribution.amount,
        });
    }
    Ok(())
}
