//! System-wide constants for the ProfitSplit ledger.

use rust_decimal::Decimal;

/// Name of the synthetic account that receives whatever share the named
/// participants' rates leave unallocated. It has a balance row but never a
/// stored rate.
pub const RESERVE: &str = "reserve";

/// Lower bound (inclusive) of a participant rate, in percent.
pub const MIN_RATE: Decimal = Decimal::ZERO;

/// Upper bound (inclusive) of a participant rate, and of the rate total.
pub const MAX_RATE: Decimal = Decimal::ONE_HUNDRED;

/// Decimal places shown for money amounts in replies.
pub const AMOUNT_DISPLAY_DP: u32 = 2;

/// Decimal places shown for percentages in replies.
pub const RATE_DISPLAY_DP: u32 = 1;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const APP_NAME: &str = "ProfitSplit";
