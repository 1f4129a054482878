//! # profitsplit-engine
//!
//! Turns one incoming amount into a fully attributed split and keeps the
//! rate table within bounds.
//!
//! ## Distribution Flow
//!
//! ```text
//! LedgerStore.rates() → plan_distribution() → verify_conservation()
//!     → LedgerStore.apply_credits() → Distribution
//! ```
//!
//! 1. **plan**: pure; rejects rate totals over 100%, computes each share and
//!    the reserve remainder
//! 2. **verify**: credited shares must add back up to the amount
//! 3. **apply**: every credit lands in one store transaction
//!
//! Rate changes go through [`RateManager`], which validates against the
//! fixed participant set before anything is written.

pub mod conservation;
pub mod distributor;
pub mod rate_manager;

pub use conservation::verify_conservation;
pub use distributor::{Distributor, plan_distribution};
pub use rate_manager::{RateChange, RateManager};
