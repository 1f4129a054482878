//! # profitsplit-types
//!
//! Shared types and errors for the **ProfitSplit** ledger.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Participants**: [`Participant`] (the closed set of named members) and
//!   [`RESERVE`](constants::RESERVE) for the residual bucket
//! - **Rates**: [`RateTable`], [`RateEntry`], [`RateStatus`]
//! - **Balances**: [`Balance`], [`BalanceSheet`]
//! - **Distribution results**: [`Distribution`], [`Credit`]
//! - **Errors**: [`LedgerError`] with `PS_ERR_` prefix codes
//! - **Constants**: percentage bounds and account names

pub mod balance;
pub mod constants;
pub mod distribution;
pub mod error;
pub mod participant;
pub mod rates;

pub use balance::*;
pub use distribution::*;
pub use error::*;
pub use participant::*;
pub use rates::*;

// Constants are accessed via `profitsplit_types::constants::FOO`
// (not re-exported to avoid name collisions).
