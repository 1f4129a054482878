//! # profitsplit-store
//!
//! Durable persistence for the ledger: one `rates` table and one `balances`
//! table, both keyed by lowercase account name.
//!
//! ## Layout
//!
//! ```text
//! rates(name TEXT PRIMARY KEY, rate TEXT)
//! balances(name TEXT PRIMARY KEY, total TEXT DEFAULT '0', daily TEXT DEFAULT '0')
//! ```
//!
//! Amounts and rates are stored as decimal strings so no precision is lost
//! between what is credited and what is reported back.

pub mod ledger_store;
pub mod location;

pub use ledger_store::LedgerStore;
pub use location::StoreLocation;
