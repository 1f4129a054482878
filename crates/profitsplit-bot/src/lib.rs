//! # profitsplit-bot
//!
//! Chat front end for the ledger.
//!
//! ## Architecture
//!
//! ```text
//! Telegram getUpdates → Runner → Command::parse() → CommandHandler.handle()
//!     → (AdminAllowList, Distributor, RateManager, LedgerStore) → report → sendMessage
//! ```
//!
//! 1. **Runner**: long-polls the transport, tracks the update offset, and
//!    stops on shutdown
//! 2. **Command**: `/name@bot arg arg` parsing
//! 3. **CommandHandler**: admin gate, argument validation, ledger calls; every
//!    outcome (including failures) becomes a [`Reply`]
//! 4. **report**: Markdown rendering of distributions and balance sheets

pub mod access;
pub mod command;
pub mod config;
pub mod error;
pub mod handler;
pub mod report;
pub mod runner;
pub mod telegram;

pub use access::AdminAllowList;
pub use command::{Command, CommandKind};
pub use config::{BotConfig, ConfigOverrides};
pub use error::BotError;
pub use handler::{CommandHandler, Reply};
pub use runner::Runner;
pub use telegram::{ChatTransport, TelegramClient};
