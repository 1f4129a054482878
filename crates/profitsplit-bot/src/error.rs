//! Errors raised outside the ledger core: transport and configuration.

use profitsplit_types::LedgerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotError {
    /// HTTP-level failure talking to the Bot API.
    #[error("PS_ERR_700: Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The Bot API answered `ok: false`.
    #[error("PS_ERR_701: Bot API rejected {method}: {description}")]
    Api {
        method: &'static str,
        description: String,
    },

    /// Config file could not be parsed.
    #[error("PS_ERR_902: Config file error: {0}")]
    ConfigFile(#[from] toml::de::Error),

    #[error("PS_ERR_903: I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

pub type Result<T> = std::result::Result<T, BotError>;
