//! Where the ledger lives.

use std::{fmt, path::PathBuf};

/// Backing location for a [`LedgerStore`](crate::LedgerStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// Private in-process database, gone when the store is dropped.
    Memory,
    /// SQLite file, created on first open.
    File(PathBuf),
}

impl StoreLocation {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::File(_) => "sqlite",
        }
    }
}

impl Default for StoreLocation {
    fn default() -> Self {
        Self::file("profit_bot.db")
    }
}

impl fmt::Display for StoreLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => f.write_str(":memory:"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}
