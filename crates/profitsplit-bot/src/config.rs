//! Runtime configuration.
//!
//! Layered lowest to highest: built-in defaults, an optional TOML file,
//! then environment/CLI overrides (parsed by `clap` in the binary).
//!
//! ```toml
//! token = "123456:ABC..."
//! admin_ids = [6772666050, 7610385492]
//! database = "profit_bot.db"
//! api_url = "https://api.telegram.org"
//! poll_timeout_secs = 30
//! drop_pending_updates = true
//! ```

use std::{fmt, path::PathBuf, time::Duration};

use profitsplit_store::StoreLocation;
use profitsplit_types::LedgerError;
use serde::Deserialize;
use tracing::warn;

use crate::{access::AdminAllowList, error::Result};

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";
pub const DEFAULT_DATABASE: &str = "profit_bot.db";
pub const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;

/// Bot token; never printed in full.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct BotToken(String);

impl BotToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for BotToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BotToken(***)")
    }
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BotConfig {
    pub token: BotToken,
    pub admin_ids: Vec<i64>,
    /// SQLite file path, or `:memory:`.
    pub database: PathBuf,
    pub api_url: String,
    pub poll_timeout_secs: u64,
    pub drop_pending_updates: bool,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: BotToken::default(),
            admin_ids: Vec::new(),
            database: PathBuf::from(DEFAULT_DATABASE),
            api_url: DEFAULT_API_URL.to_string(),
            poll_timeout_secs: DEFAULT_POLL_TIMEOUT_SECS,
            drop_pending_updates: true,
        }
    }
}

/// Values supplied on the command line or through the environment.
/// `None` / empty leaves the lower layer in place.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub token: Option<String>,
    pub admin_ids: Vec<i64>,
    pub database: Option<PathBuf>,
    pub api_url: Option<String>,
    pub poll_timeout_secs: Option<u64>,
    pub keep_pending_updates: bool,
}

impl BotConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Read a TOML config file.
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Apply overrides on top of this configuration.
    #[must_use]
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(token) = overrides.token {
            self.token = BotToken::new(token);
        }
        if !overrides.admin_ids.is_empty() {
            self.admin_ids = overrides.admin_ids;
        }
        if let Some(database) = overrides.database {
            self.database = database;
        }
        if let Some(api_url) = overrides.api_url {
            self.api_url = api_url;
        }
        if let Some(secs) = overrides.poll_timeout_secs {
            self.poll_timeout_secs = secs;
        }
        if overrides.keep_pending_updates {
            self.drop_pending_updates = false;
        }
        self
    }

    /// Check that the bot can start.
    ///
    /// # Errors
    /// Returns [`LedgerError::Configuration`] when the token is missing.
    /// An empty admin list is only warned about.
    pub fn validate(&self) -> Result<()> {
        if self.token.is_empty() {
            return Err(LedgerError::Configuration(
                "bot token is not set (use --token or PROFITSPLIT_BOT_TOKEN)".into(),
            )
            .into());
        }
        if self.admins().is_empty() {
            warn!("no admin ids configured; admin commands will be refused for everyone");
        }
        Ok(())
    }

    #[must_use]
    pub fn admins(&self) -> AdminAllowList {
        AdminAllowList::new(self.admin_ids.iter().copied())
    }

    #[must_use]
    pub fn store_location(&self) -> StoreLocation {
        if self.database.as_os_str() == ":memory:" {
            StoreLocation::Memory
        } else {
            StoreLocation::File(self.database.clone())
        }
    }

    #[must_use]
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs)
    }
}
