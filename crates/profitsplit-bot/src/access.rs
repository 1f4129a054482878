//! Static admin allow-list.

use std::collections::BTreeSet;

use profitsplit_types::{LedgerError, Result};

/// Telegram user ids allowed to run admin commands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminAllowList {
    ids: BTreeSet<i64>,
}

impl AdminAllowList {
    pub fn new(ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn is_admin(&self, user_id: i64) -> bool {
        self.ids.contains(&user_id)
    }

    /// # Errors
    /// Returns [`LedgerError::NotAdmin`] for anyone not on the list.
    pub fn check(&self, user_id: i64) -> Result<()> {
        if self.is_admin(user_id) {
            Ok(())
        } else {
            Err(LedgerError::NotAdmin(user_id))
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }
}
