//! SQLite-backed ledger store.
//!
//! Every public operation is a single statement or a single transaction, so
//! each one either fully applies or leaves the tables untouched. The pool is
//! capped at one connection; writers are serialised by the pool itself.

use std::str::FromStr;

use profitsplit_types::{
    Balance, BalanceSheet, Credit, LedgerError, Participant, RateEntry, RateTable, Result,
    constants,
};
use rust_decimal::Decimal;
use sqlx::{
    Row, SqliteConnection,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions},
};
use tracing::{debug, info};

use crate::StoreLocation;

/// Durable rate and balance tables.
///
/// Cheap to clone: clones share the same connection pool.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    pool: SqlitePool,
}

impl LedgerStore {
    /// Open (creating if needed) the database at `location` and seed it.
    ///
    /// # Errors
    /// Returns [`LedgerError::StorageInit`] if the database cannot be opened
    /// or the schema cannot be created. Callers treat this as fatal.
    pub async fn open(location: &StoreLocation) -> Result<Self> {
        let options = match location {
            StoreLocation::Memory => SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| LedgerError::StorageInit(format!("bad sqlite url: {e}")))?,
            StoreLocation::File(path) => SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal),
        };

        // An in-memory database only lives as long as its connection, so the
        // single connection must never be reaped.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<std::time::Duration>)
            .max_lifetime(None::<std::time::Duration>)
            .connect_with(options)
            .await
            .map_err(|e| LedgerError::StorageInit(format!("open {location} failed: {e}")))?;

        let store = Self { pool };
        store.initialize().await?;
        info!(backend = location.label(), %location, "ledger store ready");
        Ok(store)
    }

    /// Shorthand for a fresh in-memory store.
    pub async fn in_memory() -> Result<Self> {
        Self::open(&StoreLocation::Memory).await
    }

    /// Create the tables and seed the default rows.
    ///
    /// Idempotent: existing rows are never overwritten, so rates changed with
    /// [`set_rate`](Self::set_rate) survive a restart.
    pub async fn initialize(&self) -> Result<()> {
        let init_err = |e: sqlx::Error| LedgerError::StorageInit(e.to_string());
        let mut tx = self.pool.begin().await.map_err(init_err)?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS rates (
                name TEXT PRIMARY KEY,
                rate TEXT NOT NULL
            )
            ",
        )
        .execute(&mut *tx)
        .await
        .map_err(init_err)?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS balances (
                name TEXT PRIMARY KEY,
                total TEXT NOT NULL DEFAULT '0',
                daily TEXT NOT NULL DEFAULT '0'
            )
            ",
        )
        .execute(&mut *tx)
        .await
        .map_err(init_err)?;

        for participant in Participant::ALL {
            sqlx::query("INSERT OR IGNORE INTO rates (name, rate) VALUES (?, ?)")
                .bind(participant.name())
                .bind(participant.default_rate().to_string())
                .execute(&mut *tx)
                .await
                .map_err(init_err)?;
            sqlx::query("INSERT OR IGNORE INTO balances (name) VALUES (?)")
                .bind(participant.name())
                .execute(&mut *tx)
                .await
                .map_err(init_err)?;
        }

        sqlx::query("INSERT OR IGNORE INTO balances (name) VALUES (?)")
            .bind(constants::RESERVE)
            .execute(&mut *tx)
            .await
            .map_err(init_err)?;

        tx.commit().await.map_err(init_err)?;
        debug!("ledger schema initialised");
        Ok(())
    }

    /// All stored rates in insertion order. The reserve has no row here.
    pub async fn rates(&self) -> Result<RateTable> {
        let rows = sqlx::query("SELECT name, rate FROM rates ORDER BY rowid")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage_err("load rates", &e))?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            let name: String = row
                .try_get("name")
                .map_err(|e| storage_err("decode rate name", &e))?;
            let raw: String = row
                .try_get("rate")
                .map_err(|e| storage_err("decode rate", &e))?;
            let rate = decode_decimal(&name, &raw)?;
            entries.push(RateEntry { name, rate });
        }
        Ok(RateTable::new(entries))
    }

    /// All balance rows in insertion order, reserve included.
    pub async fn balances(&self) -> Result<BalanceSheet> {
        let rows = sqlx::query("SELECT name, total, daily FROM balances ORDER BY rowid")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage_err("load balances", &e))?;

        let mut sheet = Vec::with_capacity(rows.len());
        for row in rows {
            let name: String = row
                .try_get("name")
                .map_err(|e| storage_err("decode balance name", &e))?;
            let total: String = row
                .try_get("total")
                .map_err(|e| storage_err("decode total", &e))?;
            let daily: String = row
                .try_get("daily")
                .map_err(|e| storage_err("decode daily", &e))?;
            let balance = Balance {
                total: decode_decimal(&name, &total)?,
                daily: decode_decimal(&name, &daily)?,
            };
            sheet.push((name, balance));
        }
        Ok(BalanceSheet::new(sheet))
    }

    /// Add `amount` to both `total` and `daily` of `name`.
    ///
    /// Returns `false` without error when no row is named `name`.
    pub async fn update_balance(&self, name: &str, amount: Decimal) -> Result<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage_err("begin", &e))?;
        let touched = credit_row(&mut *tx, name, amount).await?;
        tx.commit()
            .await
            .map_err(|e| storage_err("commit balance update", &e))?;
        Ok(touched)
    }

    /// Apply every credit in one transaction: all rows move or none do.
    pub async fn apply_credits(&self, credits: &[Credit]) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage_err("begin", &e))?;
        for credit in credits {
            credit_row(&mut *tx, &credit.name, credit.amount).await?;
        }
        tx.commit()
            .await
            .map_err(|e| storage_err("commit credits", &e))?;
        Ok(())
    }

    /// Insert or replace the stored rate for `name`.
    ///
    /// The store does not validate; bounds and names are checked by the
    /// caller against the fixed participant set.
    pub async fn set_rate(&self, name: &str, rate: Decimal) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO rates (name, rate) VALUES (?, ?)
            ON CONFLICT(name) DO UPDATE SET rate = excluded.rate
            ",
        )
        .bind(name)
        .bind(rate.normalize().to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| storage_err("set rate", &e))?;
        Ok(())
    }

    /// Zero `daily` on every row. Totals are untouched.
    ///
    /// Returns the number of rows reset.
    pub async fn reset_daily_profits(&self) -> Result<u64> {
        let result = sqlx::query("UPDATE balances SET daily = '0'")
            .execute(&self.pool)
            .await
            .map_err(|e| storage_err("reset daily", &e))?;
        Ok(result.rows_affected())
    }

    /// Close the pool, flushing the database file.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

async fn credit_row(conn: &mut SqliteConnection, name: &str, amount: Decimal) -> Result<bool> {
    let row = sqlx::query("SELECT total, daily FROM balances WHERE name = ?")
        .bind(name)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| storage_err("read balance", &e))?;

    let Some(row) = row else {
        debug!(name, %amount, "no balance row, credit skipped");
        return Ok(false);
    };

    let total: String = row
        .try_get("total")
        .map_err(|e| storage_err("decode total", &e))?;
    let daily: String = row
        .try_get("daily")
        .map_err(|e| storage_err("decode daily", &e))?;
    let mut balance = Balance {
        total: decode_decimal(name, &total)?,
        daily: decode_decimal(name, &daily)?,
    };
    balance.credit(amount)?;

    sqlx::query("UPDATE balances SET total = ?, daily = ? WHERE name = ?")
        .bind(balance.total.normalize().to_string())
        .bind(balance.daily.normalize().to_string())
        .bind(name)
        .execute(&mut *conn)
        .await
        .map_err(|e| storage_err("write balance", &e))?;
    Ok(true)
}

fn storage_err(context: &str, err: &sqlx::Error) -> LedgerError {
    LedgerError::Storage(format!("{context} failed: {err}"))
}

fn decode_decimal(name: &str, raw: &str) -> Result<Decimal> {
    Decimal::from_str(raw).map_err(|e| LedgerError::CorruptValue {
        name: name.to_string(),
        reason: format!("{raw:?}: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(n: i64) -> Decimal {
        Decimal::new(n, 0)
    }

    #[tokio::test]
    async fn initialize_seeds_defaults() {
        let store = LedgerStore::in_memory().await.unwrap();

        let rates = store.rates().await.unwrap();
        let names: Vec<&str> = rates.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["butch", "jules", "vincent"]);
        assert_eq!(rates.get("butch"), Some(dec(30)));
        assert_eq!(rates.get("jules"), Some(dec(20)));
        assert_eq!(rates.get("vincent"), Some(dec(20)));
        assert_eq!(rates.get(constants::RESERVE), None);

        let balances = store.balances().await.unwrap();
        assert_eq!(balances.iter().count(), 4);
        for (_, balance) in balances.iter() {
            assert!(balance.is_zero());
        }
        assert!(balances.get(constants::RESERVE).is_some());
    }

    #[tokio::test]
    async fn initialize_is_idempotent_and_keeps_rates() {
        let store = LedgerStore::in_memory().await.unwrap();
        store.set_rate("butch", dec(45)).await.unwrap();
        store.update_balance("jules", dec(10)).await.unwrap();

        store.initialize().await.unwrap();

        assert_eq!(store.rates().await.unwrap().get("butch"), Some(dec(45)));
        assert_eq!(
            store.balances().await.unwrap().get("jules").unwrap().total,
            dec(10)
        );
        assert_eq!(store.balances().await.unwrap().iter().count(), 4);
    }

    #[tokio::test]
    async fn update_balance_moves_only_target() {
        let store = LedgerStore::in_memory().await.unwrap();
        let touched = store
            .update_balance("vincent", Decimal::new(1234, 2))
            .await
            .unwrap();
        assert!(touched);

        let sheet = store.balances().await.unwrap();
        let vincent = sheet.get("vincent").unwrap();
        assert_eq!(vincent.total, Decimal::new(1234, 2));
        assert_eq!(vincent.daily, Decimal::new(1234, 2));
        for name in ["butch", "jules", constants::RESERVE] {
            assert!(sheet.get(name).unwrap().is_zero(), "{name} changed");
        }
    }

    #[tokio::test]
    async fn update_unknown_name_is_silent_noop() {
        let store = LedgerStore::in_memory().await.unwrap();
        let touched = store.update_balance("mia", dec(5)).await.unwrap();
        assert!(!touched);
        let sheet = store.balances().await.unwrap();
        assert_eq!(sheet.iter().count(), 4);
        assert_eq!(sheet.grand_total(), Decimal::ZERO);
    }

    #[tokio::test]
    async fn reset_daily_keeps_totals() {
        let store = LedgerStore::in_memory().await.unwrap();
        store.update_balance("butch", dec(30)).await.unwrap();
        store
            .update_balance(constants::RESERVE, dec(70))
            .await
            .unwrap();

        let reset = store.reset_daily_profits().await.unwrap();
        assert_eq!(reset, 4);

        let sheet = store.balances().await.unwrap();
        assert_eq!(sheet.daily_total(), Decimal::ZERO);
        assert_eq!(sheet.get("butch").unwrap().total, dec(30));
        assert_eq!(sheet.get(constants::RESERVE).unwrap().total, dec(70));

        // Daily resumes counting from zero.
        store.update_balance("butch", dec(5)).await.unwrap();
        let butch = store.balances().await.unwrap().get("butch").unwrap();
        assert_eq!(butch.total, dec(35));
        assert_eq!(butch.daily, dec(5));
    }

    #[tokio::test]
    async fn set_rate_upserts_and_keeps_order() {
        let store = LedgerStore::in_memory().await.unwrap();
        store.set_rate("butch", Decimal::new(125, 1)).await.unwrap();
        store.set_rate("extra", dec(1)).await.unwrap();

        let rates = store.rates().await.unwrap();
        let names: Vec<&str> = rates.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["butch", "jules", "vincent", "extra"]);
        assert_eq!(rates.get("butch"), Some(Decimal::new(125, 1)));
    }

    #[tokio::test]
    async fn apply_credits_is_all_or_nothing_per_row_presence() {
        let store = LedgerStore::in_memory().await.unwrap();
        let credits = vec![
            Credit {
                name: "butch".into(),
                rate: dec(30),
                amount: dec(3),
            },
            Credit {
                name: constants::RESERVE.into(),
                rate: dec(70),
                amount: dec(7),
            },
        ];
        store.apply_credits(&credits).await.unwrap();
        let sheet = store.balances().await.unwrap();
        assert_eq!(sheet.get("butch").unwrap().daily, dec(3));
        assert_eq!(sheet.get(constants::RESERVE).unwrap().daily, dec(7));
    }

    #[tokio::test]
    async fn overflowing_credit_rolls_back_whole_batch() {
        let store = LedgerStore::in_memory().await.unwrap();
        store.update_balance("butch", Decimal::MAX).await.unwrap();

        let credits = vec![
            Credit {
                name: "jules".into(),
                rate: dec(50),
                amount: dec(5),
            },
            Credit {
                name: "butch".into(),
                rate: dec(50),
                amount: dec(5),
            },
        ];
        let err = store.apply_credits(&credits).await.unwrap_err();
        assert!(matches!(err, LedgerError::AmountOverflow(_)), "got {err:?}");

        let sheet = store.balances().await.unwrap();
        assert!(sheet.get("jules").unwrap().is_zero());
        assert_eq!(sheet.get("butch").unwrap().total, Decimal::MAX);

        let err = store.update_balance("butch", dec(1)).await.unwrap_err();
        assert!(matches!(err, LedgerError::AmountOverflow(_)));
    }

    #[tokio::test]
    async fn file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let location = StoreLocation::file(dir.path().join("ledger.db"));

        {
            let store = LedgerStore::open(&location).await.unwrap();
            store.set_rate("jules", dec(25)).await.unwrap();
            store.update_balance("jules", dec(40)).await.unwrap();
            store.close().await;
        }

        let reopened = LedgerStore::open(&location).await.unwrap();
        assert_eq!(reopened.rates().await.unwrap().get("jules"), Some(dec(25)));
        assert_eq!(
            reopened.balances().await.unwrap().get("jules").unwrap().total,
            dec(40)
        );
    }

    #[tokio::test]
    async fn open_fails_for_unreachable_path() {
        let dir = tempfile::tempdir().unwrap();
        let location = StoreLocation::file(dir.path().join("missing").join("ledger.db"));
        let err = LedgerStore::open(&location).await.unwrap_err();
        assert!(matches!(err, LedgerError::StorageInit(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn corrupt_rate_is_reported() {
        let store = LedgerStore::in_memory().await.unwrap();
        sqlx::query("UPDATE rates SET rate = 'lots' WHERE name = 'butch'")
            .execute(&store.pool)
            .await
            .unwrap();
        let err = store.rates().await.unwrap_err();
        assert!(matches!(err, LedgerError::CorruptValue { ref name, .. } if name == "butch"));
    }
}
