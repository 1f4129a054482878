//! Command handlers.
//!
//! Every command produces a [`Reply`]. Validation and access failures map to
//! fixed rejection texts and never touch the ledger; storage failures are
//! logged and answered with a generic per-command failure text. Checks run
//! in order: admin gate, argument count, number parsing, then ledger calls.

use std::str::FromStr;

use chrono::{Local, NaiveDate};
use profitsplit_engine::{Distributor, RateManager};
use profitsplit_store::LedgerStore;
use profitsplit_types::{LedgerError, Participant, Result};
use rust_decimal::Decimal;
use tracing::{debug, error, warn};

use crate::{
    access::AdminAllowList,
    command::{Command, CommandKind},
    report,
};

const ACCESS_DENIED: &str = "❌ Access denied. This command is for administrators only.";
const INVALID_NUMBER: &str = "❌ Invalid number format.";
const ADD_USAGE: &str = "❌ Usage: /add [amount]";
const SET_RATE_USAGE: &str = "❌ Usage: /set_rate [name] [percent]";

/// Text to send back to the chat the command came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    /// Send with `parse_mode=Markdown`.
    pub markdown: bool,
}

impl Reply {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            markdown: false,
        }
    }

    pub fn markdown(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            markdown: true,
        }
    }
}

/// Runs commands against an injected store and allow-list.
#[derive(Debug, Clone)]
pub struct CommandHandler {
    store: LedgerStore,
    distributor: Distributor,
    rates: RateManager,
    admins: AdminAllowList,
    today: fn() -> NaiveDate,
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

impl CommandHandler {
    #[must_use]
    pub fn new(store: LedgerStore, admins: AdminAllowList) -> Self {
        Self {
            distributor: Distributor::new(store.clone()),
            rates: RateManager::new(store.clone()),
            store,
            admins,
            today: local_today,
        }
    }

    /// Replace the date source used by dated reports.
    #[must_use]
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Run `command` on behalf of `caller`.
    pub async fn handle(&self, caller: i64, command: &Command) -> Reply {
        debug!(caller, command = %command.kind, args = ?command.args, "command received");

        if command.kind.requires_admin() {
            if let Err(err) = self.admins.check(caller) {
                warn!(caller, command = %command.kind, "{err}");
                return Reply::plain(ACCESS_DENIED);
            }
        }

        let outcome = match command.kind {
            CommandKind::Start => Ok(Reply::plain(report::GREETING)),
            CommandKind::Help => Ok(Reply::plain(report::HELP)),
            CommandKind::Add => self.add(&command.args).await,
            CommandKind::Stats => self.stats().await,
            CommandKind::Morning => self.morning().await,
            CommandKind::Finish => self.finish().await,
            CommandKind::SetRate => self.set_rate(&command.args).await,
        };

        outcome.unwrap_or_else(|err| rejection(command.kind, &err))
    }

    async fn add(&self, args: &[String]) -> Result<Reply> {
        let [amount] = args else {
            return Ok(Reply::plain(ADD_USAGE));
        };
        let amount = parse_decimal(amount)?;
        let distribution = self.distributor.distribute(amount).await?;
        Ok(Reply::markdown(report::distribution(&distribution)))
    }

    async fn stats(&self) -> Result<Reply> {
        let balances = self.store.balances().await?;
        let rates = self.store.rates().await?;
        Ok(Reply::markdown(report::stats(&balances, &rates)))
    }

    async fn morning(&self) -> Result<Reply> {
        let balances = self.store.balances().await?;
        let text = report::morning(&balances, (self.today)());
        self.store.reset_daily_profits().await?;
        Ok(Reply::markdown(text))
    }

    async fn finish(&self) -> Result<Reply> {
        let balances = self.store.balances().await?;
        let text = report::finish(&balances, (self.today)());
        self.store.reset_daily_profits().await?;
        Ok(Reply::markdown(text))
    }

    async fn set_rate(&self, args: &[String]) -> Result<Reply> {
        let [name, rate] = args else {
            return Ok(Reply::plain(SET_RATE_USAGE));
        };
        let rate = parse_decimal(rate)?;
        let change = self.rates.set_rate_by_name(name, rate).await?;
        Ok(Reply::plain(report::rate_change(&change)))
    }
}

/// Parse a user-supplied number, accepting plain and scientific notation.
fn parse_decimal(raw: &str) -> Result<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| LedgerError::InvalidNumber(raw.to_string()))
}

fn rejection(kind: CommandKind, err: &LedgerError) -> Reply {
    if !err.is_rejection() {
        error!(command = %kind, "{err}");
        return Reply::plain(failure_text(kind));
    }

    let text = match err {
        LedgerError::NotAdmin(_) => ACCESS_DENIED.to_string(),
        LedgerError::InvalidNumber(_) => INVALID_NUMBER.to_string(),
        LedgerError::NonPositiveAmount(_) => "❌ The amount must be positive.".to_string(),
        LedgerError::AmountOverflow(_) => "❌ The amount is too large.".to_string(),
        LedgerError::RateTotalExceeded { .. } => {
            "❌ The total rate exceeds 100%. Please adjust the rates first.".to_string()
        }
        LedgerError::RateOutOfRange(_) => "❌ The rate must be between 0 and 100.".to_string(),
        LedgerError::UnknownParticipant(_) => format!(
            "❌ Invalid participant name. Valid names: {}",
            Participant::valid_names()
        ),
        _ => failure_text(kind).to_string(),
    };
    Reply::plain(text)
}

fn failure_text(kind: CommandKind) -> &'static str {
    match kind {
        CommandKind::Add => "❌ An error occurred while distributing the amount.",
        CommandKind::Stats => "❌ An error occurred while loading the statistics.",
        CommandKind::Morning => "❌ An error occurred while generating the morning report.",
        CommandKind::Finish => "❌ An error occurred while closing the day.",
        CommandKind::SetRate => "❌ An error occurred while setting the rate.",
        CommandKind::Start | CommandKind::Help => "❌ An error occurred.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use profitsplit_types::constants;

    const ADMIN: i64 = 6_772_666_050;
    const GUEST: i64 = 1;

    fn fixed_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
    }

    async fn handler() -> (LedgerStore, CommandHandler) {
        let store = LedgerStore::in_memory().await.unwrap();
        let handler = CommandHandler::new(store.clone(), AdminAllowList::new([ADMIN]))
            .with_clock(fixed_day);
        (store, handler)
    }

    fn cmd(kind: CommandKind, args: &[&str]) -> Command {
        Command::new(kind, args)
    }

    #[tokio::test]
    async fn start_and_help_are_open() {
        let (_, h) = handler().await;
        let start = h.handle(GUEST, &cmd(CommandKind::Start, &[])).await;
        assert_eq!(start, Reply::plain(report::GREETING));
        let help = h.handle(GUEST, &cmd(CommandKind::Help, &[])).await;
        assert!(help.text.contains("/set_rate"));
    }

    #[tokio::test]
    async fn non_admin_is_rejected_without_changes() {
        let (store, h) = handler().await;
        for (kind, args) in [
            (CommandKind::Add, vec!["100"]),
            (CommandKind::Morning, vec![]),
            (CommandKind::Finish, vec![]),
            (CommandKind::SetRate, vec!["butch", "50"]),
        ] {
            let reply = h.handle(GUEST, &cmd(kind, &args)).await;
            assert_eq!(reply.text, ACCESS_DENIED, "{kind}");
        }
        assert_eq!(store.balances().await.unwrap().grand_total(), Decimal::ZERO);
        assert_eq!(
            store.rates().await.unwrap().get("butch"),
            Some(Decimal::new(30, 0))
        );
    }

    #[tokio::test]
    async fn add_replies_with_credits() {
        let (_, h) = handler().await;
        let reply = h.handle(ADMIN, &cmd(CommandKind::Add, &["100"])).await;
        assert!(reply.markdown);
        assert_eq!(
            reply.text,
            "💰 *100.00$ distributed!*\n\n\
             • *Butch*: +30.00$\n\
             • *Jules*: +20.00$\n\
             • *Vincent*: +20.00$\n\
             • *Reserve*: +30.00$\n"
        );
    }

    #[tokio::test]
    async fn add_argument_errors() {
        let (store, h) = handler().await;
        let usage = h.handle(ADMIN, &cmd(CommandKind::Add, &[])).await;
        assert_eq!(usage.text, ADD_USAGE);
        let usage = h.handle(ADMIN, &cmd(CommandKind::Add, &["1", "2"])).await;
        assert_eq!(usage.text, ADD_USAGE);
        let nan = h.handle(ADMIN, &cmd(CommandKind::Add, &["ten"])).await;
        assert_eq!(nan.text, INVALID_NUMBER);
        let zero = h.handle(ADMIN, &cmd(CommandKind::Add, &["0"])).await;
        assert!(zero.text.contains("must be positive"));
        let negative = h.handle(ADMIN, &cmd(CommandKind::Add, &["-5"])).await;
        assert!(negative.text.contains("must be positive"));
        assert_eq!(store.balances().await.unwrap().grand_total(), Decimal::ZERO);
    }

    #[tokio::test]
    async fn add_accepts_scientific_notation() {
        let (store, h) = handler().await;
        let reply = h.handle(ADMIN, &cmd(CommandKind::Add, &["1e2"])).await;
        assert!(reply.text.starts_with("💰 *100.00$"), "{}", reply.text);
        assert_eq!(
            store.balances().await.unwrap().grand_total(),
            Decimal::new(100, 0)
        );
    }

    #[tokio::test]
    async fn set_rate_validation_order() {
        let (_, h) = handler().await;
        let usage = h.handle(ADMIN, &cmd(CommandKind::SetRate, &["butch"])).await;
        assert_eq!(usage.text, SET_RATE_USAGE);
        let nan = h
            .handle(ADMIN, &cmd(CommandKind::SetRate, &["mia", "lots"]))
            .await;
        assert_eq!(nan.text, INVALID_NUMBER);
        let range = h
            .handle(ADMIN, &cmd(CommandKind::SetRate, &["mia", "150"]))
            .await;
        assert!(range.text.contains("between 0 and 100"));
        let name = h
            .handle(ADMIN, &cmd(CommandKind::SetRate, &["mia", "15"]))
            .await;
        assert_eq!(
            name.text,
            "❌ Invalid participant name. Valid names: butch, jules, vincent"
        );
    }

    #[tokio::test]
    async fn set_rate_accepts_mixed_case_names() {
        let (store, h) = handler().await;
        let reply = h
            .handle(ADMIN, &cmd(CommandKind::SetRate, &["Vincent", "25.5"]))
            .await;
        assert_eq!(
            reply.text,
            "✅ Rate for vincent set to 25.5%. The reserve rate is now 24.5%."
        );
        assert_eq!(
            store.rates().await.unwrap().get("vincent"),
            Some(Decimal::new(255, 1))
        );
    }

    #[tokio::test]
    async fn finish_reports_then_resets() {
        let (store, h) = handler().await;
        h.handle(ADMIN, &cmd(CommandKind::Add, &["10"])).await;

        let reply = h.handle(ADMIN, &cmd(CommandKind::Finish, &[])).await;
        assert!(reply.text.contains("*Date:* 15.10.2026"));
        assert!(reply.text.contains("• *Butch*: Total: 3.00$ | Daily: +3.00$"));

        let sheet = store.balances().await.unwrap();
        assert_eq!(sheet.daily_total(), Decimal::ZERO);
        assert_eq!(sheet.get(constants::RESERVE).unwrap().total, Decimal::new(3, 0));
    }

    #[tokio::test]
    async fn balance_overflow_is_refused_not_fatal() {
        let (store, h) = handler().await;
        for (name, rate) in [("butch", "100"), ("jules", "0"), ("vincent", "0")] {
            h.handle(ADMIN, &cmd(CommandKind::SetRate, &[name, rate])).await;
        }

        let amount = "790000000000000000000000000";
        let mut refused = None;
        for round in 0..150 {
            let reply = h.handle(ADMIN, &cmd(CommandKind::Add, &[amount])).await;
            if !reply.markdown {
                refused = Some((round, reply));
                break;
            }
        }

        let (round, reply) = refused.expect("balance should eventually overflow");
        assert_eq!(round, 100);
        assert_eq!(reply.text, "❌ The amount is too large.");

        let butch = store.balances().await.unwrap().get("butch").unwrap();
        assert_eq!(butch.total, Decimal::from_str(amount).unwrap() * Decimal::from(100));

        let stats = h.handle(GUEST, &cmd(CommandKind::Stats, &[])).await;
        assert!(stats.text.starts_with("📊"));
    }

    #[tokio::test]
    async fn storage_failure_becomes_generic_reply() {
        let (store, h) = handler().await;
        store.close().await;
        let reply = h.handle(GUEST, &cmd(CommandKind::Stats, &[])).await;
        assert_eq!(
            reply,
            Reply::plain("❌ An error occurred while loading the statistics.")
        );
    }
}
