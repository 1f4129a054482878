//! Reply rendering.
//!
//! Reports use Telegram's legacy `Markdown` parse mode (`*bold*`). Money is
//! shown with two decimals and a `$` suffix, percentages with one.

use std::fmt::Write as _;

use chrono::NaiveDate;
use profitsplit_engine::RateChange;
use profitsplit_types::{
    BalanceSheet, Distribution, RateStatus, RateTable, constants, display_name,
};
use rust_decimal::{Decimal, RoundingStrategy};

pub const GREETING: &str =
    "Hi! I'm the profit ledger bot. Use /help to see the available commands.";

pub const HELP: &str = "\
📊 Profit Ledger Bot commands

General commands:
- /stats - Show current balances and today's income for every participant.
- /help - Show this list.

Administrator commands:
- /add [amount] - Split the amount between participants according to their rates.
- /morning - Show the past day's statistics and reset the daily counters.
- /finish - Show the final statistics for the day and reset the daily income.
- /set_rate [name] [percent] - Set the rate for one participant (e.g. /set_rate butch 35).";

/// Format a money amount: two decimals, half away from zero.
#[must_use]
pub fn money(amount: Decimal) -> String {
    fixed(amount, constants::AMOUNT_DISPLAY_DP)
}

/// Format a percentage: one decimal, half away from zero.
#[must_use]
pub fn percent(rate: Decimal) -> String {
    fixed(rate, constants::RATE_DISPLAY_DP)
}

fn fixed(value: Decimal, dp: u32) -> String {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    rounded.to_string()
}

/// `/add` reply: the amount and every account's credit.
#[must_use]
pub fn distribution(d: &Distribution) -> String {
    let mut out = format!("💰 *{}$ distributed!*\n\n", money(d.amount));
    for credit in &d.credits {
        let _ = writeln!(
            out,
            "• *{}*: +{}$",
            display_name(&credit.name),
            money(credit.amount)
        );
    }
    out
}

/// `/stats` reply: totals with rate annotations, then today's income.
#[must_use]
pub fn stats(balances: &BalanceSheet, rates: &RateTable) -> String {
    let mut out = String::from("📊 *Current statistics*\n\n--- *Total profit* ---\n");
    for (name, balance) in balances.iter() {
        let _ = write!(out, "• *{}*: {}$", display_name(name), money(balance.total));
        if name != constants::RESERVE {
            let rate = rates.get(name).unwrap_or(Decimal::ZERO);
            let _ = write!(out, " ({}%)", percent(rate));
        }
        out.push('\n');
    }

    out.push_str("\n--- *Today's income* ---\n");
    daily_lines(&mut out, balances);
    out
}

/// `/morning` reply, rendered before the daily counters are reset.
#[must_use]
pub fn morning(balances: &BalanceSheet, date: NaiveDate) -> String {
    let mut out = format!(
        "☀️ *Morning report*\n\n*Date:* {}\n\n--- *Balances* ---\n",
        date.format("%d.%m.%Y")
    );
    for (name, balance) in balances.iter() {
        let _ = writeln!(out, "• *{}*: {}$", display_name(name), money(balance.total));
    }

    out.push_str("\n--- *Income for the past day* ---\n");
    daily_lines(&mut out, balances);
    out
}

/// `/finish` reply, rendered before the daily counters are reset.
#[must_use]
pub fn finish(balances: &BalanceSheet, date: NaiveDate) -> String {
    let mut out = format!(
        "✅ *Daily summary*\n\n*Date:* {}\n\n",
        date.format("%d.%m.%Y")
    );
    for (name, balance) in balances.iter() {
        let _ = writeln!(
            out,
            "• *{}*: Total: {}$ | Daily: +{}$",
            display_name(name),
            money(balance.total),
            money(balance.daily)
        );
    }
    out
}

/// `/set_rate` reply, by where the new total landed.
#[must_use]
pub fn rate_change(change: &RateChange) -> String {
    match change.status {
        RateStatus::Over { total } => format!(
            "⚠️ Warning: the total rate exceeds 100% ({}%). Please adjust the other rates.",
            percent(total)
        ),
        RateStatus::Under { reserve } => format!(
            "✅ Rate for {} set to {}%. The reserve rate is now {}%.",
            change.participant,
            percent(change.rate),
            percent(reserve)
        ),
        RateStatus::Exact => format!(
            "✅ Rate for {} set to {}%. The total rate is exactly 100%.",
            change.participant,
            percent(change.rate)
        ),
    }
}

fn daily_lines(out: &mut String, balances: &BalanceSheet) {
    for (name, balance) in balances.iter() {
        let _ = writeln!(out, "• *{}*: +{}$", display_name(name), money(balance.daily));
    }
}
