//! Slash-command parsing.
//!
//! `/add 100`, `/set_rate@profit_bot butch 35`. Command names match
//! case-insensitively; arguments are whitespace separated and kept verbatim.

use std::{fmt, str::FromStr};

/// The commands the bot answers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Start,
    Help,
    Add,
    Stats,
    Morning,
    Finish,
    SetRate,
}

impl CommandKind {
    pub const ALL: [Self; 7] = [
        Self::Start,
        Self::Help,
        Self::Add,
        Self::Stats,
        Self::Morning,
        Self::Finish,
        Self::SetRate,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Help => "help",
            Self::Add => "add",
            Self::Stats => "stats",
            Self::Morning => "morning",
            Self::Finish => "finish",
            Self::SetRate => "set_rate",
        }
    }

    /// Commands that mutate the ledger and require an admin caller.
    #[must_use]
    pub fn requires_admin(self) -> bool {
        matches!(
            self,
            Self::Add | Self::Morning | Self::Finish | Self::SetRate
        )
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.name())
    }
}

impl FromStr for CommandKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.name() == lower)
            .ok_or(())
    }
}

/// A parsed command with its raw arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub kind: CommandKind,
    pub args: Vec<String>,
}

impl Command {
    /// Parse message text.
    ///
    /// Returns `None` for plain text, unknown commands, and commands
    /// addressed to a different bot (`/add@other_bot`). When `bot_username`
    /// is `None` any `@` suffix is accepted.
    #[must_use]
    pub fn parse(text: &str, bot_username: Option<&str>) -> Option<Self> {
        let mut tokens = text.split_whitespace();
        let head = tokens.next()?.strip_prefix('/')?;

        let name = match head.split_once('@') {
            Some((name, target)) => {
                if let Some(me) = bot_username {
                    if !target.eq_ignore_ascii_case(me) {
                        return None;
                    }
                }
                name
            }
            None => head,
        };

        let kind = name.parse().ok()?;
        Some(Self {
            kind,
            args: tokens.map(str::to_string).collect(),
        })
    }

    pub fn new(kind: CommandKind, args: &[&str]) -> Self {
        Self {
            kind,
            args: args.iter().map(|a| (*a).to_string()).collect(),
        }
    }
}
