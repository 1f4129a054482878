//! The closed set of named participants.
//!
//! Validation of user-supplied names happens against this enum, never
//! against whatever rows happen to exist in storage.

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::LedgerError;

/// A named participant that holds an allocation rate.
///
/// The reserve is not a variant: it has no rate of its own and
/// is addressed by [`RESERVE`](crate::constants::RESERVE).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Participant {
    Butch,
    Jules,
    Vincent,
}

impl Participant {
    /// Every participant, in seeding order.
    pub const ALL: [Self; 3] = [Self::Butch, Self::Jules, Self::Vincent];

    /// Lowercase storage key.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Butch => "butch",
            Self::Jules => "jules",
            Self::Vincent => "vincent",
        }
    }

    /// Rate (percent) written when the store is first initialised.
    #[must_use]
    pub fn default_rate(self) -> Decimal {
        match self {
            Self::Butch => Decimal::new(30, 0),
            Self::Jules | Self::Vincent => Decimal::new(20, 0),
        }
    }

    /// Comma separated list of accepted names, for rejection messages.
    #[must_use]
    pub fn valid_names() -> String {
        Self::ALL
            .iter()
            .map(|p| p.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Participant {
    type Err = LedgerError;

    /// Case-insensitive lookup.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.name() == lower)
            .ok_or(LedgerError::UnknownParticipant(lower))
    }
}

/// Capitalise an account name for display (`butch` -> `Butch`).
#[must_use]
pub fn display_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
