//! The two balances a character carries.
//!
//! Gold is stored as signed integer **minor units** (hundredths of a gold
//! piece) to avoid floating point drift; downtime is stored in whole days.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Gold,
    Downtime,
}

impl Resource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gold => "gold",
            Self::Downtime => "downtime",
        }
    }

    /// Human readable amount: `12.34 gp` or `3 days`.
    pub fn format(self, amount: i64) -> String {
        match self {
            Self::Gold => {
                let sign = if amount < 0 { "-" } else { "" };
                let abs = amount.unsigned_abs();
                format!("{sign}{}.{:02} gp", abs / 100, abs % 100)
            }
            Self::Downtime if amount.abs() == 1 => format!("{amount} day"),
            Self::Downtime => format!("{amount} days"),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Resource {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "gold" => Ok(Self::Gold),
            "downtime" => Ok(Self::Downtime),
            other => Err(EngineError::InvalidValue(format!(
                "invalid resource: {other}"
            ))),
        }
    }
}

/// Snapshot of a character's balances.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    pub gold_minor: i64,
    pub downtime: i64,
}

impl Ledger {
    pub fn get(&self, resource: Resource) -> i64 {
        match resource {
            Resource::Gold => self.gold_minor,
            Resource::Downtime => self.downtime,
        }
    }
}

/// A signed change of one resource. Negative values are costs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Delta {
    pub resource: Resource,
    pub amount: i64,
}

impl Delta {
    pub fn gold(amount: i64) -> Self {
        Self {
            resource: Resource::Gold,
            amount,
        }
    }

    pub fn downtime(amount: i64) -> Self {
        Self {
            resource: Resource::Downtime,
            amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gold_is_formatted_with_two_decimals() {
        assert_eq!(Resource::Gold.format(4050), "40.50 gp");
        assert_eq!(Resource::Gold.format(-7), "-0.07 gp");
    }

    #[test]
    fn ledger_reads_by_resource() {
        let ledger = Ledger {
            gold_minor: 100,
            downtime: 3,
        };
        assert_eq!(ledger.get(Resource::Gold), 100);
        assert_eq!(ledger.get(Resource::Downtime), 3);
    }

    #[test]
    fn unknown_resource_is_rejected() {
        assert!(Resource::try_from("silver").is_err());
        assert_eq!(Resource::try_from("downtime").ok(), Some(Resource::Downtime));
    }
}
