//! The per-user record: the working transaction set for the current period,
//! the archived report history, and user settings.
//!
//! A [UserRecord] is the unit of persistence. The whole record is loaded and
//! saved through a [crate::store::UserDataStore], so every field tolerates
//! being absent in older persisted data.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    period::Period,
    transaction::{Transaction, TransactionId, ValidTransaction},
};

/// The default per-person daily meal allowance in euros.
pub const DEFAULT_MEAL_ALLOWANCE: f64 = 12.0;

/// A validated username, safe to use as a persistence key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Create a username from user input.
    ///
    /// Usernames are lowercased and may only contain ASCII letters, digits,
    /// hyphens and underscores, at most 32 characters. This keeps them safe
    /// to embed in file paths.
    ///
    /// # Errors
    /// Returns [Error::InvalidUsername] if the input is empty, too long, or
    /// contains other characters.
    pub fn new(raw: &str) -> Result<Self, Error> {
        let name = raw.trim().to_ascii_lowercase();

        let is_valid = !name.is_empty()
            && name.len() <= 32
            && name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');

        if is_valid {
            Ok(Self(name))
        } else {
            Err(Error::InvalidUsername(raw.to_owned()))
        }
    }

    /// The username as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Username {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Per-user settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    /// The per-person daily meal allowance in euros.
    #[serde(default = "default_meal_allowance")]
    pub meal_allowance: f64,
    /// The start date of the user's first reporting period, if they have
    /// chosen one. Purely informational; period boundaries are always
    /// Monday-aligned.
    #[serde(default)]
    pub period_anchor: Option<Date>,
}

fn default_meal_allowance() -> f64 {
    DEFAULT_MEAL_ALLOWANCE
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            meal_allowance: DEFAULT_MEAL_ALLOWANCE,
            period_anchor: None,
        }
    }
}

/// A submitted weekly report, kept in the user's history.
///
/// Archived transactions are never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchivedReport {
    /// The reporting week the transactions belong to.
    pub period: Period,
    /// The date the report was submitted.
    pub submitted_on: Date,
    /// Whether the report was submitted after the period ended.
    pub is_late: bool,
    /// The transactions captured by this report.
    pub transactions: Vec<Transaction>,
}

/// Everything persisted for a single user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    /// The working set: transactions recorded since the last submission.
    #[serde(default)]
    pub(crate) transactions: Vec<Transaction>,
    /// Submitted reports, oldest first.
    #[serde(default)]
    pub(crate) history: Vec<ArchivedReport>,
    /// The user's settings.
    #[serde(default)]
    pub settings: UserSettings,
    /// The last transaction ID handed out.
    #[serde(default)]
    pub(crate) last_id: TransactionId,
}

impl UserRecord {
    /// The current working set, in insertion order.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// The submitted reports, oldest first.
    pub fn history(&self) -> &[ArchivedReport] {
        &self.history
    }

    /// Add a validated transaction to the working set and assign it an ID.
    pub fn add_transaction(&mut self, transaction: ValidTransaction) -> &Transaction {
        self.last_id += 1;
        self.transactions.push(transaction.with_id(self.last_id));

        self.transactions
            .last()
            .unwrap_or_else(|| unreachable!("transaction was just pushed"))
    }

    /// Remove a transaction from the working set.
    ///
    /// Archived transactions cannot be removed.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if no transaction in the working set has
    /// the given ID.
    pub fn remove_transaction(&mut self, id: TransactionId) -> Result<Transaction, Error> {
        let index = self
            .transactions
            .iter()
            .position(|transaction| transaction.id == id)
            .ok_or(Error::NotFound)?;

        Ok(self.transactions.remove(index))
    }
}
