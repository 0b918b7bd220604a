//! The core transaction model: categories, the hourly-rate table for HR
//! expenses, and validation of new transactions.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::Error;

/// The ID of a transaction within a user's record.
pub type TransactionId = u64;

/// The category of a transaction.
///
/// The first three are expenses, the rest income. Meals and HR carry extra
/// detail (people count, hours and role) used for allowance checks and
/// amount computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Meal expenses, subject to the per-person daily allowance.
    Meals,
    /// Hourly labour, priced from the role rate table.
    Hr,
    /// Any other expense.
    OtherExpense,
    /// Income from services rendered.
    ServiceIncome,
    /// Income received from a collaborator.
    CollaboratorIncome,
    /// Any other income.
    OtherIncome,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 6] = [
        Category::Meals,
        Category::Hr,
        Category::OtherExpense,
        Category::ServiceIncome,
        Category::CollaboratorIncome,
        Category::OtherIncome,
    ];

    /// Whether transactions in this category are income.
    pub fn is_income(self) -> bool {
        matches!(
            self,
            Category::ServiceIncome | Category::CollaboratorIncome | Category::OtherIncome
        )
    }

    /// Whether transactions in this category are expenses.
    pub fn is_expense(self) -> bool {
        !self.is_income()
    }

    /// The category name for display.
    pub fn label(self) -> &'static str {
        match self {
            Category::Meals => "Meals",
            Category::Hr => "HR",
            Category::OtherExpense => "Other expense",
            Category::ServiceIncome => "Service income",
            Category::CollaboratorIncome => "Collaborator income",
            Category::OtherIncome => "Other income",
        }
    }

    /// The form/serde value for this category, e.g. "other-expense".
    pub fn form_value(self) -> &'static str {
        match self {
            Category::Meals => "meals",
            Category::Hr => "hr",
            Category::OtherExpense => "other-expense",
            Category::ServiceIncome => "service-income",
            Category::CollaboratorIncome => "collaborator-income",
            Category::OtherIncome => "other-income",
        }
    }

    /// "Income" or "Expense", as used in the CSV export.
    pub fn kind_label(self) -> &'static str {
        if self.is_income() { "Income" } else { "Expense" }
    }
}

/// The hourly rates in euros for each HR role.
pub const HR_RATES: &[(&str, f64)] = &[
    ("junior", 35.0),
    ("senior", 40.0),
    ("junior-overtime", 40.0),
    ("senior-overtime", 50.0),
    ("driver", 55.0),
    ("driver-overtime", 65.0),
    ("monitor", 35.0),
    ("operator", 40.0),
    ("painting", 55.0),
    ("painting-kit", 65.0),
    ("balloons", 45.0),
    ("balloons-kit", 55.0),
    ("entertainer", 80.0),
];

/// Look up the hourly rate for an HR role.
pub fn hourly_rate(role: &str) -> Option<f64> {
    HR_RATES
        .iter()
        .find(|(name, _)| *name == role)
        .map(|(_, rate)| *rate)
}

/// Round a currency amount to two decimal places.
pub fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// An expense or income recorded against the current reporting period.
///
/// Transactions are created via [TransactionDraft::validate] so that invalid
/// input is rejected before it is stored. Once a transaction is archived
/// into history it is never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction, unique within one user's record.
    pub id: TransactionId,
    /// When the transaction happened.
    pub date: Date,
    /// The category the transaction belongs to.
    pub category: Category,
    /// The amount of money spent or earned, always positive, in whole cents.
    pub amount: f64,
    /// A free-text note describing the transaction.
    pub note: String,
    /// For meal expenses, the number of people the meal covered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub people: Option<u32>,
    /// For HR expenses, the number of hours worked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<f64>,
    /// For HR expenses, the role worked, e.g. "senior".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Transaction {
    /// For meal expenses, the amount spent per person.
    pub fn amount_per_person(&self) -> Option<f64> {
        match self.people {
            Some(people) if people > 0 => Some(self.amount / people as f64),
            _ => None,
        }
    }
}

/// User input for a new transaction, prior to validation.
///
/// Call [TransactionDraft::validate] to check the input and compute the
/// final amount. The draft has no ID; one is assigned when the transaction
/// is added to a [crate::record::UserRecord].
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    /// When the transaction happened. Must not be in the future.
    pub date: Date,
    /// The category the transaction belongs to.
    pub category: Category,
    /// The amount entered by the user.
    ///
    /// For meal expenses this is the amount per person; for HR expenses it
    /// is ignored and recomputed as hours times the role's hourly rate.
    pub amount: f64,
    /// A free-text note. Required for the catch-all "other" categories.
    pub note: String,
    /// The number of people a meal covered. Required for meal expenses.
    pub people: Option<u32>,
    /// The hours worked. Required for HR expenses.
    pub hours: Option<f64>,
    /// The role worked. Required for HR expenses.
    pub role: Option<String>,
}

impl TransactionDraft {
    /// Validate the draft against `today` and produce the final field values.
    ///
    /// For meal expenses the stored amount is the per-person amount times the
    /// people count. For HR expenses the stored amount is hours times the
    /// role's hourly rate. All amounts are rounded to whole cents.
    ///
    /// # Errors
    /// Returns a:
    /// - [Error::FutureDate] if the date is after `today`,
    /// - [Error::InvalidAmount] if the amount is not a positive number,
    /// - [Error::MissingPeopleCount] for a meal expense without a people count,
    /// - [Error::InvalidHours] for an HR expense without positive hours,
    /// - [Error::UnknownRole] for an HR expense with a role not in [HR_RATES],
    /// - [Error::EmptyNote] for an "other" transaction with a blank note.
    pub fn validate(mut self, today: Date) -> Result<ValidTransaction, Error> {
        if self.date > today {
            return Err(Error::FutureDate(self.date));
        }

        self.note = self.note.trim().to_owned();

        let amount = match self.category {
            Category::Meals => {
                let people = match self.people {
                    Some(people) if people > 0 => people,
                    _ => return Err(Error::MissingPeopleCount),
                };
                let per_person = positive_amount(self.amount)?;

                self.people = Some(people);
                self.hours = None;
                self.role = None;
                round_to_cents(per_person * people as f64)
            }
            Category::Hr => {
                let hours = match self.hours {
                    Some(hours) if hours > 0.0 && hours.is_finite() => hours,
                    _ => return Err(Error::InvalidHours),
                };
                let role = self.role.as_deref().unwrap_or_default().trim().to_owned();
                let rate = hourly_rate(&role).ok_or_else(|| Error::UnknownRole(role.clone()))?;

                self.people = None;
                self.hours = Some(hours);
                self.role = Some(role);
                round_to_cents(hours * rate)
            }
            Category::OtherExpense | Category::OtherIncome => {
                if self.note.is_empty() {
                    return Err(Error::EmptyNote);
                }

                self.people = None;
                self.hours = None;
                self.role = None;
                round_to_cents(positive_amount(self.amount)?)
            }
            Category::ServiceIncome | Category::CollaboratorIncome => {
                self.people = None;
                self.hours = None;
                self.role = None;
                round_to_cents(positive_amount(self.amount)?)
            }
        };

        if amount <= 0.0 {
            return Err(Error::InvalidAmount(self.amount));
        }

        Ok(ValidTransaction {
            date: self.date,
            category: self.category,
            amount,
            note: self.note,
            people: self.people,
            hours: self.hours,
            role: self.role,
        })
    }
}

/// A validated transaction waiting for an ID.
///
/// Produced only by [TransactionDraft::validate].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidTransaction {
    pub(crate) date: Date,
    pub(crate) category: Category,
    pub(crate) amount: f64,
    pub(crate) note: String,
    pub(crate) people: Option<u32>,
    pub(crate) hours: Option<f64>,
    pub(crate) role: Option<String>,
}

impl ValidTransaction {
    /// Attach an ID, turning the validated input into a stored transaction.
    pub(crate) fn with_id(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            date: self.date,
            category: self.category,
            amount: self.amount,
            note: self.note,
            people: self.people,
            hours: self.hours,
            role: self.role,
        }
    }
}

fn positive_amount(amount: f64) -> Result<f64, Error> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(Error::InvalidAmount(amount))
    }
}
