//! Aggregation of the working transaction set into the weekly report
//! summary: per-category subtotals, totals, the expense breakdown for the
//! pie chart, and meal-allowance flags.
//!
//! Everything in this module is a pure function of its input.

use std::collections::HashMap;

use time::Date;

use crate::transaction::{Category, Transaction};

/// The subtotal for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: f64,
}

/// One slice of the expense pie: a category's share of the total expense.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseSlice {
    pub category: Category,
    pub amount: f64,
    /// Percentage of the total expense, in the range 0 to 100.
    pub share: f64,
}

/// A day whose combined per-person meal spend exceeded the allowance.
///
/// Flags never alter the recorded amounts; they are surfaced on the report
/// for the reviewer to judge.
#[derive(Debug, Clone, PartialEq)]
pub struct MealAllowanceFlag {
    pub date: Date,
    /// The combined per-person meal spend for the day.
    pub per_person: f64,
    /// The allowance the spend was checked against.
    pub allowance: f64,
}

/// The aggregated weekly report.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReportSummary {
    /// Expense subtotals in [Category::ALL] order, non-zero entries only.
    pub expense_totals: Vec<CategoryTotal>,
    /// Income subtotals in [Category::ALL] order, non-zero entries only.
    pub income_totals: Vec<CategoryTotal>,
    pub total_expense: f64,
    pub total_income: f64,
    /// Income minus expense.
    pub net: f64,
    /// The expense pie breakdown. Empty when there are no expenses.
    pub expense_breakdown: Vec<ExpenseSlice>,
    /// Days where the per-person meal spend exceeded the allowance.
    pub meal_flags: Vec<MealAllowanceFlag>,
}

/// Aggregate `transactions` into a [ReportSummary].
///
/// The grand totals are computed by summing the category subtotals, so the
/// invariant `total_expense + total_income == sum of all subtotals` holds
/// exactly, not merely up to floating point reordering.
pub fn summarise(transactions: &[Transaction], meal_allowance: f64) -> ReportSummary {
    let mut totals: HashMap<Category, f64> = HashMap::new();

    for transaction in transactions {
        *totals.entry(transaction.category).or_insert(0.0) += transaction.amount;
    }

    let mut expense_totals = Vec::new();
    let mut income_totals = Vec::new();

    for category in Category::ALL {
        let Some(&total) = totals.get(&category) else {
            continue;
        };

        let entry = CategoryTotal { category, total };
        if category.is_expense() {
            expense_totals.push(entry);
        } else {
            income_totals.push(entry);
        }
    }

    let total_expense: f64 = expense_totals.iter().map(|entry| entry.total).sum();
    let total_income: f64 = income_totals.iter().map(|entry| entry.total).sum();

    let expense_breakdown = if total_expense > 0.0 {
        expense_totals
            .iter()
            .map(|entry| ExpenseSlice {
                category: entry.category,
                amount: entry.total,
                share: entry.total / total_expense * 100.0,
            })
            .collect()
    } else {
        Vec::new()
    };

    ReportSummary {
        expense_totals,
        income_totals,
        total_expense,
        total_income,
        net: total_income - total_expense,
        expense_breakdown,
        meal_flags: meal_allowance_flags(transactions, meal_allowance),
    }
}

/// Find the days whose combined per-person meal spend exceeds `allowance`.
///
/// The per-person spend for a day is the sum over that day's meal
/// transactions of amount divided by people count. Days are returned in
/// chronological order.
fn meal_allowance_flags(transactions: &[Transaction], allowance: f64) -> Vec<MealAllowanceFlag> {
    let mut per_person_by_day: HashMap<Date, f64> = HashMap::new();

    for transaction in transactions {
        if transaction.category != Category::Meals {
            continue;
        }

        if let Some(per_person) = transaction.amount_per_person() {
            *per_person_by_day.entry(transaction.date).or_insert(0.0) += per_person;
        }
    }

    let mut flags: Vec<MealAllowanceFlag> = per_person_by_day
        .into_iter()
        .filter(|(_, per_person)| *per_person > allowance)
        .map(|(date, per_person)| MealAllowanceFlag {
            date,
            per_person,
            allowance,
        })
        .collect();

    flags.sort_by_key(|flag| flag.date);

    flags
}
