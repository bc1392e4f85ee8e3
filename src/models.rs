// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{MeiError, MeiResult};
use crate::period::Period;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    Income,
    Expense,
}

impl TxKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxKind::Income => "income",
            TxKind::Expense => "expense",
        }
    }
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxKind {
    type Err = MeiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TxKind::Income),
            "expense" => Ok(TxKind::Expense),
            other => Err(MeiError::validation(format!(
                "unknown transaction kind '{}' (use income|expense)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub kind: TxKind,
    pub category: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub description: String,
    pub is_recurring: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub kind: TxKind,
    pub category: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub description: String,
    pub is_recurring: bool,
}

impl NewTransaction {
    pub fn validate(&self) -> MeiResult<()> {
        require_text("description", &self.description)?;
        require_non_negative("amount", self.amount)?;
        Period::checked_of(self.date)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraIncome {
    pub id: i64,
    pub amount: Decimal,
    pub description: String,
    pub date: NaiveDate,
    pub period: Period,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExtraIncome {
    pub amount: Decimal,
    pub description: String,
    pub date: NaiveDate,
    pub period: Period,
}

impl NewExtraIncome {
    /// Extra income booked in the month of its date.
    pub fn dated(amount: Decimal, description: impl Into<String>, date: NaiveDate) -> Self {
        NewExtraIncome {
            amount,
            description: description.into(),
            date,
            period: Period::of(date),
        }
    }

    pub fn validate(&self) -> MeiResult<()> {
        require_text("description", &self.description)?;
        require_non_negative("amount", self.amount)?;
        Period::checked_of(self.date)?;
        Period::checked_of(self.period.start())?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySettings {
    pub id: i64,
    pub period: Period,
    pub das_value: Decimal,
}

/// Archived snapshot of one month's totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub id: i64,
    pub period: Period,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub total_extras: Decimal,
    pub das_value: Decimal,
    pub income_tax_estimate: Decimal,
    pub net_balance: Decimal,
}

impl MonthlySummary {
    pub fn status(&self) -> &'static str {
        if self.net_balance >= Decimal::ZERO {
            "Positive"
        } else {
            "Negative"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySaving {
    pub id: i64,
    pub period: Period,
    pub amount: Decimal,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalSavings {
    pub total_accumulated: Decimal,
    pub months_count: u32,
    pub average_per_month: Decimal,
    pub last_update: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub id: i64,
    pub title: String,
    pub target_amount: Decimal,
    pub deadline: NaiveDate,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSavingsGoal {
    pub title: String,
    pub target_amount: Decimal,
    pub deadline: NaiveDate,
    pub description: Option<String>,
}

impl NewSavingsGoal {
    pub fn validate(&self) -> MeiResult<()> {
        require_text("title", &self.title)?;
        require_positive("target amount", self.target_amount)?;
        Period::checked_of(self.deadline)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditCard {
    pub id: i64,
    pub name: String,
    pub credit_limit: Decimal,
    pub closing_day: u32,
    pub due_day: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCreditCard {
    pub name: String,
    pub credit_limit: Decimal,
    pub closing_day: u32,
    pub due_day: u32,
}

impl NewCreditCard {
    pub fn validate(&self) -> MeiResult<()> {
        require_text("name", &self.name)?;
        require_positive("credit limit", self.credit_limit)?;
        require_day("closing day", self.closing_day)?;
        require_day("due day", self.due_day)
    }
}

/// Partial update of a card; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardPatch {
    pub name: Option<String>,
    pub credit_limit: Option<Decimal>,
    pub closing_day: Option<u32>,
    pub due_day: Option<u32>,
}

impl CardPatch {
    pub fn apply(&self, card: &CreditCard) -> NewCreditCard {
        NewCreditCard {
            name: self.name.clone().unwrap_or_else(|| card.name.clone()),
            credit_limit: self.credit_limit.unwrap_or(card.credit_limit),
            closing_day: self.closing_day.unwrap_or(card.closing_day),
            due_day: self.due_day.unwrap_or(card.due_day),
        }
    }
}

/// A card purchase. `amount` is the whole purchase, not one installment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardTransaction {
    pub id: i64,
    pub card_id: i64,
    pub description: String,
    pub amount: Decimal,
    pub installment_count: u32,
    pub first_installment_date: NaiveDate,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCardTransaction {
    pub card_id: i64,
    pub description: String,
    pub amount: Decimal,
    pub installment_count: u32,
    pub first_installment_date: NaiveDate,
    pub category: String,
}

impl NewCardTransaction {
    pub fn validate(&self) -> MeiResult<()> {
        require_text("description", &self.description)?;
        require_positive("amount", self.amount)?;
        if self.installment_count < 1 {
            return Err(MeiError::validation("installment count must be at least 1"));
        }
        Period::checked_of(self.first_installment_date)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardInstallment {
    pub id: i64,
    pub card_transaction_id: i64,
    pub installment_number: u32,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub paid: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardSummary {
    pub card: CreditCard,
    pub current_balance: Decimal,
    pub available_limit: Decimal,
    pub next_due_date: Option<NaiveDate>,
    pub next_due_amount: Decimal,
    pub transactions_count: usize,
    pub total_spent: Decimal,
}

fn require_text(field: &str, value: &str) -> MeiResult<()> {
    if value.trim().is_empty() {
        return Err(MeiError::validation(format!("{} is required", field)));
    }
    Ok(())
}

/// Largest money value accepted anywhere in the book (10^15). Keeps yearly
/// projections and sums far inside `Decimal`'s range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

fn require_within_max(field: &str, value: Decimal) -> MeiResult<()> {
    if value > MAX_AMOUNT {
        return Err(MeiError::validation(format!(
            "{} must not exceed {} (got {})",
            field, MAX_AMOUNT, value
        )));
    }
    Ok(())
}

/// Zero or more, up to [`MAX_AMOUNT`].
pub fn require_non_negative(field: &str, value: Decimal) -> MeiResult<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(MeiError::validation(format!(
            "{} must not be negative (got {})",
            field, value
        )));
    }
    require_within_max(field, value)
}

fn require_positive(field: &str, value: Decimal) -> MeiResult<()> {
    if value <= Decimal::ZERO {
        return Err(MeiError::validation(format!(
            "{} must be greater than zero (got {})",
            field, value
        )));
    }
    require_within_max(field, value)
}

fn require_day(field: &str, day: u32) -> MeiResult<()> {
    if !(1..=31).contains(&day) {
        return Err(MeiError::validation(format!(
            "{} must be between 1 and 31 (got {})",
            field, day
        )));
    }
    Ok(())
}
