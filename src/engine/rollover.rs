// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::Datelike;

use crate::models::{NewTransaction, Transaction};
use crate::period::Period;

/// Copies of `period`'s recurring transactions, dated on the same day of the
/// following month (clamped to that month's length).
pub fn carry_forward(period: Period, transactions: &[Transaction]) -> Vec<NewTransaction> {
    let target = period.next();
    transactions
        .iter()
        .filter(|t| t.is_recurring && period.contains(t.date))
        .map(|t| NewTransaction {
            kind: t.kind,
            category: t.category.clone(),
            amount: t.amount,
            date: target.day_clamped(t.date.day()),
            description: t.description.clone(),
            is_recurring: t.is_recurring,
        })
        .collect()
}
