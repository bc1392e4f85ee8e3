// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{MeiError, MeiResult};
use crate::models::{CardInstallment, CardTransaction};
use crate::period::add_months;

/// One row of a purchase's payment plan, before it is persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduledInstallment {
    pub installment_number: u32,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub paid: bool,
}

/// Single-payment purchases carry no installment rows.
pub fn needs_schedule(installment_count: u32) -> bool {
    installment_count > 1
}

/// Splits `total` into `count` equal parts due monthly from `first_due`.
///
/// Installment `i` is due `i - 1` months after `first_due`. The day of month is
/// kept where the target month has it and clamped to the month's last day
/// otherwise. Amounts are a plain division with no remainder correction.
pub fn schedule(
    total: Decimal,
    count: u32,
    first_due: NaiveDate,
) -> MeiResult<Vec<ScheduledInstallment>> {
    if count < 1 {
        return Err(MeiError::validation("installment count must be at least 1"));
    }
    if total <= Decimal::ZERO {
        return Err(MeiError::validation(format!(
            "purchase amount must be greater than zero (got {})",
            total
        )));
    }
    let amount = total / Decimal::from(count);
    (1..=count)
        .map(|n| {
            Ok(ScheduledInstallment {
                installment_number: n,
                amount,
                due_date: add_months(first_due, n - 1)?,
                paid: false,
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ScheduleIssue {
    /// Installment amounts do not add up to the purchase total.
    SumMismatch { expected: Decimal, actual: Decimal },
    /// Installment numbers are not exactly `1..=N`.
    Numbering { expected: u32, found: Vec<u32> },
}

const SUM_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Checks a stored purchase against its stored installment rows.
pub fn audit(purchase: &CardTransaction, rows: &[CardInstallment]) -> Vec<ScheduleIssue> {
    if !needs_schedule(purchase.installment_count) && rows.is_empty() {
        return Vec::new();
    }
    let mut issues = Vec::new();
    let mut numbers: Vec<u32> = rows.iter().map(|r| r.installment_number).collect();
    numbers.sort_unstable();
    let expected: Vec<u32> = (1..=purchase.installment_count).collect();
    if numbers != expected {
        issues.push(ScheduleIssue::Numbering {
            expected: purchase.installment_count,
            found: numbers,
        });
    }
    let actual: Decimal = rows.iter().map(|r| r.amount).sum();
    if (actual - purchase.amount).abs() > SUM_TOLERANCE {
        issues.push(ScheduleIssue::SumMismatch {
            expected: purchase.amount,
            actual,
        });
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn three_equal_installments() {
        let plan = schedule(dec!(300.00), 3, d(2024, 1, 15)).unwrap();
        let got: Vec<_> = plan
            .iter()
            .map(|i| (i.installment_number, i.amount, i.due_date, i.paid))
            .collect();
        assert_eq!(
            got,
            vec![
                (1, dec!(100.00), d(2024, 1, 15), false),
                (2, dec!(100.00), d(2024, 2, 15), false),
                (3, dec!(100.00), d(2024, 3, 15), false),
            ]
        );
    }

    #[test]
    fn uneven_split_stays_within_a_cent() {
        let plan = schedule(dec!(100), 3, d(2024, 5, 1)).unwrap();
        let sum: Decimal = plan.iter().map(|i| i.amount).sum();
        assert!((sum - dec!(100)).abs() < dec!(0.01));
        assert_eq!(plan[0].amount.round_dp(2), dec!(33.33));
    }

    #[test]
    fn end_of_month_due_dates_are_clamped() {
        let plan = schedule(dec!(90), 3, d(2024, 1, 31)).unwrap();
        let dates: Vec<_> = plan.iter().map(|i| i.due_date).collect();
        assert_eq!(dates, vec![d(2024, 1, 31), d(2024, 2, 29), d(2024, 3, 31)]);
    }

    #[test]
    fn schedule_crosses_year_boundary() {
        let plan = schedule(dec!(40), 4, d(2024, 11, 10)).unwrap();
        assert_eq!(plan[3].due_date, d(2025, 2, 10));
    }

    #[test]
    fn rejects_zero_count_and_non_positive_total() {
        assert!(schedule(dec!(10), 0, d(2024, 1, 1)).is_err());
        assert!(schedule(dec!(0), 2, d(2024, 1, 1)).is_err());
        assert!(!needs_schedule(1));
        assert!(needs_schedule(2));
    }

    #[test]
    fn audit_flags_missing_installment() {
        let purchase = CardTransaction {
            id: 7,
            card_id: 1,
            description: "Notebook".into(),
            amount: dec!(300),
            installment_count: 3,
            first_installment_date: d(2024, 1, 15),
            category: "Equipment".into(),
        };
        let rows: Vec<CardInstallment> = schedule(purchase.amount, 3, purchase.first_installment_date)
            .unwrap()
            .into_iter()
            .take(2)
            .enumerate()
            .map(|(idx, s)| CardInstallment {
                id: idx as i64 + 1,
                card_transaction_id: 7,
                installment_number: s.installment_number,
                amount: s.amount,
                due_date: s.due_date,
                paid: false,
            })
            .collect();
        let issues = audit(&purchase, &rows);
        assert_eq!(issues.len(), 2);
        assert!(matches!(issues[0], ScheduleIssue::Numbering { expected: 3, .. }));
        assert!(matches!(issues[1], ScheduleIssue::SumMismatch { .. }));
    }
}
