// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::MonthlySummary;
use crate::period::Period;

const WINDOW: usize = 12;

/// Trend figures over the most recent archived months.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryStats {
    pub months: usize,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub total_extras: Decimal,
    pub average_income: Decimal,
    pub average_expenses: Decimal,
    pub income_trend: Decimal,
    pub expense_trend: Decimal,
    pub best_month: Period,
    pub worst_month: Period,
}

impl HistoryStats {
    /// `None` when nothing has been archived yet.
    pub fn compute(summaries: &[MonthlySummary]) -> Option<Self> {
        let mut window: Vec<&MonthlySummary> = summaries.iter().collect();
        window.sort_by_key(|s| s.period);
        let window = &window[window.len().saturating_sub(WINDOW)..];

        let best = window.iter().max_by_key(|s| s.net_balance)?;
        let worst = window.iter().min_by_key(|s| s.net_balance)?;

        let total_income: Decimal = window.iter().map(|s| s.total_income).sum();
        let total_expenses: Decimal = window.iter().map(|s| s.total_expenses).sum();
        let total_extras: Decimal = window.iter().map(|s| s.total_extras).sum();
        let n = Decimal::from(window.len());

        let (income_trend, expense_trend) = match window {
            [.., prev, last] => (
                last.total_income - prev.total_income,
                last.total_expenses - prev.total_expenses,
            ),
            _ => (Decimal::ZERO, Decimal::ZERO),
        };

        Some(HistoryStats {
            months: window.len(),
            total_income,
            total_expenses,
            total_extras,
            average_income: total_income / n,
            average_expenses: total_expenses / n,
            income_trend,
            expense_trend,
            best_month: best.period,
            worst_month: worst.period,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn summary(month: u32, year: i32, income: Decimal, expenses: Decimal) -> MonthlySummary {
        MonthlySummary {
            id: i64::from(month),
            period: Period::new(month, year).unwrap(),
            total_income: income,
            total_expenses: expenses,
            total_extras: Decimal::ZERO,
            das_value: dec!(67),
            income_tax_estimate: Decimal::ZERO,
            net_balance: income - expenses - dec!(67),
        }
    }

    #[test]
    fn empty_history_has_no_stats() {
        assert!(HistoryStats::compute(&[]).is_none());
    }

    #[test]
    fn trends_compare_last_two_months_chronologically() {
        // Stored newest-first, as the store returns them.
        let rows = vec![
            summary(3, 2024, dec!(4000), dec!(1000)),
            summary(2, 2024, dec!(3000), dec!(2500)),
            summary(1, 2024, dec!(5000), dec!(1500)),
        ];
        let stats = HistoryStats::compute(&rows).unwrap();
        assert_eq!(stats.months, 3);
        assert_eq!(stats.income_trend, dec!(1000));
        assert_eq!(stats.expense_trend, dec!(-1500));
        assert_eq!(stats.average_income, dec!(4000));
        assert_eq!(stats.best_month, Period::new(1, 2024).unwrap());
        assert_eq!(stats.worst_month, Period::new(2, 2024).unwrap());
    }

    #[test]
    fn only_last_twelve_months_count() {
        let mut rows = Vec::new();
        for m in 1..=12 {
            rows.push(summary(m, 2023, dec!(100), dec!(0)));
        }
        rows.push(summary(1, 2024, dec!(1300), dec!(0)));
        let stats = HistoryStats::compute(&rows).unwrap();
        assert_eq!(stats.months, 12);
        assert_eq!(stats.total_income, dec!(2400));
    }
}
