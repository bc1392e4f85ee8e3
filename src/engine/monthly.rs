// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Month totals, the archived summary row, and the dashboard projection.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::MeiError;
use crate::models::{ExtraIncome, MonthlySummary, Transaction, TxKind};
use crate::period::Period;

/// DAS charged when a month has no settings row.
pub const DEFAULT_DAS: Decimal = Decimal::from_parts(6700, 0, 0, false, 2);
/// Annual income below which no income tax is owed.
pub const IR_EXEMPTION: Decimal = Decimal::from_parts(2_855_970, 0, 0, false, 2);
pub const IR_RATE: Decimal = Decimal::from_parts(75, 0, 0, false, 3);
pub const LOW_BALANCE_THRESHOLD: Decimal = Decimal::from_parts(500, 0, 0, false, 0);
const SUGGESTED_RESERVE_RATE: Decimal = Decimal::from_parts(20, 0, 0, false, 2);
const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);
const HUNDRED: Decimal = Decimal::from_parts(100, 0, 0, false, 0);
pub const DAS_DUE_DAY: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncomeTaxMode {
    /// Archive rows carry a zero estimate.
    #[default]
    Off,
    /// `(income × 12 − exemption) × rate` when above the exemption.
    Annualized,
}

impl IncomeTaxMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncomeTaxMode::Off => "off",
            IncomeTaxMode::Annualized => "annualized",
        }
    }
}

impl fmt::Display for IncomeTaxMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IncomeTaxMode {
    type Err = MeiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "off" => Ok(IncomeTaxMode::Off),
            "annualized" => Ok(IncomeTaxMode::Annualized),
            other => Err(MeiError::validation(format!(
                "unknown income tax mode '{}' (use off|annualized)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TaxPolicy {
    pub mode: IncomeTaxMode,
    pub exemption: Decimal,
    pub rate: Decimal,
}

impl Default for TaxPolicy {
    fn default() -> Self {
        TaxPolicy {
            mode: IncomeTaxMode::Off,
            exemption: IR_EXEMPTION,
            rate: IR_RATE,
        }
    }
}

impl TaxPolicy {
    pub fn annual_income(monthly_income: Decimal) -> Decimal {
        monthly_income * MONTHS_PER_YEAR
    }

    /// Simplified monthly income tax estimate, regardless of `mode`.
    pub fn estimate(&self, monthly_income: Decimal) -> Decimal {
        let annual = Self::annual_income(monthly_income);
        if annual > self.exemption {
            (annual - self.exemption) * self.rate
        } else {
            Decimal::ZERO
        }
    }

    /// The figure stored on archive rows.
    pub fn archived_estimate(&self, monthly_income: Decimal) -> Decimal {
        match self.mode {
            IncomeTaxMode::Off => Decimal::ZERO,
            IncomeTaxMode::Annualized => self.estimate(monthly_income),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthTotals {
    pub period: Period,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub total_extras: Decimal,
    pub recurring_expenses: Decimal,
    pub das_value: Decimal,
}

impl MonthTotals {
    /// Sums the rows that fall inside `period`; rows outside it are ignored.
    pub fn compute(
        period: Period,
        transactions: &[Transaction],
        extras: &[ExtraIncome],
        das_value: Decimal,
    ) -> Self {
        let mut totals = MonthTotals {
            period,
            total_income: Decimal::ZERO,
            total_expenses: Decimal::ZERO,
            total_extras: Decimal::ZERO,
            recurring_expenses: Decimal::ZERO,
            das_value,
        };
        for t in transactions.iter().filter(|t| period.contains(t.date)) {
            match t.kind {
                TxKind::Income => totals.total_income += t.amount,
                TxKind::Expense => {
                    totals.total_expenses += t.amount;
                    if t.is_recurring {
                        totals.recurring_expenses += t.amount;
                    }
                }
            }
        }
        totals.total_extras = extras
            .iter()
            .filter(|e| e.period == period)
            .map(|e| e.amount)
            .sum();
        totals
    }

    pub fn income_with_extras(&self) -> Decimal {
        self.total_income + self.total_extras
    }

    pub fn net_balance(&self) -> Decimal {
        self.total_income + self.total_extras - self.total_expenses - self.das_value
    }

    /// Archive row for this month; `id` is assigned by the store.
    pub fn to_summary(&self, policy: &TaxPolicy) -> MonthlySummary {
        MonthlySummary {
            id: 0,
            period: self.period,
            total_income: self.total_income,
            total_expenses: self.total_expenses,
            total_extras: self.total_extras,
            das_value: self.das_value,
            income_tax_estimate: policy.archived_estimate(self.income_with_extras()),
            net_balance: self.net_balance(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Alert {
    AboveIrExemption { projected_annual: Decimal },
    LowBalance { net_balance: Decimal },
    ExtrasReceived { total: Decimal },
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alert::AboveIrExemption { projected_annual } => write!(
                f,
                "Projected annual income {:.2} is above the income tax exemption; prepare to declare",
                projected_annual
            ),
            Alert::LowBalance { net_balance } => write!(
                f,
                "Low monthly balance ({:.2}); consider reviewing expenses",
                net_balance
            ),
            Alert::ExtrasReceived { total } => {
                write!(f, "You received {:.2} in extra income this month", total)
            }
        }
    }
}

/// Cash-flow view of a month as shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub totals: MonthTotals,
    pub net_balance: Decimal,
    pub das_due_date: NaiveDate,
    pub fixed_expenses: Decimal,
    /// Share of income-with-extras taken by fixed expenses, in percent.
    pub fixed_coverage_pct: Option<Decimal>,
    pub leftover_after_fixed: Decimal,
    pub suggested_reserve: Decimal,
    pub available_for_variable: Decimal,
    pub projected_annual_income: Decimal,
    pub income_tax_estimate: Decimal,
    pub alerts: Vec<Alert>,
}

impl Projection {
    pub fn new(totals: MonthTotals, policy: &TaxPolicy, low_balance_threshold: Decimal) -> Self {
        let income = totals.income_with_extras();
        let net_balance = totals.net_balance();
        let fixed_expenses = totals.recurring_expenses + totals.das_value;
        let fixed_coverage_pct = if income.is_zero() {
            None
        } else {
            Some((fixed_expenses / income * HUNDRED).round_dp(1))
        };
        let leftover_after_fixed = income - fixed_expenses;
        let suggested_reserve = income * SUGGESTED_RESERVE_RATE;
        let projected_annual_income = TaxPolicy::annual_income(income);

        let mut alerts = Vec::new();
        if projected_annual_income > policy.exemption {
            alerts.push(Alert::AboveIrExemption {
                projected_annual: projected_annual_income,
            });
        }
        if net_balance < low_balance_threshold {
            alerts.push(Alert::LowBalance { net_balance });
        }
        if totals.total_extras > Decimal::ZERO {
            alerts.push(Alert::ExtrasReceived {
                total: totals.total_extras,
            });
        }

        Projection {
            das_due_date: totals.period.day_clamped(DAS_DUE_DAY),
            net_balance,
            fixed_expenses,
            fixed_coverage_pct,
            leftover_after_fixed,
            suggested_reserve,
            available_for_variable: leftover_after_fixed - suggested_reserve,
            projected_annual_income,
            income_tax_estimate: policy.estimate(income),
            alerts,
            totals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn tx(id: i64, kind: TxKind, amount: Decimal, date: NaiveDate, recurring: bool) -> Transaction {
        Transaction {
            id,
            kind,
            category: "General".into(),
            amount,
            date,
            description: format!("tx {}", id),
            is_recurring: recurring,
        }
    }

    fn march() -> Period {
        Period::new(3, 2024).unwrap()
    }

    #[test]
    fn march_archive_scenario() {
        let txs = vec![
            tx(1, TxKind::Income, dec!(5000), d(2024, 3, 5), false),
            tx(2, TxKind::Expense, dec!(1200), d(2024, 3, 10), false),
        ];
        let extras = vec![ExtraIncome {
            id: 1,
            amount: dec!(300),
            description: "Freela".into(),
            date: d(2024, 3, 20),
            period: march(),
        }];
        let totals = MonthTotals::compute(march(), &txs, &extras, dec!(67));
        let s = totals.to_summary(&TaxPolicy::default());
        assert_eq!(s.total_income, dec!(5000));
        assert_eq!(s.total_expenses, dec!(1200));
        assert_eq!(s.total_extras, dec!(300));
        assert_eq!(s.das_value, dec!(67));
        assert_eq!(s.net_balance, dec!(4033));
        assert_eq!(s.income_tax_estimate, Decimal::ZERO);
    }

    #[test]
    fn rows_outside_the_window_are_ignored() {
        let txs = vec![
            tx(1, TxKind::Income, dec!(100), d(2024, 2, 29), false),
            tx(2, TxKind::Income, dec!(200), d(2024, 3, 31), false),
            tx(3, TxKind::Expense, dec!(50), d(2024, 4, 1), false),
        ];
        let totals = MonthTotals::compute(march(), &txs, &[], DEFAULT_DAS);
        assert_eq!(totals.total_income, dec!(200));
        assert_eq!(totals.total_expenses, Decimal::ZERO);
        assert_eq!(totals.net_balance(), dec!(133.00));
    }

    #[test]
    fn annualized_estimate_above_exemption() {
        let policy = TaxPolicy {
            mode: IncomeTaxMode::Annualized,
            ..TaxPolicy::default()
        };
        // 5300 * 12 = 63600; (63600 - 28559.70) * 0.075 = 2628.0225
        assert_eq!(policy.archived_estimate(dec!(5300)), dec!(2628.0225));
        assert_eq!(policy.estimate(dec!(2000)), Decimal::ZERO);
        assert_eq!(TaxPolicy::default().archived_estimate(dec!(5300)), Decimal::ZERO);
    }

    #[test]
    fn projection_reports_alerts_and_reserve() {
        let txs = vec![
            tx(1, TxKind::Income, dec!(3000), d(2024, 3, 1), true),
            tx(2, TxKind::Expense, dec!(1000), d(2024, 3, 5), true),
            tx(3, TxKind::Expense, dec!(1500), d(2024, 3, 6), false),
        ];
        let extras = vec![ExtraIncome {
            id: 1,
            amount: dec!(100),
            description: "Tip".into(),
            date: d(2024, 3, 2),
            period: march(),
        }];
        let totals = MonthTotals::compute(march(), &txs, &extras, dec!(67));
        let p = Projection::new(totals, &TaxPolicy::default(), LOW_BALANCE_THRESHOLD);
        assert_eq!(p.net_balance, dec!(533));
        assert_eq!(p.fixed_expenses, dec!(1067));
        assert_eq!(p.leftover_after_fixed, dec!(2033));
        assert_eq!(p.suggested_reserve, dec!(620.00));
        assert_eq!(p.available_for_variable, dec!(1413.00));
        assert_eq!(p.fixed_coverage_pct, Some(dec!(34.4)));
        assert_eq!(p.das_due_date, d(2024, 3, 20));
        assert_eq!(
            p.alerts,
            vec![
                Alert::AboveIrExemption {
                    projected_annual: dec!(37200)
                },
                Alert::ExtrasReceived { total: dec!(100) },
            ]
        );
    }

    #[test]
    fn empty_month_has_no_coverage_and_low_balance() {
        let totals = MonthTotals::compute(march(), &[], &[], DEFAULT_DAS);
        let p = Projection::new(totals, &TaxPolicy::default(), LOW_BALANCE_THRESHOLD);
        assert_eq!(p.fixed_coverage_pct, None);
        assert_eq!(
            p.alerts,
            vec![Alert::LowBalance {
                net_balance: dec!(-67.00)
            }]
        );
    }

    #[test]
    fn income_tax_mode_parses() {
        assert_eq!("Annualized".parse::<IncomeTaxMode>().unwrap(), IncomeTaxMode::Annualized);
        assert!("yearly".parse::<IncomeTaxMode>().is_err());
    }
}
