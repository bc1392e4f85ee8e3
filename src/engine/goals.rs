// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::SavingsGoal;

const HUNDRED: Decimal = Decimal::from_parts(100, 0, 0, false, 0);
const ALMOST_THERE_PCT: Decimal = Decimal::from_parts(75, 0, 0, false, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GoalStatus {
    Completed,
    Overdue,
    AlmostThere,
    InProgress,
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GoalStatus::Completed => "Completed",
            GoalStatus::Overdue => "Overdue",
            GoalStatus::AlmostThere => "Almost there",
            GoalStatus::InProgress => "In progress",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalProgress {
    pub goal: SavingsGoal,
    pub current_amount: Decimal,
    pub progress_pct: Decimal,
    pub remaining: Decimal,
    pub status: GoalStatus,
}

/// Every goal tracks the same pot: the total accumulated savings.
pub fn evaluate(goal: &SavingsGoal, total_accumulated: Decimal, today: NaiveDate) -> GoalProgress {
    let progress_pct = if goal.target_amount > Decimal::ZERO {
        (total_accumulated / goal.target_amount * HUNDRED).min(HUNDRED)
    } else {
        HUNDRED
    };
    let status = if progress_pct >= HUNDRED {
        GoalStatus::Completed
    } else if goal.deadline < today {
        GoalStatus::Overdue
    } else if progress_pct >= ALMOST_THERE_PCT {
        GoalStatus::AlmostThere
    } else {
        GoalStatus::InProgress
    };
    GoalProgress {
        goal: goal.clone(),
        current_amount: total_accumulated,
        progress_pct,
        remaining: (goal.target_amount - total_accumulated).max(Decimal::ZERO),
        status,
    }
}
