// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Month lifecycle: archiving a month's totals and seeding the next month.

use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use super::{extras, settings, summaries, transactions};
use crate::config::Settings;
use crate::engine::monthly::MonthTotals;
use crate::engine::rollover;
use crate::error::MeiResult;
use crate::models::MonthlySummary;
use crate::period::Period;

/// Totals for `period` as currently recorded.
pub fn month_totals(conn: &Connection, period: Period, cfg: &Settings) -> MeiResult<MonthTotals> {
    let txs = transactions::list_transactions(conn, period)?;
    let extra = extras::list_extra_income(conn, period)?;
    let das = settings::das_for(conn, period, cfg.default_das)?;
    Ok(MonthTotals::compute(period, &txs, &extra, das))
}

/// Snapshots `period` into the archive. Running it again overwrites the
/// existing snapshot instead of adding a second one.
pub fn archive_current_month(
    conn: &Connection,
    period: Period,
    cfg: &Settings,
) -> MeiResult<MonthlySummary> {
    info!(%period, "archiving month");
    let totals = month_totals(conn, period, cfg)?;
    summaries::save_summary(conn, &totals.to_summary(&cfg.tax))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RolloverReport {
    pub target: Period,
    pub copied: usize,
    pub das_copied: Option<Decimal>,
}

/// Copies `period`'s recurring transactions and its DAS setting into the
/// following month. Not idempotent: a second run copies the rows again.
pub fn prepare_next_month(conn: &mut Connection, period: Period) -> MeiResult<RolloverReport> {
    let target = period.next();
    let current = transactions::list_transactions(conn, period)?;
    let copies = rollover::carry_forward(period, &current);

    let tx = conn.transaction()?;
    for new in &copies {
        transactions::insert_transaction(&tx, new)?;
    }
    let das_copied = match settings::get_monthly_settings(&tx, period)? {
        Some(s) => {
            settings::upsert_monthly_settings(&tx, target, s.das_value)?;
            Some(s.das_value)
        }
        None => None,
    };
    tx.commit()?;

    info!(from = %period, to = %target, copied = copies.len(), "prepared next month");
    Ok(RolloverReport {
        target,
        copied: copies.len(),
        das_copied,
    })
}
