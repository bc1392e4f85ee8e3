// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::{debug, info, warn};

use super::{decimal_at, gate, not_found, period_at};
use crate::error::{MeiError, MeiResult};
use crate::models::MonthlySummary;
use crate::period::Period;

const COLUMNS: &str = "id, month, year, total_income, total_expenses, total_extras, das_value, income_tax_estimate, net_balance";

fn map_row(r: &Row<'_>) -> rusqlite::Result<MonthlySummary> {
    Ok(MonthlySummary {
        id: r.get(0)?,
        period: period_at(r, 1, 2)?,
        total_income: decimal_at(r, 3)?,
        total_expenses: decimal_at(r, 4)?,
        total_extras: decimal_at(r, 5)?,
        das_value: decimal_at(r, 6)?,
        income_tax_estimate: decimal_at(r, 7)?,
        net_balance: decimal_at(r, 8)?,
    })
}

/// Archived months, newest first.
pub fn list_summaries(conn: &Connection) -> MeiResult<Vec<MonthlySummary>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {COLUMNS} FROM monthly_summary ORDER BY year DESC, month DESC"
        ))
        .map_err(gate("monthly_summary"))?;
    let rows = stmt.query_map([], map_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn get_summary(conn: &Connection, period: Period) -> MeiResult<Option<MonthlySummary>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {COLUMNS} FROM monthly_summary WHERE month=?1 AND year=?2"
        ))
        .map_err(gate("monthly_summary"))?;
    Ok(stmt
        .query_row(params![period.month(), period.year()], map_row)
        .optional()?)
}

/// Inserts the summary, or overwrites the row already archived for its period.
pub fn save_summary(conn: &Connection, summary: &MonthlySummary) -> MeiResult<MonthlySummary> {
    let period = summary.period;
    let existing: Option<i64> = conn
        .query_row(
            "SELECT id FROM monthly_summary WHERE month=?1 AND year=?2",
            params![period.month(), period.year()],
            |r| r.get(0),
        )
        .optional()
        .map_err(gate("monthly_summary"))?;

    let values = [
        summary.total_income.to_string(),
        summary.total_expenses.to_string(),
        summary.total_extras.to_string(),
        summary.das_value.to_string(),
        summary.income_tax_estimate.to_string(),
        summary.net_balance.to_string(),
    ];
    let id = match existing {
        Some(id) => {
            conn.execute(
                "UPDATE monthly_summary SET total_income=?1, total_expenses=?2, total_extras=?3,
                 das_value=?4, income_tax_estimate=?5, net_balance=?6 WHERE id=?7",
                params![values[0], values[1], values[2], values[3], values[4], values[5], id],
            )?;
            info!(%period, id, "monthly summary updated");
            id
        }
        None => {
            conn.execute(
                "INSERT INTO monthly_summary(month, year, total_income, total_expenses, total_extras,
                 das_value, income_tax_estimate, net_balance) VALUES (?1,?2,?3,?4,?5,?6,?7,?8)",
                params![
                    period.month(),
                    period.year(),
                    values[0],
                    values[1],
                    values[2],
                    values[3],
                    values[4],
                    values[5]
                ],
            )?;
            let id = conn.last_insert_rowid();
            info!(%period, id, "monthly summary created");
            id
        }
    };
    get_summary(conn, period)?.ok_or(MeiError::NotFound {
        entity: "monthly summary",
        id,
    })
}

pub fn delete_summary(conn: &Connection, id: i64) -> MeiResult<()> {
    let n = conn
        .execute("DELETE FROM monthly_summary WHERE id=?1", params![id])
        .map_err(gate("monthly_summary"))?;
    debug!(id, "monthly summary deleted");
    not_found("monthly summary", id, n)
}

/// Wipes the whole archive. Returns the number of rows removed.
pub fn delete_all_summaries(conn: &Connection) -> MeiResult<usize> {
    let n = conn
        .execute("DELETE FROM monthly_summary", [])
        .map_err(gate("monthly_summary"))?;
    warn!(removed = n, "all monthly summaries deleted");
    Ok(n)
}
