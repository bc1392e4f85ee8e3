// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use tracing::debug;

use super::{decimal_at, gate, not_found, period_at};
use crate::error::{MeiError, MeiResult};
use crate::models::{MonthlySaving, TotalSavings, require_non_negative};
use crate::period::Period;

fn map_row(r: &Row<'_>) -> rusqlite::Result<MonthlySaving> {
    Ok(MonthlySaving {
        id: r.get(0)?,
        period: period_at(r, 1, 2)?,
        amount: decimal_at(r, 3)?,
        description: r.get(4)?,
    })
}

/// Monthly contributions, newest first.
pub fn list_savings(conn: &Connection) -> MeiResult<Vec<MonthlySaving>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, month, year, amount, description FROM monthly_savings
             ORDER BY year DESC, month DESC",
        )
        .map_err(gate("monthly_savings"))?;
    let rows = stmt.query_map([], map_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn get_saving(conn: &Connection, period: Period) -> MeiResult<Option<MonthlySaving>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, month, year, amount, description FROM monthly_savings
             WHERE month=?1 AND year=?2",
        )
        .map_err(gate("monthly_savings"))?;
    Ok(stmt
        .query_row(params![period.month(), period.year()], map_row)
        .optional()?)
}

/// Sets the contribution for `period`, replacing any previous value.
pub fn upsert_saving(
    conn: &Connection,
    period: Period,
    amount: Decimal,
    description: Option<&str>,
) -> MeiResult<MonthlySaving> {
    require_non_negative("saving amount", amount)?;
    let description = description.map(str::trim).filter(|s| !s.is_empty());
    conn.execute(
        "INSERT INTO monthly_savings(month, year, amount, description) VALUES (?1,?2,?3,?4)
         ON CONFLICT(month, year) DO UPDATE SET amount=excluded.amount,
             description=excluded.description, updated_at=datetime('now')",
        params![period.month(), period.year(), amount.to_string(), description],
    )
    .map_err(gate("monthly_savings"))?;
    debug!(%period, %amount, "monthly saving stored");
    get_saving(conn, period)?.ok_or(MeiError::NotFound {
        entity: "monthly saving",
        id: 0,
    })
}

pub fn delete_saving(conn: &Connection, id: i64) -> MeiResult<()> {
    let n = conn
        .execute("DELETE FROM monthly_savings WHERE id=?1", params![id])
        .map_err(gate("monthly_savings"))?;
    not_found("monthly saving", id, n)
}

pub fn total_savings(conn: &Connection) -> MeiResult<TotalSavings> {
    let rows = list_savings(conn)?;
    let total_accumulated: Decimal = rows.iter().map(|s| s.amount).sum();
    let months_count = rows.len() as u32;
    let average_per_month = total_accumulated / Decimal::from(months_count.max(1));
    let last_update: Option<String> = conn
        .query_row("SELECT MAX(updated_at) FROM monthly_savings", [], |r| r.get(0))
        .optional()?
        .flatten();
    Ok(TotalSavings {
        total_accumulated,
        months_count,
        average_per_month,
        last_update,
    })
}
