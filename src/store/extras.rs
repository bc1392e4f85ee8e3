// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::debug;

use super::{decimal_at, gate, not_found, period_at};
use crate::error::{MeiError, MeiResult};
use crate::models::{ExtraIncome, NewExtraIncome};
use crate::period::Period;

fn map_row(r: &Row<'_>) -> rusqlite::Result<ExtraIncome> {
    Ok(ExtraIncome {
        id: r.get(0)?,
        amount: decimal_at(r, 1)?,
        description: r.get(2)?,
        date: r.get(3)?,
        period: period_at(r, 4, 5)?,
    })
}

/// Extra income booked for `period`, newest first.
pub fn list_extra_income(conn: &Connection, period: Period) -> MeiResult<Vec<ExtraIncome>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, amount, description, date, month, year FROM extra_income
             WHERE month=?1 AND year=?2 ORDER BY date DESC, id DESC",
        )
        .map_err(gate("extra_income"))?;
    let rows = stmt.query_map(params![period.month(), period.year()], map_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn insert_extra_income(conn: &Connection, new: &NewExtraIncome) -> MeiResult<ExtraIncome> {
    new.validate()?;
    conn.execute(
        "INSERT INTO extra_income(amount, description, date, month, year) VALUES (?1,?2,?3,?4,?5)",
        params![
            new.amount.to_string(),
            new.description.trim(),
            new.date,
            new.period.month(),
            new.period.year()
        ],
    )
    .map_err(gate("extra_income"))?;
    let id = conn.last_insert_rowid();
    debug!(id, amount = %new.amount, period = %new.period, "extra income recorded");
    conn.query_row(
        "SELECT id, amount, description, date, month, year FROM extra_income WHERE id=?1",
        params![id],
        map_row,
    )
    .optional()?
    .ok_or(MeiError::NotFound {
        entity: "extra income",
        id,
    })
}

pub fn delete_extra_income(conn: &Connection, id: i64) -> MeiResult<()> {
    let n = conn
        .execute("DELETE FROM extra_income WHERE id=?1", params![id])
        .map_err(gate("extra_income"))?;
    not_found("extra income", id, n)
}
