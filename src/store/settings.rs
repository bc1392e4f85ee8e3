// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Per-month DAS settings, one row per `(month, year)`.

use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use tracing::debug;

use super::{decimal_at, gate, period_at};
use crate::error::{MeiError, MeiResult};
use crate::models::{MonthlySettings, require_non_negative};
use crate::period::Period;

fn map_row(r: &Row<'_>) -> rusqlite::Result<MonthlySettings> {
    Ok(MonthlySettings {
        id: r.get(0)?,
        period: period_at(r, 1, 2)?,
        das_value: decimal_at(r, 3)?,
    })
}

pub fn get_monthly_settings(conn: &Connection, period: Period) -> MeiResult<Option<MonthlySettings>> {
    let mut stmt = conn
        .prepare("SELECT id, month, year, das_value FROM monthly_settings WHERE month=?1 AND year=?2")
        .map_err(gate("monthly_settings"))?;
    Ok(stmt
        .query_row(params![period.month(), period.year()], map_row)
        .optional()?)
}

pub fn upsert_monthly_settings(
    conn: &Connection,
    period: Period,
    das_value: Decimal,
) -> MeiResult<MonthlySettings> {
    require_non_negative("DAS value", das_value)?;
    conn.execute(
        "INSERT INTO monthly_settings(month, year, das_value) VALUES (?1, ?2, ?3)
         ON CONFLICT(month, year) DO UPDATE SET das_value=excluded.das_value, updated_at=datetime('now')",
        params![period.month(), period.year(), das_value.to_string()],
    )
    .map_err(gate("monthly_settings"))?;
    debug!(%period, %das_value, "monthly settings saved");
    get_monthly_settings(conn, period)?.ok_or(MeiError::NotFound {
        entity: "monthly settings",
        id: 0,
    })
}

/// Settings for `period`, created with `default_das` on first access.
pub fn ensure_monthly_settings(
    conn: &Connection,
    period: Period,
    default_das: Decimal,
) -> MeiResult<MonthlySettings> {
    match get_monthly_settings(conn, period)? {
        Some(s) => Ok(s),
        None => upsert_monthly_settings(conn, period, default_das),
    }
}

/// DAS in force for `period` without creating a row.
pub fn das_for(conn: &Connection, period: Period, default_das: Decimal) -> MeiResult<Decimal> {
    Ok(get_monthly_settings(conn, period)?
        .map(|s| s.das_value)
        .unwrap_or(default_das))
}
