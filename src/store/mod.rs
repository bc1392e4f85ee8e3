// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Data access: every read and write against the SQLite book goes through
//! here. Money is stored as decimal TEXT, dates as ISO `YYYY-MM-DD`.

pub mod cards;
pub mod extras;
pub mod goals;
pub mod month;
pub mod savings;
pub mod settings;
pub mod summaries;
pub mod transactions;

use rusqlite::Row;
use rusqlite::types::Type;
use rust_decimal::Decimal;

use crate::error::MeiError;
use crate::period::Period;

/// Maps "no such table" failures to [`MeiError::MissingSchema`] for `table`.
pub fn gate(table: &'static str) -> impl Fn(rusqlite::Error) -> MeiError {
    move |e| match &e {
        rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.starts_with("no such table") => {
            MeiError::MissingSchema(table)
        }
        _ => MeiError::Db(e),
    }
}

/// Ceiling for any stored money column (10^18). Inputs are capped at
/// [`crate::models::MAX_AMOUNT`]; archived totals may sum several of them.
const MAX_STORED: Decimal = Decimal::from_parts(2_808_348_672, 232_830_643, 0, false, 0);

/// Reads a money column. Values beyond [`MAX_STORED`] are refused so later
/// sums and projections cannot overflow.
pub(crate) fn decimal_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let raw: String = row.get(idx)?;
    let value = raw.trim().parse::<Decimal>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
    })?;
    if value.abs() > MAX_STORED {
        let err = MeiError::InvalidStoredValue {
            column: "amount",
            value: raw,
        };
        return Err(rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            Box::new(err),
        ));
    }
    Ok(value)
}

pub(crate) fn period_at(row: &Row<'_>, month_idx: usize, year_idx: usize) -> rusqlite::Result<Period> {
    let month: u32 = row.get(month_idx)?;
    let year: i32 = row.get(year_idx)?;
    Period::new(month, year).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(month_idx, Type::Integer, Box::new(e))
    })
}

pub(crate) fn not_found(entity: &'static str, id: i64, affected: usize) -> Result<(), MeiError> {
    if affected == 0 {
        return Err(MeiError::NotFound { entity, id });
    }
    Ok(())
}
