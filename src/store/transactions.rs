// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::types::Type;
use rusqlite::{Connection, Row, params};
use tracing::debug;

use super::{decimal_at, gate, not_found};
use crate::error::MeiResult;
use crate::models::{NewTransaction, Transaction, TxKind};
use crate::period::Period;

const COLUMNS: &str = "id, kind, category, amount, date, description, is_recurring";

fn map_row(r: &Row<'_>) -> rusqlite::Result<Transaction> {
    let kind_raw: String = r.get(1)?;
    let kind = kind_raw
        .parse::<TxKind>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?;
    Ok(Transaction {
        id: r.get(0)?,
        kind,
        category: r.get(2)?,
        amount: decimal_at(r, 3)?,
        date: r.get(4)?,
        description: r.get(5)?,
        is_recurring: r.get(6)?,
    })
}

/// Transactions dated inside `period`, oldest first.
pub fn list_transactions(conn: &Connection, period: Period) -> MeiResult<Vec<Transaction>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {COLUMNS} FROM transactions
             WHERE date >= ?1 AND date < ?2
             ORDER BY date, id"
        ))
        .map_err(gate("transactions"))?;
    let rows = stmt.query_map(params![period.start(), period.end_exclusive()], map_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn get_transaction(conn: &Connection, id: i64) -> MeiResult<Transaction> {
    let mut stmt = conn
        .prepare(&format!("SELECT {COLUMNS} FROM transactions WHERE id=?1"))
        .map_err(gate("transactions"))?;
    match stmt.query_row(params![id], map_row) {
        Ok(t) => Ok(t),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(crate::error::MeiError::NotFound {
            entity: "transaction",
            id,
        }),
        Err(e) => Err(e.into()),
    }
}

pub fn insert_transaction(conn: &Connection, new: &NewTransaction) -> MeiResult<Transaction> {
    new.validate()?;
    conn.execute(
        "INSERT INTO transactions(kind, category, amount, date, description, is_recurring)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            new.kind.as_str(),
            new.category.trim(),
            new.amount.to_string(),
            new.date,
            new.description.trim(),
            new.is_recurring
        ],
    )
    .map_err(gate("transactions"))?;
    let id = conn.last_insert_rowid();
    debug!(id, kind = %new.kind, amount = %new.amount, "transaction recorded");
    get_transaction(conn, id)
}

pub fn delete_transaction(conn: &Connection, id: i64) -> MeiResult<()> {
    let n = conn
        .execute("DELETE FROM transactions WHERE id=?1", params![id])
        .map_err(gate("transactions"))?;
    not_found("transaction", id, n)
}
