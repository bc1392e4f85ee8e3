// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, Row, params};
use tracing::debug;

use super::{decimal_at, gate, not_found};
use crate::error::{MeiError, MeiResult};
use crate::models::{NewSavingsGoal, SavingsGoal};

const COLUMNS: &str = "id, title, target_amount, deadline, description";

fn map_row(r: &Row<'_>) -> rusqlite::Result<SavingsGoal> {
    Ok(SavingsGoal {
        id: r.get(0)?,
        title: r.get(1)?,
        target_amount: decimal_at(r, 2)?,
        deadline: r.get(3)?,
        description: r.get(4)?,
    })
}

pub fn list_goals(conn: &Connection) -> MeiResult<Vec<SavingsGoal>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {COLUMNS} FROM savings_goals ORDER BY deadline, id"
        ))
        .map_err(gate("savings_goals"))?;
    let rows = stmt.query_map([], map_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn get_goal(conn: &Connection, id: i64) -> MeiResult<SavingsGoal> {
    let mut stmt = conn
        .prepare(&format!("SELECT {COLUMNS} FROM savings_goals WHERE id=?1"))
        .map_err(gate("savings_goals"))?;
    match stmt.query_row(params![id], map_row) {
        Ok(g) => Ok(g),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(MeiError::NotFound {
            entity: "savings goal",
            id,
        }),
        Err(e) => Err(e.into()),
    }
}

pub fn insert_goal(conn: &Connection, new: &NewSavingsGoal) -> MeiResult<SavingsGoal> {
    new.validate()?;
    conn.execute(
        "INSERT INTO savings_goals(title, target_amount, deadline, description) VALUES (?1,?2,?3,?4)",
        params![
            new.title.trim(),
            new.target_amount.to_string(),
            new.deadline,
            new.description
        ],
    )
    .map_err(gate("savings_goals"))?;
    let id = conn.last_insert_rowid();
    debug!(id, title = %new.title, "savings goal added");
    get_goal(conn, id)
}

pub fn update_goal(conn: &Connection, id: i64, new: &NewSavingsGoal) -> MeiResult<SavingsGoal> {
    new.validate()?;
    let n = conn
        .execute(
            "UPDATE savings_goals SET title=?1, target_amount=?2, deadline=?3, description=?4
             WHERE id=?5",
            params![
                new.title.trim(),
                new.target_amount.to_string(),
                new.deadline,
                new.description,
                id
            ],
        )
        .map_err(gate("savings_goals"))?;
    not_found("savings goal", id, n)?;
    get_goal(conn, id)
}

pub fn delete_goal(conn: &Connection, id: i64) -> MeiResult<()> {
    let n = conn
        .execute("DELETE FROM savings_goals WHERE id=?1", params![id])
        .map_err(gate("savings_goals"))?;
    not_found("savings goal", id, n)
}
