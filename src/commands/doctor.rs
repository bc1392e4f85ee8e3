// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::db;
use crate::engine::installments::{self, ScheduleIssue};
use crate::store::cards;
use crate::utils::pretty_table;

/// Problems found in the book, as (issue, detail) pairs.
pub fn findings(conn: &Connection) -> Result<Vec<(String, String)>> {
    let mut out = Vec::new();

    // 1) Tables that were never provisioned
    let status = db::schema_status(conn)?;
    for table in &status.missing {
        out.push(("missing_table".to_string(), table.to_string()));
    }
    if !status.is_ready() {
        return Ok(out);
    }

    // 2) Installment plans that disagree with their purchase
    let book = cards::load_card_book(conn)?;
    for card in book.cards() {
        for purchase in book.purchases_of(card.id) {
            let rows = cards::installments_of(conn, purchase.id)?;
            for issue in installments::audit(purchase, &rows) {
                let detail = match issue {
                    ScheduleIssue::SumMismatch { expected, actual } => format!(
                        "purchase {} ('{}'): installments sum {} but total is {}",
                        purchase.id, purchase.description, actual, expected
                    ),
                    ScheduleIssue::Numbering { expected, found } => format!(
                        "purchase {} ('{}'): expected 1..={} got {:?}",
                        purchase.id, purchase.description, expected, found
                    ),
                };
                out.push(("installment_plan".to_string(), detail));
            }
        }
    }
    Ok(out)
}

pub fn handle(conn: &Connection) -> Result<()> {
    let rows = findings(conn)?;
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        let rows = rows.into_iter().map(|(i, d)| vec![i, d]).collect();
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
