// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::{Connection, Row, ToSql, params, params_from_iter};
use tracing::{debug, info};

use super::{decimal_at, gate, not_found};
use crate::engine::balances::CardBook;
use crate::engine::installments;
use crate::error::{MeiError, MeiResult};
use crate::models::{
    CardInstallment, CardPatch, CardSummary, CardTransaction, CreditCard, NewCardTransaction,
    NewCreditCard,
};
use crate::period::Period;

fn map_card(r: &Row<'_>) -> rusqlite::Result<CreditCard> {
    Ok(CreditCard {
        id: r.get(0)?,
        name: r.get(1)?,
        credit_limit: decimal_at(r, 2)?,
        closing_day: r.get(3)?,
        due_day: r.get(4)?,
    })
}

fn map_purchase(r: &Row<'_>) -> rusqlite::Result<CardTransaction> {
    Ok(CardTransaction {
        id: r.get(0)?,
        card_id: r.get(1)?,
        description: r.get(2)?,
        amount: decimal_at(r, 3)?,
        installment_count: r.get(4)?,
        first_installment_date: r.get(5)?,
        category: r.get(6)?,
    })
}

fn map_installment(r: &Row<'_>) -> rusqlite::Result<CardInstallment> {
    Ok(CardInstallment {
        id: r.get(0)?,
        card_transaction_id: r.get(1)?,
        installment_number: r.get(2)?,
        amount: decimal_at(r, 3)?,
        due_date: r.get(4)?,
        paid: r.get(5)?,
    })
}

pub fn list_cards(conn: &Connection) -> MeiResult<Vec<CreditCard>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, name, credit_limit, closing_day, due_day FROM credit_cards ORDER BY name, id",
        )
        .map_err(gate("credit_cards"))?;
    let rows = stmt.query_map([], map_card)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn get_card(conn: &Connection, id: i64) -> MeiResult<CreditCard> {
    let mut stmt = conn
        .prepare("SELECT id, name, credit_limit, closing_day, due_day FROM credit_cards WHERE id=?1")
        .map_err(gate("credit_cards"))?;
    match stmt.query_row(params![id], map_card) {
        Ok(c) => Ok(c),
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            Err(MeiError::NotFound { entity: "credit card", id })
        }
        Err(e) => Err(e.into()),
    }
}

pub fn insert_card(conn: &Connection, new: &NewCreditCard) -> MeiResult<CreditCard> {
    new.validate()?;
    conn.execute(
        "INSERT INTO credit_cards(name, credit_limit, closing_day, due_day) VALUES (?1,?2,?3,?4)",
        params![
            new.name.trim(),
            new.credit_limit.to_string(),
            new.closing_day,
            new.due_day
        ],
    )
    .map_err(gate("credit_cards"))?;
    let id = conn.last_insert_rowid();
    debug!(id, name = %new.name, "credit card added");
    get_card(conn, id)
}

pub fn update_card(conn: &Connection, id: i64, patch: &CardPatch) -> MeiResult<CreditCard> {
    let current = get_card(conn, id)?;
    let next = patch.apply(&current);
    next.validate()?;
    conn.execute(
        "UPDATE credit_cards SET name=?1, credit_limit=?2, closing_day=?3, due_day=?4 WHERE id=?5",
        params![
            next.name.trim(),
            next.credit_limit.to_string(),
            next.closing_day,
            next.due_day,
            id
        ],
    )?;
    get_card(conn, id)
}

/// Removes the card together with its purchases and their installments.
pub fn delete_card(conn: &mut Connection, id: i64) -> MeiResult<()> {
    let tx = conn.transaction()?;
    tx.execute(
        "DELETE FROM card_installments WHERE card_transaction_id IN
         (SELECT id FROM card_transactions WHERE card_id=?1)",
        params![id],
    )
    .map_err(gate("card_installments"))?;
    tx.execute("DELETE FROM card_transactions WHERE card_id=?1", params![id])?;
    let n = tx
        .execute("DELETE FROM credit_cards WHERE id=?1", params![id])
        .map_err(gate("credit_cards"))?;
    not_found("credit card", id, n)?;
    tx.commit()?;
    info!(id, "credit card deleted");
    Ok(())
}

/// Purchases, newest first, optionally narrowed to one card and to the
/// month of the first installment.
pub fn list_card_transactions(
    conn: &Connection,
    card_id: Option<i64>,
    period: Option<Period>,
) -> MeiResult<Vec<CardTransaction>> {
    let mut sql = String::from(
        "SELECT id, card_id, description, amount, installment_count, first_installment_date, category
         FROM card_transactions WHERE 1=1",
    );
    let mut args: Vec<Box<dyn ToSql>> = Vec::new();
    if let Some(card_id) = card_id {
        sql.push_str(" AND card_id=?");
        args.push(Box::new(card_id));
    }
    if let Some(p) = period {
        sql.push_str(" AND first_installment_date >= ? AND first_installment_date < ?");
        args.push(Box::new(p.start()));
        args.push(Box::new(p.end_exclusive()));
    }
    sql.push_str(" ORDER BY first_installment_date DESC, id DESC");

    let mut stmt = conn.prepare(&sql).map_err(gate("card_transactions"))?;
    let rows = stmt.query_map(params_from_iter(args.iter()), map_purchase)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn get_card_transaction(conn: &Connection, id: i64) -> MeiResult<CardTransaction> {
    let mut stmt = conn
        .prepare(
            "SELECT id, card_id, description, amount, installment_count, first_installment_date, category
             FROM card_transactions WHERE id=?1",
        )
        .map_err(gate("card_transactions"))?;
    match stmt.query_row(params![id], map_purchase) {
        Ok(t) => Ok(t),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(MeiError::NotFound {
            entity: "card transaction",
            id,
        }),
        Err(e) => Err(e.into()),
    }
}

/// Records a purchase. Purchases split in more than one installment get their
/// whole payment plan written in the same database transaction.
pub fn add_card_transaction(
    conn: &mut Connection,
    new: &NewCardTransaction,
) -> MeiResult<(CardTransaction, Vec<CardInstallment>)> {
    new.validate()?;
    let tx = conn.transaction()?;
    get_card(&tx, new.card_id)?;

    tx.execute(
        "INSERT INTO card_transactions(card_id, description, amount, installment_count,
         first_installment_date, category) VALUES (?1,?2,?3,?4,?5,?6)",
        params![
            new.card_id,
            new.description.trim(),
            new.amount.to_string(),
            new.installment_count,
            new.first_installment_date,
            new.category.trim()
        ],
    )
    .map_err(gate("card_transactions"))?;
    let purchase_id = tx.last_insert_rowid();

    if installments::needs_schedule(new.installment_count) {
        let plan = installments::schedule(
            new.amount,
            new.installment_count,
            new.first_installment_date,
        )?;
        let mut stmt = tx
            .prepare(
                "INSERT INTO card_installments(card_transaction_id, installment_number, amount, due_date, paid)
                 VALUES (?1,?2,?3,?4,?5)",
            )
            .map_err(gate("card_installments"))?;
        for row in &plan {
            stmt.execute(params![
                purchase_id,
                row.installment_number,
                row.amount.to_string(),
                row.due_date,
                row.paid
            ])?;
        }
    }

    let purchase = get_card_transaction(&tx, purchase_id)?;
    let rows = installments_of(&tx, purchase_id)?;
    tx.commit()?;
    info!(
        id = purchase_id,
        card = new.card_id,
        amount = %new.amount,
        installments = new.installment_count,
        "card purchase recorded"
    );
    Ok((purchase, rows))
}

/// Deletes a purchase and, with it, all of its installments.
pub fn delete_card_transaction(conn: &mut Connection, id: i64) -> MeiResult<()> {
    let tx = conn.transaction()?;
    tx.execute(
        "DELETE FROM card_installments WHERE card_transaction_id=?1",
        params![id],
    )
    .map_err(gate("card_installments"))?;
    let n = tx
        .execute("DELETE FROM card_transactions WHERE id=?1", params![id])
        .map_err(gate("card_transactions"))?;
    not_found("card transaction", id, n)?;
    tx.commit()?;
    debug!(id, "card purchase deleted");
    Ok(())
}

pub fn installments_of(conn: &Connection, purchase_id: i64) -> MeiResult<Vec<CardInstallment>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, card_transaction_id, installment_number, amount, due_date, paid
             FROM card_installments WHERE card_transaction_id=?1 ORDER BY installment_number",
        )
        .map_err(gate("card_installments"))?;
    let rows = stmt.query_map(params![purchase_id], map_installment)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Installments by due date, optionally narrowed to one card and one month.
pub fn list_installments(
    conn: &Connection,
    card_id: Option<i64>,
    period: Option<Period>,
) -> MeiResult<Vec<CardInstallment>> {
    let mut sql = String::from(
        "SELECT i.id, i.card_transaction_id, i.installment_number, i.amount, i.due_date, i.paid
         FROM card_installments i JOIN card_transactions t ON t.id = i.card_transaction_id
         WHERE 1=1",
    );
    let mut args: Vec<Box<dyn ToSql>> = Vec::new();
    if let Some(card_id) = card_id {
        sql.push_str(" AND t.card_id=?");
        args.push(Box::new(card_id));
    }
    if let Some(p) = period {
        sql.push_str(" AND i.due_date >= ? AND i.due_date < ?");
        args.push(Box::new(p.start()));
        args.push(Box::new(p.end_exclusive()));
    }
    sql.push_str(" ORDER BY i.due_date, i.card_transaction_id, i.installment_number");

    let mut stmt = conn.prepare(&sql).map_err(gate("card_installments"))?;
    let rows = stmt.query_map(params_from_iter(args.iter()), map_installment)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn set_installment_paid(conn: &Connection, id: i64, paid: bool) -> MeiResult<()> {
    let n = conn
        .execute(
            "UPDATE card_installments SET paid=?1 WHERE id=?2",
            params![paid, id],
        )
        .map_err(gate("card_installments"))?;
    debug!(id, paid, "installment flag updated");
    not_found("installment", id, n)
}

/// Every card, purchase and installment, indexed for balance lookups.
pub fn load_card_book(conn: &Connection) -> MeiResult<CardBook> {
    Ok(CardBook::new(
        list_cards(conn)?,
        list_card_transactions(conn, None, None)?,
        list_installments(conn, None, None)?,
    ))
}

pub fn cards_summary(conn: &Connection, today: NaiveDate) -> MeiResult<Vec<CardSummary>> {
    Ok(load_card_book(conn)?.summaries(today))
}
