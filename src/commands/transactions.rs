// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::models::{NewTransaction, Transaction, TxKind};
use crate::store::transactions as store;
use crate::utils::{
    fmt_money, maybe_print_json, or_default_logged, parse_date, parse_decimal, period_arg,
    pretty_table, required,
};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => {
            let id = required::<i64>(sub, "id")?;
            store::delete_transaction(conn, id)?;
            println!("Deleted transaction {}", id);
        }
        _ => {}
    }
    Ok(())
}

pub fn new_from_args(sub: &clap::ArgMatches) -> Result<NewTransaction> {
    Ok(NewTransaction {
        kind: required::<String>(sub, "kind")?.parse::<TxKind>()?,
        category: required::<String>(sub, "category")?,
        amount: parse_decimal(&required::<String>(sub, "amount")?)?,
        date: parse_date(&required::<String>(sub, "date")?)?,
        description: required::<String>(sub, "description")?,
        is_recurring: sub.get_flag("recurring"),
    })
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let new = new_from_args(sub)?;
    let t = store::insert_transaction(conn, &new)?;
    println!(
        "Recorded {} {} on {} '{}' (id {})",
        t.kind,
        fmt_money(&t.amount),
        t.date,
        t.description,
        t.id
    );
    Ok(())
}

/// Transactions of the selected month, optionally narrowed by `--kind`.
pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<Transaction>> {
    let period = period_arg(sub)?;
    let kind = match sub.get_one::<String>("kind") {
        Some(k) => Some(k.parse::<TxKind>()?),
        None => None,
    };
    let rows = or_default_logged(store::list_transactions(conn, period), "transactions");
    Ok(rows
        .into_iter()
        .filter(|t| kind.is_none_or(|k| t.kind == k))
        .collect())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(conn, sub)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let rows: Vec<Vec<String>> = data
        .iter()
        .map(|t| {
            vec![
                t.id.to_string(),
                t.date.to_string(),
                t.kind.to_string(),
                t.category.clone(),
                t.description.clone(),
                fmt_money(&t.amount),
                if t.is_recurring { "yes".into() } else { String::new() },
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Date", "Kind", "Category", "Description", "Amount", "Recurring"],
            rows
        )
    );
    Ok(())
}
