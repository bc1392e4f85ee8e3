// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::models::{ExtraIncome, NewExtraIncome};
use crate::store::extras as store;
use crate::utils::{
    fmt_money, maybe_print_json, or_default_logged, parse_date, parse_decimal, parse_period,
    period_arg, pretty_table, required,
};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => {
            let id = required::<i64>(sub, "id")?;
            store::delete_extra_income(conn, id)?;
            println!("Deleted extra income {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_decimal(&required::<String>(sub, "amount")?)?;
    let date = parse_date(&required::<String>(sub, "date")?)?;
    let mut new = NewExtraIncome::dated(amount, required::<String>(sub, "description")?, date);
    if let Some(m) = sub.get_one::<String>("month") {
        new.period = parse_period(m)?;
    }
    let e = store::insert_extra_income(conn, &new)?;
    println!(
        "Recorded extra income {} for {} (id {})",
        fmt_money(&e.amount),
        e.period.label(),
        e.id
    );
    Ok(())
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<ExtraIncome>> {
    let period = period_arg(sub)?;
    Ok(or_default_logged(
        store::list_extra_income(conn, period),
        "extra income",
    ))
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(conn, sub)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let rows = data
        .iter()
        .map(|e| {
            vec![
                e.id.to_string(),
                e.date.to_string(),
                e.description.clone(),
                fmt_money(&e.amount),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["ID", "Date", "Description", "Amount"], rows)
    );
    Ok(())
}
