// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::store::savings as store;
use crate::utils::{
    fmt_money, maybe_print_json, or_default_logged, parse_decimal, period_arg, pretty_table,
    required,
};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let period = period_arg(sub)?;
            let amount = parse_decimal(&required::<String>(sub, "amount")?)?;
            let description = sub.get_one::<String>("description").map(String::as_str);
            let s = store::upsert_saving(conn, period, amount, description)?;
            println!("Saved {} for {}", fmt_money(&s.amount), s.period.label());
        }
        Some(("list", sub)) => {
            let data = or_default_logged(store::list_savings(conn), "savings");
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .iter()
                    .map(|s| {
                        vec![
                            s.id.to_string(),
                            s.period.label(),
                            fmt_money(&s.amount),
                            s.description.clone().unwrap_or_default(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["ID", "Month", "Amount", "Description"], rows)
                );
            }
        }
        Some(("rm", sub)) => {
            let id = required::<i64>(sub, "id")?;
            store::delete_saving(conn, id)?;
            println!("Deleted saving {}", id);
        }
        Some(("total", sub)) => {
            let t = store::total_savings(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &t)? {
                let rows = vec![
                    vec!["Accumulated".into(), fmt_money(&t.total_accumulated)],
                    vec!["Months".into(), t.months_count.to_string()],
                    vec!["Average per month".into(), fmt_money(&t.average_per_month)],
                    vec!["Last update".into(), t.last_update.unwrap_or_else(|| "-".into())],
                ];
                println!("{}", pretty_table(&["Savings", "Value"], rows));
            }
        }
        _ => {}
    }
    Ok(())
}
