// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result, bail};
use rusqlite::Connection;
use tracing::info;

use crate::engine::history::HistoryStats;
use crate::export::{self, ExportFormat};
use crate::store::summaries as store;
use crate::utils::{fmt_money, maybe_print_json, or_default_logged, pretty_table, required};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(conn, sub)?,
        Some(("stats", sub)) => stats(conn, sub)?,
        Some(("rm", sub)) => {
            let id = required::<i64>(sub, "id")?;
            store::delete_summary(conn, id)?;
            println!("Deleted summary {}", id);
        }
        Some(("clear", sub)) => {
            if !sub.get_flag("yes") {
                bail!("refusing to clear the history without --yes");
            }
            let n = store::delete_all_summaries(conn)?;
            println!("Deleted {} archived month(s)", n);
        }
        Some(("export", sub)) => {
            let format = required::<String>(sub, "format")?;
            let out = required::<String>(sub, "out")?;
            let n = export_history(conn, &format, Path::new(&out))?;
            println!("Exported {} month(s) to {}", n, out);
        }
        _ => {}
    }
    Ok(())
}

/// Writes the whole archive to `out`. The format is checked before the file
/// is created.
pub fn export_history(conn: &Connection, format: &str, out: &Path) -> Result<usize> {
    let format: ExportFormat = format.parse()?;
    let summaries = store::list_summaries(conn)?;
    let file =
        File::create(out).with_context(|| format!("Failed to create {}", out.display()))?;
    export::write_summaries(&summaries, format, BufWriter::new(file))?;
    info!(months = summaries.len(), path = %out.display(), "history exported");
    Ok(summaries.len())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = or_default_logged(store::list_summaries(conn), "history");
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let rows = data
        .iter()
        .map(|s| {
            vec![
                s.id.to_string(),
                s.period.label(),
                fmt_money(&s.total_income),
                fmt_money(&s.total_expenses),
                fmt_money(&s.total_extras),
                fmt_money(&s.das_value),
                fmt_money(&s.income_tax_estimate),
                fmt_money(&s.net_balance),
                s.status().to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &[
                "ID", "Month", "Income", "Expenses", "Extras", "DAS", "Income tax", "Net",
                "Status"
            ],
            rows
        )
    );
    Ok(())
}

fn stats(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = or_default_logged(store::list_summaries(conn), "history");
    let Some(stats) = HistoryStats::compute(&data) else {
        println!("No archived months yet");
        return Ok(());
    };
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &stats)? {
        return Ok(());
    }
    let rows = vec![
        vec!["Months".into(), stats.months.to_string()],
        vec!["Total income".into(), fmt_money(&stats.total_income)],
        vec!["Total expenses".into(), fmt_money(&stats.total_expenses)],
        vec!["Total extras".into(), fmt_money(&stats.total_extras)],
        vec!["Average income".into(), fmt_money(&stats.average_income)],
        vec!["Average expenses".into(), fmt_money(&stats.average_expenses)],
        vec!["Income trend".into(), fmt_money(&stats.income_trend)],
        vec!["Expense trend".into(), fmt_money(&stats.expense_trend)],
        vec!["Best month".into(), stats.best_month.label()],
        vec!["Worst month".into(), stats.worst_month.label()],
    ];
    println!("{}", pretty_table(&["Stat", "Value"], rows));
    Ok(())
}
