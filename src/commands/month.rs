// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use tracing::warn;

use crate::config::Settings;
use crate::engine::monthly::{MonthTotals, Projection};
use crate::period::Period;
use crate::store::{extras, month, settings, transactions};
use crate::utils::{fmt_money, maybe_print_json, or_default_logged, period_arg, pretty_table};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(conn, sub)?,
        Some(("archive", sub)) => {
            let period = period_arg(sub)?;
            let cfg = Settings::load(conn)?;
            let s = month::archive_current_month(conn, period, &cfg)?;
            println!(
                "Archived {}: net balance {} ({})",
                s.period.label(),
                fmt_money(&s.net_balance),
                s.status()
            );
        }
        Some(("prepare-next", sub)) => {
            let period = period_arg(sub)?;
            let report = month::prepare_next_month(conn, period)?;
            println!(
                "Prepared {}: {} recurring transaction(s) copied",
                report.target.label(),
                report.copied
            );
            if let Some(das) = report.das_copied {
                println!("DAS {} carried over", fmt_money(&das));
            }
        }
        _ => {}
    }
    Ok(())
}

/// Dashboard for `period`. Each source that fails to load is logged and
/// counted as empty so the rest of the view still renders.
pub fn dashboard(conn: &Connection, period: Period) -> Projection {
    let cfg = or_default_logged(Settings::load(conn), "settings");
    let txs = or_default_logged(transactions::list_transactions(conn, period), "transactions");
    let extra = or_default_logged(extras::list_extra_income(conn, period), "extra income");
    let das = settings::das_for(conn, period, cfg.default_das).unwrap_or_else(|e| {
        warn!("could not load DAS settings: {}", e);
        cfg.default_das
    });
    let totals = MonthTotals::compute(period, &txs, &extra, das);
    Projection::new(totals, &cfg.tax, cfg.low_balance_threshold)
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let period = period_arg(sub)?;
    let p = dashboard(conn, period);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &p)? {
        return Ok(());
    }
    let t = &p.totals;
    let coverage = p
        .fixed_coverage_pct
        .map(|v| format!("{}%", v))
        .unwrap_or_else(|| "-".into());
    let rows = vec![
        vec!["Income".into(), fmt_money(&t.total_income)],
        vec!["Extra income".into(), fmt_money(&t.total_extras)],
        vec!["Expenses".into(), fmt_money(&t.total_expenses)],
        vec![
            format!("DAS (due {})", p.das_due_date),
            fmt_money(&t.das_value),
        ],
        vec!["Net balance".into(), fmt_money(&p.net_balance)],
        vec!["Fixed expenses".into(), fmt_money(&p.fixed_expenses)],
        vec!["Fixed share of income".into(), coverage],
        vec!["Left after fixed".into(), fmt_money(&p.leftover_after_fixed)],
        vec!["Suggested reserve".into(), fmt_money(&p.suggested_reserve)],
        vec![
            "Available for variable".into(),
            fmt_money(&p.available_for_variable),
        ],
        vec![
            "Projected annual income".into(),
            fmt_money(&p.projected_annual_income),
        ],
        vec!["Income tax estimate".into(), fmt_money(&p.income_tax_estimate)],
    ];
    println!("{}", period.label());
    println!("{}", pretty_table(&["Item", "Value"], rows));
    for alert in &p.alerts {
        println!("! {}", alert);
    }
    Ok(())
}
