// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use meibook::db;
use meibook::engine::history::HistoryStats;
use meibook::models::MonthlySummary;
use meibook::period::Period;
use meibook::store::summaries;
use meibook::{cli, commands};
use rusqlite::Connection;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn summary(month: u32, income: Decimal, expenses: Decimal) -> MonthlySummary {
    MonthlySummary {
        id: 0,
        period: Period::new(month, 2024).unwrap(),
        total_income: income,
        total_expenses: expenses,
        total_extras: dec!(0),
        das_value: dec!(67),
        income_tax_estimate: dec!(0),
        net_balance: income - expenses - dec!(67),
    }
}

fn seed(conn: &Connection) {
    summaries::save_summary(conn, &summary(1, dec!(4000), dec!(1000))).unwrap();
    summaries::save_summary(conn, &summary(2, dec!(3000), dec!(3500))).unwrap();
    summaries::save_summary(conn, &summary(3, dec!(5000), dec!(900))).unwrap();
}

fn history_matches(args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["meibook", "history"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("history", sub)) => sub.clone(),
        _ => panic!("no history subcommand"),
    }
}

#[test]
fn list_is_newest_first() {
    let conn = setup();
    seed(&conn);
    let rows = summaries::list_summaries(&conn).unwrap();
    let periods: Vec<String> = rows.iter().map(|s| s.period.to_string()).collect();
    assert_eq!(periods, vec!["2024-03", "2024-02", "2024-01"]);
    assert_eq!(rows[1].status(), "Negative");
}

#[test]
fn export_csv_writes_header_and_rows() {
    let conn = setup();
    seed(&conn);
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("history.csv");

    let n = commands::history::export_history(&conn, "csv", &out).unwrap();
    assert_eq!(n, 3);
    let text = std::fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines[0],
        "Period,Income,Expenses,Extras,DAS,IncomeTax,NetBalance,Status"
    );
    assert_eq!(
        lines[1],
        "03/2024,5000.00,900.00,0.00,67.00,0.00,4033.00,Positive"
    );
    assert_eq!(lines.len(), 4);
}

#[test]
fn export_json_is_an_array() {
    let conn = setup();
    seed(&conn);
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("history.json");

    commands::history::export_history(&conn, "JSON", &out).unwrap();
    let v: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(v.as_array().unwrap().len(), 3);
}

#[test]
fn export_rejects_unknown_format_without_creating_file() {
    let conn = setup();
    seed(&conn);
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("history.xml");

    let err = commands::history::export_history(&conn, "xml", &out).unwrap_err();
    assert!(err.to_string().contains("Unknown format"));
    assert!(!out.exists());
}

#[test]
fn clear_requires_confirmation() {
    let conn = setup();
    seed(&conn);

    assert!(commands::history::handle(&conn, &history_matches(&["clear"])).is_err());
    assert_eq!(summaries::list_summaries(&conn).unwrap().len(), 3);

    commands::history::handle(&conn, &history_matches(&["clear", "--yes"])).unwrap();
    assert!(summaries::list_summaries(&conn).unwrap().is_empty());
}

#[test]
fn remove_single_summary() {
    let conn = setup();
    seed(&conn);
    let feb = summaries::get_summary(&conn, Period::new(2, 2024).unwrap())
        .unwrap()
        .unwrap();
    summaries::delete_summary(&conn, feb.id).unwrap();
    assert_eq!(summaries::list_summaries(&conn).unwrap().len(), 2);
    assert!(summaries::delete_summary(&conn, feb.id).is_err());
}

#[test]
fn stats_over_archived_months() {
    let conn = setup();
    seed(&conn);
    let stats = HistoryStats::compute(&summaries::list_summaries(&conn).unwrap()).unwrap();
    assert_eq!(stats.months, 3);
    assert_eq!(stats.average_income, dec!(4000));
    assert_eq!(stats.income_trend, dec!(2000));
    assert_eq!(stats.expense_trend, dec!(-2600));
    assert_eq!(stats.best_month, Period::new(3, 2024).unwrap());
    assert_eq!(stats.worst_month, Period::new(2, 2024).unwrap());
}
