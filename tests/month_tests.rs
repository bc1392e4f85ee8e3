// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use meibook::config::{self, SettingKey, Settings};
use meibook::db;
use meibook::error::MeiError;
use meibook::models::{NewExtraIncome, NewTransaction, TxKind};
use meibook::period::Period;
use meibook::store::{extras, month, settings, summaries, transactions};
use meibook::{cli, commands};
use rusqlite::Connection;
use rust_decimal_macros::dec;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn tx(kind: TxKind, amount: rust_decimal::Decimal, date: NaiveDate, recurring: bool) -> NewTransaction {
    NewTransaction {
        kind,
        category: "General".into(),
        amount,
        date,
        description: format!("{} on {}", kind, date),
        is_recurring: recurring,
    }
}

fn seed_march(conn: &Connection) -> Period {
    let march = Period::new(3, 2024).unwrap();
    transactions::insert_transaction(conn, &tx(TxKind::Income, dec!(5000), d(2024, 3, 5), false))
        .unwrap();
    transactions::insert_transaction(conn, &tx(TxKind::Expense, dec!(1200), d(2024, 3, 10), true))
        .unwrap();
    extras::insert_extra_income(conn, &NewExtraIncome::dated(dec!(300), "Freela", d(2024, 3, 12)))
        .unwrap();
    settings::upsert_monthly_settings(conn, march, dec!(67)).unwrap();
    march
}

#[test]
fn archive_records_march_totals() {
    let conn = setup();
    let march = seed_march(&conn);
    let cfg = Settings::load(&conn).unwrap();

    let s = month::archive_current_month(&conn, march, &cfg).unwrap();
    assert_eq!(s.total_income, dec!(5000));
    assert_eq!(s.total_expenses, dec!(1200));
    assert_eq!(s.total_extras, dec!(300));
    assert_eq!(s.das_value, dec!(67));
    assert_eq!(s.income_tax_estimate, dec!(0));
    assert_eq!(s.net_balance, dec!(4033));
    assert_eq!(s.status(), "Positive");
}

#[test]
fn archiving_twice_keeps_one_row_with_latest_totals() {
    let conn = setup();
    let march = seed_march(&conn);
    let cfg = Settings::load(&conn).unwrap();

    let first = month::archive_current_month(&conn, march, &cfg).unwrap();
    transactions::insert_transaction(&conn, &tx(TxKind::Expense, dec!(33), d(2024, 3, 20), false))
        .unwrap();
    let second = month::archive_current_month(&conn, march, &cfg).unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.net_balance, dec!(4000));
    assert_eq!(summaries::list_summaries(&conn).unwrap().len(), 1);
}

#[test]
fn annualized_tax_mode_estimates_above_exemption() {
    let conn = setup();
    let march = seed_march(&conn);
    config::set_setting(&conn, SettingKey::IncomeTaxMode, "annualized").unwrap();
    let cfg = Settings::load(&conn).unwrap();

    let s = month::archive_current_month(&conn, march, &cfg).unwrap();
    // (5300 * 12 - 28559.70) * 0.075
    assert_eq!(s.income_tax_estimate, dec!(2628.0225));
}

#[test]
fn month_without_das_row_uses_default() {
    let conn = setup();
    let april = Period::new(4, 2024).unwrap();
    let cfg = Settings::load(&conn).unwrap();
    let totals = month::month_totals(&conn, april, &cfg).unwrap();
    assert_eq!(totals.das_value, dec!(67.00));
    assert_eq!(totals.net_balance(), dec!(-67));
    assert!(settings::get_monthly_settings(&conn, april).unwrap().is_none());
}

#[test]
fn prepare_next_month_rolls_december_into_january() {
    let mut conn = setup();
    let dec_ = Period::new(12, 2024).unwrap();
    transactions::insert_transaction(&conn, &tx(TxKind::Expense, dec!(800), d(2024, 12, 31), true))
        .unwrap();
    transactions::insert_transaction(&conn, &tx(TxKind::Expense, dec!(50), d(2024, 12, 3), false))
        .unwrap();
    settings::upsert_monthly_settings(&conn, dec_, dec!(70.60)).unwrap();

    let report = month::prepare_next_month(&mut conn, dec_).unwrap();
    let jan = Period::new(1, 2025).unwrap();
    assert_eq!(report.target, jan);
    assert_eq!(report.copied, 1);
    assert_eq!(report.das_copied, Some(dec!(70.60)));

    let copied = transactions::list_transactions(&conn, jan).unwrap();
    assert_eq!(copied.len(), 1);
    assert_eq!(copied[0].date, d(2025, 1, 31));
    assert_eq!(copied[0].amount, dec!(800));
    assert!(copied[0].is_recurring);
    assert_eq!(settings::das_for(&conn, jan, dec!(0)).unwrap(), dec!(70.60));
}

#[test]
fn prepare_next_month_runs_again_and_duplicates() {
    let mut conn = setup();
    let jan = Period::new(1, 2024).unwrap();
    transactions::insert_transaction(&conn, &tx(TxKind::Expense, dec!(100), d(2024, 1, 31), true))
        .unwrap();

    month::prepare_next_month(&mut conn, jan).unwrap();
    month::prepare_next_month(&mut conn, jan).unwrap();

    let feb = transactions::list_transactions(&conn, jan.next()).unwrap();
    assert_eq!(feb.len(), 2);
    assert!(feb.iter().all(|t| t.date == d(2024, 2, 29)));
}

#[test]
fn store_reports_missing_schema_on_bare_database() {
    let conn = Connection::open_in_memory().unwrap();
    let period = Period::new(3, 2024).unwrap();
    let err = transactions::list_transactions(&conn, period).unwrap_err();
    assert!(matches!(err, MeiError::MissingSchema("transactions")));

    let status = db::schema_status(&conn).unwrap();
    assert!(!status.is_ready());
    assert!(status.missing_features().contains(&"credit cards"));
}

#[test]
fn dashboard_degrades_on_missing_tables() {
    let conn = Connection::open_in_memory().unwrap();
    let p = commands::month::dashboard(&conn, Period::new(5, 2024).unwrap());
    assert_eq!(p.totals.total_income, dec!(0));
    assert_eq!(p.totals.das_value, dec!(67.00));
    assert_eq!(p.das_due_date, d(2024, 5, 20));
}

#[test]
fn month_archive_via_cli() {
    let mut conn = setup();
    seed_march(&conn);
    let matches = cli::build_cli().get_matches_from([
        "meibook", "month", "archive", "--month", "2024-03",
    ]);
    let Some(("month", sub)) = matches.subcommand() else {
        panic!("no month subcommand");
    };
    commands::month::handle(&mut conn, sub).unwrap();
    let saved = summaries::get_summary(&conn, Period::new(3, 2024).unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(saved.net_balance, dec!(4033));
}

#[test]
fn oversized_amounts_are_refused_on_write() {
    let conn = setup();
    let huge: rust_decimal::Decimal = "7000000000000000000000000000".parse().unwrap();
    let err = transactions::insert_transaction(&conn, &tx(TxKind::Income, huge, d(2024, 3, 5), false))
        .unwrap_err();
    assert!(matches!(err, MeiError::Validation(_)));
    assert!(settings::upsert_monthly_settings(&conn, Period::new(3, 2024).unwrap(), huge).is_err());
    assert!(config::set_setting(&conn, SettingKey::DefaultDas, "7000000000000000000000000000").is_err());
}

#[test]
fn dashboard_survives_oversized_stored_amount() {
    let conn = setup();
    let march = seed_march(&conn);
    conn.execute(
        "INSERT INTO transactions(kind, category, amount, date, description, is_recurring)
         VALUES ('income', 'General', '7000000000000000000000000000', '2024-03-15', 'bad row', 0)",
        [],
    )
    .unwrap();

    assert!(transactions::list_transactions(&conn, march).is_err());
    let p = commands::month::dashboard(&conn, march);
    assert_eq!(p.totals.total_income, dec!(0));
    assert_eq!(p.totals.total_extras, dec!(300));
}

#[test]
fn settings_report_missing_schema_on_bare_database() {
    let conn = Connection::open_in_memory().unwrap();
    assert!(matches!(
        config::get_setting(&conn, SettingKey::DefaultDas),
        Err(MeiError::MissingSchema("settings"))
    ));
    assert!(matches!(
        config::set_setting(&conn, SettingKey::IrRate, "0.1"),
        Err(MeiError::MissingSchema("settings"))
    ));
    assert!(matches!(
        Settings::load(&conn),
        Err(MeiError::MissingSchema("settings"))
    ));
}
