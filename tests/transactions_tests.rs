// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use meibook::commands::{extras as extra_cmd, transactions};
use meibook::db;
use meibook::error::MeiError;
use meibook::models::{NewExtraIncome, TxKind};
use meibook::period::Period;
use meibook::store::{extras, transactions as store};
use meibook::cli;
use rusqlite::Connection;
use rust_decimal_macros::dec;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn sub_matches(group: &str, args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["meibook", group];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some((name, sub)) if name == group => sub.clone(),
        _ => panic!("no {} subcommand", group),
    }
}

#[test]
fn add_and_list_via_cli() {
    let conn = setup();
    for (kind, amount, date) in [
        ("income", "5000", "2024-03-05"),
        ("expense", "120.50", "2024-03-07"),
        ("expense", "99", "2024-04-01"),
    ] {
        let m = sub_matches(
            "tx",
            &[
                "add",
                "--kind",
                kind,
                "--amount",
                amount,
                "--date",
                date,
                "--description",
                "item",
            ],
        );
        transactions::handle(&conn, &m).unwrap();
    }

    let m = sub_matches("tx", &["list", "--month", "2024-03"]);
    let Some(("list", list_m)) = m.subcommand() else {
        panic!("no list subcommand");
    };
    let rows = transactions::query_rows(&conn, list_m).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].category, "General");

    let m = sub_matches("tx", &["list", "--month", "2024-03", "--kind", "expense"]);
    let Some(("list", list_m)) = m.subcommand() else {
        panic!("no list subcommand");
    };
    let rows = transactions::query_rows(&conn, list_m).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].kind, TxKind::Expense);
    assert_eq!(rows[0].amount, dec!(120.50));
}

#[test]
fn negative_amount_is_rejected() {
    let conn = setup();
    let m = sub_matches(
        "tx",
        &[
            "add",
            "--kind",
            "expense",
            "--amount",
            "-10",
            "--date",
            "2024-03-05",
            "--description",
            "oops",
        ],
    );
    let Some(("add", add_m)) = m.subcommand() else {
        panic!("no add subcommand");
    };
    let new = transactions::new_from_args(add_m).unwrap();
    assert!(matches!(
        store::insert_transaction(&conn, &new),
        Err(MeiError::Validation(_))
    ));
}

#[test]
fn delete_missing_transaction_is_not_found() {
    let conn = setup();
    assert!(matches!(
        store::delete_transaction(&conn, 7),
        Err(MeiError::NotFound { id: 7, .. })
    ));
}

#[test]
fn extra_income_can_be_booked_in_another_month() {
    let conn = setup();
    let m = sub_matches(
        "extra",
        &[
            "add",
            "--amount",
            "300",
            "--description",
            "Freela",
            "--date",
            "2024-03-30",
            "--month",
            "2024-04",
        ],
    );
    extra_cmd::handle(&conn, &m).unwrap();

    let march = Period::new(3, 2024).unwrap();
    assert!(extras::list_extra_income(&conn, march).unwrap().is_empty());
    let april = extras::list_extra_income(&conn, march.next()).unwrap();
    assert_eq!(april.len(), 1);
    assert_eq!(april[0].date, NaiveDate::from_ymd_opt(2024, 3, 30).unwrap());

    extras::insert_extra_income(
        &conn,
        &NewExtraIncome::dated(dec!(50), "Tip", NaiveDate::from_ymd_opt(2024, 4, 2).unwrap()),
    )
    .unwrap();
    assert_eq!(extras::list_extra_income(&conn, march.next()).unwrap().len(), 2);
}

#[test]
fn dates_outside_supported_years_are_refused() {
    let conn = setup();
    let old = NaiveDate::from_ymd_opt(1850, 1, 1).unwrap();
    assert!(matches!(
        extras::insert_extra_income(&conn, &NewExtraIncome::dated(dec!(10), "Old", old)),
        Err(MeiError::Validation(_))
    ));

    let m = sub_matches(
        "extra",
        &[
            "add",
            "--amount",
            "10",
            "--description",
            "Old",
            "--date",
            "1850-01-01",
        ],
    );
    assert!(extra_cmd::handle(&conn, &m).is_err());
    assert!(extras::list_extra_income(&conn, Period::new(3, 2024).unwrap())
        .unwrap()
        .is_empty());
}
