// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use meibook::commands;
use meibook::config::{self, SettingKey, Settings};
use meibook::db;
use meibook::engine::goals::GoalStatus;
use meibook::engine::monthly::IncomeTaxMode;
use meibook::error::MeiError;
use meibook::models::NewSavingsGoal;
use meibook::period::Period;
use meibook::store::{goals, savings};
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

#[test]
fn saving_is_one_row_per_month() {
    let conn = setup();
    let jan = Period::new(1, 2024).unwrap();
    savings::upsert_saving(&conn, jan, dec!(200), Some("first")).unwrap();
    let s = savings::upsert_saving(&conn, jan, dec!(350), None).unwrap();
    assert_eq!(s.amount, dec!(350));
    assert_eq!(s.description, None);
    assert_eq!(savings::list_savings(&conn).unwrap().len(), 1);
}

#[test]
fn total_savings_sums_and_averages() {
    let conn = setup();
    savings::upsert_saving(&conn, Period::new(1, 2024).unwrap(), dec!(200), None).unwrap();
    savings::upsert_saving(&conn, Period::new(2, 2024).unwrap(), dec!(400), None).unwrap();

    let t = savings::total_savings(&conn).unwrap();
    assert_eq!(t.total_accumulated, dec!(600));
    assert_eq!(t.months_count, 2);
    assert_eq!(t.average_per_month, dec!(300));
    assert!(t.last_update.is_some());
}

#[test]
fn total_savings_of_empty_book_is_zero() {
    let conn = setup();
    let t = savings::total_savings(&conn).unwrap();
    assert_eq!(t.total_accumulated, dec!(0));
    assert_eq!(t.months_count, 0);
    assert_eq!(t.average_per_month, dec!(0));
    assert_eq!(t.last_update, None);
}

#[test]
fn negative_saving_is_rejected() {
    let conn = setup();
    let err = savings::upsert_saving(&conn, Period::new(1, 2024).unwrap(), dec!(-1), None)
        .unwrap_err();
    assert!(matches!(err, MeiError::Validation(_)));
}

#[test]
fn goals_track_accumulated_savings() {
    let conn = setup();
    savings::upsert_saving(&conn, Period::new(1, 2024).unwrap(), dec!(800), None).unwrap();
    goals::insert_goal(
        &conn,
        &NewSavingsGoal {
            title: "Reserve".into(),
            target_amount: dec!(1000),
            deadline: d(2024, 12, 31),
            description: None,
        },
    )
    .unwrap();
    goals::insert_goal(
        &conn,
        &NewSavingsGoal {
            title: "Laptop".into(),
            target_amount: dec!(4000),
            deadline: d(2024, 3, 1),
            description: Some("new machine".into()),
        },
    )
    .unwrap();

    let progress = commands::goals::progress(&conn, d(2024, 6, 1));
    let by_title = |t: &str| progress.iter().find(|p| p.goal.title == t).unwrap();

    let reserve = by_title("Reserve");
    assert_eq!(reserve.current_amount, dec!(800));
    assert_eq!(reserve.progress_pct, dec!(80));
    assert_eq!(reserve.remaining, dec!(200));
    assert_eq!(reserve.status, GoalStatus::AlmostThere);

    assert_eq!(by_title("Laptop").status, GoalStatus::Overdue);
}

#[test]
fn goal_with_zero_target_is_rejected() {
    let conn = setup();
    let err = goals::insert_goal(
        &conn,
        &NewSavingsGoal {
            title: "Nothing".into(),
            target_amount: dec!(0),
            deadline: d(2024, 12, 31),
            description: None,
        },
    )
    .unwrap_err();
    assert!(matches!(err, MeiError::Validation(_)));
}

#[test]
fn settings_fall_back_to_defaults() {
    let conn = setup();
    let cfg = Settings::load(&conn).unwrap();
    assert_eq!(cfg, Settings::default());
    assert_eq!(
        config::get_setting(&conn, SettingKey::DefaultDas).unwrap(),
        "67.00"
    );
}

#[test]
fn settings_are_validated_and_persisted() {
    let conn = setup();
    let stored = config::set_setting(&conn, SettingKey::DefaultDas, " 71.60 ").unwrap();
    assert_eq!(stored, "71.60");
    config::set_setting(&conn, SettingKey::IncomeTaxMode, "annualized").unwrap();

    let cfg = Settings::load(&conn).unwrap();
    assert_eq!(cfg.default_das, dec!(71.60));
    assert_eq!(cfg.tax.mode, IncomeTaxMode::Annualized);

    assert!(config::set_setting(&conn, SettingKey::IrRate, "-0.1").is_err());
    assert!(config::set_setting(&conn, SettingKey::IncomeTaxMode, "sometimes").is_err());
    assert!("no_such_key".parse::<SettingKey>().is_err());

    let snapshot = commands::settings::snapshot(&conn).unwrap();
    assert_eq!(snapshot["default_das"], "71.60");
    assert_eq!(snapshot.len(), SettingKey::ALL.len());
}
