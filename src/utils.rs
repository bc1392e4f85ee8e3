// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rust_decimal::Decimal;
use tracing::warn;

use crate::period::Period;

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let date = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))?;
    Period::checked_of(date).with_context(|| format!("Invalid date '{}'", s))?;
    Ok(date)
}

pub fn parse_period(s: &str) -> Result<Period> {
    s.parse::<Period>()
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Value of a required argument; clap enforces presence, this only types it.
pub fn required<T: Clone + Send + Sync + 'static>(m: &clap::ArgMatches, id: &str) -> Result<T> {
    m.get_one::<T>(id)
        .cloned()
        .with_context(|| format!("missing --{}", id))
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Period given by `--month`, or the current month.
pub fn period_arg(sub: &clap::ArgMatches) -> Result<Period> {
    match sub.get_one::<String>("month") {
        Some(m) => parse_period(m),
        None => Ok(Period::of(today())),
    }
}

/// Two-decimal rendering, rounded rather than truncated.
pub fn fmt_amount(d: &Decimal) -> String {
    format!("{:.2}", d.round_dp(2))
}

pub fn fmt_money(d: &Decimal) -> String {
    format!("R$ {}", fmt_amount(d))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

/// Dashboard reads degrade to the default value instead of failing the view.
pub fn or_default_logged<T: Default, E: std::fmt::Display>(
    res: std::result::Result<T, E>,
    what: &str,
) -> T {
    res.unwrap_or_else(|e| {
        warn!("could not load {}: {}", what, e);
        T::default()
    })
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // Arrays stream one element per line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn money_rounds_to_cents() {
        let third = dec!(200) / Decimal::from(3);
        assert_eq!(fmt_money(&third), "R$ 66.67");
        assert_eq!(fmt_money(&(dec!(100) / Decimal::from(3))), "R$ 33.33");
        assert_eq!(fmt_money(&dec!(-10.5)), "R$ -10.50");
    }

    #[test]
    fn dates_outside_supported_years_are_rejected() {
        assert!(parse_date("1850-01-01").is_err());
        assert_eq!(
            parse_date("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
    }
}
