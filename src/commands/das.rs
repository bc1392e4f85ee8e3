// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::config::Settings;
use crate::store::settings as store;
use crate::utils::{fmt_money, parse_decimal, period_arg, required};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("get", sub)) => {
            let period = period_arg(sub)?;
            let cfg = Settings::load(conn)?;
            let row = store::ensure_monthly_settings(conn, period, cfg.default_das)?;
            println!("DAS for {}: {}", period.label(), fmt_money(&row.das_value));
        }
        Some(("set", sub)) => {
            let period = period_arg(sub)?;
            let value = parse_decimal(&required::<String>(sub, "value")?)?;
            let row = store::upsert_monthly_settings(conn, period, value)?;
            println!("DAS for {} set to {}", period.label(), fmt_money(&row.das_value));
        }
        _ => {}
    }
    Ok(())
}
