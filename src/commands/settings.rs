// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;

use anyhow::Result;
use rusqlite::Connection;

use crate::config::{self, SettingKey};
use crate::utils::{maybe_print_json, pretty_table, required};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => {
            let all = snapshot(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &all)? {
                let rows = all.into_iter().map(|(k, v)| vec![k.to_string(), v]).collect();
                println!("{}", pretty_table(&["Key", "Value"], rows));
            }
        }
        Some(("get", sub)) => {
            let key: SettingKey = required::<String>(sub, "key")?.parse()?;
            println!("{}", config::get_setting(conn, key)?);
        }
        Some(("set", sub)) => {
            let key: SettingKey = required::<String>(sub, "key")?.parse()?;
            let stored = config::set_setting(conn, key, &required::<String>(sub, "value")?)?;
            println!("{} = {}", key, stored);
        }
        _ => {}
    }
    Ok(())
}

/// Every known setting with its effective value.
pub fn snapshot(conn: &Connection) -> Result<BTreeMap<&'static str, String>> {
    let mut out = BTreeMap::new();
    for key in SettingKey::ALL {
        out.insert(key.as_str(), config::get_setting(conn, key)?);
    }
    Ok(out)
}
