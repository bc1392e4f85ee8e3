// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Where the book lives and the user-tunable knobs stored inside it.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::db;
use crate::engine::monthly::{
    DEFAULT_DAS, IR_EXEMPTION, IR_RATE, IncomeTaxMode, LOW_BALANCE_THRESHOLD, TaxPolicy,
};
use crate::error::{MeiError, MeiResult};
use crate::models::require_non_negative;
use crate::store::gate;

/// Environment variable consulted when `--db` is not given.
pub const DB_ENV: &str = "MEIBOOK_DB";

/// `--db` (or `MEIBOOK_DB`, which clap folds into the flag) wins over the
/// platform data directory.
pub fn resolve_db_path(flag: Option<&str>) -> Result<PathBuf> {
    match flag.map(str::trim).filter(|s| !s.is_empty()) {
        Some(p) => Ok(PathBuf::from(p)),
        None => db::default_db_path(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    DefaultDas,
    IncomeTaxMode,
    IrExemption,
    IrRate,
    LowBalanceThreshold,
}

impl SettingKey {
    pub const ALL: [SettingKey; 5] = [
        SettingKey::DefaultDas,
        SettingKey::IncomeTaxMode,
        SettingKey::IrExemption,
        SettingKey::IrRate,
        SettingKey::LowBalanceThreshold,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::DefaultDas => "default_das",
            SettingKey::IncomeTaxMode => "income_tax_mode",
            SettingKey::IrExemption => "ir_exemption",
            SettingKey::IrRate => "ir_rate",
            SettingKey::LowBalanceThreshold => "low_balance_threshold",
        }
    }

    pub fn default_value(&self) -> String {
        match self {
            SettingKey::DefaultDas => DEFAULT_DAS.to_string(),
            SettingKey::IncomeTaxMode => IncomeTaxMode::default().to_string(),
            SettingKey::IrExemption => IR_EXEMPTION.to_string(),
            SettingKey::IrRate => IR_RATE.to_string(),
            SettingKey::LowBalanceThreshold => LOW_BALANCE_THRESHOLD.to_string(),
        }
    }

    /// Normalized form of `raw`, or a validation error.
    fn normalize(&self, raw: &str) -> MeiResult<String> {
        let raw = raw.trim();
        match self {
            SettingKey::IncomeTaxMode => Ok(raw.parse::<IncomeTaxMode>()?.to_string()),
            _ => {
                let v = raw.parse::<Decimal>().map_err(|_| {
                    MeiError::validation(format!("{} expects a decimal, got '{}'", self, raw))
                })?;
                require_non_negative(self.as_str(), v)?;
                Ok(v.to_string())
            }
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = MeiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        SettingKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = SettingKey::ALL.iter().map(|k| k.as_str()).collect();
                MeiError::validation(format!(
                    "unknown setting '{}' (known: {})",
                    s,
                    known.join(", ")
                ))
            })
    }
}

pub fn get_setting(conn: &Connection, key: SettingKey) -> MeiResult<String> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key.as_str()],
            |r| r.get(0),
        )
        .optional()
        .map_err(gate("settings"))?;
    Ok(v.unwrap_or_else(|| key.default_value()))
}

pub fn set_setting(conn: &Connection, key: SettingKey, raw: &str) -> MeiResult<String> {
    let value = key.normalize(raw)?;
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key.as_str(), value],
    )
    .map_err(gate("settings"))?;
    Ok(value)
}

fn decimal_setting(conn: &Connection, key: SettingKey) -> MeiResult<Decimal> {
    let raw = get_setting(conn, key)?;
    raw.parse::<Decimal>()
        .map_err(|_| MeiError::InvalidStoredValue {
            column: "settings.value",
            value: raw,
        })
}

/// All settings, resolved against their defaults.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    pub default_das: Decimal,
    pub tax: TaxPolicy,
    pub low_balance_threshold: Decimal,
}

impl Settings {
    pub fn load(conn: &Connection) -> MeiResult<Self> {
        let mode_raw = get_setting(conn, SettingKey::IncomeTaxMode)?;
        let mode = mode_raw
            .parse::<IncomeTaxMode>()
            .map_err(|_| MeiError::InvalidStoredValue {
                column: "settings.value",
                value: mode_raw,
            })?;
        Ok(Settings {
            default_das: decimal_setting(conn, SettingKey::DefaultDas)?,
            tax: TaxPolicy {
                mode,
                exemption: decimal_setting(conn, SettingKey::IrExemption)?,
                rate: decimal_setting(conn, SettingKey::IrRate)?,
            },
            low_balance_threshold: decimal_setting(conn, SettingKey::LowBalanceThreshold)?,
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            default_das: DEFAULT_DAS,
            tax: TaxPolicy::default(),
            low_balance_threshold: LOW_BALANCE_THRESHOLD,
        }
    }
}
