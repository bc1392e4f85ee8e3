// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, OptionalExtension};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("br.com.meibook", "Meibook", "meibook"));

/// Tables backing each feature, in provisioning order.
pub const FEATURE_TABLES: &[(&str, &str)] = &[
    ("settings", "configuration"),
    ("transactions", "transactions"),
    ("extra_income", "extra income"),
    ("monthly_settings", "DAS settings"),
    ("monthly_summary", "history"),
    ("monthly_savings", "savings"),
    ("savings_goals", "savings goals"),
    ("credit_cards", "credit cards"),
    ("card_transactions", "credit cards"),
    ("card_installments", "credit cards"),
];

pub fn default_db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("meibook.sqlite"))
}

pub fn open_or_init(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let conn =
        Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
    let status = schema_status(&conn)?;
    if !status.is_ready() {
        info!(missing = ?status.missing, "provisioning schema at {}", path.display());
    }
    init_schema(&conn)?;
    Ok(conn)
}

/// Creates every table the book needs. Safe to run on an existing database.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        kind TEXT NOT NULL CHECK(kind IN ('income','expense')),
        category TEXT NOT NULL,
        amount TEXT NOT NULL,
        date TEXT NOT NULL,
        description TEXT NOT NULL,
        is_recurring INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);

    CREATE TABLE IF NOT EXISTS extra_income(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        amount TEXT NOT NULL,
        description TEXT NOT NULL,
        date TEXT NOT NULL,
        month INTEGER NOT NULL,
        year INTEGER NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_extra_income_period ON extra_income(year, month);

    CREATE TABLE IF NOT EXISTS monthly_settings(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        month INTEGER NOT NULL,
        year INTEGER NOT NULL,
        das_value TEXT NOT NULL,
        updated_at TEXT NOT NULL DEFAULT (datetime('now')),
        UNIQUE(month, year)
    );

    CREATE TABLE IF NOT EXISTS monthly_summary(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        month INTEGER NOT NULL,
        year INTEGER NOT NULL,
        total_income TEXT NOT NULL,
        total_expenses TEXT NOT NULL,
        total_extras TEXT NOT NULL,
        das_value TEXT NOT NULL,
        income_tax_estimate TEXT NOT NULL,
        net_balance TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        UNIQUE(month, year)
    );

    CREATE TABLE IF NOT EXISTS monthly_savings(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        month INTEGER NOT NULL,
        year INTEGER NOT NULL,
        amount TEXT NOT NULL,
        description TEXT,
        updated_at TEXT NOT NULL DEFAULT (datetime('now')),
        UNIQUE(month, year)
    );

    CREATE TABLE IF NOT EXISTS savings_goals(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        target_amount TEXT NOT NULL,
        deadline TEXT NOT NULL,
        description TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS credit_cards(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        credit_limit TEXT NOT NULL,
        closing_day INTEGER NOT NULL CHECK(closing_day BETWEEN 1 AND 31),
        due_day INTEGER NOT NULL CHECK(due_day BETWEEN 1 AND 31),
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS card_transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        card_id INTEGER NOT NULL,
        description TEXT NOT NULL,
        amount TEXT NOT NULL,
        installment_count INTEGER NOT NULL CHECK(installment_count >= 1),
        first_installment_date TEXT NOT NULL,
        category TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(card_id) REFERENCES credit_cards(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_card_transactions_card ON card_transactions(card_id);

    CREATE TABLE IF NOT EXISTS card_installments(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        card_transaction_id INTEGER NOT NULL,
        installment_number INTEGER NOT NULL,
        amount TEXT NOT NULL,
        due_date TEXT NOT NULL,
        paid INTEGER NOT NULL DEFAULT 0,
        UNIQUE(card_transaction_id, installment_number),
        FOREIGN KEY(card_transaction_id) REFERENCES card_transactions(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_card_installments_due ON card_installments(due_date);
    "#,
    )?;
    debug!("schema provisioned");
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaStatus {
    pub present: Vec<&'static str>,
    pub missing: Vec<&'static str>,
}

impl SchemaStatus {
    pub fn is_ready(&self) -> bool {
        self.missing.is_empty()
    }

    /// Features whose backing tables have not been created yet.
    pub fn missing_features(&self) -> Vec<&'static str> {
        let mut out: Vec<&'static str> = FEATURE_TABLES
            .iter()
            .filter(|(t, _)| self.missing.contains(t))
            .map(|(_, f)| *f)
            .collect();
        out.dedup();
        out
    }
}

pub fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1",
            [table],
            |r| r.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

pub fn schema_status(conn: &Connection) -> Result<SchemaStatus> {
    let mut present = Vec::new();
    let mut missing = Vec::new();
    for (table, _) in FEATURE_TABLES {
        if table_exists(conn, table)? {
            present.push(*table);
        } else {
            missing.push(*table);
        }
    }
    Ok(SchemaStatus { present, missing })
}
