// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::io::Write;
use std::str::FromStr;

use anyhow::{Result, anyhow};
use serde_json::{Value, json};

use crate::models::MonthlySummary;
use crate::utils::fmt_amount;

pub const SUMMARY_HEADERS: [&str; 8] = [
    "Period",
    "Income",
    "Expenses",
    "Extras",
    "DAS",
    "IncomeTax",
    "NetBalance",
    "Status",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl FromStr for ExportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(anyhow!("Unknown format: {} (use csv|json)", other)),
        }
    }
}

fn summary_record(s: &MonthlySummary) -> [String; 8] {
    [
        s.period.label(),
        fmt_amount(&s.total_income),
        fmt_amount(&s.total_expenses),
        fmt_amount(&s.total_extras),
        fmt_amount(&s.das_value),
        fmt_amount(&s.income_tax_estimate),
        fmt_amount(&s.net_balance),
        s.status().to_string(),
    ]
}

/// Writes one CSV row per archived month, in the order given.
pub fn write_summaries_csv<W: Write>(summaries: &[MonthlySummary], out: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(SUMMARY_HEADERS)?;
    for s in summaries {
        wtr.write_record(summary_record(s))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn summaries_json(summaries: &[MonthlySummary]) -> Value {
    Value::Array(
        summaries
            .iter()
            .map(|s| {
                let [period, income, expenses, extras, das, tax, net, status] = summary_record(s);
                json!({
                    "period": period, "income": income, "expenses": expenses, "extras": extras,
                    "das": das, "income_tax": tax, "net_balance": net, "status": status
                })
            })
            .collect(),
    )
}

pub fn write_summaries<W: Write>(
    summaries: &[MonthlySummary],
    format: ExportFormat,
    mut out: W,
) -> Result<()> {
    match format {
        ExportFormat::Csv => write_summaries_csv(summaries, out),
        ExportFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &summaries_json(summaries))?;
            out.flush()?;
            Ok(())
        }
    }
}
