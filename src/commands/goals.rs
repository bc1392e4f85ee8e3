// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;

use crate::engine::goals::{self, GoalProgress};
use crate::models::{NewSavingsGoal, SavingsGoal};
use crate::store::{goals as store, savings};
use crate::utils::{
    fmt_money, maybe_print_json, or_default_logged, parse_date, parse_decimal, pretty_table,
    required, today,
};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let new = NewSavingsGoal {
                title: required::<String>(sub, "title")?,
                target_amount: parse_decimal(&required::<String>(sub, "target")?)?,
                deadline: parse_date(&required::<String>(sub, "deadline")?)?,
                description: sub.get_one::<String>("description").cloned(),
            };
            let g = store::insert_goal(conn, &new)?;
            println!("Goal '{}' created (id {})", g.title, g.id);
        }
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => {
            let id = required::<i64>(sub, "id")?;
            let current = store::get_goal(conn, id)?;
            let g = store::update_goal(conn, id, &merge_edit(&current, sub)?)?;
            println!("Goal {} updated", g.id);
        }
        Some(("rm", sub)) => {
            let id = required::<i64>(sub, "id")?;
            store::delete_goal(conn, id)?;
            println!("Deleted goal {}", id);
        }
        _ => {}
    }
    Ok(())
}

/// Fields given on the command line replace the stored ones.
fn merge_edit(current: &SavingsGoal, sub: &clap::ArgMatches) -> Result<NewSavingsGoal> {
    Ok(NewSavingsGoal {
        title: sub
            .get_one::<String>("title")
            .cloned()
            .unwrap_or_else(|| current.title.clone()),
        target_amount: match sub.get_one::<String>("target") {
            Some(v) => parse_decimal(v)?,
            None => current.target_amount,
        },
        deadline: match sub.get_one::<String>("deadline") {
            Some(v) => parse_date(v)?,
            None => current.deadline,
        },
        description: sub
            .get_one::<String>("description")
            .cloned()
            .or_else(|| current.description.clone()),
    })
}

/// Every goal measured against the accumulated savings as of `on`.
pub fn progress(conn: &Connection, on: NaiveDate) -> Vec<GoalProgress> {
    let list = or_default_logged(store::list_goals(conn), "savings goals");
    let total = or_default_logged(
        savings::total_savings(conn).map(|t| t.total_accumulated),
        "savings total",
    );
    list.iter().map(|g| goals::evaluate(g, total, on)).collect()
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = progress(conn, today());
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let rows = data
        .iter()
        .map(|p| {
            vec![
                p.goal.id.to_string(),
                p.goal.title.clone(),
                fmt_money(&p.goal.target_amount),
                p.goal.deadline.to_string(),
                fmt_money(&p.current_amount),
                format!("{:.1}%", p.progress_pct),
                fmt_money(&p.remaining),
                p.status.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &[
                "ID", "Title", "Target", "Deadline", "Saved", "Progress", "Remaining", "Status"
            ],
            rows
        )
    );
    Ok(())
}
