// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::models::{CardPatch, NewCardTransaction, NewCreditCard};
use crate::store::cards as store;
use crate::utils::{
    fmt_money, maybe_print_json, or_default_logged, parse_date, parse_decimal, parse_period,
    pretty_table, required, today,
};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let new = NewCreditCard {
                name: required::<String>(sub, "name")?,
                credit_limit: parse_decimal(&required::<String>(sub, "limit")?)?,
                closing_day: required::<u32>(sub, "closing-day")?,
                due_day: required::<u32>(sub, "due-day")?,
            };
            let c = store::insert_card(conn, &new)?;
            println!("Card '{}' added (id {})", c.name, c.id);
        }
        Some(("list", sub)) => {
            let data = or_default_logged(store::list_cards(conn), "credit cards");
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .iter()
                    .map(|c| {
                        vec![
                            c.id.to_string(),
                            c.name.clone(),
                            fmt_money(&c.credit_limit),
                            c.closing_day.to_string(),
                            c.due_day.to_string(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["ID", "Name", "Limit", "Closing day", "Due day"], rows)
                );
            }
        }
        Some(("edit", sub)) => {
            let id = required::<i64>(sub, "id")?;
            let patch = CardPatch {
                name: sub.get_one::<String>("name").cloned(),
                credit_limit: sub
                    .get_one::<String>("limit")
                    .map(|v| parse_decimal(v))
                    .transpose()?,
                closing_day: sub.get_one::<u32>("closing-day").copied(),
                due_day: sub.get_one::<u32>("due-day").copied(),
            };
            let c = store::update_card(conn, id, &patch)?;
            println!("Card {} updated", c.id);
        }
        Some(("rm", sub)) => {
            let id = required::<i64>(sub, "id")?;
            store::delete_card(conn, id)?;
            println!("Deleted card {} and its purchases", id);
        }
        Some(("buy", sub)) => buy(conn, sub)?,
        Some(("purchases", sub)) => purchases(conn, sub)?,
        Some(("rm-purchase", sub)) => {
            let id = required::<i64>(sub, "id")?;
            store::delete_card_transaction(conn, id)?;
            println!("Deleted purchase {} and its installments", id);
        }
        Some(("installments", sub)) => installments(conn, sub)?,
        Some(("pay", sub)) => {
            let id = required::<i64>(sub, "id")?;
            store::set_installment_paid(conn, id, true)?;
            println!("Installment {} marked as paid", id);
        }
        Some(("unpay", sub)) => {
            let id = required::<i64>(sub, "id")?;
            store::set_installment_paid(conn, id, false)?;
            println!("Installment {} marked as unpaid", id);
        }
        Some(("summary", sub)) => summary(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn buy(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let new = NewCardTransaction {
        card_id: required::<i64>(sub, "card")?,
        description: required::<String>(sub, "description")?,
        amount: parse_decimal(&required::<String>(sub, "amount")?)?,
        installment_count: required::<u32>(sub, "installments")?,
        first_installment_date: parse_date(&required::<String>(sub, "date")?)?,
        category: required::<String>(sub, "category")?,
    };
    let (purchase, plan) = store::add_card_transaction(conn, &new)?;
    println!(
        "Purchase '{}' of {} recorded (id {})",
        purchase.description,
        fmt_money(&purchase.amount),
        purchase.id
    );
    if !plan.is_empty() {
        let rows = plan
            .iter()
            .map(|i| {
                vec![
                    format!("{}/{}", i.installment_number, purchase.installment_count),
                    i.due_date.to_string(),
                    fmt_money(&i.amount),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["#", "Due", "Amount"], rows));
    }
    Ok(())
}

fn filters(sub: &clap::ArgMatches) -> Result<(Option<i64>, Option<crate::period::Period>)> {
    let card = sub.get_one::<i64>("card").copied();
    let period = sub
        .get_one::<String>("month")
        .map(|m| parse_period(m))
        .transpose()?;
    Ok((card, period))
}

fn purchases(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (card, period) = filters(sub)?;
    let data = or_default_logged(
        store::list_card_transactions(conn, card, period),
        "card purchases",
    );
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let rows = data
        .iter()
        .map(|p| {
            vec![
                p.id.to_string(),
                p.card_id.to_string(),
                p.first_installment_date.to_string(),
                p.description.clone(),
                p.category.clone(),
                fmt_money(&p.amount),
                p.installment_count.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Card", "First due", "Description", "Category", "Amount", "Installments"],
            rows
        )
    );
    Ok(())
}

fn installments(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (card, period) = filters(sub)?;
    let data = or_default_logged(store::list_installments(conn, card, period), "installments");
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let rows = data
        .iter()
        .map(|i| {
            vec![
                i.id.to_string(),
                i.card_transaction_id.to_string(),
                i.installment_number.to_string(),
                i.due_date.to_string(),
                fmt_money(&i.amount),
                if i.paid { "paid".into() } else { "open".into() },
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["ID", "Purchase", "#", "Due", "Amount", "Status"], rows)
    );
    Ok(())
}

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = or_default_logged(store::cards_summary(conn, today()), "card balances");
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let rows = data
        .iter()
        .map(|s| {
            vec![
                s.card.name.clone(),
                fmt_money(&s.card.credit_limit),
                fmt_money(&s.current_balance),
                fmt_money(&s.available_limit),
                s.next_due_date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".into()),
                fmt_money(&s.next_due_amount),
                s.transactions_count.to_string(),
                fmt_money(&s.total_spent),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &[
                "Card",
                "Limit",
                "Balance",
                "Available",
                "Next due",
                "Next amount",
                "Purchases",
                "Total spent"
            ],
            rows
        )
    );
    Ok(())
}
