// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

use crate::config::DB_ENV;

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn month_arg(required: bool) -> Arg {
    Arg::new("month")
        .long("month")
        .value_name("YYYY-MM")
        .required(required)
        .help(if required {
            "Month"
        } else {
            "Month (defaults to the current month)"
        })
}

fn id_arg(what: &'static str) -> Arg {
    Arg::new("id")
        .long("id")
        .required(true)
        .value_parser(value_parser!(i64))
        .help(what)
}

fn tx_cmd() -> Command {
    Command::new("tx")
        .about("Income and expense transactions")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Record a transaction")
                .arg(
                    Arg::new("kind")
                        .long("kind")
                        .required(true)
                        .value_parser(["income", "expense"]),
                )
                .arg(Arg::new("category").long("category").default_value("General"))
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(Arg::new("date").long("date").required(true).value_name("YYYY-MM-DD"))
                .arg(Arg::new("description").long("description").required(true))
                .arg(
                    Arg::new("recurring")
                        .long("recurring")
                        .action(ArgAction::SetTrue)
                        .help("Copy this transaction into the next month on prepare-next"),
                ),
        )
        .subcommand(json_flags(
            Command::new("list")
                .about("List a month's transactions")
                .arg(month_arg(false))
                .arg(
                    Arg::new("kind")
                        .long("kind")
                        .value_parser(["income", "expense"]),
                ),
        ))
        .subcommand(Command::new("rm").about("Delete a transaction").arg(id_arg("Transaction id")))
}

fn extra_cmd() -> Command {
    Command::new("extra")
        .about("Extra income on top of regular revenue")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Record extra income")
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(Arg::new("description").long("description").required(true))
                .arg(Arg::new("date").long("date").required(true).value_name("YYYY-MM-DD"))
                .arg(month_arg(false).help("Month to book it in (defaults to the date's month)")),
        )
        .subcommand(json_flags(
            Command::new("list")
                .about("List a month's extra income")
                .arg(month_arg(false)),
        ))
        .subcommand(Command::new("rm").about("Delete extra income").arg(id_arg("Extra income id")))
}

fn das_cmd() -> Command {
    Command::new("das")
        .about("Monthly DAS value")
        .subcommand_required(true)
        .subcommand(Command::new("get").arg(month_arg(false)))
        .subcommand(
            Command::new("set")
                .arg(month_arg(false))
                .arg(Arg::new("value").long("value").required(true)),
        )
}

fn month_cmd() -> Command {
    Command::new("month")
        .about("Monthly dashboard, archiving and rollover")
        .subcommand_required(true)
        .subcommand(json_flags(
            Command::new("show")
                .about("Totals, projection and alerts for a month")
                .arg(month_arg(false)),
        ))
        .subcommand(
            Command::new("archive")
                .about("Save the month's totals into the history")
                .arg(month_arg(false)),
        )
        .subcommand(
            Command::new("prepare-next")
                .about("Copy recurring transactions and DAS into the following month")
                .arg(month_arg(false)),
        )
}

fn history_cmd() -> Command {
    Command::new("history")
        .about("Archived monthly summaries")
        .subcommand_required(true)
        .subcommand(json_flags(Command::new("list")))
        .subcommand(json_flags(
            Command::new("stats").about("Averages and trends over the last 12 archived months"),
        ))
        .subcommand(Command::new("rm").arg(id_arg("Summary id")))
        .subcommand(
            Command::new("clear")
                .about("Delete every archived summary")
                .arg(
                    Arg::new("yes")
                        .long("yes")
                        .action(ArgAction::SetTrue)
                        .help("Confirm the irreversible deletion"),
                ),
        )
        .subcommand(
            Command::new("export")
                .arg(
                    Arg::new("format")
                        .long("format")
                        .default_value("csv")
                        .help("csv|json"),
                )
                .arg(Arg::new("out").long("out").required(true)),
        )
}

fn savings_cmd() -> Command {
    Command::new("savings")
        .about("Monthly savings contributions")
        .subcommand_required(true)
        .subcommand(
            Command::new("set")
                .arg(month_arg(false))
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(Arg::new("description").long("description")),
        )
        .subcommand(json_flags(Command::new("list")))
        .subcommand(Command::new("rm").arg(id_arg("Saving id")))
        .subcommand(json_flags(Command::new("total")))
}

fn goal_fields(cmd: Command, required: bool) -> Command {
    cmd.arg(Arg::new("title").long("title").required(required))
        .arg(Arg::new("target").long("target").required(required))
        .arg(
            Arg::new("deadline")
                .long("deadline")
                .required(required)
                .value_name("YYYY-MM-DD"),
        )
        .arg(Arg::new("description").long("description"))
}

fn goal_cmd() -> Command {
    Command::new("goal")
        .about("Savings goals tracked against accumulated savings")
        .subcommand_required(true)
        .subcommand(goal_fields(Command::new("add"), true))
        .subcommand(json_flags(Command::new("list")))
        .subcommand(goal_fields(Command::new("edit").arg(id_arg("Goal id")), false))
        .subcommand(Command::new("rm").arg(id_arg("Goal id")))
}

fn card_fields(cmd: Command, required: bool) -> Command {
    cmd.arg(Arg::new("name").long("name").required(required))
        .arg(Arg::new("limit").long("limit").required(required))
        .arg(
            Arg::new("closing-day")
                .long("closing-day")
                .required(required)
                .value_parser(value_parser!(u32).range(1..=31)),
        )
        .arg(
            Arg::new("due-day")
                .long("due-day")
                .required(required)
                .value_parser(value_parser!(u32).range(1..=31)),
        )
}

fn card_filter(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("card")
            .long("card")
            .value_parser(value_parser!(i64))
            .help("Card id"),
    )
    .arg(month_arg(false).help("Month filter"))
}

fn card_cmd() -> Command {
    Command::new("card")
        .about("Credit cards, purchases and installments")
        .subcommand_required(true)
        .subcommand(card_fields(Command::new("add"), true))
        .subcommand(json_flags(Command::new("list")))
        .subcommand(card_fields(Command::new("edit").arg(id_arg("Card id")), false))
        .subcommand(Command::new("rm").arg(id_arg("Card id")))
        .subcommand(
            Command::new("buy")
                .about("Record a card purchase")
                .arg(
                    Arg::new("card")
                        .long("card")
                        .required(true)
                        .value_parser(value_parser!(i64)),
                )
                .arg(Arg::new("description").long("description").required(true))
                .arg(Arg::new("amount").long("amount").required(true).help("Total purchase amount"))
                .arg(
                    Arg::new("installments")
                        .long("installments")
                        .default_value("1")
                        .value_parser(value_parser!(u32).range(1..)),
                )
                .arg(
                    Arg::new("date")
                        .long("date")
                        .required(true)
                        .value_name("YYYY-MM-DD")
                        .help("Due date of the first installment"),
                )
                .arg(Arg::new("category").long("category").default_value("General")),
        )
        .subcommand(json_flags(card_filter(Command::new("purchases"))))
        .subcommand(Command::new("rm-purchase").arg(id_arg("Purchase id")))
        .subcommand(json_flags(card_filter(Command::new("installments"))))
        .subcommand(Command::new("pay").arg(id_arg("Installment id")))
        .subcommand(Command::new("unpay").arg(id_arg("Installment id")))
        .subcommand(json_flags(Command::new("summary")))
}

fn config_cmd() -> Command {
    Command::new("config")
        .about("Persisted settings")
        .subcommand_required(true)
        .subcommand(json_flags(Command::new("show")))
        .subcommand(Command::new("get").arg(Arg::new("key").required(true)))
        .subcommand(
            Command::new("set")
                .arg(Arg::new("key").required(true))
                .arg(Arg::new("value").required(true)),
        )
}

pub fn build_cli() -> Command {
    Command::new("meibook")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Monthly cash book for MEI micro-entrepreneurs")
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .env(DB_ENV)
                .value_name("PATH")
                .help("SQLite database file"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("More log output (-v info, -vv debug, -vvv trace)"),
        )
        .subcommand(Command::new("init").about("Create the database and all tables"))
        .subcommand(Command::new("doctor").about("Check schema and installment consistency"))
        .subcommand(tx_cmd())
        .subcommand(extra_cmd())
        .subcommand(das_cmd())
        .subcommand(month_cmd())
        .subcommand(history_cmd())
        .subcommand(savings_cmd())
        .subcommand(goal_cmd())
        .subcommand(card_cmd())
        .subcommand(config_cmd())
}
