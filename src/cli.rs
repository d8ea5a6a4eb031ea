// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn json_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print as JSON lines"),
    ]
}

fn period_args() -> [Arg; 3] {
    [
        Arg::new("period")
            .long("period")
            .short('p')
            .default_value("mtd")
            .help("mtd | 7d | lastm | 3m | ytd | custom"),
        Arg::new("from")
            .long("from")
            .help("Custom range start, YYYY-MM-DD"),
        Arg::new("to").long("to").help("Custom range end, YYYY-MM-DD"),
    ]
}

fn filter_args() -> [Arg; 5] {
    [
        Arg::new("type")
            .long("type")
            .default_value("all")
            .help("all | income | expense | transfer"),
        Arg::new("category")
            .long("category")
            .help("Category id or name"),
        Arg::new("sub").long("sub").help("Sub-category id or name"),
        Arg::new("account")
            .long("account")
            .help("Account id or name (matches either end of a transfer)"),
        Arg::new("limit")
            .long("limit")
            .value_parser(value_parser!(usize)),
    ]
}

fn kind_arg() -> Arg {
    Arg::new("kind")
        .long("kind")
        .default_value("expense")
        .help("expense | income")
}

fn style_args() -> [Arg; 2] {
    [
        Arg::new("icon").long("icon"),
        Arg::new("color").long("color").help("#rrggbb"),
    ]
}

fn txn_args(required: bool) -> Vec<Arg> {
    vec![
        Arg::new("date").long("date").help("YYYY-MM-DD, defaults to today"),
        Arg::new("type")
            .long("type")
            .help("income | expense | transfer (default expense)"),
        Arg::new("account")
            .long("account")
            .required(required)
            .help("Source account id or name"),
        Arg::new("to")
            .long("to")
            .help("Destination account for transfers"),
        Arg::new("category").long("category"),
        Arg::new("sub").long("sub"),
        Arg::new("amount").long("amount").required(required),
        Arg::new("note").long("note"),
    ]
}

pub fn build_cli() -> Command {
    Command::new("finhub")
        .version(crate_version!())
        .about("Personal finance ledger: accounts, categories, transactions, period reports")
        .arg(
            Arg::new("data")
                .long("data")
                .global(true)
                .help("Data file (default: platform data dir, or $FINHUB_DATA)"),
        )
        .arg(
            Arg::new("as_of")
                .long("as-of")
                .global(true)
                .help("Evaluate periods as if today were YYYY-MM-DD"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("init").about("Create the data file").arg(
                Arg::new("defaults")
                    .long("defaults")
                    .action(ArgAction::SetTrue)
                    .help("Seed starter accounts and categories"),
            ),
        )
        .subcommand(
            Command::new("account")
                .about("Manage accounts")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .args(style_args())
                        .arg(Arg::new("opening").long("opening").help("Opening balance")),
                )
                .subcommand(Command::new("list").args(json_args()))
                .subcommand(
                    Command::new("edit")
                        .arg(Arg::new("account").required(true))
                        .arg(Arg::new("name").long("name"))
                        .args(style_args())
                        .arg(Arg::new("opening").long("opening")),
                )
                .subcommand(Command::new("rm").arg(Arg::new("account").required(true))),
        )
        .subcommand(
            Command::new("category")
                .about("Manage expense and income categories")
                .subcommand(
                    Command::new("add")
                        .arg(kind_arg())
                        .arg(Arg::new("name").long("name").required(true))
                        .args(style_args()),
                )
                .subcommand(
                    Command::new("list")
                        .arg(Arg::new("kind").long("kind").help("expense | income"))
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(Arg::new("category").required(true))
                        .arg(kind_arg())
                        .arg(Arg::new("name").long("name"))
                        .args(style_args()),
                )
                .subcommand(
                    Command::new("rm")
                        .arg(Arg::new("category").required(true))
                        .arg(kind_arg()),
                ),
        )
        .subcommand(
            Command::new("subcategory")
                .about("Manage sub-categories of expense categories")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("name").long("name").required(true)),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(Arg::new("sub").required(true))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("name").long("name").required(true)),
                )
                .subcommand(
                    Command::new("rm")
                        .arg(Arg::new("sub").required(true))
                        .arg(Arg::new("category").long("category")),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and browse transactions")
                .subcommand(Command::new("add").args(txn_args(true)))
                .subcommand(
                    Command::new("edit")
                        .arg(Arg::new("id").required(true))
                        .args(txn_args(false)),
                )
                .subcommand(
                    Command::new("list")
                        .args(period_args())
                        .args(filter_args())
                        .args(json_args()),
                )
                .subcommand(Command::new("rm").arg(Arg::new("id").required(true))),
        )
        .subcommand(
            Command::new("report")
                .about("Balances, period totals, breakdowns and trends")
                .subcommand(
                    Command::new("summary")
                        .args(period_args())
                        .arg(
                            Arg::new("carry_forward")
                                .long("carry-forward")
                                .help("on | off, overrides the saved setting"),
                        )
                        .args(json_args()),
                )
                .subcommand(Command::new("balances").args(json_args()))
                .subcommand(
                    Command::new("by-category")
                        .arg(kind_arg())
                        .args(period_args())
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("sub-category")
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .help("Limit to one expense category"),
                        )
                        .args(period_args())
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("drill")
                        .arg(Arg::new("sub").long("sub"))
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .help("Category to drill into, or the parent of --sub"),
                        )
                        .arg(kind_arg())
                        .args(period_args())
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("trend")
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .help("Break one expense category down by sub-category"),
                        )
                        .args(json_args()),
                ),
        )
        .subcommand(
            Command::new("export").about("Export transactions").subcommand(
                Command::new("transactions")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .default_value("csv")
                            .help("csv | json"),
                    )
                    .arg(Arg::new("out").long("out").required(true))
                    .args(period_args())
                    .args(filter_args()),
            ),
        )
        .subcommand(
            Command::new("settings")
                .about("Show or change settings")
                .subcommand(Command::new("show").args(json_args()))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("carry_forward").long("carry-forward").help("on | off"))
                        .arg(Arg::new("notifications").long("notifications").help("on | off"))
                        .arg(Arg::new("sms").long("sms-detection").help("on | off"))
                        .arg(Arg::new("ui_mode").long("ui-mode"))
                        .arg(Arg::new("app_name").long("app-name")),
                )
                .subcommand(Command::new("reminder-add").arg(Arg::new("time").required(true)))
                .subcommand(Command::new("reminder-rm").arg(Arg::new("time").required(true))),
        )
        .subcommand(
            Command::new("backup")
                .about("Full-state JSON backups")
                .subcommand(Command::new("create").arg(Arg::new("out").long("out")))
                .subcommand(
                    Command::new("restore").arg(Arg::new("file").long("file").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Check for dangling references"))
}
