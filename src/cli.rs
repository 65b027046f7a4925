// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn lang_arg() -> Arg {
    Arg::new("lang")
        .long("lang")
        .default_value("en")
        .help("Report language: en|pl")
}

fn month_arg(required: bool) -> Arg {
    Arg::new("month")
        .long("month")
        .required(required)
        .help("Month as YYYY-MM")
}

pub fn build_cli() -> Command {
    command!()
        .name("housebudget")
        .about("Household budget: transactions, categories, monthly budgets and reports")
        .subcommand(Command::new("init").about("Create the database and default categories"))
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("color").long("color").help("#RRGGBB")),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("rename").long("rename"))
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("color").long("color")),
                )
                .subcommand(json_flags(
                    Command::new("list").arg(
                        Arg::new("all")
                            .long("all")
                            .action(ArgAction::SetTrue)
                            .help("Include deactivated categories"),
                    ),
                ))
                .subcommand(Command::new("rm").arg(Arg::new("name").required(true))),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and browse transactions")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("date").long("date").help("YYYY-MM-DD, default today"))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("description").long("description").required(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(
                            Arg::new("income")
                                .long("income")
                                .action(ArgAction::SetTrue)
                                .help("Record as income instead of expense"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(month_arg(false))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("search").long("search"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("rm").arg(
                        Arg::new("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                ),
        )
        .subcommand(
            Command::new("budget")
                .about("Planned amounts per category and month")
                .subcommand(
                    Command::new("set")
                        .arg(month_arg(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("amount").long("amount").required(true)),
                )
                .subcommand(json_flags(Command::new("list").arg(month_arg(true)))),
        )
        .subcommand(
            Command::new("report")
                .about("Print reports")
                .subcommand(json_flags(
                    Command::new("month").arg(month_arg(true)).arg(lang_arg()),
                ))
                .subcommand(json_flags(
                    Command::new("year")
                        .arg(
                            Arg::new("year")
                                .long("year")
                                .required(true)
                                .value_parser(value_parser!(i32)),
                        )
                        .arg(lang_arg()),
                ))
                .subcommand(json_flags(
                    Command::new("stats")
                        .arg(Arg::new("from").long("from").required(true))
                        .arg(Arg::new("to").long("to").required(true)),
                )),
        )
        .subcommand(
            Command::new("export")
                .about("Write reports and transactions to files")
                .subcommand(
                    Command::new("csv")
                        .arg(month_arg(true))
                        .arg(Arg::new("out").long("out").required(true))
                        .arg(lang_arg()),
                )
                .subcommand(
                    Command::new("txt")
                        .arg(month_arg(false))
                        .arg(
                            Arg::new("year")
                                .long("year")
                                .value_parser(value_parser!(i32))
                                .conflicts_with("month"),
                        )
                        .arg(Arg::new("out").long("out").required(true))
                        .arg(lang_arg()),
                ),
        )
        .subcommand(
            Command::new("settings")
                .about("Application settings")
                .subcommand(
                    Command::new("currency")
                        .about("Show or set the default currency")
                        .arg(Arg::new("code")),
                ),
        )
}
