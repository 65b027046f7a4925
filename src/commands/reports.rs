// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::{monthly_summary, period_transactions, range_statistics, yearly_summary};
use crate::models::Period;
use crate::repo::Repository;
use crate::report::{ReportLocale, render_monthly_report, render_yearly_report};
use crate::utils::{currency_symbol, fmt_money, maybe_print_json, parse_date, pretty_table};
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("month", sub)) => month(conn, sub)?,
        Some(("year", sub)) => year(conn, sub)?,
        Some(("stats", sub)) => stats(conn, sub)?,
        _ => {}
    }
    Ok(())
}

pub(crate) fn locale_arg(sub: &clap::ArgMatches) -> Result<ReportLocale> {
    match sub.get_one::<String>("lang") {
        Some(l) => l.parse(),
        None => Ok(ReportLocale::default()),
    }
}

/// Monthly report text for `period`.
pub fn monthly_text(conn: &Connection, period: Period, locale: ReportLocale) -> Result<String> {
    let summary = monthly_summary(conn, period)?;
    let txs = period_transactions(conn, period)?;
    let symbol = currency_symbol(&conn.get_default_currency()?).to_string();
    Ok(render_monthly_report(&summary, &txs, &symbol, locale))
}

/// Yearly report text for `year`.
pub fn yearly_text(conn: &Connection, year: i32, locale: ReportLocale) -> Result<String> {
    let summaries = yearly_summary(conn, year)?;
    let symbol = currency_symbol(&conn.get_default_currency()?).to_string();
    Ok(render_yearly_report(year, &summaries, &symbol, locale))
}

fn month(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let period = Period::parse(sub.get_one::<String>("month").context("missing month")?)?;
    if sub.get_flag("json") || sub.get_flag("jsonl") {
        let summary = monthly_summary(conn, period)?;
        maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &summary)?;
        return Ok(());
    }
    print!("{}", monthly_text(conn, period, locale_arg(sub)?)?);
    Ok(())
}

fn year(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let year = *sub.get_one::<i32>("year").context("missing year")?;
    if sub.get_flag("json") || sub.get_flag("jsonl") {
        let summaries = yearly_summary(conn, year)?;
        maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &summaries)?;
        return Ok(());
    }
    print!("{}", yearly_text(conn, year, locale_arg(sub)?)?);
    Ok(())
}

fn stats(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let from = parse_date(sub.get_one::<String>("from").context("missing from")?)?;
    let to = parse_date(sub.get_one::<String>("to").context("missing to")?)?;
    let s = range_statistics(conn, from, to)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        return Ok(());
    }
    let symbol = currency_symbol(&conn.get_default_currency()?).to_string();
    let money = |d| fmt_money(d, &symbol);
    let data = vec![
        vec!["Period".into(), format!("{} - {}", from.format("%d.%m.%Y"), to.format("%d.%m.%Y"))],
        vec!["Transactions".into(), s.transaction_count.to_string()],
        vec!["Total income".into(), money(s.total_income)],
        vec!["Total expenses".into(), money(s.total_expenses)],
        vec!["Balance".into(), money(s.balance)],
        vec!["Average daily expense".into(), money(s.average_daily_expense)],
        vec!["Largest expense".into(), money(s.largest_expense)],
        vec!["Largest income".into(), money(s.largest_income)],
        vec![
            "Most frequent category".into(),
            s.most_frequent_category.unwrap_or_else(|| "-".into()),
        ],
    ];
    println!("{}", pretty_table(&["Statistic", "Value"], data));
    Ok(())
}
