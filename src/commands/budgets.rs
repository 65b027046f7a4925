// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::{resolve_monthly_budgets, set_monthly_budget};
use crate::models::Period;
use crate::repo::Repository;
use crate::utils::{
    currency_symbol, fmt_money, id_for_category, maybe_print_json, parse_decimal, pretty_table,
    round_half_away,
};
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let period = Period::parse(sub.get_one::<String>("month").context("missing month")?)?;
    let cat = sub.get_one::<String>("category").context("missing category")?;
    let amount = parse_decimal(sub.get_one::<String>("amount").context("missing amount")?)?;
    let cat_id = id_for_category(conn, cat)?;
    let b = set_monthly_budget(conn, cat_id, period, amount)?;
    let symbol = currency_symbol(&conn.get_default_currency()?).to_string();
    println!(
        "Budget set for {} / {} = {} (spent {})",
        period,
        b.category_name,
        fmt_money(b.planned_amount, &symbol),
        fmt_money(b.spent_amount, &symbol)
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let period = Period::parse(sub.get_one::<String>("month").context("missing month")?)?;
    let budgets = resolve_monthly_budgets(conn, period)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &budgets)? {
        return Ok(());
    }
    let symbol = currency_symbol(&conn.get_default_currency()?).to_string();
    let data = budgets
        .iter()
        .map(|b| {
            vec![
                b.category_name.clone(),
                fmt_money(b.planned_amount, &symbol),
                fmt_money(b.spent_amount, &symbol),
                fmt_money(b.remaining_amount(), &symbol),
                format!("{:.1}%", round_half_away(b.percentage_used(), 1)),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Category", "Planned", "Spent", "Remaining", "Used"],
            data
        )
    );
    Ok(())
}
