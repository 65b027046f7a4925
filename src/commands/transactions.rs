// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::period_transactions;
use crate::filter::{CategoryFilter, FilteredView, TransactionFilter};
use crate::models::{Category, NewTransaction, Period};
use crate::repo::{self, Repository};
use crate::report::signed_money;
use crate::utils::{
    currency_symbol, fmt_money, id_for_category, maybe_print_json, parse_date, parse_decimal,
    pretty_table, today,
};
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").context("missing id")?;
            if repo::delete_transaction(conn, id)? {
                println!("Removed transaction {}", id);
            } else {
                println!("Transaction {} not found", id);
            }
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let amount = parse_decimal(sub.get_one::<String>("amount").context("missing amount")?)?;
    let description = sub
        .get_one::<String>("description")
        .context("missing description")?
        .clone();
    let category = sub.get_one::<String>("category").context("missing category")?;
    let new = NewTransaction {
        amount,
        date,
        description,
        category_id: id_for_category(conn, category)?,
        is_income: sub.get_flag("income"),
    };
    let t = repo::add_transaction(conn, &new, today())?;
    let symbol = currency_symbol(&conn.get_default_currency()?).to_string();
    println!(
        "Recorded #{} {} on {} '{}' ({})",
        t.id,
        signed_money(&t, &symbol),
        t.date,
        t.description,
        t.category_name
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let view = query_rows(conn, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &view)? {
        let symbol = currency_symbol(&conn.get_default_currency()?).to_string();
        let rows: Vec<Vec<String>> = view
            .transactions
            .iter()
            .map(|t| {
                vec![
                    t.id.to_string(),
                    t.date.to_string(),
                    t.category_name.clone(),
                    t.description.clone(),
                    signed_money(t, &symbol),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Date", "Category", "Description", "Amount"], rows)
        );
        println!(
            "Income {} | Expenses {} | Balance {}",
            fmt_money(view.total_income, &symbol),
            fmt_money(view.total_expenses, &symbol),
            fmt_money(view.balance, &symbol)
        );
    }
    Ok(())
}

/// Resolves a `--category` filter by name, ignoring case. Deactivated
/// categories still match so their history can be listed; an active
/// category wins when both share a name.
fn category_for_filter(conn: &Connection, name: &str) -> Result<i64> {
    let wanted = name.trim().to_lowercase();
    let cats = repo::list_categories(conn)?;
    let named = |c: &&Category| c.name.to_lowercase() == wanted;
    cats.iter()
        .filter(named)
        .find(|c| c.is_active)
        .or_else(|| cats.iter().find(named))
        .map(|c| c.id)
        .with_context(|| format!("Category '{}' not found", name))
}

/// Month-scoped transactions after the `--category` / `--search` filters,
/// newest first. Totals are those of the filtered rows, before `--limit`.
pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<FilteredView> {
    let period = match sub.get_one::<String>("month") {
        Some(m) => Period::parse(m)?,
        None => Period::containing(today()),
    };
    let category = match sub.get_one::<String>("category") {
        Some(name) => CategoryFilter::Only(category_for_filter(conn, name)?),
        None => CategoryFilter::All,
    };
    let search = sub.get_one::<String>("search").cloned().unwrap_or_default();
    let base = period_transactions(conn, period)?;
    let mut view = TransactionFilter::new(category, search).apply(&base);
    if let Some(limit) = sub.get_one::<usize>("limit") {
        view.transactions.truncate(*limit);
    }
    Ok(view)
}
