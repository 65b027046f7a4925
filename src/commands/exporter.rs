// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::reports::{locale_arg, monthly_text, yearly_text};
use crate::engine::period_transactions;
use crate::models::Period;
use crate::report::{to_csv_rows, write_csv, write_report};
use crate::utils::today;
use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("csv", sub)) => export_csv(conn, sub),
        Some(("txt", sub)) => export_txt(conn, sub),
        _ => Ok(()),
    }
}

fn export_csv(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let period = Period::parse(sub.get_one::<String>("month").context("missing month")?)?;
    let out = sub.get_one::<String>("out").context("missing out")?;
    let txs = period_transactions(conn, period)?;
    let rows = to_csv_rows(&txs, locale_arg(sub)?);
    write_csv(Path::new(out), &rows)?;
    println!("Exported {} transactions to {}", txs.len(), out);
    Ok(())
}

fn export_txt(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let out = sub.get_one::<String>("out").context("missing out")?;
    let locale = locale_arg(sub)?;
    let text = match (sub.get_one::<String>("month"), sub.get_one::<i32>("year")) {
        (_, Some(year)) => yearly_text(conn, *year, locale)?,
        (Some(m), None) => monthly_text(conn, Period::parse(m)?, locale)?,
        (None, None) => monthly_text(conn, Period::containing(today()), locale)?,
    };
    write_report(Path::new(out), &text)?;
    println!("Report saved to {}", out);
    Ok(())
}
