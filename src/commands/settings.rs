// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::repo::{self, get_app_settings};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    if let Some(("currency", sub)) = m.subcommand() {
        match sub.get_one::<String>("code") {
            Some(code) => {
                let ccy = repo::set_default_currency(conn, code)?;
                println!("Default currency set to {}", ccy);
            }
            None => {
                let s = get_app_settings(conn)?;
                println!("{} ({})", s.default_currency, s.currency_symbol());
            }
        }
    }
    Ok(())
}
