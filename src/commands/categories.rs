// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::NewCategory;
use crate::repo::{self, CategoryRemoval, Repository};
use crate::utils::{id_for_category, maybe_print_json, pretty_table};
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let new = NewCategory {
                name: sub.get_one::<String>("name").context("missing name")?.clone(),
                description: sub.get_one::<String>("description").cloned(),
                color: sub.get_one::<String>("color").cloned(),
            };
            let c = repo::add_category(conn, &new)?;
            println!("Added category '{}' ({})", c.name, c.color);
        }
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").context("missing name")?;
            let id = id_for_category(conn, name)?;
            match repo::delete_category(conn, id)? {
                CategoryRemoval::HardDeleted => println!("Removed category '{}'", name),
                CategoryRemoval::Deactivated => println!(
                    "Category '{}' has transactions; it was deactivated instead",
                    name
                ),
                CategoryRemoval::NotFound => println!("Category '{}' not found", name),
            }
        }
        _ => {}
    }
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").context("missing name")?;
    let id = id_for_category(conn, name)?;
    let current = repo::get_category(conn, id)?
        .with_context(|| format!("Category '{}' not found", name))?;
    let new = NewCategory {
        name: sub
            .get_one::<String>("rename")
            .cloned()
            .unwrap_or(current.name),
        description: sub
            .get_one::<String>("description")
            .cloned()
            .or(current.description),
        color: Some(
            sub.get_one::<String>("color")
                .cloned()
                .unwrap_or(current.color),
        ),
    };
    if repo::update_category(conn, id, &new)? {
        println!("Updated category '{}'", new.name.trim());
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let cats = if sub.get_flag("all") {
        repo::list_categories(conn)?
    } else {
        conn.list_active_categories()?
    };
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &cats)? {
        let data = cats
            .into_iter()
            .map(|c| {
                vec![
                    c.name,
                    c.description.unwrap_or_default(),
                    c.color,
                    if c.is_active { "yes" } else { "no" }.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Category", "Description", "Color", "Active"], data)
        );
    }
    Ok(())
}
