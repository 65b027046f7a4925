// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Storage access. [`Repository`] is the narrow read/upsert contract the
//! aggregation engine depends on; the free functions below are the CRUD
//! operations used by the CLI.

use crate::error::BudgetError;
use crate::models::{
    AppSettings, Category, DEFAULT_CURRENCY, MonthlyBudget, NewCategory, NewTransaction,
    Transaction,
};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use serde::Serialize;

pub trait Repository {
    /// Transactions dated within `[start, end]`, newest first.
    fn list_transactions_in_range(&self, start: NaiveDate, end: NaiveDate)
    -> Result<Vec<Transaction>>;

    /// Active categories ordered by name.
    fn list_active_categories(&self) -> Result<Vec<Category>>;

    fn get_monthly_budget(
        &self,
        category_id: i64,
        month: u32,
        year: i32,
    ) -> Result<Option<MonthlyBudget>>;

    /// Every stored budget row for a month, regardless of category state.
    fn list_monthly_budgets(&self, month: u32, year: i32) -> Result<Vec<MonthlyBudget>>;

    /// Insert or overwrite the planned amount for `(category_id, month, year)`.
    fn upsert_monthly_budget(
        &self,
        category_id: i64,
        month: u32,
        year: i32,
        planned_amount: Decimal,
    ) -> Result<MonthlyBudget>;

    fn get_default_currency(&self) -> Result<String>;
}

const TX_SELECT: &str = "SELECT t.id, t.amount, t.date, t.description, t.category_id, c.name, c.color, t.is_income, t.created_at, t.updated_at
     FROM transactions t JOIN categories c ON t.category_id=c.id";

const BUDGET_SELECT: &str = "SELECT b.id, b.category_id, c.name, c.color, b.planned_amount, b.month, b.year
     FROM monthly_budgets b JOIN categories c ON b.category_id=c.id";

fn decimal_col(r: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let s: String = r.get(idx)?;
    s.parse::<Decimal>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn map_transaction(r: &Row<'_>) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: r.get(0)?,
        amount: decimal_col(r, 1)?,
        date: r.get(2)?,
        description: r.get(3)?,
        category_id: r.get(4)?,
        category_name: r.get(5)?,
        category_color: r.get(6)?,
        is_income: r.get(7)?,
        created_at: r.get(8)?,
        updated_at: r.get(9)?,
    })
}

fn map_budget(r: &Row<'_>) -> rusqlite::Result<MonthlyBudget> {
    Ok(MonthlyBudget {
        id: Some(r.get(0)?),
        category_id: r.get(1)?,
        category_name: r.get(2)?,
        category_color: r.get(3)?,
        planned_amount: decimal_col(r, 4)?,
        month: r.get(5)?,
        year: r.get(6)?,
        spent_amount: Decimal::ZERO,
    })
}

fn map_category(r: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: r.get(0)?,
        name: r.get(1)?,
        description: r.get(2)?,
        color: r.get(3)?,
        is_active: r.get(4)?,
    })
}

fn query_transactions<P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, map_transaction)?;
    let mut data = Vec::new();
    for row in rows {
        data.push(row.context("Failed to read transaction row")?);
    }
    Ok(data)
}

impl Repository for Connection {
    fn list_transactions_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Transaction>> {
        let sql = format!(
            "{} WHERE t.date >= ?1 AND t.date <= ?2 ORDER BY t.date DESC, t.id DESC",
            TX_SELECT
        );
        query_transactions(self, &sql, params![start, end])
    }

    fn list_active_categories(&self) -> Result<Vec<Category>> {
        let mut stmt = self.prepare(
            "SELECT id, name, description, color, is_active FROM categories
             WHERE is_active=1 ORDER BY name, id",
        )?;
        let rows = stmt.query_map([], map_category)?;
        let mut data = Vec::new();
        for row in rows {
            data.push(row?);
        }
        Ok(data)
    }

    fn get_monthly_budget(
        &self,
        category_id: i64,
        month: u32,
        year: i32,
    ) -> Result<Option<MonthlyBudget>> {
        let sql = format!(
            "{} WHERE b.category_id=?1 AND b.month=?2 AND b.year=?3",
            BUDGET_SELECT
        );
        let b = self
            .query_row(&sql, params![category_id, month, year], map_budget)
            .optional()?;
        Ok(b)
    }

    fn list_monthly_budgets(&self, month: u32, year: i32) -> Result<Vec<MonthlyBudget>> {
        let sql = format!("{} WHERE b.month=?1 AND b.year=?2 ORDER BY c.name", BUDGET_SELECT);
        let mut stmt = self.prepare(&sql)?;
        let rows = stmt.query_map(params![month, year], map_budget)?;
        let mut data = Vec::new();
        for row in rows {
            data.push(row?);
        }
        Ok(data)
    }

    fn upsert_monthly_budget(
        &self,
        category_id: i64,
        month: u32,
        year: i32,
        planned_amount: Decimal,
    ) -> Result<MonthlyBudget> {
        self.execute(
            "INSERT INTO monthly_budgets(category_id, planned_amount, month, year) VALUES (?1,?2,?3,?4)
             ON CONFLICT(month, year, category_id) DO UPDATE SET planned_amount=excluded.planned_amount",
            params![category_id, planned_amount.to_string(), month, year],
        )
        .with_context(|| format!("Failed to save budget for category {}", category_id))?;
        tracing::info!(category_id, month, year, %planned_amount, "budget saved");
        self.get_monthly_budget(category_id, month, year)?
            .ok_or_else(|| BudgetError::NotFound { entity: "category", id: category_id }.into())
    }

    fn get_default_currency(&self) -> Result<String> {
        let v: Option<String> = self
            .query_row(
                "SELECT value FROM settings WHERE key='default_currency'",
                [],
                |r| r.get(0),
            )
            .optional()?;
        Ok(v.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()))
    }
}

pub fn get_app_settings(conn: &Connection) -> Result<AppSettings> {
    Ok(AppSettings {
        default_currency: conn.get_default_currency()?,
    })
}

pub fn set_default_currency(conn: &Connection, code: &str) -> Result<String> {
    let ccy = code.trim().to_uppercase();
    if ccy.len() != 3 || !ccy.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(BudgetError::validation(format!(
            "currency code must be three letters, got '{}'",
            code
        ))
        .into());
    }
    conn.execute(
        "INSERT INTO settings(key, value) VALUES('default_currency', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![ccy],
    )?;
    tracing::info!(currency = %ccy, "default currency updated");
    Ok(ccy)
}

// Transactions

pub fn get_transaction(conn: &Connection, id: i64) -> Result<Option<Transaction>> {
    let sql = format!("{} WHERE t.id=?1", TX_SELECT);
    let t = conn.query_row(&sql, params![id], map_transaction).optional()?;
    Ok(t)
}

fn category_state(conn: &Connection, category_id: i64) -> Result<Option<bool>> {
    let active = conn
        .query_row(
            "SELECT is_active FROM categories WHERE id=?1",
            params![category_id],
            |r| r.get::<_, bool>(0),
        )
        .optional()?;
    Ok(active)
}

pub fn add_transaction(
    conn: &Connection,
    new: &NewTransaction,
    today: NaiveDate,
) -> Result<Transaction> {
    new.validate(today)?;
    match category_state(conn, new.category_id)? {
        None => {
            return Err(BudgetError::NotFound {
                entity: "category",
                id: new.category_id,
            }
            .into());
        }
        Some(false) => {
            return Err(BudgetError::validation(format!(
                "category {} is inactive",
                new.category_id
            ))
            .into());
        }
        Some(true) => {}
    }
    conn.execute(
        "INSERT INTO transactions(amount, date, description, category_id, is_income)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            new.amount.to_string(),
            new.date,
            new.description.trim(),
            new.category_id,
            new.is_income
        ],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(id, amount = %new.amount, income = new.is_income, "transaction recorded");
    get_transaction(conn, id)?.with_context(|| format!("Transaction {} vanished after insert", id))
}

/// Returns `false` when the transaction does not exist.
pub fn update_transaction(
    conn: &Connection,
    id: i64,
    new: &NewTransaction,
    today: NaiveDate,
) -> Result<bool> {
    new.validate(today)?;
    let Some(current) = get_transaction(conn, id)? else {
        tracing::warn!(id, "update of missing transaction ignored");
        return Ok(false);
    };
    match category_state(conn, new.category_id)? {
        None => {
            return Err(BudgetError::NotFound {
                entity: "category",
                id: new.category_id,
            }
            .into());
        }
        // Historical transactions may keep a deactivated category.
        Some(false) if new.category_id != current.category_id => {
            return Err(BudgetError::validation(format!(
                "category {} is inactive",
                new.category_id
            ))
            .into());
        }
        _ => {}
    }
    let n = conn.execute(
        "UPDATE transactions SET amount=?1, date=?2, description=?3, category_id=?4, is_income=?5,
         updated_at=datetime('now') WHERE id=?6",
        params![
            new.amount.to_string(),
            new.date,
            new.description.trim(),
            new.category_id,
            new.is_income,
            id
        ],
    )?;
    tracing::info!(id, "transaction updated");
    Ok(n > 0)
}

/// Returns `false` when the transaction does not exist.
pub fn delete_transaction(conn: &Connection, id: i64) -> Result<bool> {
    let n = conn.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    if n == 0 {
        tracing::warn!(id, "delete of missing transaction ignored");
        return Ok(false);
    }
    tracing::info!(id, "transaction deleted");
    Ok(true)
}

pub fn list_transactions_for_category(
    conn: &Connection,
    category_id: i64,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<Vec<Transaction>> {
    let sql = format!(
        "{} WHERE t.category_id=?1 AND (?2 IS NULL OR t.date >= ?2) AND (?3 IS NULL OR t.date <= ?3)
         ORDER BY t.date DESC, t.id DESC",
        TX_SELECT
    );
    query_transactions(conn, &sql, params![category_id, start, end])
}

pub fn recent_transactions(conn: &Connection, count: usize) -> Result<Vec<Transaction>> {
    let sql = format!("{} ORDER BY t.date DESC, t.id DESC LIMIT ?1", TX_SELECT);
    query_transactions(conn, &sql, params![count as i64])
}

// Categories

pub fn get_category(conn: &Connection, id: i64) -> Result<Option<Category>> {
    let c = conn
        .query_row(
            "SELECT id, name, description, color, is_active FROM categories WHERE id=?1",
            params![id],
            map_category,
        )
        .optional()?;
    Ok(c)
}

/// All categories including deactivated ones.
pub fn list_categories(conn: &Connection) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, description, color, is_active FROM categories ORDER BY name, id",
    )?;
    let rows = stmt.query_map([], map_category)?;
    let mut data = Vec::new();
    for row in rows {
        data.push(row?);
    }
    Ok(data)
}

fn ensure_unique_name(conn: &Connection, name: &str, except: Option<i64>) -> Result<()> {
    let wanted = name.trim().to_lowercase();
    let clash = conn
        .list_active_categories()?
        .into_iter()
        .any(|c| Some(c.id) != except && c.name.to_lowercase() == wanted);
    if clash {
        return Err(BudgetError::Conflict(format!("category '{}' already exists", name.trim())).into());
    }
    Ok(())
}

pub fn add_category(conn: &Connection, new: &NewCategory) -> Result<Category> {
    new.validate()?;
    ensure_unique_name(conn, &new.name, None)?;
    conn.execute(
        "INSERT INTO categories(name, description, color) VALUES (?1, ?2, ?3)",
        params![new.name.trim(), new.description, new.color_or_default()],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(id, name = new.name.trim(), "category added");
    get_category(conn, id)?.with_context(|| format!("Category {} vanished after insert", id))
}

/// Returns `false` when the category does not exist.
pub fn update_category(conn: &Connection, id: i64, new: &NewCategory) -> Result<bool> {
    new.validate()?;
    if get_category(conn, id)?.is_none() {
        tracing::warn!(id, "update of missing category ignored");
        return Ok(false);
    }
    ensure_unique_name(conn, &new.name, Some(id))?;
    conn.execute(
        "UPDATE categories SET name=?1, description=?2, color=?3 WHERE id=?4",
        params![new.name.trim(), new.description, new.color_or_default(), id],
    )?;
    tracing::info!(id, "category updated");
    Ok(true)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CategoryRemoval {
    HardDeleted,
    /// The category still has transactions, so it was only marked inactive.
    Deactivated,
    NotFound,
}

pub fn delete_category(conn: &Connection, id: i64) -> Result<CategoryRemoval> {
    if get_category(conn, id)?.is_none() {
        tracing::warn!(id, "delete of missing category ignored");
        return Ok(CategoryRemoval::NotFound);
    }
    let used: i64 = conn.query_row(
        "SELECT COUNT(*) FROM transactions WHERE category_id=?1",
        params![id],
        |r| r.get(0),
    )?;
    if used > 0 {
        conn.execute(
            "UPDATE categories SET is_active=0 WHERE id=?1",
            params![id],
        )?;
        tracing::info!(id, transactions = used, "category deactivated");
        Ok(CategoryRemoval::Deactivated)
    } else {
        conn.execute("DELETE FROM categories WHERE id=?1", params![id])?;
        tracing::info!(id, "category deleted");
        Ok(CategoryRemoval::HardDeleted)
    }
}
