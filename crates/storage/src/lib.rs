use anyhow::{Context, Result};
use chrono::NaiveDate;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use shared::domain::{CategoryId, CategorySummary, OperationId, OperationSummary};

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCategory {
    pub category_id: CategoryId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredOperation {
    pub operation_id: OperationId,
    pub operation_date: NaiveDate,
    pub label: String,
    pub amount_cents: i64,
    pub category_id: Option<CategoryId>,
}

impl From<StoredCategory> for CategorySummary {
    fn from(value: StoredCategory) -> Self {
        Self {
            category_id: value.category_id,
            name: value.name,
        }
    }
}

impl From<StoredOperation> for OperationSummary {
    fn from(value: StoredOperation) -> Self {
        Self {
            operation_id: value.operation_id,
            operation_date: value.operation_date,
            label: value.label,
            amount_cents: value.amount_cents,
            category_id: value.category_id,
        }
    }
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    pub async fn create_category(&self, name: &str) -> Result<CategoryId> {
        let rec = sqlx::query(
            "INSERT INTO categories (name) VALUES (?)
             ON CONFLICT(name) DO UPDATE SET name=excluded.name
             RETURNING id",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .with_context(|| format!("failed to insert category '{name}'"))?;
        Ok(CategoryId(rec.get::<i64, _>(0)))
    }

    pub async fn list_categories(&self) -> Result<Vec<StoredCategory>> {
        let rows = sqlx::query("SELECT id, name FROM categories ORDER BY name ASC, id ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(category_from_row).collect())
    }

    pub async fn get_category(&self, category_id: CategoryId) -> Result<Option<StoredCategory>> {
        let row = sqlx::query("SELECT id, name FROM categories WHERE id = ?")
            .bind(category_id.0)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(category_from_row))
    }

    pub async fn find_category_by_name(&self, name: &str) -> Result<Option<StoredCategory>> {
        let row = sqlx::query("SELECT id, name FROM categories WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(category_from_row))
    }

    pub async fn insert_operation(
        &self,
        operation_date: NaiveDate,
        label: &str,
        amount_cents: i64,
    ) -> Result<OperationId> {
        let rec = sqlx::query(
            "INSERT INTO operations (operation_date, label, amount_cents) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(operation_date)
        .bind(label)
        .bind(amount_cents)
        .fetch_one(&self.pool)
        .await?;
        Ok(OperationId(rec.get::<i64, _>(0)))
    }

    pub async fn get_operation(&self, operation_id: OperationId) -> Result<Option<StoredOperation>> {
        let row = sqlx::query(
            "SELECT id, operation_date, label, amount_cents, category_id
             FROM operations WHERE id = ?",
        )
        .bind(operation_id.0)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(operation_from_row))
    }

    pub async fn list_operations(&self) -> Result<Vec<StoredOperation>> {
        let rows = sqlx::query(
            "SELECT id, operation_date, label, amount_cents, category_id
             FROM operations ORDER BY operation_date ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(operation_from_row).collect())
    }

    /// Returns `false` when no operation carries `operation_id`.
    pub async fn set_operation_category(
        &self,
        operation_id: OperationId,
        category_id: Option<CategoryId>,
    ) -> Result<bool> {
        let result = sqlx::query("UPDATE operations SET category_id = ? WHERE id = ?")
            .bind(category_id.map(|id| id.0))
            .bind(operation_id.0)
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to update category of operation {operation_id}"))?;
        Ok(result.rows_affected() > 0)
    }
}

fn category_from_row(row: SqliteRow) -> StoredCategory {
    StoredCategory {
        category_id: CategoryId(row.get::<i64, _>("id")),
        name: row.get::<String, _>("name"),
    }
}

fn operation_from_row(row: SqliteRow) -> StoredOperation {
    StoredOperation {
        operation_id: OperationId(row.get::<i64, _>("id")),
        operation_date: row.get::<NaiveDate, _>("operation_date"),
        label: row.get::<String, _>("label"),
        amount_cents: row.get::<i64, _>("amount_cents"),
        category_id: row
            .get::<Option<i64>, _>("category_id")
            .map(CategoryId),
    }
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with("sqlite::memory:") || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
