//! Expense repository for database operations

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Expense, ExpenseQuery};

/// Values for an expense insert or full update
#[derive(Debug, Clone)]
pub struct ExpenseRecord {
    pub title: Option<String>,
    pub amount: f64,
    pub category: String,
    pub date: NaiveDate,
    pub description: String,
}

/// Expense repository
///
/// Every operation is scoped by the owning user id; one user can never see
/// or touch another user's rows.
#[derive(Clone)]
pub struct ExpenseRepository {
    pool: PgPool,
}

impl ExpenseRepository {
    /// Create a new expense repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List a user's expenses, newest first, with optional filters
    ///
    /// `search` matches title, description, and category case-insensitively;
    /// `month` and `year` restrict to a calendar month; `category` matches
    /// exactly.
    pub async fn list(
        &self,
        user_id: Uuid,
        query: &ExpenseQuery,
    ) -> Result<Vec<Expense>, sqlx::Error> {
        let search = query
            .search
            .as_ref()
            .map(|term| format!("%{}%", term));

        sqlx::query_as::<_, Expense>(
            r#"
            SELECT id, user_id, title, amount, category, date, description,
                   created_at, updated_at
            FROM expenses
            WHERE user_id = $1
              AND ($2::text IS NULL
                   OR title ILIKE $2
                   OR description ILIKE $2
                   OR category ILIKE $2)
              AND ($3::int IS NULL OR EXTRACT(MONTH FROM date)::int = $3)
              AND ($4::int IS NULL OR EXTRACT(YEAR FROM date)::int = $4)
              AND ($5::text IS NULL OR category = $5)
            ORDER BY date DESC, created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(search)
        .bind(query.month.map(|m| m as i32))
        .bind(query.year)
        .bind(query.category.as_ref())
        .fetch_all(&self.pool)
        .await
    }

    /// Create a new expense for a user
    pub async fn create(
        &self,
        user_id: Uuid,
        record: &ExpenseRecord,
    ) -> Result<Expense, sqlx::Error> {
        sqlx::query_as::<_, Expense>(
            r#"
            INSERT INTO expenses (id, user_id, title, amount, category, date, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, title, amount, category, date, description,
                      created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&record.title)
        .bind(record.amount)
        .bind(&record.category)
        .bind(record.date)
        .bind(&record.description)
        .fetch_one(&self.pool)
        .await
    }

    /// Update an expense; `None` when the id does not belong to the user
    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        record: &ExpenseRecord,
    ) -> Result<Option<Expense>, sqlx::Error> {
        sqlx::query_as::<_, Expense>(
            r#"
            UPDATE expenses
            SET title = $3, amount = $4, category = $5, date = $6,
                description = $7, updated_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, amount, category, date, description,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(&record.title)
        .bind(record.amount)
        .bind(&record.category)
        .bind(record.date)
        .bind(&record.description)
        .fetch_optional(&self.pool)
        .await
    }

    /// Delete an expense; false when the id does not belong to the user
    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM expenses
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
