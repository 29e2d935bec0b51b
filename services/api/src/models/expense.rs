//! Expense model and related payloads

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::amount::{self, AmountError};

/// Expense entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Expense {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: Option<String>,
    pub amount: f64,
    pub category: String,
    pub date: NaiveDate,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Amount as submitted by the client: a plain number, or a quick-entry
/// arithmetic expression like `"12+3.5*2"`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AmountField {
    Number(f64),
    Expression(String),
}

impl AmountField {
    /// Resolve the submitted amount to a concrete value
    pub fn resolve(&self) -> Result<f64, AmountError> {
        match self {
            AmountField::Number(n) if n.is_finite() => Ok(*n),
            AmountField::Number(_) => Err(AmountError::NotFinite),
            AmountField::Expression(expr) => amount::evaluate(expr),
        }
    }
}

/// Request body for creating or updating an expense
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpenseRequest {
    pub title: Option<String>,
    pub amount: Option<AmountField>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
}

/// Query parameters for listing expenses
#[derive(Debug, Deserialize)]
pub struct ExpenseQuery {
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub category: Option<String>,
    pub search: Option<String>,
}
