//! Expense tracker API service
//!
//! Token-authenticated CRUD on expense records, user registration/login,
//! and per-user preference storage over PostgreSQL.

pub mod amount;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod rate_limiter;
pub mod repositories;
pub mod routes;
pub mod schema;
pub mod state;
pub mod validation;
