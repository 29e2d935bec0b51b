//! Repositories for database operations

pub mod expense;
pub mod preferences;
pub mod user;

pub use expense::ExpenseRepository;
pub use preferences::PreferencesRepository;
pub use user::UserRepository;

/// Whether a database error is a unique-constraint violation
///
/// Used to turn a duplicate username/email insert into a 409 instead of a
/// generic database error.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db_err| db_err.is_unique_violation())
        .unwrap_or(false)
}
