//! API service models

pub mod expense;
pub mod preferences;
pub mod user;

// Re-export for convenience
pub use expense::{AmountField, Expense, ExpenseQuery, ExpenseRequest};
pub use preferences::{UpdatePreferencesRequest, UserPreferences};
pub use user::{LoginRequest, NewUser, RegisterRequest, User, UserResponse};
