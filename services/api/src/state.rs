//! Application state shared across handlers

use sqlx::PgPool;

use crate::jwt::JwtService;
use crate::rate_limiter::RateLimiter;
use crate::repositories::{ExpenseRepository, PreferencesRepository, UserRepository};

/// Application state shared across handlers
///
/// Everything in here is constructed once in `main` and injected; handlers
/// never reach for ambient globals.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_service: JwtService,
    pub user_repository: UserRepository,
    pub expense_repository: ExpenseRepository,
    pub preferences_repository: PreferencesRepository,
    /// Strict bucket for the authentication endpoints
    pub auth_limiter: RateLimiter,
    /// General bucket for all API traffic
    pub api_limiter: RateLimiter,
}
