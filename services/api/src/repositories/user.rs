//! User repository for database operations

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::{NewUser, User};

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user
    ///
    /// A duplicate username or email surfaces as a unique-violation database
    /// error; the caller maps it to a conflict response.
    pub async fn create(&self, new_user: &NewUser) -> Result<User, sqlx::Error> {
        info!("Creating new user: {}", new_user.username);

        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, email, password_hash, display_name)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, username, email, password_hash, display_name,
                      avatar_url, last_login, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(&new_user.display_name)
        .fetch_one(&self.pool)
        .await
    }

    /// Find a user by username or email
    pub async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, display_name,
                   avatar_url, last_login, created_at, updated_at
            FROM users
            WHERE username = $1 OR email = $1
            "#,
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, display_name,
                   avatar_url, last_login, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Record a successful login and return the refreshed row
    ///
    /// Returns `None` when the user has disappeared between verification and
    /// update; the caller treats that as an authentication failure.
    pub async fn update_last_login(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET last_login = now(), updated_at = now()
            WHERE id = $1
            RETURNING id, username, email, password_hash, display_name,
                      avatar_url, last_login, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }
}
