use anyhow::Result;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

use common::database::{self, DatabaseConfig};
use sqlx::PgPool;
use std::net::SocketAddr;
use std::time::Duration;

use api::{
    jwt::{JwtConfig, JwtService},
    rate_limiter::{RateLimiter, RateLimiterConfig},
    repositories::{ExpenseRepository, PreferencesRepository, UserRepository},
    routes, schema,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting expense tracker API service");

    // A missing signing secret must fail fast, before any traffic is accepted
    let jwt_config = JwtConfig::from_env()?;
    let jwt_service = JwtService::new(jwt_config);

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool_with_retry(&db_config).await?;

    schema::ensure_schema(&pool).await?;

    info!("API service initialized successfully");

    let user_repository = UserRepository::new(pool.clone());
    let expense_repository = ExpenseRepository::new(pool.clone());
    let preferences_repository = PreferencesRepository::new(pool.clone());

    let auth_limiter = RateLimiter::new(RateLimiterConfig::auth_from_env());
    let api_limiter = RateLimiter::new(RateLimiterConfig::api_from_env());
    spawn_eviction_sweep(auth_limiter.clone(), api_limiter.clone());

    let app_state = AppState {
        db_pool: pool,
        jwt_service,
        user_repository,
        expense_repository,
        preferences_repository,
        auth_limiter,
        api_limiter,
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("API service listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

/// Connect to the database, retrying a few times before giving up
///
/// Managed platforms often bring the database up after the application
/// container; a short retry loop covers that gap.
async fn init_pool_with_retry(config: &DatabaseConfig) -> Result<PgPool> {
    const ATTEMPTS: u32 = 5;
    const RETRY_DELAY: Duration = Duration::from_secs(5);

    for attempt in 1..=ATTEMPTS {
        info!("Database initialization attempt {}/{}", attempt, ATTEMPTS);

        match database::init_pool(config).await {
            Ok(pool) => {
                if database::health_check(&pool).await? {
                    info!("Database connection successful");
                    return Ok(pool);
                }
                error!("Database health check failed");
            }
            Err(e) => error!("Database initialization failed: {}", e),
        }

        if attempt < ATTEMPTS {
            info!("Waiting {} seconds before retry", RETRY_DELAY.as_secs());
            tokio::time::sleep(RETRY_DELAY).await;
        }
    }

    anyhow::bail!("Failed to initialize database after {} attempts", ATTEMPTS)
}

/// Periodically drop stale rate-limit windows from both buckets
fn spawn_eviction_sweep(auth_limiter: RateLimiter, api_limiter: RateLimiter) {
    tokio::spawn(async move {
        let period = auth_limiter.window().max(api_limiter.window());
        let mut interval = tokio::time::interval(period);
        // The first tick completes immediately; skip it
        interval.tick().await;

        loop {
            interval.tick().await;
            auth_limiter.evict_expired().await;
            api_limiter.evict_expired().await;
        }
    });
}

/// Resolve on SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutting down server");
}
