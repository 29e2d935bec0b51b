//! End-to-end tests for the authentication and expense flows
//!
//! These tests run the full router against a live PostgreSQL instance
//! reachable through `DATABASE_URL` (or the `PG*` variables).

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use std::time::Duration;
use tower::ServiceExt;
use uuid::Uuid;

use api::{
    jwt::{JwtConfig, JwtService},
    rate_limiter::{RateLimiter, RateLimiterConfig},
    repositories::{ExpenseRepository, PreferencesRepository, UserRepository},
    routes, schema,
    state::AppState,
};
use common::database::{DatabaseConfig, init_pool};

async fn test_state(auth_limit: u32) -> AppState {
    let config = DatabaseConfig::from_env().expect("database configuration");
    let pool = init_pool(&config).await.expect("database connection");
    schema::ensure_schema(&pool).await.expect("schema bootstrap");

    AppState {
        db_pool: pool.clone(),
        jwt_service: JwtService::new(JwtConfig {
            secret: "integration-test-secret".to_string(),
            token_expiry: 3600,
        }),
        user_repository: UserRepository::new(pool.clone()),
        expense_repository: ExpenseRepository::new(pool.clone()),
        preferences_repository: PreferencesRepository::new(pool),
        auth_limiter: RateLimiter::new(RateLimiterConfig {
            max_requests: auth_limit,
            window: Duration::from_secs(900),
        }),
        api_limiter: RateLimiter::new(RateLimiterConfig {
            max_requests: 10_000,
            window: Duration::from_secs(900),
        }),
    }
}

fn unique_username() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("alice_{}", &suffix[..8])
}

fn post_json(uri: &str, body: String) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn register(app: &Router, username: &str, email: &str, password: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/auth/register",
            format!(
                r#"{{"username":"{}","email":"{}","password":"{}"}}"#,
                username, email, password
            ),
        ))
        .await
        .unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

async fn login(app: &Router, identifier: &str, password: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/auth/login",
            format!(
                r#"{{"identifier":"{}","password":"{}"}}"#,
                identifier, password
            ),
        ))
        .await
        .unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_register_login_flow() {
    let app = routes::create_router(test_state(100).await);
    let username = unique_username();
    let email = format!("{}@x.com", username);

    // Registration returns the user and a usable token
    let (status, body) = register(&app, &username, &email, "password1").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["username"], username.as_str());
    assert_eq!(body["user"]["displayName"], username.as_str());
    assert!(body["user"].get("password_hash").is_none());
    let token = body["token"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(
            Request::get("/api/expenses")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Wrong password and unknown user read identically
    let (status, body) = login(&app, &username, "wrongpass").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");

    let (status, wrong_user_body) = login(&app, "no_such_user", "wrongpass").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_user_body["error"], body["error"]);

    // Correct login issues a fresh token and stamps last_login
    let (status, body) = login(&app, &username, "password1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].as_str().is_some());
    assert!(!body["user"]["lastLogin"].is_null());

    // Identifier lookup also works by email, case-insensitively
    let (status, _) = login(&app, &email.to_uppercase(), "password1").await;
    assert_eq!(status, StatusCode::OK);

    // Duplicate registration conflicts
    let (status, body) = register(&app, &username, "other@x.com", "password1").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Username or email already exists");
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_expense_crud_flow() {
    let app = routes::create_router(test_state(100).await);
    let username = unique_username();

    let (_, body) = register(&app, &username, &format!("{}@x.com", username), "password1").await;
    let token = body["token"].as_str().unwrap().to_string();
    let auth = format!("Bearer {}", token);

    // Quick-entry expression resolves on the way in
    let response = app
        .clone()
        .oneshot(
            Request::post("/api/expenses")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, &auth)
                .body(Body::from(
                    r#"{"title":"Groceries run","amount":"10+2.5","category":"Groceries","date":"2025-11-03","description":"weekly"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let expense = body_json(response).await;
    assert_eq!(expense["amount"], 12.5);
    let expense_id = expense["id"].as_str().unwrap().to_string();

    // Listing and category filtering
    let response = app
        .clone()
        .oneshot(
            Request::get("/api/expenses?category=Groceries")
                .header(header::AUTHORIZATION, &auth)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let listed = body_json(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let response = app
        .clone()
        .oneshot(
            Request::get("/api/expenses?category=Travel")
                .header(header::AUTHORIZATION, &auth)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let listed = body_json(response).await;
    assert!(listed.as_array().unwrap().is_empty());

    // Search matches the title
    let response = app
        .clone()
        .oneshot(
            Request::get("/api/expenses?search=groceries")
                .header(header::AUTHORIZATION, &auth)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let listed = body_json(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    // Update
    let response = app
        .clone()
        .oneshot(
            Request::put(format!("/api/expenses/{}", expense_id))
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, &auth)
                .body(Body::from(
                    r#"{"title":"Groceries run","amount":20,"category":"Groceries","date":"2025-11-04"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["amount"], 20.0);

    // Updating someone else's (or a random) id is a 404
    let response = app
        .clone()
        .oneshot(
            Request::put(format!("/api/expenses/{}", Uuid::new_v4()))
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, &auth)
                .body(Body::from(r#"{"amount":5,"date":"2025-11-04"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Delete, then the list is empty again
    let response = app
        .clone()
        .oneshot(
            Request::delete(format!("/api/expenses/{}", expense_id))
                .header(header::AUTHORIZATION, &auth)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::get("/api/expenses")
                .header(header::AUTHORIZATION, &auth)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(body_json(response).await.as_array().unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_preferences_flow() {
    let app = routes::create_router(test_state(100).await);
    let username = unique_username();

    let (_, body) = register(&app, &username, &format!("{}@x.com", username), "password1").await;
    let auth = format!("Bearer {}", body["token"].as_str().unwrap());

    // Defaults before anything is stored
    let response = app
        .clone()
        .oneshot(
            Request::get("/api/user/preferences")
                .header(header::AUTHORIZATION, &auth)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let preferences = body_json(response).await;
    assert_eq!(preferences["theme"], "light");
    assert_eq!(preferences["currency"], "USD");

    // Partial update merges over the defaults
    let response = app
        .clone()
        .oneshot(
            Request::put("/api/user/preferences")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, &auth)
                .body(Body::from(r#"{"theme":"dark"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let preferences = body_json(response).await;
    assert_eq!(preferences["theme"], "dark");
    assert_eq!(preferences["language"], "en");

    let response = app
        .clone()
        .oneshot(
            Request::get("/api/user/preferences")
                .header(header::AUTHORIZATION, &auth)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(body_json(response).await["theme"], "dark");
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_failed_logins_get_throttled() {
    // Strict bucket of five, like production defaults
    let app = routes::create_router(test_state(5).await);
    let username = unique_username();

    let (status, _) = register(&app, &username, &format!("{}@x.com", username), "password1").await;
    assert_eq!(status, StatusCode::CREATED);

    let attempt = || {
        post_json(
            "/api/auth/login",
            format!(r#"{{"identifier":"{}","password":"wrongpass"}}"#, username),
        )
    };

    // Registration came from a different client key, so five failed logins
    // fit in this client's window
    for _ in 0..5 {
        let mut request = attempt();
        request
            .headers_mut()
            .insert("x-forwarded-for", "203.0.113.7".parse().unwrap());
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // The next attempt trips the limiter
    let mut request = attempt();
    request
        .headers_mut()
        .insert("x-forwarded-for", "203.0.113.7".parse().unwrap());
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}
