//! Shared helpers for HTTP-level integration tests.
//!
//! `build_test_app` uses the same router builder as `main.rs`, so every test
//! request passes through the production middleware stack.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use loreforge_api::auth::jwt::{generate_access_token, JwtConfig};
use loreforge_api::auth::password::hash_password;
use loreforge_api::config::ServerConfig;
use loreforge_api::router::build_app_router;
use loreforge_api::state::AppState;
use loreforge_core::types::DbId;
use loreforge_db::models::campaign::CreateCampaign;
use loreforge_db::models::character::CreateCharacter;
use loreforge_db::models::user::{CreateUser, User};
use loreforge_db::repositories::{CampaignMemberRepo, CampaignRepo, CharacterRepo, UserRepo};

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect the response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Seed helpers
// ---------------------------------------------------------------------------

/// Create a user directly in the database and return the row plus a valid
/// access token signed with the test JWT secret.
pub async fn seed_user(pool: &PgPool, username: &str) -> (User, String) {
    let password_hash = hash_password("test_password_123").expect("hashing should succeed");
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@test.com"),
            password_hash,
        },
    )
    .await
    .expect("user creation should succeed");

    let token = generate_access_token(user.id, user.is_admin, &test_config().jwt)
        .expect("token generation should succeed");
    (user, token)
}

/// Create a campaign owned (GM'd) by the given user.
pub async fn seed_campaign(pool: &PgPool, name: &str, gm_user_id: DbId) -> DbId {
    CampaignRepo::create(
        pool,
        &CreateCampaign {
            name: name.to_string(),
            description: None,
        },
        gm_user_id,
    )
    .await
    .expect("campaign creation should succeed")
    .id
}

/// Add a user to a campaign as a player.
pub async fn seed_player(pool: &PgPool, campaign_id: DbId, user_id: DbId) {
    CampaignMemberRepo::add(pool, campaign_id, user_id, "player")
        .await
        .expect("membership insert should succeed");
}

/// Create a character in the given campaign.
pub async fn seed_character(pool: &PgPool, campaign_id: DbId, owner_user_id: DbId) -> DbId {
    CharacterRepo::create(
        pool,
        &CreateCharacter {
            name: format!("character-{owner_user_id}"),
            campaign_id: Some(campaign_id),
        },
        owner_user_id,
    )
    .await
    .expect("character creation should succeed")
    .id
}
