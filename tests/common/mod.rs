#![allow(dead_code)]

use auction_web::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    entity::{products, user_products, users},
    middleware::auth::AuthUser,
    services::auth_service,
    state::AppState,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use uuid::Uuid;

pub const JWT_SECRET: &str = "test-secret";

/// Fresh in-memory database with the full schema.
pub async fn setup_state() -> anyhow::Result<AppState> {
    let orm = create_orm_conn("sqlite::memory:").await?;
    run_migrations(&orm).await?;

    let config = AppConfig {
        database_url: "sqlite::memory:".into(),
        host: "127.0.0.1".into(),
        port: 0,
        jwt_secret: JWT_SECRET.into(),
        session_ttl_hours: 24,
    };
    Ok(AppState::new(orm, &config))
}

/// Inserts a user directly and returns the requester identity for it.
pub async fn create_user(state: &AppState, username: &str) -> anyhow::Result<AuthUser> {
    let user = users::ActiveModel {
        username: Set(username.to_string()),
        email: Set(format!("{username}@example.com")),
        password_hash: Set(auth_service::hash_password("password")?),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(&state.orm)
    .await?;

    Ok(AuthUser {
        user_id: user.id,
        username: user.username,
        session_id: Uuid::nil(),
    })
}

/// Inserts a listing owned by `owner`.
pub async fn create_product(
    state: &AppState,
    owner: &AuthUser,
    title: &str,
    starting_bid: i64,
) -> anyhow::Result<products::Model> {
    let product = products::ActiveModel {
        title: Set(title.to_string()),
        description: Set(format!("A {title} for testing")),
        starting_bid: Set(starting_bid),
        img: Set("https://img.example/item.png".into()),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(&state.orm)
    .await?;

    auction_web::entity::UserProducts::insert(user_products::ActiveModel {
        user_id: Set(owner.user_id),
        product_id: Set(product.id),
    })
    .exec_without_returning(&state.orm)
    .await?;

    Ok(product)
}

/// Pulls the session token out of a `Set-Cookie` value.
pub fn token_from_cookie(cookie: &str) -> Option<String> {
    cookie
        .split(';')
        .next()
        .and_then(|pair| pair.strip_prefix("session="))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}
