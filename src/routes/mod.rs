use axum::{Router, routing::get};

use crate::state::AppState;

pub mod auth;
pub mod doc;
pub mod health;
pub mod listings;
pub mod product;
pub mod watchlist;

// Build the page router without binding state; it will be provided at the top level.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", get(listings::index))
        .route("/create", get(listings::create_form).post(listings::create))
        .route("/product/{id}", get(product::product_page).post(product::product_action))
        .route("/watchlist", get(watchlist::watching_list))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/register", get(auth::register_form).post(auth::register))
        .route("/health", get(health::health_check))
}
