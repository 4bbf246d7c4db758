use axum::{
    Form,
    extract::{Path, State},
};

use crate::{
    dto::product_page::{ProductAction, ProductActionForm, ProductPage},
    error::AppResult,
    middleware::auth::AuthUser,
    response::{ApiResponse, Page, View},
    services::product_service,
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/product/{id}",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product page", body = ApiResponse<Page<ProductPage>>),
        (status = 404, description = "Product not found")
    ),
    tag = "Listings"
)]
pub async fn product_page(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<View<ProductPage>> {
    product_service::view_product(&state, id).await
}

#[utoipa::path(
    post,
    path = "/product/{id}",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    request_body(content = ProductActionForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Product page with the action outcome", body = ApiResponse<Page<ProductPage>>),
        (status = 400, description = "Missing or unknown who_submit"),
        (status = 401, description = "Not logged in"),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Listings"
)]
pub async fn product_action(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Form(form): Form<ProductActionForm>,
) -> AppResult<View<ProductPage>> {
    let action = ProductAction::try_from(form)?;
    product_service::handle_action(&state, &user, id, action).await
}
