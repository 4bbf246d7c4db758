use axum::{Form, extract::State};

use crate::{
    dto::listings::{CreatePage, IndexPage},
    error::AppResult,
    forms::ListingForm,
    middleware::auth::AuthUser,
    response::{ApiResponse, Page, View},
    services::listing_service,
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "All listings", body = ApiResponse<Page<IndexPage>>)
    ),
    tag = "Listings"
)]
pub async fn index(State(state): State<AppState>) -> AppResult<View<IndexPage>> {
    listing_service::list_products(&state).await
}

#[utoipa::path(
    get,
    path = "/create",
    responses(
        (status = 200, description = "Empty listing form", body = ApiResponse<Page<CreatePage>>),
        (status = 401, description = "Not logged in")
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Listings"
)]
pub async fn create_form(_user: AuthUser) -> View<CreatePage> {
    listing_service::create_form()
}

#[utoipa::path(
    post,
    path = "/create",
    request_body(content = ListingForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Listing created, redirect to the index"),
        (status = 200, description = "Form re-rendered with field errors", body = ApiResponse<Page<CreatePage>>),
        (status = 401, description = "Not logged in")
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Listings"
)]
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Form(form): Form<ListingForm>,
) -> AppResult<View<CreatePage>> {
    listing_service::create_listing(&state, &user, form).await
}
