use axum::extract::State;

use crate::{
    dto::watchlist::WatchlistPage,
    error::AppResult,
    middleware::auth::AuthUser,
    response::{ApiResponse, Page, View},
    services::watchlist_service,
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/watchlist",
    responses(
        (status = 200, description = "Requester's watchlist", body = ApiResponse<Page<WatchlistPage>>),
        (status = 401, description = "Not logged in")
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Watchlist"
)]
pub async fn watching_list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<View<WatchlistPage>> {
    watchlist_service::view_watchlist(&state, &user).await
}
