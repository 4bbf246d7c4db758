use axum::{Form, extract::State};

use crate::{
    dto::auth::{LoginPage, RegisterPage},
    error::AppResult,
    forms::{LoginForm, RegisterForm},
    middleware::auth::AuthUser,
    response::{ApiResponse, Page, Template, View},
    services::auth_service,
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/login",
    responses(
        (status = 200, description = "Login form", body = ApiResponse<Page<LoginPage>>)
    ),
    tag = "Auth"
)]
pub async fn login_form() -> View<LoginPage> {
    View::render(Template::Login, LoginPage::default())
}

#[utoipa::path(
    post,
    path = "/login",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Logged in, session cookie set"),
        (status = 200, description = "Invalid credentials", body = ApiResponse<Page<LoginPage>>)
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> AppResult<View<LoginPage>> {
    auth_service::login_user(&state, form).await
}

#[utoipa::path(
    get,
    path = "/logout",
    responses(
        (status = 303, description = "Session ended, cookie cleared")
    ),
    tag = "Auth"
)]
pub async fn logout(
    State(state): State<AppState>,
    user: Option<AuthUser>,
) -> AppResult<View<()>> {
    auth_service::logout_user(&state, user).await
}

#[utoipa::path(
    get,
    path = "/register",
    responses(
        (status = 200, description = "Registration form", body = ApiResponse<Page<RegisterPage>>)
    ),
    tag = "Auth"
)]
pub async fn register_form() -> View<RegisterPage> {
    View::render(Template::Register, RegisterPage::default())
}

#[utoipa::path(
    post,
    path = "/register",
    request_body(content = RegisterForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Registered and logged in"),
        (status = 200, description = "Registration rejected", body = ApiResponse<Page<RegisterPage>>)
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> AppResult<View<RegisterPage>> {
    auth_service::register_user(&state, form).await
}
