use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use password_hash::rand_core::OsRng;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, SqlErr};
use uuid::Uuid;

use crate::{
    dto::auth::{Claims, LoginPage, RegisterPage},
    entity::{Sessions, Users, sessions, users},
    error::{AppError, AppResult},
    forms::{LoginForm, RegisterForm},
    middleware::auth::{AuthUser, SESSION_COOKIE},
    response::{Template, View},
    state::AppState,
};

const PASSWORDS_MUST_MATCH: &str = "Passwords must match.";
const USERNAME_TAKEN: &str = "Username already taken.";
const INVALID_CREDENTIALS: &str = "Invalid username and/or password.";

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub async fn register_user(state: &AppState, form: RegisterForm) -> AppResult<View<RegisterPage>> {
    let registration = match form.validate() {
        Ok(r) => r,
        Err(errors) => {
            return Ok(View::render(
                Template::Register,
                RegisterPage {
                    message: None,
                    form,
                    errors: Some(errors),
                },
            ));
        }
    };

    let rejected = |form: RegisterForm, message: &str| {
        View::render(
            Template::Register,
            RegisterPage {
                message: Some(message.to_string()),
                form,
                errors: None,
            },
        )
    };

    if registration.password != registration.confirmation {
        return Ok(rejected(form, PASSWORDS_MUST_MATCH));
    }

    let exist = Users::find()
        .filter(users::Column::Username.eq(registration.username.as_str()))
        .one(&state.orm)
        .await?;
    if exist.is_some() {
        return Ok(rejected(form, USERNAME_TAKEN));
    }

    let password_hash = hash_password(&registration.password)?;
    let active = users::ActiveModel {
        username: Set(registration.username),
        email: Set(registration.email),
        password_hash: Set(password_hash),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };
    // Another request may have claimed the name since the lookup above.
    let user = match active.insert(&state.orm).await {
        Ok(user) => user,
        Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            return Ok(rejected(form, USERNAME_TAKEN));
        }
        Err(err) => return Err(err.into()),
    };
    tracing::info!(user_id = user.id, username = %user.username, "user registered");

    let token = start_session(state, user.id).await?;
    Ok(View::redirect("/").with_cookie(session_cookie(state, &token)))
}

pub async fn login_user(state: &AppState, form: LoginForm) -> AppResult<View<LoginPage>> {
    let username = form.username.as_deref().map(str::trim).unwrap_or_default();
    let password = form.password.as_deref().unwrap_or_default();

    let user = if username.is_empty() {
        None
    } else {
        Users::find()
            .filter(users::Column::Username.eq(username))
            .one(&state.orm)
            .await?
    };

    let verified = match &user {
        Some(u) => verify_password(password, &u.password_hash)?,
        None => false,
    };
    let user = match user {
        Some(u) if verified => u,
        _ => {
            tracing::debug!(username = %username, "login rejected");
            return Ok(View::render(
                Template::Login,
                LoginPage {
                    message: Some(INVALID_CREDENTIALS.to_string()),
                    form,
                },
            ));
        }
    };

    let token = start_session(state, user.id).await?;
    Ok(View::redirect("/").with_cookie(session_cookie(state, &token)))
}

/// Ends the session (when there is one) and clears the cookie either way.
pub async fn logout_user(state: &AppState, user: Option<AuthUser>) -> AppResult<View<()>> {
    if let Some(user) = user {
        Sessions::delete_by_id(user.session_id)
            .exec(&state.orm)
            .await?;
        tracing::info!(user_id = user.user_id, session_id = %user.session_id, "session ended");
    }
    Ok(View::redirect("/").with_cookie(expired_session_cookie()))
}

/// Records a new session for the user and returns the signed token for it.
pub async fn start_session(state: &AppState, user_id: i32) -> AppResult<String> {
    let now = Utc::now();
    let expiration = now
        .checked_add_signed(state.auth.session_ttl)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let session_id = Uuid::new_v4();
    let active = sessions::ActiveModel {
        id: Set(session_id),
        user_id: Set(user_id),
        expires_at: Set(expiration.into()),
        created_at: Set(now.into()),
    };
    Sessions::insert(active)
        .exec_without_returning(&state.orm)
        .await?;

    let claims = Claims {
        sub: user_id.to_string(),
        sid: session_id.to_string(),
        exp: expiration.timestamp() as usize,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.auth.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;

    tracing::info!(user_id, session_id = %session_id, "session started");
    Ok(token)
}

/// Resolves a token to the requester, provided its session is still live.
pub async fn authenticate(state: &AppState, token: &str) -> AppResult<AuthUser> {
    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.auth.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized)?;

    let user_id = decoded
        .claims
        .sub
        .parse::<i32>()
        .map_err(|_| AppError::Unauthorized)?;
    let session_id =
        Uuid::parse_str(&decoded.claims.sid).map_err(|_| AppError::Unauthorized)?;

    let session = Sessions::find_by_id(session_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::Unauthorized)?;
    if session.user_id != user_id || session.expires_at.with_timezone(&Utc) <= Utc::now() {
        return Err(AppError::Unauthorized);
    }

    let user = Users::find_by_id(user_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(AuthUser {
        user_id: user.id,
        username: user.username,
        session_id,
    })
}

pub fn session_cookie(state: &AppState, token: &str) -> String {
    format!(
        "{SESSION_COOKIE}={token}; HttpOnly; Path=/; SameSite=Lax; Max-Age={}",
        state.auth.session_ttl.num_seconds()
    )
}

pub fn expired_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0")
}
