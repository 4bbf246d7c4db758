use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub orm: DatabaseConnection,
    pub auth: Arc<AuthSettings>,
}

/// Token signing and session lifetime.
#[derive(Debug)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub session_ttl: chrono::Duration,
}

impl AppState {
    pub fn new(orm: DatabaseConnection, config: &AppConfig) -> Self {
        Self {
            orm,
            auth: Arc::new(AuthSettings {
                jwt_secret: config.jwt_secret.clone(),
                session_ttl: chrono::Duration::hours(config.session_ttl_hours),
            }),
        }
    }
}
