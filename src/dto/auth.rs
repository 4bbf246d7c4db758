use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::forms::{FormErrors, LoginForm, RegisterForm};

#[derive(Debug, Default, Serialize, ToSchema)]
pub struct LoginPage {
    pub message: Option<String>,
    pub form: LoginForm,
}

#[derive(Debug, Default, Serialize, ToSchema)]
pub struct RegisterPage {
    pub message: Option<String>,
    pub form: RegisterForm,
    pub errors: Option<FormErrors>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    /// User id.
    pub sub: String,
    /// Session id; the session row must still exist for the token to be accepted.
    pub sid: String,
    pub exp: usize,
}
