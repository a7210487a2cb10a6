use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Clone, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(length(min = 1, message = "Please enter your username"))]
    pub username: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ForgotPasswordResponse {
    /// Returned directly by development servers instead of being emailed.
    #[serde(default)]
    pub reset_token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone, Serialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "Reset token is required"))]
    pub token: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub new_password: String,
}
