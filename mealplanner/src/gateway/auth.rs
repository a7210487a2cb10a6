use std::sync::Arc;

use validator::Validate;

use crate::error::Result;
use crate::http::ApiClient;
use crate::models::{
    ForgotPasswordRequest, ForgotPasswordResponse, LoginRequest, LoginResponse,
    ResetPasswordRequest,
};
use crate::session::{Session, SessionStore};

/// Login, logout and password recovery.
///
/// On login the session is written to the client's shared handle first and
/// then persisted, so requests made right after `login` returns carry the
/// new bearer token.
#[derive(Clone)]
pub struct AuthGateway {
    api: ApiClient,
    store: Arc<dyn SessionStore>,
}

impl AuthGateway {
    pub fn new(api: ApiClient, store: Arc<dyn SessionStore>) -> Self {
        Self { api, store }
    }

    /// Loads a persisted session into the shared handle. Returns whether one was found.
    pub async fn restore(&self) -> Result<bool> {
        match self.store.load().await? {
            Some(session) => {
                tracing::debug!("Restored session for {}", session.username);
                self.api.session().set(session);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        let request = LoginRequest {
            username: username.trim().to_string(),
            password: password.to_string(),
        };
        request.validate()?;

        let response: LoginResponse = self.api.post("/auth/login").json(&request).send_json().await?;

        let session = Session::new(
            response.access_token,
            response.username.or(Some(request.username)),
            response.name,
        );
        self.api.session().set(session.clone());
        self.store.save(&session).await?;
        tracing::info!("Logged in as {}", session.username);
        Ok(session)
    }

    pub async fn logout(&self) -> Result<()> {
        self.api.session().clear();
        self.store.clear().await
    }

    pub async fn forgot_password(&self, username: &str) -> Result<ForgotPasswordResponse> {
        let request = ForgotPasswordRequest {
            username: username.trim().to_string(),
        };
        request.validate()?;
        self.api
            .post("/auth/forgot-password")
            .json(&request)
            .send_json()
            .await
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<()> {
        let request = ResetPasswordRequest {
            token: token.trim().to_string(),
            new_password: new_password.to_string(),
        };
        request.validate()?;
        self.api
            .post("/auth/reset-password")
            .json(&request)
            .send_empty()
            .await
    }
}
