//! Account operations.
//!
//! Register and login go out without credentials and never trigger a
//! token refresh. Logout is local only.

use tracing::debug;

use super::ApiClient;
use crate::error::ApiResult;
use crate::models::{CredentialPair, LoginForm, RegisterRequest, User};
use crate::traits::HttpRequest;

pub const REGISTER_PATH: &str = "/api/auth/register";
pub const LOGIN_PATH: &str = "/api/auth/login";

#[derive(Debug, Clone, Copy)]
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// POST /api/auth/register
    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<User> {
        debug!(username = %request.username, "Registering account");
        let http = HttpRequest::post(self.client.url(REGISTER_PATH)).with_json(request)?;
        let response = self.client.send_anonymous(http).await?;
        Ok(response.json()?)
    }

    /// POST /api/auth/login
    ///
    /// Returns the issued pair without touching the session; see
    /// [`sign_in`](Self::sign_in).
    pub async fn login(&self, form: LoginForm) -> ApiResult<CredentialPair> {
        debug!(username = %form.username, "Logging in");
        let http = HttpRequest::post(self.client.url(LOGIN_PATH)).with_form(form.into_fields());
        let response = self.client.send_anonymous(http).await?;
        Ok(response.json()?)
    }

    /// Log in and store the issued pair as the current session.
    pub async fn sign_in(&self, form: LoginForm) -> ApiResult<CredentialPair> {
        let tokens = self.login(form).await?;
        self.client.store().set_session(tokens.clone(), None).await;
        Ok(tokens)
    }

    /// Forget the current session. No request is sent.
    pub async fn logout(&self) {
        debug!("Logging out");
        self.client.store().clear_session().await;
    }
}
