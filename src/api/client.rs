//! Session-aware API client.
//!
//! Every authenticated call goes through three steps: `authorize` attaches
//! the current bearer token, `dispatch` hands the request to the transport,
//! and `recover_unauthorized` handles a 401 by refreshing the session and
//! replaying the request once.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::{AuthApi, ChartApi, DatasetApi, SheetApi};
use crate::adapters::{FileCredentialsProvider, ReqwestHttpClient};
use crate::auth::TokenStore;
use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::models::{CredentialPair, RefreshRequest};
use crate::traits::{HttpClient, HttpRequest, Response};

pub const AUTHORIZATION: &str = "Authorization";
pub const REFRESH_PATH: &str = "/api/auth/refresh";

/// A request on its way through the client, with its retry marker.
#[derive(Debug, Clone)]
pub(crate) struct PendingRequest {
    request: HttpRequest,
    /// Set once the request has been through a refresh-and-retry cycle
    retried: bool,
    /// Access token attached when the request was last sent
    attached_token: Option<String>,
}

pub struct ApiClient {
    base_url: String,
    http: Arc<dyn HttpClient>,
    store: Arc<TokenStore>,
    /// Held for the duration of a refresh so only one runs at a time
    refresh_gate: Mutex<()>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, http: Arc<dyn HttpClient>, store: Arc<TokenStore>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            store,
            refresh_gate: Mutex::new(()),
        }
    }

    /// Build a client backed by reqwest and the credentials file named in
    /// `config`, restoring any saved session.
    pub async fn from_config(config: &ClientConfig) -> ApiResult<Self> {
        let path = config.credentials_path.clone().ok_or_else(|| ApiError::InvalidInput {
            message: "Could not determine where to store credentials; set SIGMALITE_CREDENTIALS"
                .to_string(),
        })?;
        let http = ReqwestHttpClient::with_timeout(config.timeout)?;
        let store = TokenStore::restore(Arc::new(FileCredentialsProvider::with_path(path))).await;
        Ok(Self::new(config.base_url.clone(), Arc::new(http), Arc::new(store)))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn store(&self) -> &Arc<TokenStore> {
        &self.store
    }

    /// Absolute URL for an API path such as `/api/datasets`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn datasets(&self) -> DatasetApi<'_> {
        DatasetApi::new(self)
    }

    pub fn sheets(&self) -> SheetApi<'_> {
        SheetApi::new(self)
    }

    pub fn charts(&self) -> ChartApi<'_> {
        ChartApi::new(self)
    }

    /// Send an authenticated request and deserialize a 2xx body.
    pub async fn send_json<T: DeserializeOwned>(&self, request: HttpRequest) -> ApiResult<T> {
        let response = self.send(request).await?;
        Ok(response.json()?)
    }

    /// Send an authenticated request whose body is not needed.
    pub async fn send_empty(&self, request: HttpRequest) -> ApiResult<()> {
        self.send(request).await.map(|_| ())
    }

    /// Send an authenticated request.
    ///
    /// A 401 triggers at most one refresh-and-retry. Any other non-2xx
    /// status comes back as [`ApiError::Status`].
    pub async fn send(&self, request: HttpRequest) -> ApiResult<Response> {
        let pending = self.authorize(request);
        let response = self.dispatch(&pending.request).await?;

        if response.status == 401 && !pending.retried {
            return self.recover_unauthorized(pending, response).await;
        }
        check_status(response)
    }

    /// Send a request without credentials. A 401 is returned as is.
    pub async fn send_anonymous(&self, mut request: HttpRequest) -> ApiResult<Response> {
        request.remove_header(AUTHORIZATION);
        let response = self.dispatch(&request).await?;
        check_status(response)
    }

    /// Attach the current access token, replacing any Authorization header
    /// already on the request.
    fn authorize(&self, request: HttpRequest) -> PendingRequest {
        let mut pending = PendingRequest {
            request,
            retried: false,
            attached_token: None,
        };
        self.attach_token(&mut pending);
        pending
    }

    /// Hand a request to the transport.
    async fn dispatch(&self, request: &HttpRequest) -> ApiResult<Response> {
        debug!(method = %request.method, url = %request.url, "Sending request");
        let response = self.http.execute(request).await?;
        debug!(status = response.status, url = %request.url, "Received response");
        Ok(response)
    }

    /// Refresh the session after a 401 and replay the request once.
    ///
    /// Without a refresh token the original 401 is returned, as it is for a
    /// request that was already retried or whose session ended while the
    /// refresh was in flight. If the refresh call fails the session is
    /// expired and [`ApiError::SessionExpired`] is returned. The replayed
    /// response is final, including another 401.
    async fn recover_unauthorized(
        &self,
        mut pending: PendingRequest,
        unauthorized: Response,
    ) -> ApiResult<Response> {
        if pending.retried {
            return Err(ApiError::from_response(&unauthorized));
        }
        pending.retried = true;

        {
            let _gate = self.refresh_gate.lock().await;
            let current = self.store.access_token();

            if current.is_some() && current != pending.attached_token {
                debug!("Session was refreshed by another request, retrying with the new token");
            } else {
                let Some(refresh_token) = self.store.refresh_token() else {
                    debug!("No refresh token available, returning 401");
                    return Err(ApiError::from_response(&unauthorized));
                };

                let generation = self.store.generation();
                match self.refresh_session(&refresh_token).await {
                    Ok(tokens) => {
                        if !self.store.rotate_session_from(generation, tokens).await {
                            debug!("Session changed during refresh, returning 401");
                            return Err(ApiError::from_response(&unauthorized));
                        }
                        info!("Access token refreshed");
                    }
                    Err(e) => {
                        warn!("Token refresh failed: {}", e);
                        self.store.expire_session().await;
                        return Err(ApiError::SessionExpired {
                            reason: e.to_string(),
                        });
                    }
                }
            }
        }

        self.attach_token(&mut pending);
        let response = self.dispatch(&pending.request).await?;
        check_status(response)
    }

    /// Exchange a refresh token for a new pair. Sent without credentials.
    pub async fn refresh_session(&self, refresh_token: &str) -> ApiResult<CredentialPair> {
        let request = HttpRequest::post(self.url(REFRESH_PATH)).with_json(&RefreshRequest {
            token: refresh_token.to_string(),
        })?;
        let response = self.send_anonymous(request).await?;
        Ok(response.json()?)
    }

    fn attach_token(&self, pending: &mut PendingRequest) {
        let token = self.store.access_token();
        match &token {
            Some(token) => pending
                .request
                .set_header(AUTHORIZATION, format!("Bearer {}", token)),
            None => pending.request.remove_header(AUTHORIZATION),
        }
        pending.attached_token = token;
    }
}

fn check_status(response: Response) -> ApiResult<Response> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(ApiError::from_response(&response))
    }
}
