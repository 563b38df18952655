//! Authentication service
//!
//! Orchestrates login, registration, logout and token refresh against the
//! clinic API, and mirrors the results into the session store. It is the only
//! writer to the session store. Authentication state is derived on demand from
//! what is stored, never kept separately.

use std::sync::Arc;

use super::claims::{decode_claims, now_secs};
use super::client::{ApiClient, ApiError};
use super::models::{
    AuthResponse, LoginCredentials, LogoutResponse, RefreshRequest, RefreshTokenResponse,
    RegisterCredentials, User,
};
use super::session::SessionStore;
use super::storage::Storage;
use crate::core::config::Config;

pub const LOGIN_PATH: &str = "/auth/login";
pub const REGISTER_PATH: &str = "/auth/register";
pub const LOGOUT_PATH: &str = "/auth/logout";
pub const REFRESH_PATH: &str = "/auth/refresh";

const LOGIN_FALLBACK: &str = "Login failed. Please try again.";
const REGISTER_FALLBACK: &str = "Registration failed. Please try again.";
const REFRESH_FALLBACK: &str = "Failed to refresh token";

/// Authentication service error types
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Login or registration failed; carries the message to show the user
    #[error("{message}")]
    Rejected { message: String },

    #[error("Refresh token not found")]
    MissingRefreshToken,

    #[error("{message}")]
    RefreshRejected { message: String },

    /// Refresh could not complete; shows the server's message when it sent one
    #[error("{}", refresh_failure_message(.0))]
    Transport(#[from] ApiError),
}

fn refresh_failure_message(err: &ApiError) -> String {
    err.server_message()
        .unwrap_or_else(|| REFRESH_FALLBACK.to_string())
}

impl AuthError {
    /// Prefer the server's own message, fall back to a generic one
    fn rejected(err: &ApiError, fallback: &str) -> Self {
        AuthError::Rejected {
            message: err
                .server_message()
                .unwrap_or_else(|| fallback.to_string()),
        }
    }
}

/// Authentication state derived from the session store
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    /// No complete session, no storage area, or an unreadable token
    #[default]
    Unauthenticated,
    /// Complete session whose access token has not expired
    Authenticated(User),
    /// Complete session whose access token has expired
    Expired(User),
}

/// Authentication service
pub struct AuthService<S> {
    client: ApiClient,
    session: Arc<SessionStore<S>>,
}

impl<S: Storage + 'static> AuthService<S> {
    /// Create a service whose client reads bearer tokens from `storage`
    pub fn new(config: &Config, storage: S) -> Result<Self, ApiError> {
        let session = Arc::new(SessionStore::new(storage));
        let client = ApiClient::new(config)?.with_token_source(session.clone());

        Ok(Self { client, session })
    }

    /// The configured client, bearer token attached
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn session(&self) -> &SessionStore<S> {
        &self.session
    }

    /// Login an existing user
    ///
    /// A response flagged unsuccessful is returned untouched and nothing is
    /// persisted.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<AuthResponse, AuthError> {
        match self
            .client
            .post_json::<_, AuthResponse>(LOGIN_PATH, credentials)
            .await
        {
            Ok(response) => {
                let response = self.accept(response, LOGIN_FALLBACK)?;
                if response.success {
                    tracing::info!("Login succeeded");
                }
                Ok(response)
            }
            Err(e) => {
                tracing::error!("Login failed: {}", e);
                Err(AuthError::rejected(&e, LOGIN_FALLBACK))
            }
        }
    }

    /// Register a new user
    pub async fn register(
        &self,
        credentials: &RegisterCredentials,
    ) -> Result<AuthResponse, AuthError> {
        match self
            .client
            .post_json::<_, AuthResponse>(REGISTER_PATH, credentials)
            .await
        {
            Ok(response) => {
                let response = self.accept(response, REGISTER_FALLBACK)?;
                if response.success {
                    tracing::info!("Registration succeeded for role {}", credentials.role);
                }
                Ok(response)
            }
            Err(e) => {
                tracing::error!("Registration failed: {}", e);
                Err(AuthError::rejected(&e, REGISTER_FALLBACK))
            }
        }
    }

    fn accept(&self, response: AuthResponse, fallback: &str) -> Result<AuthResponse, AuthError> {
        if response.success {
            let Some(session) = response.data.as_ref() else {
                tracing::error!("Successful auth response carried no session data");
                return Err(AuthError::Rejected {
                    message: fallback.to_string(),
                });
            };
            self.session.save(session);
        }
        Ok(response)
    }

    /// Logout the current user
    ///
    /// The server is notified on a best-effort basis; the local session is
    /// cleared whatever happens to that request.
    pub async fn logout(&self) {
        if let Some(refresh_token) = self.session.refresh_token() {
            let request = RefreshRequest { refresh_token };
            match self
                .client
                .post_json::<_, LogoutResponse>(LOGOUT_PATH, &request)
                .await
            {
                Ok(response) => tracing::info!("Logged out: {}", response.message),
                Err(e) => tracing::warn!("Logout notification failed: {}", e),
            }
        }

        self.session.clear();
    }

    /// Exchange the stored refresh token for a new token pair
    ///
    /// Returns the new access token. Any failure clears the whole session
    /// before the error is returned.
    pub async fn refresh_token(&self) -> Result<String, AuthError> {
        let result = self.try_refresh().await;

        if let Err(e) = &result {
            tracing::error!("Token refresh failed, clearing session: {}", e);
            self.session.clear();
        }

        result
    }

    async fn try_refresh(&self) -> Result<String, AuthError> {
        let refresh_token = self
            .session
            .refresh_token()
            .ok_or(AuthError::MissingRefreshToken)?;

        let response: RefreshTokenResponse = self
            .client
            .post_json(REFRESH_PATH, &RefreshRequest { refresh_token })
            .await?;

        match response {
            RefreshTokenResponse {
                success: true,
                data: Some(tokens),
                ..
            } => {
                self.session
                    .store_tokens(&tokens.token, &tokens.refresh_token);
                Ok(tokens.token)
            }
            RefreshTokenResponse { message, .. } => Err(AuthError::RefreshRejected {
                message: if message.is_empty() {
                    REFRESH_FALLBACK.to_string()
                } else {
                    message
                },
            }),
        }
    }

    /// Derive the authentication state at the current wall-clock time
    pub fn state(&self) -> AuthState {
        self.state_at(now_secs())
    }

    /// Derive the authentication state at `now` (seconds since epoch)
    pub fn state_at(&self, now: i64) -> AuthState {
        if !self.session.is_available() {
            return AuthState::Unauthenticated;
        }

        let (Some(token), Some(user)) = (self.session.access_token(), self.session.current_user())
        else {
            return AuthState::Unauthenticated;
        };

        match decode_claims(&token) {
            Ok(claims) if claims.is_live_at(now) => AuthState::Authenticated(user),
            Ok(_) => AuthState::Expired(user),
            Err(e) => {
                tracing::debug!("Stored access token is unreadable: {}", e);
                AuthState::Unauthenticated
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state(), AuthState::Authenticated(_))
    }

    pub fn is_authenticated_at(&self, now: i64) -> bool {
        matches!(self.state_at(now), AuthState::Authenticated(_))
    }

    pub fn current_user(&self) -> Option<User> {
        self.session.current_user()
    }

    pub fn access_token(&self) -> Option<String> {
        self.session.access_token()
    }

    pub fn refresh_token_value(&self) -> Option<String> {
        self.session.refresh_token()
    }

    /// Replace the stored user, e.g. after a profile edit
    pub fn update_user(&self, user: &User) {
        self.session.update_user(user);
    }
}
