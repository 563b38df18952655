//! Client-side authentication for the clinic scheduling API
//!
//! This module provides:
//! - Wire types for the auth endpoints
//! - A JSON HTTP client that attaches the stored bearer token
//! - A session store over a persisted key-value area
//! - The auth service (login, register, logout, refresh, auth state)
//! - Sign-in / sign-up submission flows

pub mod claims;
pub mod client;
pub mod flow;
pub mod models;
pub mod service;
pub mod session;
pub mod storage;
#[cfg(test)]
pub(crate) mod test_support;

pub use claims::{ClaimsError, TokenClaims, decode_claims};
pub use client::{ApiClient, ApiError};
pub use flow::{SubmitError, SubmitOutcome, submit_sign_in, submit_sign_up};
pub use models::{
    AuthResponse, LoginCredentials, RegisterCredentials, Role, Session, TokenPair, User,
};
pub use service::{AuthError, AuthService, AuthState};
pub use session::{SessionStore, TokenSource};
#[cfg(feature = "ssr")]
pub use storage::FileStorage;
pub use storage::{BrowserStorage, MemoryStorage, Storage};
