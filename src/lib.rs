//! clinic-auth - client-side authentication for the clinic scheduling app
//!
//! Validates sign-in / sign-up input, talks to the clinic API, and keeps the
//! resulting session (access token, refresh token, user) in a persisted
//! key-value area: `localStorage` in the browser, a JSON file natively.

pub mod core;

pub use crate::core::auth::{AuthError, AuthService, AuthState};
pub use crate::core::config::Config;
