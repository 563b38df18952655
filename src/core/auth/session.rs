//! Session store
//!
//! Owns the three persisted entries of an authenticated client: the access
//! token, the refresh token and the serialized current user. Only the auth
//! service writes through it.

use super::models::{Session, User};
use super::storage::Storage;

/// Storage key for the access token
pub const ACCESS_TOKEN_KEY: &str = "token";

/// Storage key for the refresh token
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Storage key for the JSON-serialized user
pub const USER_KEY: &str = "user";

/// Source of the bearer token attached to outgoing requests
pub trait TokenSource: Send + Sync {
    fn access_token(&self) -> Option<String>;
}

/// Read/write/clear operations over the persisted session triple
#[derive(Debug, Default)]
pub struct SessionStore<S> {
    storage: S,
}

impl<S: Storage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Underlying storage area
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Whether a persisted area exists in this environment
    pub fn is_available(&self) -> bool {
        self.storage.is_available()
    }

    /// Write all three entries, overwriting whatever was there
    pub fn save(&self, session: &Session) {
        if !self.is_available() {
            return;
        }

        let user = match serde_json::to_string(&session.user) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("Failed to serialize user, session not saved: {}", e);
                return;
            }
        };

        self.storage.set_item(ACCESS_TOKEN_KEY, &session.token);
        self.storage
            .set_item(REFRESH_TOKEN_KEY, &session.refresh_token);
        self.storage.set_item(USER_KEY, &user);
    }

    /// Overwrite both tokens, leaving the user entry untouched
    pub fn store_tokens(&self, token: &str, refresh_token: &str) {
        if !self.is_available() {
            return;
        }

        self.storage.set_item(ACCESS_TOKEN_KEY, token);
        self.storage.set_item(REFRESH_TOKEN_KEY, refresh_token);
    }

    /// Remove all three entries. Idempotent.
    pub fn clear(&self) {
        if !self.is_available() {
            return;
        }

        self.storage.remove_item(ACCESS_TOKEN_KEY);
        self.storage.remove_item(REFRESH_TOKEN_KEY);
        self.storage.remove_item(USER_KEY);
    }

    pub fn access_token(&self) -> Option<String> {
        if !self.is_available() {
            return None;
        }
        self.storage.get_item(ACCESS_TOKEN_KEY)
    }

    pub fn refresh_token(&self) -> Option<String> {
        if !self.is_available() {
            return None;
        }
        self.storage.get_item(REFRESH_TOKEN_KEY)
    }

    /// Stored user; a value that fails to deserialize reads as absent
    pub fn current_user(&self) -> Option<User> {
        if !self.is_available() {
            return None;
        }

        let json = self.storage.get_item(USER_KEY)?;
        match serde_json::from_str(&json) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::debug!("Stored user is unreadable, treating as absent: {}", e);
                None
            }
        }
    }

    /// Overwrite only the user entry
    pub fn update_user(&self, user: &User) {
        if !self.is_available() {
            return;
        }

        match serde_json::to_string(user) {
            Ok(json) => self.storage.set_item(USER_KEY, &json),
            Err(e) => tracing::warn!("Failed to serialize user: {}", e),
        }
    }

    /// The full triple, or `None` if any entry is missing
    pub fn session(&self) -> Option<Session> {
        Some(Session {
            token: self.access_token()?,
            refresh_token: self.refresh_token()?,
            user: self.current_user()?,
        })
    }
}

impl<S: Storage> TokenSource for SessionStore<S> {
    fn access_token(&self) -> Option<String> {
        SessionStore::access_token(self)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::auth::storage::MemoryStorage;

    pub(crate) fn sample_user(id: &str) -> User {
        User {
            id: id.to_string(),
            email: "a@b.com".to_string(),
            name: "Ana".to_string(),
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    pub(crate) fn sample_session(token: &str, refresh: &str) -> Session {
        Session {
            user: sample_user("1"),
            token: token.to_string(),
            refresh_token: refresh.to_string(),
        }
    }

    #[test]
    fn test_save_then_read_back() {
        let store = SessionStore::new(MemoryStorage::new());
        let session = sample_session("T1", "R1");

        store.save(&session);

        assert_eq!(store.access_token().as_deref(), Some("T1"));
        assert_eq!(store.refresh_token().as_deref(), Some("R1"));
        assert_eq!(store.current_user(), Some(session.user.clone()));
        assert_eq!(store.session(), Some(session));
    }

    #[test]
    fn test_save_overwrites_previous_session() {
        let store = SessionStore::new(MemoryStorage::new());
        store.save(&sample_session("T1", "R1"));

        let mut next = sample_session("T2", "R2");
        next.user = sample_user("2");
        store.save(&next);

        assert_eq!(store.access_token().as_deref(), Some("T2"));
        assert_eq!(store.refresh_token().as_deref(), Some("R2"));
        assert_eq!(store.current_user().map(|u| u.id), Some("2".to_string()));
    }

    #[test]
    fn test_save_uses_well_known_keys() {
        let store = SessionStore::new(MemoryStorage::new());
        store.save(&sample_session("T1", "R1"));

        let storage = store.storage();
        assert_eq!(storage.get_item("token").as_deref(), Some("T1"));
        assert_eq!(storage.get_item("refreshToken").as_deref(), Some("R1"));

        let user: serde_json::Value =
            serde_json::from_str(&storage.get_item("user").unwrap()).unwrap();
        assert_eq!(user["id"], "1");
        assert_eq!(user["createdAt"], "2024-01-01T00:00:00Z");
    }

    #[test]
    fn test_clear_is_idempotent() {
        let store = SessionStore::new(MemoryStorage::new());
        store.save(&sample_session("T1", "R1"));

        store.clear();
        assert!(store.access_token().is_none());
        assert!(store.refresh_token().is_none());
        assert!(store.current_user().is_none());
        assert!(store.storage().is_empty());

        store.clear();
        assert!(store.session().is_none());
    }

    #[test]
    fn test_corrupt_user_reads_as_absent() {
        let store = SessionStore::new(MemoryStorage::new());
        store.save(&sample_session("T1", "R1"));
        store.storage().set_item(USER_KEY, "{not json");

        assert!(store.current_user().is_none());
        assert!(store.session().is_none());
        assert_eq!(store.access_token().as_deref(), Some("T1"));
    }

    #[test]
    fn test_update_user_leaves_tokens() {
        let store = SessionStore::new(MemoryStorage::new());
        store.save(&sample_session("T1", "R1"));

        let mut user = sample_user("1");
        user.name = "Ana Maria".to_string();
        store.update_user(&user);

        assert_eq!(store.current_user().unwrap().name, "Ana Maria");
        assert_eq!(store.access_token().as_deref(), Some("T1"));
        assert_eq!(store.refresh_token().as_deref(), Some("R1"));
    }

    #[test]
    fn test_store_tokens_leaves_user() {
        let store = SessionStore::new(MemoryStorage::new());
        store.save(&sample_session("T1", "R1"));

        store.store_tokens("T2", "R2");

        assert_eq!(store.access_token().as_deref(), Some("T2"));
        assert_eq!(store.refresh_token().as_deref(), Some("R2"));
        assert_eq!(store.current_user(), Some(sample_user("1")));
    }

    #[test]
    fn test_partial_session_is_none() {
        let store = SessionStore::new(MemoryStorage::new());
        store.storage().set_item(ACCESS_TOKEN_KEY, "T1");
        assert!(store.session().is_none());
    }

    #[test]
    fn test_token_source_reads_access_token() {
        let store = SessionStore::new(MemoryStorage::new());
        assert!(TokenSource::access_token(&store).is_none());

        store.save(&sample_session("T1", "R1"));
        assert_eq!(TokenSource::access_token(&store).as_deref(), Some("T1"));
    }

    #[cfg(not(feature = "hydrate"))]
    #[test]
    fn test_unavailable_area_is_noop() {
        use crate::core::auth::storage::BrowserStorage;

        let store = SessionStore::new(BrowserStorage);
        assert!(!store.is_available());

        store.save(&sample_session("T1", "R1"));
        store.update_user(&sample_user("1"));
        store.clear();

        assert!(store.access_token().is_none());
        assert!(store.refresh_token().is_none());
        assert!(store.current_user().is_none());
    }
}
