pub mod login;
pub mod qr;

use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::StorageKeys;
use crate::errors::{ClientError, Result};
use crate::events::{Event, EventStore};
use crate::storage::{load_state, save_state, KeyValueStore};

pub use login::{LoginGuard, LoginRequest, LoginResponse};
pub use qr::{QrLoginRequest, QrScanner};

/// signed-in user profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub status: bool,
    pub photo: Option<String>,
    #[serde(default)]
    pub total_projects: u32,
    #[serde(default)]
    pub total_products: u32,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    pub joined_at: Option<String>,
}

/// persisted authentication state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub is_authenticated: bool,
    pub user: Option<User>,
    pub token: Option<String>,
    #[serde(default)]
    pub session_id: Option<Uuid>,
    #[serde(default)]
    pub logged_in_at: Option<DateTime<Utc>>,
}

/// auth token and profile, persisted through a key-value store
pub struct SessionStore<S: KeyValueStore> {
    store: S,
    key: String,
    state: AuthState,
    events: EventStore,
}

impl<S: KeyValueStore> SessionStore<S> {
    /// restore the persisted session, if any
    pub fn open(store: S, keys: &StorageKeys) -> Result<Self> {
        let state: AuthState = load_state(&store, &keys.auth)?.unwrap_or_default();
        if state.is_authenticated && state.token.is_none() {
            warn!("persisted session under {} has no token", keys.auth);
        }
        Ok(Self {
            store,
            key: keys.auth.clone(),
            state,
            events: EventStore::new(),
        })
    }

    /// start a new session
    pub fn login(&mut self, user: User, token: String, time: &SafeTimeProvider) -> Result<Uuid> {
        if token.trim().is_empty() {
            return Err(ClientError::InvalidCredentials {
                message: "empty token".to_string(),
            });
        }
        let now = time.now();
        let session_id = Uuid::new_v4();
        let user_id = user.id;

        self.commit(AuthState {
            is_authenticated: true,
            user: Some(user),
            token: Some(token),
            session_id: Some(session_id),
            logged_in_at: Some(now),
        })?;

        info!("user {} logged in, session {}", user_id, session_id);
        self.events.emit(Event::LoggedIn {
            session_id,
            user_id: Some(user_id),
            timestamp: now,
        });
        Ok(session_id)
    }

    /// replace profile and token, keeping the current session id
    pub fn set_user(&mut self, user: User, token: String, time: &SafeTimeProvider) -> Result<()> {
        let session_id = match self.state.session_id {
            Some(id) if self.state.is_authenticated => id,
            _ => {
                self.login(user, token, time)?;
                return Ok(());
            }
        };
        let next = AuthState {
            user: Some(user),
            token: Some(token),
            ..self.state.clone()
        };
        self.commit(next)?;

        self.events.emit(Event::UserUpdated {
            session_id,
            timestamp: time.now(),
        });
        Ok(())
    }

    /// drop user and token
    pub fn logout(&mut self, reason: &str, time: &SafeTimeProvider) -> Result<()> {
        let session_id = self.state.session_id;
        self.commit(AuthState::default())?;

        info!("logged out: {}", reason);
        self.events.emit(Event::LoggedOut {
            session_id,
            reason: reason.to_string(),
            timestamp: time.now(),
        });
        Ok(())
    }

    /// a 401 from the api invalidates the session; returns true when it did
    pub fn handle_response_status(&mut self, status: u16, time: &SafeTimeProvider) -> Result<bool> {
        if status != 401 || !self.state.is_authenticated {
            return Ok(false);
        }
        warn!("unauthorized response, dropping session");
        self.logout("unauthorized", time)?;
        Ok(true)
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated && self.state.token.is_some()
    }

    pub fn user(&self) -> Option<&User> {
        self.state.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.state.token.as_deref()
    }

    /// token or NotAuthenticated
    pub fn require_token(&self) -> Result<&str> {
        self.token().ok_or(ClientError::NotAuthenticated)
    }

    /// value for the Authorization header
    pub fn authorization_header(&self) -> Option<String> {
        self.token().map(|t| format!("Bearer {}", t))
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// write `next`, adopting it only once the store accepted it
    fn commit(&mut self, next: AuthState) -> Result<()> {
        save_state(&mut self.store, &self.key, &next)?;
        self.state = next;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn sample_user() -> User {
    User {
        id: 7,
        name: "Budi Santoso".to_string(),
        email: "budi@example.com".to_string(),
        username: "budi".to_string(),
        phone: "081234567890".to_string(),
        address: "Jakarta".to_string(),
        status: true,
        photo: None,
        total_projects: 2,
        total_products: 14,
        permissions: vec!["product.view".to_string()],
        roles: vec!["marketing".to_string()],
        joined_at: Some("2023-05-01".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FlakyStore, MemoryStore};
    use chrono::TimeZone;
    use hourglass_rs::TimeSource;

    fn time() -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 10, 11, 8, 0, 0).unwrap(),
        ))
    }

    #[test]
    fn test_login_persists_and_restores() {
        let time = time();
        let keys = StorageKeys::default();
        let mut session = SessionStore::open(MemoryStore::new(), &keys).unwrap();
        assert!(!session.is_authenticated());

        let session_id = session.login(sample_user(), "tok-123".to_string(), &time).unwrap();
        assert_eq!(session.authorization_header().as_deref(), Some("Bearer tok-123"));

        let store = session.into_inner();
        let raw = store.load("auth-storage").unwrap().unwrap();
        assert!(raw.contains(r#""isAuthenticated":true"#));

        let restored = SessionStore::open(store, &keys).unwrap();
        assert!(restored.is_authenticated());
        assert_eq!(restored.user().unwrap().name, "Budi Santoso");
        assert_eq!(restored.state().session_id, Some(session_id));
        assert_eq!(restored.state().logged_in_at, Some(time.now()));
    }

    #[test]
    fn test_logout_clears_everything() {
        let time = time();
        let mut session = SessionStore::open(MemoryStore::new(), &StorageKeys::default()).unwrap();
        session.login(sample_user(), "tok".to_string(), &time).unwrap();
        session.logout("user request", &time).unwrap();

        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
        assert!(matches!(session.require_token(), Err(ClientError::NotAuthenticated)));

        let events = session.take_events();
        assert!(matches!(events[0], Event::LoggedIn { .. }));
        assert!(matches!(&events[1], Event::LoggedOut { reason, .. } if reason == "user request"));
    }

    #[test]
    fn test_unauthorized_status_logs_out() {
        let time = time();
        let mut session = SessionStore::open(MemoryStore::new(), &StorageKeys::default()).unwrap();
        session.login(sample_user(), "tok".to_string(), &time).unwrap();

        assert!(!session.handle_response_status(500, &time).unwrap());
        assert!(session.is_authenticated());
        assert!(session.handle_response_status(401, &time).unwrap());
        assert!(!session.is_authenticated());
        // already logged out
        assert!(!session.handle_response_status(401, &time).unwrap());
    }

    #[test]
    fn test_set_user_keeps_session_id() {
        let time = time();
        let mut session = SessionStore::open(MemoryStore::new(), &StorageKeys::default()).unwrap();
        let id = session.login(sample_user(), "tok".to_string(), &time).unwrap();

        let mut updated = sample_user();
        updated.phone = "0899".to_string();
        session.set_user(updated, "tok-2".to_string(), &time).unwrap();

        assert_eq!(session.state().session_id, Some(id));
        assert_eq!(session.token(), Some("tok-2"));
        assert_eq!(session.user().unwrap().phone, "0899");
    }

    #[test]
    fn test_set_user_without_session_logs_in() {
        let time = time();
        let mut session = SessionStore::open(MemoryStore::new(), &StorageKeys::default()).unwrap();
        session.set_user(sample_user(), "tok".to_string(), &time).unwrap();
        assert!(session.is_authenticated());
        assert!(session.state().session_id.is_some());
    }

    #[test]
    fn test_failed_write_keeps_previous_session() {
        let time = time();
        let keys = StorageKeys::default();
        let mut session = SessionStore::open(FlakyStore::default(), &keys).unwrap();
        session.store.fail_writes = true;
        assert!(matches!(
            session.login(sample_user(), "tok".to_string(), &time),
            Err(ClientError::Storage { .. })
        ));
        assert!(!session.is_authenticated());

        session.store.fail_writes = false;
        let id = session.login(sample_user(), "tok".to_string(), &time).unwrap();
        session.store.fail_writes = true;

        let mut updated = sample_user();
        updated.name = "Budi S.".to_string();
        assert!(session.set_user(updated, "tok-2".to_string(), &time).is_err());
        assert_eq!(session.token(), Some("tok"));
        assert_eq!(session.user().unwrap().name, "Budi Santoso");

        assert!(session.logout("user request", &time).is_err());
        assert!(session.is_authenticated());
        assert!(session.handle_response_status(401, &time).is_err());
        assert_eq!(session.state().session_id, Some(id));
        assert_eq!(session.take_events().len(), 1);

        session.store.fail_writes = false;
        let reopened = SessionStore::open(session.into_inner(), &keys).unwrap();
        assert_eq!(reopened.token(), Some("tok"));
    }

    #[test]
    fn test_empty_token_rejected() {
        let mut session = SessionStore::open(MemoryStore::new(), &StorageKeys::default()).unwrap();
        assert!(matches!(
            session.login(sample_user(), "  ".to_string(), &time()),
            Err(ClientError::InvalidCredentials { .. })
        ));
    }
}
