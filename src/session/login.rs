use std::sync::OnceLock;

use chrono::{DateTime, Duration, Utc};
use hourglass_rs::SafeTimeProvider;
use log::{debug, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::SessionConfig;
use crate::errors::{ClientError, Result};
use crate::events::{Event, EventStore};
use crate::session::User;

pub const MIN_PASSWORD_LEN: usize = 6;

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static pattern"))
}

/// credentials posted to the login endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    /// trimmed email, password kept as typed
    pub fn new(email: &str, password: &str) -> Result<Self> {
        let request = Self {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> Result<()> {
        if !email_pattern().is_match(&self.email) {
            return Err(ClientError::InvalidCredentials {
                message: "invalid email address".to_string(),
            });
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ClientError::InvalidCredentials {
                message: format!("password must be at least {} characters", MIN_PASSWORD_LEN),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct LoginResults {
    token: Option<String>,
    user: Option<User>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct LoginEnvelope {
    #[serde(default)]
    status: Option<bool>,
    #[serde(default)]
    message: Option<String>,
    results: Option<LoginResults>,
}

/// token and profile extracted from a login reply
#[derive(Debug, Clone, PartialEq)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

impl LoginResponse {
    pub fn from_json(raw: &str) -> Result<Self> {
        let envelope: LoginEnvelope = serde_json::from_str(raw)?;
        if envelope.status == Some(false) {
            return Err(ClientError::InvalidCredentials {
                message: envelope
                    .message
                    .unwrap_or_else(|| "login rejected".to_string()),
            });
        }
        let results = envelope.results.ok_or_else(|| ClientError::MalformedResponse {
            message: "login reply has no results".to_string(),
        })?;
        match (results.token, results.user) {
            (Some(token), Some(user)) if !token.is_empty() => Ok(Self { token, user }),
            _ => Err(ClientError::MalformedResponse {
                message: "login reply is missing token or user".to_string(),
            }),
        }
    }
}

/// throttles repeated failed logins
#[derive(Debug)]
pub struct LoginGuard {
    max_attempts: u32,
    lockout: Duration,
    attempts: u32,
    locked_until: Option<DateTime<Utc>>,
    events: EventStore,
}

impl LoginGuard {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            max_attempts: config.max_login_attempts,
            lockout: config.lockout(),
            attempts: 0,
            locked_until: None,
            events: EventStore::new(),
        }
    }

    /// Ok when a login may be submitted now.
    ///
    /// An expired lockout clears the failure count.
    pub fn check(&mut self, time: &SafeTimeProvider) -> Result<()> {
        match self.remaining_secs(time) {
            Some(remaining_secs) => Err(ClientError::LoginLockedOut { remaining_secs }),
            None => Ok(()),
        }
    }

    /// seconds left in the lockout, rounded up
    pub fn remaining_secs(&mut self, time: &SafeTimeProvider) -> Option<i64> {
        let until = self.locked_until?;
        let now = time.now();
        if until <= now {
            debug!("login lockout expired");
            self.reset();
            return None;
        }
        let millis = (until - now).num_milliseconds();
        Some((millis + 999) / 1000)
    }

    pub fn record_failure(&mut self, time: &SafeTimeProvider) {
        let now = time.now();
        self.attempts += 1;
        self.events.emit(Event::LoginFailed {
            attempts: self.attempts,
            timestamp: now,
        });

        if self.attempts >= self.max_attempts && self.locked_until.is_none() {
            let until = now + self.lockout;
            warn!("{} failed logins, locked until {}", self.attempts, until);
            self.locked_until = Some(until);
            self.events.emit(Event::LoginLockedOut { until });
        }
    }

    pub fn record_success(&mut self) {
        self.reset();
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn is_locked(&self, time: &SafeTimeProvider) -> bool {
        self.locked_until.map_or(false, |until| until > time.now())
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }

    fn reset(&mut self) {
        self.attempts = 0;
        self.locked_until = None;
    }
}
