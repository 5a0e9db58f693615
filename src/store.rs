//! Client-side user account store.
//!
//! A demo-grade store: passwords are hashed with a fixed salted SHA-256
//! digest, which is NOT hardened against offline attacks. Records live in
//! memory and can be exported/imported as JSON; durability is the host's
//! problem.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

const PASSWORD_SALT: &str = "moon_stoners_salt";
const MIN_USERNAME_LEN: usize = 2;
const MIN_PASSWORD_LEN: usize = 4;
const WEEK_SECS: u64 = 7 * 24 * 60 * 60;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    #[error("Username must be at least {MIN_USERNAME_LEN} characters long")]
    UsernameTooShort,
    #[error("Password must be at least {MIN_PASSWORD_LEN} characters long")]
    PasswordTooShort,
    #[error("Username already exists")]
    UsernameTaken,
    /// Deliberately covers both unknown user and wrong password.
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("User not found")]
    UserNotFound,
}

/// Per-account settings stored alongside the credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountPreferences {
    pub theme: String,
    pub language: String,
    pub auto_speak: bool,
    pub background_animation: bool,
}

impl Default for AccountPreferences {
    fn default() -> Self {
        Self {
            theme: "cosmic".to_string(),
            language: "en".to_string(),
            auto_speak: false,
            background_animation: true,
        }
    }
}

/// One stored account. The username doubles as the record key and is
/// always lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub full_name: String,
    /// Unix seconds.
    pub created_at: u64,
    /// Unix seconds of the most recent login, if any.
    pub last_login: Option<u64>,
    pub login_count: u32,
    pub preferences: AccountPreferences,
}

/// Input for [`UserStore::register`].
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: String,
    pub full_name: String,
}

/// Aggregate numbers for the account list view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub total_users: usize,
    /// Users whose last login falls within the past week.
    pub active_this_week: usize,
    pub average_login_count: u32,
}

/// In-memory user store keyed by lowercased username.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct UserStore {
    users: BTreeMap<String, UserRecord>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new account. `now` is the creation timestamp in unix
    /// seconds, supplied by the caller.
    pub fn register(&mut self, user: NewUser, now: u64) -> Result<&UserRecord, StoreError> {
        let username = user.username.trim().to_lowercase();
        if username.len() < MIN_USERNAME_LEN {
            return Err(StoreError::UsernameTooShort);
        }
        if user.password.len() < MIN_PASSWORD_LEN {
            return Err(StoreError::PasswordTooShort);
        }
        if self.users.contains_key(&username) {
            return Err(StoreError::UsernameTaken);
        }

        let record = UserRecord {
            username: username.clone(),
            password_hash: hash_password(&user.password),
            email: user.email.trim().to_lowercase(),
            full_name: user.full_name.trim().to_string(),
            created_at: now,
            last_login: None,
            login_count: 0,
            preferences: AccountPreferences::default(),
        };
        log::info!("registered user {username}");
        Ok(self.users.entry(username).or_insert(record))
    }

    /// Authenticate and record the login.
    pub fn login(
        &mut self,
        username: &str,
        password: &str,
        now: u64,
    ) -> Result<&UserRecord, StoreError> {
        let key = username.trim().to_lowercase();
        let record = self
            .users
            .get_mut(&key)
            .ok_or(StoreError::InvalidCredentials)?;
        if record.password_hash != hash_password(password) {
            return Err(StoreError::InvalidCredentials);
        }
        record.last_login = Some(now);
        record.login_count += 1;
        Ok(record)
    }

    /// Record a logout. Only validates that the account exists.
    pub fn logout(&self, username: &str) -> Result<(), StoreError> {
        let key = username.trim().to_lowercase();
        if self.users.contains_key(&key) {
            log::info!("user {key} logged out");
            Ok(())
        } else {
            Err(StoreError::UserNotFound)
        }
    }

    pub fn get(&self, username: &str) -> Option<&UserRecord> {
        self.users.get(&username.trim().to_lowercase())
    }

    /// All accounts, ordered by username.
    pub fn list(&self) -> Vec<&UserRecord> {
        self.users.values().collect()
    }

    pub fn has_users(&self) -> bool {
        !self.users.is_empty()
    }

    pub fn update_preferences(
        &mut self,
        username: &str,
        preferences: AccountPreferences,
    ) -> Result<(), StoreError> {
        let key = username.trim().to_lowercase();
        let record = self.users.get_mut(&key).ok_or(StoreError::UserNotFound)?;
        record.preferences = preferences;
        Ok(())
    }

    pub fn delete(&mut self, username: &str) -> Result<(), StoreError> {
        let key = username.trim().to_lowercase();
        self.users
            .remove(&key)
            .map(|_| ())
            .ok_or(StoreError::UserNotFound)
    }

    /// Aggregate stats relative to `now` (unix seconds).
    pub fn stats(&self, now: u64) -> StoreStats {
        let total = self.users.len();
        let active = self
            .users
            .values()
            .filter(|u| u.last_login.is_some_and(|t| now.saturating_sub(t) <= WEEK_SECS))
            .count();
        let average = if total == 0 {
            0
        } else {
            let sum: u32 = self.users.values().map(|u| u.login_count).sum();
            (f64::from(sum) / total as f64).round() as u32
        };
        StoreStats {
            total_users: total,
            active_this_week: active,
            average_login_count: average,
        }
    }

    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self)
    }

    pub fn import_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Fixed salted SHA-256 digest, lowercase hex. Demo-grade by design.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(PASSWORD_SALT.as_bytes());
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{b:02x}")).collect()
}
