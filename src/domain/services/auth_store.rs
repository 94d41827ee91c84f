#[cfg(test)]
#[path = "auth_store_test.rs"]
mod tests;

use std::fs;
use std::path;

use serde_derive::Deserialize;
use serde_derive::Serialize;

use crate::domain::models::Theme;
use crate::domain::models::User;
use crate::domain::models::UserPatch;

/// The single record persisted to disk, rehydrated as-is at startup. A stale
/// token is treated as valid until the backend rejects it with a 401.
#[derive(Default, Serialize, Deserialize)]
struct PersistedAuth {
    user: Option<User>,
    token: Option<String>,
    is_authenticated: bool,
    theme: Theme,
}

/// Session-wide authentication state. `is_authenticated` is true iff both the
/// user record and the bearer token are present.
pub struct AuthStore {
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_authenticated: bool,
    pub theme: Theme,
    storage_path: Option<path::PathBuf>,
}

impl AuthStore {
    pub fn in_memory() -> AuthStore {
        return AuthStore {
            user: None,
            token: None,
            is_authenticated: false,
            theme: Theme::Dark,
            storage_path: None,
        };
    }

    /// Rehydrates the store from the persisted record. A missing or corrupt
    /// record degrades to a signed-out default.
    pub fn load(storage_path: path::PathBuf) -> AuthStore {
        let mut store = AuthStore::in_memory();
        store.storage_path = Some(storage_path.clone());

        if !storage_path.exists() {
            return store;
        }

        match fs::read_to_string(&storage_path) {
            Ok(payload) => match serde_json::from_str::<PersistedAuth>(&payload) {
                Ok(persisted) => {
                    store.user = persisted.user;
                    store.token = persisted.token;
                    store.is_authenticated = persisted.is_authenticated;
                    store.theme = persisted.theme;
                }
                Err(err) => {
                    tracing::warn!(err = ?err, "Persisted auth record is corrupt, signing out");
                }
            },
            Err(err) => {
                tracing::warn!(err = ?err, "Unable to read persisted auth record");
            }
        }

        return store;
    }

    pub fn set_auth(&mut self, user: User, token: &str) {
        self.theme = user.theme;
        self.user = Some(user);
        self.token = Some(token.to_string());
        self.is_authenticated = true;
        self.persist();
    }

    pub fn logout(&mut self) {
        self.user = None;
        self.token = None;
        self.is_authenticated = false;
        self.theme = Theme::Dark;
        self.persist();
    }

    /// Shallow-merges fields into the current user record. With no user
    /// present the patch lands on an empty base.
    pub fn update_user(&mut self, patch: UserPatch) {
        let mut user = self.user.take().unwrap_or_default();
        user.apply(patch);
        self.user = Some(user);
        self.persist();
    }

    /// Applies the theme locally right away and mirrors it into the user
    /// record. Informing the backend is the caller's fire-and-forget concern.
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        if let Some(user) = self.user.as_mut() {
            user.theme = theme;
        }
        self.persist();
    }

    fn persist(&self) {
        let Some(storage_path) = self.storage_path.as_ref() else {
            return;
        };

        let record = PersistedAuth {
            user: self.user.clone(),
            token: self.token.clone(),
            is_authenticated: self.is_authenticated,
            theme: self.theme,
        };

        if let Some(parent) = storage_path.parent() {
            if !parent.exists() {
                if let Err(err) = fs::create_dir_all(parent) {
                    tracing::warn!(err = ?err, "Unable to create state dir");
                    return;
                }
            }
        }

        match serde_json::to_string(&record) {
            Ok(payload) => {
                if let Err(err) = fs::write(storage_path, payload) {
                    tracing::warn!(err = ?err, "Unable to persist auth record");
                }
            }
            Err(err) => {
                tracing::warn!(err = ?err, "Unable to serialize auth record");
            }
        }
    }
}
