//! Explicit owner of the authentication token, the signed-in user and the theme.

mod store;

pub use store::{FileStateStore, MemoryStateStore, PersistedState, StateStore, StoreError, Theme};

use std::sync::Arc;

use tracing::{info, warn};

use crate::api::schema::{Credentials, PermissionLevel, User};
use crate::api::ApiClient;
use crate::intent::{DeskError, ValidationError};

const MIN_PASSWORD_LEN: usize = 6;

pub struct Session {
    client: ApiClient,
    user: Option<User>,
    theme: Theme,
    store: Arc<dyn StateStore>,
}

impl Session {
    /// Builds a session from the persisted state. An unreadable store falls back to defaults.
    pub fn new(mut client: ApiClient, store: Arc<dyn StateStore>) -> Self {
        let persisted = store.load().unwrap_or_else(|err| {
            warn!(error = %err, "ignoring unreadable client state");
            PersistedState::default()
        });
        client.set_token(persisted.auth_token);
        Self {
            client,
            user: None,
            theme: persisted.theme,
            store,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn is_authenticated(&self) -> bool {
        self.client.token().is_some()
    }

    pub fn set_theme(&mut self, theme: Theme) -> Theme {
        self.theme = theme;
        self.persist();
        self.theme
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.set_theme(self.theme.toggled())
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<User, DeskError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(ValidationError::MissingCredentials.into());
        }

        let token = self.client.request_token(username, password).await?;
        self.client.set_token(Some(token.access_token));
        self.persist();

        match self.client.current_user().await {
            Ok(user) => {
                info!(username = %user.username, level = %user.permission_level, "signed in");
                self.user = Some(user.clone());
                Ok(user)
            }
            Err(err) => {
                self.clear_auth();
                Err(err.into())
            }
        }
    }

    /// Creates an account. The caller still has to sign in afterwards.
    pub async fn register(&self, username: &str, password: &str) -> Result<User, DeskError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(ValidationError::MissingCredentials.into());
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            }
            .into());
        }

        let user = self
            .client
            .register(&Credentials {
                username: username.to_string(),
                password: password.to_string(),
            })
            .await?;
        info!(username = %user.username, "account registered");
        Ok(user)
    }

    /// Re-validates a stored token. Any failure drops it.
    pub async fn restore(&mut self) -> Result<User, DeskError> {
        if !self.is_authenticated() {
            return Err(DeskError::auth_required());
        }
        match self.client.current_user().await {
            Ok(user) => {
                self.user = Some(user.clone());
                Ok(user)
            }
            Err(err) => {
                warn!(error = %err, "stored token rejected");
                self.clear_auth();
                Err(DeskError::AuthRequired(err.to_string()))
            }
        }
    }

    pub fn logout(&mut self) {
        if let Some(user) = &self.user {
            info!(username = %user.username, "signed out");
        }
        self.clear_auth();
    }

    pub fn require_authenticated(&self) -> Result<&ApiClient, DeskError> {
        if self.is_authenticated() {
            Ok(&self.client)
        } else {
            Err(DeskError::auth_required())
        }
    }

    /// Confirms with the API that the current user is an admin.
    pub async fn require_admin(&mut self) -> Result<User, DeskError> {
        let result = self.require_authenticated()?.current_user().await;
        let user = self.settle(result)?;
        if user.permission_level != PermissionLevel::Admin {
            warn!(username = %user.username, "admin view refused");
            self.clear_auth();
            return Err(DeskError::AuthRequired("Admin access required".to_string()));
        }
        self.user = Some(user.clone());
        Ok(user)
    }

    /// Passes `result` through, signing out first when it is an auth failure.
    pub fn settle<T, E>(&mut self, result: Result<T, E>) -> Result<T, DeskError>
    where
        E: Into<DeskError>,
    {
        let result = result.map_err(Into::into);
        if let Err(err) = &result {
            if err.is_auth_failure() {
                warn!(error = %err, "session expired");
                self.clear_auth();
            }
        }
        result
    }

    fn clear_auth(&mut self) {
        self.client.set_token(None);
        self.user = None;
        self.persist();
    }

    fn persist(&self) {
        let state = PersistedState {
            auth_token: self.client.token().map(str::to_string),
            theme: self.theme,
        };
        if let Err(err) = self.store.save(&state) {
            warn!(error = %err, "failed to persist client state");
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.client.base_url())
            .field("authenticated", &self.is_authenticated())
            .field("user", &self.user)
            .field("theme", &self.theme)
            .finish()
    }
}
