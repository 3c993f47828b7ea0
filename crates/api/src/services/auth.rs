//! Registration, login and password change.

use std::sync::Arc;

use explorers_core::error::CoreError;
use explorers_core::validation::{validate_password, validate_registration};
use explorers_db::models::user::{CreateUser, UserInfo};
use serde::Serialize;

use super::store::{CredentialStore, StoreError};
use crate::auth::jwt::TokenService;
use crate::auth::password::{hash_password, verify_password};

/// Password hashed once at startup and verified against when the username is
/// unknown, so both failure paths run one Argon2 verification.
const DUMMY_PASSWORD: &str = "file-explorers-dummy-password";

/// A freshly issued session.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub token: String,
    pub user: UserInfo,
}

/// Owns the credential flows on top of a [`CredentialStore`].
pub struct AuthManager<S> {
    store: S,
    tokens: Arc<TokenService>,
    dummy_hash: String,
}

impl<S: CredentialStore> AuthManager<S> {
    pub fn new(store: S, tokens: Arc<TokenService>) -> Result<Self, CoreError> {
        let dummy_hash = hash(DUMMY_PASSWORD)?;
        Ok(Self {
            store,
            tokens,
            dummy_hash,
        })
    }

    /// Check a username/password pair and issue a session on success.
    ///
    /// Unknown users and wrong passwords fail with the same
    /// [`CoreError::Unauthenticated`] message.
    #[tracing::instrument(skip(self, password))]
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthSession, CoreError> {
        let user = self.check_credentials(username, password).await?;
        tracing::info!(user_id = user.id, "User authenticated");
        self.open_session(user)
    }

    /// Create an account and issue a session for it.
    #[tracing::instrument(skip(self, password))]
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, CoreError> {
        validate_registration(username, email, password)?;

        let input = CreateUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: hash(password)?,
        };
        let user = self.store.insert(&input).await.map_err(|e| match e {
            StoreError::Duplicate(constraint) => {
                tracing::debug!(%constraint, "Registration rejected");
                CoreError::DuplicateUser("Username or email is already registered".into())
            }
            other => other.into(),
        })?;

        tracing::info!(user_id = user.id, "User registered");
        self.open_session(UserInfo::from(&user))
    }

    /// Replace a user's password after re-checking the current one.
    #[tracing::instrument(skip(self, old_password, new_password))]
    pub async fn change_password(
        &self,
        username: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), CoreError> {
        let user = self.check_credentials(username, old_password).await?;
        validate_password(new_password)?;

        let updated = self
            .store
            .update_hash(username, &hash(new_password)?)
            .await?;
        if !updated {
            return Err(CoreError::NotFound {
                entity: "User",
                id: user.id,
            });
        }

        tracing::info!(user_id = user.id, "Password changed");
        Ok(())
    }

    async fn check_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<UserInfo, CoreError> {
        let Some(user) = self.store.find_by_username(username).await? else {
            verify(password, &self.dummy_hash)?;
            return Err(CoreError::invalid_credentials());
        };

        if !verify(password, &user.password_hash)? {
            return Err(CoreError::invalid_credentials());
        }
        Ok(UserInfo::from(&user))
    }

    fn open_session(&self, user: UserInfo) -> Result<AuthSession, CoreError> {
        let token = self.tokens.issue(&user)?;
        Ok(AuthSession { token, user })
    }
}

fn hash(password: &str) -> Result<String, CoreError> {
    hash_password(password)
        .map_err(|e| CoreError::Internal(format!("Password hashing error: {e}")))
}

fn verify(password: &str, hash: &str) -> Result<bool, CoreError> {
    verify_password(password, hash)
        .map_err(|e| CoreError::Internal(format!("Password verification error: {e}")))
}
