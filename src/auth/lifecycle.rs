use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use super::{Credential, TokenCache, TokenState};
use crate::lib::errors::AuthError;

/// Exchanges a refresh token for a new access token.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh(&self, credential: &Credential) -> Result<Credential, AuthError>;
}

/// Obtains a brand new credential with the operator's involvement.
#[async_trait]
pub trait InteractiveAuthorizer: Send + Sync {
    async fn authorize(&self) -> Result<Credential, AuthError>;
}

/// Drives the cached token through validate, refresh or re-consent.
pub struct CredentialManager<'a> {
    cache: TokenCache,
    refresher: &'a dyn TokenRefresher,
    authorizer: &'a dyn InteractiveAuthorizer,
    reauthorize_on_refresh_failure: bool,
}

impl<'a> CredentialManager<'a> {
    pub fn new(
        cache: TokenCache,
        refresher: &'a dyn TokenRefresher,
        authorizer: &'a dyn InteractiveAuthorizer,
        reauthorize_on_refresh_failure: bool,
    ) -> Self {
        Self {
            cache,
            refresher,
            authorizer,
            reauthorize_on_refresh_failure,
        }
    }

    pub async fn acquire(&self) -> Result<Credential, AuthError> {
        self.acquire_at(Utc::now()).await
    }

    /// Err carries the last failure once no usable credential is left; it
    /// has already been logged.
    pub async fn acquire_at(&self, now: DateTime<Utc>) -> Result<Credential, AuthError> {
        let cached = match self.cache.load() {
            Ok(cached) => cached,
            Err(err) => {
                warn!(
                    target: "apk_drive_upload::auth",
                    path = %self.cache.path().display(),
                    reason = %err,
                    "Ignoring unusable token file"
                );
                None
            }
        };

        let state = TokenState::classify(cached, now);
        info!(
            target: "apk_drive_upload::auth",
            state = state.label(),
            "Classified cached token"
        );

        let credential = match state {
            TokenState::Valid(credential) => return Ok(credential),
            TokenState::Expired(stale) => match self.refresher.refresh(&stale).await {
                Ok(fresh) => fresh,
                Err(err) if self.reauthorize_on_refresh_failure => {
                    warn!(
                        target: "apk_drive_upload::auth",
                        reason = %err,
                        "Token refresh failed; falling back to browser consent"
                    );
                    self.authorize().await?
                }
                Err(err) => {
                    error!(
                        target: "apk_drive_upload::auth",
                        reason = %err,
                        "Token refresh failed"
                    );
                    return Err(err);
                }
            },
            TokenState::NoToken | TokenState::Invalid => self.authorize().await?,
        };

        self.persist(&credential);
        Ok(credential)
    }

    async fn authorize(&self) -> Result<Credential, AuthError> {
        self.authorizer.authorize().await.map_err(|err| {
            error!(
                target: "apk_drive_upload::auth",
                reason = %err,
                "Authentication failed"
            );
            err
        })
    }

    fn persist(&self, credential: &Credential) {
        match self.cache.store(credential) {
            Ok(()) => info!(
                target: "apk_drive_upload::auth",
                path = %self.cache.path().display(),
                "Saved credential for the next run"
            ),
            Err(err) => warn!(
                target: "apk_drive_upload::auth",
                reason = %err,
                "Failed to save credential; continuing with the in-memory token"
            ),
        }
    }
}
