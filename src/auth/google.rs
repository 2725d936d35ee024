//! Google OAuth 2.0 for installed apps, backed by `yup-oauth2`.
//!
//! The authenticator never writes to disk. A [`TokenSlot`] lends it the
//! cached token and keeps whatever it produces; [`super::TokenCache`] stays
//! the only persistent store.
use std::{
    future::{self, Future},
    path::PathBuf,
    pin::Pin,
    sync::{Arc, Mutex},
    time::Duration as StdDuration,
};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use time::OffsetDateTime;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use yup_oauth2::{
    authenticator_delegate::InstalledFlowDelegate,
    storage::{TokenInfo, TokenStorage},
    ApplicationSecret, InstalledFlowAuthenticator, InstalledFlowReturnMethod,
};

use super::{Credential, InteractiveAuthorizer, TokenRefresher};
use crate::{
    config::AuthSection,
    lib::{
        browser::BrowserLauncher,
        console::Console,
        errors::{AuthError, ACCESS_BLOCKED_HINT},
    },
};

/// Refresh requests do not wait on the operator.
const REFRESH_TIMEOUT: StdDuration = StdDuration::from_secs(60);

/// Single-token storage shared with the authenticator.
#[derive(Clone, Default)]
struct TokenSlot(Arc<Mutex<Option<TokenInfo>>>);

impl TokenSlot {
    fn seeded(token: TokenInfo) -> Self {
        Self(Arc::new(Mutex::new(Some(token))))
    }

    fn take(&self) -> Option<TokenInfo> {
        self.0.lock().ok()?.take()
    }
}

#[async_trait]
impl TokenStorage for TokenSlot {
    async fn set(&self, _scopes: &[&str], token: TokenInfo) -> anyhow::Result<()> {
        let mut slot = self
            .0
            .lock()
            .map_err(|_| anyhow::anyhow!("token slot poisoned"))?;
        *slot = Some(token);
        Ok(())
    }

    async fn get(&self, _scopes: &[&str]) -> Option<TokenInfo> {
        self.0.lock().ok()?.clone()
    }
}

/// Prints the consent instructions and opens the browser.
struct ConsentPrompt {
    browser: Arc<dyn BrowserLauncher>,
}

impl InstalledFlowDelegate for ConsentPrompt {
    fn present_user_url<'a>(
        &'a self,
        url: &'a str,
        _need_code: bool,
    ) -> Pin<Box<dyn Future<Output = Result<String, String>> + Send + 'a>> {
        let mut console = Console::stdout();
        console.line("Opening browser for Google authentication...");
        for line in ACCESS_BLOCKED_HINT.lines() {
            console.line(line);
        }
        console.line(format!(
            "Please visit this URL to authorize this application: {url}"
        ));
        if let Err(err) = self.browser.open(url) {
            warn!(
                target: "apk_drive_upload::auth",
                reason = %err,
                "Could not open a browser; use the printed URL"
            );
        }
        // The redirect listener delivers the code.
        Box::pin(future::ready(Ok(String::new())))
    }
}

/// Turns the fallback consent of a failed refresh into an error.
struct RefreshOnly;

impl InstalledFlowDelegate for RefreshOnly {
    fn present_user_url<'a>(
        &'a self,
        _url: &'a str,
        _need_code: bool,
    ) -> Pin<Box<dyn Future<Output = Result<String, String>> + Send + 'a>> {
        Box::pin(future::ready(Err("refresh token was not accepted".to_string())))
    }
}

/// Installed-app OAuth client for the Drive scopes.
pub struct GoogleOAuthClient {
    client_secret_file: PathBuf,
    scopes: Vec<String>,
    consent_timeout: StdDuration,
    browser: Arc<dyn BrowserLauncher>,
}

impl GoogleOAuthClient {
    pub fn new(auth: &AuthSection, browser: Arc<dyn BrowserLauncher>) -> Self {
        Self {
            client_secret_file: auth.client_secret_file.clone(),
            scopes: auth.scopes.clone(),
            consent_timeout: auth.consent_timeout,
            browser,
        }
    }

    async fn application_secret(&self) -> Result<ApplicationSecret, AuthError> {
        yup_oauth2::read_application_secret(&self.client_secret_file)
            .await
            .map_err(|source| AuthError::ClientSecret {
                path: self.client_secret_file.clone(),
                source,
            })
    }

    /// Run one authenticator round on its own task so that a panic inside
    /// the token exchange cannot take the uploader down.
    fn spawn_flow(
        &self,
        secret: ApplicationSecret,
        method: InstalledFlowReturnMethod,
        delegate: Box<dyn InstalledFlowDelegate>,
        slot: TokenSlot,
    ) -> JoinHandle<Result<TokenInfo, AuthError>> {
        let scopes = self.scopes.clone();
        tokio::spawn(async move {
            let authenticator = InstalledFlowAuthenticator::builder(secret, method)
                .flow_delegate(delegate)
                .with_storage(Box::new(slot.clone()))
                .build()
                .await
                .map_err(AuthError::Setup)?;
            authenticator.token(scopes.as_slice()).await?;
            slot.take().ok_or(AuthError::MissingAccessToken)
        })
    }
}

#[async_trait]
impl TokenRefresher for GoogleOAuthClient {
    async fn refresh(&self, credential: &Credential) -> Result<Credential, AuthError> {
        let refresh_token = credential
            .refresh_token
            .as_deref()
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::NotRefreshable)?;
        let secret = self.application_secret().await?;

        // Expired in the slot so the authenticator always refreshes.
        let slot = TokenSlot::seeded(TokenInfo {
            access_token: Some(credential.access_token.clone()),
            refresh_token: Some(refresh_token.to_string()),
            expires_at: Some(OffsetDateTime::UNIX_EPOCH),
            id_token: None,
        });
        let handle = self.spawn_flow(
            secret,
            InstalledFlowReturnMethod::Interactive,
            Box::new(RefreshOnly),
            slot,
        );
        let token = match finish_flow(handle, REFRESH_TIMEOUT, AuthError::RefreshTimeout).await {
            Err(AuthError::Flow(yup_oauth2::Error::UserError(_))) => {
                return Err(AuthError::RefreshRejected)
            }
            other => other?,
        };

        info!(target: "apk_drive_upload::auth", "Refreshed access token");
        into_credential(
            token,
            Some(refresh_token.to_string()),
            credential.scopes.clone(),
        )
    }
}

#[async_trait]
impl InteractiveAuthorizer for GoogleOAuthClient {
    async fn authorize(&self) -> Result<Credential, AuthError> {
        let secret = self.application_secret().await?;
        let handle = self.spawn_flow(
            secret,
            InstalledFlowReturnMethod::HTTPRedirect,
            Box::new(ConsentPrompt {
                browser: Arc::clone(&self.browser),
            }),
            TokenSlot::default(),
        );
        let timed_out = AuthError::ConsentTimeout {
            duration_secs: self.consent_timeout.as_secs(),
        };
        let token = finish_flow(handle, self.consent_timeout, timed_out).await?;

        info!(target: "apk_drive_upload::auth", "Obtained a new credential through consent");
        into_credential(token, None, self.scopes.clone())
    }
}

/// Await a flow task, stopping it once `limit` has passed.
async fn finish_flow(
    mut handle: JoinHandle<Result<TokenInfo, AuthError>>,
    limit: StdDuration,
    timed_out: AuthError,
) -> Result<TokenInfo, AuthError> {
    match tokio::time::timeout(limit, &mut handle).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => Err(AuthError::Aborted {
            message: join_error.to_string(),
        }),
        Err(_) => {
            handle.abort();
            Err(timed_out)
        }
    }
}

fn into_credential(
    token: TokenInfo,
    previous_refresh_token: Option<String>,
    scopes: Vec<String>,
) -> Result<Credential, AuthError> {
    let access_token = token
        .access_token
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingAccessToken)?;
    Ok(Credential {
        access_token,
        refresh_token: token.refresh_token.or(previous_refresh_token),
        expiry: token.expires_at.and_then(to_chrono),
        scopes,
    })
}

/// Out-of-range instants are dropped, leaving the token without expiry.
fn to_chrono(instant: OffsetDateTime) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(instant.unix_timestamp(), instant.nanosecond())
        .single()
}
