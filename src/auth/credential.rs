use std::fmt;

use chrono::{DateTime, Duration, Utc};

/// Tokens are treated as expired this long before their nominal expiry.
pub fn expiry_skew() -> Duration {
    Duration::seconds(10)
}

/// OAuth credential authorizing calls against the Drive API.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// `None` means the token server did not say; treated as non-expiring.
    pub expiry: Option<DateTime<Utc>>,
    pub scopes: Vec<String>,
}

impl Credential {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry
            .map(|expiry| expiry <= now + expiry_skew())
            .unwrap_or(false)
    }

    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        !self.access_token.is_empty() && !self.is_expired(now)
    }

    pub fn can_refresh(&self) -> bool {
        self.refresh_token
            .as_deref()
            .is_some_and(|token| !token.is_empty())
    }
}

// Tokens never reach logs through `{:?}`.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"<redacted>")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "<redacted>"),
            )
            .field("expiry", &self.expiry)
            .field("scopes", &self.scopes)
            .finish()
    }
}

/// Where a cached credential stands before the upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenState {
    /// Nothing usable was cached.
    NoToken,
    /// Use as is.
    Valid(Credential),
    /// Expired but refreshable.
    Expired(Credential),
    /// Unusable and not refreshable.
    Invalid,
}

impl TokenState {
    pub fn classify(cached: Option<Credential>, now: DateTime<Utc>) -> Self {
        match cached {
            None => TokenState::NoToken,
            Some(credential) if credential.is_valid(now) => TokenState::Valid(credential),
            Some(credential) if credential.is_expired(now) && credential.can_refresh() => {
                TokenState::Expired(credential)
            }
            Some(_) => TokenState::Invalid,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TokenState::NoToken => "no_token",
            TokenState::Valid(_) => "valid",
            TokenState::Expired(_) => "expired",
            TokenState::Invalid => "invalid",
        }
    }
}
