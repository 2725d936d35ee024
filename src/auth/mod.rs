//! OAuth credential lifecycle: cache, refresh and browser consent.

mod cache;
mod credential;
mod google;
mod lifecycle;

pub use cache::{TokenCache, TOKEN_FORMAT_VERSION};
pub use credential::{expiry_skew, Credential, TokenState};
pub use google::GoogleOAuthClient;
pub use lifecycle::{CredentialManager, InteractiveAuthorizer, TokenRefresher};
