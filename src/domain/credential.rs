//! Usage: GitHub OAuth application credential record (schema + state helpers).

use serde::{Deserialize, Serialize};

/// Credential record for a registered GitHub OAuth application.
///
/// `client_id` and `client_secret` are operator-supplied; `access_token`
/// stays empty until an authorization run completes and may be overwritten
/// by a later re-authorization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuthCredential {
    pub client_id: String,
    pub client_secret: String,
    pub access_token: String,
}

impl OAuthCredential {
    /// Both operator-supplied fields are present (ignoring surrounding whitespace).
    pub fn has_client_pair(&self) -> bool {
        !self.client_id.trim().is_empty() && !self.client_secret.trim().is_empty()
    }

    pub fn is_authorized(&self) -> bool {
        !self.access_token.trim().is_empty()
    }
}
