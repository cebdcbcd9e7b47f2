//! Usage: Authorization redirect gate and URL construction for the GitHub code flow.

use crate::domain::credential::OAuthCredential;
use crate::oauth::provider::{ProviderEndpoints, REPO_SCOPE};
use crate::shared::error::AppResult;
use serde::Deserialize;

/// Query parameters that gate the authorization redirect.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorizeTrigger {
    /// Set by a completed settings save; the explicit "authorize" trigger.
    #[serde(rename = "settings-updated")]
    pub settings_updated: Option<String>,
    /// A previous failed run tags its redirect with `authorize=false`.
    pub authorize: Option<String>,
}

/// The redirect fires only right after a settings save, never when a failed
/// run routed back here, and only with a complete client pair on file.
/// Anything else is a no-op, not an error.
pub fn should_begin_authorization(
    trigger: &AuthorizeTrigger,
    credential: &OAuthCredential,
) -> bool {
    if trigger.authorize.as_deref() == Some("false") {
        return false;
    }
    if trigger.settings_updated.as_deref() != Some("true") {
        return false;
    }
    credential.has_client_pair()
}

/// Build the provider authorization URL carrying exactly `scope`,
/// `client_id`, and `redirect_uri`.
pub fn build_authorize_url(
    endpoints: &ProviderEndpoints,
    client_id: &str,
    redirect_uri: &str,
) -> AppResult<String> {
    let mut url = reqwest::Url::parse(&endpoints.authorize_url)
        .map_err(|e| format!("SYSTEM_ERROR: invalid oauth authorize url: {e}"))?;
    url.query_pairs_mut()
        .append_pair("scope", REPO_SCOPE)
        .append_pair("client_id", client_id)
        .append_pair("redirect_uri", redirect_uri);
    Ok(url.to_string())
}
