//! Usage: GitHub OAuth endpoint and scope definitions.

/// GitHub's authorization endpoint.
pub const GITHUB_AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
/// GitHub's token-exchange endpoint.
pub const GITHUB_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
/// Scope requested during authorization; `repo` covers private repositories.
pub const REPO_SCOPE: &str = "repo";
/// Where the operator registers a new OAuth application.
pub const NEW_APPLICATION_URL: &str = "https://github.com/settings/applications/new";

/// Provider endpoints, overridable through configuration so tests can point
/// the exchange at a local stand-in.
#[derive(Debug, Clone)]
pub struct ProviderEndpoints {
    pub authorize_url: String,
    pub token_url: String,
}

impl Default for ProviderEndpoints {
    fn default() -> Self {
        Self {
            authorize_url: GITHUB_AUTHORIZE_URL.to_string(),
            token_url: GITHUB_TOKEN_URL.to_string(),
        }
    }
}
