//! Usage: Authorization-code exchange against the GitHub token endpoint.

use crate::shared::error::AppResult;
use std::collections::HashMap;
use std::time::Duration;

/// One code-for-token exchange against the provider.
#[derive(Debug, Clone)]
pub(crate) struct TokenExchangeRequest {
    pub(crate) token_url: String,
    pub(crate) client_id: String,
    pub(crate) client_secret: String,
    pub(crate) code: String,
}

/// Named fields of the provider's form-encoded token response. Only
/// `access_token` is consumed; `token_type` and `scope` are parsed and
/// dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TokenExchangeResponse {
    pub(crate) access_token: String,
    pub(crate) token_type: Option<String>,
    pub(crate) scope: Option<String>,
}

/// HTTP client for the token exchange. Certificate verification stays on
/// unless the operator opts into the legacy insecure mode.
pub fn oauth_http_client(insecure_skip_tls_verify: bool) -> AppResult<reqwest::Client> {
    if insecure_skip_tls_verify {
        tracing::warn!(
            "TLS certificate verification is DISABLED for the token exchange; \
             unset insecure_skip_tls_verify unless you really need it"
        );
    }
    reqwest::Client::builder()
        .user_agent(format!(
            "github-oauth-connector/{}",
            env!("CARGO_PKG_VERSION")
        ))
        .connect_timeout(Duration::from_secs(10))
        .danger_accept_invalid_certs(insecure_skip_tls_verify)
        .build()
        .map_err(|e| format!("SYSTEM_ERROR: oauth client init failed: {e}").into())
}

/// Single best-effort exchange; the caller decides what a failure means.
pub(crate) async fn exchange_authorization_code(
    client: &reqwest::Client,
    req: &TokenExchangeRequest,
) -> AppResult<TokenExchangeResponse> {
    let mut form: HashMap<&str, String> = HashMap::new();
    form.insert("client_id", req.client_id.trim().to_string());
    form.insert("client_secret", req.client_secret.trim().to_string());
    form.insert("code", req.code.trim().to_string());

    let response = client
        .post(req.token_url.trim())
        .form(&form)
        .send()
        .await
        .map_err(|e| format!("SYSTEM_ERROR: oauth token exchange request failed: {e}"))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| format!("SYSTEM_ERROR: oauth token response read failed: {e}"))?;

    if !status.is_success() {
        let snippet: String = body.chars().take(240).collect();
        return Err(format!(
            "SYSTEM_ERROR: oauth token endpoint returned status={} body={snippet}",
            status.as_u16()
        )
        .into());
    }

    let parsed = parse_token_body(&body)?;
    tracing::debug!(
        token_type = ?parsed.token_type,
        scope = ?parsed.scope,
        "token endpoint responded"
    );
    Ok(parsed)
}

/// Parse a form-encoded token response into named fields; `access_token`
/// is the single required one.
pub(crate) fn parse_token_body(body: &str) -> AppResult<TokenExchangeResponse> {
    let url = reqwest::Url::parse(&format!("http://localhost/?{}", body.trim()))
        .map_err(|e| format!("SYSTEM_ERROR: oauth token response is not form-encoded: {e}"))?;

    let mut access_token: Option<String> = None;
    let mut token_type: Option<String> = None;
    let mut scope: Option<String> = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "access_token" => access_token = Some(value.to_string()),
            "token_type" => token_type = Some(value.to_string()),
            "scope" => scope = Some(value.to_string()),
            _ => {}
        }
    }

    let access_token = access_token
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| "SYSTEM_ERROR: oauth token response missing access_token".to_string())?;

    Ok(TokenExchangeResponse {
        access_token,
        token_type,
        scope,
    })
}
