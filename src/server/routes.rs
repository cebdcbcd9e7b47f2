//! Usage: Router assembly and request handlers for the connector endpoints.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::domain::credential::OAuthCredential;
use crate::oauth::authorize::{build_authorize_url, should_begin_authorization, AuthorizeTrigger};
use crate::oauth::provider::NEW_APPLICATION_URL;
use crate::oauth::token_exchange::{exchange_authorization_code, TokenExchangeRequest};
use crate::shared::error::AppError;
use crate::shared::security::mask_token;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/healthz", get(health))
        .route("/setup", get(setup_guide))
        .route("/settings", get(get_settings).post(post_settings))
        .route("/oauth/authorize", get(begin_authorization))
        .route("/oauth/callback", get(oauth_callback))
        .with_state(state)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if self.code() == "SEC_INVALID_INPUT" {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, self.to_string()).into_response()
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    app: &'static str,
    version: &'static str,
    ts: u64,
}

async fn root() -> &'static str {
    "GitHub OAuth Connector is running"
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        app: "github-oauth-connector",
        version: env!("CARGO_PKG_VERSION"),
        ts: now_unix_seconds(),
    })
}

#[derive(Debug, Serialize)]
struct SetupGuide {
    register_url: &'static str,
    application_name: String,
    application_url: String,
    callback_url: String,
}

/// Values the operator needs when registering the OAuth application.
async fn setup_guide(State(state): State<AppState>) -> Json<SetupGuide> {
    let application_url = state.base().to_string();
    Json(SetupGuide {
        register_url: NEW_APPLICATION_URL,
        application_name: host_label(&application_url),
        application_url,
        callback_url: state.callback_url(),
    })
}

#[derive(Debug, Serialize)]
struct SettingsView {
    client_id: String,
    client_secret: String,
    access_token: String,
    authorized: bool,
}

async fn get_settings(State(state): State<AppState>) -> Result<Json<SettingsView>, AppError> {
    let credential = state.store.read()?;
    Ok(Json(SettingsView {
        client_id: credential.client_id.clone(),
        client_secret: mask_token(&credential.client_secret),
        access_token: mask_token(&credential.access_token),
        authorized: credential.is_authorized(),
    }))
}

#[derive(Debug, Deserialize)]
struct SettingsInput {
    client_id: String,
    client_secret: String,
    access_token: Option<String>,
}

/// Save the operator-supplied credentials, then hand the request off to the
/// authorization gate. An absent `access_token` keeps the stored one.
async fn post_settings(
    State(state): State<AppState>,
    Json(input): Json<SettingsInput>,
) -> Result<Redirect, AppError> {
    let stored = state.store.read()?;
    let credential = OAuthCredential {
        client_id: input.client_id.trim().to_string(),
        client_secret: input.client_secret.trim().to_string(),
        access_token: input
            .access_token
            .map(|v| v.trim().to_string())
            .unwrap_or(stored.access_token),
    };

    if !credential.has_client_pair() {
        tracing::warn!("client_id or client_secret is empty; authorization will not start");
    }

    state.store.write(&credential)?;
    Ok(Redirect::to("/oauth/authorize?settings-updated=true"))
}

/// Send the operator to GitHub for account authorization when the gate
/// allows it; otherwise do nothing.
async fn begin_authorization(
    State(state): State<AppState>,
    Query(trigger): Query<AuthorizeTrigger>,
) -> Result<Response, AppError> {
    let credential = state.store.read()?;
    if !should_begin_authorization(&trigger, &credential) {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let authorize_url = build_authorize_url(
        &state.endpoints,
        &credential.client_id,
        &state.callback_url(),
    )?;
    tracing::info!(client_id = %credential.client_id, "redirecting operator to github authorization");
    Ok(Redirect::to(&authorize_url).into_response())
}

#[derive(Debug, Deserialize)]
struct CallbackParams {
    code: Option<String>,
}

/// Exchange the one-time code and persist the access token.
///
/// Every failure path lands back on the settings view with
/// `authorize=false`; only a stored token redirects with `authorized=true`.
async fn oauth_callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Redirect {
    let settings_url = state.settings_url();
    let failure = format!("{settings_url}?authorize=false");

    let Some(code) = params.code.filter(|c| !c.trim().is_empty()) else {
        tracing::warn!("oauth callback arrived without a code; authorization was denied");
        return Redirect::to(&failure);
    };

    let credential = match state.store.read() {
        Ok(credential) => credential,
        Err(err) => {
            tracing::warn!("settings read failed during oauth callback: {err}");
            return Redirect::to(&failure);
        }
    };

    let request = TokenExchangeRequest {
        token_url: state.endpoints.token_url.clone(),
        client_id: credential.client_id.clone(),
        client_secret: credential.client_secret.clone(),
        code,
    };
    let access_token = match exchange_authorization_code(&state.client, &request).await {
        Ok(response) => response.access_token,
        Err(err) => {
            tracing::warn!("oauth token exchange failed: {err}");
            return Redirect::to(&failure);
        }
    };

    let authorized = OAuthCredential {
        access_token,
        ..credential
    };
    if let Err(err) = state.store.write(&authorized) {
        tracing::warn!("failed to persist access token: {err}");
        return Redirect::to(&failure);
    }

    tracing::info!(
        access_token = %mask_token(&authorized.access_token),
        "github authorization completed"
    );
    Redirect::to(&format!("{settings_url}?authorized=true"))
}

fn host_label(url: &str) -> String {
    url.trim_start_matches("https://")
        .trim_start_matches("http://")
        .to_string()
}

fn now_unix_seconds() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
