//! Usage: HTTP surface for the connector (shared state, routes, listener).

pub(crate) mod listen;
pub(crate) mod routes;

use crate::infra::settings::SettingsStore;
use crate::oauth::provider::ProviderEndpoints;
use std::sync::Arc;

/// Shared handler state. Every collaborator is injected at startup; there is
/// no process-wide connector instance.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SettingsStore>,
    pub client: reqwest::Client,
    pub endpoints: ProviderEndpoints,
    /// Externally reachable base URL; callback and settings URLs derive from it.
    pub public_base_url: String,
}

impl AppState {
    pub(crate) fn callback_url(&self) -> String {
        format!("{}/oauth/callback", self.base())
    }

    pub(crate) fn settings_url(&self) -> String {
        format!("{}/settings", self.base())
    }

    pub(crate) fn base(&self) -> &str {
        self.public_base_url.trim_end_matches('/')
    }
}
