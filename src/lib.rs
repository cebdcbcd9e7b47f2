//! Usage: GitHub OAuth connector — stores an OAuth application's client
//! credentials and runs the authorization-code exchange that fetches the
//! access token a separate update mechanism consumes.

mod app;
mod domain;
mod infra;
mod oauth;
mod server;
mod shared;

pub use app::config::AppConfig;
pub use domain::credential::OAuthCredential;
pub use infra::settings::{FileSettingsStore, SettingsStore};
pub use oauth::provider::ProviderEndpoints;
pub use oauth::token_exchange::oauth_http_client;
pub use server::routes::build_router;
pub use server::AppState;
pub use shared::error::{AppError, AppResult};

use std::sync::Arc;

/// Wire the collaborators described by `config` and serve until shutdown.
pub async fn run(config: AppConfig) -> AppResult<()> {
    let _log_guard = app::logging::init(config.log_dir.as_deref())?;

    let client = oauth_http_client(config.insecure_skip_tls_verify)?;
    let store: Arc<dyn SettingsStore> =
        Arc::new(FileSettingsStore::new(config.settings_path.clone()));

    let state = AppState {
        store,
        client,
        endpoints: ProviderEndpoints {
            authorize_url: config.authorize_url.clone(),
            token_url: config.token_url.clone(),
        },
        public_base_url: config.public_base_url.clone(),
    };

    server::listen::serve(build_router(state), &config.listen_addr).await
}
