//! Shared harness: a temp-backed settings store, a stub token endpoint, and
//! a connector instance served on an ephemeral port.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::routing::post;
use axum::Router;
use tempfile::TempDir;

use github_oauth_connector::{
    build_router, AppState, FileSettingsStore, OAuthCredential, ProviderEndpoints, SettingsStore,
};

pub struct TestConnector {
    pub base_url: String,
    pub settings_path: PathBuf,
    pub store: Arc<FileSettingsStore>,
    _settings_dir: TempDir,
}

/// Serve `router` on an ephemeral localhost port, detached.
pub async fn spawn_server(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

/// A provider token endpoint that always answers `body`.
pub async fn spawn_token_endpoint(body: &'static str) -> String {
    let router = Router::new().route(
        "/login/oauth/access_token",
        post(move || async move { body }),
    );
    let addr = spawn_server(router).await;
    format!("http://{addr}/login/oauth/access_token")
}

/// A connector wired to `token_url`, with its settings in a fresh temp dir.
pub async fn spawn_connector(token_url: String) -> TestConnector {
    let settings_dir = TempDir::new().expect("settings dir");
    let settings_path = settings_dir.path().join("settings.json");
    let store = Arc::new(FileSettingsStore::new(settings_path.clone()));

    // Bind before building state so the public base URL carries the real port.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    let base_url = format!("http://{addr}");

    let state = AppState {
        store: store.clone(),
        client: reqwest::Client::new(),
        endpoints: ProviderEndpoints {
            authorize_url: "https://github.com/login/oauth/authorize".to_string(),
            token_url,
        },
        public_base_url: base_url.clone(),
    };
    let router = build_router(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    TestConnector {
        base_url,
        settings_path,
        store,
        _settings_dir: settings_dir,
    }
}

/// Client that surfaces redirects instead of following them.
pub fn no_redirect_client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("client")
}

pub fn seed_credentials(store: &FileSettingsStore, client_id: &str, client_secret: &str) {
    store
        .write(&OAuthCredential {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            access_token: String::new(),
        })
        .expect("seed credentials");
}

pub fn location_of(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .expect("location header")
        .to_str()
        .expect("location utf-8")
        .to_string()
}
