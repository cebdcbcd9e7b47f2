//! Settings API round trips: persistence, masking, and the save-then-
//! authorize hand-off. Plus the setup-guide and health endpoints.

mod support;

use github_oauth_connector::{OAuthCredential, SettingsStore};
use support::{location_of, no_redirect_client, spawn_connector, spawn_token_endpoint};

async fn post_settings(
    client: &reqwest::Client,
    base_url: &str,
    body: serde_json::Value,
) -> reqwest::Response {
    client
        .post(format!("{base_url}/settings"))
        .header("content-type", "application/json")
        .body(body.to_string())
        .send()
        .await
        .expect("post settings")
}

#[tokio::test]
async fn settings_round_trip_masks_secrets() {
    let token_url = spawn_token_endpoint("access_token=unused").await;
    let connector = spawn_connector(token_url).await;
    let client = no_redirect_client();

    let response = post_settings(
        &client,
        &connector.base_url,
        serde_json::json!({
            "client_id": "id-123",
            "client_secret": "super-secret-value",
            "access_token": "gho_1234567890abcdef",
        }),
    )
    .await;
    assert_eq!(response.status(), reqwest::StatusCode::SEE_OTHER);
    assert_eq!(
        location_of(&response),
        "/oauth/authorize?settings-updated=true"
    );

    let body = client
        .get(format!("{}/settings", connector.base_url))
        .send()
        .await
        .expect("get settings")
        .text()
        .await
        .expect("settings body");
    let view: serde_json::Value = serde_json::from_str(&body).expect("settings json");

    assert_eq!(view["client_id"], "id-123");
    assert_eq!(view["client_secret"], "super-...alue");
    assert_eq!(view["access_token"], "gho_12...cdef");
    assert_eq!(view["authorized"], true);
    assert!(!body.contains("super-secret-value"));

    // On disk the record keeps the raw values, field for field.
    let raw = std::fs::read_to_string(&connector.settings_path).expect("settings file");
    let stored: OAuthCredential = serde_json::from_str(&raw).expect("stored record");
    assert_eq!(
        stored,
        OAuthCredential {
            client_id: "id-123".to_string(),
            client_secret: "super-secret-value".to_string(),
            access_token: "gho_1234567890abcdef".to_string(),
        }
    );
}

#[tokio::test]
async fn settings_post_preserves_stored_token_when_absent() {
    let token_url = spawn_token_endpoint("access_token=unused").await;
    let connector = spawn_connector(token_url).await;
    connector
        .store
        .write(&OAuthCredential {
            client_id: "old-id".to_string(),
            client_secret: "old-secret".to_string(),
            access_token: "tok-keep".to_string(),
        })
        .expect("seed record");

    post_settings(
        &no_redirect_client(),
        &connector.base_url,
        serde_json::json!({
            "client_id": "new-id",
            "client_secret": "new-secret",
        }),
    )
    .await;

    let credential = connector.store.read().expect("read");
    assert_eq!(credential.client_id, "new-id");
    assert_eq!(credential.client_secret, "new-secret");
    assert_eq!(credential.access_token, "tok-keep");
}

#[tokio::test]
async fn settings_get_on_fresh_install_is_empty() {
    let token_url = spawn_token_endpoint("access_token=unused").await;
    let connector = spawn_connector(token_url).await;

    let body = no_redirect_client()
        .get(format!("{}/settings", connector.base_url))
        .send()
        .await
        .expect("get settings")
        .text()
        .await
        .expect("settings body");
    let view: serde_json::Value = serde_json::from_str(&body).expect("settings json");

    assert_eq!(view["client_id"], "");
    assert_eq!(view["client_secret"], "");
    assert_eq!(view["access_token"], "");
    assert_eq!(view["authorized"], false);
}

#[tokio::test]
async fn setup_guide_reflects_public_base_url() {
    let token_url = spawn_token_endpoint("access_token=unused").await;
    let connector = spawn_connector(token_url).await;

    let body = no_redirect_client()
        .get(format!("{}/setup", connector.base_url))
        .send()
        .await
        .expect("get setup")
        .text()
        .await
        .expect("setup body");
    let guide: serde_json::Value = serde_json::from_str(&body).expect("setup json");

    assert_eq!(
        guide["register_url"],
        "https://github.com/settings/applications/new"
    );
    assert_eq!(guide["application_url"], connector.base_url.as_str());
    assert_eq!(
        guide["callback_url"],
        format!("{}/oauth/callback", connector.base_url)
    );
    assert_eq!(
        guide["application_name"],
        connector.base_url.trim_start_matches("http://")
    );
}

#[tokio::test]
async fn health_reports_ok() {
    let token_url = spawn_token_endpoint("access_token=unused").await;
    let connector = spawn_connector(token_url).await;

    let response = no_redirect_client()
        .get(format!("{}/healthz", connector.base_url))
        .send()
        .await
        .expect("get healthz");
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let body = response.text().await.expect("health body");
    let health: serde_json::Value = serde_json::from_str(&body).expect("health json");
    assert_eq!(health["status"], "ok");
    assert_eq!(health["app"], "github-oauth-connector");
}
