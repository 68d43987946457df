//! Mock server helpers for release hosts and asset downloads

use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::constants::*;

fn releases_path() -> String {
    format!("/repos/{}/{}/releases", OWNER, REPO)
}

fn tag_path(tag: &str) -> String {
    format!("/repos/{}/{}/releases/tags/{}", OWNER, REPO, tag)
}

/// Serve `releases` (a JSON array) from the release listing endpoint
pub async fn mock_release_list(server: &MockServer, releases: Value) {
    Mock::given(method("GET"))
        .and(path(releases_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(releases))
        .mount(server)
        .await;
}

/// Fail the release listing endpoint with `status`
pub async fn mock_release_list_status(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path(releases_path()))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Serve one release from the by-tag endpoint
pub async fn mock_release_by_tag(server: &MockServer, tag: &str, release: Value) {
    Mock::given(method("GET"))
        .and(path(tag_path(tag)))
        .respond_with(ResponseTemplate::new(200).set_body_json(release))
        .mount(server)
        .await;
}

/// Answer the by-tag endpoint for `tag` with 404
pub async fn mock_tag_not_found(server: &MockServer, tag: &str) {
    Mock::given(method("GET"))
        .and(path(tag_path(tag)))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(serde_json::json!({"message": "Not Found"})),
        )
        .mount(server)
        .await;
}

/// Serve `content` at `/download/<name>` and return its full URL
pub async fn mock_asset(server: &MockServer, name: &str, content: &[u8]) -> String {
    let asset_path = format!("/download/{}", name);
    Mock::given(method("GET"))
        .and(path(asset_path.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(content.to_vec()))
        .mount(server)
        .await;
    format!("{}{}", server.uri(), asset_path)
}

/// Serve an asset that must never be requested
pub async fn mock_asset_never_fetched(server: &MockServer, name: &str) -> String {
    let asset_path = format!("/download/{}", name);
    Mock::given(method("GET"))
        .and(path(asset_path.clone()))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(server)
        .await;
    format!("{}{}", server.uri(), asset_path)
}

/// Answer `/download/<name>` with `status` and return its URL
pub async fn mock_asset_status(server: &MockServer, name: &str, status: u16) -> String {
    let asset_path = format!("/download/{}", name);
    Mock::given(method("GET"))
        .and(path(asset_path.clone()))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
    format!("{}{}", server.uri(), asset_path)
}
