#![allow(clippy::unwrap_used)]
// Integration tests for `AdminClient` using wiremock.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use qradmin_api::{AdminClient, EnvelopeKey, Error, TextCodeRecord, UserRecord};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, AdminClient) {
    let server = MockServer::start().await;
    let client = AdminClient::with_client(reqwest::Client::new(), &server.uri()).unwrap();
    (server, client)
}

fn token() -> SecretString {
    SecretString::from("tok-123".to_string())
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_login_returns_token() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/admin/logIn"))
        .and(body_json(json!({ "email": "ops@example.com", "password": "hunter22" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "abc" })))
        .mount(&server)
        .await;

    let password = SecretString::from("hunter22".to_string());
    let token = client.login("ops@example.com", &password).await.unwrap();
    assert_eq!(token.expose_secret(), "abc");
}

#[tokio::test]
async fn test_login_failure_uses_server_message() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/admin/logIn"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid password" })),
        )
        .mount(&server)
        .await;

    let password = SecretString::from("wrong-password".to_string());
    let result = client.login("ops@example.com", &password).await;

    match result {
        Err(Error::Authentication { ref message }) => assert_eq!(message, "Invalid password"),
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_register_failure_without_message_is_generic() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/admin/register"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let password = SecretString::from("longenough".to_string());
    let result = client.register("ops@example.com", &password).await;

    match result {
        Err(Error::Authentication { ref message }) => assert_eq!(message, "Something went wrong"),
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_profile_requires_truthy_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/admin/get"))
        .and(header("x-admin-token", "tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": true,
            "data": {
                "email": "ops@example.com",
                "role": "admin",
                "createdAt": "2024-01-01T00:00:00Z",
                "updatedAt": "2024-02-01T00:00:00Z"
            }
        })))
        .mount(&server)
        .await;

    let profile = client.profile(&token()).await.unwrap();
    assert_eq!(profile.email, "ops@example.com");
    assert_eq!(profile.role, "admin");
}

#[tokio::test]
async fn test_profile_false_status_is_schema_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/admin/get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": false })))
        .mount(&server)
        .await;

    let result = client.profile(&token()).await;
    assert!(matches!(result, Err(Error::Schema { .. })), "got: {result:?}");
}

// ── Collection tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_users_sends_token_header() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/admin/user/getAll"))
        .and(header("x-admin-token", "tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": [
                { "_id": "u1", "name": "Asha", "email": "asha@example.com", "role": "user" },
                { "_id": "u2", "name": "Ben", "email": "ben@example.com", "role": "admin" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let url = client.endpoint("admin/user/getAll").unwrap();
    let users: Vec<UserRecord> = client
        .fetch_collection(url, &token(), EnvelopeKey::Message)
        .await
        .unwrap();

    assert_eq!(users.len(), 2);
    assert_eq!(users[1].role, "admin");
}

#[tokio::test]
async fn test_fetch_codes_with_filter_parameter() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/admin/user/qr/textFilter/u1"))
        .and(query_param("contentType", "link"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "_id": "1",
                "purpose": "test",
                "contentType": "link",
                "text": "http://x",
                "file": { "url": "http://y" },
                "createdAt": "2024-01-01T00:00:00Z"
            }]
        })))
        .mount(&server)
        .await;

    let url = Url::parse(&format!(
        "{}/admin/user/qr/textFilter/u1?contentType=link",
        server.uri()
    ))
    .unwrap();
    let codes: Vec<TextCodeRecord> = client
        .fetch_collection(url, &token(), EnvelopeKey::Data)
        .await
        .unwrap();

    assert_eq!(codes.len(), 1);
    assert_eq!(codes[0].text, "http://x");
}

#[tokio::test]
async fn test_fetch_status_error_carries_code() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let url = client.endpoint("admin/user/getAll").unwrap();
    let result: Result<Vec<UserRecord>, _> = client
        .fetch_collection(url, &token(), EnvelopeKey::Message)
        .await;

    let err = result.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert!(err.to_string().contains("500"), "got: {err}");
}

#[tokio::test]
async fn test_fetch_unauthorized_is_auth_rejected() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "jwt expired" })))
        .mount(&server)
        .await;

    let url = client.endpoint("admin/user/getAll").unwrap();
    let err = client
        .fetch_collection::<UserRecord>(url, &token(), EnvelopeKey::Message)
        .await
        .unwrap_err();

    assert!(err.is_auth_rejected());
    assert_eq!(err.to_string(), "jwt expired");
}

#[tokio::test]
async fn test_fetch_missing_envelope_is_schema_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
        .mount(&server)
        .await;

    let url = client.endpoint("admin/user/qr/fileFilter/u1").unwrap();
    let result = client
        .fetch_collection::<TextCodeRecord>(url, &token(), EnvelopeKey::Data)
        .await;

    assert!(matches!(result, Err(Error::Schema { .. })), "got: {result:?}");
}

// ── Asset tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_download_asset_is_anonymous() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/files/menu.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.7".to_vec()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(header_exists("x-admin-token"))
        .respond_with(ResponseTemplate::new(400))
        .with_priority(1)
        .mount(&server)
        .await;

    let url = Url::parse(&format!("{}/files/menu.pdf", server.uri())).unwrap();
    let bytes = client.download_asset(&url).await.unwrap();
    assert_eq!(bytes, b"%PDF-1.7");
}

#[tokio::test]
async fn test_download_asset_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let url = Url::parse(&format!("{}/files/gone.png", server.uri())).unwrap();
    let result = client.download_asset(&url).await;
    assert!(matches!(result, Err(Error::Asset { status: 404, .. })), "got: {result:?}");
}
