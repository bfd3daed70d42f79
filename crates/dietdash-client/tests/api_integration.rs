//! Integration tests for the encrypted API client against a mock server.
//!
//! Each test stands up a local mock, seals response bodies with the same
//! passphrase the client holds, and checks the wire contract: bearer
//! attachment, excluded routes, envelope decryption, and the error taxonomy.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use dietdash_client::{ApiClient, ApiConfig, ApiError, FilePart, Meal};
use dietdash_core::envelope::{self, EnvelopeKey};
use dietdash_core::session::{Session, SessionStore};
use dietdash_table::{SortOrder, SortSpec, TableQuery};
use mockito::Matcher;

const SECRET: &str = "MyWork@123@#";

fn key() -> EnvelopeKey {
    EnvelopeKey::derive(SECRET).unwrap()
}

fn seal(value: &serde_json::Value) -> String {
    envelope::seal_json(&key(), value).unwrap()
}

fn client_for(server: &mockito::ServerGuard) -> ApiClient {
    ApiClient::with_config(
        ApiConfig {
            base_url: server.url(),
            secret_key: SECRET.to_owned(),
            ..ApiConfig::default()
        },
        SessionStore::new(),
    )
    .unwrap()
}

async fn log_in(client: &ApiClient) {
    client
        .session()
        .set(Session::new(
            "tok-123".to_owned(),
            "u1".to_owned(),
            "Admin".to_owned(),
        ))
        .await;
}

fn auth_response() -> serde_json::Value {
    serde_json::json!({
        "token": "tok-from-server",
        "user": {
            "_id": "u42",
            "username": "jdoe",
            "email": "j@d.com",
            "role": "Patient",
        },
        "message": "Login successful",
    })
}

fn meals_page() -> serde_json::Value {
    serde_json::json!({
        "data": [{
            "_id": "m1",
            "name": "Vegan Salad Bowl",
            "category": "lunch",
            "dietaryTags": ["vegan", "low-carb"],
            "calories": 350.0,
            "proteins": 12.0,
            "carbs": 25.0,
            "fats": 10.0,
            "ingredients": ["Lettuce", "Tomato", "Avocado"],
        }],
        "total": 1,
    })
}

// ── Login and session ────────────────────────────────────────────────

#[tokio::test]
async fn login_goes_out_unauthenticated_and_establishes_a_session() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/user/login")
        .match_header("authorization", Matcher::Missing)
        .match_body(Matcher::Regex("payload".to_owned()))
        .with_status(200)
        .with_body(seal(&auth_response()))
        .create_async()
        .await;

    let client = client_for(&server);
    // A stale session must not leak onto the login request.
    log_in(&client).await;

    let auth = client.login("j@d.com", "hunter22").await.unwrap();
    mock.assert_async().await;

    assert_eq!(auth.token, "tok-from-server");
    assert_eq!(auth.user.id, "u42");
    assert_eq!(auth.message, "Login successful");

    let session = client.session().get().await.unwrap();
    assert_eq!(session.token, "tok-from-server");
    assert_eq!(session.user_id, "u42");
    assert_eq!(session.role, "Patient");
}

#[tokio::test]
async fn logout_clears_the_session() {
    let server = mockito::Server::new_async().await;
    let client = client_for(&server);
    log_in(&client).await;
    assert!(client.session().is_authenticated().await);

    client.logout().await;
    assert!(!client.session().is_authenticated().await);
}

// ── Bearer attachment ────────────────────────────────────────────────

#[tokio::test]
async fn bearer_token_is_attached_to_authenticated_routes() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/user/getmeal")
        .match_query(Matcher::Any)
        .match_header("authorization", "Bearer tok-123")
        .with_status(200)
        .with_body(seal(&meals_page()))
        .create_async()
        .await;

    let client = client_for(&server);
    log_in(&client).await;

    let page = client.get_meals(&TableQuery::default()).await.unwrap();
    mock.assert_async().await;

    assert_eq!(page.total, 1);
    assert_eq!(page.data[0].name, "Vegan Salad Bowl");
}

#[tokio::test]
async fn add_user_is_excluded_even_with_a_live_session() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/user/add-user")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body(seal(&serde_json::json!({ "status": true, "message": "created" })))
        .create_async()
        .await;

    let client = client_for(&server);
    log_in(&client).await;

    let outcome = client
        .add_user(&dietdash_client::NewUser::new("a@b.com", "pw123456"))
        .await
        .unwrap();
    mock.assert_async().await;

    assert!(outcome.status);
    assert_eq!(outcome.message.as_deref(), Some("created"));
}

// ── Envelope handling ────────────────────────────────────────────────

#[tokio::test]
async fn response_envelope_sent_as_json_string_literal_is_accepted() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/user/getmeal")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(serde_json::to_string(&seal(&meals_page())).unwrap())
        .create_async()
        .await;

    let client = client_for(&server);
    log_in(&client).await;

    let page = client.get_meals(&TableQuery::default()).await.unwrap();
    assert_eq!(page.data.len(), 1);
}

#[tokio::test]
async fn undecodable_success_body_is_a_decode_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/user/getmeal")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("this is not an envelope")
        .create_async()
        .await;

    let client = client_for(&server);
    log_in(&client).await;

    let result: Result<dietdash_client::Paginated<Meal>, _> =
        client.get_meals(&TableQuery::default()).await;
    assert!(matches!(result, Err(ApiError::Decode(_))));
}

// ── Error taxonomy ───────────────────────────────────────────────────

#[tokio::test]
async fn sealed_error_body_is_decrypted_into_the_message() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/user/login")
        .with_status(401)
        .with_body(envelope::seal_str(&key(), "Invalid credentials").unwrap())
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client.login("j@d.com", "wrong").await.unwrap_err();
    match err {
        ApiError::Http { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid credentials");
        }
        other => panic!("expected Http error, got {other:?}"),
    }
    // A failed login leaves the session store untouched.
    assert!(!client.session().is_authenticated().await);
}

#[tokio::test]
async fn plain_error_body_falls_back_to_raw_text() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/user/getmeal")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let client = client_for(&server);
    log_in(&client).await;

    let err = client
        .get_meals(&TableQuery::default())
        .await
        .unwrap_err();
    match err {
        ApiError::Http { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("expected Http error, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_error_body_reports_the_status() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/user/getmeal")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let client = client_for(&server);
    log_in(&client).await;

    let err = client
        .get_meals(&TableQuery::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ApiError::Http { status: 503, ref message } if message == "HTTP 503"
    ));
    assert!(err.status() == Some(503));
    assert!(!err.is_auth_error());
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let client = ApiClient::with_config(
        ApiConfig {
            base_url: "http://127.0.0.1:1".to_owned(),
            secret_key: SECRET.to_owned(),
            ..ApiConfig::default()
        },
        SessionStore::new(),
    )
    .unwrap();

    let err = client
        .get_meals(&TableQuery::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
    assert_eq!(err.to_string(), "no response from server");
}

// ── Query and path parameters ────────────────────────────────────────

#[tokio::test]
async fn bmi_logs_sends_the_table_view_state_as_parameters() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/user/bmi-logs/u42")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".to_owned(), "2".to_owned()),
            Matcher::UrlEncoded("limit".to_owned(), "5".to_owned()),
            Matcher::UrlEncoded("search".to_owned(), "70".to_owned()),
            Matcher::UrlEncoded("sortBy".to_owned(), "weight".to_owned()),
            Matcher::UrlEncoded("order".to_owned(), "desc".to_owned()),
        ]))
        .with_status(200)
        .with_body(seal(&serde_json::json!({
            "status": true,
            "message": "ok",
            "data": [{
                "_id": "b1",
                "weight": 70.0,
                "height": 175.0,
                "bmi": 22.86,
                "createdAt": "2024-05-01T10:00:00Z",
            }],
            "total": 12,
        })))
        .create_async()
        .await;

    let client = client_for(&server);
    log_in(&client).await;

    let query = TableQuery {
        page: 2,
        limit: 5,
        search: "70".to_owned(),
        sort: Some(SortSpec {
            key: "weight".to_owned(),
            order: SortOrder::Desc,
        }),
    };
    let page = client.bmi_logs("u42", &query).await.unwrap();
    mock.assert_async().await;

    assert!(page.status);
    assert_eq!(page.total, 12);
    assert_eq!(page.data[0].bmi, 22.86);
}

#[tokio::test]
async fn soft_delete_toggle_travels_in_the_path() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/user/delete-user/u42/true")
        .match_header("authorization", "Bearer tok-123")
        .with_status(200)
        .with_body(seal(&serde_json::json!({ "status": true })))
        .create_async()
        .await;

    let client = client_for(&server);
    log_in(&client).await;

    let outcome = client.set_user_deleted("u42", true).await.unwrap();
    mock.assert_async().await;
    assert!(outcome.status);
}

// ── Multipart ────────────────────────────────────────────────────────

#[tokio::test]
async fn multipart_registration_is_sent_as_a_form() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/user/add-user")
        .match_header(
            "content-type",
            Matcher::Regex("multipart/form-data.*".to_owned()),
        )
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body(seal(&serde_json::json!({ "status": true })))
        .create_async()
        .await;

    let client = client_for(&server);
    let outcome = client
        .add_user_with_picture(
            &dietdash_client::NewUser::new("a@b.com", "pw123456"),
            FilePart {
                file_name: "me.png".to_owned(),
                content_type: "image/png".to_owned(),
                bytes: vec![0x89, b'P', b'N', b'G'],
            },
        )
        .await
        .unwrap();
    mock.assert_async().await;
    assert!(outcome.status);
}

// ── Mutations with field errors ──────────────────────────────────────

#[tokio::test]
async fn server_field_errors_come_back_in_the_outcome() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/user/update-user")
        .with_status(200)
        .with_body(seal(&serde_json::json!({
            "status": false,
            "errors": [{ "path": "email", "msg": "already taken" }],
        })))
        .create_async()
        .await;

    let client = client_for(&server);
    log_in(&client).await;

    let outcome = client
        .update_user(&dietdash_client::UserUpdate {
            user_id: "u42".to_owned(),
            email: "a@b.com".to_owned(),
            password: None,
            role: "User".to_owned(),
            id: "u1".to_owned(),
        })
        .await
        .unwrap();

    assert!(!outcome.status);
    let errors = outcome.errors.unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].path, "email");
    assert_eq!(errors[0].msg, "already taken");
}

// ── Multipart form sealing is visible to the server ──────────────────

#[tokio::test]
async fn form_file_bytes_arrive_raw() {
    // Per-field sealing is unit-tested in the form module; here we check
    // the file part crosses the wire byte-for-byte while the form still
    // carries its field names.
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/user/add-user")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("profilePicture".to_owned()),
            Matcher::Regex("PNG-raw-bytes".to_owned()),
        ]))
        .with_status(200)
        .with_body(seal(&serde_json::json!({ "status": true })))
        .create_async()
        .await;

    let client = client_for(&server);
    client
        .add_user_with_picture(
            &dietdash_client::NewUser::new("plaintext-email@b.com", "pw123456"),
            FilePart {
                file_name: "me.png".to_owned(),
                content_type: "image/png".to_owned(),
                bytes: b"PNG-raw-bytes".to_vec(),
            },
        )
        .await
        .unwrap();
    mock.assert_async().await;
}
