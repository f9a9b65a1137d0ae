#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use clientbook_api::{
    Anonymous, ApiClient, ClientQuery, ClientRequest, CredentialSource, Error, StaticToken,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup_with(credentials: Arc<dyn CredentialSource>) -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let base = format!("{}/api", server.uri());
    let client = ApiClient::with_client(reqwest::Client::new(), &base, credentials).unwrap();
    (server, client)
}

async fn setup() -> (MockServer, ApiClient) {
    setup_with(Arc::new(StaticToken::new("t0k"))).await
}

fn client_json(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "nombre": "Ana",
        "apellidos": "Mora",
        "identificacion": "1-1111-1111",
        "telefonoCelular": "8888-0000",
        "direccion": "San José",
        "fNacimiento": "1990-04-01",
        "fAfiliacion": "2020-01-15",
        "sexo": "F",
        "resenaPersonal": "",
        "interesFK": "3"
    })
}

fn request() -> ClientRequest {
    ClientRequest {
        nombre: "Ana".into(),
        apellidos: "Mora".into(),
        identificacion: "1-1111-1111".into(),
        telefono_celular: "8888-0000".into(),
        otro_telefono: None,
        direccion: "San José".into(),
        f_nacimiento: "1990-04-01".into(),
        f_afiliacion: "2020-01-15".into(),
        sexo: "F".into(),
        resena_personal: String::new(),
        imagen: None,
        interes_fk: Some("3".into()),
        usuario_id: Some("u-1".into()),
    }
}

// ── Credentials ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_bearer_header_attached() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/interests"))
        .and(header("Authorization", "Bearer t0k"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let interests = client.list_interests().await.unwrap();
    assert!(interests.is_empty());
}

#[tokio::test]
async fn test_anonymous_sends_no_authorization() {
    let (server, client) = setup_with(Arc::new(Anonymous)).await;

    Mock::given(method("GET"))
        .and(path("/api/interests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    client.list_interests().await.unwrap();

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert!(!received[0].headers.contains_key("authorization"));
}

// ── Clients ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_clients_with_filters() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/clients"))
        .and(query_param("nombre", "an"))
        .and(query_param("usuarioId", "u-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "b2", "nombre": "Ana", "apellidos": "Mora", "identificacion": "1" },
            { "id": "a1", "nombre": "Juan", "apellidos": "Solano", "identificacion": "2" }
        ])))
        .mount(&server)
        .await;

    let query = ClientQuery {
        nombre: Some("an".into()),
        identificacion: None,
        usuario_id: Some("u-1".into()),
    };
    let rows = client.list_clients(&query).await.unwrap();

    // Server order is preserved.
    assert_eq!(
        rows.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(),
        vec!["b2", "a1"]
    );
}

#[tokio::test]
async fn test_get_client_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/clients/does-not-exist"))
        .respond_with(ResponseTemplate::new(404).set_body_string("client not found"))
        .mount(&server)
        .await;

    let err = client.get_client("does-not-exist").await.unwrap_err();
    assert!(err.is_not_found(), "expected 404, got: {err:?}");
    match err {
        Error::Api { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body, "client not found");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_client_id_stays_in_its_segment() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/clients/a%2Fb"))
        .respond_with(ResponseTemplate::new(200).set_body_json(client_json("a/b")))
        .expect(1)
        .mount(&server)
        .await;

    let fetched = client.get_client("a/b").await.unwrap();
    assert_eq!(fetched.id, "a/b");
}

#[tokio::test]
async fn test_create_client_sends_no_id() {
    let (server, client) = setup().await;

    let expected_body = json!({
        "nombre": "Ana",
        "apellidos": "Mora",
        "identificacion": "1-1111-1111",
        "telefonoCelular": "8888-0000",
        "direccion": "San José",
        "fNacimiento": "1990-04-01",
        "fAfiliacion": "2020-01-15",
        "sexo": "F",
        "resenaPersonal": "",
        "interesFK": "3",
        "usuarioId": "u-1"
    });

    Mock::given(method("POST"))
        .and(path("/api/clients"))
        .and(body_json(&expected_body))
        .respond_with(ResponseTemplate::new(201).set_body_json(client_json("new-1")))
        .expect(1)
        .mount(&server)
        .await;

    let created = client.create_client(&request()).await.unwrap();
    assert_eq!(created.id, "new-1");
    assert_eq!(created.interes_fk.as_deref(), Some("3"));
}

#[tokio::test]
async fn test_update_client_conflict() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/clients/a1"))
        .respond_with(ResponseTemplate::new(409).set_body_string("duplicate identificacion"))
        .mount(&server)
        .await;

    let err = client.update_client("a1", &request()).await.unwrap_err();
    assert!(err.is_conflict(), "expected 409, got: {err:?}");
}

#[tokio::test]
async fn test_delete_client_no_content() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/clients/a1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.delete_client("a1").await.unwrap();
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/clients/a1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client.get_client("a1").await.unwrap_err();
    match err {
        Error::Deserialization { body, .. } => assert_eq!(body, "<html>oops</html>"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    // Grab a free port, then release it so nothing is listening.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    let base = format!("http://127.0.0.1:{port}/api");

    let client =
        ApiClient::with_client(reqwest::Client::new(), &base, Arc::new(Anonymous)).unwrap();
    let err = client.list_interests().await.unwrap_err();
    assert!(err.is_transport(), "expected transport error, got: {err:?}");
    assert_eq!(err.status(), None);
}

// ── Auth ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_returns_grant() {
    let (server, client) = setup_with(Arc::new(Anonymous)).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "username": "admin", "password": "secret" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "t0k",
            "userId": "u-1",
            "displayName": "Admin"
        })))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "secret".to_string().into();
    let grant = client.login("admin", &secret).await.unwrap();
    assert_eq!(grant.token, "t0k");
    assert_eq!(grant.user_id, "u-1");
    assert_eq!(grant.display_name.as_deref(), Some("Admin"));
}

#[tokio::test]
async fn test_login_rejected() {
    let (server, client) = setup_with(Arc::new(Anonymous)).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "wrong".to_string().into();
    let err = client.login("admin", &secret).await.unwrap_err();
    assert!(err.is_unauthorized());
}
