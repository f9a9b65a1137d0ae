#![allow(clippy::unwrap_used)]
// Integration tests for `ClientStore` and the entity services, driven
// against a wiremock server through the real transport adapter.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use clientbook_core::{
    ApiConfig, AuthService, ClientDraft, ClientFilters, ClientService, ClientStore, CoreError,
    EntityId, Gender, RefreshOutcome, SessionContext, SessionGrant, StorePhase,
};

// ── Helpers ─────────────────────────────────────────────────────────

struct Harness {
    server: MockServer,
    session: SessionContext,
    store: ClientStore,
    clients: ClientService,
}

async fn setup_with(session: SessionContext) -> Harness {
    let server = MockServer::start().await;
    let api = ApiConfig::from_url_str(&format!("{}/api", server.uri()))
        .unwrap()
        .build_client(Arc::new(session.clone()))
        .unwrap();
    let api = Arc::new(api);
    Harness {
        store: ClientStore::from_api(Arc::clone(&api), session.clone()),
        clients: ClientService::new(api, session.clone()),
        server,
        session,
    }
}

async fn setup() -> Harness {
    let session = SessionContext::new();
    session.begin(SessionGrant {
        token: SecretString::from("t0k".to_owned()),
        user_id: "u-1".into(),
        display_name: Some("Ana".into()),
    });
    setup_with(session).await
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn draft() -> ClientDraft {
    ClientDraft {
        given_name: "Ana".into(),
        family_name: "Mora".into(),
        identification: "1-1111-1111".into(),
        mobile_phone: "8888-0000".into(),
        other_phone: None,
        address: "San José".into(),
        birth_date: date(1990, 4, 1),
        affiliation_date: date(2020, 1, 15),
        gender: Gender::Female,
        personal_note: String::new(),
        image: None,
        interest_id: Some(EntityId::new("3")),
    }
}

fn client_json(id: &str) -> Value {
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
        "interesFK": "3",
        "usuarioId": "u-1"
    })
}

fn row(id: &str, name: &str) -> Value {
    json!({ "id": id, "identificacion": format!("id-{id}"), "nombre": name, "apellidos": "X" })
}

async fn mount_list(server: &MockServer, rows: Value) {
    Mock::given(method("GET"))
        .and(path("/api/clients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rows))
        .mount(server)
        .await;
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.unwrap().len()
}

fn ids(store: &ClientStore) -> Vec<String> {
    store
        .snapshot()
        .entities
        .iter()
        .map(|c| c.id.to_string())
        .collect()
}

// ── Refresh ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_refresh_applies_rows_in_server_order() {
    let h = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/clients"))
        .and(query_param("usuarioId", "u-1"))
        .and(header("Authorization", "Bearer t0k"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([row("b", "Beto"), row("a", "Ana")])),
        )
        .expect(1)
        .mount(&h.server)
        .await;

    let outcome = h.store.refresh(None).await;
    assert_eq!(outcome, RefreshOutcome::Applied { count: 2 });

    let state = h.store.snapshot();
    assert_eq!(ids(&h.store), vec!["b", "a"]);
    assert!(!state.loading);
    assert_eq!(state.phase, StorePhase::Idle);
    assert_eq!(state.error, None);
}

#[tokio::test]
async fn test_refresh_failure_is_recorded_not_raised() {
    let h = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/clients"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&h.server)
        .await;

    let outcome = h.store.refresh(None).await;
    let expected = CoreError::Api {
        status: 500,
        body: "boom".into(),
    };
    assert_eq!(outcome, RefreshOutcome::Failed(expected.clone()));

    let state = h.store.snapshot();
    assert_eq!(state.error, Some(expected));
    assert!(!state.loading);
    assert!(state.entities.is_empty());

    h.store.clear_error();
    assert_eq!(h.store.snapshot().error, None);
}

#[tokio::test]
async fn test_blank_filters_send_same_request_as_none() {
    let h = setup().await;
    mount_list(&h.server, json!([])).await;

    let blank = ClientFilters::default()
        .with_name("  ")
        .with_identification("");
    h.store.refresh(Some(&blank)).await;
    h.store.refresh(None).await;

    let requests = h.server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].url, requests[1].url);
    assert_eq!(requests[0].url.query(), Some("usuarioId=u-1"));
}

#[tokio::test]
async fn test_filters_reach_query_string() {
    let h = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/clients"))
        .and(query_param("nombre", "ana"))
        .and(query_param("identificacion", "1-11"))
        .and(query_param("usuarioId", "u-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([row("a", "Ana")])))
        .expect(1)
        .mount(&h.server)
        .await;

    let filters = ClientFilters::default()
        .with_name(" ana ")
        .with_identification("1-11");
    let outcome = h.store.refresh(Some(&filters)).await;
    assert_eq!(outcome, RefreshOutcome::Applied { count: 1 });
    assert_eq!(h.store.last_filters(), Some(filters.normalized()));
}

#[tokio::test]
async fn test_stale_refresh_is_discarded() {
    let h = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/clients"))
        .and(query_param("nombre", "slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([row("old", "Old")]))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/clients"))
        .and(query_param("nombre", "fast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([row("new", "New")])))
        .mount(&h.server)
        .await;

    let slow = ClientFilters::default().with_name("slow");
    let fast = ClientFilters::default().with_name("fast");
    let (first, second) = tokio::join!(h.store.refresh(Some(&slow)), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        h.store.refresh(Some(&fast)).await
    });

    assert_eq!(first, RefreshOutcome::Discarded);
    assert_eq!(second, RefreshOutcome::Applied { count: 1 });
    assert_eq!(ids(&h.store), vec!["new"]);
    assert!(!h.store.snapshot().loading);
}

#[tokio::test]
async fn test_list_without_session_user_is_not_authenticated() {
    let h = setup_with(SessionContext::new()).await;

    let outcome = h.store.refresh(None).await;
    assert!(matches!(
        outcome,
        RefreshOutcome::Failed(CoreError::NotAuthenticated { .. })
    ));
    assert_eq!(request_count(&h.server).await, 0);
}

#[tokio::test]
async fn test_subscription_sees_applied_refresh() {
    let h = setup().await;
    mount_list(&h.server, json!([row("a", "Ana")])).await;

    let mut sub = h.store.subscribe();
    assert!(sub.current().entities.is_empty());

    h.store.refresh(None).await;
    let latest = sub.changed().await.unwrap();
    assert!(latest.loading || latest.entities.len() == 1);
    assert_eq!(sub.latest().entities.len(), 1);
}

#[tokio::test]
async fn test_stream_settles_on_idle_state() {
    use futures_util::StreamExt;

    let h = setup().await;
    mount_list(&h.server, json!([row("a", "Ana"), row("b", "Luis")])).await;

    let mut stream = h.store.subscribe().into_stream();
    h.store.refresh(None).await;

    let settled = tokio::time::timeout(Duration::from_secs(2), async {
        while let Some(state) = stream.next().await {
            if !state.loading && state.entities.len() == 2 {
                return Some(state);
            }
        }
        None
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(settled.phase, StorePhase::Idle);
    assert!(settled.error.is_none());
}

// ── Create ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_sends_no_id_then_refreshes() {
    let h = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/clients"))
        .respond_with(ResponseTemplate::new(201).set_body_json(client_json("c9")))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/clients/c9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(client_json("c9")))
        .mount(&h.server)
        .await;
    mount_list(&h.server, json!([row("c9", "Ana")])).await;

    let created = h.store.create(draft()).await.unwrap();
    assert_eq!(created.id.as_str(), "c9");
    assert_eq!(ids(&h.store), vec!["c9"]);

    let requests = h.server.received_requests().await.unwrap();
    let post = requests.iter().find(|r| r.method.as_str() == "POST").unwrap();
    let body: Value = post.body_json().unwrap();
    assert!(body.get("id").is_none());
    assert!(body.get("otroTelefono").is_none());
    assert_eq!(body["usuarioId"], json!("u-1"));
    assert_eq!(body["fNacimiento"], json!("1990-04-01"));
    assert!(requests.iter().any(|r| r.method.as_str() == "GET"));

    let fetched = h.store.get_by_id(&created.id).await.unwrap();
    assert_eq!(fetched.to_draft(), draft());
    assert_eq!(fetched.other_phone, None);
}

#[tokio::test]
async fn test_create_with_empty_given_name_never_reaches_network() {
    let h = setup().await;

    let mut bad = draft();
    bad.given_name = "  ".into();
    let err = h.store.create(bad).await.unwrap_err();

    assert!(matches!(err, CoreError::Validation { ref field, .. } if field == "given_name"));
    assert_eq!(h.store.snapshot().error, Some(err));
    assert!(!h.store.snapshot().loading);
    assert_eq!(request_count(&h.server).await, 0);
}

#[tokio::test]
async fn test_create_duplicate_identification_surfaces_conflict() {
    let h = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/clients"))
        .respond_with(ResponseTemplate::new(409).set_body_string("identificacion duplicada"))
        .mount(&h.server)
        .await;

    let err = h.store.create(draft()).await.unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(h.store.snapshot().error, Some(err));
}

#[tokio::test]
async fn test_failed_refresh_after_create_keeps_write_successful() {
    let h = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/clients"))
        .respond_with(ResponseTemplate::new(201).set_body_json(client_json("c1")))
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/clients"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&h.server)
        .await;

    let created = h.store.create(draft()).await.unwrap();
    assert_eq!(created.id.as_str(), "c1");

    let state = h.store.snapshot();
    assert_eq!(state.error.and_then(|e| e.status()), Some(503));
    assert!(!state.loading);
    assert_eq!(state.phase, StorePhase::Idle);
}

// ── Update ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_update_addresses_path_and_refreshes_with_last_filters() {
    let h = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/clients"))
        .and(query_param("nombre", "ana"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([row("c1", "Ana")])))
        .expect(2)
        .mount(&h.server)
        .await;

    let mut patched = client_json("c1");
    patched["direccion"] = json!("Cartago");
    Mock::given(method("PUT"))
        .and(path("/api/clients/c1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(patched))
        .expect(1)
        .mount(&h.server)
        .await;

    h.store
        .refresh(Some(&ClientFilters::default().with_name("ana")))
        .await;

    let mut edit = draft();
    edit.address = "Cartago".into();
    let updated = h.store.update(&EntityId::new("c1"), edit.clone()).await.unwrap();
    assert_eq!(updated.to_draft(), edit);

    let requests = h.server.received_requests().await.unwrap();
    let put = requests.iter().find(|r| r.method.as_str() == "PUT").unwrap();
    let body: Value = put.body_json().unwrap();
    assert!(body.get("id").is_none());
    assert_eq!(body["direccion"], json!("Cartago"));
}

#[tokio::test]
async fn test_update_missing_client_is_not_found() {
    let h = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/clients/nope"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&h.server)
        .await;

    let err = h
        .store
        .update(&EntityId::new("nope"), draft())
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

// ── Delete ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_delete_removes_locally_without_refresh() {
    let h = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/clients"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([row("a", "Ana"), row("b", "Beto")])),
        )
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/clients/a"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&h.server)
        .await;

    h.store.refresh(None).await;
    h.store.delete(&EntityId::new("a")).await.unwrap();

    assert_eq!(ids(&h.store), vec!["b"]);
    assert!(!h.store.snapshot().contains(&EntityId::new("a")));
}

#[tokio::test]
async fn test_delete_during_filtered_refresh_reloads_with_new_filters() {
    let h = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/clients"))
        .and(query_param("nombre", "be"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([row("a", "Abel"), row("b", "Beto")]))
                .set_delay(Duration::from_millis(300)),
        )
        .up_to_n_times(1)
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/clients"))
        .and(query_param("nombre", "be"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([row("b", "Beto")])))
        .mount(&h.server)
        .await;
    mount_list(
        &h.server,
        json!([row("a", "Abel"), row("b", "Beto"), row("c", "Carla")]),
    )
    .await;
    Mock::given(method("DELETE"))
        .and(path("/api/clients/a"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&h.server)
        .await;

    h.store.refresh(None).await;
    assert_eq!(ids(&h.store), vec!["a", "b", "c"]);

    let filters = ClientFilters::default().with_name("be");
    let (outcome, deleted) = tokio::join!(h.store.refresh(Some(&filters)), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        h.store.delete(&EntityId::new("a")).await
    });

    deleted.unwrap();
    assert_eq!(outcome, RefreshOutcome::Discarded);
    assert_eq!(ids(&h.store), vec!["b"]);
    assert_eq!(h.store.last_filters(), Some(filters.normalized()));

    let state = h.store.snapshot();
    assert!(!state.loading);
    assert_eq!(state.phase, StorePhase::Idle);
}

#[tokio::test]
async fn test_failed_delete_keeps_entities_and_reraises() {
    let h = setup().await;
    mount_list(&h.server, json!([row("a", "Ana")])).await;
    Mock::given(method("DELETE"))
        .and(path("/api/clients/a"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&h.server)
        .await;

    h.store.refresh(None).await;
    let err = h.store.delete(&EntityId::new("a")).await.unwrap_err();

    assert!(err.is_auth());
    assert_eq!(ids(&h.store), vec!["a"]);
    assert_eq!(h.store.snapshot().error, Some(err));
}

// ── Get by id ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_missing_client_records_error_and_keeps_entities() {
    let h = setup().await;
    mount_list(&h.server, json!([row("a", "Ana")])).await;
    Mock::given(method("GET"))
        .and(path("/api/clients/does-not-exist"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such client"))
        .mount(&h.server)
        .await;

    h.store.refresh(None).await;
    let err = h
        .store
        .get_by_id(&EntityId::new("does-not-exist"))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    let state = h.store.snapshot();
    assert_eq!(state.error, Some(err));
    assert_eq!(ids(&h.store), vec!["a"]);
    assert!(!state.loading);
}

#[tokio::test]
async fn test_get_accepts_both_interest_keys() {
    let h = setup().await;

    let mut body = client_json("c1");
    body["interesesId"] = json!("3");
    Mock::given(method("GET"))
        .and(path("/api/clients/c1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&h.server)
        .await;

    let client = h.store.get_by_id(&EntityId::new("c1")).await.unwrap();
    assert_eq!(client.interest_id, Some(EntityId::new("3")));
    assert!(h.store.snapshot().error.is_none());
}

#[tokio::test]
async fn test_blank_id_is_rejected_locally() {
    let h = setup().await;

    let err = h.clients.get_by_id(&EntityId::new("  ")).await.unwrap_err();
    assert!(matches!(err, CoreError::Validation { .. }));
    assert_eq!(request_count(&h.server).await, 0);
}

// ── Reference data ──────────────────────────────────────────────────

#[tokio::test]
async fn test_reference_data_is_fetched_once() {
    let h = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/interests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "descripcion": "Deportes" },
            { "id": "2", "descripcion": "Lectura" }
        ])))
        .expect(1)
        .mount(&h.server)
        .await;

    assert!(h.store.interests().is_none());
    let first = h.store.fetch_reference_data().await.unwrap();
    let second = h.store.fetch_reference_data().await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first[0].id.as_str(), "1");
    assert_eq!(first[1].description, "Lectura");
    assert!(h.store.snapshot().reference_data.is_some());
}

#[tokio::test]
async fn test_failed_reference_load_is_retried() {
    let h = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/interests"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/interests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&h.server)
        .await;

    assert!(h.store.fetch_reference_data().await.is_err());
    assert!(h.store.snapshot().error.is_some());

    let interests = h.store.fetch_reference_data().await.unwrap();
    assert!(interests.is_empty());
    assert_eq!(h.store.snapshot().error, None);
}

// ── Session ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_token_reaches_next_request() {
    let h = setup_with(SessionContext::new()).await;
    let api = ApiConfig::from_url_str(&format!("{}/api", h.server.uri()))
        .unwrap()
        .build_client(Arc::new(h.session.clone()))
        .unwrap();
    let auth = AuthService::new(Arc::new(api), h.session.clone());

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "fresh",
            "userId": 12,
            "displayName": "Ana Mora"
        })))
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/clients"))
        .and(query_param("usuarioId", "12"))
        .and(header("Authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&h.server)
        .await;

    let snapshot = auth
        .login("ana", &SecretString::from("pw".to_owned()))
        .await
        .unwrap();
    assert!(snapshot.authenticated);
    assert_eq!(h.session.display_name().as_deref(), Some("Ana Mora"));

    let outcome = h.store.refresh(None).await;
    assert_eq!(outcome, RefreshOutcome::Applied { count: 0 });

    auth.logout();
    assert!(!h.session.is_authenticated());
}

#[tokio::test]
async fn test_register_mismatched_confirm_is_rejected_locally() {
    let h = setup_with(SessionContext::new()).await;
    let api = ApiConfig::from_url_str(&format!("{}/api", h.server.uri()))
        .unwrap()
        .build_client(Arc::new(h.session.clone()))
        .unwrap();
    let auth = AuthService::new(Arc::new(api), h.session.clone());

    let err = auth
        .register(
            "ana",
            "ana@example.com",
            &SecretString::from("one".to_owned()),
            &SecretString::from("two".to_owned()),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::Validation { ref field, .. } if field == "confirm"));
    assert_eq!(request_count(&h.server).await, 0);
}
