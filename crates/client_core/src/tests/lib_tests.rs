use std::{collections::HashMap, sync::Arc};

use super::*;
use axum::{
    body::Bytes,
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, Method as AxumMethod, StatusCode as AxumStatus, Uri},
    response::{IntoResponse, Response},
    Router,
};
use serde_json::json;
use shared::domain::{Source, Stage, Temperature};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Debug, Clone)]
struct RecordedRequest {
    method: String,
    path: String,
    query: Vec<(String, String)>,
    authorization: Option<String>,
    body: Vec<u8>,
}

impl RecordedRequest {
    fn json_body(&self) -> Value {
        serde_json::from_slice(&self.body).expect("json body")
    }
}

#[derive(Clone)]
struct CannedResponse {
    status: AxumStatus,
    content_type: &'static str,
    body: String,
}

impl CannedResponse {
    fn json(status: AxumStatus, body: Value) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.to_string(),
        }
    }
}

#[derive(Clone)]
struct MockState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    responses: Arc<HashMap<(String, String), CannedResponse>>,
}

async fn record_request(
    State(state): State<MockState>,
    method: AxumMethod,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let recorded = RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri
            .query()
            .map(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .into_owned()
                    .collect()
            })
            .unwrap_or_default(),
        authorization: headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: body.to_vec(),
    };
    let key = (recorded.method.clone(), recorded.path.clone());
    state.requests.lock().await.push(recorded);

    match state.responses.get(&key) {
        Some(canned) => (
            canned.status,
            [(axum::http::header::CONTENT_TYPE, canned.content_type)],
            canned.body.clone(),
        )
            .into_response(),
        None => (
            AxumStatus::OK,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            json!({ "ok": true }).to_string(),
        )
            .into_response(),
    }
}

async fn spawn_contacts_server(
    responses: Vec<((&str, &str), CannedResponse)>,
) -> (String, Arc<Mutex<Vec<RecordedRequest>>>) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        requests: Arc::clone(&requests),
        responses: Arc::new(
            responses
                .into_iter()
                .map(|((method, path), canned)| ((method.to_string(), path.to_string()), canned))
                .collect(),
        ),
    };
    let app = Router::new().fallback(record_request).with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}/api"), requests)
}

async fn single_request(requests: &Arc<Mutex<Vec<RecordedRequest>>>) -> RecordedRequest {
    let guard = requests.lock().await;
    assert_eq!(guard.len(), 1, "expected exactly one request: {guard:?}");
    guard[0].clone()
}

#[tokio::test]
async fn get_all_sends_only_constrained_query_fields() {
    let (base_url, requests) = spawn_contacts_server(vec![(
        ("GET", "/api/contacts"),
        CannedResponse::json(AxumStatus::OK, json!({ "contacts": [], "total": 0 })),
    )])
    .await;
    let client = HttpContactsClient::new(&base_url).expect("client");

    let mut query = ListQuery::new(3, 25);
    query.search = Some("sara".to_string());
    query.temperature = Some(Temperature::Hot);
    query.stage = Some(Stage::Mql);

    let body = client.get_all(&query).await.expect("list");
    assert_eq!(body, json!({ "contacts": [], "total": 0 }));

    let request = single_request(&requests).await;
    assert_eq!(request.method, "GET");
    assert_eq!(request.path, "/api/contacts");
    let params: HashMap<_, _> = request.query.into_iter().collect();
    assert_eq!(params.get("page").map(String::as_str), Some("3"));
    assert_eq!(params.get("limit").map(String::as_str), Some("25"));
    assert_eq!(params.get("search").map(String::as_str), Some("sara"));
    assert_eq!(params.get("temperature").map(String::as_str), Some("hot"));
    assert_eq!(params.get("stage").map(String::as_str), Some("mql"));
    assert!(!params.contains_key("source"));
    assert!(!params.contains_key("group"));
    assert!(!params.contains_key("sortBy"));
}

#[tokio::test]
async fn id_operations_target_the_contact_path() {
    let (base_url, requests) = spawn_contacts_server(Vec::new()).await;
    let client = HttpContactsClient::new(&base_url).expect("client");

    client.get_by_id("64f1").await.expect("get");
    client
        .update(
            "64f1",
            &ContactUpdate {
                temperature: Some(Temperature::Warm),
                ..ContactUpdate::default()
            },
        )
        .await
        .expect("update");
    client.delete("64f1").await.expect("delete");

    let guard = requests.lock().await;
    let seen: Vec<(&str, &str)> = guard
        .iter()
        .map(|r| (r.method.as_str(), r.path.as_str()))
        .collect();
    assert_eq!(
        seen,
        vec![
            ("GET", "/api/contacts/64f1"),
            ("PUT", "/api/contacts/64f1"),
            ("DELETE", "/api/contacts/64f1"),
        ]
    );
    assert_eq!(guard[1].json_body(), json!({ "temperature": "warm" }));
}

#[tokio::test]
async fn create_posts_the_draft_body() {
    let (base_url, requests) = spawn_contacts_server(vec![(
        ("POST", "/api/contacts"),
        CannedResponse::json(AxumStatus::CREATED, json!({ "_id": "new-1", "name": "Sara" })),
    )])
    .await;
    let client = HttpContactsClient::new(&base_url).expect("client");

    let created = client
        .create(&ContactDraft {
            name: "Sara".to_string(),
            email: Some("sara@example.com".to_string()),
            phone: None,
            source: Source::Manual,
        })
        .await
        .expect("create");
    assert_eq!(created["_id"], "new-1");

    let request = single_request(&requests).await;
    assert_eq!(request.method, "POST");
    assert_eq!(
        request.json_body(),
        json!({ "name": "Sara", "email": "sara@example.com", "source": "Manual" })
    );
}

#[tokio::test]
async fn bulk_delete_posts_id_array() {
    let (base_url, requests) = spawn_contacts_server(Vec::new()).await;
    let client = HttpContactsClient::new(&base_url).expect("client");

    client
        .bulk_delete(&["a".to_string(), "b".to_string()])
        .await
        .expect("bulk delete");

    let request = single_request(&requests).await;
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/api/contacts/bulk-delete");
    assert_eq!(request.json_body(), json!({ "ids": ["a", "b"] }));
}

#[tokio::test]
async fn search_export_import_and_stats_use_their_sub_resources() {
    let (base_url, requests) = spawn_contacts_server(vec![(
        ("GET", "/api/contacts/export"),
        CannedResponse {
            status: AxumStatus::OK,
            content_type: "text/csv",
            body: "name,email\nSara,sara@example.com\n".to_string(),
        },
    )])
    .await;
    let client = HttpContactsClient::new(&base_url).expect("client");

    client.search("ali").await.expect("search");
    client
        .import(&json!({ "contacts": [{ "name": "Ali" }] }))
        .await
        .expect("import");
    let exported = client
        .export(&ExportQuery {
            source: Some(Source::Instagram),
            temperature: None,
        })
        .await
        .expect("export");
    client.get_stats().await.expect("stats");

    assert_eq!(
        exported,
        Value::String("name,email\nSara,sara@example.com\n".to_string())
    );

    let guard = requests.lock().await;
    assert_eq!(guard.len(), 4);
    assert_eq!(guard[0].path, "/api/contacts/search");
    assert_eq!(guard[0].query, vec![("q".to_string(), "ali".to_string())]);
    assert_eq!(guard[1].method, "POST");
    assert_eq!(guard[1].path, "/api/contacts/import");
    assert_eq!(guard[2].path, "/api/contacts/export");
    assert_eq!(
        guard[2].query,
        vec![("source".to_string(), "Instagram".to_string())]
    );
    assert_eq!(guard[3].path, "/api/contacts/stats");
}

#[tokio::test]
async fn attaches_bearer_token_when_configured() {
    let (base_url, requests) = spawn_contacts_server(Vec::new()).await;
    let client = HttpContactsClient::new(&base_url)
        .expect("client")
        .with_token(Some("secret-token".to_string()));

    client.get_stats().await.expect("stats");

    let request = single_request(&requests).await;
    assert_eq!(
        request.authorization.as_deref(),
        Some("Bearer secret-token")
    );
}

#[tokio::test]
async fn blank_token_is_not_sent() {
    let (base_url, requests) = spawn_contacts_server(Vec::new()).await;
    let client = HttpContactsClient::new(&base_url)
        .expect("client")
        .with_token(Some("  ".to_string()));

    client.get_stats().await.expect("stats");
    assert_eq!(single_request(&requests).await.authorization, None);
}

#[tokio::test]
async fn empty_success_body_decodes_to_null() {
    let (base_url, _requests) = spawn_contacts_server(vec![(
        ("DELETE", "/api/contacts/gone"),
        CannedResponse {
            status: AxumStatus::NO_CONTENT,
            content_type: "application/json",
            body: String::new(),
        },
    )])
    .await;
    let client = HttpContactsClient::new(&base_url).expect("client");

    assert_eq!(client.delete("gone").await.expect("delete"), Value::Null);
}

#[tokio::test]
async fn error_status_carries_server_message() {
    let (base_url, _requests) = spawn_contacts_server(vec![(
        ("POST", "/api/contacts"),
        CannedResponse::json(
            AxumStatus::UNPROCESSABLE_ENTITY,
            json!({ "message": "email already exists" }),
        ),
    )])
    .await;
    let client = HttpContactsClient::new(&base_url).expect("client");

    let err = client
        .create(&ContactDraft {
            name: "Dup".to_string(),
            ..ContactDraft::default()
        })
        .await
        .expect_err("must fail");

    assert_eq!(err.status(), Some(StatusCode::UNPROCESSABLE_ENTITY));
    assert_eq!(err.server_message(), Some("email already exists"));
    assert_eq!(err.user_message(), "email already exists");
    assert!(err.to_string().contains("422"));
}

#[tokio::test]
async fn error_status_without_body_has_no_server_message() {
    let (base_url, _requests) = spawn_contacts_server(vec![(
        ("GET", "/api/contacts/stats"),
        CannedResponse {
            status: AxumStatus::INTERNAL_SERVER_ERROR,
            content_type: "text/plain",
            body: "boom".to_string(),
        },
    )])
    .await;
    let client = HttpContactsClient::new(&base_url).expect("client");

    let err = client.get_stats().await.expect_err("must fail");
    assert_eq!(err.server_message(), None);
    assert!(err.user_message().contains("500"));
}

#[test]
fn status_error_is_built_from_reexported_http_types() {
    let err = crate::ApiClientError::Status {
        method: crate::Method::DELETE,
        path: "/api/contacts/x".to_string(),
        status: crate::StatusCode::NOT_FOUND,
        message: None,
    };
    assert_eq!(err.status(), Some(crate::StatusCode::NOT_FOUND));
    assert_eq!(err.server_message(), None);
    let text = err.user_message();
    assert!(text.contains("DELETE"), "{text}");
    assert!(text.contains("404"), "{text}");
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let client = HttpContactsClient::new(&format!("http://{addr}")).expect("client");
    let err = client.get_stats().await.expect_err("must fail");
    assert!(matches!(err, ApiClientError::Transport { .. }), "{err}");
}

#[test]
fn rejects_non_http_base_urls() {
    assert!(matches!(
        HttpContactsClient::new("mailto:someone@example.com"),
        Err(ApiClientError::InvalidBaseUrl { .. })
    ));
    assert!(matches!(
        HttpContactsClient::new("not a url"),
        Err(ApiClientError::InvalidBaseUrl { .. })
    ));
}

#[test]
fn endpoint_joins_segments_and_escapes_ids() {
    let client = HttpContactsClient::new("https://api.example.com/v1/").expect("client");
    assert_eq!(
        client.endpoint(&["contacts", "stats"]).as_str(),
        "https://api.example.com/v1/contacts/stats"
    );
    assert_eq!(
        client.endpoint(&["contacts", "a/b c"]).as_str(),
        "https://api.example.com/v1/contacts/a%2Fb%20c"
    );
}
