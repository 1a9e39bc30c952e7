use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::{DateTime, Utc};
use contact_messages::shutdown::{self, ShutdownTrigger};
use contact_messages::{app, AppState, MemoryStore, Message, MessageFields, MessageStore, StoreError};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const BODY_LIMIT: usize = 64 * 1024;

fn router_with(store: Arc<dyn MessageStore>) -> (Router, ShutdownTrigger) {
    let (trigger, signal) = shutdown::channel();
    (app(AppState::new(store, signal), BODY_LIMIT), trigger)
}

fn memory_router() -> (Router, Arc<MemoryStore>, ShutdownTrigger) {
    let store = Arc::new(MemoryStore::new());
    let (router, trigger) = router_with(store.clone());
    (router, store, trigger)
}

async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap_or_else(|err| panic!("failed to build request: {err}"));
    router
        .clone()
        .oneshot(request)
        .await
        .unwrap_or_else(|err| panic!("router request failed: {err}"))
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap_or_else(|err| panic!("failed to read response body: {err}"));
    serde_json::from_slice(&bytes).unwrap_or_else(|err| panic!("response body is not JSON: {err}"))
}

fn ana() -> Value {
    json!({ "name": "Ana", "email": "ana@example.com", "message": "Olá" })
}

async fn create(router: &Router, body: Value) -> String {
    let response = send(router, Method::POST, "/api/messages", Some(body)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    body["id"].as_str().expect("id in create response").to_string()
}

async fn list(router: &Router) -> Vec<Value> {
    let response = send(router, Method::GET, "/api/messages", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    match json_body(response).await {
        Value::Array(items) => items,
        other => panic!("expected a JSON array, got {other}"),
    }
}

#[tokio::test]
async fn create_then_list_round_trip() {
    let (router, _store, _trigger) = memory_router();

    let response = send(&router, Method::POST, "/api/messages", Some(ana())).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    let id = body["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());
    assert_eq!(body["message"], "Mensagem registrada com sucesso.");

    let items = list(&router).await;
    assert_eq!(items.len(), 1);
    let first = &items[0];
    assert_eq!(first["id"], id.as_str());
    assert_eq!(first["name"], "Ana");
    assert_eq!(first["email"], "ana@example.com");
    assert_eq!(first["message"], "Olá");
    assert!(first["createdAt"].is_string());
    assert!(first.get("updatedAt").is_none());
}

#[tokio::test]
async fn list_is_newest_first() {
    let (router, store, _trigger) = memory_router();
    let t0 = Utc::now();
    for (offset, name) in [(0, "first"), (20, "third"), (10, "second")] {
        let fields = MessageFields {
            name: name.into(),
            email: "x@example.com".into(),
            message: "m".into(),
        };
        store.insert(&fields, t0 + chrono::Duration::seconds(offset)).await.unwrap();
    }

    let items = list(&router).await;
    let names: Vec<&str> = items.iter().map(|m| m["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["third", "second", "first"]);

    let stamps: Vec<DateTime<Utc>> = items
        .iter()
        .map(|m| m["createdAt"].as_str().unwrap().parse().unwrap())
        .collect();
    assert!(stamps.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn update_overwrites_fields_and_stamps_updated_at() {
    let (router, store, _trigger) = memory_router();
    let id = create(&router, ana()).await;
    let before = store.get(&id).await.unwrap().unwrap();

    let response = send(
        &router,
        Method::PUT,
        &format!("/api/messages/{id}"),
        Some(json!({ "name": "Ana Maria", "email": "ana.maria@example.com", "message": "Atualizado" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body, json!({ "id": id, "message": "Mensagem atualizada com sucesso." }));

    let after = store.get(&id).await.unwrap().unwrap();
    assert_eq!(after.id, before.id);
    assert_eq!(after.created_at, before.created_at);
    assert_eq!(after.name, "Ana Maria");
    assert_eq!(after.email, "ana.maria@example.com");
    assert_eq!(after.message, "Atualizado");
    assert!(after.updated_at.unwrap() >= after.created_at.unwrap());

    let items = list(&router).await;
    assert!(items[0]["updatedAt"].is_string());
}

#[tokio::test]
async fn update_and_delete_of_unknown_id_are_404_without_mutation() {
    let (router, _store, _trigger) = memory_router();
    create(&router, ana()).await;
    let before = list(&router).await;

    let response = send(&router, Method::PUT, "/api/messages/missing", Some(ana())).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await, json!({ "error": "Mensagem não encontrada." }));

    let response = send(&router, Method::DELETE, "/api/messages/missing", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    assert_eq!(list(&router).await, before);
}

#[tokio::test]
async fn delete_is_permanent() {
    let (router, _store, _trigger) = memory_router();
    let id = create(&router, ana()).await;
    let uri = format!("/api/messages/{id}");

    let response = send(&router, Method::DELETE, &uri, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({ "id": id, "message": "Mensagem removida com sucesso." })
    );

    assert!(list(&router).await.is_empty());
    assert_eq!(send(&router, Method::DELETE, &uri, None).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(send(&router, Method::PUT, &uri, Some(ana())).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_fields_are_rejected_before_storage() {
    let (router, _store, _trigger) = memory_router();
    let cases = [
        (json!({ "name": "", "email": "ana@example.com", "message": "Olá" }), "name"),
        (json!({ "name": "Ana", "email": "ana.example.com", "message": "Olá" }), "email"),
        (json!({ "name": "Ana", "email": "ana@example.com", "message": "x".repeat(2001) }), "message"),
        (json!({ "email": "ana@example.com", "message": "Olá" }), "name"),
    ];

    for (body, field) in cases {
        let response = send(&router, Method::POST, "/api/messages", Some(body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Dados inválidos.");
        assert!(body["fields"][field].is_string(), "expected a violation on {field}: {body}");
    }

    assert!(list(&router).await.is_empty());
}

#[tokio::test]
async fn invalid_update_body_leaves_document_untouched() {
    let (router, store, _trigger) = memory_router();
    let id = create(&router, ana()).await;

    let response = send(
        &router,
        Method::PUT,
        &format!("/api/messages/{id}"),
        Some(json!({ "name": "Ana", "email": "nope", "message": "Olá" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(store.get(&id).await.unwrap().unwrap().updated_at.is_none());
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let (router, _store, _trigger) = memory_router();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/messages")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(response).await["error"].is_string());
}

#[tokio::test]
async fn body_without_json_content_type_is_415() {
    let (router, store, _trigger) = memory_router();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/messages")
        .body(Body::from(ana().to_string()))
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(json_body(response).await["error"].is_string());
    assert!(store.list_newest_first().await.unwrap().is_empty());
}

#[tokio::test]
async fn body_over_the_limit_is_413() {
    let (router, store, _trigger) = memory_router();
    let oversized = json!({
        "name": "Ana",
        "email": "ana@example.com",
        "message": "a".repeat(BODY_LIMIT * 2),
    });
    let response = send(&router, Method::POST, "/api/messages", Some(oversized)).await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(json_body(response).await["error"].is_string());
    assert!(store.list_newest_first().await.unwrap().is_empty());
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let (router, _store, _trigger) = memory_router();
    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/messages")
        .header(header::ORIGIN, "https://forms.example.org")
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}

/// Memory store where another client deletes each message right after it is looked up.
struct DeletedAfterLookup(MemoryStore);

#[async_trait]
impl MessageStore for DeletedAfterLookup {
    async fn insert(&self, fields: &MessageFields, created_at: DateTime<Utc>) -> Result<String, StoreError> {
        self.0.insert(fields, created_at).await
    }
    async fn list_newest_first(&self) -> Result<Vec<Message>, StoreError> {
        self.0.list_newest_first().await
    }
    async fn get(&self, id: &str) -> Result<Option<Message>, StoreError> {
        let found = self.0.get(id).await?;
        self.0.delete(id).await?;
        Ok(found)
    }
    async fn update(&self, id: &str, fields: &MessageFields, updated_at: DateTime<Utc>) -> Result<(), StoreError> {
        self.0.update(id, fields, updated_at).await
    }
    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.0.delete(id).await
    }
    async fn ping(&self) -> Result<(), StoreError> {
        self.0.ping().await
    }
}

#[tokio::test]
async fn update_after_concurrent_delete_is_404_and_not_recreated() {
    let store = Arc::new(DeletedAfterLookup(MemoryStore::new()));
    let (router, _trigger) = router_with(store.clone());
    let id = create(&router, ana()).await;

    let response = send(&router, Method::PUT, &format!("/api/messages/{id}"), Some(ana())).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await, json!({ "error": "Mensagem não encontrada." }));
    assert!(store.0.get(&id).await.unwrap().is_none());
}

/// Store whose every call fails with the same backend error.
struct FailingStore;

#[async_trait]
impl MessageStore for FailingStore {
    async fn insert(&self, _: &MessageFields, _: DateTime<Utc>) -> Result<String, StoreError> {
        Err(StoreError::Backend("PERMISSION_DENIED".into()))
    }
    async fn list_newest_first(&self) -> Result<Vec<Message>, StoreError> {
        Err(StoreError::Backend("PERMISSION_DENIED".into()))
    }
    async fn get(&self, _: &str) -> Result<Option<Message>, StoreError> {
        Err(StoreError::Backend("PERMISSION_DENIED".into()))
    }
    async fn update(&self, _: &str, _: &MessageFields, _: DateTime<Utc>) -> Result<(), StoreError> {
        Err(StoreError::Backend("PERMISSION_DENIED".into()))
    }
    async fn delete(&self, _: &str) -> Result<(), StoreError> {
        Err(StoreError::Backend("PERMISSION_DENIED".into()))
    }
    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::Backend("PERMISSION_DENIED".into()))
    }
}

#[tokio::test]
async fn storage_failures_are_500_with_cause() {
    let (router, _trigger) = router_with(Arc::new(FailingStore));

    let cases = [
        (Method::POST, "/api/messages", Some(ana()), "Falha ao registrar mensagem: PERMISSION_DENIED"),
        (Method::GET, "/api/messages", None, "Falha ao consultar mensagens: PERMISSION_DENIED"),
        (Method::PUT, "/api/messages/abc", Some(ana()), "Falha ao atualizar mensagem: PERMISSION_DENIED"),
        (Method::DELETE, "/api/messages/abc", None, "Falha ao excluir mensagem: PERMISSION_DENIED"),
    ];
    for (method, uri, body, expected) in cases {
        let response = send(&router, method, uri, body).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await, json!({ "error": expected }));
    }

    let response = send(&router, Method::GET, "/ready", None).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

/// Store whose calls never complete, standing in for a hung backend.
struct StalledStore;

#[async_trait]
impl MessageStore for StalledStore {
    async fn insert(&self, _: &MessageFields, _: DateTime<Utc>) -> Result<String, StoreError> {
        std::future::pending().await
    }
    async fn list_newest_first(&self) -> Result<Vec<Message>, StoreError> {
        std::future::pending().await
    }
    async fn get(&self, _: &str) -> Result<Option<Message>, StoreError> {
        std::future::pending().await
    }
    async fn update(&self, _: &str, _: &MessageFields, _: DateTime<Utc>) -> Result<(), StoreError> {
        std::future::pending().await
    }
    async fn delete(&self, _: &str) -> Result<(), StoreError> {
        std::future::pending().await
    }
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[tokio::test]
async fn shutdown_interrupts_pending_calls_with_retry_message() {
    let (router, trigger) = router_with(Arc::new(StalledStore));

    let pending = tokio::spawn({
        let router = router.clone();
        async move { send(&router, Method::POST, "/api/messages", Some(ana())).await }
    });
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    trigger.trigger();

    let response = tokio::time::timeout(std::time::Duration::from_secs(2), pending)
        .await
        .expect("request finished after shutdown")
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(response).await,
        json!({ "error": "Envio interrompido, tente novamente." })
    );

    let response = send(&router, Method::DELETE, "/api/messages/abc", None).await;
    assert_eq!(
        json_body(response).await,
        json!({ "error": "Exclusão interrompida, tente novamente." })
    );
}

#[tokio::test]
async fn common_routes_respond() {
    let (router, _store, _trigger) = memory_router();

    let response = send(&router, Method::GET, "/health", None).await;
    assert_eq!(json_body(response).await, json!({ "status": "ok" }));

    let response = send(&router, Method::GET, "/ready", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "status": "ok", "database": "ok" }));

    let response = send(&router, Method::GET, "/version", None).await;
    assert_eq!(json_body(response).await["name"], "contact-messages");

    let response = send(&router, Method::GET, "/api/openapi.json", None).await;
    let doc = json_body(response).await;
    assert!(doc["paths"]["/api/messages"]["post"].is_object());
    assert!(doc["paths"]["/api/messages/{id}"]["delete"].is_object());
}
