// File: botdeck-core/tests/notion_client_tests.rs

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use botdeck_common::models::session::SessionScope;
use botdeck_common::traits::storage_traits::SessionStore;
use botdeck_core::http::HttpClient;
use botdeck_core::notion::NotionClient;
use botdeck_core::session::{MemorySessionStore, SessionContext};
use botdeck_core::Error;

#[derive(Debug)]
struct RecordedCall {
    method: &'static str,
    url: String,
    headers: HashMap<String, String>,
    body: Option<String>,
}

// Scripted transport: records every request and pops one canned
// response per call.
#[derive(Default)]
struct ScriptedHttpClient {
    calls: Mutex<Vec<RecordedCall>>,
    responses: Mutex<VecDeque<Result<String, Error>>>,
}

impl ScriptedHttpClient {
    fn push_ok(&self, body: Value) {
        self.responses.lock().unwrap().push_back(Ok(body.to_string()));
    }

    fn push_raw(&self, body: &str) {
        self.responses.lock().unwrap().push_back(Ok(body.to_string()));
    }

    fn push_err(&self, err: Error) {
        self.responses.lock().unwrap().push_back(Err(err));
    }

    fn record(&self, call: RecordedCall) -> Result<String, Error> {
        self.calls.lock().unwrap().push(call);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::Parse("no scripted response".to_string())))
    }

    fn calls(&self) -> Vec<RecordedCall> {
        std::mem::take(&mut *self.calls.lock().unwrap())
    }
}

#[async_trait]
impl HttpClient for ScriptedHttpClient {
    type Error = Error;

    async fn get(&self, url: String, headers: HashMap<String, String>) -> Result<String, Error> {
        self.record(RecordedCall { method: "GET", url, headers, body: None })
    }

    async fn post(
        &self,
        url: String,
        headers: HashMap<String, String>,
        body: String,
    ) -> Result<String, Error> {
        self.record(RecordedCall { method: "POST", url, headers, body: Some(body) })
    }

    async fn put(
        &self,
        url: String,
        headers: HashMap<String, String>,
        body: String,
    ) -> Result<String, Error> {
        self.record(RecordedCall { method: "PUT", url, headers, body: Some(body) })
    }
}

const BASE: &str = "https://api.botdeck.test/api/notion";

fn client_with(
    http: Arc<ScriptedHttpClient>,
) -> (NotionClient, Arc<MemorySessionStore>) {
    let store = Arc::new(MemorySessionStore::new());
    let session = Arc::new(SessionContext::new(SessionScope::Customer, store.clone()));
    let client = NotionClient::with_http(BASE, session, http).expect("client");
    (client, store)
}

#[tokio::test]
async fn transport_failure_surfaces_as_error_not_panic() {
    let http = Arc::new(ScriptedHttpClient::default());
    http.push_err(Error::Parse("connection refused".to_string()));
    let (client, _) = client_with(http);

    let err = client.validate().await.unwrap_err();
    assert!(!err.to_string().is_empty(), "error message must be non-empty");
}

#[tokio::test]
async fn validate_unwraps_success_envelope() -> Result<(), Error> {
    let http = Arc::new(ScriptedHttpClient::default());
    http.push_ok(json!({
        "success": true,
        "data": { "workspace_name": "Kittyn HQ", "database_count": 3 }
    }));
    let (client, _) = client_with(http.clone());

    let summary = client.validate().await?;
    assert_eq!(summary.workspace_name, "Kittyn HQ");
    assert_eq!(summary.database_count, 3);

    let calls = http.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, "GET");
    assert_eq!(calls[0].url, format!("{BASE}/validate"));
    Ok(())
}

#[tokio::test]
async fn remote_rejection_passes_its_message_through() {
    let http = Arc::new(ScriptedHttpClient::default());
    http.push_ok(json!({ "success": false, "error": "Integration token revoked" }));
    let (client, _) = client_with(http);

    match client.validate().await {
        Err(Error::Remote(msg)) => assert_eq!(msg, "Integration token revoked"),
        other => panic!("expected remote rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn rejection_without_message_falls_back_to_operation_default() {
    let http = Arc::new(ScriptedHttpClient::default());
    http.push_ok(json!({ "success": false }));
    let (client, _) = client_with(http);

    match client.validate().await {
        Err(Error::Remote(msg)) => assert_eq!(msg, "Unable to validate the Notion connection"),
        other => panic!("expected remote rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn unparseable_body_is_normalized_to_remote_error() {
    let http = Arc::new(ScriptedHttpClient::default());
    http.push_raw("<html>502 Bad Gateway</html>");
    let (client, _) = client_with(http);

    match client.list_databases().await {
        Err(Error::Remote(msg)) => {
            assert!(msg.starts_with("Unable to list Notion databases"), "got: {msg}")
        }
        other => panic!("expected remote error, got {other:?}"),
    }
}

#[tokio::test]
async fn query_database_returns_pages_and_remote_count() -> Result<(), Error> {
    let http = Arc::new(ScriptedHttpClient::default());
    http.push_ok(json!({
        "success": true,
        "count": 42,
        "data": [
            { "id": "p1", "url": null, "properties": { "Name": "one" } },
            { "id": "p2", "url": null, "properties": { "Name": "two" } }
        ]
    }));
    let (client, _) = client_with(http.clone());

    let batch = client
        .query_database("db-1", Some(json!({ "archived": false })))
        .await?;
    assert_eq!(batch.count, 42);
    assert_eq!(batch.pages.len(), 2);
    assert_eq!(batch.pages[0].id, "p1");

    let calls = http.calls();
    assert_eq!(calls[0].method, "POST");
    assert_eq!(calls[0].url, format!("{BASE}/databases/query"));
    let body: Value = serde_json::from_str(calls[0].body.as_deref().unwrap()).unwrap();
    assert_eq!(body["database_id"], "db-1");
    assert_eq!(body["filter"]["archived"], false);
    Ok(())
}

#[tokio::test]
async fn create_and_update_hit_the_pages_endpoints() -> Result<(), Error> {
    let http = Arc::new(ScriptedHttpClient::default());
    http.push_ok(json!({
        "success": true,
        "data": { "id": "p9", "url": "https://notion.so/p9", "properties": {} }
    }));
    http.push_ok(json!({
        "success": true,
        "data": { "id": "p9", "url": "https://notion.so/p9", "properties": {} }
    }));
    let (client, _) = client_with(http.clone());

    client.create_page("db-1", json!({ "Name": "lead" })).await?;
    client.update_page("p9", json!({ "Name": "lead2" })).await?;

    let calls = http.calls();
    assert_eq!(calls[0].method, "POST");
    assert_eq!(calls[0].url, format!("{BASE}/pages"));
    assert_eq!(calls[1].method, "PUT");
    assert_eq!(calls[1].url, format!("{BASE}/pages"));
    let put_body: Value = serde_json::from_str(calls[1].body.as_deref().unwrap()).unwrap();
    assert_eq!(put_body["page_id"], "p9");
    Ok(())
}

#[tokio::test]
async fn stored_token_is_lazily_attached_as_bearer_header() -> Result<(), Error> {
    let http = Arc::new(ScriptedHttpClient::default());
    http.push_ok(json!({ "success": true, "data": [] }));

    let store = Arc::new(MemorySessionStore::new());
    store.set(SessionScope::Customer.token_key(), "tok-xyz").await?;
    let session = Arc::new(SessionContext::new(SessionScope::Customer, store));
    let client = NotionClient::with_http(BASE, session, http.clone())?;

    client.list_databases().await?;

    let calls = http.calls();
    assert_eq!(
        calls[0].headers.get("Authorization").map(String::as_str),
        Some("Bearer tok-xyz")
    );
    assert_eq!(
        calls[0].headers.get("Content-Type").map(String::as_str),
        Some("application/json")
    );
    Ok(())
}

#[tokio::test]
async fn missing_token_sends_no_authorization_header() -> Result<(), Error> {
    let http = Arc::new(ScriptedHttpClient::default());
    http.push_ok(json!({ "success": true, "data": [] }));
    let (client, _) = client_with(http.clone());

    client.list_databases().await?;

    let calls = http.calls();
    assert!(!calls[0].headers.contains_key("Authorization"));
    assert!(calls[0].headers.contains_key("Content-Type"));
    Ok(())
}
