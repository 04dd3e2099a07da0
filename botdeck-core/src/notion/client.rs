use std::sync::Arc;

use serde_json::{json, Value};
use tracing::debug;
use url::Url;

use botdeck_common::models::notion::{
    ApiEnvelope, ConnectionSummary, DatabaseInfo, Page, PageBatch,
};
use crate::http::{DefaultHttpClient, HttpClient};
use crate::session::SessionContext;
use crate::Error;

// Fixed default message per operation, used when the remote rejection
// carries no message of its own.
const VALIDATE_FALLBACK: &str = "Unable to validate the Notion connection";
const QUERY_FALLBACK: &str = "Unable to query the Notion database";
const CREATE_FALLBACK: &str = "Unable to create the Notion page";
const UPDATE_FALLBACK: &str = "Unable to update the Notion page";
const LIST_FALLBACK: &str = "Unable to list Notion databases";
const GET_DATABASE_FALLBACK: &str = "Unable to load the Notion database";

/// Client for the workspace-integration endpoints of the botdeck API.
///
/// One method per logical operation. Each makes a single attempt:
/// headers come from the session context, the response envelope is
/// parsed, and both transport and remote failures surface as `Err` —
/// callers never see a panic or a raw response body.
pub struct NotionClient {
    base_url: String,
    session: Arc<SessionContext>,
    http: Arc<dyn HttpClient<Error = Error>>,
}

impl NotionClient {
    pub fn new(base_url: &str, session: Arc<SessionContext>) -> Result<Self, Error> {
        Self::with_http(base_url, session, Arc::new(DefaultHttpClient::new()))
    }

    /// Like [`NotionClient::new`] but with an injected transport, for tests.
    pub fn with_http(
        base_url: &str,
        session: Arc<SessionContext>,
        http: Arc<dyn HttpClient<Error = Error>>,
    ) -> Result<Self, Error> {
        // Parsed once up front so a bad prefix fails at construction,
        // not on the first call.
        Url::parse(base_url)?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
            http,
        })
    }

    /// `GET /validate` — what workspace this integration is connected to.
    pub async fn validate(&self) -> Result<ConnectionSummary, Error> {
        let raw = self.get("validate").await?;
        ApiEnvelope::<ConnectionSummary>::parse(&raw, VALIDATE_FALLBACK)?
            .into_result(VALIDATE_FALLBACK)
    }

    /// `POST /databases/query` — pages of one database, with the remote
    /// total count. `filter` is passed through verbatim.
    pub async fn query_database(
        &self,
        database_id: &str,
        filter: Option<Value>,
    ) -> Result<PageBatch, Error> {
        let body = json!({
            "database_id": database_id,
            "filter": filter,
        });
        let raw = self.post("databases/query", &body).await?;
        let envelope = ApiEnvelope::<Vec<Page>>::parse(&raw, QUERY_FALLBACK)?;
        let count = envelope.count;
        let pages = envelope.into_result(QUERY_FALLBACK)?;
        let count = count.unwrap_or(pages.len() as i64);
        debug!("Queried database {database_id}: {} page(s), count={count}", pages.len());
        Ok(PageBatch { pages, count })
    }

    /// `POST /pages` — create a page in a database.
    pub async fn create_page(
        &self,
        database_id: &str,
        properties: Value,
    ) -> Result<Page, Error> {
        let body = json!({
            "database_id": database_id,
            "properties": properties,
        });
        let raw = self.post("pages", &body).await?;
        ApiEnvelope::<Page>::parse(&raw, CREATE_FALLBACK)?.into_result(CREATE_FALLBACK)
    }

    /// `PUT /pages` — update an existing page's properties.
    pub async fn update_page(&self, page_id: &str, properties: Value) -> Result<Page, Error> {
        let body = json!({
            "page_id": page_id,
            "properties": properties,
        });
        let raw = self.put("pages", &body).await?;
        ApiEnvelope::<Page>::parse(&raw, UPDATE_FALLBACK)?.into_result(UPDATE_FALLBACK)
    }

    /// `GET /databases` — every database the integration can reach.
    pub async fn list_databases(&self) -> Result<Vec<DatabaseInfo>, Error> {
        let raw = self.get("databases").await?;
        ApiEnvelope::<Vec<DatabaseInfo>>::parse(&raw, LIST_FALLBACK)?.into_result(LIST_FALLBACK)
    }

    /// `GET /databases/{id}` — one database by id.
    pub async fn get_database(&self, database_id: &str) -> Result<DatabaseInfo, Error> {
        let raw = self.get(&format!("databases/{database_id}")).await?;
        ApiEnvelope::<DatabaseInfo>::parse(&raw, GET_DATABASE_FALLBACK)?
            .into_result(GET_DATABASE_FALLBACK)
    }

    async fn get(&self, path: &str) -> Result<String, Error> {
        let headers = self.session.headers().await?;
        self.http
            .get(format!("{}/{path}", self.base_url), headers)
            .await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<String, Error> {
        let headers = self.session.headers().await?;
        self.http
            .post(
                format!("{}/{path}", self.base_url),
                headers,
                serde_json::to_string(body)?,
            )
            .await
    }

    async fn put(&self, path: &str, body: &Value) -> Result<String, Error> {
        let headers = self.session.headers().await?;
        self.http
            .put(
                format!("{}/{path}", self.base_url),
                headers,
                serde_json::to_string(body)?,
            )
            .await
    }
}

