use std::sync::Arc;

use futures_util::future::join_all;
use serde_json::Value;
use tracing::{info, warn};

use botdeck_common::models::notion::Page;
use crate::notion::NotionClient;
use crate::Error;

/// Result of a fully successful batch export: every record became a
/// page, in the same order the records were given.
#[derive(Debug)]
pub struct ExportOutcome {
    pub count: usize,
    pub pages: Vec<Page>,
}

/// Fans out one `create_page` per record concurrently and joins on all
/// of them.
///
/// The batch is all-or-nothing: every in-flight create is allowed to
/// settle (a failure neither cancels nor hides its siblings), and if any
/// of them failed the whole export reports a single error naming the
/// failed/total counts.
pub struct BatchExporter {
    client: Arc<NotionClient>,
    database_id: String,
}

impl BatchExporter {
    pub fn new(client: Arc<NotionClient>, database_id: impl Into<String>) -> Self {
        Self {
            client,
            database_id: database_id.into(),
        }
    }

    /// Export `records`, converting each to page properties with
    /// `to_properties`. Returns the created pages in input order.
    pub async fn export_all<T, F>(&self, records: &[T], to_properties: F) -> Result<ExportOutcome, Error>
    where
        F: Fn(&T) -> Value,
    {
        if records.is_empty() {
            return Ok(ExportOutcome { count: 0, pages: Vec::new() });
        }

        let calls = records.iter().map(|record| {
            let properties = to_properties(record);
            self.client.create_page(&self.database_id, properties)
        });
        let results = join_all(calls).await;

        let total = results.len();
        let mut pages = Vec::with_capacity(total);
        let mut failed = 0usize;
        let mut first_error: Option<Error> = None;
        for result in results {
            match result {
                Ok(page) => pages.push(page),
                Err(e) => {
                    failed += 1;
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        if failed > 0 {
            let first = first_error
                .map(|e| e.user_message())
                .unwrap_or_else(|| "unknown error".to_string());
            warn!("Batch export to {}: {failed}/{total} record(s) failed: {first}", self.database_id);
            return Err(Error::Export(format!(
                "{failed} of {total} record(s) failed to export: {first}"
            )));
        }

        info!("Exported {total} record(s) to database {}", self.database_id);
        Ok(ExportOutcome { count: total, pages })
    }
}
