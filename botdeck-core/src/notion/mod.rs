// botdeck-core/src/notion/mod.rs

pub mod client;
pub mod export;

pub use client::NotionClient;
pub use export::{BatchExporter, ExportOutcome};
