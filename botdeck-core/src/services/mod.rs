// botdeck-core/src/services/mod.rs

pub mod analytics_service;

pub use analytics_service::{AnalyticsService, RangeSummary};
