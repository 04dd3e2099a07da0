// src/repositories/postgres/mod.rs

pub mod analytics;

pub use analytics::PostgresAnalyticsRepository;
