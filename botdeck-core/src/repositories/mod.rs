// src/repositories/mod.rs

pub mod postgres;

pub use botdeck_common::traits::repository_traits::AnalyticsRepository;
pub use postgres::analytics::PostgresAnalyticsRepository;
