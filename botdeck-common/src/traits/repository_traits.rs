// File: botdeck-common/src/traits/repository_traits.rs

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;
use crate::error::Error;
use crate::models::analytics::{BotAnalytics, BucketCount, BucketKind};

/// Storage for the per-chatbot, per-day usage aggregates. One row per
/// `(chatbot_id, date)`; the write methods all upsert against that key.
#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    /// Fetch the aggregate for the day, creating a zeroed row if the day
    /// has not been seen yet.
    async fn ensure_for_day(&self, chatbot_id: Uuid, date: NaiveDate)
        -> Result<BotAnalytics, Error>;

    /// Add conversation/message counts onto the day's row.
    async fn record_activity(
        &self,
        chatbot_id: Uuid,
        date: NaiveDate,
        new_conversations: i64,
        new_user_messages: i64,
        new_bot_messages: i64,
    ) -> Result<(), Error>;

    /// Overwrite the day's gauge fields (rates are recomputed upstream,
    /// not accumulated).
    async fn set_daily_rates(
        &self,
        chatbot_id: Uuid,
        date: NaiveDate,
        fallback_rate: f64,
        satisfaction_score: f64,
        avg_messages_per_conversation: f64,
    ) -> Result<(), Error>;

    /// Fold `deltas` into one of the day's bucket collections.
    async fn merge_buckets(
        &self,
        chatbot_id: Uuid,
        date: NaiveDate,
        kind: BucketKind,
        deltas: &[BucketCount],
    ) -> Result<(), Error>;

    async fn get_for_day(&self, chatbot_id: Uuid, date: NaiveDate)
        -> Result<Option<BotAnalytics>, Error>;

    /// Aggregates for `[from, to]` inclusive, ordered by date ascending.
    async fn get_range(&self, chatbot_id: Uuid, from: NaiveDate, to: NaiveDate)
        -> Result<Vec<BotAnalytics>, Error>;

    /// The most recent `limit` aggregates, newest first.
    async fn get_latest(&self, chatbot_id: Uuid, limit: i64)
        -> Result<Vec<BotAnalytics>, Error>;
}
