use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use tracing::debug;
use uuid::Uuid;

use botdeck_common::models::analytics::{
    merge_bucket_lists, BotAnalytics, BucketCount, BucketKind,
};
use botdeck_common::traits::repository_traits::AnalyticsRepository;
use crate::Error;

/// Rolled-up view of a date range, for the dashboard summary tiles.
#[derive(Debug, Clone)]
pub struct RangeSummary {
    pub from: NaiveDate,
    pub to: NaiveDate,
    /// Days in the range that have an aggregate row.
    pub active_days: usize,
    pub total_conversations: i64,
    pub total_messages: i64,
    /// Weighted by each day's user-message volume.
    pub avg_fallback_rate: f64,
    /// Weighted by each day's conversation count.
    pub avg_satisfaction_score: f64,
    pub top_intents: Vec<BucketCount>,
}

const SUMMARY_TOP_INTENTS: usize = 10;

/// Reporting reads and ingestion writes over the analytics repository.
pub struct AnalyticsService {
    repo: Arc<dyn AnalyticsRepository>,
}

impl AnalyticsService {
    pub fn new(repo: Arc<dyn AnalyticsRepository>) -> Self {
        Self { repo }
    }

    /// Fold one finished conversation into the day's aggregate: counters,
    /// the hour-of-day bucket, and (when known) intent and source buckets.
    pub async fn track_conversation(
        &self,
        chatbot_id: Uuid,
        started_at: DateTime<Utc>,
        user_messages: i64,
        bot_messages: i64,
        intent: Option<&str>,
        source: Option<&str>,
    ) -> Result<(), Error> {
        let date = started_at.date_naive();
        self.repo
            .record_activity(chatbot_id, date, 1, user_messages, bot_messages)
            .await?;

        let hour_label = format!("{:02}", started_at.hour());
        self.repo
            .merge_buckets(chatbot_id, date, BucketKind::Hourly, &[BucketCount::new(hour_label, 1)])
            .await?;

        if let Some(intent) = intent {
            self.repo
                .merge_buckets(chatbot_id, date, BucketKind::Intents, &[BucketCount::new(intent, 1)])
                .await?;
        }
        if let Some(source) = source {
            self.repo
                .merge_buckets(chatbot_id, date, BucketKind::Sources, &[BucketCount::new(source, 1)])
                .await?;
        }

        debug!("Tracked conversation for chatbot {chatbot_id} on {date}");
        Ok(())
    }

    /// One day's aggregate, or NotFound if the chatbot had no activity.
    pub async fn day_report(
        &self,
        chatbot_id: Uuid,
        date: NaiveDate,
    ) -> Result<BotAnalytics, Error> {
        self.repo
            .get_for_day(chatbot_id, date)
            .await?
            .ok_or_else(|| {
                Error::NotFound(format!("No analytics for chatbot {chatbot_id} on {date}"))
            })
    }

    /// The most recent `limit` daily aggregates, newest first.
    pub async fn latest_reports(
        &self,
        chatbot_id: Uuid,
        limit: i64,
    ) -> Result<Vec<BotAnalytics>, Error> {
        self.repo.get_latest(chatbot_id, limit).await
    }

    /// Roll `[from, to]` up into one summary. Rates are weighted by the
    /// volume that produced them, so a quiet day cannot drag the range
    /// average around the way a plain mean would.
    pub async fn range_summary(
        &self,
        chatbot_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<RangeSummary, Error> {
        if from > to {
            return Err(Error::Validation(format!(
                "Range start {from} is after range end {to}"
            )));
        }
        let days = self.repo.get_range(chatbot_id, from, to).await?;

        let mut total_conversations = 0i64;
        let mut total_messages = 0i64;
        let mut fallback_weight = 0i64;
        let mut fallback_sum = 0.0f64;
        let mut satisfaction_weight = 0i64;
        let mut satisfaction_sum = 0.0f64;
        let mut top_intents: Vec<BucketCount> = Vec::new();

        for day in &days {
            total_conversations += day.total_conversations;
            total_messages += day.total_messages;

            fallback_sum += day.fallback_rate * day.user_messages as f64;
            fallback_weight += day.user_messages;

            satisfaction_sum += day.satisfaction_score * day.total_conversations as f64;
            satisfaction_weight += day.total_conversations;

            top_intents = merge_bucket_lists(&top_intents, &day.top_intents, BucketKind::Intents);
        }
        top_intents.truncate(SUMMARY_TOP_INTENTS);

        Ok(RangeSummary {
            from,
            to,
            active_days: days.len(),
            total_conversations,
            total_messages,
            avg_fallback_rate: if fallback_weight > 0 {
                fallback_sum / fallback_weight as f64
            } else {
                0.0
            },
            avg_satisfaction_score: if satisfaction_weight > 0 {
                satisfaction_sum / satisfaction_weight as f64
            } else {
                0.0
            },
            top_intents,
        })
    }
}
