// src/repositories/postgres/analytics.rs

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use botdeck_common::models::analytics::{
    merge_bucket_lists, BotAnalytics, BucketCount, BucketKind,
};
use botdeck_common::traits::repository_traits::AnalyticsRepository;
use crate::Error;

/// Postgres-backed store for the per-chatbot daily aggregates.
///
/// All writes upsert against the `(chatbot_id, date)` unique key, so the
/// external aggregation pipeline can fire increments without caring
/// whether the day's row exists yet.
#[derive(Clone)]
pub struct PostgresAnalyticsRepository {
    pool: Pool<Postgres>,
}

impl PostgresAnalyticsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

const SELECT_COLUMNS: &str = r#"
    analytics_id,
    chatbot_id,
    date,
    total_conversations,
    total_messages,
    user_messages,
    bot_messages,
    avg_messages_per_conversation,
    fallback_rate,
    satisfaction_score,
    hourly_distribution,
    top_intents,
    sources,
    devices,
    locations,
    fallback_queries,
    created_at,
    updated_at
"#;

#[async_trait]
impl AnalyticsRepository for PostgresAnalyticsRepository {
    async fn ensure_for_day(
        &self,
        chatbot_id: Uuid,
        date: NaiveDate,
    ) -> Result<BotAnalytics, Error> {
        let fresh = BotAnalytics::new_for_day(chatbot_id, date);
        sqlx::query(
            r#"
            INSERT INTO bot_analytics (
                analytics_id, chatbot_id, date, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (chatbot_id, date) DO NOTHING
            "#,
        )
        .bind(fresh.analytics_id)
        .bind(chatbot_id)
        .bind(date)
        .bind(fresh.created_at)
        .bind(fresh.updated_at)
        .execute(&self.pool)
        .await?;

        self.get_for_day(chatbot_id, date).await?.ok_or_else(|| {
            Error::NotFound(format!("bot_analytics row for chatbot={chatbot_id} date={date}"))
        })
    }

    async fn record_activity(
        &self,
        chatbot_id: Uuid,
        date: NaiveDate,
        new_conversations: i64,
        new_user_messages: i64,
        new_bot_messages: i64,
    ) -> Result<(), Error> {
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO bot_analytics (
                analytics_id, chatbot_id, date,
                total_conversations, total_messages, user_messages, bot_messages,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            ON CONFLICT (chatbot_id, date) DO UPDATE
              SET total_conversations = bot_analytics.total_conversations + EXCLUDED.total_conversations,
                  total_messages      = bot_analytics.total_messages + EXCLUDED.total_messages,
                  user_messages       = bot_analytics.user_messages + EXCLUDED.user_messages,
                  bot_messages        = bot_analytics.bot_messages + EXCLUDED.bot_messages,
                  updated_at          = EXCLUDED.updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(chatbot_id)
        .bind(date)
        .bind(new_conversations)
        .bind(new_user_messages + new_bot_messages)
        .bind(new_user_messages)
        .bind(new_bot_messages)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn set_daily_rates(
        &self,
        chatbot_id: Uuid,
        date: NaiveDate,
        fallback_rate: f64,
        satisfaction_score: f64,
        avg_messages_per_conversation: f64,
    ) -> Result<(), Error> {
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO bot_analytics (
                analytics_id, chatbot_id, date,
                fallback_rate, satisfaction_score, avg_messages_per_conversation,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            ON CONFLICT (chatbot_id, date) DO UPDATE
              SET fallback_rate                 = EXCLUDED.fallback_rate,
                  satisfaction_score            = EXCLUDED.satisfaction_score,
                  avg_messages_per_conversation = EXCLUDED.avg_messages_per_conversation,
                  updated_at                    = EXCLUDED.updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(chatbot_id)
        .bind(date)
        .bind(fallback_rate)
        .bind(satisfaction_score)
        .bind(avg_messages_per_conversation)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn merge_buckets(
        &self,
        chatbot_id: Uuid,
        date: NaiveDate,
        kind: BucketKind,
        deltas: &[BucketCount],
    ) -> Result<(), Error> {
        if deltas.is_empty() {
            return Ok(());
        }

        // Read-modify-write; the single external aggregation pipeline is
        // the only writer, so no two merges race on one row.
        let current = self.ensure_for_day(chatbot_id, date).await?;
        let merged = merge_bucket_lists(current.bucket_list(kind), deltas, kind);
        let merged_json = serde_json::to_value(&merged)?;

        // kind.column() is a fixed name from the enum, not caller input.
        let sql = format!(
            r#"
            UPDATE bot_analytics
            SET {} = $1,
                updated_at = $2
            WHERE chatbot_id = $3 AND date = $4
            "#,
            kind.column()
        );
        sqlx::query(&sql)
            .bind(merged_json)
            .bind(Utc::now())
            .bind(chatbot_id)
            .bind(date)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn get_for_day(
        &self,
        chatbot_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<BotAnalytics>, Error> {
        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM bot_analytics WHERE chatbot_id = $1 AND date = $2"
        ))
        .bind(chatbot_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        row.map(row_to_analytics).transpose()
    }

    async fn get_range(
        &self,
        chatbot_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<BotAnalytics>, Error> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {SELECT_COLUMNS} FROM bot_analytics
            WHERE chatbot_id = $1 AND date BETWEEN $2 AND $3
            ORDER BY date ASC
            "#
        ))
        .bind(chatbot_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_analytics).collect()
    }

    async fn get_latest(
        &self,
        chatbot_id: Uuid,
        limit: i64,
    ) -> Result<Vec<BotAnalytics>, Error> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {SELECT_COLUMNS} FROM bot_analytics
            WHERE chatbot_id = $1
            ORDER BY date DESC
            LIMIT $2
            "#
        ))
        .bind(chatbot_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_analytics).collect()
    }
}

fn row_to_analytics(row: PgRow) -> Result<BotAnalytics, Error> {
    Ok(BotAnalytics {
        analytics_id: row.try_get("analytics_id")?,
        chatbot_id: row.try_get("chatbot_id")?,
        date: row.try_get("date")?,
        total_conversations: row.try_get("total_conversations")?,
        total_messages: row.try_get("total_messages")?,
        user_messages: row.try_get("user_messages")?,
        bot_messages: row.try_get("bot_messages")?,
        avg_messages_per_conversation: row.try_get("avg_messages_per_conversation")?,
        fallback_rate: row.try_get("fallback_rate")?,
        satisfaction_score: row.try_get("satisfaction_score")?,
        hourly_distribution: buckets_from_json(row.try_get("hourly_distribution")?),
        top_intents: buckets_from_json(row.try_get("top_intents")?),
        sources: buckets_from_json(row.try_get("sources")?),
        devices: buckets_from_json(row.try_get("devices")?),
        locations: buckets_from_json(row.try_get("locations")?),
        fallback_queries: buckets_from_json(row.try_get("fallback_queries")?),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn buckets_from_json(value: Value) -> Vec<BucketCount> {
    serde_json::from_value(value).unwrap_or_default()
}
