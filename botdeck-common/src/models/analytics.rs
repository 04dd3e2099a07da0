use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One `(label, count)` entry inside an aggregate collection, e.g.
/// `("pricing", 42)` in the top-intents list or `("14", 7)` in the
/// hourly distribution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketCount {
    pub label: String,
    pub count: i64,
}

impl BucketCount {
    pub fn new(label: impl Into<String>, count: i64) -> Self {
        Self { label: label.into(), count }
    }
}

/// Which bucket collection of a daily aggregate an update targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BucketKind {
    Hourly,
    Intents,
    Sources,
    Devices,
    Locations,
    FallbackQueries,
}

impl BucketKind {
    /// Column name in the `bot_analytics` table.
    pub fn column(&self) -> &'static str {
        match self {
            BucketKind::Hourly => "hourly_distribution",
            BucketKind::Intents => "top_intents",
            BucketKind::Sources => "sources",
            BucketKind::Devices => "devices",
            BucketKind::Locations => "locations",
            BucketKind::FallbackQueries => "fallback_queries",
        }
    }
}

/// Daily usage aggregate for one chatbot. Exactly one row exists per
/// `(chatbot_id, date)` pair; rows are created on first activity of the
/// day, updated incrementally, and never deleted by this layer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BotAnalytics {
    pub analytics_id: Uuid,
    pub chatbot_id: Uuid,
    pub date: NaiveDate,

    pub total_conversations: i64,
    pub total_messages: i64,
    pub user_messages: i64,
    pub bot_messages: i64,

    pub avg_messages_per_conversation: f64,
    /// Share of user messages the bot could not answer, in [0, 1].
    pub fallback_rate: f64,
    /// Mean post-conversation rating, in [0, 5].
    pub satisfaction_score: f64,

    pub hourly_distribution: Vec<BucketCount>,
    pub top_intents: Vec<BucketCount>,
    pub sources: Vec<BucketCount>,
    pub devices: Vec<BucketCount>,
    pub locations: Vec<BucketCount>,
    pub fallback_queries: Vec<BucketCount>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BotAnalytics {
    /// Fresh zeroed aggregate for the given chatbot/day.
    pub fn new_for_day(chatbot_id: Uuid, date: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            analytics_id: Uuid::new_v4(),
            chatbot_id,
            date,
            total_conversations: 0,
            total_messages: 0,
            user_messages: 0,
            bot_messages: 0,
            avg_messages_per_conversation: 0.0,
            fallback_rate: 0.0,
            satisfaction_score: 0.0,
            hourly_distribution: Vec::new(),
            top_intents: Vec::new(),
            sources: Vec::new(),
            devices: Vec::new(),
            locations: Vec::new(),
            fallback_queries: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn bucket_list(&self, kind: BucketKind) -> &[BucketCount] {
        match kind {
            BucketKind::Hourly => &self.hourly_distribution,
            BucketKind::Intents => &self.top_intents,
            BucketKind::Sources => &self.sources,
            BucketKind::Devices => &self.devices,
            BucketKind::Locations => &self.locations,
            BucketKind::FallbackQueries => &self.fallback_queries,
        }
    }
}

/// Merge `deltas` into `existing`, summing counts by label.
///
/// Hourly buckets stay sorted by label so "00".."23" keep their natural
/// order; every other collection is sorted by descending count (ties by
/// label) so the "top N" reading of the list holds.
pub fn merge_bucket_lists(
    existing: &[BucketCount],
    deltas: &[BucketCount],
    kind: BucketKind,
) -> Vec<BucketCount> {
    let mut merged: Vec<BucketCount> = existing.to_vec();
    for delta in deltas {
        match merged.iter_mut().find(|b| b.label == delta.label) {
            Some(entry) => entry.count += delta.count,
            None => merged.push(delta.clone()),
        }
    }
    match kind {
        BucketKind::Hourly => merged.sort_by(|a, b| a.label.cmp(&b.label)),
        _ => merged.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label))),
    }
    merged
}
