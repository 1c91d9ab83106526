use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::model::quote::{Quote, QuoteStatus};
use crate::util::format::time_since;

pub const STALE_AFTER_DAYS: i64 = 3;
pub const MAX_FOLLOW_UPS: usize = 3;
pub const MAX_STALE_DRAFTS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttentionReason {
    FollowUp,
    StaleDraft,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttentionItem {
    pub reason: AttentionReason,
    pub quote_id: Option<String>,
    pub quote_number: String,
    pub customer_name: String,
    pub total: f64,
    pub updated_at: DateTime<Utc>,
    pub note: String,
}

impl AttentionItem {
    fn new(quote: &Quote, reason: AttentionReason, note: String) -> Self {
        AttentionItem {
            reason,
            quote_id: quote.id.map(|id| id.to_hex()),
            quote_number: quote.quote_number.clone(),
            customer_name: quote.customer_name.clone(),
            total: quote.total,
            updated_at: quote.updated_at,
            note,
        }
    }
}

/// Sent quotes waiting on the customer (oldest first) followed by drafts
/// nobody has touched, each bucket capped separately.
pub fn triage_attention(quotes: &[Quote], now: DateTime<Utc>) -> Vec<AttentionItem> {
    let stale_threshold = now - Duration::days(STALE_AFTER_DAYS);

    let mut follow_up: Vec<&Quote> = quotes
        .iter()
        .filter(|q| q.status == QuoteStatus::Sent && q.updated_at < stale_threshold)
        .collect();
    follow_up.sort_by_key(|q| q.updated_at);

    let stale_drafts = quotes
        .iter()
        .filter(|q| q.status == QuoteStatus::Draft && q.updated_at < stale_threshold)
        .take(MAX_STALE_DRAFTS);

    follow_up
        .into_iter()
        .take(MAX_FOLLOW_UPS)
        .map(|q| {
            let note = format!("Sent {}", time_since(q.updated_at, now));
            AttentionItem::new(q, AttentionReason::FollowUp, note)
        })
        .chain(stale_drafts.map(|q| {
            AttentionItem::new(q, AttentionReason::StaleDraft, "Old draft".to_string())
        }))
        .collect()
}
