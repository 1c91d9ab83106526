use bson::oid::ObjectId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    Draft,
    Sent,
    Accepted,
    Declined,
    Expired,
}

impl QuoteStatus {
    pub const ALL: [QuoteStatus; 5] = [
        QuoteStatus::Draft,
        QuoteStatus::Sent,
        QuoteStatus::Accepted,
        QuoteStatus::Declined,
        QuoteStatus::Expired,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Draft => "draft",
            QuoteStatus::Sent => "sent",
            QuoteStatus::Accepted => "accepted",
            QuoteStatus::Declined => "declined",
            QuoteStatus::Expired => "expired",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

impl std::fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// UUID string, stable across edits of the same row
    pub id: String,
    pub material_id: Option<ObjectId>,
    pub name: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub unit_type: Option<String>,
}

impl LineItem {
    pub fn new(name: impl Into<String>, quantity: f64, unit_price: f64) -> Self {
        LineItem {
            id: Uuid::new_v4().to_string(),
            material_id: None,
            name: name.into(),
            quantity,
            unit_price,
            unit_type: None,
        }
    }

    /// Always derived from quantity and unit price, never stored.
    pub fn subtotal(&self) -> f64 {
        self.quantity * self.unit_price
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub quote_number: String,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_address: Option<String>,
    pub status: QuoteStatus,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    pub labor_hours: f64,
    pub labor_rate: f64,
    pub markup_percent: f64,
    pub notes: Option<String>,
    pub valid_until: Option<NaiveDate>,
    pub total: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Quote {
    pub fn material_cost(&self) -> f64 {
        self.line_items.iter().map(LineItem::subtotal).sum()
    }

    pub fn labor_cost(&self) -> f64 {
        self.labor_hours * self.labor_rate
    }

    /// Price after markup, rounded to cents.
    pub fn computed_total(&self) -> f64 {
        let cost = self.material_cost() + self.labor_cost();
        round_cents(cost * (1.0 + self.markup_percent / 100.0))
    }

    pub fn recompute_total(&mut self) {
        self.total = self.computed_total();
    }
}

pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
