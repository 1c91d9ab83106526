use std::collections::BTreeMap;

use bson::oid::ObjectId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::model::quote::{LineItem, Quote, QuoteStatus};
use crate::util::profit::ProfitBreakdown;
use crate::util::quote_health::HealthWarning;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LineItemInput {
    /// Keeps the row identity when editing; a fresh id is minted when absent.
    pub id: Option<String>,

    /// Hex ObjectId of the catalog material this row was picked from
    pub material_id: Option<String>,

    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(range(min = 0.0))]
    pub quantity: f64,

    #[validate(range(min = 0.0))]
    pub unit_price: f64,

    pub unit_type: Option<String>,
}

impl LineItemInput {
    pub fn into_line_item(self) -> Result<LineItem, String> {
        let material_id = match self.material_id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => Some(ObjectId::parse_str(raw).map_err(|_| format!("Invalid material id: {}", raw))?),
            None => None,
        };
        Ok(LineItem {
            id: self.id.filter(|id| !id.trim().is_empty()).unwrap_or_else(|| Uuid::new_v4().to_string()),
            material_id,
            name: self.name.trim().to_string(),
            quantity: self.quantity,
            unit_price: self.unit_price,
            unit_type: self.unit_type,
        })
    }
}

/// Editable fields of a quote, used for create, full update, drafts and
/// health checks of unsaved forms.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct QuoteInput {
    #[serde(default)]
    #[validate(length(max = 200))]
    pub customer_name: String,

    #[validate(email)]
    pub customer_email: Option<String>,

    #[validate(length(min = 6, max = 30))]
    pub customer_phone: Option<String>,

    #[validate(length(max = 500))]
    pub customer_address: Option<String>,

    #[serde(default)]
    #[validate(nested)]
    pub line_items: Vec<LineItemInput>,

    #[serde(default)]
    #[validate(range(min = 0.0, max = 10000.0))]
    pub labor_hours: f64,

    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub labor_rate: f64,

    #[serde(default)]
    #[validate(range(min = 0.0, max = 1000.0))]
    pub markup_percent: f64,

    #[validate(length(max = 5000))]
    pub notes: Option<String>,

    pub valid_until: Option<NaiveDate>,

    /// Initial status on create; ignored on update
    pub status: Option<QuoteStatus>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl QuoteInput {
    /// Turns blank optional strings into `None` so they skip validation.
    pub fn normalized(mut self) -> Self {
        self.customer_name = self.customer_name.trim().to_string();
        self.customer_email = non_blank(self.customer_email);
        self.customer_phone = non_blank(self.customer_phone);
        self.customer_address = non_blank(self.customer_address);
        self.notes = non_blank(self.notes);
        self
    }

    pub fn line_items(&self) -> Result<Vec<LineItem>, String> {
        self.line_items.iter().cloned().map(LineItemInput::into_line_item).collect()
    }

    /// Writes the editable fields over `quote` and recomputes its total.
    pub fn apply_to(&self, quote: &mut Quote, now: DateTime<Utc>) -> Result<(), String> {
        quote.customer_name = self.customer_name.clone();
        quote.customer_email = self.customer_email.clone();
        quote.customer_phone = self.customer_phone.clone();
        quote.customer_address = self.customer_address.clone();
        quote.line_items = self.line_items()?;
        quote.labor_hours = self.labor_hours;
        quote.labor_rate = self.labor_rate;
        quote.markup_percent = self.markup_percent;
        quote.notes = self.notes.clone();
        quote.valid_until = self.valid_until;
        quote.updated_at = now;
        quote.recompute_total();
        Ok(())
    }

    pub fn into_new_quote(self, quote_number: String, now: DateTime<Utc>) -> Result<Quote, String> {
        let mut quote = Quote {
            id: None,
            quote_number,
            customer_name: String::new(),
            customer_email: None,
            customer_phone: None,
            customer_address: None,
            status: self.status.unwrap_or(QuoteStatus::Draft),
            line_items: Vec::new(),
            labor_hours: 0.0,
            labor_rate: 0.0,
            markup_percent: 0.0,
            notes: None,
            valid_until: None,
            total: 0.0,
            created_at: now,
            updated_at: now,
        };
        self.apply_to(&mut quote, now)?;
        Ok(quote)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateQuoteStatusRequest {
    pub status: QuoteStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProfitRequest {
    #[validate(range(min = 0.0))]
    pub material_cost: f64,

    #[validate(range(min = 0.0))]
    pub labor_cost: f64,

    #[validate(range(min = 0.0))]
    pub total: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuoteListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<QuoteStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItemView {
    #[serde(flatten)]
    pub item: LineItem,
    pub subtotal: f64,
}

/// A quote with everything the editor shows next to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteResponseDto {
    pub quote: Quote,
    pub line_items: Vec<LineItemView>,
    pub total_display: String,
    pub last_updated: String,
    pub warnings: Vec<HealthWarning>,
    pub profit: ProfitBreakdown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteSummary {
    pub counts: BTreeMap<String, u64>,
    pub pipeline_value: f64,
    pub won_value: f64,
    pub win_rate_percent: f64,
}
