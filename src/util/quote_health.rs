use serde::{Deserialize, Serialize};

use crate::model::quote::LineItem;

/// Markup under this (but above zero) gets a low-profit warning.
pub const LOW_MARKUP_PERCENT: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthWarning {
    pub severity: Severity,
    pub message: String,
}

impl HealthWarning {
    fn error(message: impl Into<String>) -> Self {
        HealthWarning { severity: Severity::Error, message: message.into() }
    }

    fn warning(message: impl Into<String>) -> Self {
        HealthWarning { severity: Severity::Warning, message: message.into() }
    }
}

/// Checks a quote in a fixed order. An empty result means nothing to show.
pub fn evaluate_quote_health(
    customer_name: &str,
    customer_email: &str,
    line_items: &[LineItem],
    labor_hours: f64,
    markup_percent: f64,
) -> Vec<HealthWarning> {
    let mut warnings = Vec::new();

    if customer_name.trim().is_empty() {
        warnings.push(HealthWarning::error("Customer name is required"));
    }

    if line_items.is_empty() {
        warnings.push(HealthWarning::warning("No materials added to quote"));
    }

    let zero_quantity = line_items.iter().filter(|item| item.quantity <= 0.0).count();
    if zero_quantity > 0 {
        warnings.push(HealthWarning::warning(format!(
            "{} item(s) with zero quantity",
            zero_quantity
        )));
    }

    if !line_items.is_empty() && labor_hours == 0.0 {
        warnings.push(HealthWarning::warning("No labor hours entered"));
    }

    if markup_percent > 0.0 && markup_percent < LOW_MARKUP_PERCENT {
        warnings.push(HealthWarning::warning("Markup below 20% - low profit margin"));
    }

    if customer_email.trim().is_empty() {
        warnings.push(HealthWarning::warning("No email - quote cannot be emailed"));
    }

    warnings
}
