use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialCategory {
    Wiring,
    Panels,
    Lighting,
    EvChargers,
    Fixtures,
    Misc,
}

impl MaterialCategory {
    pub const ALL: [MaterialCategory; 6] = [
        MaterialCategory::Wiring,
        MaterialCategory::Panels,
        MaterialCategory::Lighting,
        MaterialCategory::EvChargers,
        MaterialCategory::Fixtures,
        MaterialCategory::Misc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialCategory::Wiring => "wiring",
            MaterialCategory::Panels => "panels",
            MaterialCategory::Lighting => "lighting",
            MaterialCategory::EvChargers => "ev_chargers",
            MaterialCategory::Fixtures => "fixtures",
            MaterialCategory::Misc => "misc",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MaterialCategory::Wiring => "Wiring",
            MaterialCategory::Panels => "Panels",
            MaterialCategory::Lighting => "Lighting",
            MaterialCategory::EvChargers => "EV Chargers",
            MaterialCategory::Fixtures => "Fixtures",
            MaterialCategory::Misc => "Misc",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub category: MaterialCategory,
    pub unit_price: f64,
    pub unit_type: String,
    pub supplier: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
