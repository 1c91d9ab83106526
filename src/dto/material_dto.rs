use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::material::{Material, MaterialCategory};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MaterialRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    pub category: MaterialCategory,

    #[validate(range(min = 0.0))]
    pub unit_price: f64,

    /// e.g. "ft", "each", "box"
    #[validate(length(min = 1, max = 30))]
    pub unit_type: String,

    #[validate(length(max = 200))]
    pub supplier: Option<String>,
}

impl MaterialRequest {
    pub fn into_material(self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Material {
        Material {
            id: None,
            name: self.name.trim().to_string(),
            category: self.category,
            unit_price: self.unit_price,
            unit_type: self.unit_type.trim().to_string(),
            supplier: self.supplier.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
            created_at,
            updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MaterialListQuery {
    pub category: Option<MaterialCategory>,
}
