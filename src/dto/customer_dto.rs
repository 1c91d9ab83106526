use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::customer::Customer;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CustomerRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(min = 6, max = 30))]
    pub phone: Option<String>,

    #[validate(length(max = 500))]
    pub address: Option<String>,
}

impl CustomerRequest {
    pub fn normalized(mut self) -> Self {
        let blank_to_none = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        self.name = self.name.trim().to_string();
        self.email = blank_to_none(self.email);
        self.phone = blank_to_none(self.phone);
        self.address = blank_to_none(self.address);
        self
    }

    pub fn into_customer(self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Customer {
        Customer {
            id: None,
            name: self.name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            created_at,
            updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerListQuery {
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}
