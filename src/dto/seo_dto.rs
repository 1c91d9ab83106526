use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServiceOffering {
    #[validate(length(min = 2, max = 120))]
    pub name: String,

    #[validate(length(min = 2, max = 2000))]
    pub description: String,

    /// Site-relative or absolute URL of the service page
    #[validate(length(min = 1, max = 500))]
    pub url: String,

    pub service_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FaqEntry {
    #[validate(length(min = 2, max = 500))]
    pub question: String,

    #[validate(length(min = 1, max = 5000))]
    pub answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Breadcrumb {
    #[validate(length(min = 1, max = 120))]
    pub name: String,

    #[validate(length(min = 1, max = 500))]
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FaqRequest {
    #[validate(length(min = 1), nested)]
    pub entries: Vec<FaqEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BreadcrumbRequest {
    #[validate(length(min = 1), nested)]
    pub items: Vec<Breadcrumb>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct IndexNowRequest {
    #[validate(length(min = 1, max = 10000))]
    pub urls: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexNowResponse {
    pub submitted: usize,
    pub success: bool,
}
