use axum::{extract::State, response::{Html, IntoResponse}, Json};
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

use crate::config::BusinessConfig;
use crate::dto::seo_dto::{BreadcrumbRequest, FaqRequest, IndexNowRequest, IndexNowResponse, ServiceOffering};
use crate::util::error::HandlerError;
use crate::util::index_now::IndexNowClient;
use crate::util::structured_data::{breadcrumbs, faq, local_business, service, to_script_tag};

pub struct SeoState {
    pub business: BusinessConfig,
    /// Absent when INDEXNOW_* is not configured.
    pub index_now: Option<IndexNowClient>,
}

pub async fn business_data_handler(
    State(state): State<Arc<SeoState>>,
) -> impl IntoResponse {
    Json(local_business(&state.business))
}

pub async fn business_script_handler(
    State(state): State<Arc<SeoState>>,
) -> impl IntoResponse {
    Html(to_script_tag(&local_business(&state.business)))
}

pub async fn service_data_handler(
    State(state): State<Arc<SeoState>>,
    Json(payload): Json<ServiceOffering>,
) -> Result<impl IntoResponse, HandlerError> {
    payload.validate().map_err(HandlerError::validation)?;
    Ok(Json(service(&state.business, &payload)))
}

pub async fn faq_data_handler(
    Json(payload): Json<FaqRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload.validate().map_err(HandlerError::validation)?;
    Ok(Json(faq(&payload.entries)))
}

pub async fn breadcrumbs_data_handler(
    State(state): State<Arc<SeoState>>,
    Json(payload): Json<BreadcrumbRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload.validate().map_err(HandlerError::validation)?;
    Ok(Json(breadcrumbs(&state.business, &payload.items)))
}

pub async fn index_now_handler(
    State(state): State<Arc<SeoState>>,
    Json(payload): Json<IndexNowRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload.validate().map_err(HandlerError::validation)?;

    let Some(client) = &state.index_now else {
        warn!("[index_now_handler] IndexNow is not configured, nothing submitted");
        return Ok(Json(IndexNowResponse { submitted: 0, success: false }));
    };

    let success = client.submit(&payload.urls).await;
    info!("[index_now_handler] Submitted {} URL(s), success={}", payload.urls.len(), success);
    Ok(Json(IndexNowResponse { submitted: payload.urls.len(), success }))
}
