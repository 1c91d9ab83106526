use axum::{extract::{State, Path, Query}, response::IntoResponse, Json, http::StatusCode};
use bson::oid::ObjectId;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, error};
use validator::Validate;

use crate::dto::quote_dto::{QuoteInput, QuoteListQuery, UpdateQuoteStatusRequest, ProfitRequest};
use crate::service::quote_service::{QuoteServiceImpl, QuoteService};
use crate::util::error::HandlerError;
use crate::util::profit::calculate_profit;
use crate::util::quote_health::evaluate_quote_health;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

pub(crate) fn parse_object_id(raw: &str, what: &str) -> Result<ObjectId, HandlerError> {
    ObjectId::parse_str(raw).map_err(|_| HandlerError::invalid_id(what))
}

pub(crate) fn page_params(page: Option<u32>, limit: Option<u32>) -> (u32, u32) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    (page, limit)
}

fn validated(input: QuoteInput) -> Result<QuoteInput, HandlerError> {
    let input = input.normalized();
    input.validate().map_err(HandlerError::validation)?;
    Ok(input)
}

pub async fn create_quote_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Json(payload): Json<QuoteInput>,
) -> Result<impl IntoResponse, HandlerError> {
    let payload = validated(payload)?;
    let quote = service.create_quote(payload).await.map_err(|e| {
        error!("[create_quote_handler] Failed to create quote: {}", e);
        HandlerError::from(e)
    })?;
    info!("[create_quote_handler] Created quote {}", quote.quote_number);
    Ok((StatusCode::CREATED, Json(quote)))
}

pub async fn list_quotes_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Query(query): Query<QuoteListQuery>,
) -> Result<impl IntoResponse, HandlerError> {
    let (page, limit) = page_params(query.page, query.limit);
    let quotes = service.list_quotes(query.status, page, limit).await?;
    Ok(Json(quotes))
}

pub async fn get_quote_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let oid = parse_object_id(&id, "quote")?;
    let quote = service.get_quote(oid).await?;
    Ok(Json(quote))
}

pub async fn update_quote_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Path(id): Path<String>,
    Json(payload): Json<QuoteInput>,
) -> Result<impl IntoResponse, HandlerError> {
    let oid = parse_object_id(&id, "quote")?;
    let payload = validated(payload)?;
    let quote = service.update_quote(oid, payload).await?;
    Ok(Json(quote))
}

pub async fn update_quote_status_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateQuoteStatusRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let oid = parse_object_id(&id, "quote")?;
    let quote = service.update_quote_status(oid, payload.status).await?;
    Ok(Json(quote))
}

pub async fn delete_quote_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let oid = parse_object_id(&id, "quote")?;
    service.delete_quote(oid).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn quote_health_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let oid = parse_object_id(&id, "quote")?;
    let warnings = service.quote_health(oid).await?;
    Ok(Json(warnings))
}

pub async fn quote_profit_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let oid = parse_object_id(&id, "quote")?;
    let breakdown = service.quote_profit(oid).await?;
    Ok(Json(breakdown))
}

/// Health check of an unsaved quote form.
pub async fn evaluate_health_handler(
    Json(payload): Json<QuoteInput>,
) -> Result<impl IntoResponse, HandlerError> {
    let payload = payload.normalized();
    let line_items = payload.line_items().map_err(HandlerError::bad_request)?;
    let warnings = evaluate_quote_health(
        &payload.customer_name,
        payload.customer_email.as_deref().unwrap_or_default(),
        &line_items,
        payload.labor_hours,
        payload.markup_percent,
    );
    Ok(Json(warnings))
}

pub async fn calculate_profit_handler(
    Json(payload): Json<ProfitRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload.validate().map_err(HandlerError::validation)?;
    Ok(Json(calculate_profit(payload.material_cost, payload.labor_cost, payload.total)))
}

pub async fn attention_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
) -> Result<impl IntoResponse, HandlerError> {
    let items = service.attention(Utc::now()).await?;
    Ok(Json(items))
}

pub async fn summary_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.summary().await?))
}

pub async fn save_draft_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Path(id): Path<String>,
    Json(payload): Json<QuoteInput>,
) -> Result<impl IntoResponse, HandlerError> {
    let oid = parse_object_id(&id, "quote")?;
    let payload = validated(payload)?;
    let snapshot = service.save_draft(oid, payload).await?;
    Ok((StatusCode::ACCEPTED, Json(snapshot)))
}

pub async fn flush_draft_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let oid = parse_object_id(&id, "quote")?;
    let snapshot = service.flush_draft(oid).await?;
    Ok(Json(snapshot))
}

pub async fn draft_status_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let oid = parse_object_id(&id, "quote")?;
    match service.draft_status(oid) {
        Some(snapshot) => Ok(Json(snapshot)),
        None => Err(HandlerError::not_found(format!("No draft session for quote {}", id))),
    }
}

pub async fn discard_draft_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let oid = parse_object_id(&id, "quote")?;
    if service.discard_draft(oid) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(HandlerError::not_found(format!("No draft session for quote {}", id)))
    }
}
