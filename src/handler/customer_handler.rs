use axum::{extract::{State, Path, Query}, response::IntoResponse, Json, http::StatusCode};
use std::sync::Arc;
use validator::Validate;

use crate::dto::customer_dto::{CustomerRequest, CustomerListQuery};
use crate::handler::quote_handler::{parse_object_id, page_params};
use crate::service::customer_service::{CustomerServiceImpl, CustomerService};
use crate::util::error::HandlerError;

pub async fn create_customer_handler(
    State(service): State<Arc<CustomerServiceImpl>>,
    Json(payload): Json<CustomerRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let payload = payload.normalized();
    payload.validate().map_err(HandlerError::validation)?;
    let customer = service.create_customer(payload).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

pub async fn list_customers_handler(
    State(service): State<Arc<CustomerServiceImpl>>,
    Query(query): Query<CustomerListQuery>,
) -> Result<impl IntoResponse, HandlerError> {
    let (page, limit) = page_params(query.page, query.limit);
    let customers = service.search_customers(query.search, page, limit).await?;
    Ok(Json(customers))
}

pub async fn get_customer_handler(
    State(service): State<Arc<CustomerServiceImpl>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let oid = parse_object_id(&id, "customer")?;
    Ok(Json(service.get_customer(oid).await?))
}

pub async fn update_customer_handler(
    State(service): State<Arc<CustomerServiceImpl>>,
    Path(id): Path<String>,
    Json(payload): Json<CustomerRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let oid = parse_object_id(&id, "customer")?;
    let payload = payload.normalized();
    payload.validate().map_err(HandlerError::validation)?;
    Ok(Json(service.update_customer(oid, payload).await?))
}

pub async fn delete_customer_handler(
    State(service): State<Arc<CustomerServiceImpl>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let oid = parse_object_id(&id, "customer")?;
    service.delete_customer(oid).await?;
    Ok(StatusCode::NO_CONTENT)
}
