use axum::{extract::{State, Path, Query}, response::IntoResponse, Json, http::StatusCode};
use std::sync::Arc;
use validator::Validate;

use crate::dto::material_dto::{MaterialRequest, MaterialListQuery};
use crate::handler::quote_handler::parse_object_id;
use crate::service::material_service::{MaterialServiceImpl, MaterialService};
use crate::util::error::HandlerError;

pub async fn create_material_handler(
    State(service): State<Arc<MaterialServiceImpl>>,
    Json(payload): Json<MaterialRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload.validate().map_err(HandlerError::validation)?;
    let material = service.create_material(payload).await?;
    Ok((StatusCode::CREATED, Json(material)))
}

pub async fn list_materials_handler(
    State(service): State<Arc<MaterialServiceImpl>>,
    Query(query): Query<MaterialListQuery>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.list_materials(query.category).await?))
}

pub async fn get_material_handler(
    State(service): State<Arc<MaterialServiceImpl>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let oid = parse_object_id(&id, "material")?;
    Ok(Json(service.get_material(oid).await?))
}

pub async fn update_material_handler(
    State(service): State<Arc<MaterialServiceImpl>>,
    Path(id): Path<String>,
    Json(payload): Json<MaterialRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let oid = parse_object_id(&id, "material")?;
    payload.validate().map_err(HandlerError::validation)?;
    Ok(Json(service.update_material(oid, payload).await?))
}

pub async fn delete_material_handler(
    State(service): State<Arc<MaterialServiceImpl>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let oid = parse_object_id(&id, "material")?;
    service.delete_material(oid).await?;
    Ok(StatusCode::NO_CONTENT)
}
