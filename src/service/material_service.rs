use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::Utc;
use tracing::{error, info, instrument};

use crate::dto::material_dto::MaterialRequest;
use crate::model::material::{Material, MaterialCategory};
use crate::repository::material_repo::MaterialRepository;
use crate::util::error::ServiceError;

#[async_trait]
pub trait MaterialService: Send + Sync {
    async fn create_material(&self, request: MaterialRequest) -> Result<Material, ServiceError>;
    async fn get_material(&self, id: ObjectId) -> Result<Material, ServiceError>;
    async fn update_material(&self, id: ObjectId, request: MaterialRequest) -> Result<Material, ServiceError>;
    async fn delete_material(&self, id: ObjectId) -> Result<(), ServiceError>;
    async fn list_materials(&self, category: Option<MaterialCategory>) -> Result<Vec<Material>, ServiceError>;
}

pub struct MaterialServiceImpl {
    pub material_repo: Arc<dyn MaterialRepository>,
}

impl MaterialServiceImpl {
    pub fn new(material_repo: Arc<dyn MaterialRepository>) -> Self {
        MaterialServiceImpl { material_repo }
    }
}

#[async_trait]
impl MaterialService for MaterialServiceImpl {
    #[instrument(skip(self, request), fields(name = %request.name))]
    async fn create_material(&self, request: MaterialRequest) -> Result<Material, ServiceError> {
        let now = Utc::now();
        let res = self.material_repo.create(request.into_material(now, now)).await;
        match &res {
            Ok(_) => info!("Material added to catalog"),
            Err(e) => error!("Failed to add material: {e}"),
        }
        res.map_err(ServiceError::from)
    }

    async fn get_material(&self, id: ObjectId) -> Result<Material, ServiceError> {
        self.material_repo.get_by_id(id).await.map_err(ServiceError::from)
    }

    #[instrument(skip(self, request), fields(id = %id))]
    async fn update_material(&self, id: ObjectId, request: MaterialRequest) -> Result<Material, ServiceError> {
        let existing = self.material_repo.get_by_id(id).await.map_err(ServiceError::from)?;
        let material = request.into_material(existing.created_at, Utc::now());
        let res = self.material_repo.update(id, material).await;
        if let Err(e) = &res {
            error!("Failed to update material: {e}");
        }
        res.map_err(ServiceError::from)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete_material(&self, id: ObjectId) -> Result<(), ServiceError> {
        self.material_repo.delete(id).await.map_err(ServiceError::from)
    }

    async fn list_materials(&self, category: Option<MaterialCategory>) -> Result<Vec<Material>, ServiceError> {
        self.material_repo.list(category).await.map_err(ServiceError::from)
    }
}
