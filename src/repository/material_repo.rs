use crate::config::mongo_conf::MongoConfig;
use crate::model::material::{Material, MaterialCategory};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use futures::stream::TryStreamExt;
use mongodb::options::FindOptions;
use tracing::{error, info};

#[async_trait]
pub trait MaterialRepository: Send + Sync {
    async fn create(&self, material: Material) -> RepositoryResult<Material>;
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Material>;
    async fn update(&self, id: ObjectId, material: Material) -> RepositoryResult<Material>;
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()>;
    /// Catalog sorted by category then name.
    async fn list(&self, category: Option<MaterialCategory>) -> RepositoryResult<Vec<Material>>;
}

pub struct MongoMaterialRepository {
    collection: mongodb::Collection<Material>,
}

impl MongoMaterialRepository {
    pub async fn new(config: &MongoConfig) -> Result<Self, mongodb::error::Error> {
        let db = config.connect().await?;
        let collection = db.collection::<Material>(&config.material_collection);
        Ok(MongoMaterialRepository { collection })
    }
}

#[async_trait]
impl MaterialRepository for MongoMaterialRepository {
    #[tracing::instrument(skip(self, material), fields(name = %material.name, category = %material.category.as_str()))]
    async fn create(&self, mut material: Material) -> RepositoryResult<Material> {
        info!("Adding material to catalog");
        material.id = Some(ObjectId::new());
        match self.collection.insert_one(&material, None).await {
            Ok(_) => Ok(material),
            Err(e) => {
                error!("Failed to create material: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Material> {
        match self.collection.find_one(doc! { "_id": id }, None).await {
            Ok(Some(material)) => Ok(material),
            Ok(None) => Err(RepositoryError::not_found(format!("Material not found for ID: {}", id))),
            Err(e) => {
                error!("Failed to fetch material: {}", e);
                Err(RepositoryError::database(format!("Failed to fetch material: {}", e)))
            }
        }
    }

    #[tracing::instrument(skip(self, material), fields(id = %id))]
    async fn update(&self, id: ObjectId, mut material: Material) -> RepositoryResult<Material> {
        info!("Updating material");
        material.id = Some(id);
        let mut document = bson::to_document(&material)?;
        document.remove("_id");

        match self.collection.update_one(doc! { "_id": id }, doc! { "$set": document }, None).await {
            Ok(result) if result.matched_count > 0 => Ok(material),
            Ok(_) => Err(RepositoryError::not_found(format!("No material found to update for ID: {}", id))),
            Err(e) => {
                error!("Failed to update material: {}", e);
                Err(RepositoryError::database(format!("Failed to update material: {}", e)))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()> {
        info!("Removing material from catalog");
        match self.collection.delete_one(doc! { "_id": id }, None).await {
            Ok(result) if result.deleted_count > 0 => Ok(()),
            Ok(_) => Err(RepositoryError::not_found(format!("No material found to delete for ID: {}", id))),
            Err(e) => {
                error!("Failed to delete material: {}", e);
                Err(RepositoryError::database(format!("Failed to delete material: {}", e)))
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn list(&self, category: Option<MaterialCategory>) -> RepositoryResult<Vec<Material>> {
        let filter = match category {
            Some(category) => doc! { "category": bson::to_bson(&category)? },
            None => doc! {},
        };
        let options = FindOptions::builder().sort(doc! { "category": 1, "name": 1 }).build();

        let cursor = self.collection.find(filter, options).await.map_err(|e| {
            error!("Failed to list materials: {}", e);
            RepositoryError::database(format!("Failed to list materials: {}", e))
        })?;
        let materials: Vec<Material> = cursor.try_collect().await.map_err(|e| {
            error!("Failed to deserialize material: {}", e);
            RepositoryError::serialization(format!("Failed to deserialize material: {}", e))
        })?;
        info!("Fetched {} materials", materials.len());
        Ok(materials)
    }
}
