use crate::config::mongo_conf::MongoConfig;
use crate::model::customer::Customer;
use crate::repository::repository_error::{page_offset, RepositoryError, RepositoryResult};
use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Regex};
use futures::stream::TryStreamExt;
use mongodb::options::FindOptions;
use tracing::{error, info};

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn create(&self, customer: Customer) -> RepositoryResult<Customer>;
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Customer>;
    async fn update(&self, id: ObjectId, customer: Customer) -> RepositoryResult<Customer>;
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()>;
    /// Sorted by name. `term` matches name, email or phone, case-insensitively.
    async fn search(&self, term: Option<&str>, page: u32, limit: u32) -> RepositoryResult<Vec<Customer>>;
}

pub struct MongoCustomerRepository {
    collection: mongodb::Collection<Customer>,
}

impl MongoCustomerRepository {
    pub async fn new(config: &MongoConfig) -> Result<Self, mongodb::error::Error> {
        let db = config.connect().await?;
        let collection = db.collection::<Customer>(&config.customer_collection);
        Ok(MongoCustomerRepository { collection })
    }
}

#[async_trait]
impl CustomerRepository for MongoCustomerRepository {
    #[tracing::instrument(skip(self, customer), fields(name = %customer.name))]
    async fn create(&self, mut customer: Customer) -> RepositoryResult<Customer> {
        info!("Creating new customer");
        customer.id = Some(ObjectId::new());
        self.collection.insert_one(&customer, None).await.map_err(|e| {
            error!("Failed to create customer: {}", e);
            RepositoryError::from(e)
        })?;
        info!("Customer created successfully");
        Ok(customer)
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Customer> {
        match self.collection.find_one(doc! { "_id": id }, None).await {
            Ok(Some(customer)) => Ok(customer),
            Ok(None) => Err(RepositoryError::not_found(format!("Customer not found for ID: {}", id))),
            Err(e) => {
                error!("Failed to fetch customer: {}", e);
                Err(RepositoryError::database(format!("Failed to fetch customer: {}", e)))
            }
        }
    }

    #[tracing::instrument(skip(self, customer), fields(id = %id))]
    async fn update(&self, id: ObjectId, mut customer: Customer) -> RepositoryResult<Customer> {
        info!("Updating customer");
        customer.id = Some(id);
        let mut document = bson::to_document(&customer)?;
        document.remove("_id");

        let result = self
            .collection
            .update_one(doc! { "_id": id }, doc! { "$set": document }, None)
            .await
            .map_err(|e| {
                error!("Failed to update customer: {}", e);
                RepositoryError::database(format!("Failed to update customer: {}", e))
            })?;
        if result.matched_count == 0 {
            return Err(RepositoryError::not_found(format!("No customer found to update for ID: {}", id)));
        }
        Ok(customer)
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()> {
        info!("Deleting customer");
        let result = self.collection.delete_one(doc! { "_id": id }, None).await.map_err(|e| {
            error!("Failed to delete customer: {}", e);
            RepositoryError::database(format!("Failed to delete customer: {}", e))
        })?;
        if result.deleted_count == 0 {
            return Err(RepositoryError::not_found(format!("No customer found to delete for ID: {}", id)));
        }
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn search(&self, term: Option<&str>, page: u32, limit: u32) -> RepositoryResult<Vec<Customer>> {
        let filter = match term.map(str::trim).filter(|t| !t.is_empty()) {
            Some(term) => {
                let pattern = Regex {
                    pattern: regex::escape(term),
                    options: "i".to_string(),
                };
                doc! { "$or": [
                    { "name": pattern.clone() },
                    { "email": pattern.clone() },
                    { "phone": pattern },
                ] }
            }
            None => doc! {},
        };
        let options = FindOptions::builder()
            .sort(doc! { "name": 1 })
            .skip(page_offset(page, limit))
            .limit(i64::from(limit))
            .build();

        let cursor = self.collection.find(filter, options).await.map_err(|e| {
            error!("Failed to search customers: {}", e);
            RepositoryError::database(format!("Failed to search customers: {}", e))
        })?;
        let customers: Vec<Customer> = cursor.try_collect().await.map_err(|e| {
            error!("Failed to deserialize customer: {}", e);
            RepositoryError::serialization(format!("Failed to deserialize customer: {}", e))
        })?;
        info!("Fetched {} customers", customers.len());
        Ok(customers)
    }
}
