use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::Utc;
use tracing::{error, info, instrument};

use crate::dto::customer_dto::CustomerRequest;
use crate::model::customer::Customer;
use crate::repository::customer_repo::CustomerRepository;
use crate::util::error::ServiceError;

#[async_trait]
pub trait CustomerService: Send + Sync {
    async fn create_customer(&self, request: CustomerRequest) -> Result<Customer, ServiceError>;
    async fn get_customer(&self, id: ObjectId) -> Result<Customer, ServiceError>;
    async fn update_customer(&self, id: ObjectId, request: CustomerRequest) -> Result<Customer, ServiceError>;
    async fn delete_customer(&self, id: ObjectId) -> Result<(), ServiceError>;
    async fn search_customers(&self, term: Option<String>, page: u32, limit: u32) -> Result<Vec<Customer>, ServiceError>;
}

pub struct CustomerServiceImpl {
    pub customer_repo: Arc<dyn CustomerRepository>,
}

impl CustomerServiceImpl {
    pub fn new(customer_repo: Arc<dyn CustomerRepository>) -> Self {
        CustomerServiceImpl { customer_repo }
    }
}

#[async_trait]
impl CustomerService for CustomerServiceImpl {
    #[instrument(skip(self, request), fields(name = %request.name))]
    async fn create_customer(&self, request: CustomerRequest) -> Result<Customer, ServiceError> {
        info!("Creating customer");
        let now = Utc::now();
        let res = self.customer_repo.create(request.normalized().into_customer(now, now)).await;
        match &res {
            Ok(_) => info!("Customer created successfully"),
            Err(e) => error!("Failed to create customer: {e}"),
        }
        res.map_err(ServiceError::from)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_customer(&self, id: ObjectId) -> Result<Customer, ServiceError> {
        self.customer_repo.get_by_id(id).await.map_err(ServiceError::from)
    }

    #[instrument(skip(self, request), fields(id = %id))]
    async fn update_customer(&self, id: ObjectId, request: CustomerRequest) -> Result<Customer, ServiceError> {
        info!("Updating customer");
        let existing = self.customer_repo.get_by_id(id).await.map_err(ServiceError::from)?;
        let customer = request.normalized().into_customer(existing.created_at, Utc::now());

        let res = self.customer_repo.update(id, customer).await;
        if let Err(e) = &res {
            error!("Failed to update customer: {e}");
        }
        res.map_err(ServiceError::from)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete_customer(&self, id: ObjectId) -> Result<(), ServiceError> {
        info!("Deleting customer");
        self.customer_repo.delete(id).await.map_err(ServiceError::from)
    }

    #[instrument(skip(self))]
    async fn search_customers(&self, term: Option<String>, page: u32, limit: u32) -> Result<Vec<Customer>, ServiceError> {
        let term = term.as_deref().map(str::trim).filter(|t| !t.is_empty());
        let res = self.customer_repo.search(term, page, limit).await;
        match &res {
            Ok(customers) => info!("Found {} customers", customers.len()),
            Err(e) => error!("Failed to search customers: {e}"),
        }
        res.map_err(ServiceError::from)
    }
}
