#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use bson::oid::ObjectId;
use chrono::{DateTime, Duration, Utc};

use voltline_backend::app::app::{create_router, AppServices};
use voltline_backend::config::{AdminAuthConfig, AutosaveConfig, BusinessConfig};
use voltline_backend::handler::seo_handler::SeoState;
use voltline_backend::middlewares::admin_middleware::AdminAuthState;
use voltline_backend::model::customer::Customer;
use voltline_backend::model::material::{Material, MaterialCategory};
use voltline_backend::model::quote::{LineItem, Quote, QuoteStatus};
use voltline_backend::repository::customer_repo::CustomerRepository;
use voltline_backend::repository::material_repo::MaterialRepository;
use voltline_backend::repository::quote_repo::QuoteRepository;
use voltline_backend::repository::repository_error::{RepositoryError, RepositoryResult};
use voltline_backend::service::customer_service::CustomerServiceImpl;
use voltline_backend::service::material_service::MaterialServiceImpl;
use voltline_backend::service::quote_service::QuoteServiceImpl;

pub const ADMIN_TOKEN: &str = "test-admin-token-123456";

pub fn quote(number: &str, status: QuoteStatus, updated_at: DateTime<Utc>) -> Quote {
    let mut quote = Quote {
        id: Some(ObjectId::new()),
        quote_number: number.to_string(),
        customer_name: format!("Customer {}", number),
        customer_email: Some("owner@example.com".to_string()),
        customer_phone: None,
        customer_address: None,
        status,
        line_items: vec![LineItem::new("12/2 Romex", 250.0, 0.8)],
        labor_hours: 4.0,
        labor_rate: 95.0,
        markup_percent: 30.0,
        notes: None,
        valid_until: None,
        total: 0.0,
        created_at: updated_at,
        updated_at,
    };
    quote.recompute_total();
    quote
}

pub fn days_ago(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    now - Duration::days(days)
}

#[derive(Default)]
pub struct InMemoryQuoteRepository {
    pub quotes: Mutex<Vec<Quote>>,
    pub fail_updates: AtomicBool,
    pub update_calls: AtomicUsize,
    pub sequences: Mutex<HashMap<i32, u64>>,
}

impl InMemoryQuoteRepository {
    pub fn with_quotes(quotes: Vec<Quote>) -> Self {
        InMemoryQuoteRepository { quotes: Mutex::new(quotes), ..Default::default() }
    }

    pub fn updates(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn stored(&self, id: ObjectId) -> Option<Quote> {
        self.quotes.lock().unwrap().iter().find(|q| q.id == Some(id)).cloned()
    }
}

#[async_trait]
impl QuoteRepository for InMemoryQuoteRepository {
    async fn create(&self, mut quote: Quote) -> RepositoryResult<Quote> {
        quote.id = Some(ObjectId::new());
        self.quotes.lock().unwrap().push(quote.clone());
        Ok(quote)
    }

    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Quote> {
        self.stored(id)
            .ok_or_else(|| RepositoryError::not_found(format!("Quote not found for ID: {}", id)))
    }

    async fn update(&self, id: ObjectId, mut quote: Quote) -> RepositoryResult<Quote> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(RepositoryError::database("connection reset"));
        }
        let mut quotes = self.quotes.lock().unwrap();
        let slot = quotes
            .iter_mut()
            .find(|q| q.id == Some(id))
            .ok_or_else(|| RepositoryError::not_found("No quote found to update"))?;
        quote.id = Some(id);
        *slot = quote.clone();
        Ok(quote)
    }

    async fn update_status(&self, id: ObjectId, status: QuoteStatus) -> RepositoryResult<Quote> {
        let mut quotes = self.quotes.lock().unwrap();
        let slot = quotes
            .iter_mut()
            .find(|q| q.id == Some(id))
            .ok_or_else(|| RepositoryError::not_found("No quote found to update"))?;
        slot.status = status;
        slot.updated_at = Utc::now();
        Ok(slot.clone())
    }

    async fn delete(&self, id: ObjectId) -> RepositoryResult<()> {
        let mut quotes = self.quotes.lock().unwrap();
        let before = quotes.len();
        quotes.retain(|q| q.id != Some(id));
        if quotes.len() == before {
            return Err(RepositoryError::not_found("No quote found to delete"));
        }
        Ok(())
    }

    async fn list(&self, status: Option<QuoteStatus>, page: u32, limit: u32) -> RepositoryResult<Vec<Quote>> {
        let quotes = self.quotes.lock().unwrap();
        Ok(quotes
            .iter()
            .rev()
            .filter(|q| status.map_or(true, |s| q.status == s))
            .skip(((page.max(1) - 1) * limit) as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn list_by_statuses(&self, statuses: &[QuoteStatus]) -> RepositoryResult<Vec<Quote>> {
        let quotes = self.quotes.lock().unwrap();
        Ok(quotes.iter().filter(|q| statuses.contains(&q.status)).cloned().collect())
    }

    async fn next_sequence(&self, year: i32) -> RepositoryResult<u64> {
        let mut sequences = self.sequences.lock().unwrap();
        let seq = sequences.entry(year).or_insert(0);
        *seq += 1;
        Ok(*seq)
    }
}

#[derive(Default)]
pub struct InMemoryCustomerRepository {
    pub customers: Mutex<Vec<Customer>>,
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn create(&self, mut customer: Customer) -> RepositoryResult<Customer> {
        customer.id = Some(ObjectId::new());
        self.customers.lock().unwrap().push(customer.clone());
        Ok(customer)
    }

    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Customer> {
        self.customers
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == Some(id))
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("Customer not found"))
    }

    async fn update(&self, id: ObjectId, mut customer: Customer) -> RepositoryResult<Customer> {
        let mut customers = self.customers.lock().unwrap();
        let slot = customers
            .iter_mut()
            .find(|c| c.id == Some(id))
            .ok_or_else(|| RepositoryError::not_found("No customer found to update"))?;
        customer.id = Some(id);
        *slot = customer.clone();
        Ok(customer)
    }

    async fn delete(&self, id: ObjectId) -> RepositoryResult<()> {
        let mut customers = self.customers.lock().unwrap();
        let before = customers.len();
        customers.retain(|c| c.id != Some(id));
        if customers.len() == before {
            return Err(RepositoryError::not_found("No customer found to delete"));
        }
        Ok(())
    }

    async fn search(&self, term: Option<&str>, page: u32, limit: u32) -> RepositoryResult<Vec<Customer>> {
        let mut found: Vec<Customer> = self
            .customers
            .lock()
            .unwrap()
            .iter()
            .filter(|c| term.map_or(true, |t| c.matches(t)))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found
            .into_iter()
            .skip(((page.max(1) - 1) * limit) as usize)
            .take(limit as usize)
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryMaterialRepository {
    pub materials: Mutex<Vec<Material>>,
}

#[async_trait]
impl MaterialRepository for InMemoryMaterialRepository {
    async fn create(&self, mut material: Material) -> RepositoryResult<Material> {
        material.id = Some(ObjectId::new());
        self.materials.lock().unwrap().push(material.clone());
        Ok(material)
    }

    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Material> {
        self.materials
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id == Some(id))
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("Material not found"))
    }

    async fn update(&self, id: ObjectId, mut material: Material) -> RepositoryResult<Material> {
        let mut materials = self.materials.lock().unwrap();
        let slot = materials
            .iter_mut()
            .find(|m| m.id == Some(id))
            .ok_or_else(|| RepositoryError::not_found("No material found to update"))?;
        material.id = Some(id);
        *slot = material.clone();
        Ok(material)
    }

    async fn delete(&self, id: ObjectId) -> RepositoryResult<()> {
        let mut materials = self.materials.lock().unwrap();
        let before = materials.len();
        materials.retain(|m| m.id != Some(id));
        if materials.len() == before {
            return Err(RepositoryError::not_found("No material found to delete"));
        }
        Ok(())
    }

    async fn list(&self, category: Option<MaterialCategory>) -> RepositoryResult<Vec<Material>> {
        let mut found: Vec<Material> = self
            .materials
            .lock()
            .unwrap()
            .iter()
            .filter(|m| category.map_or(true, |c| m.category == c))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.category.as_str().cmp(b.category.as_str()).then(a.name.cmp(&b.name)));
        Ok(found)
    }
}

pub struct TestApp {
    pub router: Router,
    pub quote_repo: Arc<InMemoryQuoteRepository>,
}

/// Full router over in-memory repositories, with IndexNow unconfigured.
pub fn setup_app(quotes: Vec<Quote>) -> TestApp {
    let quote_repo = Arc::new(InMemoryQuoteRepository::with_quotes(quotes));
    let services = AppServices {
        quote_service: Arc::new(QuoteServiceImpl::new(quote_repo.clone(), AutosaveConfig::default())),
        customer_service: Arc::new(CustomerServiceImpl::new(Arc::new(InMemoryCustomerRepository::default()))),
        material_service: Arc::new(MaterialServiceImpl::new(Arc::new(InMemoryMaterialRepository::default()))),
        seo: Arc::new(SeoState { business: BusinessConfig::default(), index_now: None }),
    };
    let admin_auth_state = Arc::new(AdminAuthState::new(&AdminAuthConfig::from_test_env()));
    TestApp { router: create_router(&services, admin_auth_state), quote_repo }
}
