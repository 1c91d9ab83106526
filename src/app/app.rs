use axum::{Router, routing::get};
use tracing::{info, warn};
use crate::config::{AppConfig, AdminAuthConfig, AutosaveConfig, BusinessConfig, IndexNowConfig, MongoConfig};
use crate::handler::seo_handler::SeoState;
use crate::middlewares::admin_middleware::AdminAuthState;
use crate::repository::customer_repo::MongoCustomerRepository;
use crate::repository::material_repo::MongoMaterialRepository;
use crate::repository::quote_repo::MongoQuoteRepository;
use crate::router::customer_router::customer_router;
use crate::router::material_router::material_router;
use crate::router::quote_router::quote_router;
use crate::router::seo_router::seo_router;
use crate::service::customer_service::CustomerServiceImpl;
use crate::service::material_service::MaterialServiceImpl;
use crate::service::quote_service::QuoteServiceImpl;
use crate::util::index_now::IndexNowClient;
use std::sync::Arc;

/// Everything the HTTP layer hands requests to.
pub struct AppServices {
    pub quote_service: Arc<QuoteServiceImpl>,
    pub customer_service: Arc<CustomerServiceImpl>,
    pub material_service: Arc<MaterialServiceImpl>,
    pub seo: Arc<SeoState>,
}

pub fn create_router(services: &AppServices, admin_auth_state: Arc<AdminAuthState>) -> Router {
    Router::new()
        .merge(quote_router(services.quote_service.clone(), admin_auth_state.clone()))
        .merge(customer_router(services.customer_service.clone(), admin_auth_state.clone()))
        .merge(material_router(services.material_service.clone(), admin_auth_state.clone()))
        .merge(seo_router(services.seo.clone(), admin_auth_state))
        .route("/health", get(|| async { "OK" }))
}

fn index_now_client() -> Option<IndexNowClient> {
    let config = match IndexNowConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            warn!("IndexNow disabled: {e}");
            return None;
        }
    };
    match IndexNowClient::new(config) {
        Ok(client) => Some(client),
        Err(e) => {
            warn!("IndexNow disabled: {e}");
            None
        }
    }
}

pub struct App {
    config: AppConfig,
    router: Router,
    pub services: AppServices,
}

impl App {
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let config = AppConfig::from_env()?;
        let mongo_config = MongoConfig::from_env()?;
        let autosave_config = AutosaveConfig::from_env()?;
        let business_config = BusinessConfig::from_env()?;
        let admin_auth_config = AdminAuthConfig::from_env()?;

        let quote_repo = Arc::new(MongoQuoteRepository::new(&mongo_config).await?);
        let customer_repo = Arc::new(MongoCustomerRepository::new(&mongo_config).await?);
        let material_repo = Arc::new(MongoMaterialRepository::new(&mongo_config).await?);
        info!("✅ Repositories connected to MongoDB database {}", mongo_config.database);

        if !autosave_config.enabled {
            warn!("Draft autosave is disabled");
        }

        let services = AppServices {
            quote_service: Arc::new(QuoteServiceImpl::new(quote_repo, autosave_config)),
            customer_service: Arc::new(CustomerServiceImpl::new(customer_repo)),
            material_service: Arc::new(MaterialServiceImpl::new(material_repo)),
            seo: Arc::new(SeoState { business: business_config, index_now: index_now_client() }),
        };

        let admin_auth_state = Arc::new(AdminAuthState::new(&admin_auth_config));
        let router = create_router(&services, admin_auth_state);
        Ok(App { config, router, services })
    }

    pub async fn start(self) {
        let addr = match self.config.socket_addr() {
            Ok(addr) => addr,
            Err(e) => {
                tracing::error!("Invalid server address: {e}");
                return;
            }
        };
        info!("🚀 Server running at http://{}", addr);
        let listener = match tokio::net::TcpListener::bind(addr).await {
            Ok(l) => l,
            Err(e) => {
                tracing::error!("Failed to bind {}: {e}", addr);
                return;
            }
        };
        if let Err(e) = axum::serve(listener, self.router).await {
            tracing::error!("Server stopped with error: {e}");
        }
    }
}
