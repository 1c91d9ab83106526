use axum::{Router, routing::{post, get}, middleware};
use crate::handler::seo_handler::{
    business_data_handler,
    business_script_handler,
    service_data_handler,
    faq_data_handler,
    breadcrumbs_data_handler,
    index_now_handler,
    SeoState,
};
use std::sync::Arc;
use crate::middlewares::admin_middleware::{admin_auth, AdminAuthState};

pub fn seo_router(state: Arc<SeoState>, admin_auth_state: Arc<AdminAuthState>) -> Router {
    // Public JSON-LD for the marketing pages
    let public = Router::new()
        .route("/seo/structured-data/business", get(business_data_handler))
        .route("/seo/structured-data/business/script", get(business_script_handler))
        .route("/seo/structured-data/service", post(service_data_handler))
        .route("/seo/structured-data/faq", post(faq_data_handler))
        .route("/seo/structured-data/breadcrumbs", post(breadcrumbs_data_handler));

    // Pinging search engines is admin-only
    let admin = Router::new()
        .route("/seo/index-now", post(index_now_handler))
        .route_layer(middleware::from_fn_with_state(admin_auth_state, admin_auth));

    public
        .merge(admin)
        .with_state(state)
}
