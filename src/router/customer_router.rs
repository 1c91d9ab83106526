use axum::{Router, routing::{post, get}, middleware};
use crate::handler::customer_handler::{
    create_customer_handler,
    list_customers_handler,
    get_customer_handler,
    update_customer_handler,
    delete_customer_handler,
};
use std::sync::Arc;
use crate::service::customer_service::CustomerServiceImpl;
use crate::middlewares::admin_middleware::{admin_auth, AdminAuthState};

pub fn customer_router(service: Arc<CustomerServiceImpl>, admin_auth_state: Arc<AdminAuthState>) -> Router {
    Router::new()
        .route("/customers", post(create_customer_handler).get(list_customers_handler))
        .route(
            "/customers/{id}",
            get(get_customer_handler).put(update_customer_handler).delete(delete_customer_handler),
        )
        .route_layer(middleware::from_fn_with_state(admin_auth_state, admin_auth))
        .with_state(service)
}
