use axum::{Router, routing::{post, get}, middleware};
use crate::handler::material_handler::{
    create_material_handler,
    list_materials_handler,
    get_material_handler,
    update_material_handler,
    delete_material_handler,
};
use std::sync::Arc;
use crate::service::material_service::MaterialServiceImpl;
use crate::middlewares::admin_middleware::{admin_auth, AdminAuthState};

pub fn material_router(service: Arc<MaterialServiceImpl>, admin_auth_state: Arc<AdminAuthState>) -> Router {
    Router::new()
        .route("/materials", post(create_material_handler).get(list_materials_handler))
        .route(
            "/materials/{id}",
            get(get_material_handler).put(update_material_handler).delete(delete_material_handler),
        )
        .route_layer(middleware::from_fn_with_state(admin_auth_state, admin_auth))
        .with_state(service)
}
