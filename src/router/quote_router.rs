use axum::{Router, routing::{post, get, put}, middleware};
use crate::handler::quote_handler::{
    create_quote_handler,
    list_quotes_handler,
    get_quote_handler,
    update_quote_handler,
    update_quote_status_handler,
    delete_quote_handler,
    quote_health_handler,
    quote_profit_handler,
    evaluate_health_handler,
    calculate_profit_handler,
    attention_handler,
    summary_handler,
    save_draft_handler,
    flush_draft_handler,
    draft_status_handler,
    discard_draft_handler,
};
use std::sync::Arc;
use crate::service::quote_service::QuoteServiceImpl;
use crate::middlewares::admin_middleware::{admin_auth, AdminAuthState};

pub fn quote_router(service: Arc<QuoteServiceImpl>, admin_auth_state: Arc<AdminAuthState>) -> Router {
    // Every quote route is admin-only
    Router::new()
        .route("/quotes", post(create_quote_handler).get(list_quotes_handler))
        .route("/quotes/attention", get(attention_handler))
        .route("/quotes/summary", get(summary_handler))
        .route("/quotes/health", post(evaluate_health_handler))
        .route("/quotes/profit", post(calculate_profit_handler))
        .route(
            "/quotes/{id}",
            get(get_quote_handler).put(update_quote_handler).delete(delete_quote_handler),
        )
        .route("/quotes/{id}/status", put(update_quote_status_handler))
        .route("/quotes/{id}/health", get(quote_health_handler))
        .route("/quotes/{id}/profit", get(quote_profit_handler))
        .route(
            "/quotes/{id}/draft",
            put(save_draft_handler).get(draft_status_handler).delete(discard_draft_handler),
        )
        .route("/quotes/{id}/draft/save", post(flush_draft_handler))
        .route_layer(middleware::from_fn_with_state(admin_auth_state, admin_auth))
        .with_state(service)
}
