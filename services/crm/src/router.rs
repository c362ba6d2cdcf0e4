use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use crm_core::health::healthz;
use crm_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    auth::{login, register},
    dashboard::get_stats,
    health::readyz,
    lead::{convert_lead, create_lead, delete_lead, list_leads, update_lead},
    opportunity::{
        create_opportunity, delete_opportunity, list_opportunities, update_opportunity,
    },
    user::{delete_user, list_users, update_user},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Auth
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        // Users
        .route("/api/users", get(list_users))
        .route("/api/users/{id}", put(update_user).delete(delete_user))
        // Leads
        .route("/api/leads", get(list_leads).post(create_lead))
        .route("/api/leads/{id}", put(update_lead).delete(delete_lead))
        .route("/api/leads/{id}/convert", post(convert_lead))
        // Opportunities
        .route(
            "/api/opportunities",
            get(list_opportunities).post(create_opportunity),
        )
        .route(
            "/api/opportunities/{id}",
            put(update_opportunity).delete(delete_opportunity),
        )
        // Dashboard
        .route("/api/dashboard/stats", get(get_stats))
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id_layer())
        .layer(request_id_layer())
        .with_state(state)
}
