//! Route definitions for the AgroSmart backend

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/stocks", stock_routes())
}

/// Stock management routes (protected)
fn stock_routes() -> Router<AppState> {
    Router::new()
        .route("/statistiques", get(handlers::stock_statistics))
        .route(
            "/",
            get(handlers::list_stocks).post(handlers::create_stock),
        )
        .route(
            "/:stock_id",
            get(handlers::get_stock)
                .put(handlers::update_stock)
                .delete(handlers::deactivate_stock),
        )
        .route("/:stock_id/mouvement", post(handlers::apply_movement))
        .route("/:stock_id/reconciliation", get(handlers::reconcile_stock))
        .route("/:stock_id/alertes", get(handlers::list_alerts))
        .route(
            "/:stock_id/alertes/:alerte_id/marquer-lue",
            patch(handlers::acknowledge_alert),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}
