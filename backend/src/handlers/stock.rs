//! HTTP handlers for stock management endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::stock::{
    CreateStockInput, MovementInput, MovementResult, ReconciliationReport, StockDetail,
    StockFilters, StockListEntry, StockService, StockStatistics, StockWithParcelle,
    UpdateStockInput,
};
use crate::AppState;
use shared::Alert;

/// List the current user's stocks with optional filters
pub async fn list_stocks(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(filters): Query<StockFilters>,
) -> AppResult<Json<Vec<StockListEntry>>> {
    let service = StockService::new(state.db);
    let stocks = service.list_stocks(current_user.0.user_id, filters).await?;
    Ok(Json(stocks))
}

/// Create a new stock
pub async fn create_stock(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateStockInput>,
) -> AppResult<Json<StockWithParcelle>> {
    let service = StockService::new(state.db);
    let stock = service.create_stock(current_user.0.user_id, input).await?;
    Ok(Json(stock))
}

/// Get a stock with its recent movements and unread alerts
pub async fn get_stock(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(stock_id): Path<Uuid>,
) -> AppResult<Json<StockDetail>> {
    let service = StockService::new(state.db);
    let stock = service.get_stock(stock_id, current_user.0.user_id).await?;
    Ok(Json(stock))
}

/// Update stock metadata (never the quantity)
pub async fn update_stock(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(stock_id): Path<Uuid>,
    Json(input): Json<UpdateStockInput>,
) -> AppResult<Json<StockWithParcelle>> {
    let service = StockService::new(state.db);
    let stock = service
        .update_stock(stock_id, current_user.0.user_id, input)
        .await?;
    Ok(Json(stock))
}

/// Deactivate a stock (soft delete)
pub async fn deactivate_stock(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(stock_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = StockService::new(state.db);
    service
        .deactivate_stock(stock_id, current_user.0.user_id)
        .await?;
    Ok(Json(()))
}

/// Record a stock movement
pub async fn apply_movement(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(stock_id): Path<Uuid>,
    Json(input): Json<MovementInput>,
) -> AppResult<Json<MovementResult>> {
    let service = StockService::new(state.db);
    let result = service
        .apply_movement(stock_id, current_user.0.user_id, input)
        .await?;
    Ok(Json(result))
}

/// List a stock's alerts, newest first
pub async fn list_alerts(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(stock_id): Path<Uuid>,
) -> AppResult<Json<Vec<Alert>>> {
    let service = StockService::new(state.db);
    let alerts = service
        .list_alerts(stock_id, current_user.0.user_id)
        .await?;
    Ok(Json(alerts))
}

/// Mark an alert as read
pub async fn acknowledge_alert(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path((stock_id, alerte_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<Alert>> {
    let service = StockService::new(state.db);
    let alert = service
        .acknowledge_alert(stock_id, alerte_id, current_user.0.user_id)
        .await?;
    Ok(Json(alert))
}

/// Aggregate statistics over the current user's stocks
pub async fn stock_statistics(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<StockStatistics>> {
    let service = StockService::new(state.db);
    let stats = service.statistics(current_user.0.user_id).await?;
    Ok(Json(stats))
}

/// Audit a stock's counter against its movement ledger
pub async fn reconcile_stock(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(stock_id): Path<Uuid>,
) -> AppResult<Json<ReconciliationReport>> {
    let service = StockService::new(state.db);
    let report = service.reconcile(stock_id, current_user.0.user_id).await?;
    Ok(Json(report))
}
