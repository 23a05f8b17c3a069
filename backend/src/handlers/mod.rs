//! HTTP handlers for the AgroSmart backend

pub mod health;
pub mod stock;

pub use health::health_check;
pub use stock::{
    acknowledge_alert, apply_movement, create_stock, deactivate_stock, get_stock, list_alerts,
    list_stocks, reconcile_stock, stock_statistics, update_stock,
};
