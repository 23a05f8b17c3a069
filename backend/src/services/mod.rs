//! Business logic services for the AgroSmart backend

pub mod alert;
pub mod parcelle;
pub mod stock;

pub use alert::AlertEngine;
pub use parcelle::ParcelleService;
pub use stock::StockService;
