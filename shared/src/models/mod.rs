//! Domain models for stock management

pub mod parcelle;
pub mod stock;

pub use parcelle::*;
pub use stock::*;
