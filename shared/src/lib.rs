//! Shared domain types and rules for the AgroSmart platform
//!
//! This crate contains the stock/movement/alert domain model and the pure
//! business rules (movement arithmetic, alert triggering) used by the
//! backend services and their tests.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::*;
