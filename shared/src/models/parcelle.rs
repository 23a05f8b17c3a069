//! Parcel summary exposed alongside stocks

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimal parcel view linked to a stock for display purposes
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ParcelleSummary {
    pub id: Uuid,
    pub nom: String,
}
