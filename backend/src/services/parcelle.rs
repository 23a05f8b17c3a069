//! Parcel lookups used to validate stock/parcel links
//!
//! Parcel management itself lives elsewhere; stocks only need to check
//! that a linked parcel exists and belongs to the owner.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;
use shared::ParcelleSummary;

/// Read-only access to the owner's parcels
#[derive(Clone)]
pub struct ParcelleService {
    db: PgPool,
}

impl ParcelleService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Look up a parcel by id, scoped to the owner.
    ///
    /// Returns `None` both when the parcel does not exist and when it
    /// belongs to another user.
    pub async fn find_owned(
        &self,
        user_id: Uuid,
        parcelle_id: Uuid,
    ) -> AppResult<Option<ParcelleSummary>> {
        let parcelle = sqlx::query_as::<_, ParcelleSummary>(
            "SELECT id, nom FROM parcelles WHERE id = $1 AND user_id = $2",
        )
        .bind(parcelle_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(parcelle)
    }
}
