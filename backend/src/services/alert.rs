//! Low-stock alert engine
//!
//! Inspects a stock's quantity against its threshold and raises at most
//! one unread alert per (stock, type). Only the stock service calls into
//! this engine; evaluation after a movement runs outside the movement
//! transaction and is best-effort (reads re-run it, see the stock
//! service).

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::{alert_message, alert_trigger, Alert, Stock};

/// Alert engine for threshold evaluation and acknowledgment
#[derive(Clone)]
pub struct AlertEngine {
    db: PgPool,
}

impl AlertEngine {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Evaluate a stock's current quantity and raise an alert if needed.
    ///
    /// Returns the newly created alert, or `None` when the quantity is
    /// above threshold or an unread alert of the triggered type already
    /// exists. Idempotent: calling it repeatedly on an unchanged stock
    /// creates nothing after the first call.
    pub async fn evaluate(&self, stock: &Stock) -> AppResult<Option<Alert>> {
        let Some(trigger) = alert_trigger(stock.quantite, stock.seuil_alerte) else {
            return Ok(None);
        };

        // Fast path: an unread alert of this type already communicates
        // the condition.
        let already_raised = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM alertes_stock
                WHERE stock_id = $1 AND type_alerte = $2 AND NOT est_lue
            )
            "#,
        )
        .bind(stock.id)
        .bind(trigger)
        .fetch_one(&self.db)
        .await?;

        if already_raised {
            return Ok(None);
        }

        let message = alert_message(trigger, &stock.nom, stock.quantite, &stock.unite);

        // The partial unique index on (stock_id, type_alerte) WHERE NOT
        // est_lue absorbs the check-then-insert race: if a concurrent
        // evaluation inserts first, this statement is a no-op.
        let alert = sqlx::query_as::<_, Alert>(
            r#"
            INSERT INTO alertes_stock (stock_id, type_alerte, message)
            VALUES ($1, $2, $3)
            ON CONFLICT DO NOTHING
            RETURNING id, stock_id, type_alerte, message, est_lue, created_at
            "#,
        )
        .bind(stock.id)
        .bind(trigger)
        .bind(&message)
        .fetch_optional(&self.db)
        .await?;

        if let Some(alert) = &alert {
            tracing::info!(
                stock_id = %stock.id,
                type_alerte = alert.type_alerte.as_str(),
                "alerte créée"
            );
        }

        Ok(alert)
    }

    /// Mark an alert as read. The stock ownership check happens in the
    /// stock service before this is called; the alert must belong to the
    /// given stock.
    pub async fn acknowledge(&self, stock_id: Uuid, alerte_id: Uuid) -> AppResult<Alert> {
        let alert = sqlx::query_as::<_, Alert>(
            r#"
            UPDATE alertes_stock
            SET est_lue = TRUE
            WHERE id = $1 AND stock_id = $2
            RETURNING id, stock_id, type_alerte, message, est_lue, created_at
            "#,
        )
        .bind(alerte_id)
        .bind(stock_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Alerte".to_string()))?;

        Ok(alert)
    }

    /// All alerts for a stock, newest first
    pub async fn list_for_stock(&self, stock_id: Uuid) -> AppResult<Vec<Alert>> {
        let alerts = sqlx::query_as::<_, Alert>(
            r#"
            SELECT id, stock_id, type_alerte, message, est_lue, created_at
            FROM alertes_stock
            WHERE stock_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(stock_id)
        .fetch_all(&self.db)
        .await?;

        Ok(alerts)
    }

    /// Unread alerts for a stock, newest first
    pub async fn unread_for_stock(&self, stock_id: Uuid) -> AppResult<Vec<Alert>> {
        let alerts = sqlx::query_as::<_, Alert>(
            r#"
            SELECT id, stock_id, type_alerte, message, est_lue, created_at
            FROM alertes_stock
            WHERE stock_id = $1 AND NOT est_lue
            ORDER BY created_at DESC
            "#,
        )
        .bind(stock_id)
        .fetch_all(&self.db)
        .await?;

        Ok(alerts)
    }
}
