//! Stock service: inventory ledger and orchestration
//!
//! Every state change to a stock quantity goes through `apply_movement`,
//! which pairs the counter update with its justifying movement record in
//! one transaction. The movement ledger is the source of truth; the
//! `quantite` column is a denormalized read model kept honest by the
//! transaction and auditable through `reconcile`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::{AlertEngine, ParcelleService};
use shared::{
    apply_effect, validation, Alert, Movement, MovementType, ParcelleSummary, Stock, StockCategory,
};

/// Number of recent movements returned by the detail view
const DETAIL_MOVEMENT_LIMIT: i64 = 20;

/// Stock service coordinating the inventory store and the alert engine
#[derive(Clone)]
pub struct StockService {
    db: PgPool,
    alerts: AlertEngine,
    parcelles: ParcelleService,
}

/// Input for creating a stock
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStockInput {
    pub nom: String,
    pub categorie: StockCategory,
    #[serde(rename = "type")]
    pub type_: String,
    pub quantite: Decimal,
    pub unite: String,
    pub seuil_alerte: Decimal,
    pub parcelle_id: Option<Uuid>,
    pub prix_unitaire: Option<Decimal>,
    pub date_achat: Option<NaiveDate>,
    pub date_expiration: Option<NaiveDate>,
    pub fournisseur: Option<String>,
    pub localisation: Option<String>,
    pub notes: Option<String>,
}

/// Input for updating stock metadata.
///
/// Deliberately has no quantity field: the quantity only changes through
/// movements.
///
/// Nullable columns use a double `Option` so an omitted field keeps the
/// stored value while an explicit JSON `null` clears it (e.g.
/// `"parcelleId": null` unlinks the parcel).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStockInput {
    pub nom: Option<String>,
    pub categorie: Option<StockCategory>,
    #[serde(rename = "type")]
    pub type_: Option<String>,
    pub unite: Option<String>,
    pub seuil_alerte: Option<Decimal>,
    #[serde(default, deserialize_with = "patch_field")]
    pub parcelle_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "patch_field")]
    pub prix_unitaire: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "patch_field")]
    pub date_achat: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "patch_field")]
    pub date_expiration: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "patch_field")]
    pub fournisseur: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch_field")]
    pub localisation: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch_field")]
    pub notes: Option<Option<String>>,
}

/// Deserialize a present field into `Some(inner)`; combined with
/// `#[serde(default)]`, an absent field stays `None` while a JSON `null`
/// becomes `Some(None)`.
fn patch_field<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}

/// Resolve a patch field against the stored value: omitted keeps it,
/// explicit null clears it, a value replaces it.
fn resolve_patch<T>(patch: Option<Option<T>>, existing: Option<T>) -> Option<T> {
    match patch {
        Some(value) => value,
        None => existing,
    }
}

/// Input for recording a stock movement
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementInput {
    pub type_mouvement: MovementType,
    pub quantite: Decimal,
    pub motif: Option<String>,
    pub reference: Option<String>,
}

/// Optional filters for the stock list
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockFilters {
    pub categorie: Option<StockCategory>,
    pub parcelle_id: Option<Uuid>,
    pub est_actif: Option<bool>,
}

/// A stock with its linked parcel summary
#[derive(Debug, Serialize)]
pub struct StockWithParcelle {
    #[serde(flatten)]
    pub stock: Stock,
    pub parcelle: Option<ParcelleSummary>,
}

/// List entry: stock plus display counters
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockListEntry {
    #[serde(flatten)]
    pub stock: Stock,
    pub parcelle: Option<ParcelleSummary>,
    pub nb_mouvements: i64,
    pub nb_alertes_non_lues: i64,
}

/// Detail view: stock, parcel, recent movements, unread alerts
#[derive(Debug, Serialize)]
pub struct StockDetail {
    #[serde(flatten)]
    pub stock: Stock,
    pub parcelle: Option<ParcelleSummary>,
    pub mouvements: Vec<Movement>,
    pub alertes: Vec<Alert>,
}

/// Result of a committed movement
#[derive(Debug, Serialize)]
pub struct MovementResult {
    pub mouvement: Movement,
    pub stock: StockWithParcelle,
}

/// Per-category aggregate
#[derive(Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStatistics {
    pub categorie: StockCategory,
    pub nb_stocks: i64,
    pub quantite_totale: Decimal,
}

/// Statistics over the owner's active stocks
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockStatistics {
    pub par_categorie: Vec<CategoryStatistics>,
    pub stocks_bas: i64,
    pub alertes_non_lues: i64,
    pub valeur_totale: Decimal,
}

/// Ledger audit result: the stored counter checked against a full replay
/// of the movement history.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationReport {
    pub stock_id: Uuid,
    pub quantite_stockee: Decimal,
    pub quantite_derivee: Decimal,
    pub ecart: Decimal,
    pub nb_mouvements: i64,
    pub chaine_intacte: bool,
}

/// Row for the list query
#[derive(Debug, sqlx::FromRow)]
struct StockListRow {
    #[sqlx(flatten)]
    stock: Stock,
    parcelle_nom: Option<String>,
    nb_mouvements: i64,
    nb_alertes_non_lues: i64,
}

impl StockService {
    /// Create a new StockService instance
    pub fn new(db: PgPool) -> Self {
        Self {
            alerts: AlertEngine::new(db.clone()),
            parcelles: ParcelleService::new(db.clone()),
            db,
        }
    }

    /// Load a stock by id, scoped to the owner.
    ///
    /// Every operation goes through this accessor so no code path can
    /// cross an ownership boundary. A stock owned by someone else is
    /// indistinguishable from a missing one.
    async fn load_owned(&self, stock_id: Uuid, user_id: Uuid) -> AppResult<Stock> {
        let stock = sqlx::query_as::<_, Stock>(
            r#"
            SELECT id, user_id, parcelle_id, nom, categorie, type, quantite, unite,
                   seuil_alerte, prix_unitaire, date_achat, date_expiration,
                   fournisseur, localisation, notes, est_actif, created_at, updated_at
            FROM stocks
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(stock_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Stock".to_string()))?;

        Ok(stock)
    }

    /// Create a stock and its synthetic creation movement atomically
    pub async fn create_stock(
        &self,
        user_id: Uuid,
        input: CreateStockInput,
    ) -> AppResult<StockWithParcelle> {
        validate_create_input(&input)?;

        // Validate the parcel link against the owner before writing
        let parcelle = match input.parcelle_id {
            Some(parcelle_id) => Some(
                self.parcelles
                    .find_owned(user_id, parcelle_id)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Parcelle".to_string()))?,
            ),
            None => None,
        };

        let mut tx = self.db.begin().await?;

        let stock = sqlx::query_as::<_, Stock>(
            r#"
            INSERT INTO stocks (
                user_id, parcelle_id, nom, categorie, type, quantite, unite,
                seuil_alerte, prix_unitaire, date_achat, date_expiration,
                fournisseur, localisation, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING id, user_id, parcelle_id, nom, categorie, type, quantite, unite,
                      seuil_alerte, prix_unitaire, date_achat, date_expiration,
                      fournisseur, localisation, notes, est_actif, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(input.parcelle_id)
        .bind(&input.nom)
        .bind(input.categorie)
        .bind(&input.type_)
        .bind(input.quantite)
        .bind(&input.unite)
        .bind(input.seuil_alerte)
        .bind(input.prix_unitaire)
        .bind(input.date_achat)
        .bind(input.date_expiration)
        .bind(&input.fournisseur)
        .bind(&input.localisation)
        .bind(&input.notes)
        .fetch_one(&mut *tx)
        .await?;

        // The ledger starts with an ENTREE movement for the initial
        // quantity so replaying from zero always reaches the counter.
        sqlx::query(
            r#"
            INSERT INTO mouvements_stock (
                stock_id, type_mouvement, quantite, quantite_avant, quantite_apres, motif
            )
            VALUES ($1, 'ENTREE', $2, 0, $2, 'Création du stock')
            "#,
        )
        .bind(stock.id)
        .bind(stock.quantite)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(stock_id = %stock.id, user_id = %user_id, "stock créé");

        Ok(StockWithParcelle { stock, parcelle })
    }

    /// Apply a movement to a stock.
    ///
    /// The read of the current quantity, the movement insert and the
    /// counter update run in one transaction with the stock row locked
    /// (`FOR UPDATE`), so concurrent movements on the same stock
    /// serialize instead of both reading the same "before". Alert
    /// evaluation runs strictly after commit and never fails the call.
    pub async fn apply_movement(
        &self,
        stock_id: Uuid,
        user_id: Uuid,
        input: MovementInput,
    ) -> AppResult<MovementResult> {
        if input.quantite < Decimal::ZERO {
            return Err(AppError::validation(
                "quantite",
                "La quantité doit être un nombre positif",
            ));
        }
        validation::validate_motif(input.motif.as_deref())
            .map_err(|msg| AppError::validation("motif", msg))?;
        validation::validate_reference(input.reference.as_deref())
            .map_err(|msg| AppError::validation("reference", msg))?;

        let mut tx = self.db.begin().await?;

        let stock = sqlx::query_as::<_, Stock>(
            r#"
            SELECT id, user_id, parcelle_id, nom, categorie, type, quantite, unite,
                   seuil_alerte, prix_unitaire, date_achat, date_expiration,
                   fournisseur, localisation, notes, est_actif, created_at, updated_at
            FROM stocks
            WHERE id = $1 AND user_id = $2
            FOR UPDATE
            "#,
        )
        .bind(stock_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Stock".to_string()))?;

        let before = stock.quantite;
        let effect = input.type_mouvement.effect(input.quantite);
        let after = apply_effect(before, effect).ok_or(AppError::InsufficientStock {
            disponible: before,
            demande: input.quantite,
        })?;

        let mouvement = sqlx::query_as::<_, Movement>(
            r#"
            INSERT INTO mouvements_stock (
                stock_id, type_mouvement, quantite, quantite_avant, quantite_apres,
                motif, reference
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, stock_id, type_mouvement, quantite, quantite_avant,
                      quantite_apres, motif, reference, created_at
            "#,
        )
        .bind(stock_id)
        .bind(input.type_mouvement)
        .bind(input.quantite)
        .bind(before)
        .bind(after)
        .bind(&input.motif)
        .bind(&input.reference)
        .fetch_one(&mut *tx)
        .await?;

        let updated = sqlx::query_as::<_, Stock>(
            r#"
            UPDATE stocks
            SET quantite = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING id, user_id, parcelle_id, nom, categorie, type, quantite, unite,
                      seuil_alerte, prix_unitaire, date_achat, date_expiration,
                      fournisseur, localisation, notes, est_actif, created_at, updated_at
            "#,
        )
        .bind(after)
        .bind(stock_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            stock_id = %stock_id,
            type_mouvement = input.type_mouvement.as_str(),
            quantite = %input.quantite,
            quantite_apres = %after,
            "mouvement enregistré"
        );

        // Best-effort: a failed alert write must never roll back a
        // committed movement. Reads re-evaluate, closing the gap.
        if let Err(err) = self.alerts.evaluate(&updated).await {
            tracing::warn!(stock_id = %stock_id, error = %err, "évaluation d'alerte échouée");
        }

        let parcelle = self.parcelle_summary(user_id, &updated).await?;

        Ok(MovementResult {
            mouvement,
            stock: StockWithParcelle {
                stock: updated,
                parcelle,
            },
        })
    }

    /// List the owner's stocks with optional filters.
    ///
    /// Also re-evaluates alerts for active stocks at or below threshold;
    /// the evaluation is idempotent, so this read-time pass only fills
    /// the gap left by a crash between a movement commit and its alert.
    pub async fn list_stocks(
        &self,
        user_id: Uuid,
        filters: StockFilters,
    ) -> AppResult<Vec<StockListEntry>> {
        let rows = sqlx::query_as::<_, StockListRow>(
            r#"
            SELECT s.id, s.user_id, s.parcelle_id, s.nom, s.categorie, s.type,
                   s.quantite, s.unite, s.seuil_alerte, s.prix_unitaire,
                   s.date_achat, s.date_expiration, s.fournisseur, s.localisation,
                   s.notes, s.est_actif, s.created_at, s.updated_at,
                   p.nom AS parcelle_nom,
                   (SELECT COUNT(*) FROM mouvements_stock m
                    WHERE m.stock_id = s.id) AS nb_mouvements,
                   (SELECT COUNT(*) FROM alertes_stock a
                    WHERE a.stock_id = s.id AND NOT a.est_lue) AS nb_alertes_non_lues
            FROM stocks s
            LEFT JOIN parcelles p ON p.id = s.parcelle_id
            WHERE s.user_id = $1
              AND ($2::categorie_stock IS NULL OR s.categorie = $2)
              AND ($3::uuid IS NULL OR s.parcelle_id = $3)
              AND ($4::boolean IS NULL OR s.est_actif = $4)
            ORDER BY s.created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(filters.categorie)
        .bind(filters.parcelle_id)
        .bind(filters.est_actif)
        .fetch_all(&self.db)
        .await?;

        // Defensive alert pass over active stocks (idempotent)
        for row in &rows {
            if row.stock.est_actif {
                if let Err(err) = self.alerts.evaluate(&row.stock).await {
                    tracing::warn!(
                        stock_id = %row.stock.id,
                        error = %err,
                        "évaluation d'alerte échouée"
                    );
                }
            }
        }

        tracing::info!(user_id = %user_id, count = rows.len(), "stocks listés");

        Ok(rows
            .into_iter()
            .map(|row| {
                let parcelle = match (row.stock.parcelle_id, row.parcelle_nom) {
                    (Some(id), Some(nom)) => Some(ParcelleSummary { id, nom }),
                    _ => None,
                };
                StockListEntry {
                    stock: row.stock,
                    parcelle,
                    nb_mouvements: row.nb_mouvements,
                    nb_alertes_non_lues: row.nb_alertes_non_lues,
                }
            })
            .collect())
    }

    /// Detail view: the stock, its parcel, its most recent movements and
    /// its unread alerts. Re-runs alert evaluation first so the unread
    /// list reflects the current quantity.
    pub async fn get_stock(&self, stock_id: Uuid, user_id: Uuid) -> AppResult<StockDetail> {
        let stock = self.load_owned(stock_id, user_id).await?;

        if stock.est_actif {
            if let Err(err) = self.alerts.evaluate(&stock).await {
                tracing::warn!(stock_id = %stock_id, error = %err, "évaluation d'alerte échouée");
            }
        }

        let parcelle = self.parcelle_summary(user_id, &stock).await?;

        let mouvements = sqlx::query_as::<_, Movement>(
            r#"
            SELECT id, stock_id, type_mouvement, quantite, quantite_avant,
                   quantite_apres, motif, reference, created_at
            FROM mouvements_stock
            WHERE stock_id = $1
            ORDER BY seq DESC
            LIMIT $2
            "#,
        )
        .bind(stock_id)
        .bind(DETAIL_MOVEMENT_LIMIT)
        .fetch_all(&self.db)
        .await?;

        let alertes = self.alerts.unread_for_stock(stock_id).await?;

        Ok(StockDetail {
            stock,
            parcelle,
            mouvements,
            alertes,
        })
    }

    /// Update stock metadata. Quantity is not editable here: it only
    /// changes through `apply_movement`.
    pub async fn update_stock(
        &self,
        stock_id: Uuid,
        user_id: Uuid,
        input: UpdateStockInput,
    ) -> AppResult<StockWithParcelle> {
        let existing = self.load_owned(stock_id, user_id).await?;

        validate_update_patch(&input)?;

        // Re-validate a changed parcel link against the owner; clearing
        // the link needs no check.
        if let Some(Some(parcelle_id)) = input.parcelle_id {
            self.parcelles
                .find_owned(user_id, parcelle_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Parcelle".to_string()))?;
        }

        let stock = sqlx::query_as::<_, Stock>(
            r#"
            UPDATE stocks
            SET nom = $1, categorie = $2, type = $3, unite = $4, seuil_alerte = $5,
                parcelle_id = $6, prix_unitaire = $7, date_achat = $8,
                date_expiration = $9, fournisseur = $10, localisation = $11,
                notes = $12, updated_at = NOW()
            WHERE id = $13
            RETURNING id, user_id, parcelle_id, nom, categorie, type, quantite, unite,
                      seuil_alerte, prix_unitaire, date_achat, date_expiration,
                      fournisseur, localisation, notes, est_actif, created_at, updated_at
            "#,
        )
        .bind(input.nom.unwrap_or(existing.nom))
        .bind(input.categorie.unwrap_or(existing.categorie))
        .bind(input.type_.unwrap_or(existing.type_))
        .bind(input.unite.unwrap_or(existing.unite))
        .bind(input.seuil_alerte.unwrap_or(existing.seuil_alerte))
        .bind(resolve_patch(input.parcelle_id, existing.parcelle_id))
        .bind(resolve_patch(input.prix_unitaire, existing.prix_unitaire))
        .bind(resolve_patch(input.date_achat, existing.date_achat))
        .bind(resolve_patch(input.date_expiration, existing.date_expiration))
        .bind(resolve_patch(input.fournisseur, existing.fournisseur))
        .bind(resolve_patch(input.localisation, existing.localisation))
        .bind(resolve_patch(input.notes, existing.notes))
        .bind(stock_id)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(stock_id = %stock_id, user_id = %user_id, "stock mis à jour");

        let parcelle = self.parcelle_summary(user_id, &stock).await?;

        Ok(StockWithParcelle { stock, parcelle })
    }

    /// Soft-delete: flags the stock inactive, leaving quantity, ledger
    /// and alerts untouched. Idempotent.
    pub async fn deactivate_stock(&self, stock_id: Uuid, user_id: Uuid) -> AppResult<()> {
        self.load_owned(stock_id, user_id).await?;

        sqlx::query("UPDATE stocks SET est_actif = FALSE, updated_at = NOW() WHERE id = $1")
            .bind(stock_id)
            .execute(&self.db)
            .await?;

        tracing::info!(stock_id = %stock_id, user_id = %user_id, "stock désactivé");

        Ok(())
    }

    /// All alerts for a stock, newest first
    pub async fn list_alerts(&self, stock_id: Uuid, user_id: Uuid) -> AppResult<Vec<Alert>> {
        self.load_owned(stock_id, user_id).await?;
        self.alerts.list_for_stock(stock_id).await
    }

    /// Acknowledge an alert on one of the owner's stocks
    pub async fn acknowledge_alert(
        &self,
        stock_id: Uuid,
        alerte_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Alert> {
        self.load_owned(stock_id, user_id).await?;
        let alert = self.alerts.acknowledge(stock_id, alerte_id).await?;

        tracing::info!(alerte_id = %alerte_id, user_id = %user_id, "alerte marquée comme lue");

        Ok(alert)
    }

    /// Aggregate statistics over the owner's active stocks
    pub async fn statistics(&self, user_id: Uuid) -> AppResult<StockStatistics> {
        let par_categorie = sqlx::query_as::<_, CategoryStatistics>(
            r#"
            SELECT categorie, COUNT(*) AS nb_stocks,
                   COALESCE(SUM(quantite), 0) AS quantite_totale
            FROM stocks
            WHERE user_id = $1 AND est_actif
            GROUP BY categorie
            ORDER BY categorie
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        let stocks_bas = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM stocks
            WHERE user_id = $1 AND est_actif AND quantite <= seuil_alerte
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        let alertes_non_lues = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM alertes_stock a
            JOIN stocks s ON s.id = a.stock_id
            WHERE s.user_id = $1 AND NOT a.est_lue
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        let valeur_totale = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(quantite * prix_unitaire), 0)
            FROM stocks
            WHERE user_id = $1 AND est_actif AND prix_unitaire IS NOT NULL
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        Ok(StockStatistics {
            par_categorie,
            stocks_bas,
            alertes_non_lues,
            valeur_totale,
        })
    }

    /// Audit the denormalized counter against a full replay of the
    /// ledger, in `seq` order (timestamps can tie within a microsecond).
    /// Read-only: a mismatch is reported, never silently repaired,
    /// because a repair would be a quantity change without a justifying
    /// movement.
    pub async fn reconcile(&self, stock_id: Uuid, user_id: Uuid) -> AppResult<ReconciliationReport> {
        let stock = self.load_owned(stock_id, user_id).await?;

        let mouvements = sqlx::query_as::<_, Movement>(
            r#"
            SELECT id, stock_id, type_mouvement, quantite, quantite_avant,
                   quantite_apres, motif, reference, created_at
            FROM mouvements_stock
            WHERE stock_id = $1
            ORDER BY seq ASC
            "#,
        )
        .bind(stock_id)
        .fetch_all(&self.db)
        .await?;

        let mut chaine_intacte = true;
        let mut derivee = Decimal::ZERO;

        for mouvement in &mouvements {
            // Each movement must start where the previous one ended...
            if mouvement.quantite_avant != derivee {
                chaine_intacte = false;
            }
            // ...and its recorded result must match its own arithmetic.
            let computed = apply_effect(
                mouvement.quantite_avant,
                mouvement.type_mouvement.effect(mouvement.quantite),
            );
            if computed != Some(mouvement.quantite_apres) {
                chaine_intacte = false;
            }
            derivee = mouvement.quantite_apres;
        }

        Ok(ReconciliationReport {
            stock_id,
            quantite_stockee: stock.quantite,
            ecart: stock.quantite - derivee,
            quantite_derivee: derivee,
            nb_mouvements: mouvements.len() as i64,
            chaine_intacte,
        })
    }

    async fn parcelle_summary(
        &self,
        user_id: Uuid,
        stock: &Stock,
    ) -> AppResult<Option<ParcelleSummary>> {
        match stock.parcelle_id {
            Some(parcelle_id) => self.parcelles.find_owned(user_id, parcelle_id).await,
            None => Ok(None),
        }
    }
}

fn validate_create_input(input: &CreateStockInput) -> AppResult<()> {
    validation::validate_nom(&input.nom).map_err(|msg| AppError::validation("nom", msg))?;
    validation::validate_type_label(&input.type_)
        .map_err(|msg| AppError::validation("type", msg))?;
    validation::validate_unite(&input.unite).map_err(|msg| AppError::validation("unite", msg))?;
    validation::validate_quantite(input.quantite)
        .map_err(|msg| AppError::validation("quantite", msg))?;
    validation::validate_quantite(input.seuil_alerte)
        .map_err(|msg| AppError::validation("seuilAlerte", msg))?;
    validation::validate_prix_unitaire(input.prix_unitaire)
        .map_err(|msg| AppError::validation("prixUnitaire", msg))?;
    validation::validate_fournisseur(input.fournisseur.as_deref())
        .map_err(|msg| AppError::validation("fournisseur", msg))?;
    validation::validate_localisation(input.localisation.as_deref())
        .map_err(|msg| AppError::validation("localisation", msg))?;
    Ok(())
}

fn validate_update_patch(input: &UpdateStockInput) -> AppResult<()> {
    if let Some(nom) = &input.nom {
        validation::validate_nom(nom).map_err(|msg| AppError::validation("nom", msg))?;
    }
    if let Some(type_) = &input.type_ {
        validation::validate_type_label(type_).map_err(|msg| AppError::validation("type", msg))?;
    }
    if let Some(unite) = &input.unite {
        validation::validate_unite(unite).map_err(|msg| AppError::validation("unite", msg))?;
    }
    if let Some(seuil) = input.seuil_alerte {
        validation::validate_quantite(seuil)
            .map_err(|msg| AppError::validation("seuilAlerte", msg))?;
    }
    validation::validate_prix_unitaire(input.prix_unitaire.flatten())
        .map_err(|msg| AppError::validation("prixUnitaire", msg))?;
    validation::validate_fournisseur(input.fournisseur.as_ref().and_then(|f| f.as_deref()))
        .map_err(|msg| AppError::validation("fournisseur", msg))?;
    validation::validate_localisation(input.localisation.as_ref().and_then(|l| l.as_deref()))
        .map_err(|msg| AppError::validation("localisation", msg))?;
    Ok(())
}
