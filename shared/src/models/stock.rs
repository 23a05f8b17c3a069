//! Stock, movement and alert domain model
//!
//! The wire format keeps the French field names used by the dashboard
//! (`seuilAlerte`, `quantiteAvant`, ...), hence the camelCase renames.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stock categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "categorie_stock", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockCategory {
    Semences,
    Engrais,
    Pesticides,
    Herbicides,
    Outils,
    Recoltes,
    Autres,
}

impl StockCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockCategory::Semences => "SEMENCES",
            StockCategory::Engrais => "ENGRAIS",
            StockCategory::Pesticides => "PESTICIDES",
            StockCategory::Herbicides => "HERBICIDES",
            StockCategory::Outils => "OUTILS",
            StockCategory::Recoltes => "RECOLTES",
            StockCategory::Autres => "AUTRES",
        }
    }
}

/// Stock movement types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "type_mouvement", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementType {
    Entree,
    Sortie,
    Ajustement,
    Perte,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::Entree => "ENTREE",
            MovementType::Sortie => "SORTIE",
            MovementType::Ajustement => "AJUSTEMENT",
            MovementType::Perte => "PERTE",
        }
    }

    /// Resolve the effect a movement of this type has on the quantity.
    ///
    /// `magnitude` is the caller-supplied non-negative amount; whether it
    /// is added, removed or becomes the new quantity depends on the type.
    pub fn effect(&self, magnitude: Decimal) -> MovementEffect {
        match self {
            MovementType::Entree => MovementEffect::Add(magnitude),
            MovementType::Sortie | MovementType::Perte => MovementEffect::Remove(magnitude),
            // AJUSTEMENT replaces the quantity outright; it is not a delta.
            MovementType::Ajustement => MovementEffect::SetTo(magnitude),
        }
    }
}

/// The effect of a movement on a stock quantity.
///
/// `SetTo` exists because AJUSTEMENT has absolute-set semantics while the
/// three other types are deltas; keeping it a distinct variant makes the
/// divergence visible wherever a movement is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementEffect {
    Add(Decimal),
    Remove(Decimal),
    SetTo(Decimal),
}

/// Apply a movement effect to the current quantity.
///
/// Returns `None` when a removal would drive the quantity negative; the
/// caller must reject the movement without committing anything.
pub fn apply_effect(before: Decimal, effect: MovementEffect) -> Option<Decimal> {
    match effect {
        MovementEffect::Add(magnitude) => Some(before + magnitude),
        MovementEffect::Remove(magnitude) => {
            let after = before - magnitude;
            (after >= Decimal::ZERO).then_some(after)
        }
        MovementEffect::SetTo(magnitude) => Some(magnitude),
    }
}

/// Stock alert types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "type_alerte", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertType {
    StockBas,
    StockEpuise,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::StockBas => "STOCK_BAS",
            AlertType::StockEpuise => "STOCK_EPUISE",
        }
    }
}

/// Decide whether a quantity triggers an alert, and of which type.
///
/// Exhaustion is checked before the threshold comparison so a stock at
/// exactly zero always reports STOCK_EPUISE, never STOCK_BAS.
pub fn alert_trigger(quantite: Decimal, seuil_alerte: Decimal) -> Option<AlertType> {
    if quantite == Decimal::ZERO {
        Some(AlertType::StockEpuise)
    } else if quantite <= seuil_alerte {
        Some(AlertType::StockBas)
    } else {
        None
    }
}

/// Human-readable alert message shown on the dashboard.
pub fn alert_message(trigger: AlertType, nom: &str, quantite: Decimal, unite: &str) -> String {
    match trigger {
        AlertType::StockEpuise => format!("Le stock \"{}\" est épuisé.", nom),
        AlertType::StockBas => format!(
            "Le stock \"{}\" est en dessous du seuil d'alerte ({} {}).",
            nom, quantite, unite
        ),
    }
}

/// A tracked inventory item
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Stock {
    pub id: Uuid,
    pub user_id: Uuid,
    pub parcelle_id: Option<Uuid>,
    pub nom: String,
    pub categorie: StockCategory,
    /// Free-form type label (e.g. "Urée 46%", "NPK 15-15-15")
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub type_: String,
    pub quantite: Decimal,
    pub unite: String,
    pub seuil_alerte: Decimal,
    pub prix_unitaire: Option<Decimal>,
    pub date_achat: Option<NaiveDate>,
    pub date_expiration: Option<NaiveDate>,
    pub fournisseur: Option<String>,
    pub localisation: Option<String>,
    pub notes: Option<String>,
    pub est_actif: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An immutable record of one quantity change applied to a stock.
///
/// `quantite` holds the caller-supplied magnitude; `quantite_avant` and
/// `quantite_apres` are captured at commit time and chain strictly from
/// one movement to the next.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Movement {
    pub id: Uuid,
    pub stock_id: Uuid,
    pub type_mouvement: MovementType,
    pub quantite: Decimal,
    pub quantite_avant: Decimal,
    pub quantite_apres: Decimal,
    pub motif: Option<String>,
    pub reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A low-stock or exhaustion notification raised for a stock
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: Uuid,
    pub stock_id: Uuid,
    pub type_alerte: AlertType,
    pub message: String,
    pub est_lue: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn entree_adds() {
        let effect = MovementType::Entree.effect(dec("25.5"));
        assert_eq!(apply_effect(dec("100"), effect), Some(dec("125.5")));
    }

    #[test]
    fn sortie_removes() {
        let effect = MovementType::Sortie.effect(dec("30"));
        assert_eq!(apply_effect(dec("100"), effect), Some(dec("70")));
    }

    #[test]
    fn perte_removes() {
        let effect = MovementType::Perte.effect(dec("10"));
        assert_eq!(apply_effect(dec("10"), effect), Some(dec("0")));
    }

    #[test]
    fn removal_below_zero_is_rejected() {
        let effect = MovementType::Sortie.effect(dec("20"));
        assert_eq!(apply_effect(dec("15"), effect), None);
    }

    #[test]
    fn removal_of_exact_quantity_is_allowed() {
        let effect = MovementType::Sortie.effect(dec("15"));
        assert_eq!(apply_effect(dec("15"), effect), Some(Decimal::ZERO));
    }

    #[test]
    fn ajustement_is_absolute() {
        // A decrease through AJUSTEMENT never trips the negative check
        let effect = MovementType::Ajustement.effect(dec("3"));
        assert_eq!(apply_effect(dec("500"), effect), Some(dec("3")));

        let effect = MovementType::Ajustement.effect(dec("900"));
        assert_eq!(apply_effect(dec("1"), effect), Some(dec("900")));
    }

    #[test]
    fn trigger_above_threshold_is_none() {
        assert_eq!(alert_trigger(dec("50"), dec("20")), None);
    }

    #[test]
    fn trigger_at_threshold_is_low() {
        assert_eq!(alert_trigger(dec("20"), dec("20")), Some(AlertType::StockBas));
        assert_eq!(alert_trigger(dec("5"), dec("20")), Some(AlertType::StockBas));
    }

    #[test]
    fn trigger_at_zero_is_exhausted_even_with_positive_threshold() {
        assert_eq!(
            alert_trigger(Decimal::ZERO, dec("20")),
            Some(AlertType::StockEpuise)
        );
        assert_eq!(
            alert_trigger(Decimal::ZERO, Decimal::ZERO),
            Some(AlertType::StockEpuise)
        );
    }

    #[test]
    fn alert_messages_embed_stock_details() {
        assert_eq!(
            alert_message(AlertType::StockEpuise, "Urée", Decimal::ZERO, "kg"),
            "Le stock \"Urée\" est épuisé."
        );
        assert_eq!(
            alert_message(AlertType::StockBas, "Urée", dec("15"), "kg"),
            "Le stock \"Urée\" est en dessous du seuil d'alerte (15 kg)."
        );
    }

    #[test]
    fn wire_names_stay_french() {
        let json = serde_json::to_value(MovementType::Entree).unwrap();
        assert_eq!(json, serde_json::json!("ENTREE"));

        let json = serde_json::to_value(AlertType::StockEpuise).unwrap();
        assert_eq!(json, serde_json::json!("STOCK_EPUISE"));

        let json = serde_json::to_value(StockCategory::Recoltes).unwrap();
        assert_eq!(json, serde_json::json!("RECOLTES"));
    }
}
