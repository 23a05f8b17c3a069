//! Field-level validation for stock inputs
//!
//! Mirrors the limits enforced by the dashboard forms so both sides agree
//! on what a well-formed stock looks like.

use rust_decimal::Decimal;

pub const NOM_MAX_LEN: usize = 200;
pub const TYPE_MAX_LEN: usize = 100;
pub const UNITE_MAX_LEN: usize = 20;
pub const FOURNISSEUR_MAX_LEN: usize = 200;
pub const LOCALISATION_MAX_LEN: usize = 200;
pub const MOTIF_MAX_LEN: usize = 1000;
pub const REFERENCE_MAX_LEN: usize = 100;

/// Validate the stock name (required, at most 200 characters)
pub fn validate_nom(nom: &str) -> Result<(), &'static str> {
    if nom.trim().is_empty() {
        return Err("Le nom du stock est requis");
    }
    if nom.chars().count() > NOM_MAX_LEN {
        return Err("Le nom ne doit pas dépasser 200 caractères");
    }
    Ok(())
}

/// Validate the free-form type label (required, at most 100 characters)
pub fn validate_type_label(type_label: &str) -> Result<(), &'static str> {
    if type_label.trim().is_empty() {
        return Err("Le type est requis");
    }
    if type_label.chars().count() > TYPE_MAX_LEN {
        return Err("Le type ne doit pas dépasser 100 caractères");
    }
    Ok(())
}

/// Validate the unit label (required, at most 20 characters)
pub fn validate_unite(unite: &str) -> Result<(), &'static str> {
    if unite.trim().is_empty() {
        return Err("L'unité est requise");
    }
    if unite.chars().count() > UNITE_MAX_LEN {
        return Err("L'unité ne doit pas dépasser 20 caractères");
    }
    Ok(())
}

/// Validate a quantity or threshold (must be non-negative)
pub fn validate_quantite(quantite: Decimal) -> Result<(), &'static str> {
    if quantite < Decimal::ZERO {
        return Err("La quantité doit être un nombre positif");
    }
    Ok(())
}

/// Validate an optional unit price (must be non-negative when present)
pub fn validate_prix_unitaire(prix: Option<Decimal>) -> Result<(), &'static str> {
    match prix {
        Some(p) if p < Decimal::ZERO => Err("Le prix unitaire doit être un nombre positif"),
        _ => Ok(()),
    }
}

/// Validate an optional movement reason (at most 1000 characters)
pub fn validate_motif(motif: Option<&str>) -> Result<(), &'static str> {
    match motif {
        Some(m) if m.chars().count() > MOTIF_MAX_LEN => {
            Err("Le motif ne doit pas dépasser 1000 caractères")
        }
        _ => Ok(()),
    }
}

/// Validate an optional external reference (at most 100 characters)
pub fn validate_reference(reference: Option<&str>) -> Result<(), &'static str> {
    match reference {
        Some(r) if r.chars().count() > REFERENCE_MAX_LEN => {
            Err("La référence ne doit pas dépasser 100 caractères")
        }
        _ => Ok(()),
    }
}

/// Validate an optional supplier name (at most 200 characters)
pub fn validate_fournisseur(fournisseur: Option<&str>) -> Result<(), &'static str> {
    match fournisseur {
        Some(f) if f.chars().count() > FOURNISSEUR_MAX_LEN => {
            Err("Le fournisseur ne doit pas dépasser 200 caractères")
        }
        _ => Ok(()),
    }
}

/// Validate an optional storage location (at most 200 characters)
pub fn validate_localisation(localisation: Option<&str>) -> Result<(), &'static str> {
    match localisation {
        Some(l) if l.chars().count() > LOCALISATION_MAX_LEN => {
            Err("La localisation ne doit pas dépasser 200 caractères")
        }
        _ => Ok(()),
    }
}
