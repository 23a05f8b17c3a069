//! Stock ledger and alerting tests
//!
//! Exercises the rules the stock service enforces:
//! - ledger consistency: the quantity always equals the net effect of
//!   the movement history
//! - chain continuity between consecutive movements
//! - rejection of movements that would drive the quantity negative
//! - alert deduplication and re-arming after acknowledgment

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::{alert_trigger, apply_effect, AlertType, MovementType};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// ============================================================================
// In-memory ledger simulator
//
// Mirrors what the service does per movement: read the current quantity,
// compute the effect, append a movement, update the counter, evaluate
// alerts. Lets the invariants be checked without a database.
// ============================================================================

#[derive(Debug, Clone)]
struct SimMovement {
    type_mouvement: MovementType,
    quantite: Decimal,
    quantite_avant: Decimal,
    quantite_apres: Decimal,
}

#[derive(Debug, Clone)]
struct SimAlerte {
    type_alerte: AlertType,
    est_lue: bool,
}

#[derive(Debug, Clone)]
struct Ledger {
    quantite: Decimal,
    seuil_alerte: Decimal,
    mouvements: Vec<SimMovement>,
    alertes: Vec<SimAlerte>,
}

impl Ledger {
    /// Create a stock: the ledger opens with a synthetic ENTREE movement
    /// for the initial quantity.
    fn create(initial: Decimal, seuil_alerte: Decimal) -> Self {
        Ledger {
            quantite: initial,
            seuil_alerte,
            mouvements: vec![SimMovement {
                type_mouvement: MovementType::Entree,
                quantite: initial,
                quantite_avant: Decimal::ZERO,
                quantite_apres: initial,
            }],
            alertes: Vec::new(),
        }
    }

    /// Apply a movement; on rejection nothing is recorded and the
    /// available quantity is returned as the error.
    fn apply(&mut self, type_mouvement: MovementType, magnitude: Decimal) -> Result<Decimal, Decimal> {
        let before = self.quantite;
        let after =
            apply_effect(before, type_mouvement.effect(magnitude)).ok_or(before)?;

        self.mouvements.push(SimMovement {
            type_mouvement,
            quantite: magnitude,
            quantite_avant: before,
            quantite_apres: after,
        });
        self.quantite = after;
        self.evaluate();
        Ok(after)
    }

    /// Alert engine pass: raise at most one unread alert per type.
    fn evaluate(&mut self) {
        if let Some(trigger) = alert_trigger(self.quantite, self.seuil_alerte) {
            let already_raised = self
                .alertes
                .iter()
                .any(|a| a.type_alerte == trigger && !a.est_lue);
            if !already_raised {
                self.alertes.push(SimAlerte {
                    type_alerte: trigger,
                    est_lue: false,
                });
            }
        }
    }

    fn acknowledge_all(&mut self, type_alerte: AlertType) {
        for alerte in &mut self.alertes {
            if alerte.type_alerte == type_alerte {
                alerte.est_lue = true;
            }
        }
    }

    fn unread(&self, type_alerte: AlertType) -> usize {
        self.alertes
            .iter()
            .filter(|a| a.type_alerte == type_alerte && !a.est_lue)
            .count()
    }

    /// Replay the ledger from zero, the way reconciliation does.
    fn replay(&self) -> Decimal {
        let mut quantite = Decimal::ZERO;
        for m in &self.mouvements {
            quantite = apply_effect(quantite, m.type_mouvement.effect(m.quantite))
                .expect("recorded movement must replay");
        }
        quantite
    }

    fn chain_intact(&self) -> bool {
        self.mouvements
            .windows(2)
            .all(|pair| pair[0].quantite_apres == pair[1].quantite_avant)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Creation opens the ledger with a 0 -> initial ENTREE movement
    #[test]
    fn test_creation_movement() {
        let ledger = Ledger::create(dec("100"), dec("20"));

        assert_eq!(ledger.mouvements.len(), 1);
        let creation = &ledger.mouvements[0];
        assert_eq!(creation.type_mouvement, MovementType::Entree);
        assert_eq!(creation.quantite_avant, Decimal::ZERO);
        assert_eq!(creation.quantite_apres, dec("100"));
        assert_eq!(ledger.quantite, dec("100"));
    }

    /// The counter tracks the last movement's quantite_apres
    #[test]
    fn test_counter_follows_ledger() {
        let mut ledger = Ledger::create(dec("100"), dec("10"));

        ledger.apply(MovementType::Entree, dec("50")).unwrap();
        assert_eq!(ledger.quantite, dec("150"));
        assert_eq!(ledger.mouvements.last().unwrap().quantite_apres, dec("150"));

        ledger.apply(MovementType::Sortie, dec("30")).unwrap();
        assert_eq!(ledger.quantite, dec("120"));
        assert_eq!(ledger.mouvements.last().unwrap().quantite_apres, dec("120"));

        ledger.apply(MovementType::Perte, dec("20")).unwrap();
        assert_eq!(ledger.quantite, dec("100"));

        assert_eq!(ledger.replay(), ledger.quantite);
        assert!(ledger.chain_intact());
    }

    /// A SORTIE larger than the available quantity is rejected without
    /// touching the quantity or the ledger
    #[test]
    fn test_no_negative_commit() {
        let mut ledger = Ledger::create(dec("50"), dec("10"));
        let movements_before = ledger.mouvements.len();

        let err = ledger.apply(MovementType::Sortie, dec("60")).unwrap_err();
        assert_eq!(err, dec("50")); // available quantity reported

        assert_eq!(ledger.quantite, dec("50"));
        assert_eq!(ledger.mouvements.len(), movements_before);
    }

    /// Removing exactly the available quantity is allowed
    #[test]
    fn test_exact_removal_allowed() {
        let mut ledger = Ledger::create(dec("50"), dec("10"));
        let after = ledger.apply(MovementType::Perte, dec("50")).unwrap();
        assert_eq!(after, Decimal::ZERO);
    }

    /// AJUSTEMENT sets the quantity absolutely, including decreases
    #[test]
    fn test_ajustement_is_absolute() {
        let mut ledger = Ledger::create(dec("500"), dec("10"));

        let after = ledger.apply(MovementType::Ajustement, dec("3")).unwrap();
        assert_eq!(after, dec("3"));

        let after = ledger.apply(MovementType::Ajustement, dec("900")).unwrap();
        assert_eq!(after, dec("900"));

        assert!(ledger.chain_intact());
        assert_eq!(ledger.replay(), dec("900"));
    }

    /// Two evaluations of an unchanged low stock raise one alert, not two
    #[test]
    fn test_alert_dedup_idempotence() {
        let mut ledger = Ledger::create(dec("100"), dec("20"));
        ledger.apply(MovementType::Sortie, dec("85")).unwrap();

        assert_eq!(ledger.unread(AlertType::StockBas), 1);

        // re-running evaluation (the read-time defensive pass) is a no-op
        ledger.evaluate();
        ledger.evaluate();
        assert_eq!(ledger.unread(AlertType::StockBas), 1);
    }

    /// After acknowledgment, a still-low quantity re-arms the alert
    #[test]
    fn test_alert_rearm_after_acknowledgment() {
        let mut ledger = Ledger::create(dec("100"), dec("20"));
        ledger.apply(MovementType::Sortie, dec("90")).unwrap();
        assert_eq!(ledger.unread(AlertType::StockBas), 1);

        ledger.acknowledge_all(AlertType::StockBas);
        assert_eq!(ledger.unread(AlertType::StockBas), 0);

        ledger.evaluate();
        assert_eq!(ledger.unread(AlertType::StockBas), 1);
        assert_eq!(ledger.alertes.len(), 2);
    }

    /// A quantity of exactly zero reports exhaustion, never low stock
    #[test]
    fn test_exhaustion_precedence() {
        let mut ledger = Ledger::create(dec("10"), dec("20"));
        ledger.apply(MovementType::Sortie, dec("10")).unwrap();

        assert_eq!(ledger.unread(AlertType::StockEpuise), 1);
        // the drop to zero itself raised no STOCK_BAS
        assert_eq!(
            ledger
                .alertes
                .iter()
                .filter(|a| a.type_alerte == AlertType::StockBas)
                .count(),
            0
        );
    }

    /// Replay follows ledger positions, never wall-clock order: a burst
    /// of movements recorded back-to-back must still chain and land on
    /// the counter
    #[test]
    fn test_replay_follows_ledger_order() {
        let mut ledger = Ledger::create(dec("10"), Decimal::ZERO);

        ledger.apply(MovementType::Entree, dec("5")).unwrap();
        ledger.apply(MovementType::Sortie, dec("15")).unwrap();
        ledger.apply(MovementType::Entree, dec("2")).unwrap();
        ledger.apply(MovementType::Ajustement, dec("7")).unwrap();

        assert!(ledger.chain_intact());
        assert_eq!(ledger.replay(), dec("7"));
        // reordering any two adjacent movements would break the chain:
        // each quantite_avant is pinned to its predecessor's quantite_apres
        let mut shuffled = ledger.clone();
        shuffled.mouvements.swap(1, 2);
        assert!(!shuffled.chain_intact());
    }

    /// Recovery does not auto-acknowledge: clearing an alert is a human
    /// action
    #[test]
    fn test_no_auto_resolve_on_recovery() {
        let mut ledger = Ledger::create(dec("30"), dec("20"));
        ledger.apply(MovementType::Sortie, dec("15")).unwrap();
        assert_eq!(ledger.unread(AlertType::StockBas), 1);

        ledger.apply(MovementType::Entree, dec("200")).unwrap();
        assert_eq!(ledger.unread(AlertType::StockBas), 1);
    }

    /// Full scenario: Urée 100 kg, threshold 20
    #[test]
    fn test_uree_scenario() {
        let mut ledger = Ledger::create(dec("100"), dec("20"));

        // initial ENTREE 0 -> 100
        assert_eq!(ledger.mouvements[0].quantite_avant, Decimal::ZERO);
        assert_eq!(ledger.mouvements[0].quantite_apres, dec("100"));

        // SORTIE 85 -> 15, low-stock alert raised
        let after = ledger.apply(MovementType::Sortie, dec("85")).unwrap();
        assert_eq!(after, dec("15"));
        assert_eq!(ledger.unread(AlertType::StockBas), 1);

        // SORTIE 20 from 15 -> rejected, stock stays at 15
        assert!(ledger.apply(MovementType::Sortie, dec("20")).is_err());
        assert_eq!(ledger.quantite, dec("15"));

        // SORTIE 15 -> 0, exhaustion alert; the unread low-stock alert
        // survives alongside it
        let after = ledger.apply(MovementType::Sortie, dec("15")).unwrap();
        assert_eq!(after, Decimal::ZERO);
        assert_eq!(ledger.unread(AlertType::StockEpuise), 1);
        assert_eq!(ledger.unread(AlertType::StockBas), 1);

        assert!(ledger.chain_intact());
        assert_eq!(ledger.replay(), Decimal::ZERO);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for non-negative magnitudes (0.0 to 1000.0)
    fn magnitude_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..=10000i64).prop_map(|n| Decimal::new(n, 1))
    }

    fn movement_type_strategy() -> impl Strategy<Value = MovementType> {
        prop_oneof![
            Just(MovementType::Entree),
            Just(MovementType::Sortie),
            Just(MovementType::Ajustement),
            Just(MovementType::Perte),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// The quantity never goes negative, whatever the sequence
        #[test]
        fn prop_quantity_never_negative(
            initial in magnitude_strategy(),
            seuil in magnitude_strategy(),
            movements in prop::collection::vec(
                (movement_type_strategy(), magnitude_strategy()),
                0..30
            )
        ) {
            let mut ledger = Ledger::create(initial, seuil);
            for (type_mouvement, magnitude) in movements {
                let _ = ledger.apply(type_mouvement, magnitude);
                prop_assert!(ledger.quantite >= Decimal::ZERO);
            }
        }

        /// The counter always equals the ledger replayed from zero, and
        /// the before/after chain never breaks
        #[test]
        fn prop_counter_equals_ledger_replay(
            initial in magnitude_strategy(),
            movements in prop::collection::vec(
                (movement_type_strategy(), magnitude_strategy()),
                0..30
            )
        ) {
            let mut ledger = Ledger::create(initial, Decimal::ZERO);
            for (type_mouvement, magnitude) in movements {
                let _ = ledger.apply(type_mouvement, magnitude);
            }

            prop_assert_eq!(ledger.replay(), ledger.quantite);
            prop_assert!(ledger.chain_intact());
            prop_assert_eq!(
                ledger.mouvements.last().unwrap().quantite_apres,
                ledger.quantite
            );
        }

        /// A rejected removal leaves the state exactly as it was
        #[test]
        fn prop_rejection_has_no_effect(
            initial in magnitude_strategy(),
            extra in (1i64..=10000i64).prop_map(|n| Decimal::new(n, 1))
        ) {
            let mut ledger = Ledger::create(initial, Decimal::ZERO);
            let movements_before = ledger.mouvements.len();

            // always strictly more than available
            let result = ledger.apply(MovementType::Sortie, initial + extra);

            prop_assert!(result.is_err());
            prop_assert_eq!(ledger.quantite, initial);
            prop_assert_eq!(ledger.mouvements.len(), movements_before);
        }

        /// AJUSTEMENT lands on its magnitude regardless of prior state
        #[test]
        fn prop_ajustement_absolute(
            initial in magnitude_strategy(),
            target in magnitude_strategy()
        ) {
            let mut ledger = Ledger::create(initial, Decimal::ZERO);
            let after = ledger.apply(MovementType::Ajustement, target).unwrap();
            prop_assert_eq!(after, target);
            prop_assert_eq!(ledger.quantite, target);
        }

        /// Whatever the history, at most one unread alert per type exists
        #[test]
        fn prop_at_most_one_unread_alert_per_type(
            initial in magnitude_strategy(),
            seuil in magnitude_strategy(),
            movements in prop::collection::vec(
                (movement_type_strategy(), magnitude_strategy()),
                0..30
            )
        ) {
            let mut ledger = Ledger::create(initial, seuil);
            for (type_mouvement, magnitude) in movements {
                let _ = ledger.apply(type_mouvement, magnitude);
            }
            // defensive read-time pass, twice
            ledger.evaluate();
            ledger.evaluate();

            prop_assert!(ledger.unread(AlertType::StockBas) <= 1);
            prop_assert!(ledger.unread(AlertType::StockEpuise) <= 1);
        }

        /// An alert is only ever raised at or below the threshold
        #[test]
        fn prop_no_alert_above_threshold(
            seuil in magnitude_strategy(),
            extra in (1i64..=10000i64).prop_map(|n| Decimal::new(n, 1))
        ) {
            let quantite = seuil + extra;
            prop_assert_eq!(alert_trigger(quantite, seuil), None);
        }

        /// Zero always classifies as exhausted, never as low
        #[test]
        fn prop_zero_is_exhausted(seuil in magnitude_strategy()) {
            prop_assert_eq!(
                alert_trigger(Decimal::ZERO, seuil),
                Some(AlertType::StockEpuise)
            );
        }
    }
}
