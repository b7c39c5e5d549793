// src/noyau/annulation.rs
//
// Jeton d’annulation coopératif : échéance optionnelle + drapeau partagé.
// Interrogé par l’évaluateur à l’entrée de chaque nœud et dans les boucles
// factorielle / puissance / pgcd.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::erreur::Erreur;

#[derive(Clone, Debug, Default)]
pub struct Annulation {
    echeance: Option<Instant>,
    drapeau: Arc<AtomicBool>,
}

impl Annulation {
    /// Jeton jamais annulé (sauf appel explicite à `annuler`).
    pub fn aucune() -> Self {
        Self::default()
    }

    pub fn avec_delai(delai: Duration) -> Self {
        Self::aucune().prolonger(delai)
    }

    /// Nouveau jeton qui partage le drapeau mais porte sa propre échéance.
    pub fn prolonger(&self, delai: Duration) -> Self {
        Self {
            echeance: Instant::now().checked_add(delai),
            drapeau: Arc::clone(&self.drapeau),
        }
    }

    pub fn annuler(&self) {
        self.drapeau.store(true, Ordering::SeqCst);
    }

    pub fn est_annulee(&self) -> bool {
        if self.drapeau.load(Ordering::SeqCst) {
            return true;
        }
        matches!(self.echeance, Some(t) if Instant::now() >= t)
    }

    pub fn verifier(&self) -> Result<(), Erreur> {
        if self.est_annulee() {
            Err(Erreur::Annulee)
        } else {
            Ok(())
        }
    }
}
