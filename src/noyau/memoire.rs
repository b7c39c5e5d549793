// src/noyau/memoire.rs
//
// Cellule mémoire : un seul registre protégé par un mutex.
// Lue sous le nom "ANS", écrite par la pseudo-fonction "save" à chaque évaluation.

use num_rational::BigRational;
use num_traits::Zero;
use std::sync::Mutex;

use super::erreur::Erreur;

#[derive(Debug, Default)]
pub struct Cellule<T> {
    valeur: Mutex<T>,
}

/// Cellule du calculateur (dernier résultat).
pub type Memoire = Cellule<BigRational>;

impl<T: Clone> Cellule<T> {
    pub fn new(valeur: T) -> Self {
        Self {
            valeur: Mutex::new(valeur),
        }
    }

    /// Lecture : un verrou empoisonné reste lisible (la valeur est toujours complète).
    pub fn lire(&self) -> T {
        self.valeur
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn ecrire(&self, valeur: T) -> Result<(), Erreur> {
        let mut v = self
            .valeur
            .lock()
            .map_err(|_| Erreur::Memoire("verrou empoisonné".into()))?;
        *v = valeur;
        Ok(())
    }
}

impl Cellule<BigRational> {
    /// Mémoire vide : zéro.
    pub fn zero() -> Self {
        Self::new(BigRational::zero())
    }
}
