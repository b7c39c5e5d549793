//! Noyau : moteur d’expressions exact
//!
//! Organisation interne :
//! - jetons.rs       : tokenisation
//! - syntaxe.rs      : descente récursive -> arbre
//! - arbre.rs        : nœuds (feuilles, unaires, binaires, appels chaînés)
//! - eval.rs         : évaluation sur rationnels + annulation
//! - calcul.rs       : factorielle, pgcd/ppcm, puissance, √, π (cache), e
//! - moteur.rs       : registre, réglages, remplacements, démarche
//! - format.rs       : rendu fixe / scientifique / fraction
//! - memoire.rs      : cellule "ANS"
//! - scientifique.rs : réglages du clavier scientifique

pub mod annulation;
pub mod arbre;
pub mod calcul;
pub mod erreur;
pub mod eval;
pub mod format;
pub mod jetons;
pub mod memoire;
pub mod moteur;
pub mod scientifique;
pub mod syntaxe;


// API publique minimale
pub use annulation::Annulation;
pub use erreur::Erreur;
pub use format::{formater, Format};
pub use memoire::{Cellule, Memoire};
pub use moteur::{Demarche, Fonction, Moteur, Reglage, CHIFFRES_DEFAUT, DELAI_DEFAUT};
pub use scientifique::reglages_scientifiques;
