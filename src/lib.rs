// src/lib.rs
//
// Calculatrice scientifique : curseur de saisie + moteur d’expressions exact.

pub mod clavier;
pub mod noyau;

pub use clavier::{Curseur, Touche};
pub use noyau::{Erreur, Format, Memoire, Moteur, Reglage};
