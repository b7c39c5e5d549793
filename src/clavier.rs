// src/clavier.rs
//
// Clavier : touches -> texte d’affichage, évalué par le noyau sur '='.

pub mod curseur;
pub mod saisie;

#[cfg(test)]
mod proptests;

#[cfg(test)]
mod tests_curseur;

pub use curseur::{Curseur, Touche, ANS, CURSEUR, NAN};
pub use saisie::Saisie;
