// src/noyau/scientifique.rs
//
// Jeu de réglages du clavier scientifique.
// Les glyphes affichés (× ÷ π e) sont réécrits en syntaxe du moteur avant tokenisation.

use std::sync::Arc;

use super::calcul::{euler, pgcd, pi, ppcm};
use super::erreur::Erreur;
use super::memoire::Memoire;
use super::moteur::{Fonction, Reglage};

pub fn reglages_scientifiques(memoire: Arc<Memoire>, chiffres: usize) -> Vec<Reglage> {
    let lecture = Arc::clone(&memoire);

    vec![
        Reglage::Precision(chiffres),
        Reglage::variable("ANS", move || lecture.lire()),
        Reglage::constante("PI", pi(chiffres)),
        Reglage::constante("E", euler(chiffres)),
        // save(x) : mémorise x et le renvoie
        Reglage::fonction(
            "save",
            Fonction::une(move |x| {
                memoire.ecrire(x.clone())?;
                Ok(x.clone())
            }),
        ),
        Reglage::fonction("sin", Fonction::reelle(f64::sin)),
        Reglage::fonction("cos", Fonction::reelle(f64::cos)),
        Reglage::fonction("tan", Fonction::reelle(f64::tan)),
        Reglage::fonction(
            "arcsin",
            Fonction::reelle_partielle(|x| dans_unite("arcsin", x).map(f64::asin)),
        ),
        Reglage::fonction(
            "arccos",
            Fonction::reelle_partielle(|x| dans_unite("arccos", x).map(f64::acos)),
        ),
        Reglage::fonction("arctan", Fonction::reelle(f64::atan)),
        Reglage::fonction(
            "log",
            Fonction::reelle_partielle(|x| strictement_positif("log", x).map(f64::log10)),
        ),
        Reglage::fonction(
            "ln",
            Fonction::reelle_partielle(|x| strictement_positif("ln", x).map(f64::ln)),
        ),
        Reglage::fonction("gdc", Fonction::deux_annulable(pgcd)),
        Reglage::fonction("lcm", Fonction::deux_annulable(ppcm)),
        Reglage::remplacements(&[("×", "*"), ("÷", "/"), ("π", "PI"), ("e", "E")]),
    ]
}

fn dans_unite(nom: &str, x: f64) -> Result<f64, Erreur> {
    if (-1.0..=1.0).contains(&x) {
        Ok(x)
    } else {
        Err(Erreur::domaine(format!("{nom}({x}) est indéfini")))
    }
}

fn strictement_positif(nom: &str, x: f64) -> Result<f64, Erreur> {
    if x > 0.0 {
        Ok(x)
    } else {
        Err(Erreur::domaine(format!("{nom}({x}) est indéfini")))
    }
}
